//! Per-file quality ratings
//!
//! A `RatingsTable` maps file names to ratings and remembers the order in
//! which names first appeared. It is rebuilt on every review pass.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("rating {0} is outside 1..=5")]
pub struct RatingError(pub u8);

/// Quality rating in `1..=5` (1 = bad, 5 = excellent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: Rating = Rating(1);
    pub const MAX: Rating = Rating(5);
    pub const DEFAULT: Rating = Rating(3);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(RatingError(value))
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// File name to rating, in order of first insertion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingsTable {
    entries: Vec<(String, Rating)>,
}

impl RatingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rating for `name`
    ///
    /// An existing entry keeps its position and takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, rating: Rating) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = rating,
            None => self.entries.push((name, rating)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rating> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rating)| *rating)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rating)> {
        self.entries.iter().map(|(name, rating)| (name.as_str(), *rating))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pretty JSON object, keys in insertion order
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for RatingsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, rating) in &self.entries {
            map.serialize_entry(name, rating)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(value: u8) -> Rating {
        Rating::try_from(value).unwrap()
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::try_from(0).is_err());
        assert!(Rating::try_from(6).is_err());
        assert_eq!(Rating::try_from(1).unwrap(), Rating::MIN);
        assert_eq!(Rating::try_from(5).unwrap(), Rating::MAX);
        assert_eq!(Rating::default().value(), 3);
    }

    #[test]
    fn test_insertion_order_is_preserved_in_json() {
        let mut table = RatingsTable::new();
        table.insert("b.exr", rating(2));
        table.insert("a.png", rating(4));

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"b.exr":2,"a.png":4}"#);
    }

    #[test]
    fn test_reinsert_keeps_first_position() {
        let mut table = RatingsTable::new();
        table.insert("a.png", rating(4));
        table.insert("b.exr", rating(2));
        table.insert("a.png", rating(1));

        let entries: Vec<(&str, u8)> = table.iter().map(|(n, r)| (n, r.value())).collect();
        assert_eq!(entries, vec![("a.png", 1), ("b.exr", 2)]);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn test_clear_empties_table() {
        let mut table = RatingsTable::new();
        table.insert("a.png", rating(4));
        table.clear();

        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.get("a.png"), None);
    }

    #[test]
    fn test_empty_table_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&RatingsTable::new()).unwrap(), "{}");
    }
}
