//! QC statistics
//!
//! `QcStats` is a fixed record: its seven fields serialize, in order, to the
//! keys `Shape`, `Type`, `HDR`, `Luminance Min`, `Luminance Max`,
//! `Luminance Mean` and `Luminance Std`.

use std::fmt;

use serde::{Serialize, Serializer};

use super::{AnalyzeError, Luminance};
use crate::color::LuminanceOrder;
use crate::decode::pixels::{DecodedImage, ElementType, Shape};

/// Dynamic-range classification derived from the element type alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrClass {
    /// 8-bit integer samples
    Sdr,
    /// Floating point samples
    Hdr,
    /// Any other element type
    Unknown,
}

impl HdrClass {
    pub fn from_element_type(element_type: ElementType) -> Self {
        match element_type {
            ElementType::U8 => HdrClass::Sdr,
            t if t.is_float() => HdrClass::Hdr,
            _ => HdrClass::Unknown,
        }
    }
}

impl Serialize for HdrClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HdrClass::Sdr => serializer.serialize_bool(false),
            HdrClass::Hdr => serializer.serialize_bool(true),
            HdrClass::Unknown => serializer.serialize_str("Unknown"),
        }
    }
}

impl fmt::Display for HdrClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdrClass::Sdr => f.write_str("false"),
            HdrClass::Hdr => f.write_str("true"),
            HdrClass::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcStats {
    #[serde(rename = "Shape")]
    pub shape: Shape,
    #[serde(rename = "Type")]
    pub element_type: ElementType,
    #[serde(rename = "HDR")]
    pub hdr: HdrClass,
    #[serde(rename = "Luminance Min")]
    pub luminance_min: f64,
    #[serde(rename = "Luminance Max")]
    pub luminance_max: f64,
    #[serde(rename = "Luminance Mean")]
    pub luminance_mean: f64,
    #[serde(rename = "Luminance Std")]
    pub luminance_std: f64,
}

impl QcStats {
    /// Pretty JSON for display
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Min, max, mean and population standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reductions {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl Reductions {
    /// Reduce over all values. A NaN anywhere makes every result NaN.
    pub fn of(values: &[f64]) -> Result<Self, AnalyzeError> {
        if values.is_empty() {
            return Err(AnalyzeError::Empty);
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut saw_nan = false;
        for &v in values {
            if v.is_nan() {
                saw_nan = true;
            } else {
                min = min.min(v);
                max = max.max(v);
            }
            sum += v;
        }
        if saw_nan {
            min = f64::NAN;
            max = f64::NAN;
        }

        let n = values.len() as f64;
        let mean = sum / n;
        let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Ok(Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
        })
    }
}

/// Compute QC statistics and the luminance they were reduced from
pub fn analyze(image: &DecodedImage, order: LuminanceOrder) -> Result<(QcStats, Luminance), AnalyzeError> {
    let luminance = Luminance::from_image(image, order)?;
    let reductions = Reductions::of(luminance.values())?;

    let stats = QcStats {
        shape: image.shape(),
        element_type: image.element_type(),
        hdr: HdrClass::from_element_type(image.element_type()),
        luminance_min: reductions.min,
        luminance_max: reductions.max,
        luminance_mean: reductions.mean,
        luminance_std: reductions.std,
    };

    Ok((stats, luminance))
}
