//! Shared data structures for the application state
//!
//! These structs represent the data that flows between the upload layer,
//! the review pass and the UI layer.

use std::io::Cursor;
use std::sync::Arc;

use crate::analysis::{LuminanceHistogram, QcStats};
use crate::decode::display::PreviewImage;
use crate::decode::loader::file_extension;
use crate::state::ratings::Rating;

/// A file the user uploaded, held in memory
#[derive(Clone, PartialEq)]
pub struct UploadedFile {
    /// File name only (e.g., "sunset.exr"); also the ratings key
    name: String,
    /// Raw file content, shared between passes
    bytes: Arc<[u8]>,
}

impl UploadedFile {
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        Self {
            name,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercase extension with leading dot, derived from the name
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }

    /// A fresh seekable reader over the content
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes())
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything shown for a successfully analyzed file
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    /// `None` when the channel layout cannot be displayed
    pub preview: Option<PreviewImage>,
    pub stats: QcStats,
    pub histogram: LuminanceHistogram,
    pub rating: Rating,
}

/// What happened to one file during a review pass
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Analyzed(Box<FileAnalysis>),
    /// HDR decode failed; the message is shown in place of the analysis
    DecodeFailed { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub name: String,
    pub extension: String,
    pub outcome: FileOutcome,
}
