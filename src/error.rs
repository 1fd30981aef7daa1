use thiserror::Error;

use crate::analysis::AnalyzeError;
use crate::decode::DecodeError;

/// A fault that aborts a whole review pass
#[derive(Debug, Error)]
pub enum QcError {
    #[error("{file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: DecodeError,
    },
    #[error("{file}: {source}")]
    Analyze {
        file: String,
        #[source]
        source: AnalyzeError,
    },
}

impl QcError {
    /// Name of the file the pass stopped at
    pub fn file(&self) -> &str {
        match self {
            QcError::Decode { file, .. } | QcError::Analyze { file, .. } => file,
        }
    }
}
