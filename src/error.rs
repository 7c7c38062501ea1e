use std::io;
use std::path::PathBuf;

/// Everything that can stop a conversion.
///
/// The variant is the error kind; callers match on it to tell a missing
/// input apart from a malformed one or a failed write.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("failed to read spreadsheet {}: {reason}", path.display())]
    InputMalformed { path: PathBuf, reason: String },

    #[error("sheet in {} has no cells to render", path.display())]
    EmptySheet { path: PathBuf },

    #[error("failed to write {}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render PDF content")]
    Render(#[from] lopdf::Error),
}

impl ConvertError {
    pub(crate) fn write_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::OutputWriteFailed {
            path: path.into(),
            source,
        }
    }
}
