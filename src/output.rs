use crate::error::ConvertError;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// `<dir>/<YYYY-MM-DD>.pdf`
pub fn dated_output_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.pdf", date.format("%Y-%m-%d")))
}

/// Create `dir` and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(dir).map_err(|e| ConvertError::write_failed(dir, e))
}
