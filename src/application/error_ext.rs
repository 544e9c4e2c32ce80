//! Path context for I/O failures at the seed and config boundary

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// Wraps an I/O error as [`ApplicationError::OperationFailed`] naming the
    /// file that could not be accessed.
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OperationFailed {
            context: format!("{action} {}", path.display()),
            source: source.into(),
        })
    }
}

/// Reads the whole `what` file (a seed document, a config file) as text.
pub fn read_text(path: &Path, what: &str) -> ApplicationResult<String> {
    std::fs::read_to_string(path).with_path_context(&format!("cannot read {what}"), path)
}
