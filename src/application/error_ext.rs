//! Error conversion helpers for I/O and parse results
//!
//! Attach the offending path to low-level errors before they reach the user.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&input)
    ///     .with_path_context("read document", &input)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait turning JSON decode failures into `InvalidDocument`.
pub trait JsonResultExt<T> {
    fn with_document_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for Result<T, serde_json::Error> {
    fn with_document_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::InvalidDocument {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
