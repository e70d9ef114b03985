//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations (files and drawing
//! surfaces), allowing services to be tested with in-memory implementations.

use std::io::{self, Read, Write};
use std::path::Path;

use crate::domain::{SceneElement, ViewTransform};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file, replacing it atomically.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;

    /// Read all of standard input.
    fn read_stdin(&self) -> io::Result<String>;
}

/// Retained-mode drawing target of the concept-map renderer.
///
/// Elements accumulate until [`Surface::clear`]; the view transform applies
/// to all of them and can change without redrawing.
pub trait Surface {
    /// Measured pixel width; zero or less means "not mounted".
    fn measured_width(&self) -> f64;

    /// Pixel height of the drawing area.
    fn height(&self) -> f64;

    /// Remove every drawn element.
    fn clear(&mut self);

    /// Append one element.
    fn draw(&mut self, element: SceneElement);

    /// Replace the transform applied to all elements.
    fn set_transform(&mut self, transform: ViewTransform);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // Temp file in the target directory so persist() is a same-device rename
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn read_stdin(&self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    }
}
