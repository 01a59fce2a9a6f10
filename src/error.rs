use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort the slideshow. None of them are retried.
#[derive(Error, Debug)]
pub enum SlideshowError {
    /// The PDF is missing or could not be parsed.
    #[error("cannot open document {path}: {reason}")]
    DocumentOpen { path: PathBuf, reason: String },

    /// The PDFium library could not be bound.
    #[error("PDFium library unavailable: {0}")]
    Pdfium(String),

    /// A page failed to render or encode.
    #[error("failed to render page {page}: {reason}")]
    Render { page: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The viewer HTML was not found in any probed location.
    #[error("viewer resource {name} not found (looked in {searched:?})")]
    ViewerMissing { name: String, searched: Vec<PathBuf> },

    /// The browser could not be started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// The load-confirmation element never appeared.
    #[error("viewer did not load: element #{element} missing after {timeout:?}")]
    LoadTimeout { element: String, timeout: Duration },

    /// The page-side update function never became callable.
    #[error("update function {function}() not available after {timeout:?}")]
    UpdateFunctionTimeout { function: String, timeout: Duration },

    /// Script execution failed inside the browser.
    #[error("script execution failed: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, SlideshowError>;
