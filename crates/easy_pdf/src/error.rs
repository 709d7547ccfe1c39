//! Error types for the `easy_pdf` crate.

use std::io;
use std::path::PathBuf;

use crate::markup::MarkupError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors produced while assembling, rendering, writing or reading documents.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// `genpdf` rejected the document while laying it out or serializing it.
    #[error("failed to render document: {0}")]
    Render(#[source] genpdf::error::Error),

    /// The output file could not be created, written or moved into place.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Inline markup could not be parsed.
    #[error("invalid markup: {0}")]
    Markup(#[from] MarkupError),

    /// A rendered PDF could not be read back.
    #[error("failed to read PDF: {0}")]
    Inspect(#[from] lopdf::Error),
}

impl PdfError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the I/O error kind when this is an [`PdfError::Io`] failure.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
