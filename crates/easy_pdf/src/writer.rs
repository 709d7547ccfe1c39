//! Persists rendered documents to disk.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::builder::PdfBuilder;
use crate::error::{PdfError, Result};

/// Writes the document held by a [`PdfBuilder`].
///
/// The writer only borrows the builder for as long as it lives.
#[derive(Clone, Copy, Debug)]
pub struct PdfWriter<'a> {
    builder: &'a PdfBuilder,
}

impl<'a> PdfWriter<'a> {
    /// Wraps `builder`.
    pub fn new(builder: &'a PdfBuilder) -> Self {
        Self { builder }
    }

    /// Renders the document and writes it to `path`.
    ///
    /// The PDF is first written to a temporary file next to `path` and then
    /// renamed over it, so an existing file is replaced as a whole and a
    /// failure leaves nothing behind. The parent directory must already
    /// exist. A replaced file keeps its permissions; a new one gets the
    /// process umask applied, as with a plain create.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staging = staging_file(parent).map_err(|err| PdfError::io(path, err))?;

        let rendered = self.builder.render()?;
        staging
            .write_all(&rendered.bytes)
            .and_then(|()| staging.as_file().sync_all())
            .map_err(|err| PdfError::io(path, err))?;
        if let Ok(existing) = fs::metadata(path) {
            staging
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| PdfError::io(path, err))?;
        }
        staging
            .persist(path)
            .map_err(|err| PdfError::io(path, err.error))?;

        info!(
            "Wrote {} ({} bytes, {} block(s))",
            path.display(),
            rendered.bytes.len(),
            self.builder.document().len()
        );
        Ok(())
    }

    /// Renders the document into `sink`.
    pub fn write_to(&self, sink: impl Write) -> Result<()> {
        self.builder.render_to(sink)
    }
}

fn staging_file(parent: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".easy_pdf").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Masked by the umask on creation.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(parent)
}
