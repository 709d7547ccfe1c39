//! The canonical one-paragraph document.

use std::path::Path;

use crate::builder::PdfBuilder;
use crate::error::Result;
use crate::model::Paragraph;
use crate::writer::PdfWriter;

/// Output file used when no path is given.
pub const DEFAULT_OUTPUT: &str = "result.pdf";

/// Text of the single sample paragraph.
pub const SAMPLE_TEXT: &str = "Hello world";

/// Writes a document holding one `"Hello world"` paragraph to `path`.
pub fn hello_world(path: impl AsRef<Path>) -> Result<()> {
    hello_world_with(PdfBuilder::new(), path)
}

/// Like [`hello_world`], starting from a pre-configured builder.
pub fn hello_world_with(mut builder: PdfBuilder, path: impl AsRef<Path>) -> Result<()> {
    let paragraph = Paragraph::new(SAMPLE_TEXT);
    builder.add(paragraph);

    let writer = PdfWriter::new(&builder);
    writer.to_file(path)
}
