//! Assemble paragraphs into a document and write it as PDF.
//!
//! Layout, font handling and PDF serialization are delegated to `genpdf`;
//! this crate provides the document model, the builder that feeds it to the
//! renderer and a writer that persists the result atomically.

pub mod builder;
pub mod error;
pub mod fonts;
pub mod inspect;
pub mod markup;
pub mod model;
pub mod sample;
pub mod writer;

pub use builder::{PaperSize, PdfBuilder, RenderOptions, RenderedPdf};
pub use error::{PdfError, Result};
pub use fonts::FontConfig;
pub use model::{Block, Color, Document, HorizontalAlignment, Paragraph, Span};
pub use writer::PdfWriter;
