//! Turns a [`Document`] into a `genpdf` document and renders it.

use std::io::Write;

use genpdf::elements::{self, Break, PageBreak};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color as PdfColor, Style, StyledString};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, Position};
use log::debug;

use crate::error::{PdfError, Result};
use crate::fonts::{self, FontConfig};
use crate::model::{Block, Document, HorizontalAlignment, Paragraph, Span};

const DEFAULT_TITLE: &str = "Document";
const DEFAULT_MARGIN_MM: f64 = 10.0;
const DEFAULT_FONT_SIZE: u8 = 12;
const DEFAULT_PARAGRAPH_SPACING: f64 = 0.5;
const FOOTER_HEIGHT_MM: f64 = 8.0;
const FOOTER_FONT_SIZE: u8 = 9;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Supported paper sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaperSize {
    /// ISO A4, 210 × 297 mm.
    #[default]
    A4,
    /// US Letter.
    Letter,
    /// US Legal.
    Legal,
}

impl From<PaperSize> for genpdf::PaperSize {
    fn from(size: PaperSize) -> Self {
        match size {
            PaperSize::A4 => genpdf::PaperSize::A4,
            PaperSize::Letter => genpdf::PaperSize::Letter,
            PaperSize::Legal => genpdf::PaperSize::Legal,
        }
    }
}

/// Layout and font settings applied when a document is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOptions {
    /// Title stored in the PDF metadata.
    pub title: String,
    /// Page format.
    pub paper_size: PaperSize,
    /// Margin applied to all four page edges, in millimetres.
    pub margin_mm: f64,
    /// Base font size in points.
    pub font_size: u8,
    /// Line spacing factor.
    pub line_spacing: f64,
    /// Vertical gap between consecutive paragraphs, in lines.
    pub paragraph_spacing: f64,
    /// Adds a centered `Page N` footer to every page.
    pub page_numbers: bool,
    /// Font lookup.
    pub fonts: FontConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            paper_size: PaperSize::default(),
            margin_mm: DEFAULT_MARGIN_MM,
            font_size: DEFAULT_FONT_SIZE,
            line_spacing: 1.0,
            paragraph_spacing: DEFAULT_PARAGRAPH_SPACING,
            page_numbers: false,
            fonts: FontConfig::default(),
        }
    }
}

/// The bytes of a rendered PDF.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPdf {
    /// Complete PDF file contents.
    pub bytes: Vec<u8>,
}

/// Collects blocks and renders them as a PDF.
///
/// ```no_run
/// use easy_pdf::{Paragraph, PdfBuilder, PdfWriter};
///
/// let mut builder = PdfBuilder::new();
/// builder.add(Paragraph::new("Hello world"));
/// PdfWriter::new(&builder).to_file("result.pdf")?;
/// # Ok::<(), easy_pdf::PdfError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct PdfBuilder {
    document: Document,
    options: RenderOptions,
}

impl PdfBuilder {
    /// Creates a builder holding an empty document and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder around an existing document.
    pub fn from_document(document: Document) -> Self {
        Self {
            document,
            options: RenderOptions::default(),
        }
    }

    /// Replaces the render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }

    /// Sets the paper size.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.options.paper_size = paper_size;
        self
    }

    /// Sets the page margin in millimetres.
    pub fn with_margin_mm(mut self, margin_mm: f64) -> Self {
        self.options.margin_mm = margin_mm;
        self
    }

    /// Enables or disables the page number footer.
    pub fn with_page_numbers(mut self, page_numbers: bool) -> Self {
        self.options.page_numbers = page_numbers;
        self
    }

    /// Sets the font configuration.
    pub fn with_fonts(mut self, fonts: FontConfig) -> Self {
        self.options.fonts = fonts;
        self
    }

    /// Appends a block to the document.
    pub fn add(&mut self, block: impl Into<Block>) -> &mut Self {
        self.document.push(block);
        self
    }

    /// Appends an unstyled paragraph to the document.
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Self {
        self.document.append_paragraph(text);
        self
    }

    /// Returns the document assembled so far.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Converts the document into a configured `genpdf::Document`.
    ///
    /// Fonts are loaded on every call; the builder itself is left untouched.
    pub fn build(&self) -> Result<genpdf::Document> {
        let font_family = fonts::load_font_family(&self.options.fonts)?;
        let mut document = genpdf::Document::new(font_family);

        document.set_title(self.options.title.as_str());
        document.set_paper_size(genpdf::PaperSize::from(self.options.paper_size));
        document.set_font_size(self.options.font_size);
        document.set_line_spacing(self.options.line_spacing);
        document.set_page_decorator(ConfiguredPageDecorator::new(
            Margins::from(mm_from_f64(self.options.margin_mm)),
            self.options.page_numbers,
        ));

        let mut previous_was_paragraph = false;
        for block in self.document.blocks() {
            match block {
                Block::Paragraph(paragraph) => {
                    if previous_was_paragraph && self.options.paragraph_spacing > 0.0 {
                        document.push(Break::new(self.options.paragraph_spacing));
                    }
                    document.push(paragraph_element(paragraph));
                    previous_was_paragraph = true;
                }
                Block::PageBreak => {
                    document.push(PageBreak::new());
                    previous_was_paragraph = false;
                }
            }
        }

        debug!(
            "Prepared '{}' with {} block(s)",
            self.options.title,
            self.document.len()
        );

        Ok(document)
    }

    /// Renders the document into memory.
    pub fn render(&self) -> Result<RenderedPdf> {
        let mut bytes = Vec::new();
        self.render_to(&mut bytes)?;
        Ok(RenderedPdf { bytes })
    }

    /// Renders the document into `sink`.
    pub fn render_to(&self, sink: impl Write) -> Result<()> {
        self.build()?.render(sink).map_err(PdfError::Render)
    }
}

fn alignment(alignment: HorizontalAlignment) -> Alignment {
    match alignment {
        HorizontalAlignment::Left => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

fn span_style(span: &Span) -> Style {
    let mut style = Style::new();
    if span.is_bold() {
        style.set_bold();
    }
    if span.is_italic() {
        style.set_italic();
    }
    if let Some(color) = span.color() {
        style.set_color(PdfColor::Rgb(color.r, color.g, color.b));
    }
    style
}

fn styled_string(span: &Span) -> StyledString {
    StyledString::new(span.text().to_owned(), span_style(span))
}

fn paragraph_element(paragraph: &Paragraph) -> elements::Paragraph {
    let mut element = elements::Paragraph::default();
    for span in paragraph.spans() {
        element.push(styled_string(span));
    }
    element.set_alignment(alignment(paragraph.alignment()));
    element
}

struct ConfiguredPageDecorator {
    page: usize,
    margins: Margins,
    page_numbers: bool,
}

impl ConfiguredPageDecorator {
    fn new(margins: Margins, page_numbers: bool) -> Self {
        Self {
            page: 0,
            margins,
            page_numbers,
        }
    }
}

impl PageDecorator for ConfiguredPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        area.add_margins(self.margins);

        if self.page_numbers {
            let footer_height = mm_from_f64(FOOTER_HEIGHT_MM);
            let available = area.size().height;
            if footer_height > available {
                return Err(Error::new(
                    "Footer height exceeds available space",
                    ErrorKind::InvalidData,
                ));
            }

            let mut footer_area = area.clone();
            footer_area.add_offset(Position::new(0, available - footer_height));
            let mut footer = elements::Paragraph::new(format!("Page {}", self.page))
                .aligned(Alignment::Center);
            let result = footer.render(
                context,
                footer_area,
                style.with_font_size(FOOTER_FONT_SIZE),
            )?;
            if result.has_more {
                return Err(Error::new(
                    "Page number does not fit into the reserved footer",
                    ErrorKind::PageSizeExceeded,
                ));
            }

            area.set_height(available - footer_height);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn add_keeps_blocks_in_order() {
        let mut builder = PdfBuilder::new();
        builder
            .add_paragraph("one")
            .add(Block::PageBreak)
            .add(Paragraph::new("two"));

        let blocks = builder.document().blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::paragraph("one"));
        assert_eq!(blocks[1], Block::PageBreak);
        assert_eq!(blocks[2], Block::paragraph("two"));
    }

    #[test]
    fn options_have_sensible_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.paper_size, PaperSize::A4);
        assert_eq!(options.font_size, DEFAULT_FONT_SIZE);
        assert!(!options.page_numbers);
        assert!(!options.fonts.is_builtin());
    }

    #[test]
    fn with_methods_update_options() {
        let builder = PdfBuilder::new()
            .with_title("Quarterly")
            .with_paper_size(PaperSize::Letter)
            .with_margin_mm(20.0)
            .with_page_numbers(true);

        let options = builder.options();
        assert_eq!(options.title, "Quarterly");
        assert_eq!(options.paper_size, PaperSize::Letter);
        assert_eq!(options.margin_mm, 20.0);
        assert!(options.page_numbers);
    }

    #[test]
    fn span_style_reflects_flags() {
        let span = Span::new("Hello")
            .bold()
            .italic()
            .colored(Color::rgb(10, 20, 30));
        let styled = styled_string(&span);
        assert_eq!(styled.s, "Hello");
        assert!(styled.style.is_bold());
        assert!(styled.style.is_italic());
        assert_eq!(styled.style.color(), Some(PdfColor::Rgb(10, 20, 30)));
    }

    #[test]
    fn build_reports_missing_fonts() {
        let mut builder = PdfBuilder::new()
            .with_fonts(FontConfig::new().with_directory("/__easy_pdf_missing_fonts__"));
        builder.add_paragraph("unreachable");

        assert!(matches!(builder.build(), Err(PdfError::FontLoad(_))));
    }
}
