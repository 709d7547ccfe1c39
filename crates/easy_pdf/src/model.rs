//! In-memory document model.
//!
//! These types describe *what* goes into a document without referencing the
//! rendering crate, so they can be built, compared and inspected without any
//! fonts being available.  Conversion into `genpdf` elements lives in
//! [`crate::builder`].

use crate::markup::{self, MarkupError};

/// An RGB color used for inline text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Horizontal alignment of a paragraph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// A run of text sharing the same inline style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates an unstyled span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns the span color, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Assigns a color to the span.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<&str> for Span {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Span {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A paragraph of text.
///
/// Paragraphs are immutable once constructed; the `with_*` methods consume the
/// value and return a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Paragraph {
    spans: Vec<Span>,
    alignment: HorizontalAlignment,
}

impl Paragraph {
    /// Creates a paragraph holding `text` as a single unstyled span.
    ///
    /// Empty text is accepted and renders as an empty line.
    pub fn new(text: impl Into<String>) -> Self {
        Self::from_spans(vec![Span::new(text)])
    }

    /// Creates a paragraph from pre-styled spans.
    pub fn from_spans(spans: impl Into<Vec<Span>>) -> Self {
        Self {
            spans: spans.into(),
            alignment: HorizontalAlignment::Left,
        }
    }

    /// Parses inline markup (see [`crate::markup`]) into a paragraph.
    pub fn from_markup(input: &str) -> Result<Self, MarkupError> {
        markup::parse_markup(input).map(Self::from_spans)
    }

    /// Returns the styled spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the plain text with all styling removed.
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Returns the alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns a copy of the paragraph with a different alignment.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// A unit of document content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// A paragraph of text.
    Paragraph(Paragraph),
    /// Forces the following blocks onto a new page.
    PageBreak,
}

impl Block {
    /// Shorthand for an unstyled paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(Paragraph::new(text))
    }

    /// Returns the paragraph if this block holds one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            Self::PageBreak => None,
        }
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Self::Paragraph(paragraph)
    }
}

/// An ordered sequence of blocks.
///
/// Blocks keep the order in which they were appended; layout depends on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a paragraph holding `text`.
    pub fn append_paragraph(&mut self, text: impl Into<String>) {
        self.push(Block::paragraph(text));
    }

    /// Appends a block.
    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }

    /// Returns all blocks in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Iterates over the paragraph blocks only.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Extend<Block> for Document {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        self.blocks.extend(iter);
    }
}
