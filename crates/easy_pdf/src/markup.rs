//! A small inline markup language for styled paragraphs.
//!
//! Supported constructs:
//!
//! - `**bold**`
//! - `*italic*`
//! - `[color=#RRGGBB]{colored text}`
//! - `\` escapes the following character, e.g. `\*` for a literal asterisk
//!
//! Markers nest, so `**bold *and italic***` is valid.  Only the innermost open
//! marker can be closed at any point.

use crate::model::{Color, Span};

/// Error returned by [`parse_markup`] for malformed input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (at byte {index})")]
pub struct MarkupError {
    index: usize,
    message: String,
}

impl MarkupError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte offset in the input at which the problem was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Color(Color),
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Color(_) => "}",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Italic => "italic span",
            Marker::Color(_) => "color span",
        }
    }
}

const COLOR_PREFIX: &str = "[color=#";

struct Parser<'a> {
    input: &'a str,
    index: usize,
    open: Vec<Marker>,
    buffer: String,
    spans: Vec<Span>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            index: 0,
            open: Vec::new(),
            buffer: String::new(),
            spans: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn current_span(&self, text: String) -> Span {
        self.open
            .iter()
            .fold(Span::new(text), |span, marker| match marker {
                Marker::Bold => span.bold(),
                Marker::Italic => span.italic(),
                Marker::Color(color) => span.colored(*color),
            })
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let text = std::mem::take(&mut self.buffer);
            let span = self.current_span(text);
            self.spans.push(span);
        }
    }

    fn push_marker(&mut self, marker: Marker, consumed: usize) {
        self.flush();
        self.open.push(marker);
        self.index += consumed;
    }

    fn run(mut self) -> Result<Vec<Span>, MarkupError> {
        while let Some(ch) = self.rest().chars().next() {
            let rest = self.rest();

            if let Some(&innermost) = self.open.last() {
                let token = innermost.closing_token();
                if rest.starts_with(token) {
                    self.flush();
                    self.open.pop();
                    self.index += token.len();
                    continue;
                }
            }

            match ch {
                '\\' => {
                    let escaped = rest[1..].chars().next().ok_or_else(|| {
                        MarkupError::new(self.index, "dangling escape at end of input")
                    })?;
                    self.buffer.push(escaped);
                    self.index += 1 + escaped.len_utf8();
                }
                '*' if rest.starts_with("**") => self.push_marker(Marker::Bold, 2),
                '*' => self.push_marker(Marker::Italic, 1),
                '[' => {
                    let (color, consumed) = parse_color_directive(rest, self.index)?;
                    self.push_marker(Marker::Color(color), consumed);
                }
                '}' => {
                    return Err(MarkupError::new(
                        self.index,
                        "unexpected `}` without an open `[color=...]{`",
                    ))
                }
                ']' => return Err(MarkupError::new(self.index, "unexpected `]`")),
                _ => {
                    self.buffer.push(ch);
                    self.index += ch.len_utf8();
                }
            }
        }

        if let Some(marker) = self.open.last() {
            return Err(MarkupError::new(
                self.index,
                format!("unterminated {}", marker.name()),
            ));
        }

        self.flush();
        Ok(self.spans)
    }
}

/// Returns the parsed color and the number of bytes making up `[color=#RRGGBB]{`.
fn parse_color_directive(rest: &str, offset: usize) -> Result<(Color, usize), MarkupError> {
    if !rest.starts_with(COLOR_PREFIX) {
        return Err(MarkupError::new(
            offset,
            "unsupported directive; expected `[color=#RRGGBB]{...}`",
        ));
    }

    let hex_start = COLOR_PREFIX.len();
    let hex = rest
        .get(hex_start..hex_start + 6)
        .ok_or_else(|| MarkupError::new(offset + hex_start, "expected 6 hexadecimal digits"))?;
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| {
            MarkupError::new(
                offset + hex_start,
                "invalid RGB value; use hexadecimal digits only",
            )
        })
    };
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MarkupError::new(
            offset + hex_start,
            "invalid RGB value; use hexadecimal digits only",
        ));
    }
    let color = Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?);

    let close = hex_start + 6;
    if !rest[close..].starts_with("]{") {
        return Err(MarkupError::new(
            offset + close,
            "expected `]{` after the color value",
        ));
    }

    Ok((color, close + 2))
}

/// Parses inline markup into styled spans.
///
/// Empty spans are never produced, so an empty input yields an empty vector.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, MarkupError> {
    Parser::new(input).run()
}
