//! Reads text back out of rendered PDFs with `lopdf`.
//!
//! Each text object (`BT … ET`) of a page content stream becomes one line,
//! built from the string operands of its text-showing operators.  Documents
//! rendered with embedded TrueType fonts store glyph ids rather than
//! characters, so the output is only meaningful for documents rendered with
//! [`FontConfig::with_builtin`](crate::fonts::FontConfig::with_builtin).
//! Those show their text as hexadecimal strings of UTF-16BE code units.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, StringFormat};

use crate::error::{PdfError, Result};

/// Text lines found on one page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLines {
    /// 1-based page number.
    pub page_number: u32,
    /// Lines in content-stream order, trailing whitespace removed.
    pub lines: Vec<String>,
}

/// Extracts the text lines of every page in `bytes`.
pub fn extract_lines(bytes: &[u8]) -> Result<Vec<PageLines>> {
    let mut document = Document::load_mem(bytes)?;
    document.decompress();

    document
        .get_pages()
        .into_iter()
        .map(|(page_number, page_id)| -> Result<PageLines> {
            let raw = document.get_page_content(page_id)?;
            let content = Content::decode(&raw)?;
            Ok(PageLines {
                page_number,
                lines: lines_from_operations(&content.operations),
            })
        })
        .collect()
}

/// Reads `path` and extracts its text lines.
pub fn extract_lines_from_file(path: impl AsRef<Path>) -> Result<Vec<PageLines>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| PdfError::io(path, err))?;
    extract_lines(&bytes)
}

fn lines_from_operations(operations: &[Operation]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for operation in operations {
        match operation.operator.as_str() {
            "BT" => current = Some(String::new()),
            "ET" => {
                if let Some(line) = current.take() {
                    let trimmed = line.trim_end();
                    if !trimmed.is_empty() {
                        lines.push(trimmed.to_owned());
                    }
                }
            }
            "Tj" | "TJ" | "'" | "\"" => {
                if let Some(line) = current.as_mut() {
                    for operand in &operation.operands {
                        append_text(line, operand);
                    }
                }
            }
            _ => {}
        }
    }

    lines
}

fn append_text(line: &mut String, operand: &Object) {
    match operand {
        Object::String(bytes, format) => line.push_str(&decode_string(bytes, format)),
        Object::Array(items) => items.iter().for_each(|item| append_text(line, item)),
        _ => {}
    }
}

fn decode_string(bytes: &[u8], format: &StringFormat) -> String {
    if matches!(format, StringFormat::Hexadecimal) && bytes.len() % 2 == 0 {
        let units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => bytes.iter().map(|&byte| char::from(byte)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(text: &str) -> Operation {
        Operation::new(
            "Tj",
            vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
        )
    }

    #[test]
    fn each_text_object_is_a_line() {
        let operations = vec![
            Operation::new("BT", vec![]),
            show("Hello "),
            show("world"),
            Operation::new("ET", vec![]),
            Operation::new("BT", vec![]),
            show("second  "),
            Operation::new("ET", vec![]),
        ];

        assert_eq!(lines_from_operations(&operations), ["Hello world", "second"]);
    }

    #[test]
    fn positioned_arrays_are_flattened() {
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![
                    Object::String(b"Hel".to_vec(), StringFormat::Literal),
                    Object::Integer(-20),
                    Object::String(vec![0, b'l', 0, b'o'], StringFormat::Hexadecimal),
                ])],
            ),
            Operation::new("ET", vec![]),
        ];

        assert_eq!(lines_from_operations(&operations), ["Hello"]);
    }

    #[test]
    fn text_outside_text_objects_is_ignored() {
        assert!(lines_from_operations(&[show("stray")]).is_empty());
    }

    #[test]
    fn latin1_literals_are_decoded() {
        assert_eq!(
            decode_string(&[0x43, 0x61, 0x66, 0xe9], &StringFormat::Literal),
            "Café"
        );
    }

    #[test]
    fn hex_strings_are_utf16_code_units() {
        assert_eq!(
            decode_string(&[0, 0x48, 0, 0x69], &StringFormat::Hexadecimal),
            "Hi"
        );
        assert_eq!(
            decode_string(&[0, 0x43, 0, 0x61, 0, 0x66, 0, 0xe9], &StringFormat::Hexadecimal),
            "Café"
        );
    }

    #[test]
    fn odd_length_hex_strings_fall_back_to_bytes() {
        assert_eq!(decode_string(b"abc", &StringFormat::Hexadecimal), "abc");
    }

    #[test]
    fn builtin_font_show_operation_reads_as_text() {
        let units: Vec<u8> = "Hello world"
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect();
        let operations = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "TJ",
                vec![Object::Array(vec![Object::String(
                    units,
                    StringFormat::Hexadecimal,
                )])],
            ),
            Operation::new("ET", vec![]),
        ];

        assert_eq!(lines_from_operations(&operations), ["Hello world"]);
    }

    #[test]
    fn garbage_is_an_inspect_error() {
        assert!(matches!(
            extract_lines(b"not a pdf"),
            Err(PdfError::Inspect(_))
        ));
    }
}
