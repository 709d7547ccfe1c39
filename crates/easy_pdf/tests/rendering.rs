use std::fs;
use std::path::Path;

use easy_pdf::inspect::{self, PageLines};
use easy_pdf::{fonts, sample, Block, FontConfig, Paragraph, PdfBuilder, PdfError, PdfWriter};
use sha2::{Digest, Sha256};

fn fonts_available(test: &str) -> bool {
    let available = fonts::default_fonts_available();
    if !available {
        eprintln!(
            "Skipping {test}: no font family found. Set EASY_PDF_FONTS_DIR or install Liberation/DejaVu fonts."
        );
    }
    available
}

fn readable_builder() -> PdfBuilder {
    PdfBuilder::new().with_fonts(FontConfig::new().with_builtin(true))
}

fn lines_of(path: &Path) -> Vec<PageLines> {
    inspect::extract_lines_from_file(path).expect("read back rendered pdf")
}

fn render_sample_pdf() -> Vec<u8> {
    let mut builder = PdfBuilder::new();
    builder.add(Paragraph::from_markup("Hello, **PDF**!").expect("valid markup"));
    builder.render().expect("render sample pdf").bytes
}

/// Blanks out values that legitimately change between renders: timestamps,
/// document ids and the producer string, in both the info dictionary and the
/// XMP packet.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn blank_between(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while let Some(found) = find(&data[offset..], start) {
            let value_start = offset + found + start.len();
            let Some(length) = find(&data[value_start..], end) else {
                break;
            };
            for byte in &mut data[value_start..value_start + length] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = value_start + length + end.len();
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    let markers: [(&[u8], &[u8]); 10] = [
        (b"/CreationDate(", b")"),
        (b"/ModDate(", b")"),
        (b"/ID[", b"]"),
        (b"/Producer(", b")"),
        (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
        (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
        (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
        (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
        (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
        (b"<xmpMM:VersionID>", b"</xmpMM:VersionID>"),
    ];

    let mut normalized = bytes.to_vec();
    for (start, end) in markers {
        blank_between(&mut normalized, start, end);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_pdf_header() {
    if !fonts_available("renders_pdf_header") {
        return;
    }
    let bytes = render_sample_pdf();
    assert!(bytes.starts_with(b"%PDF-"), "output should be a PDF file");
}

#[test]
fn rendering_is_deterministic() {
    if !fonts_available("rendering_is_deterministic") {
        return;
    }
    let bytes_a = render_sample_pdf();
    let bytes_b = render_sample_pdf();

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn hello_world_reads_back_as_one_line() {
    if !fonts_available("hello_world_reads_back_as_one_line") {
        return;
    }
    let scratch = tempfile::tempdir().expect("create scratch dir");
    let target = scratch.path().join(sample::DEFAULT_OUTPUT);

    sample::hello_world_with(readable_builder(), &target).expect("write sample");

    let pages = lines_of(&target);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].lines, [sample::SAMPLE_TEXT]);
}

#[test]
fn paragraphs_read_back_in_insertion_order() {
    if !fonts_available("paragraphs_read_back_in_insertion_order") {
        return;
    }
    let scratch = tempfile::tempdir().expect("create scratch dir");
    let target = scratch.path().join("ordered.pdf");

    let mut builder = readable_builder();
    builder
        .add_paragraph("first")
        .add_paragraph("second")
        .add(Block::PageBreak)
        .add_paragraph("third");
    PdfWriter::new(&builder).to_file(&target).expect("write pdf");

    let pages = lines_of(&target);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].lines, ["first", "second"]);
    assert_eq!(pages[1].lines, ["third"]);
}

#[test]
fn empty_document_is_a_valid_pdf() {
    if !fonts_available("empty_document_is_a_valid_pdf") {
        return;
    }
    let bytes = readable_builder().render().expect("render empty document").bytes;

    let pages = inspect::extract_lines(&bytes).expect("parse empty document");
    assert_eq!(pages.len(), 1);
    assert!(pages[0].lines.is_empty());
}

#[test]
fn writing_twice_replaces_the_file() {
    if !fonts_available("writing_twice_replaces_the_file") {
        return;
    }
    let scratch = tempfile::tempdir().expect("create scratch dir");
    let target = scratch.path().join("twice.pdf");

    let mut first = readable_builder();
    for index in 0..40 {
        first.add_paragraph(format!("filler paragraph {index}"));
    }
    PdfWriter::new(&first).to_file(&target).expect("first write");
    let first_len = fs::metadata(&target).expect("stat first write").len();

    let mut second = readable_builder();
    second.add_paragraph("replacement");
    PdfWriter::new(&second).to_file(&target).expect("second write");

    assert!(fs::metadata(&target).expect("stat second write").len() < first_len);
    assert_eq!(lines_of(&target)[0].lines, ["replacement"]);
    let entries = fs::read_dir(scratch.path()).expect("list scratch dir").count();
    assert_eq!(entries, 1, "no staging files may be left behind");
}

#[test]
fn write_to_streams_the_same_document() {
    if !fonts_available("write_to_streams_the_same_document") {
        return;
    }
    let mut builder = readable_builder();
    builder.add_paragraph("streamed");

    let mut sink = Vec::new();
    PdfWriter::new(&builder).write_to(&mut sink).expect("stream pdf");

    let pages = inspect::extract_lines(&sink).expect("parse streamed pdf");
    assert_eq!(pages[0].lines, ["streamed"]);
}

#[test]
fn page_numbers_are_rendered_in_the_footer() {
    if !fonts_available("page_numbers_are_rendered_in_the_footer") {
        return;
    }
    let mut builder = readable_builder().with_page_numbers(true);
    builder.add_paragraph("numbered");

    let bytes = builder.render().expect("render numbered document").bytes;
    let pages = inspect::extract_lines(&bytes).expect("parse numbered document");
    assert!(pages[0].lines.iter().any(|line| line == "Page 1"));
    assert!(pages[0].lines.iter().any(|line| line == "numbered"));
}

#[test]
fn missing_parent_directory_fails_without_output() {
    let scratch = tempfile::tempdir().expect("create scratch dir");
    let target = scratch.path().join("absent").join("result.pdf");

    let err = sample::hello_world(&target).expect_err("parent is missing");

    assert!(matches!(err, PdfError::Io { .. }));
    assert!(!target.exists());
}
