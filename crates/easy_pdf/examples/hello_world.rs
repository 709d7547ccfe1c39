use std::error::Error;

use easy_pdf::{Paragraph, PdfBuilder, PdfWriter};

fn main() -> Result<(), Box<dyn Error>> {
    let mut builder = PdfBuilder::new();

    let paragraph = Paragraph::new("Hello world");

    builder.add(paragraph);

    let writer = PdfWriter::new(&builder);
    writer.to_file("result.pdf")?;

    println!("Generated result.pdf");
    Ok(())
}
