use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use easy_pdf::inspect;
use easy_pdf::sample::{self, DEFAULT_OUTPUT};
use easy_pdf::{Block, FontConfig, Paragraph, PaperSize, PdfBuilder, PdfWriter};

/// Writes paragraphs to a PDF file.
///
/// Without a subcommand the sample document (one "Hello world" paragraph) is
/// written to `result.pdf` in the current directory.
#[derive(Parser)]
#[command(author, version, about = "Assemble paragraphs into a PDF document")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one paragraph per TEXT argument.
    Write(WriteArgs),

    /// Print the text lines of a PDF rendered with built-in fonts.
    #[command(alias = "read")]
    Inspect {
        /// PDF file to read.
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct WriteArgs {
    /// Paragraph texts, in order.
    #[arg(value_name = "TEXT", required = true)]
    texts: Vec<String>,

    /// Output file.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Title stored in the PDF metadata.
    #[arg(long)]
    title: Option<String>,

    /// Interpret TEXT as inline markup (**bold**, *italic*, [color=#RRGGBB]{...}).
    #[arg(long)]
    markup: bool,

    /// Paper size.
    #[arg(long, value_enum, default_value_t = Paper::A4)]
    paper: Paper,

    /// Reference the built-in Helvetica fonts instead of embedding fonts.
    #[arg(long)]
    builtin_fonts: bool,

    /// Directory holding the font family files; disables the font search.
    #[arg(long, value_name = "DIR")]
    fonts_dir: Option<PathBuf>,

    /// Add a page number footer.
    #[arg(long)]
    page_numbers: bool,

    /// Start every paragraph after the first on a new page.
    #[arg(long)]
    page_break_between: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Paper {
    A4,
    Letter,
    Legal,
}

impl From<Paper> for PaperSize {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::A4 => PaperSize::A4,
            Paper::Letter => PaperSize::Letter,
            Paper::Legal => PaperSize::Legal,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn Error>> = match cli.command {
        None => sample::hello_world(DEFAULT_OUTPUT).map_err(Into::into),
        Some(Commands::Write(args)) => write(args),
        Some(Commands::Inspect { input }) => print_lines(input),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn write(args: WriteArgs) -> Result<(), Box<dyn Error>> {
    let mut fonts = FontConfig::new().with_builtin(args.builtin_fonts);
    if let Some(directory) = args.fonts_dir {
        fonts = fonts.with_directory(directory);
    }

    let mut builder = PdfBuilder::new()
        .with_paper_size(args.paper.into())
        .with_page_numbers(args.page_numbers)
        .with_fonts(fonts);
    if let Some(title) = args.title {
        builder = builder.with_title(title);
    }

    for (index, text) in args.texts.iter().enumerate() {
        if index > 0 && args.page_break_between {
            builder.add(Block::PageBreak);
        }
        let paragraph = if args.markup {
            Paragraph::from_markup(text)?
        } else {
            Paragraph::new(text.as_str())
        };
        builder.add(paragraph);
    }

    PdfWriter::new(&builder).to_file(&args.output)?;
    log::info!("Generated {}", args.output.display());
    Ok(())
}

fn print_lines(input: PathBuf) -> Result<(), Box<dyn Error>> {
    for page in inspect::extract_lines_from_file(&input)? {
        println!("--- page {} ---", page.page_number);
        for line in page.lines {
            println!("{line}");
        }
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
