//! exampdf CLI - exam question extraction tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use exampdf::inspect::DEFAULT_INSPECT_PAGES;
use exampdf::render::{bind_pdfium, write_outputs};
use exampdf::{
    CapturePolicy, ErrorMode, ExtractOptions, Extractor, OutputOptions, PageSelection,
    ParseOptions, PdfParser, PdfiumRasterizer, TagOptions,
};

#[derive(Parser)]
#[command(name = "exampdf")]
#[command(version)]
#[command(about = "Extract exam questions and figures from two-column PDF papers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract questions into questions.js and official_survey.json
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// How figures are located
        #[arg(long, value_enum, default_value = "graphics")]
        policy: Policy,

        /// Zoom factor for captured figures
        #[arg(long, default_value = "2.0")]
        zoom: f32,

        /// Discard gap-probe figures smaller than this many bytes
        #[arg(long, default_value = "1500")]
        min_image_bytes: usize,

        /// Minimum stem/options gap for gap-probe capture, in points
        #[arg(long, default_value = "10")]
        min_gap: f32,

        /// PDFium shared library or the directory containing it
        #[arg(long, value_name = "PATH", env = "EXAMPDF_PDFIUM_LIB")]
        pdfium_lib: Option<PathBuf>,

        /// Stop at the first unreadable page instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Variable assigned in questions.js
        #[arg(long, value_name = "NAME", default_value = "questionData")]
        variable: String,
    },

    /// Add subject and difficulty tags to an extracted dataset
    Tag {
        /// Directory containing official_survey.json
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Last page of the first subject
        #[arg(long, default_value = "25")]
        split_page: u32,

        /// Variable assigned in questions.js
        #[arg(long, value_name = "NAME", default_value = "questionData")]
        variable: String,
    },

    /// Report drawings and images per page
    Inspect {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (defaults to the first pages)
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Capture question regions that overlap drawings or images
    Graphics,
    /// Capture tall gaps between a stem and its options
    GapProbe,
}

impl From<Policy> for CapturePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Graphics => CapturePolicy::Graphics,
            Policy::GapProbe => CapturePolicy::GapProbe,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            pages,
            policy,
            zoom,
            min_image_bytes,
            min_gap,
            pdfium_lib,
            strict,
            variable,
        } => {
            let options = ExtractOptions::new()
                .with_policy(policy.into())
                .with_zoom(zoom)
                .with_min_image_bytes(min_image_bytes)
                .with_min_gap_height(min_gap);
            let output_options = OutputOptions::new()
                .with_output_dir(output)
                .with_variable(variable);
            cmd_extract(
                &input,
                &output_options,
                pages.as_deref(),
                options,
                pdfium_lib.as_deref(),
                strict,
            )
        }
        Commands::Tag {
            dir,
            split_page,
            variable,
        } => {
            let output_options = OutputOptions::new().with_output_dir(dir).with_variable(variable);
            cmd_tag(&output_options, split_page)
        }
        Commands::Inspect { input, pages } => cmd_inspect(&input, pages.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), report_error(e.as_ref()));
        std::process::exit(1);
    }
}

/// Log `err` with its debug form and build the user-facing message,
/// appending causes the top-level message does not already show.
fn report_error(err: &(dyn std::error::Error + 'static)) -> String {
    log::error!("{:?}", err);
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

fn page_selection(pages: Option<&str>, default: PageSelection) -> exampdf::Result<PageSelection> {
    match pages {
        Some(p) => PageSelection::parse(p),
        None => Ok(default),
    }
}

fn cmd_extract(
    input: &Path,
    output_options: &OutputOptions,
    pages: Option<&str>,
    options: ExtractOptions,
    pdfium_lib: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let error_mode = if strict {
        ErrorMode::Strict
    } else {
        ErrorMode::Lenient
    };
    let parse_options = ParseOptions::new()
        .with_error_mode(error_mode)
        .with_pages(page_selection(pages, PageSelection::All)?);
    let parser = PdfParser::open_with_options(input, parse_options)?;
    log::debug!("{} pages in {}", parser.page_count(), input.display());

    let pdfium = bind_pdfium(pdfium_lib)?;
    let mut rasterizer = PdfiumRasterizer::open(&pdfium, input)?;

    let mut extractor = Extractor::new(
        options,
        output_options.image_dir(),
        output_options.images_dir.clone(),
    );
    extractor.prepare_image_dir()?;

    let selected = parser.selected_pages();
    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut skipped = 0;
    for page_num in selected {
        pb.set_message(format!("page {}", page_num));
        match parser.read_page(page_num)? {
            Some(layout) => {
                extractor.process_page(&layout, &mut rasterizer);
            }
            None => skipped += 1,
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let records = extractor.finish();
    write_outputs(&records, output_options)?;

    let images = records.iter().filter(|r| r.has_image()).count();
    println!(
        "\n{} {} questions extracted ({} with figures)",
        "Done!".green().bold(),
        records.len(),
        images
    );
    if skipped > 0 {
        println!("{} {} pages skipped", "Warning:".yellow(), skipped);
    }
    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), output_options.script_file);
    println!("  {} {}", "├─".dimmed(), output_options.json_file);
    println!("  {} {}/", "└─".dimmed(), output_options.images_dir);

    Ok(())
}

fn cmd_tag(output: &OutputOptions, split_page: u32) -> Result<(), Box<dyn std::error::Error>> {
    let options = TagOptions::new().with_split_page(split_page);
    let summary = exampdf::tag_dataset(output, &options)?;

    println!(
        "{} {} questions tagged",
        "Done!".green().bold(),
        summary.tagged + summary.skipped
    );
    if summary.skipped > 0 {
        println!(
            "{} {} without a page number got default tags",
            "Warning:".yellow(),
            summary.skipped
        );
    }
    Ok(())
}

fn cmd_inspect(input: &Path, pages: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let selection = page_selection(pages, PageSelection::first(DEFAULT_INSPECT_PAGES))?;
    let parser = PdfParser::open_with_options(input, ParseOptions::new().lenient().with_pages(selection))?;

    println!("{}: {}", "Total pages".bold(), parser.page_count());
    for report in exampdf::inspect::inspect(&parser)? {
        println!("{}", report);
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "exampdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Exam question extraction tool");
    println!();
    println!("License: MIT");
}
