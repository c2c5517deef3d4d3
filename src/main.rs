use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use examstruct::config::{ExamFamily, ExtractConfig};
use examstruct::page::{find_exam_pdfs, parse_year_range, PdfReader};
use examstruct::pipeline::{export_records, extract_document, preflight, RunSummary};
use examstruct::QuestionRecord;

#[derive(Parser, Debug)]
#[command(name = "examstruct")]
#[command(version, about = "Extract structured questions and diagrams from exam PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract questions from a single exam PDF
    Extract {
        /// Input PDF file path
        input: PathBuf,

        /// Exam year (default: parsed from a YYYY-YYYY range in the filename)
        #[arg(short, long)]
        year: Option<u32>,

        /// Output directory (default: ./<input_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exam family, selects layout presets and naming
        #[arg(short, long, value_enum, default_value_t = Family::Moems)]
        family: Family,

        /// Rendering DPI for OCR and diagram crops
        #[arg(long, default_value_t = 216)]
        dpi: u32,

        /// Fraction of lines kept as the stem when no option marker exists
        #[arg(long, default_value_t = 0.7)]
        stem_fraction: f32,

        /// Minimum encoded crop size in bytes to count as a diagram
        #[arg(long, default_value_t = 5000)]
        diagram_threshold: usize,

        /// Suppress per-page progress
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract questions from every exam PDF in a directory
    Batch {
        /// Directory containing exam PDFs named with a YYYY-YYYY range
        input_dir: PathBuf,

        /// Output directory for the combined results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exam family, selects layout presets and naming
        #[arg(short, long, value_enum, default_value_t = Family::Moems)]
        family: Family,

        /// Rendering DPI for OCR and diagram crops
        #[arg(long, default_value_t = 216)]
        dpi: u32,
    },

    /// Show information about an exam PDF
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Family {
    Moems,
    Kangaroo,
}

impl Family {
    fn to_exam_family(self) -> ExamFamily {
        match self {
            Family::Moems => ExamFamily::moems(),
            Family::Kangaroo => ExamFamily::kangaroo(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            year,
            output,
            family,
            dpi,
            stem_fraction,
            diagram_threshold,
            quiet,
        } => extract_single(
            input,
            year,
            output,
            family,
            dpi,
            stem_fraction,
            diagram_threshold,
            quiet,
        ),
        Commands::Batch {
            input_dir,
            output,
            family,
            dpi,
        } => extract_batch(input_dir, output, family, dpi),
        Commands::Info { input } => show_info(input),
    }
}

#[allow(clippy::too_many_arguments)]
fn extract_single(
    input: PathBuf,
    year: Option<u32>,
    output: Option<PathBuf>,
    family: Family,
    dpi: u32,
    stem_fraction: f32,
    diagram_threshold: usize,
    quiet: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let exam_year = match year.or_else(|| parse_year_range(&file_name).map(|(_, end)| end)) {
        Some(y) => y,
        None => anyhow::bail!(
            "no YYYY-YYYY range in filename '{file_name}'; pass --year or rename the file"
        ),
    };

    let output_dir = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    preflight()?;

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Exam year: {exam_year}");
        println!("[*] Output: {}", output_dir.display());
    }

    let mut config = ExtractConfig::new(
        input.clone(),
        exam_year,
        output_dir.clone(),
        family.to_exam_family(),
    );
    config.dpi = dpi;
    config.stem_fraction = stem_fraction;
    config.diagram_threshold = diagram_threshold;
    config.quiet = quiet;

    let result = extract_document(&config)
        .with_context(|| format!("Failed to process PDF: {}", input.display()))?;

    export_records(&result.records, &config.output_dir)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    print_summary(&result.summary);

    if !quiet {
        println!("\n[✓] Done! Results saved to: {}", output_dir.display());
    }

    Ok(())
}

fn extract_batch(
    input_dir: PathBuf,
    output: Option<PathBuf>,
    family: Family,
    dpi: u32,
) -> Result<()> {
    if !input_dir.is_dir() {
        anyhow::bail!("Input is not a directory: {}", input_dir.display());
    }

    let (pdfs, excluded) = find_exam_pdfs(&input_dir)?;
    if pdfs.is_empty() {
        anyhow::bail!("No exam PDFs with a YYYY-YYYY range found in: {}", input_dir.display());
    }

    preflight()?;

    let base_output = output.unwrap_or_else(|| PathBuf::from("batch_output"));

    println!("[*] Batch processing {} file(s)", pdfs.len());
    for name in &excluded {
        println!("  [!] Excluded (no year range): {name}");
    }

    let mut all_records: Vec<QuestionRecord> = Vec::new();
    let mut all_skipped = Vec::new();
    let mut failed_docs = Vec::new();

    for (i, pdf) in pdfs.iter().enumerate() {
        println!(
            "\n[{}/{}] Processing: {} (year {})",
            i + 1,
            pdfs.len(),
            pdf.path.display(),
            pdf.exam_year
        );

        let mut config = ExtractConfig::new(
            pdf.path.clone(),
            pdf.exam_year,
            base_output.clone(),
            family.to_exam_family(),
        );
        config.dpi = dpi;

        match extract_document(&config) {
            Ok(result) => {
                all_skipped.extend(result.summary.skipped_pages.clone());
                all_records.extend(result.records);
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed_docs.push(pdf.path.display().to_string());
            }
        }
    }

    export_records(&all_records, &base_output)?;

    let summary = RunSummary::from_records(&all_records, all_skipped);
    print_summary(&summary);

    if !failed_docs.is_empty() {
        println!("\n[!] Failed documents:");
        for doc in &failed_docs {
            println!("  - {doc}");
        }
    }

    println!("\n[✓] Results saved to: {}", base_output.display());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n[*] Summary");
    println!("    Questions extracted: {}", summary.total_records);
    println!(
        "    Multiple choice: {} ({} with all 5 options)",
        summary.multiple_choice, summary.complete_option_sets
    );
    println!("    Free-form answer: {}", summary.free_form);
    println!("    With diagrams: {}", summary.with_diagrams);

    if !summary.skipped_pages.is_empty() {
        println!("    Skipped pages:");
        for page in &summary.skipped_pages {
            println!(
                "      - page {} ({}): {}",
                page.page_idx + 1,
                page.question_number,
                page.reason
            );
        }
    }
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let reader = PdfReader::new(input.clone())
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;
    let page_count = reader.page_count()?;

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!("Exam PDF Information");
    println!("====================");
    println!("File: {}", input.display());
    println!("Pages: {page_count}");
    match parse_year_range(&file_name) {
        Some((start, end)) => println!("Season: {start}-{end} (exam year {end})"),
        None => println!("Season: not found in filename (file would be excluded from a batch)"),
    }

    Ok(())
}
