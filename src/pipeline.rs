use std::path::Path;

use anyhow::{Context, Result};
use image::ImageReader;

use crate::config::ExtractConfig;
use crate::core::model::{Difficulty, QuestionRecord};
use crate::core::numbering::{letter_position, question_id, QuestionId};
use crate::diagram::{DiagramClassifier, DiagramOutcome, DiagramRegionEstimator};
use crate::export::{DiagramMapExporter, Exporter, JsonExporter};
use crate::ocr::{OcrEngine, TesseractOcr};
use crate::page::{GraphicsBridge, PageRenderer, PdfReader};
use crate::segment::{Segmented, TextSegmenter};

#[derive(Debug, Clone)]
pub struct SkippedPage {
    pub page_idx: usize,
    pub question_number: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_records: usize,
    pub multiple_choice: usize,
    pub complete_option_sets: usize,
    pub free_form: usize,
    pub with_diagrams: usize,
    pub skipped_pages: Vec<SkippedPage>,
}

impl RunSummary {
    pub fn from_records(records: &[QuestionRecord], skipped_pages: Vec<SkippedPage>) -> Self {
        Self {
            total_records: records.len(),
            multiple_choice: records.iter().filter(|r| r.is_multiple_choice()).count(),
            complete_option_sets: records.iter().filter(|r| r.has_complete_options()).count(),
            free_form: records.iter().filter(|r| !r.is_multiple_choice()).count(),
            with_diagrams: records.iter().filter(|r| r.has_image).count(),
            skipped_pages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOutput {
    pub records: Vec<QuestionRecord>,
    pub summary: RunSummary,
}

/// Verifies every external collaborator before any page work starts.
/// A missing one aborts the run with no partial output.
pub fn preflight() -> Result<()> {
    TesseractOcr::preflight()?;
    check_tool("pdftoppm", &["-v"])?;
    check_tool("pdfinfo", &["-v"])?;
    GraphicsBridge::new().preflight()?;
    Ok(())
}

fn check_tool(binary: &str, args: &[&str]) -> Result<()> {
    let output = std::process::Command::new(binary)
        .args(args)
        .output()
        .with_context(|| format!("{binary} not found; install it before running"))?;
    if !output.status.success() {
        anyhow::bail!("{binary} check failed with status: {}", output.status);
    }
    Ok(())
}

/// Walks every page of one exam PDF in ascending order and collects
/// question records. Failures are absorbed at the page boundary: a
/// page that yields no OCR text is skipped (leaving an identifier
/// gap); a page whose diagram step fails still produces a record with
/// `hasImage=false`.
pub fn extract_document(config: &ExtractConfig) -> Result<ExtractOutput> {
    let reader = PdfReader::new(config.input.clone())?;
    let page_count = reader.page_count()?;

    let renderer = PageRenderer::new(config.output_dir.join("pages"), config.dpi);
    let ocr = TesseractOcr::new(&config.ocr_lang);
    let segmenter = TextSegmenter::new(config.stem_fraction);
    let bridge = GraphicsBridge::new();
    let estimator = DiagramRegionEstimator::for_family(&config.family);
    let classifier = DiagramClassifier::new(config.image_dir.clone(), config.diagram_threshold);

    if !config.quiet {
        println!(
            "[*] {} pages (contests 1-{})",
            page_count,
            page_count / config.family.group_size
        );
    }

    let mut records = Vec::with_capacity(page_count);
    let mut skipped = Vec::new();

    for page_idx in 0..page_count {
        let id = question_id(page_idx, config.family.group_size);
        if !config.quiet {
            println!("  [{}] page {}/{}", id, page_idx + 1, page_count);
        }

        match process_page(
            config, &renderer, &ocr, &segmenter, &bridge, &estimator, &classifier, page_idx, id,
        ) {
            Ok(record) => records.push(record),
            Err(e) => {
                eprintln!("  [!] skipping page {}: {e:#}", page_idx + 1);
                skipped.push(SkippedPage {
                    page_idx,
                    question_number: id.to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }

    let summary = RunSummary::from_records(&records, skipped);
    Ok(ExtractOutput { records, summary })
}

#[allow(clippy::too_many_arguments)]
fn process_page(
    config: &ExtractConfig,
    renderer: &PageRenderer,
    ocr: &dyn OcrEngine,
    segmenter: &TextSegmenter,
    bridge: &GraphicsBridge,
    estimator: &DiagramRegionEstimator,
    classifier: &DiagramClassifier,
    page_idx: usize,
    id: QuestionId,
) -> Result<QuestionRecord> {
    let image_path = renderer.render_page(&config.input, page_idx)?;
    let raw_text = ocr.recognize(&image_path)?;
    if raw_text.trim().is_empty() {
        anyhow::bail!("OCR produced no text");
    }

    let segmented = segmenter.segment(&raw_text);

    // Diagram work is best-effort: any failure on this side downgrades
    // the record to hasImage=false instead of losing the page.
    let outcome = classify_diagram(config, bridge, estimator, classifier, &image_path, page_idx, id)
        .unwrap_or_else(|e| {
            eprintln!("  [!] diagram step failed for {}: {e:#}", id);
            DiagramOutcome {
                has_diagram: false,
                artifact: None,
            }
        });

    Ok(assemble_record(config, page_idx, id, segmented, outcome))
}

fn classify_diagram(
    config: &ExtractConfig,
    bridge: &GraphicsBridge,
    estimator: &DiagramRegionEstimator,
    classifier: &DiagramClassifier,
    rendered_page: &Path,
    page_idx: usize,
    id: QuestionId,
) -> Result<DiagramOutcome> {
    let graphics = bridge.run(&config.input, page_idx)?;

    let Some(region) = estimator.estimate(&graphics) else {
        return Ok(DiagramOutcome {
            has_diagram: false,
            artifact: None,
        });
    };

    let page_image = ImageReader::open(rendered_page)
        .with_context(|| format!("failed to open rendered page {}", rendered_page.display()))?
        .decode()
        .with_context(|| "failed to decode rendered page")?;

    let file_name = diagram_file_name(config, id);
    classifier.classify_and_store(&page_image, &region, &file_name)
}

fn diagram_file_name(config: &ExtractConfig, id: QuestionId) -> String {
    format!(
        "{}-{}-{}.png",
        config.family.output_prefix, config.exam_year, id
    )
}

/// Merges the identifier, segmentation, and diagram outcome into one
/// record. Difficulty comes from the letter position alone.
fn assemble_record(
    config: &ExtractConfig,
    page_idx: usize,
    id: QuestionId,
    segmented: Segmented,
    outcome: DiagramOutcome,
) -> QuestionRecord {
    let image_url = outcome
        .has_diagram
        .then(|| format!("{}/{}", config.image_url_prefix, diagram_file_name(config, id)));

    QuestionRecord {
        exam_name: config.family.exam_name.clone(),
        exam_year: config.exam_year,
        question_number: id.to_string(),
        question_text: segmented.stem,
        options: segmented.options,
        has_image: outcome.has_diagram,
        image_url,
        topic: config.family.topic.clone(),
        difficulty: difficulty_for_position(
            letter_position(page_idx, config.family.group_size),
            config.family.group_size,
        ),
    }
}

/// First letter EASY, letters up to the midpoint MEDIUM, the rest
/// HARD. For a group of five: A easy, B/C medium, D/E hard.
pub fn difficulty_for_position(position: usize, group_size: usize) -> Difficulty {
    if position == 0 {
        Difficulty::Easy
    } else if position <= group_size.saturating_sub(1) / 2 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

pub fn export_records(records: &[QuestionRecord], output_dir: &Path) -> Result<()> {
    let json_exporter = JsonExporter::new(output_dir.to_path_buf());
    json_exporter.export(records)?;

    let map_exporter = DiagramMapExporter::new(output_dir.to_path_buf());
    map_exporter.export(records)?;

    Ok(())
}
