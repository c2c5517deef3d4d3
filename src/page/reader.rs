use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
}

impl PdfReader {
    pub fn new(path: PathBuf) -> Result<Self> {
        Ok(Self { path })
    }

    pub fn page_count(&self) -> Result<usize> {
        get_page_count(&self.path)
    }
}

fn get_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: usize = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }

    anyhow::bail!(
        "pdfinfo output did not contain a 'Pages:' line for {}",
        pdf_path.display()
    );
}

/// Pulls a `YYYY-YYYY` season range out of a filename. Exam year is
/// the ending year (a 2006-2007 packet is the 2007 exam). Filenames
/// without the range are excluded from runs entirely.
pub fn parse_year_range(file_name: &str) -> Option<(u32, u32)> {
    let bytes = file_name.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(|b| b.is_ascii_digit());

    for i in 0..bytes.len().saturating_sub(8) {
        if (i..i + 4).all(is_digit)
            && bytes[i + 4] == b'-'
            && (i + 5..i + 9).all(is_digit)
            // Longer digit runs are something else (timestamps, ids).
            && !is_digit(i.wrapping_sub(1))
            && !is_digit(i + 9)
        {
            let start: u32 = file_name[i..i + 4].parse().ok()?;
            let end: u32 = file_name[i + 5..i + 9].parse().ok()?;
            return Some((start, end));
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct ExamPdf {
    pub path: PathBuf,
    pub exam_year: u32,
}

/// Scans a directory for exam PDFs with a parseable season range.
/// Returns matches sorted by year plus the excluded filenames.
pub fn find_exam_pdfs(dir: &Path) -> Result<(Vec<ExamPdf>, Vec<String>)> {
    let mut found = Vec::new();
    let mut excluded = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !path.is_file() || !is_pdf {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match parse_year_range(&name) {
            Some((_, end)) => found.push(ExamPdf {
                path,
                exam_year: end,
            }),
            None => excluded.push(name),
        }
    }

    found.sort_by_key(|pdf| (pdf.exam_year, pdf.path.clone()));
    excluded.sort();
    Ok((found, excluded))
}
