use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

use crate::ocr::OcrEngine;

/// OCR through the tesseract CLI. Plain text out, no layout.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    lang: String,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    /// Fails when the tesseract binary is missing or broken, before
    /// any page work starts.
    pub fn preflight() -> Result<()> {
        let output = Command::new("tesseract")
            .arg("--version")
            .output()
            .with_context(|| {
                "tesseract not found; install tesseract-ocr (apt: tesseract-ocr, brew: tesseract)"
            })?;
        if !output.status.success() {
            anyhow::bail!("tesseract --version failed with status: {}", output.status);
        }
        Ok(())
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_path: &Path) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to run tesseract on {}", image_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("tesseract failed: {stderr}");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
