pub mod tesseract;

use anyhow::Result;
use std::path::Path;

pub use tesseract::TesseractOcr;

pub trait OcrEngine {
    fn recognize(&self, image_path: &Path) -> Result<String>;
}
