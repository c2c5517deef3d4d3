use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use crate::core::model::DiagramRegion;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOutcome {
    pub has_diagram: bool,
    pub artifact: Option<PathBuf>,
}

/// Decides whether a cropped region holds a real diagram and manages
/// the resulting artifact. Near-blank crops compress to almost
/// nothing, so encoded size is a cheap content proxy.
#[derive(Debug, Clone)]
pub struct DiagramClassifier {
    image_dir: PathBuf,
    threshold: usize,
}

impl DiagramClassifier {
    pub fn new(image_dir: PathBuf, threshold: usize) -> Self {
        Self {
            image_dir,
            threshold,
        }
    }

    /// The decision itself, kept free of any I/O.
    pub fn is_diagram(&self, encoded_len: usize) -> bool {
        encoded_len > self.threshold
    }

    /// Crops, encodes, decides, and persists in one pass. A positive
    /// decision writes `file_name` under the image dir; a negative one
    /// removes any stale artifact left there by an earlier run.
    pub fn classify_and_store(
        &self,
        page_image: &DynamicImage,
        region: &DiagramRegion,
        file_name: &str,
    ) -> Result<DiagramOutcome> {
        let crop = crop_region(page_image, region);
        let encoded = encode_png(&crop)?;
        let path = self.image_dir.join(file_name);

        if self.is_diagram(encoded.len()) {
            fs::create_dir_all(&self.image_dir)?;
            fs::write(&path, &encoded)
                .with_context(|| format!("failed to write diagram {}", path.display()))?;
            Ok(DiagramOutcome {
                has_diagram: true,
                artifact: Some(path),
            })
        } else {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove stale diagram {}", path.display()))?;
            }
            Ok(DiagramOutcome {
                has_diagram: false,
                artifact: None,
            })
        }
    }
}

/// Pixel crop of the page raster for a fractional region. The raster
/// is already oversampled by the renderer DPI, so no extra scaling
/// happens here.
pub fn crop_region(page_image: &DynamicImage, region: &DiagramRegion) -> DynamicImage {
    let w = page_image.width();
    let h = page_image.height();

    let x = ((region.left * w as f32).floor() as u32).min(w.saturating_sub(1));
    let y = ((region.top * h as f32).floor() as u32).min(h.saturating_sub(1));
    let crop_w = (((region.right - region.left) * w as f32).ceil() as u32)
        .max(1)
        .min(w - x);
    let crop_h = (((region.bottom - region.top) * h as f32).ceil() as u32)
        .max(1)
        .min(h - y);

    page_image.crop_imm(x, y, crop_w, crop_h)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .with_context(|| "failed to encode crop as PNG")?;
    Ok(buf)
}
