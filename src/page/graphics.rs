use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::geometry::BBox;

/// Graphics metadata for one page, in page coordinates: every embedded
/// image bbox and every vector drawing bbox.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGraphics {
    pub width: f32,
    pub height: f32,
    pub images: Vec<BBox>,
    pub drawings: Vec<BBox>,
}

#[derive(Debug, Deserialize)]
struct RawGraphics {
    width: f32,
    height: f32,
    #[serde(default)]
    images: Vec<[f32; 4]>,
    #[serde(default)]
    drawings: Vec<[f32; 4]>,
}

/// Shells out to the PyMuPDF helper, which emits one JSON object per
/// page query. Poppler exposes no drawing-level geometry, so this is
/// the one collaborator that needs Python.
#[derive(Debug, Clone)]
pub struct GraphicsBridge {
    script_path: PathBuf,
}

impl GraphicsBridge {
    pub fn new() -> Self {
        Self {
            script_path: PathBuf::from("scripts/page_graphics.py"),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    /// Fails when the helper script is missing or cannot run (no
    /// python3, no PyMuPDF). Called before any page work so a broken
    /// bridge aborts the run instead of quietly turning every page
    /// into a no-diagram record.
    pub fn preflight(&self) -> Result<()> {
        if !self.script_path.exists() {
            anyhow::bail!(
                "graphics bridge script not found at {}; run from the repository root",
                self.script_path.display()
            );
        }
        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--check")
            .output()
            .with_context(|| "python3 not found; install Python 3 for the graphics bridge")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("graphics bridge self-check failed (is PyMuPDF installed?): {stderr}");
        }
        Ok(())
    }

    pub fn run(&self, pdf_path: &Path, page_idx: usize) -> Result<PageGraphics> {
        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--pdf")
            .arg(pdf_path)
            .arg("--page")
            .arg(page_idx.to_string())
            .output()
            .with_context(|| "failed to invoke page graphics bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("graphics bridge failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let raw: RawGraphics = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse graphics JSON response")?;

        Ok(PageGraphics {
            width: raw.width,
            height: raw.height,
            images: raw.images.into_iter().map(to_bbox).collect(),
            drawings: raw.drawings.into_iter().map(to_bbox).collect(),
        })
    }
}

impl Default for GraphicsBridge {
    fn default() -> Self {
        Self::new()
    }
}

fn to_bbox(b: [f32; 4]) -> BBox {
    BBox::new(b[0], b[1], b[2], b[3])
}
