use crate::config::{CropPreset, ExamFamily};
use crate::core::geometry::BBox;
use crate::core::model::{DiagramRegion, RegionSource};
use crate::page::graphics::PageGraphics;

/// Padding added around the detected graphics union, as a fraction of
/// the union's own width/height per side.
const DETECT_PADDING: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionStrategy {
    AutoDetect,
    Preset(CropPreset),
}

impl RegionStrategy {
    /// Resolves to a crop region, or `None` when the strategy has
    /// nothing to work with on this page. Preset always resolves.
    pub fn resolve(&self, graphics: &PageGraphics) -> Option<DiagramRegion> {
        match self {
            RegionStrategy::AutoDetect => detect_region(graphics),
            RegionStrategy::Preset(preset) => Some(DiagramRegion {
                top: preset.top,
                bottom: preset.bottom,
                left: preset.left,
                right: preset.right,
                source: RegionSource::Preset,
            }),
        }
    }
}

/// Tries strategies in order; families with auto-detect enabled fall
/// back to their preset on pages without extractable graphics.
#[derive(Debug, Clone)]
pub struct DiagramRegionEstimator {
    strategies: Vec<RegionStrategy>,
}

impl DiagramRegionEstimator {
    pub fn new(strategies: Vec<RegionStrategy>) -> Self {
        Self { strategies }
    }

    pub fn for_family(family: &ExamFamily) -> Self {
        let mut strategies = Vec::new();
        if family.auto_detect {
            strategies.push(RegionStrategy::AutoDetect);
        }
        strategies.push(RegionStrategy::Preset(family.preset));
        Self { strategies }
    }

    pub fn estimate(&self, graphics: &PageGraphics) -> Option<DiagramRegion> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.resolve(graphics))
    }
}

/// Union bounding box over every embedded image and vector drawing on
/// the page, padded and converted to clamped page fractions.
fn detect_region(graphics: &PageGraphics) -> Option<DiagramRegion> {
    if graphics.width <= 0.0 || graphics.height <= 0.0 {
        return None;
    }

    let union = graphics
        .images
        .iter()
        .chain(graphics.drawings.iter())
        .filter(|b| !b.is_degenerate())
        .copied()
        .reduce(|acc, b| acc.union(&b))?;

    let pad_x = union.width() * DETECT_PADDING;
    let pad_y = union.height() * DETECT_PADDING;
    let padded = BBox::new(
        union.x0 - pad_x,
        union.y0 - pad_y,
        union.x1 + pad_x,
        union.y1 + pad_y,
    );

    let region = DiagramRegion {
        top: (padded.y0 / graphics.height).clamp(0.0, 1.0),
        bottom: (padded.y1 / graphics.height).clamp(0.0, 1.0),
        left: (padded.x0 / graphics.width).clamp(0.0, 1.0),
        right: (padded.x1 / graphics.width).clamp(0.0, 1.0),
        source: RegionSource::Detected,
    };

    region.is_valid().then_some(region)
}
