use std::path::PathBuf;

/// Fixed crop rectangle used when automatic diagram detection finds
/// nothing, as fractions of the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropPreset {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl CropPreset {
    /// MOEMS layout: question text in the top quarter, diagram in the
    /// middle band, answer space below.
    pub fn moems() -> Self {
        Self {
            top: 0.25,
            bottom: 0.60,
            left: 0.05,
            right: 0.95,
        }
    }

    pub fn kangaroo() -> Self {
        Self {
            top: 0.20,
            bottom: 0.70,
            left: 0.10,
            right: 0.90,
        }
    }

}

/// Immutable description of one exam document template. Built at
/// startup and passed explicitly wherever layout knowledge is needed.
#[derive(Debug, Clone)]
pub struct ExamFamily {
    pub exam_name: String,
    pub output_prefix: String,
    pub topic: String,
    pub group_size: usize,
    pub preset: CropPreset,
    pub auto_detect: bool,
}

impl ExamFamily {
    pub fn moems() -> Self {
        Self {
            exam_name: "MOEMS Division E".to_string(),
            output_prefix: "moems".to_string(),
            topic: "General Math".to_string(),
            group_size: 5,
            preset: CropPreset::moems(),
            auto_detect: true,
        }
    }

    pub fn kangaroo() -> Self {
        Self {
            exam_name: "Math Kangaroo".to_string(),
            output_prefix: "kangaroo".to_string(),
            topic: "General Math".to_string(),
            group_size: 5,
            preset: CropPreset::kangaroo(),
            auto_detect: true,
        }
    }
}

/// Tunables for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub exam_year: u32,
    pub output_dir: PathBuf,
    pub image_dir: PathBuf,
    pub image_url_prefix: String,
    pub family: ExamFamily,
    pub dpi: u32,
    pub ocr_lang: String,
    /// Fraction of raw lines kept as the stem when no option marker is
    /// found. Inherited constant with no stated derivation, so it is
    /// configuration rather than a rule.
    pub stem_fraction: f32,
    /// Encoded crops larger than this many bytes count as diagrams.
    pub diagram_threshold: usize,
    pub quiet: bool,
}

impl ExtractConfig {
    pub fn new(input: PathBuf, exam_year: u32, output_dir: PathBuf, family: ExamFamily) -> Self {
        let image_dir = output_dir.join("images");
        Self {
            input,
            exam_year,
            output_dir,
            image_dir,
            image_url_prefix: "/images/questions".to_string(),
            family,
            dpi: 216,
            ocr_lang: "eng".to_string(),
            stem_fraction: 0.7,
            diagram_threshold: 5000,
            quiet: false,
        }
    }
}
