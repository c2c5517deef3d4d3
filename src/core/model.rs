use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub letter: char,
    pub text: String,
    pub is_correct: bool,
}

/// One extracted question, in the shape consumed downstream. Built once
/// per page and never mutated after it joins the run's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub exam_name: String,
    pub exam_year: u32,
    pub question_number: String,
    pub question_text: String,
    pub options: Vec<QuestionOption>,
    pub has_image: bool,
    pub image_url: Option<String>,
    pub topic: String,
    pub difficulty: Difficulty,
}

impl QuestionRecord {
    pub fn is_multiple_choice(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn has_complete_options(&self) -> bool {
        self.options.len() == 5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    Detected,
    Preset,
}

/// Crop rectangle as fractions of the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramRegion {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub source: RegionSource,
}

impl DiagramRegion {
    pub fn is_valid(&self) -> bool {
        0.0 <= self.left
            && self.left < self.right
            && self.right <= 1.0
            && 0.0 <= self.top
            && self.top < self.bottom
            && self.bottom <= 1.0
    }
}
