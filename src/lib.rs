pub mod config;
pub mod core;
pub mod diagram;
pub mod export;
pub mod ocr;
pub mod page;
pub mod pipeline;
pub mod segment;

pub use crate::core::model::{Difficulty, QuestionOption, QuestionRecord};
pub use config::{CropPreset, ExamFamily, ExtractConfig};
pub use pipeline::{export_records, extract_document, ExtractOutput, RunSummary};
