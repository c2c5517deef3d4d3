pub mod diagram_map;
pub mod json_export;

use anyhow::Result;

use crate::core::model::QuestionRecord;

pub use diagram_map::DiagramMapExporter;
pub use json_export::JsonExporter;

pub trait Exporter {
    fn export(&self, records: &[QuestionRecord]) -> Result<()>;
}
