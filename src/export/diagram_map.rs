use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::core::model::QuestionRecord;
use crate::export::Exporter;

/// One row of the diagram mapping handed to the persistence step that
/// updates question rows downstream.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMapEntry {
    pub exam_name: String,
    pub exam_year: u32,
    pub question_number: String,
    pub has_image: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiagramMapExporter {
    out_dir: PathBuf,
}

impl DiagramMapExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn entries(records: &[QuestionRecord]) -> Vec<DiagramMapEntry> {
        records
            .iter()
            .map(|r| DiagramMapEntry {
                exam_name: r.exam_name.clone(),
                exam_year: r.exam_year,
                question_number: r.question_number.clone(),
                has_image: r.has_image,
                image_url: r.image_url.clone(),
            })
            .collect()
    }
}

impl Exporter for DiagramMapExporter {
    fn export(&self, records: &[QuestionRecord]) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join("diagram-map.json");
        let data = serde_json::to_string_pretty(&Self::entries(records))?;
        fs::write(path, data)?;
        Ok(())
    }
}
