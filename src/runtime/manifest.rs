use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pipeline_name: String,
    pub input_path: String,
    pub bare_path: String,
    pub filters: Vec<FilterManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterManifest {
    pub name: String,
    pub output_path: String,
    pub input_rows: usize,
    pub matched_rows: usize,
    pub filtered_rows: usize,
}

impl Manifest {
    pub fn new(pipeline_name: String, input_path: &Path, bare_path: &Path) -> Self {
        Self {
            pipeline_name,
            input_path: input_path.to_string_lossy().into_owned(),
            bare_path: bare_path.to_string_lossy().into_owned(),
            filters: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter: FilterManifest) {
        self.filters.push(filter);
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
