use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::clean;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    /// Program invoked to produce the bare dataset
    #[serde(default = "default_cleaner")]
    pub cleaner: String,
    pub filters: Vec<FilterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub name: String,
    pub output: PathBuf,
    pub filter: FilterSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FilterSpec {
    /// Keep records whose full text contains a literal substring
    Contains { pattern: String },
    /// Keep records whose field at a zero-based position parses as a number
    /// strictly below the threshold
    FieldBelow { field: usize, threshold: f64 },
}

fn default_cleaner() -> String {
    "obsclean".to_string()
}

impl PipelineConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        // Validate
        config.validate()?;
        Ok(config)
    }

    /// The built-in pipeline: the 13:00 observation slice, the April slice,
    /// and the below-zero slice, written to the current directory with the
    /// bare dataset's name as suffix.
    pub fn default_for(input: &Path) -> Self {
        let bare_name = clean::bare_path(input)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name: "observation-slices".to_string(),
            cleaner: default_cleaner(),
            filters: vec![
                FilterConfig {
                    name: "at-1300".to_string(),
                    output: PathBuf::from(format!("at-1300.{bare_name}")),
                    filter: FilterSpec::Contains {
                        pattern: "13:00:00".to_string(),
                    },
                },
                FilterConfig {
                    name: "april".to_string(),
                    output: PathBuf::from(format!("april.{bare_name}")),
                    filter: FilterSpec::Contains {
                        pattern: "-04-".to_string(),
                    },
                },
                FilterConfig {
                    name: "below-zero".to_string(),
                    output: PathBuf::from(format!("below-zero.{bare_name}")),
                    filter: FilterSpec::FieldBelow {
                        field: 3,
                        threshold: 0.0,
                    },
                },
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.filters.is_empty() {
            anyhow::bail!("Pipeline '{}' has no filters", self.name);
        }

        // Check filter names are unique
        let mut filter_names = HashSet::new();
        for filter in &self.filters {
            if !filter_names.insert(&filter.name) {
                anyhow::bail!("Duplicate filter name: {}", filter.name);
            }
        }

        // Check output paths are unique and non-empty
        let mut outputs = HashSet::new();
        for filter in &self.filters {
            if filter.output.as_os_str().is_empty() {
                anyhow::bail!("Filter '{}' has an empty output path", filter.name);
            }
            if !outputs.insert(&filter.output) {
                anyhow::bail!(
                    "Duplicate output path: {}",
                    filter.output.display()
                );
            }
        }

        Ok(())
    }
}
