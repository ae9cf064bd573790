use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::PipelineError;

/// The upstream cleaning collaborator. Given the original dataset, it
/// produces the bare (delimiter-normalized) dataset this pipeline consumes.
pub trait Cleaner {
    fn clean(&self, input: &Path) -> Result<PathBuf, PipelineError>;
}

/// Where the collaborator writes the bare dataset: next to the input, with
/// a `bare.` prefix on the file name.
pub fn bare_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("bare.{name}"))
}

/// Cleaner backed by an external program, invoked as `<program> <input>`.
pub struct CommandCleaner {
    program: String,
}

impl CommandCleaner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Cleaner for CommandCleaner {
    fn clean(&self, input: &Path) -> Result<PathBuf, PipelineError> {
        let status = Command::new(&self.program)
            .arg(input)
            .status()
            .map_err(|_| PipelineError::PrerequisiteMissing(self.program.clone()))?;

        if !status.success() {
            return Err(PipelineError::PrerequisiteFailed {
                program: self.program.clone(),
                status,
            });
        }

        let bare = bare_path(input);
        if !bare.exists() {
            return Err(PipelineError::BareDataMissing(bare));
        }
        Ok(bare)
    }
}
