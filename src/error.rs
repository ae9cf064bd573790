use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Fatal pipeline errors. Every variant aborts the run; there are no
/// retries and no partial-success reporting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The named input dataset does not exist
    #[error("input dataset not found: {}", .0.display())]
    InputMissing(PathBuf),

    /// The cleaning collaborator could not be spawned
    #[error("cleaning collaborator `{0}` is not available")]
    PrerequisiteMissing(String),

    /// The cleaning collaborator ran and reported failure
    #[error("cleaning collaborator `{program}` failed ({status})")]
    PrerequisiteFailed { program: String, status: ExitStatus },

    /// The cleaning collaborator succeeded but its artifact is absent
    #[error("bare dataset not produced at {}", .0.display())]
    BareDataMissing(PathBuf),

    /// The dated run log could not be created
    #[error("cannot create run log {}: {}", .path.display(), .source)]
    LogInit {
        path: PathBuf,
        source: std::io::Error,
    },
}
