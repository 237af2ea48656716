use serde::{Deserialize, Serialize};

/// Where a job is in its lifecycle.
///
/// Jobs move forward through the stages in order; any non-terminal stage can
/// move straight to `Failed`. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Idle,
    DirectoryReset,
    BackendDispatch,
    ArtifactResolution,
    TextFormatting,
    Done,
    Failed,
}

impl JobStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The stage that follows this one on the success path.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::DirectoryReset),
            Self::DirectoryReset => Some(Self::BackendDispatch),
            Self::BackendDispatch => Some(Self::ArtifactResolution),
            Self::ArtifactResolution => Some(Self::TextFormatting),
            Self::TextFormatting => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::DirectoryReset => write!(f, "Resetting output directory"),
            Self::BackendDispatch => write!(f, "Running backend"),
            Self::ArtifactResolution => write!(f, "Resolving artifacts"),
            Self::TextFormatting => write!(f, "Formatting transcript"),
            Self::Done => write!(f, "Done"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}
