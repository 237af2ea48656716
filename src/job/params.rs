use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::job::target::JobTarget;

/// Language value that asks the backend to detect the language itself.
pub const AUTO_LANGUAGE: &str = "auto";

/// Compute device the backend should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Cpu,
    Cuda,
    /// Accelerated batched pipeline (the backend's "insane" mode).
    #[serde(rename = "insane", alias = "accelerated")]
    #[value(name = "insane", alias = "accelerated")]
    Accelerated,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Accelerated => "insane",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Transcribe,
    Translate,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Translate => "translate",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access token for private models. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token, treating an empty or blank value as no token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Everything one submission needs. Moved into the orchestrator, which owns
/// it for the duration of the job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub target: JobTarget,
    pub output_dir: PathBuf,
    pub model: String,
    /// `None` and `"auto"` both let the backend detect the language.
    pub language: Option<String>,
    pub device: Device,
    pub task: Task,
    pub auth_token: Option<AuthToken>,
    pub initial_prompt: Option<String>,
}

impl JobConfig {
    /// The language to dispatch, or `None` when the backend should detect it.
    pub fn dispatch_language(&self) -> Option<&str> {
        normalize_language(self.language.as_deref())
    }
}

/// Map the "no preference" and "auto-detect" sentinels to an omitted language.
pub fn normalize_language(language: Option<&str>) -> Option<&str> {
    match language {
        None | Some("") | Some(AUTO_LANGUAGE) => None,
        Some(code) => Some(code),
    }
}
