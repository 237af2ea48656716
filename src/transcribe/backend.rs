use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::job::{AuthToken, Device, JobConfig, JobTarget, Task};

/// A job as the backend sees it: language already normalized, output
/// directory already reset. Every other field is passed through as given.
#[derive(Debug, Clone, Copy)]
pub struct BackendJob<'a> {
    pub target: &'a JobTarget,
    pub output_dir: &'a Path,
    pub model: &'a str,
    /// `None` means the backend detects the language.
    pub language: Option<&'a str>,
    pub device: Device,
    pub task: Task,
    pub auth_token: Option<&'a AuthToken>,
    pub initial_prompt: Option<&'a str>,
}

impl<'a> BackendJob<'a> {
    pub fn new(cfg: &'a JobConfig, output_dir: &'a Path) -> Self {
        Self {
            target: &cfg.target,
            output_dir,
            model: &cfg.model,
            language: cfg.dispatch_language(),
            device: cfg.device,
            task: cfg.task,
            auth_token: cfg.auth_token.as_ref(),
            initial_prompt: cfg.initial_prompt.as_deref(),
        }
    }
}

pub trait TranscriptionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Transcribe synchronously and return the directory holding the
    /// `out.*` artifacts. It may be a subdirectory of `job.output_dir`.
    ///
    /// Failures should be returned as errors. A panic is caught by the
    /// orchestrator and reported as a backend failure.
    fn transcribe(&self, job: &BackendJob<'_>) -> Result<PathBuf>;
}
