use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::BackendConfig;
use crate::transcribe::artifacts::has_artifacts;
use crate::transcribe::backend::{BackendJob, TranscriptionBackend};

/// Runs an external transcription program (by default `transcribe-anything`)
/// and waits for it to finish.
pub struct CommandBackend {
    program: String,
    base_args: Vec<String>,
    /// The auth token is passed in this environment variable, never as an
    /// argument, so it does not show up in process listings.
    token_env: String,
}

impl CommandBackend {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
            token_env: "HF_TOKEN".to_string(),
        }
    }

    pub fn with_token_env(mut self, name: impl Into<String>) -> Self {
        self.token_env = name.into();
        self
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        if config.command.trim().is_empty() {
            anyhow::bail!("Backend command not configured. Set [backend] command");
        }
        if config.token_env.trim().is_empty() {
            anyhow::bail!("Token variable not configured. Set [backend] token_env");
        }
        Ok(Self::new(config.command.clone(), config.args.clone())
            .with_token_env(config.token_env.trim()))
    }

    /// Arguments for one job, after `base_args`.
    fn job_args(job: &BackendJob<'_>) -> Vec<String> {
        let mut args = vec![
            job.target.as_str().to_string(),
            "--output_dir".to_string(),
            job.output_dir.to_string_lossy().to_string(),
            "--model".to_string(),
            job.model.to_string(),
            "--task".to_string(),
            job.task.as_str().to_string(),
            "--device".to_string(),
            job.device.as_str().to_string(),
        ];
        if let Some(language) = job.language {
            args.push("--language".to_string());
            args.push(language.to_string());
        }
        if let Some(prompt) = job.initial_prompt {
            args.push("--initial_prompt".to_string());
            args.push(prompt.to_string());
        }
        args
    }
}

impl TranscriptionBackend for CommandBackend {
    fn name(&self) -> &str {
        &self.program
    }

    fn transcribe(&self, job: &BackendJob<'_>) -> Result<PathBuf> {
        let args = Self::job_args(job);
        tracing::debug!("Running {} {}", self.program, args.join(" "));

        let mut command = Command::new(&self.program);
        command.args(&self.base_args).args(&args);
        if let Some(token) = job.auth_token {
            command.env(&self.token_env, token.expose());
        }

        let output = command
            .output()
            .with_context(|| format!("Failed to launch backend `{}`", self.program))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            tracing::debug!("[{}] {}", self.program, line);
        }

        if !output.status.success() {
            anyhow::bail!(
                "Backend `{}` failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            );
        }

        locate_result_dir(job.output_dir)
    }
}

/// Find where the backend left its artifacts: `output_dir` itself, or the
/// first subdirectory (by name) that holds any. Falls back to `output_dir`.
pub fn locate_result_dir(output_dir: &Path) -> Result<PathBuf> {
    if has_artifacts(output_dir) {
        return Ok(output_dir.to_path_buf());
    }

    let mut subdirs = Vec::new();
    for entry in std::fs::read_dir(output_dir)
        .with_context(|| format!("Failed to list {}", output_dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        }
    }
    subdirs.sort(); // deterministic order

    Ok(subdirs
        .into_iter()
        .find(|dir| has_artifacts(dir))
        .unwrap_or_else(|| output_dir.to_path_buf()))
}
