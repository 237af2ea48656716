use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::job::JobConfig;
use crate::transcribe::artifacts::OutputArtifactSet;
use crate::transcribe::backend::{BackendJob, TranscriptionBackend};
use crate::transcribe::format::{SentenceReflow, TranscriptFormatter};
use crate::transcribe::locks::DirectoryLocks;
use crate::transcribe::progress::{Milestone, ProgressSink};
use crate::transcribe::stage::JobStage;
use crate::transcribe::workspace::{reset_output_dir, unique_job_dir, DirectoryResetError};

/// How jobs use the configured output directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// Every job resets and reuses the directory itself; jobs on the same
    /// directory run one at a time, across processes too.
    #[default]
    Shared,
    /// Every job gets its own fresh subdirectory.
    PerJob,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    DirectoryReset(#[from] DirectoryResetError),

    #[error(transparent)]
    Backend(anyhow::Error),

    #[error("failed to read transcript {}: {source}", path.display())]
    TranscriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSuccess {
    /// Directory the backend reported, not necessarily the requested one.
    pub output_dir: PathBuf,
    pub artifacts: OutputArtifactSet,
    /// Reflowed `out.txt`, if the backend produced one.
    pub transcript: Option<String>,
}

impl JobSuccess {
    pub fn status_message(&self) -> String {
        format!(
            "Transcription successful! Files saved to: {}",
            self.output_dir.display()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    /// Stage the job was in when it failed.
    pub stage: JobStage,
    pub message: String,
    /// Error chain, plus a backtrace when `RUST_BACKTRACE` is set.
    pub trace: String,
}

impl JobFailure {
    fn from_error(stage: JobStage, err: JobError) -> Self {
        let message = err.to_string();
        let trace = format!("{:?}", anyhow::Error::new(err));
        Self {
            stage,
            message,
            trace,
        }
    }

    pub fn status_message(&self) -> String {
        format!("An error occurred: {}\n\n{}", self.message, self.trace)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Succeeded(JobSuccess),
    Failed(JobFailure),
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn status_message(&self) -> String {
        match self {
            Self::Succeeded(s) => s.status_message(),
            Self::Failed(f) => f.status_message(),
        }
    }

    /// Terminal stage of the job.
    pub fn stage(&self) -> JobStage {
        match self {
            Self::Succeeded(_) => JobStage::Done,
            Self::Failed(_) => JobStage::Failed,
        }
    }

    pub fn artifacts(&self) -> Option<&OutputArtifactSet> {
        match self {
            Self::Succeeded(s) => Some(&s.artifacts),
            Self::Failed(_) => None,
        }
    }

    pub fn transcript(&self) -> Option<&str> {
        match self {
            Self::Succeeded(s) => s.transcript.as_deref(),
            Self::Failed(_) => None,
        }
    }
}

/// Runs transcription jobs end to end: reset the output directory, call the
/// backend once, collect its artifacts and reflow the transcript.
pub struct Orchestrator {
    backend: Box<dyn TranscriptionBackend>,
    formatter: Box<dyn TranscriptFormatter>,
    layout: OutputLayout,
    locks: Arc<DirectoryLocks>,
}

impl Orchestrator {
    pub fn new(backend: Box<dyn TranscriptionBackend>) -> Self {
        Self {
            backend,
            formatter: Box::new(SentenceReflow),
            layout: OutputLayout::default(),
            locks: DirectoryLocks::global(),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn TranscriptFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_locks(mut self, locks: Arc<DirectoryLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Run one job. Never returns an error: every failure is captured in
    /// [`JobOutcome::Failed`]. The backend is called at most once.
    pub fn run_job(&self, cfg: JobConfig, progress: &dyn ProgressSink) -> JobOutcome {
        progress.report(Milestone::Started);
        tracing::info!(
            "Transcribing {} with {} (model {}, device {}, task {})",
            cfg.target,
            self.backend.name(),
            cfg.model,
            cfg.device,
            cfg.task
        );

        let job_dir = match self.layout {
            OutputLayout::Shared => cfg.output_dir.clone(),
            OutputLayout::PerJob => unique_job_dir(&cfg.output_dir),
        };

        let mut stage = JobStage::Idle;
        let result = self.execute(&cfg, &job_dir, &mut stage, progress);

        match result {
            Ok(success) => {
                progress.report(Milestone::Done);
                tracing::info!("{}", success.status_message());
                JobOutcome::Succeeded(success)
            }
            Err(err) => {
                let failure = JobFailure::from_error(stage, err);
                tracing::error!("Job failed at stage '{}': {}", stage, failure.message);
                JobOutcome::Failed(failure)
            }
        }
    }

    fn execute(
        &self,
        cfg: &JobConfig,
        job_dir: &Path,
        stage: &mut JobStage,
        progress: &dyn ProgressSink,
    ) -> Result<JobSuccess, JobError> {
        advance(stage, JobStage::DirectoryReset);
        // Held until the transcript is read, so no other job can reset the
        // directory under this one.
        let _guard = match self.layout {
            OutputLayout::Shared => Some(self.locks.acquire(job_dir)?),
            OutputLayout::PerJob => None,
        };
        reset_output_dir(job_dir)?;
        progress.report(Milestone::DirectoryReady);

        advance(stage, JobStage::BackendDispatch);
        let job = BackendJob::new(cfg, job_dir);
        progress.report(Milestone::BackendDispatched);
        let result_dir = panic::catch_unwind(AssertUnwindSafe(|| self.backend.transcribe(&job)))
            .unwrap_or_else(|payload| Err(backend_panic(payload)))
            .map_err(JobError::Backend)?;

        advance(stage, JobStage::ArtifactResolution);
        let artifacts = OutputArtifactSet::resolve(&result_dir);
        if artifacts.is_empty() {
            tracing::warn!("Backend produced no artifacts in {}", result_dir.display());
        } else {
            tracing::info!(
                "Found {} in {}",
                artifacts.found_names().join(", "),
                result_dir.display()
            );
        }
        progress.report(Milestone::ArtifactsResolved);

        advance(stage, JobStage::TextFormatting);
        let transcript = match &artifacts.txt {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    JobError::TranscriptRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                Some(self.formatter.format(&raw))
            }
            None => None,
        };
        progress.report(Milestone::Finalizing);

        advance(stage, JobStage::Done);
        Ok(JobSuccess {
            output_dir: result_dir,
            artifacts,
            transcript,
        })
    }
}

fn backend_panic(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    anyhow::anyhow!("backend panicked: {}", detail)
}

fn advance(stage: &mut JobStage, next: JobStage) {
    debug_assert_eq!(stage.next(), Some(next));
    tracing::debug!("Job stage: {} -> {}", stage, next);
    *stage = next;
}
