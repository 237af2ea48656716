//! Adapters from a job outcome to what a front end shows.
//!
//! [`JobOutcome`] is the canonical result. The inline-text front end and the
//! file-download front end each get a view built from it here, so the
//! orchestrator itself has a single output shape.

use std::io::Write;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::transcribe::runner::JobOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// The formatted transcript inline.
    #[default]
    Text,
    /// Paths of the subtitle, text and JSON artifacts.
    Files,
}

/// Formatted transcript plus status line.
#[derive(Debug, Clone, Serialize)]
pub struct TextView {
    pub transcript: Option<String>,
    pub status: String,
}

/// Up to three artifact paths plus status line.
#[derive(Debug, Clone, Serialize)]
pub struct FilesView {
    pub srt: Option<PathBuf>,
    pub txt: Option<PathBuf>,
    pub json: Option<PathBuf>,
    pub status: String,
}

impl From<&JobOutcome> for TextView {
    fn from(outcome: &JobOutcome) -> Self {
        Self {
            transcript: outcome.transcript().map(str::to_string),
            status: outcome.status_message(),
        }
    }
}

impl From<&JobOutcome> for FilesView {
    fn from(outcome: &JobOutcome) -> Self {
        let artifacts = outcome.artifacts().cloned().unwrap_or_default();
        Self {
            srt: artifacts.srt,
            txt: artifacts.txt,
            json: artifacts.json,
            status: outcome.status_message(),
        }
    }
}

/// Write the chosen view of `outcome`, either as JSON or as plain text.
pub fn render(
    out: &mut dyn Write,
    outcome: &JobOutcome,
    kind: ViewKind,
    json: bool,
) -> anyhow::Result<()> {
    match (kind, json) {
        (ViewKind::Text, true) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&TextView::from(outcome))?)?
        }
        (ViewKind::Files, true) => {
            writeln!(out, "{}", serde_json::to_string_pretty(&FilesView::from(outcome))?)?
        }
        (ViewKind::Text, false) => {
            let view = TextView::from(outcome);
            if let Some(text) = &view.transcript {
                writeln!(out, "{}", text)?;
                writeln!(out)?;
            }
            writeln!(out, "{}", view.status)?;
        }
        (ViewKind::Files, false) => {
            let view = FilesView::from(outcome);
            for (label, path) in [("SRT", &view.srt), ("TXT", &view.txt), ("JSON", &view.json)] {
                match path {
                    Some(p) => writeln!(out, "{:<5} {}", label, p.display())?,
                    None => writeln!(out, "{:<5} (not produced)", label)?,
                }
            }
            writeln!(out, "{}", view.status)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcribe::artifacts::OutputArtifactSet;
    use crate::transcribe::runner::{JobFailure, JobSuccess};
    use crate::transcribe::stage::JobStage;

    fn success() -> JobOutcome {
        JobOutcome::Succeeded(JobSuccess {
            output_dir: PathBuf::from("/out/clip"),
            artifacts: OutputArtifactSet {
                srt: Some(PathBuf::from("/out/clip/out.srt")),
                txt: Some(PathBuf::from("/out/clip/out.txt")),
                json: None,
            },
            transcript: Some("Hello.\n\nWorld.".to_string()),
        })
    }

    fn failure() -> JobOutcome {
        JobOutcome::Failed(JobFailure {
            stage: JobStage::BackendDispatch,
            message: "model not found".to_string(),
            trace: "model not found\n\nCaused by: ...".to_string(),
        })
    }

    #[test]
    fn test_text_view_success() {
        let view = TextView::from(&success());
        assert_eq!(view.transcript.as_deref(), Some("Hello.\n\nWorld."));
        assert_eq!(
            view.status,
            "Transcription successful! Files saved to: /out/clip"
        );
    }

    #[test]
    fn test_files_view_success() {
        let view = FilesView::from(&success());
        assert!(view.srt.is_some());
        assert!(view.txt.is_some());
        assert!(view.json.is_none());
    }

    #[test]
    fn test_views_on_failure_have_no_artifacts() {
        let outcome = failure();
        let text = TextView::from(&outcome);
        assert!(text.transcript.is_none());
        assert!(text.status.starts_with("An error occurred: model not found"));

        let files = FilesView::from(&outcome);
        assert!(files.srt.is_none() && files.txt.is_none() && files.json.is_none());
        assert!(files.status.contains("Caused by"));
    }

    #[test]
    fn test_render_text_plain() {
        let mut buf = Vec::new();
        render(&mut buf, &success(), ViewKind::Text, false).unwrap();
        let printed = String::from_utf8(buf).unwrap();
        assert!(printed.starts_with("Hello.\n\nWorld.\n"));
        assert!(printed.contains("Files saved to: /out/clip"));
    }

    #[test]
    fn test_render_files_plain() {
        let mut buf = Vec::new();
        render(&mut buf, &success(), ViewKind::Files, false).unwrap();
        let printed = String::from_utf8(buf).unwrap();
        assert!(printed.contains("/out/clip/out.srt"));
        assert!(printed.contains("JSON  (not produced)"));
    }

    #[test]
    fn test_render_json() {
        let mut buf = Vec::new();
        render(&mut buf, &failure(), ViewKind::Files, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["srt"].is_null());
        assert!(value["status"]
            .as_str()
            .unwrap()
            .starts_with("An error occurred"));
    }
}
