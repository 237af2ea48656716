use std::path::{Path, PathBuf};
use tempfile::TempDir;

use transcribe_runner::job::{Device, JobConfig, JobTarget, Task};
use transcribe_runner::present::{FilesView, TextView};
use transcribe_runner::transcribe::backend::{BackendJob, TranscriptionBackend};
use transcribe_runner::transcribe::progress::NoProgress;
use transcribe_runner::transcribe::runner::{JobOutcome, Orchestrator};

/// Behaves like the real backend: output goes into a subfolder named after
/// the input file.
struct NamedFolderBackend {
    files: Vec<(&'static str, &'static str)>,
}

impl TranscriptionBackend for NamedFolderBackend {
    fn name(&self) -> &str {
        "named-folder"
    }

    fn transcribe(&self, job: &BackendJob<'_>) -> anyhow::Result<PathBuf> {
        let stem = Path::new(job.target.as_str())
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "remote".to_string());
        let dir = job.output_dir.join(stem);
        std::fs::create_dir_all(&dir)?;
        for (name, content) in &self.files {
            std::fs::write(dir.join(name), content)?;
        }
        Ok(dir)
    }
}

fn job_for(target: JobTarget, output_dir: &Path) -> JobConfig {
    JobConfig {
        target,
        output_dir: output_dir.to_path_buf(),
        model: "primeline/whisper-large-v3-turbo-german".to_string(),
        language: Some("auto".to_string()),
        device: Device::Cuda,
        task: Task::Transcribe,
        auth_token: None,
        initial_prompt: None,
    }
}

#[test]
fn test_resolve_then_run_produces_text_view() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("transcriptions");

    let target = JobTarget::resolve(Some(""), Some("/media/interview.mp3")).unwrap();
    let orchestrator = Orchestrator::new(Box::new(NamedFolderBackend {
        files: vec![
            ("out.txt", "Guten Morgen. Wie geht es? Gut!"),
            ("out.srt", "1\n00:00:00,000 --> 00:00:02,000\nGuten Morgen.\n"),
            ("out.json", "{\"segments\": []}"),
        ],
    }));

    let outcome = orchestrator.run_job(job_for(target, &out), &NoProgress);
    assert!(outcome.is_success());

    let view = TextView::from(&outcome);
    assert_eq!(
        view.transcript.as_deref(),
        Some("Guten Morgen.\n\nWie geht es?\n\nGut!")
    );
    assert!(view.status.contains(&out.join("interview").display().to_string()));

    let files = FilesView::from(&outcome);
    assert_eq!(files.srt, Some(out.join("interview").join("out.srt")));
    assert_eq!(files.json, Some(out.join("interview").join("out.json")));
}

#[test]
fn test_repeated_jobs_keep_only_latest_results() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("transcriptions");
    let orchestrator = Orchestrator::new(Box::new(NamedFolderBackend {
        files: vec![("out.txt", "Hello.")],
    }));

    let first = JobTarget::Local("/media/first.wav".to_string());
    let second = JobTarget::Local("/media/second.wav".to_string());
    assert!(orchestrator.run_job(job_for(first, &out), &NoProgress).is_success());
    assert!(out.join("first").join("out.txt").exists());

    assert!(orchestrator.run_job(job_for(second, &out), &NoProgress).is_success());
    assert!(!out.join("first").exists(), "previous job's output must be gone");
    assert!(out.join("second").join("out.txt").exists());
}

#[test]
fn test_input_conflict_never_touches_output_dir() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("transcriptions");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("keep.txt"), "previous").unwrap();

    let result = JobTarget::resolve(Some("http://x"), Some("/a.mp3"));
    assert!(result.is_err());
    // Validation failed before any job ran, so nothing was reset.
    assert!(out.join("keep.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_command_backend_end_to_end() {
    use transcribe_runner::transcribe::command::CommandBackend;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("transcriptions");
    // $3 is the output directory; no --language because "auto" is omitted.
    let script = r#"
        for arg in "$@"; do
            if [ "$arg" = "--language" ]; then echo "unexpected --language" >&2; exit 2; fi
        done
        mkdir -p "$3/clip"
        printf 'One. Two?\nThree!' > "$3/clip/out.txt"
    "#;
    let backend = CommandBackend::new(
        "sh",
        vec!["-c".to_string(), script.to_string(), "fake-backend".to_string()],
    );
    let orchestrator = Orchestrator::new(Box::new(backend));

    let outcome = orchestrator.run_job(
        job_for(JobTarget::Local("/media/clip.mp3".to_string()), &out),
        &NoProgress,
    );

    assert!(outcome.is_success(), "{}", outcome.status_message());
    let JobOutcome::Succeeded(success) = outcome else {
        unreachable!();
    };
    assert_eq!(success.output_dir, out.join("clip"));
    assert_eq!(success.transcript.as_deref(), Some("One.\n\nTwo?\n\nThree!"));
    assert!(success.artifacts.srt.is_none());
}

#[cfg(unix)]
#[test]
fn test_command_backend_failure_leaves_empty_dir() {
    use transcribe_runner::transcribe::command::CommandBackend;

    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("transcriptions");
    let backend = CommandBackend::new(
        "sh",
        vec![
            "-c".to_string(),
            "echo \"ValueError: unsupported device $9\" >&2; exit 1".to_string(),
            "fake-backend".to_string(),
        ],
    );
    let orchestrator = Orchestrator::new(Box::new(backend));

    let outcome = orchestrator.run_job(
        job_for(JobTarget::Local("/media/clip.mp3".to_string()), &out),
        &NoProgress,
    );

    assert!(!outcome.is_success());
    assert!(outcome.artifacts().is_none());
    let status = outcome.status_message();
    assert!(status.starts_with("An error occurred: "));
    assert!(status.contains("unsupported device cuda"));

    assert!(out.is_dir());
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
}
