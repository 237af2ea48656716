use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::catalog::GERMAN_TURBO_MODEL;
use crate::job::{AuthToken, Device, Task};
use crate::present::ViewKind;
use crate::transcribe::runner::OutputLayout;

pub const CONFIG_FILE_NAME: &str = "transcribe-runner.toml";
pub const HF_TOKEN_ENV: &str = "TRANSCRIBE_HF_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub job: JobDefaults,
    pub output: OutputConfig,
    pub backend: BackendConfig,
}

/// Defaults for a submission; command-line flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDefaults {
    pub model: String,
    /// Empty means no preference; "auto" asks the backend to detect.
    pub language: String,
    pub device: Device,
    pub task: Task,
    pub initial_prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base output directory. Its contents are replaced by every job.
    pub directory: PathBuf,
    pub layout: OutputLayout,
    pub view: ViewKind,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Program to run (looked up on PATH unless absolute).
    pub command: String,
    /// Arguments placed before the per-job arguments.
    pub args: Vec<String>,
    /// HuggingFace token for private models (or set TRANSCRIBE_HF_TOKEN).
    pub hf_token: String,
    /// Environment variable the token is handed to the backend in. Keeps it
    /// off the backend's command line.
    pub token_env: String,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("command", &self.command)
            .field("args", &self.args)
            .field("hf_token", &"[REDACTED]")
            .field("token_env", &self.token_env)
            .finish()
    }
}

impl BackendConfig {
    /// Token from the config file, falling back to the environment.
    pub fn resolve_hf_token(&self) -> Option<AuthToken> {
        AuthToken::new(self.hf_token.clone())
            .or_else(|| std::env::var(HF_TOKEN_ENV).ok().and_then(AuthToken::new))
    }
}

// --- Default implementations ---

impl Default for Config {
    fn default() -> Self {
        Self {
            job: JobDefaults::default(),
            output: OutputConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

impl Default for JobDefaults {
    fn default() -> Self {
        Self {
            model: GERMAN_TURBO_MODEL.to_string(),
            language: "de".to_string(),
            device: Device::Accelerated,
            task: Task::Transcribe,
            initial_prompt: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            layout: OutputLayout::Shared,
            view: ViewKind::Text,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: "transcribe-anything".to_string(),
            args: Vec::new(),
            hf_token: String::new(),
            token_env: "HF_TOKEN".to_string(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    std::env::temp_dir().join("transcribe_anything_output")
}

/// Where `init-config` writes and where `load` looks last.
pub fn platform_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("transcribe-runner").join("config.toml"))
}

// --- Config loading ---

impl Config {
    /// The config file `load` would read: the explicit path if given,
    /// otherwise the first existing file beside the executable or in the
    /// platform config directory.
    pub fn find_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(p.to_path_buf());
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)));
        beside_exe
            .into_iter()
            .chain(platform_config_path())
            .find(|p| p.exists())
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match Self::find_file(path) {
            Some(p) => {
                let config = Self::from_file(&p)?;
                tracing::info!("Loaded config from {}", p.display());
                Ok(config)
            }
            None => {
                tracing::info!("No config file found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Generate a default config file with all fields and inline documentation.
    pub fn generate_default_commented() -> String {
        let output_dir_str = default_output_dir()
            .to_string_lossy()
            .replace('\\', "\\\\");

        format!(
r#"# transcribe-runner configuration
# Command-line flags override the values below.

[job]
# Model passed to the backend. Whisper names (tiny, base, small, medium,
# large-v3, turbo, ...) or a HuggingFace repo id.
model = "{model}"
# Language code (e.g. "de", "en"). "auto" or "" lets the backend detect it.
language = "de"
# Compute device: "cpu", "cuda" or "insane" (accelerated batched pipeline).
device = "insane"
# "transcribe" keeps the spoken language, "translate" produces English.
task = "transcribe"
# Optional context for the model, e.g. names or domain terms.
initial_prompt = ""

[output]
# Base directory for results. WARNING: its contents are deleted before
# every job so that only the latest results remain.
directory = "{output_dir}"
# "shared": every job reuses the directory above (jobs run one at a time).
# "per_job": every job gets its own job-<timestamp> subdirectory.
layout = "shared"
# What 'run' prints: "text" (formatted transcript) or "files" (artifact paths).
view = "text"

[backend]
# Transcription program to run. It receives the URL or file followed by
# --output_dir, --model, --task, --device and optional --language and
# --initial_prompt.
command = "transcribe-anything"
# Extra arguments placed before the per-job arguments.
args = []
# HuggingFace token for private models (or set {token_env}).
# hf_token = ""
# Environment variable the backend receives the token in.
token_env = "HF_TOKEN"
"#,
            model = GERMAN_TURBO_MODEL,
            output_dir = output_dir_str,
            token_env = HF_TOKEN_ENV,
        )
    }
}
