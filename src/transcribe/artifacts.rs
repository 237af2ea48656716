use std::path::{Path, PathBuf};

use serde::Serialize;

pub const SRT_FILE: &str = "out.srt";
pub const TXT_FILE: &str = "out.txt";
pub const JSON_FILE: &str = "out.json";

/// The conventionally named files a backend leaves in its result directory.
/// Each is present only if the file actually exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputArtifactSet {
    pub srt: Option<PathBuf>,
    pub txt: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl OutputArtifactSet {
    /// Look up the artifacts under `dir` as they exist right now.
    pub fn resolve(dir: &Path) -> Self {
        Self {
            srt: existing_file(dir, SRT_FILE),
            txt: existing_file(dir, TXT_FILE),
            json: existing_file(dir, JSON_FILE),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.srt.is_none() && self.txt.is_none() && self.json.is_none()
    }

    /// Names of the artifacts found, for log lines.
    pub fn found_names(&self) -> Vec<&'static str> {
        [
            (SRT_FILE, &self.srt),
            (TXT_FILE, &self.txt),
            (JSON_FILE, &self.json),
        ]
        .into_iter()
        .filter(|(_, path)| path.is_some())
        .map(|(name, _)| name)
        .collect()
    }
}

fn existing_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}

/// True if `dir` directly holds at least one artifact.
pub fn has_artifacts(dir: &Path) -> bool {
    !OutputArtifactSet::resolve(dir).is_empty()
}
