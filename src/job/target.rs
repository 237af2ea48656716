use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a submission could not be turned into a job target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please provide either a URL or a local file, not both.")]
    Conflicting,

    #[error("Please provide either a URL or a local file.")]
    Missing,
}

/// The single source a job transcribes.
///
/// Submissions go through [`JobTarget::resolve`] or
/// [`JobTarget::from_combined`], which reject missing, blank and conflicting
/// input. The variants stay public for matching; building one directly skips
/// those checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum JobTarget {
    Remote(String),
    Local(String),
}

impl JobTarget {
    /// Resolve the two separate input fields (URL and local file).
    pub fn resolve(remote: Option<&str>, local: Option<&str>) -> Result<Self, InputError> {
        match (non_empty(remote), non_empty(local)) {
            (Some(_), Some(_)) => Err(InputError::Conflicting),
            (Some(url), None) => Ok(Self::Remote(url.to_string())),
            (None, Some(path)) => Ok(Self::Local(path.to_string())),
            (None, None) => Err(InputError::Missing),
        }
    }

    /// Resolve a single free-form field that may hold either a URL or a path.
    pub fn from_combined(input: Option<&str>) -> Result<Self, InputError> {
        let value = non_empty(input).ok_or(InputError::Missing)?;
        if looks_like_url(value) {
            Ok(Self::Remote(value.to_string()))
        } else {
            Ok(Self::Local(value.to_string()))
        }
    }

    /// The value handed to the backend.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(url) => url,
            Self::Local(path) => path,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for JobTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "url {}", url),
            Self::Local(path) => write!(f, "file {}", path),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// Single-letter schemes are Windows drive letters ("C:\clip.mp3").
fn looks_like_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => parsed.scheme().len() > 1 && parsed.has_host(),
        Err(_) => false,
    }
}
