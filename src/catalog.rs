use std::fmt;

use crate::job::params::AUTO_LANGUAGE;

/// Read-only source of the options a backend accepts.
pub trait OptionCatalog {
    fn languages(&self) -> Vec<String>;
    fn tasks(&self) -> Vec<String>;
    fn models(&self) -> Vec<String>;

    fn has_language(&self, code: &str) -> bool {
        self.languages().iter().any(|l| l == code)
    }

    fn has_model(&self, model: &str) -> bool {
        self.models().iter().any(|m| m == model)
    }
}

/// One entry of the language picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageChoice {
    /// Nothing selected.
    NoPreference,
    /// Explicitly ask the backend to detect the language.
    Auto,
    Code(String),
}

impl LanguageChoice {
    /// What the backend is sent: both sentinels omit the language.
    pub fn dispatch_value(&self) -> Option<&str> {
        match self {
            Self::NoPreference | Self::Auto => None,
            Self::Code(code) => Some(code),
        }
    }
}

impl fmt::Display for LanguageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPreference => write!(f, "(none)"),
            Self::Auto => f.write_str(AUTO_LANGUAGE),
            Self::Code(code) => f.write_str(code),
        }
    }
}

/// The catalog's languages, preceded by the "no preference" and "auto"
/// sentinels.
pub fn language_choices(catalog: &dyn OptionCatalog) -> Vec<LanguageChoice> {
    let mut choices = vec![LanguageChoice::NoPreference, LanguageChoice::Auto];
    choices.extend(catalog.languages().into_iter().map(LanguageChoice::Code));
    choices
}

pub const GERMAN_TURBO_MODEL: &str = "primeline/whisper-large-v3-turbo-german";

const WHISPER_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large",
    "large-v2",
    "large-v3",
    "turbo",
    GERMAN_TURBO_MODEL,
];

const WHISPER_TASKS: &[&str] = &["transcribe", "translate"];

const WHISPER_LANGUAGES: &[&str] = &[
    "af", "am", "ar", "as", "az", "ba", "be", "bg", "bn", "bo", "br", "bs", "ca", "cs", "cy",
    "da", "de", "el", "en", "es", "et", "eu", "fa", "fi", "fo", "fr", "gl", "gu", "ha", "haw",
    "he", "hi", "hr", "ht", "hu", "hy", "id", "is", "it", "ja", "jw", "ka", "kk", "km", "kn",
    "ko", "la", "lb", "ln", "lo", "lt", "lv", "mg", "mi", "mk", "ml", "mn", "mr", "ms", "mt",
    "my", "ne", "nl", "nn", "no", "oc", "pa", "pl", "ps", "pt", "ro", "ru", "sa", "sd", "si",
    "sk", "sl", "sn", "so", "sq", "sr", "su", "sv", "sw", "ta", "te", "tg", "th", "tk", "tl",
    "tr", "tt", "uk", "ur", "uz", "vi", "yi", "yo", "yue", "zh",
];

/// Built-in catalog of Whisper models, languages and tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhisperCatalog;

impl OptionCatalog for WhisperCatalog {
    fn languages(&self) -> Vec<String> {
        WHISPER_LANGUAGES.iter().map(|s| s.to_string()).collect()
    }

    fn tasks(&self) -> Vec<String> {
        WHISPER_TASKS.iter().map(|s| s.to_string()).collect()
    }

    fn models(&self) -> Vec<String> {
        WHISPER_MODELS.iter().map(|s| s.to_string()).collect()
    }
}
