use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Writing systems the fingerspelling transliterator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    Latin,
    Devanagari,
    Telugu,
    Gujarati,
    Other,
}

impl Script {
    /// Map a character to its script by Unicode block.
    pub fn of(c: char) -> Script {
        match c as u32 {
            0x0000..=0x024F => Script::Latin,
            0x0900..=0x097F | 0xA8E0..=0xA8FF => Script::Devanagari,
            0x0A80..=0x0AFF => Script::Gujarati,
            0x0C00..=0x0C7F => Script::Telugu,
            _ => Script::Other,
        }
    }
}

/// Target language of a request: a sign language, or a regional spoken
/// language rendered through ISL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignLanguage {
    Asl,
    Isl,
    Hindi,
    Telugu,
    Gujarati,
}

impl SignLanguage {
    pub const ALL: [SignLanguage; 5] = [
        SignLanguage::Asl,
        SignLanguage::Isl,
        SignLanguage::Hindi,
        SignLanguage::Telugu,
        SignLanguage::Gujarati,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignLanguage::Asl => "asl",
            SignLanguage::Isl => "isl",
            SignLanguage::Hindi => "hindi",
            SignLanguage::Telugu => "telugu",
            SignLanguage::Gujarati => "gujarati",
        }
    }

    /// Languages resolved against the ISL vocabulary and letter images.
    pub fn uses_isl(&self) -> bool {
        !matches!(self, SignLanguage::Asl)
    }

    /// BCP-47 locale used for speech recognition.
    pub fn locale(&self) -> &'static str {
        match self {
            SignLanguage::Asl => "en-US",
            SignLanguage::Isl => "en-IN",
            SignLanguage::Hindi => "hi-IN",
            SignLanguage::Telugu => "te-IN",
            SignLanguage::Gujarati => "gu-IN",
        }
    }

    /// ISO 639-1 code passed to whisper.
    pub fn whisper_code(&self) -> &'static str {
        match self {
            SignLanguage::Asl | SignLanguage::Isl => "en",
            SignLanguage::Hindi => "hi",
            SignLanguage::Telugu => "te",
            SignLanguage::Gujarati => "gu",
        }
    }

    /// Directory name of the matching Vosk model.
    pub fn vosk_model_dir(&self) -> &'static str {
        match self {
            SignLanguage::Asl => "vosk-model-small-en-us-0.15",
            SignLanguage::Isl => "vosk-model-en-in-0.5",
            SignLanguage::Hindi => "vosk-model-small-hi-0.22",
            SignLanguage::Telugu => "vosk-model-small-te-0.42",
            SignLanguage::Gujarati => "vosk-model-small-gu-0.42",
        }
    }
}

impl fmt::Display for SignLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asl" => Ok(SignLanguage::Asl),
            "isl" => Ok(SignLanguage::Isl),
            "hindi" => Ok(SignLanguage::Hindi),
            "telugu" => Ok(SignLanguage::Telugu),
            "gujarati" => Ok(SignLanguage::Gujarati),
            other => Err(DomainError::UnsupportedLanguage(other.to_string())),
        }
    }
}
