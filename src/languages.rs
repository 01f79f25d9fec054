use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered by the selector controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Fr,
    Es,
    De,
    It,
    Zh,
    Ar,
    Ru,
    Ja,
    Ko,
}

/// Catalog order as shown in the selectors
pub const CATALOG: [LanguageCode; 10] = [
    LanguageCode::En,
    LanguageCode::Fr,
    LanguageCode::Es,
    LanguageCode::De,
    LanguageCode::It,
    LanguageCode::Zh,
    LanguageCode::Ar,
    LanguageCode::Ru,
    LanguageCode::Ja,
    LanguageCode::Ko,
];

#[derive(Debug, thiserror::Error)]
#[error("Unknown language code: {0}")]
pub struct LanguageError(pub String);

/// Catalog entry served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: LanguageCode,
    pub name: String,
}

impl LanguageCode {
    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Fr => "fr",
            LanguageCode::Es => "es",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Zh => "zh",
            LanguageCode::Ar => "ar",
            LanguageCode::Ru => "ru",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Fr => "French",
            LanguageCode::Es => "Spanish",
            LanguageCode::De => "German",
            LanguageCode::It => "Italian",
            LanguageCode::Zh => "Chinese",
            LanguageCode::Ar => "Arabic",
            LanguageCode::Ru => "Russian",
            LanguageCode::Ja => "Japanese",
            LanguageCode::Ko => "Korean",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageError;

    /// Accepts a code (`fr`) or a display name (`French`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        CATALOG
            .iter()
            .copied()
            .find(|lang| lang.code() == needle || lang.display_name().to_lowercase() == needle)
            .ok_or_else(|| LanguageError(s.to_string()))
    }
}

/// The full catalog in selector order
pub fn catalog() -> Vec<LanguageEntry> {
    CATALOG
        .iter()
        .map(|lang| LanguageEntry {
            code: *lang,
            name: lang.display_name().to_string(),
        })
        .collect()
}
