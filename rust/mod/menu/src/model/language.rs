use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported display languages. `Pt` is the default and the fallback for
/// missing translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pt,
    En,
    Fr,
    De,
    Es,
}

impl Language {
    /// Selector order.
    pub const ALL: [Language; 5] = [
        Language::Pt,
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Es => "es",
        }
    }

    /// Label shown as the flag's tooltip.
    pub fn label(self) -> &'static str {
        match self {
            Language::Pt => "Portugal",
            Language::En => "UK",
            Language::Fr => "França",
            Language::De => "Alemanha",
            Language::Es => "Espanha",
        }
    }

    pub fn flag_url(self) -> &'static str {
        match self {
            Language::Pt => "https://flagcdn.com/w160/pt.png",
            Language::En => "https://flagcdn.com/w160/gb.png",
            Language::Fr => "https://flagcdn.com/w160/fr.png",
            Language::De => "https://flagcdn.com/w160/de.png",
            Language::Es => "https://flagcdn.com/w160/es.png",
        }
    }

    /// Parse a language code, case-insensitively. Unknown codes yield None.
    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt" => Some(Language::Pt),
            "en" => Some(Language::En),
            "fr" => Some(Language::Fr),
            "de" => Some(Language::De),
            "es" => Some(Language::Es),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("unsupported language: {}", s))
    }
}
