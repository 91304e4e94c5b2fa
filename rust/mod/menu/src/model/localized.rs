use serde::{Deserialize, Serialize};

use super::Language;

/// Text in each of the five supported languages.
///
/// Missing entries deserialize as empty strings; [`LocalizedText::resolve`]
/// falls back to Portuguese for those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default)]
    pub pt: String,
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub fr: String,
    #[serde(default)]
    pub de: String,
    #[serde(default)]
    pub es: String,
}

impl LocalizedText {
    /// Same text for every language.
    pub fn uniform(text: &str) -> Self {
        Self {
            pt: text.to_string(),
            en: text.to_string(),
            fr: text.to_string(),
            de: text.to_string(),
            es: text.to_string(),
        }
    }

    /// Raw entry for a language, possibly empty.
    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::Pt => &self.pt,
            Language::En => &self.en,
            Language::Fr => &self.fr,
            Language::De => &self.de,
            Language::Es => &self.es,
        }
    }

    /// Entry for a language, or the Portuguese entry when it is empty.
    pub fn resolve(&self, lang: Language) -> &str {
        let text = self.get(lang);
        if text.is_empty() { &self.pt } else { text }
    }

    pub fn set(&mut self, lang: Language, text: impl Into<String>) {
        let slot = match lang {
            Language::Pt => &mut self.pt,
            Language::En => &mut self.en,
            Language::Fr => &mut self.fr,
            Language::De => &mut self.de,
            Language::Es => &mut self.es,
        };
        *slot = text.into();
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        Language::ALL.into_iter().map(move |lang| self.get(lang))
    }

    /// Languages with an empty entry.
    pub fn missing(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|lang| self.get(*lang).is_empty())
            .collect()
    }
}
