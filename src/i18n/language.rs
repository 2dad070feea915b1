//! Language type: validated language representation.
//!
//! A `Language` can only be constructed for codes present in the registry,
//! so holding one is proof that the code is supported.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code ("en" or "si")
    code: &'static str,
}

impl Language {
    /// Primary language of the site.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Secondary language of the site.
    pub const SINHALA: Language = Language { code: "si" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is supported
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Parse a stored or user-supplied code, falling back to the canonical
    /// language when the value is absent or invalid.
    pub fn from_code_or_canonical(code: Option<&str>) -> Language {
        code.and_then(|c| Language::from_code(c.trim()).ok())
            .unwrap_or_else(Language::canonical)
    }

    /// Get the canonical (primary) language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// The other supported language.
    ///
    /// The site is strictly bilingual, so toggling always flips between the
    /// primary and the secondary language.
    pub fn toggled(&self) -> Language {
        if *self == Language::ENGLISH {
            Language::SINHALA
        } else {
            Language::ENGLISH
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a Language built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Short label for the language toggle ("EN", "සිං").
    pub fn toggle_label(&self) -> &'static str {
        self.config().toggle_label
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::canonical()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_code(&code).map_err(serde::de::Error::custom)
    }
}
