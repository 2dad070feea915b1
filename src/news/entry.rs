use crate::i18n::Language;
use serde::{Deserialize, Serialize};

/// One item of the content store's directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    pub name: String,
    /// Absent for sub-directories
    #[serde(default)]
    pub download_url: Option<String>,
}

/// A news document as stored by the CMS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsEntry {
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub title_si: String,
    #[serde(default)]
    pub body_en: String,
    #[serde(default)]
    pub body_si: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
}

impl NewsEntry {
    pub fn title(&self, language: Language) -> &str {
        if language == Language::SINHALA {
            &self.title_si
        } else {
            &self.title_en
        }
    }

    pub fn body(&self, language: Language) -> &str {
        if language == Language::SINHALA {
            &self.body_si
        } else {
            &self.body_en
        }
    }
}
