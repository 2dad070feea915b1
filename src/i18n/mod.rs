//! Internationalization (i18n) for the bilingual English/Sinhala site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported languages
//! - `language`: Validated `Language` type
//! - `strings`: Localized user-facing strings
//! - `manager`: Active-language state persisted in a preference store
//! - `document`: Dual-language page elements and page chrome
//!
//! # Example
//!
//! ```rust,ignore
//! use dairy_coop_site::i18n::{Language, LanguageManager};
//! use dairy_coop_site::storage::MemoryStore;
//!
//! let mut manager = LanguageManager::restore(MemoryStore::new());
//! assert_eq!(manager.get(), Language::ENGLISH);
//! manager.toggle()?;
//! ```

mod document;
mod language;
mod manager;
mod registry;
mod strings;

pub use document::{Bilingual, DualTextDocument, DualTextElement, PageChrome};
pub use language::Language;
pub use manager::LanguageManager;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
