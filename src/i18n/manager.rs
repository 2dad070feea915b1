//! Active-language state with write-through persistence.

use crate::i18n::Language;
use crate::storage::{PreferenceStore, StoreError, PREFERRED_LANGUAGE_KEY};
use tracing::{info, warn};

/// Owns the active display language and the store it is persisted in.
///
/// The language is restored from the store on construction and written back
/// on every change.
#[derive(Debug)]
pub struct LanguageManager<S: PreferenceStore> {
    current: Language,
    store: S,
}

impl<S: PreferenceStore> LanguageManager<S> {
    /// Restore the saved language, falling back to the canonical language
    /// when nothing (or something unsupported) was saved.
    pub fn restore(store: S) -> Self {
        let saved = store.get(PREFERRED_LANGUAGE_KEY);
        let current = Language::from_code_or_canonical(saved.as_deref());

        if let Some(raw) = saved.as_deref() {
            if raw.trim() != current.code() {
                warn!(
                    "Ignoring unsupported saved language '{}', using {}",
                    raw, current
                );
            }
        }

        Self { current, store }
    }

    pub fn get(&self) -> Language {
        self.current
    }

    /// Switch to the other language and persist it.
    pub fn toggle(&mut self) -> Result<Language, StoreError> {
        let next = self.current.toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn set(&mut self, language: Language) -> Result<(), StoreError> {
        self.store.set(PREFERRED_LANGUAGE_KEY, language.code())?;
        self.current = language;
        info!("Language switched to: {}", language);
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
