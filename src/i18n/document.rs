//! Dual-language page content.
//!
//! A page is authored with both language payloads on each translatable
//! element. Switching language re-renders every element from the payload of
//! the active language. Elements without a usable payload keep whatever
//! they currently show; there is no cross-language fallback.

use crate::i18n::{Language, LanguageStrings};
use serde::Serialize;

/// A pair of values, one per supported language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bilingual<T> {
    pub en: T,
    pub si: T,
}

impl<T> Bilingual<T> {
    pub fn new(en: T, si: T) -> Self {
        Self { en, si }
    }

    pub fn get(&self, language: Language) -> &T {
        if language == Language::SINHALA {
            &self.si
        } else {
            &self.en
        }
    }
}

/// One translatable element: a text node or a form control placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualTextElement {
    id: String,
    text: Bilingual<Option<String>>,
    placeholder: Bilingual<Option<String>>,
    rendered_text: String,
    rendered_placeholder: Option<String>,
}

impl DualTextElement {
    /// A text element currently showing `initial`.
    pub fn text(
        id: impl Into<String>,
        initial: impl Into<String>,
        en: Option<&str>,
        si: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            text: Bilingual::new(en.map(str::to_string), si.map(str::to_string)),
            placeholder: Bilingual::default(),
            rendered_text: initial.into(),
            rendered_placeholder: None,
        }
    }

    /// Attach per-language placeholders, making this an input element whose
    /// placeholder (not its text) is switched.
    pub fn with_placeholders(mut self, en: Option<&str>, si: Option<&str>) -> Self {
        self.placeholder = Bilingual::new(en.map(str::to_string), si.map(str::to_string));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }

    pub fn rendered_placeholder(&self) -> Option<&str> {
        self.rendered_placeholder.as_deref()
    }

    /// Only elements carrying both payloads take part in switching.
    pub fn is_dual(&self) -> bool {
        self.text.en.is_some() && self.text.si.is_some()
    }

    fn apply(&mut self, language: Language) {
        if !self.is_dual() {
            return;
        }

        let text = match self.text.get(language).as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => return,
        };

        match self.placeholder.get(language) {
            Some(placeholder) => self.rendered_placeholder = Some(placeholder.clone()),
            None => self.rendered_text = text.to_string(),
        }
    }
}

/// Language-dependent page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageChrome {
    /// Value of the document's `lang` attribute
    pub html_lang: &'static str,
    /// Toggle label for the active language
    pub toggle_current: &'static str,
    /// Toggle label for the language the toggle switches to
    pub toggle_alternate: &'static str,
    pub meta_description: &'static str,
    pub og_title: &'static str,
    pub og_description: &'static str,
}

impl PageChrome {
    pub fn for_language(language: Language) -> Self {
        let strings = LanguageStrings::for_language(language);
        Self {
            html_lang: language.code(),
            toggle_current: language.toggle_label(),
            toggle_alternate: language.toggled().toggle_label(),
            meta_description: strings.meta_description,
            og_title: strings.og_title,
            og_description: strings.og_description,
        }
    }
}

/// Every translatable element of a page plus its chrome.
#[derive(Debug, Clone)]
pub struct DualTextDocument {
    elements: Vec<DualTextElement>,
    chrome: PageChrome,
}

impl DualTextDocument {
    pub fn new(elements: Vec<DualTextElement>) -> Self {
        Self {
            elements,
            chrome: PageChrome::for_language(Language::canonical()),
        }
    }

    /// Re-render all elements and the chrome for `language`.
    pub fn apply(&mut self, language: Language) {
        for element in &mut self.elements {
            element.apply(language);
        }
        self.chrome = PageChrome::for_language(language);
    }

    pub fn elements(&self) -> &[DualTextElement] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&DualTextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }
}
