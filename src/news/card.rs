//! Rendering a news entry as a card in the active language.

use crate::i18n::{Language, LanguageStrings};
use crate::news::NewsEntry;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Marker appended to every excerpt.
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsCard {
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub category: String,
    /// Calendar date for display and for the `datetime` attribute
    pub date: String,
    pub read_more: String,
}

impl NewsCard {
    /// Build the card for `language`, cutting the body to `excerpt_budget`
    /// grapheme clusters.
    pub fn render(entry: &NewsEntry, language: Language, excerpt_budget: usize) -> Self {
        Self {
            title: entry.title(language).to_string(),
            excerpt: truncate_excerpt(entry.body(language), excerpt_budget),
            image: entry.image.clone(),
            category: entry.category.clone(),
            date: display_date(&entry.date),
            read_more: LanguageStrings::for_language(language).read_more.to_string(),
        }
    }

    /// HTML fragment for the news grid. All interpolated text is escaped.
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let category = escape_html(&self.category);
        format!(
            r##"<article class="news-card fade-in-up">
    <div class="news-image">
        <img src="{image}" alt="{title}" loading="lazy">
        <span class="news-badge {category}">{category}</span>
    </div>
    <div class="news-content">
        <time class="news-date" datetime="{date}">{date}</time>
        <h3>{title}</h3>
        <p class="news-excerpt">{excerpt}</p>
        <a href="#" class="news-link">{read_more}</a>
    </div>
</article>"##,
            image = escape_html(&self.image),
            title = title,
            category = category,
            date = escape_html(&self.date),
            excerpt = escape_html(&self.excerpt),
            read_more = escape_html(&self.read_more),
        )
    }
}

/// First `budget` grapheme clusters of `text`, followed by the ellipsis.
///
/// Counting clusters rather than chars keeps Sinhala vowel signs and other
/// combining marks attached to their base letter. Word boundaries are not
/// respected.
pub fn truncate_excerpt(text: &str, budget: usize) -> String {
    let mut excerpt: String = text.graphemes(true).take(budget).collect();
    excerpt.push_str(ELLIPSIS);
    excerpt
}

/// `YYYY-MM-DD` for RFC 3339 timestamps and plain dates; anything else is
/// shown as given.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
