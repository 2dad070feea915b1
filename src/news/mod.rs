//! News section: entries from the CMS content store, rendered as cards.

mod card;
mod entry;
mod loader;

pub use card::{display_date, escape_html, truncate_excerpt, NewsCard, ELLIPSIS};
pub use entry::{ListingItem, NewsEntry};
pub use loader::{select_recent, ContentError, ContentSource};
