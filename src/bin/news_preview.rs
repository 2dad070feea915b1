//! News preview binary - renders the newest news cards in the terminal
//!
//! Usage:
//!   cargo run --bin news-preview               # Cards in the saved language
//!   cargo run --bin news-preview -- --toggle   # Switch language first
//!   cargo run --bin news-preview -- --html     # Print the card HTML instead
//!
//! Optional environment variables:
//! - NEWS_LISTING_URL
//! - NEWS_LIMIT (defaults to 6)
//! - NEWS_EXCERPT_LENGTH (defaults to 150)
//! - PREFERENCES_FILE (defaults to data/preferences.json)

use anyhow::{Context, Result};
use dairy_coop_site::{
    config::Config,
    i18n::{LanguageManager, LanguageStrings, PageChrome},
    news::{ContentSource, NewsCard},
    storage::FileStore,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dairy_coop_site=info".parse()?),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let toggle = args.iter().any(|arg| arg == "--toggle");
    let as_html = args.iter().any(|arg| arg == "--html");

    info!("Loading configuration...");
    let config = Config::from_env()?;

    let store = FileStore::open(&config.preferences_file)
        .with_context(|| format!("Failed to open {}", config.preferences_file))?;
    let mut manager = LanguageManager::restore(store);

    if toggle {
        manager
            .toggle()
            .context("Failed to save language preference")?;
    }
    let language = manager.get();
    let chrome = PageChrome::for_language(language);

    let content = ContentSource::new(&config.news_listing_url, config.news_request_timeout)
        .context("Failed to build news client")?;

    info!("Fetching the {} newest news entries...", config.news_limit);
    let entries = match content.load_recent(config.news_limit).await {
        Ok(entries) => entries,
        Err(e) => {
            println!("\n{}", LanguageStrings::for_language(language).news_unavailable);
            return Err(e).context("Failed to load news");
        }
    };

    println!(
        "\n========== {} [{} | {}] ==========",
        chrome.og_title, chrome.toggle_current, chrome.toggle_alternate
    );

    if entries.is_empty() {
        println!("(no news)");
    }

    for entry in &entries {
        let card = NewsCard::render(entry, language, config.news_excerpt_length);
        if as_html {
            println!("{}\n", card.to_html());
        } else {
            println!("\n{}  [{}]", card.date, card.category);
            println!("{}", card.title);
            println!("{}", card.excerpt);
            println!("{}", card.read_more);
        }
    }

    println!("\n================================================\n");
    info!("Rendered {} cards in {}", entries.len(), language.native_name());

    Ok(())
}
