//! Ping command - check the record store and provider configuration.

use console::style;

use sugeum_remote::NotionStore;

use super::load_config;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if config.provider.api_key().is_some() {
        println!(
            "{} Provider: {} ({})",
            style("✓").green(),
            config.provider.model,
            config.provider.base_url
        );
    } else {
        println!(
            "{} Provider: {} not set, notes are analyzed with rules only",
            style("ℹ").blue(),
            config.provider.api_key_env
        );
    }

    let store = NotionStore::from_config(&config.store)?;
    match store.ping().await {
        Ok(title) => {
            println!("{} Record store: '{}'", style("✓").green(), title);
            Ok(())
        }
        Err(e) => {
            println!("{} Record store: {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}
