use anyhow::Result;
use barfinder::app::AppState;
use barfinder::bot;
use barfinder::config::BotConfig;
use barfinder::db::PgLocationStore;
use barfinder::localization::init_localization;
use barfinder::places::VenueFinder;
use barfinder::store::{InMemoryLocationStore, LocationStore};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.json_logs);

    info!("Starting Bar Finder Telegram Bot");

    init_localization(&config.default_language)?;

    let store: Arc<dyn LocationStore> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to PostgreSQL");
            Arc::new(PgLocationStore::connect(database_url).await?)
        }
        None => {
            warn!("DATABASE_URL not set, locations are kept in memory only");
            Arc::new(InMemoryLocationStore::new())
        }
    };

    let finder = VenueFinder::new(config.provider.clone())?;
    let state = Arc::new(AppState::new(store, finder));

    // Initialize the bot
    let bot = Bot::new(&config.telegram_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
