use std::sync::Arc;
use teloxide::{
    dptree::deps, error_handlers::LoggingErrorHandler, prelude::*, update_listeners::Polling,
    RequestError,
};

use crate::{
    config::Config,
    database::Database,
    handlers::{commands::generate_bot_commands, handle_edited_message, handle_message},
};

/// # Panics
///
/// Panics if the bot fails to start lol
pub async fn entry() {
    log::info!("ASYNC WOOOO");

    let config = Arc::new(Config::load().unwrap_or_else(|e| panic!("Bad configuration: {e}")));

    log::info!("Moderating chat {}", config.allowed_chat);

    let bot = Bot::new(config.token.clone());

    bot.set_my_commands(generate_bot_commands())
        .await
        .expect("Failed to set bot commands!");

    let database: Arc<Database> = Database::new(&config.settings_db)
        .await
        .expect("Failed to create database!");

    log::info!("Creating the handler...");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_edited_message().endpoint(handle_edited_message))
        .endpoint(|| async { Ok::<(), RequestError>(()) }); // bye lol

    // Whatever was sent while we were away is old news.
    let listener = Polling::builder(bot.clone())
        .drop_pending_updates()
        .build();

    log::info!("Dispatching the dispatcher!");

    Dispatcher::builder(bot, handler)
        .default_handler(|_| async {})
        .dependencies(deps![config, database])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("it appears we have been bonked.");
}
