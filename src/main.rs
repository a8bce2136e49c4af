use anyhow::Result;
use clap::Parser;
use launchbot::alert_engine::AlertEngine;
use launchbot::api::DexScreenerClient;
use launchbot::config::Config;
use launchbot::db::Database;
use launchbot::global;
use launchbot::logger::{self, LogTag};
use launchbot::notifications::{ConsoleSink, NotificationSink, TelegramNotifier};
use launchbot::poller::Poller;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "launchbot", about = "New token launch tracker and alert bot")]
struct Cli {
    /// Path to the JSON config file (created with defaults if missing)
    #[arg(long, default_value = "config.json")]
    config: String,

    /// Verbose discovery logging
    #[arg(long)]
    debug_discovery: bool,

    /// Verbose filter logging
    #[arg(long)]
    debug_filtering: bool,

    /// Log every outbound API request
    #[arg(long)]
    debug_api: bool,

    /// Verbose database logging
    #[arg(long)]
    debug_database: bool,

    /// Verbose alert-engine logging
    #[arg(long)]
    debug_alerts: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::header("starting");
    let debug_modules: Vec<&str> = [
        ("discovery", cli.debug_discovery),
        ("filtering", cli.debug_filtering),
        ("api", cli.debug_api),
        ("database", cli.debug_database),
        ("alerts", cli.debug_alerts),
    ]
    .iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(name, _)| *name)
    .collect();
    if !debug_modules.is_empty() {
        logger::info(
            LogTag::Startup,
            &format!("Debug logging for: {}", debug_modules.join(", ")),
        );
    }
    logger::info(
        LogTag::Startup,
        &format!("Started at {}", global::STARTUP_TIME.to_rfc3339()),
    );

    let config = Config::load(&cli.config)?;
    logger::info(LogTag::Startup, &format!("Config loaded from {}", cli.config));

    let db = Database::open(&config.database.path)?;
    logger::info(
        LogTag::Database,
        &format!("Database ready at {}", config.database.path),
    );

    let api = Arc::new(DexScreenerClient::new(&config.dexscreener)?);

    let poller = Poller::new(
        api.clone(),
        db.clone(),
        config.discovery.interval_seconds,
        config.database.prune_max_age_hours as i64,
    );
    if config.discovery.enabled {
        poller.start();
    } else {
        logger::warn(LogTag::Poller, "Discovery disabled in config");
    }

    let sink: Arc<dyn NotificationSink> = if config.alerts.telegram_bot_token.is_empty() {
        logger::warn(LogTag::Notify, "No Telegram token, logging alerts to console");
        Arc::new(ConsoleSink)
    } else {
        match TelegramNotifier::new(&config.alerts.telegram_bot_token) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                logger::error(LogTag::Notify, &format!("Telegram setup failed: {}", e));
                Arc::new(ConsoleSink)
            }
        }
    };

    let alert_engine = AlertEngine::new(db.clone(), sink, config.alerts.interval_seconds);
    if config.alerts.enabled {
        alert_engine.start();
    } else {
        logger::warn(LogTag::Alerts, "Alerts disabled in config");
    }

    ctrlc::set_handler(|| {
        logger::warn(LogTag::Startup, "Shutdown requested");
        global::request_shutdown();
    })?;

    while !global::is_shutdown() {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    poller.stop();
    alert_engine.stop();
    logger::info(LogTag::Startup, "Goodbye");
    Ok(())
}
