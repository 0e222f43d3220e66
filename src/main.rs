use std::sync::Arc;

use clap::{Parser, Subcommand};

mod application;
mod domain;
mod infrastructure;

use application::messaging::handlers::builtin_registry;
use application::messaging::Router;
use domain::traits::Bot;
use infrastructure::adapters::console::ConsoleAdapter;
use infrastructure::adapters::telegram::TelegramAdapter;
use infrastructure::completion::AzureChatProvider;
use infrastructure::config::Config;
use infrastructure::storage::SqliteStore;

#[derive(Parser)]
#[command(name = "tally-bot")]
#[command(about = "A keyword-counting chat bot with a completion fallback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("tally-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting tally-bot: {}", config.bot.name);

    // Misconfiguration is fatal here; nothing below limps along without its
    // collaborators.
    let store = match SqliteStore::open(&config.store.path) {
        Ok(store) => {
            tracing::info!("Store initialized at {}", config.store.path.display());
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let completion = match AzureChatProvider::new(&config.completion) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::error!("Completion service misconfigured: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match builtin_registry() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("Command registration failed: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Registered {} commands", registry.len());

    let router = Router::new(config.bot.prefix.clone(), registry, store, completion);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(token) = token_override.or_else(|| {
        config
            .adapters
            .telegram
            .as_ref()
            .and_then(|t| t.token.clone())
    }) {
        // Run Telegram bot
        rt.block_on(async {
            let mut bot = TelegramAdapter::new(token);
            run_telegram_bot(&mut bot, &router).await;
        });
    } else {
        // Run console bot (dev mode)
        rt.block_on(async {
            let bot = ConsoleAdapter::new();
            run_console_bot(bot, &router).await;
        });
    }
}

async fn run_telegram_bot(bot: &mut TelegramAdapter, router: &Router) {
    if let Err(e) = bot.fetch_bot_info().await {
        tracing::error!("Failed to fetch bot info: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    // Publish the command menu from the registry
    let menu: Vec<(String, String)> = router
        .registry()
        .all()
        .map(|cmd| (cmd.name.clone(), cmd.description.clone()))
        .collect();
    if let Err(e) = bot.register_commands(&menu).await {
        tracing::warn!("Failed to register commands: {}", e);
    }

    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match bot.get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                for update in &updates {
                    let Some(msg) = &update.message else { continue };
                    let chat_id = msg.chat.id.to_string();
                    let Some(text) = msg.text.as_deref() else {
                        continue;
                    };
                    if text.trim().is_empty() {
                        continue;
                    }

                    if let Some(user) = &msg.from {
                        tracing::debug!(
                            "Sender: {} (@{})",
                            user.id,
                            user.username.as_deref().unwrap_or("-")
                        );
                    }
                    tracing::info!("Received message from {}: {}", chat_id, text);
                    let reply = router.route_text(&chat_id, text).await;

                    if let Err(e) = bot.send_message(&chat_id, &reply).await {
                        tracing::error!("Failed to send message: {}", e);
                    }
                }

                if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
                    offset = next;
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(bot: ConsoleAdapter, router: &Router) {
    if let Err(e) = bot.start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = bot.bot_info();
    tracing::info!("Bot started: @{}", info.username);

    loop {
        let Some(input) = bot.read_line("> ").await else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        let reply = router.route_text("console", &input).await;
        let _ = bot.send_message("console", &reply).await;
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => {
            tracing::error!("Failed to render default config: {}", e);
            std::process::exit(1);
        }
    }
}
