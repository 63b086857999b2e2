use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

use campus_qa_bot::application::errors::BotError;
use campus_qa_bot::application::messaging::{CommandRouter, QUESTION_COMMAND};
use campus_qa_bot::application::services::{MessageService, QaService, WhitelistStore};
use campus_qa_bot::domain::entities::{ChatContext, Response, User};
use campus_qa_bot::domain::traits::Bot;
use campus_qa_bot::infrastructure::adapters::ConsoleAdapter;
use campus_qa_bot::infrastructure::config::Config;
use campus_qa_bot::infrastructure::storage::{self, YamlConfigStore};

#[derive(Parser)]
#[command(name = "campus-qa-bot")]
#[command(about = "Fuzzy-matching QA bot for whitelisted groups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the console bot; each input line is a chat message
    Run {
        /// Group the console session posts in
        #[arg(short, long)]
        group: Option<String>,

        /// User id of the console session
        #[arg(short, long, default_value = "console")]
        user: String,
    },
    /// Ask one question and print the answer
    Ask {
        question: Vec<String>,

        #[arg(short, long)]
        group: Option<String>,

        /// Sender user id
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Show version
    Version,
    /// Print the default config
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

    let result = match cli.command {
        Commands::Run { group, user } => run_bot(&cli.config, group, user),
        Commands::Ask { question, group, user } => ask(&cli.config, &question, group, user),
        Commands::Version => {
            println!("campus-qa-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Config as written in the file, without env overrides
fn load_config(config_path: &str) -> Config {
    if Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        })
    } else {
        tracing::info!("No config at {}, using defaults", config_path);
        Config::default()
    }
}

fn build_router(config_path: &str) -> CommandRouter {
    let file_config = load_config(config_path);
    let mut config = file_config.clone();
    config.apply_env();
    tracing::info!("Starting {}", config.bot.name);

    let store = storage::load_or_create(&config.qa.data_path);
    let qa = QaService::new(store, &config.qa);

    let persistence = Arc::new(YamlConfigStore::new(config_path, file_config));
    let whitelist = WhitelistStore::new(config.whitelist.clone(), persistence);
    tracing::info!("Whitelist has {} groups, {} admins", whitelist.list().len(), config.admins.len());

    CommandRouter::new(config.bot.prefix.clone(), qa, whitelist, config.admins)
}

fn run_bot(config_path: &str, group: Option<String>, user: String) -> Result<(), BotError> {
    let router = Arc::new(build_router(config_path));
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        let service = MessageService::new(ConsoleAdapter::default(), router);
        run_console_bot(&service, group, user).await
    })
}

async fn run_console_bot(
    service: &MessageService<ConsoleAdapter>,
    group: Option<String>,
    user: String,
) -> Result<(), BotError> {
    let bot = service.bot();
    bot.start().await?;

    let info = bot.bot_info();
    tracing::info!("Bot started: @{} (group {:?}, user {})", info.username, group, user);

    while let Some(input) = bot.read_line("> ").await {
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        let mut message = service.router().parser()
            .parse("console", &input, Some(User::new(user.clone())))
            .with_platform("console");
        if let Some(group) = &group {
            message = message.with_group(group.clone());
        }

        if let Err(e) = service.process(&message).await {
            tracing::error!("Failed to send response: {}", e);
        }
    }

    tracing::info!("Console input closed, shutting down");
    Ok(())
}

fn ask(config_path: &str, question: &[String], group: Option<String>, user: Option<String>) -> Result<(), BotError> {
    let router = build_router(config_path);
    let ctx = ChatContext {
        group_id: group,
        user_id: user,
    };

    match router.dispatch(QUESTION_COMMAND, question, &ctx) {
        Response::Silent => {
            tracing::info!("No response: group {:?} is not whitelisted", ctx.group_id);
        }
        Response::Text(text) => println!("{}", text),
        Response::Composite { text, image } => {
            println!("{}", text);
            println!("[Image] {}", image.display());
        }
    }
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Internal(format!("Failed to serialize config: {}", e)))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
