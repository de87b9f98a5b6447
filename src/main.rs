mod commands;
mod logging;
mod router;
mod supervisor;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use kurumi_channels::whatsapp::WhatsAppConnection;
use kurumi_core::{
    command::{CommandDeps, SharedContext},
    config::{self, Config},
    registry::Registry,
    traits::Connection,
};
use kurumi_media::fetch::HttpFetcher;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "kurumi", version, about = "Kurumi | Bot: prefix commands for WhatsApp")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair (if needed) and run the bot.
    Start,
    /// Show configuration, session, and the registered commands.
    Status,
    /// Forget the paired session so the next start shows a new QR code.
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = config::load_file(&cli.config)?;
    let from_file = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => start(cfg, &cli.config, from_file).await,
        Commands::Status => {
            status(&cli.config, from_file, &cfg);
            Ok(())
        }
        Commands::Logout => logout(&cfg),
    }
}

fn load_registry(cfg: Arc<Config>) -> anyhow::Result<Registry> {
    let user_agent = format!("kurumi/{}", cfg.bot.version);
    let deps = CommandDeps {
        fetcher: Arc::new(HttpFetcher::new(&user_agent)?),
        config: cfg.clone(),
    };
    Ok(Registry::load(
        commands::BUILTIN,
        &deps,
        &cfg.commands.disabled,
    ))
}

async fn start(cfg: Config, config_path: &str, from_file: bool) -> anyhow::Result<()> {
    let _log_guard = logging::init(&cfg.bot.log_dir(), &cfg.bot.log_level)?;
    info!("Booting {}...", cfg.bot.name);
    if !from_file {
        info!("Config file not found at {config_path}, using defaults");
    }

    let cfg = Arc::new(cfg);
    let registry = Arc::new(load_registry(cfg.clone())?);
    if registry.is_empty() {
        warn!("no commands registered; the bot will only log messages");
    }
    let shared = Arc::new(SharedContext {
        prefix: cfg.bot.prefix.clone(),
        commands: registry.descriptors().to_vec(),
        bot: cfg.bot.clone(),
        started_at: Instant::now(),
    });

    let wa = Arc::new(WhatsAppConnection::new(&cfg.bot));
    let rx = wa
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start WhatsApp session: {e}"))?;

    let conn: Arc<dyn Connection> = wa.clone();
    let router = router::Router::new(registry, shared, conn);
    let router_task = tokio::spawn(router.run(rx));

    let session_dir = cfg.bot.session_dir();
    let result = tokio::select! {
        res = supervisor::supervise(wa.as_ref(), &cfg.reconnect, &session_dir) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    wa.stop().await;
    router_task.abort();
    if let Err(e) = &result {
        error!("{e}");
    }
    info!("{} stopped", cfg.bot.name);
    result
}

fn status(config_path: &str, from_file: bool, cfg: &Config) {
    println!("{} v{}\n", cfg.bot.name, cfg.bot.version);
    if from_file {
        println!("Config:   {config_path}");
    } else {
        println!("Config:   {config_path} (not found, using defaults)");
    }
    println!("Prefix:   {}", cfg.bot.prefix);
    println!("Mode:     {}", cfg.bot.mode);
    println!("Dev self: {}", cfg.bot.dev_self);

    let session_db = cfg.bot.session_dir().join("whatsapp.db");
    println!(
        "Session:  {} ({})",
        session_db.display(),
        if session_db.exists() {
            "paired"
        } else {
            "not paired"
        }
    );
    println!();

    match load_registry(Arc::new(cfg.clone())) {
        Ok(registry) => {
            println!("Commands ({}):", registry.unique_count());
            for cmd in registry.descriptors() {
                let aliases = if cmd.header.aliases.is_empty() {
                    "-".to_string()
                } else {
                    cmd.header.aliases.join(", ")
                };
                println!(
                    "  {:<8} {:<8} {:<20} {}",
                    cmd.name(),
                    cmd.category,
                    aliases,
                    cmd.header.usage
                );
            }
        }
        Err(e) => println!("Commands: unavailable ({e})"),
    }
}

fn logout(cfg: &Config) -> anyhow::Result<()> {
    let dir = cfg.bot.session_dir();
    if !dir.exists() {
        println!("No session at {}", dir.display());
        return Ok(());
    }
    std::fs::remove_dir_all(&dir)?;
    println!("Session removed: {}", dir.display());
    println!("Run `kurumi start` to pair again.");
    Ok(())
}
