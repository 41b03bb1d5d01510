//! mimic — Discord channel mirroring bot.

use std::sync::Arc;

use {
    clap::Parser,
    secrecy::ExposeSecret,
    serenity::Client,
    tracing::info,
    tracing_subscriber::EnvFilter,
};

use mimic_discord::MimicHandler;

#[derive(Parser)]
#[command(name = "mimic", about = "mimic — Discord channel mirroring bot")]
struct Cli {
    /// Path to the config file. Defaults to discovering
    /// mimic.{toml,yaml,yml,json} in ./ then ~/.config/mimic/.
    #[arg(long, env = "MIMIC_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    // Configuration faults are fatal: the process never connects with a
    // missing or malformed config.
    let config = match &cli.config {
        Some(path) => mimic_config::load_config(path)?,
        None => mimic_config::discover_and_load()?,
    };
    mimic_config::validate(&config)?;
    info!(
        pairs = config.pairs.len(),
        allowlist = config.discord.allowlist.len(),
        "configuration loaded"
    );

    let token = config.discord.token.expose_secret().clone();
    let handler = MimicHandler::new(Arc::new(config));
    let mut client = Client::builder(&token, MimicHandler::intents())
        .event_handler(handler)
        .await?;

    client.start().await?;
    Ok(())
}
