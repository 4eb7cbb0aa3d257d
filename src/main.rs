use anyhow::Context;
use clap::Parser;

use playcard::{Bot, Config};

/// Telegram bot turning Play Store listings into preview cards.
#[derive(Debug, Parser)]
#[command(name = "playcard", version, about)]
struct Cli {
    /// Bot token; falls back to the TELEGRAM_BOT_TOKEN environment variable
    #[arg(long)]
    token: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("playcard error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let token = cli
        .token
        .or_else(|| std::env::var("TELEGRAM_BOT_TOKEN").ok())
        .filter(|token| !token.is_empty())
        .context("no bot token; pass --token or set TELEGRAM_BOT_TOKEN")?;

    let config = Config::default();
    let bot = Bot::new(&token, &config)?;

    println!("Bot started");
    bot.run();
    Ok(())
}
