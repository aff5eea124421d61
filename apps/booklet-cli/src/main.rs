//! Booklet creator binary
//!
//! Entry point for the `booklet` command-line tool.

mod cli;
mod commands;

use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // Logs go to stderr so stdout carries only results
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("booklet v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Create(create) => commands::create(&create),
        Command::Inspect { inputs } => commands::inspect(&inputs),
        Command::Order {
            pages,
            rtl,
            split_sheets,
        } => commands::order(pages, rtl, split_sheets),
        Command::Run { command } => commands::run(&command),
    }
}
