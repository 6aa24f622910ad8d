mod binder;
mod catalog;
mod cli;
mod commands;
mod config;
mod env;
mod error;
mod http;
mod image;
mod logging;
mod movie;
mod output;
mod tui;
mod watchlist;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    if !matches!(cli.command, cli::Command::Browse(_)) {
        logging::init(logging::LogMode::Stderr);
    }

    if let Err(err) = commands::dispatch(cli).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
