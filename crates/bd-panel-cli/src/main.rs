//! Borrow Direct panel CLI: the `bd-panel` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Resolve {
            snapshot,
            config,
            json,
        } => commands::resolve::run(commands::resolve::Args {
            snapshot,
            config,
            json,
        }),

        Commands::States { config, json } => commands::states::run(config, json),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
