mod analysis;
mod charts;
mod cli;
mod error;
mod explore;
mod fmt;
mod loader;
mod models;
mod settings;
mod tui;

use clap::Parser;
use env_logger::Env;

use cli::{Cli, Commands, ConfigCommands};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Explore {
            input,
            window,
            focus,
            out_dir,
            mode,
        } => cli::explore::run(&input, &window, focus.as_deref(), out_dir, mode),
        Commands::Summary { input, window, all } => cli::summary::summary(&input, &window, all),
        Commands::Counts { input, window, all } => cli::summary::counts(&input, &window, all),
        Commands::Monthly { input, focus } => cli::summary::monthly(&input, focus.as_deref()),
        Commands::Chart {
            kind,
            input,
            window,
            focus,
            all,
            output,
        } => cli::chart::run(kind, &input, &window, focus.as_deref(), all, &output),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set { key, value } => cli::config::set(&key, &value),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
