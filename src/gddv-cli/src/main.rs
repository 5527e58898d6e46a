mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Decode { input, format } => commands::decode::run(&input, format)?,
        Commands::Header { input } => commands::header::run(&input)?,
        Commands::Guids { input } => commands::guids::run(&input)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}
