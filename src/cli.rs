use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "niftysync")]
#[command(about = "NIFTY 50 daily dataset updater", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download full history for the whole universe and write a fresh dataset
    Backfill,
    /// Fetch the trailing window and merge it into the master dataset
    Update,
    /// Show current dataset status
    Status,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backfill => {
            commands::backfill::run();
        }
        Commands::Update => {
            commands::update::run();
        }
        Commands::Status => {
            commands::status::run();
        }
    }
}
