use std::path::PathBuf;

use clap::{Parser, Subcommand};
use range_builder::{settings::Settings, startup::App};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the settings file.
    #[arg(short, long, default_value = "config/local.yml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert all configured sources into the canonical range store.
    Ranges,
    /// Label a track file against an existing range store.
    Label,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = Settings::new(&cli.config).unwrap();
    settings.init_tracing();

    let app = App::build(settings);

    match cli.command {
        Command::Ranges => {
            app.build_ranges().await.unwrap();
        }
        Command::Label => {
            app.label_tracks().await.unwrap();
        }
    }
}
