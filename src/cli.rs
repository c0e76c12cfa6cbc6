use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "piratarr")]
#[command(author, version, about = "Pirate-speak subtitles for Sonarr and Radarr libraries")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server and the background scanner
    Start {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Translate a single SRT file
    Translate {
        /// Subtitle file to translate
        #[arg(required = true)]
        input: PathBuf,

        /// Where to write the result (defaults to the .pirate path next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the random exclamations
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the pirate translation of some text
    Preview {
        /// Text to translate
        #[arg(required = true)]
        text: String,

        /// Seed for the random exclamations
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
