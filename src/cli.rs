use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::app_info;

#[derive(Parser, Debug)]
#[command(
    name = "bmcbl-import",
    version = app_info::long_version(),
    about = "Import .mcworld / .mcpack / .mcaddon files into a Minecraft Bedrock version"
)]
pub struct Cli {
    /// Launcher backend RPC endpoint (overrides backend.endpoint)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    /// Enable debug logging (overrides launcher.debug)
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import content files into a version
    Import {
        /// Version folder name
        #[arg(short = 'g', long = "game-version")]
        game_version: String,
        /// Player to preselect (or to use with --non-interactive)
        #[arg(long)]
        player: Option<String>,
        /// Never prompt: use the current player and skip duplicates
        #[arg(long)]
        non_interactive: bool,
        /// Send file contents instead of paths
        #[arg(long)]
        in_memory: bool,
        /// Treat in-memory files as dropped rather than picked
        #[arg(long, requires = "in_memory")]
        dropped: bool,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show world / pack / skin counts for a version
    Counts {
        #[arg(short = 'g', long = "game-version")]
        game_version: String,
        #[arg(long)]
        player: Option<String>,
    },
    /// List players of a version
    Players {
        #[arg(short = 'g', long = "game-version")]
        game_version: String,
    },
    /// Describe a backend import error code
    Explain { code: String },
    /// Configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the whole config or one dotted key
    Get { key: Option<String> },
    /// Set a dotted key; the value is parsed as JSON, falling back to a string
    Set { key: String, value: String },
}
