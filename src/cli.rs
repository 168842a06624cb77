//! Command-line interface for talkdub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Turn English two-host dialogue audio into a natural Chinese spoken dialogue
#[derive(Parser, Debug)]
#[command(
    name = "talkdub",
    version,
    about = "Turn English two-host dialogue audio into a natural Chinese spoken dialogue"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-stage detail, -vv: per-segment detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a .wav file, or every .wav file under a directory
    Process {
        /// Input .wav file or directory
        input: PathBuf,

        /// Output directory (default: output/ for a file, batch_output/ for a directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Only transcribe and translate; write transcript_preview.json
        #[arg(long)]
        preview: bool,

        /// Voice for speaker A
        #[arg(long, value_name = "VOICE")]
        voice_female: Option<String>,

        /// Voice for speaker B
        #[arg(long, value_name = "VOICE")]
        voice_male: Option<String>,

        /// Maximum files processed at once in directory mode
        #[arg(long, value_name = "N")]
        concurrent: Option<usize>,
    },

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (credentials as set/unset only)
    Show,
    /// Resolve the configuration and report problems
    Check,
    /// Dump a commented configuration template
    Dump,
}
