//! CLI command definitions and dispatch for the `sforge` binary.
//!
//! Uses clap derive macros for argument parsing. The default flow is the
//! interactive wizard; `serve` exposes the same operations over REST.

pub mod targets;
pub mod wizard;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Build crypto trading strategies stage by stage.
#[derive(Parser)]
#[command(name = "sforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive strategy wizard.
    Wizard {
        /// Target model family (claude, gpt, gemini, or a custom name).
        #[arg(long)]
        target: Option<String>,

        /// Use the built-in mock provider instead of a live API.
        #[arg(long)]
        offline: bool,
    },

    /// List supported model targets and their resolved model ids.
    Targets,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
