//! CLI definitions for AutoProbe.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// AutoProbe CLI.
#[derive(Parser)]
#[command(name = "autoprobe")]
#[command(about = "Autonomous exploration and documentation of UI prototypes")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Explore one prototype in the foreground
    Explore(ExploreArgs),

    /// Run the HTTP control surface
    Serve {
        /// Server host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct ExploreArgs {
    /// App name; prompted for when missing
    #[arg(long)]
    pub app: Option<String>,

    /// Prototype URL with a starting-point-node-id
    #[arg(long)]
    pub url: String,

    /// Prototype password
    #[arg(long)]
    pub password: Option<String>,

    /// Root directory for apps/ and design caches (overrides config)
    #[arg(long)]
    pub root_dir: Option<PathBuf>,

    /// Task description; prompted for when missing
    #[arg(long)]
    pub task_desc: Option<String>,

    /// Persona the model should act as
    #[arg(long)]
    pub persona_desc: Option<String>,
}
