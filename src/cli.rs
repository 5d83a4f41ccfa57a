use clap::{Parser, Subcommand};
use media_explorer_common::{SortField, SortOrder};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media-explorer")]
#[command(author, version, about = "Browse a media directory and stream its files over HTTP")]
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
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Media root directory (overrides config and MEDIA_ROOT)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// List a directory inside the media root
    List {
        /// Directory to list, absolute or relative to the media root
        path: Option<String>,

        /// Media root directory (overrides config and MEDIA_ROOT)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Sort field: name, size, date, or type
        #[arg(long, default_value = "name")]
        sort: SortField,

        /// Sort order: asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
