//! seriesdoc CLI
//!
//! Command-line tools for publishing time-series points to a document store.
//!
//! # Commands
//!
//! - `mapping` - Print the index creation body
//! - `plan` - Show the bulk requests a sync would send, without sending them
//! - `ping` - Check that the store is reachable
//! - `sync` - Write a points file to the store
//! - `version` - Show version information

mod client;
mod commands;
mod error;
mod input;

use clap::{Args, Parser, Subcommand, ValueEnum};
use seriesdoc_core::{MergeLabel, OutputModes};
use seriesdoc_sync_engine::{DeleteFailurePolicy, SyncConfig};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// seriesdoc command-line tools.
#[derive(Parser)]
#[command(name = "seriesdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Connection to the document store.
#[derive(Args)]
struct StoreArgs {
    /// Store URL
    #[arg(short, long, default_value = "http://localhost:9200")]
    url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

/// Points and how to shape them.
#[derive(Args)]
struct WriteArgs {
    /// JSON file holding an array of points
    #[arg(long)]
    points: PathBuf,

    /// Project identifier; documents go to index d_<project>
    #[arg(long)]
    project: String,

    /// One document per point, tags/fields as attributes
    #[arg(long)]
    wide: bool,

    /// One document per point, tags/fields in an embedded array
    #[arg(long)]
    array: bool,

    /// One document per tag/field
    #[arg(long)]
    flat: bool,

    /// Write field documents of every series under this shared type
    #[arg(long)]
    merge: Option<String>,

    /// What to do when deletes fail for reasons other than "not found"
    #[arg(long, value_enum, default_value = "fatal")]
    on_delete_failure: DeletePolicyArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum DeletePolicyArg {
    Fatal,
    RetryOnce,
}

impl WriteArgs {
    fn config(&self, verbose: bool) -> Result<SyncConfig, CliError> {
        let modes = OutputModes::none()
            .with_wide(self.wide)
            .with_array(self.array)
            .with_flat(self.flat);
        if modes.is_empty() {
            return Err(CliError::NoOutputMode);
        }
        let policy = match self.on_delete_failure {
            DeletePolicyArg::Fatal => DeleteFailurePolicy::Fatal,
            DeletePolicyArg::RetryOnce => DeleteFailurePolicy::RetryOnce,
        };
        let mut config = SyncConfig::new(self.project.as_str())
            .with_modes(modes)
            .with_delete_policy(policy)
            .with_debug(u8::from(verbose));
        if let Some(label) = &self.merge {
            config = config.with_merge(MergeLabel::new(label.as_str())?);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index creation body (settings and mappings)
    Mapping,

    /// Show the delete and insert bulk bodies a sync would send
    Plan {
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Check that the store is reachable
    Ping {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Write a points file to the store
    Sync {
        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Mapping => {
            commands::mapping::run(&mut out)?;
        }
        Commands::Plan { write } => {
            let config = write.config(cli.verbose)?;
            let points = input::load_points(&write.points)?;
            commands::plan::run(&mut out, config, &points)?;
        }
        Commands::Ping { store } => {
            commands::ping::run(&mut out, &store.url, store.timeout, cli.verbose)?;
        }
        Commands::Sync { store, write } => {
            let config = write.config(cli.verbose)?;
            let points = input::load_points(&write.points)?;
            commands::sync::run(&mut out, &store.url, store.timeout, config, &points)?;
        }
        Commands::Version => {
            writeln!(out, "seriesdoc CLI v{}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "seriesdoc core v{}", seriesdoc_core::VERSION)?;
        }
    }

    Ok(())
}
