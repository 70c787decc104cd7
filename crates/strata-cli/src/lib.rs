//! strata - pull and push layered artifacts
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Talks to the strata daemon over HTTP and renders the daemon's streamed
//! status events with `strata-core`.
//!
//! # Configuration
//!
//! - `--host` / `STRATA_HOST`: daemon address
//! - `STRATA_HOME`: config directory (default `~/.strata`)
//! - `RUST_LOG`: diagnostics on stderr, e.g. `RUST_LOG=strata_core=debug`
//!
//! # Directory Layout
//!
//! ```text
//! ~/.strata/
//! └── auth.json   # Registry credentials keyed by registry address
//! ```

pub mod auth;
pub mod client;
pub mod cmd;
pub mod display;
pub mod paths;
pub mod reference;

pub use client::{DaemonClient, USER_AGENT};
pub use reference::Reference;

use clap::{Parser, Subcommand};

/// Daemon address used when neither `--host` nor `STRATA_HOST` is set.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:4243";

const PULL_ABOUT: &str = "Pull an image from a registry. \
The daemon fetches every layer and reports progress as it goes; \
interactive terminals get a live table, redirected output gets one line per status change.";

const PULL_EXAMPLES: &str = "\
Examples:
  $ strata pull docker.io/library/redis:alpine
  $ strata pull --missing busybox
  $ strata pull redis > pull.log";

const PUSH_EXAMPLES: &str = "\
Examples:
  $ strata push registry.example.com/team/app:1.4
  $ strata push localhost:5000/redis";

#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(author, version, about = "strata - pull and push layered artifacts")]
pub struct Cli {
    /// Daemon address
    #[arg(long, global = true, env = "STRATA_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pull an image from a registry
    #[command(long_about = PULL_ABOUT, after_help = PULL_EXAMPLES)]
    Pull {
        /// Image reference: NAME[:TAG][@DIGEST]
        image: String,
        /// Only pull when the daemon does not already have the image
        #[arg(long)]
        missing: bool,
    },
    /// Push an image to a registry
    #[command(after_help = PUSH_EXAMPLES)]
    Push {
        /// Image reference: NAME[:TAG]
        image: String,
    },
}
