//! Command-line interface for matricule-admin, parsed with clap.

mod commands;

use clap::{Parser, Subcommand};

/// matricule-admin - user and matricule administration backend
#[derive(Parser)]
#[command(name = "matricule-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Create an Admin account, or promote an existing account to Admin
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
