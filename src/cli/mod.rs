//! CLI module - Command-line interface for the insights service
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Marketplace Insights - product catalogue with model-generated insights
#[derive(Parser)]
#[command(name = "marketplace-insights")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server (default)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// List models installed on the Ollama backend
    Models,

    /// List stored products
    #[command(alias = "ls")]
    Products {
        /// Only products from this marketplace
        #[arg(long)]
        marketplace: Option<String>,
        /// Only products in this category
        #[arg(long)]
        category: Option<String>,
        /// Maximum number of products to show
        #[arg(long, default_value = "20")]
        limit: u64,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
