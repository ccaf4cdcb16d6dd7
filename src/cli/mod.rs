//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lexrank",
    version,
    about = "Tenant-scoped passage retrieval with cross-encoder reranking",
    long_about = "Lexrank retrieves candidate passages from a search index, reorders them by \
                  semantic relevance to the query with a cross-encoder model, and returns \
                  deduplicated, linkable per-document results."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/lexrank/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the retrieval and reranking pipeline for a query
    Query {
        /// Query text
        query: String,

        /// Tenant alias selecting index scoping and site links
        #[arg(short, long)]
        alias: String,

        /// Maximum number of ranked documents to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the search index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Create an index
    Create {
        /// Index name (defaults to the configured index)
        name: Option<String>,
    },

    /// Delete an index
    Delete {
        /// Index name (defaults to the configured index)
        name: Option<String>,
    },

    /// Bulk-load documents from a JSON array file
    Load {
        /// Path to a JSON file containing an array of documents
        file: PathBuf,

        /// Index name (defaults to the configured index)
        name: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
