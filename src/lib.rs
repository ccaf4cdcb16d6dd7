//! Lexrank - tenant-scoped passage retrieval and reranking
//!
//! Retrieves candidate document passages from an inverted-index store,
//! reorders them by semantic relevance to the query with a cross-encoder
//! model, and returns deduplicated, linkable per-document results for
//! interactive question answering over a legal document corpus.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod search;

pub use error::{LexrankError, Result};
