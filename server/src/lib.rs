//! Embedding Server Library
//!
//! Startup wiring for the embedding component: option parsing, strategy
//! selection and a JSON-RPC service answering embedding requests.

pub mod cli;
pub mod error;
pub mod rpc;
pub mod startup;

pub use cli::Args;
pub use error::{ServerError, ServerResult};
pub use rpc::EmbeddingServer;
pub use startup::bootstrap;
