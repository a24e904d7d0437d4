//! Embedding RPC service
//!
//! Serves the registered embedding factory as line-delimited JSON-RPC 2.0,
//! normally over stdio:
//!
//! ```bash
//! embedding-server --embedding-model-name BAAI/bge-small-en-v1.5
//! ```

pub mod protocol;
pub mod server;
pub mod transport;

pub use protocol::*;
pub use server::EmbeddingServer;
