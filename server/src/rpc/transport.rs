//! Line-delimited JSON transport
//!
//! One JSON-RPC message per line. Usually stdin/stdout, but any async byte
//! stream works.

use super::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Reads requests, one per line
pub struct RequestReader<R> {
    input: BufReader<R>,
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input: BufReader::new(input),
        }
    }

    /// Read the next request, skipping blank lines.
    ///
    /// Returns `Ok(None)` at end of input and an `InvalidData` error for a line
    /// that is not a valid request.
    pub async fn read_request(&mut self) -> io::Result<Option<JsonRpcRequest>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                return Ok(None);
            }
            if !line.trim().is_empty() {
                break;
            }
        }

        serde_json::from_str(line.trim()).map(Some).map_err(|e| {
            tracing::error!("Failed to parse JSON-RPC request: {}", e);
            io::Error::new(io::ErrorKind::InvalidData, e)
        })
    }
}

/// Writes responses, one per line
pub struct ResponseWriter<W> {
    output: W,
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> io::Result<()> {
        let json = serde_json::to_string(response)?;
        self.output.write_all(json.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }
}
