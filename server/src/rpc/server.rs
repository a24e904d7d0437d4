//! Embedding server
//!
//! Answers embedding requests with whatever engine the registered
//! `dyn EmbeddingFactory` produces. Requests are handled concurrently;
//! responses are written in completion order.

use super::protocol::*;
use super::transport::{RequestReader, ResponseWriter};
use crate::error::{ServerError, ServerResult};
use embedding_component::{EmbeddingEngine, EmbeddingFactory, SystemApp};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

pub struct EmbeddingServer {
    system_app: Arc<SystemApp>,
}

impl EmbeddingServer {
    pub fn new(system_app: Arc<SystemApp>) -> Self {
        Self { system_app }
    }

    /// Serve requests from `input` until it is exhausted.
    ///
    /// Returns once every in-flight request has been answered.
    pub async fn serve<R, W>(self: Arc<Self>, input: R, output: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut reader = RequestReader::new(input);
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer = tokio::spawn(async move {
            let mut writer = ResponseWriter::new(output);
            while let Some(response) = rx.recv().await {
                writer.write_response(&response).await?;
            }
            Ok::<(), io::Error>(())
        });

        tracing::info!("Embedding server ready");

        loop {
            match reader.read_request().await {
                Ok(Some(request)) => {
                    let server = Arc::clone(&self);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        if let Some(response) = server.handle_request(request).await {
                            let _ = tx.send(response);
                        }
                    });
                }
                Ok(None) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    let response = JsonRpcResponse::error(
                        None,
                        JsonRpcError::parse_error(format!("Parse error: {}", e)),
                    );
                    let _ = tx.send(response);
                }
                Err(e) => {
                    tracing::error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        drop(tx);
        writer.await.map_err(io::Error::other)?
    }

    /// Handle a request. Notifications (no `id`) get no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!("Handling request: {}", request.method);

        let id = request.id.clone();
        if request.jsonrpc != "2.0" {
            return id.map(|id| {
                JsonRpcResponse::error(
                    Some(id),
                    JsonRpcError::invalid_request(format!(
                        "Unsupported jsonrpc version: {}",
                        request.jsonrpc
                    )),
                )
            });
        }

        let result = match request.method.as_str() {
            "ping" => Ok(serde_json::json!({})),
            "model_info" => self.handle_model_info(),
            "embed_documents" => self.handle_embed_documents(request.params).await,
            "embed_query" => self.handle_embed_query(request.params).await,
            _ => {
                return id.map(|id| {
                    JsonRpcResponse::error(
                        Some(id),
                        JsonRpcError::method_not_found(&request.method),
                    )
                });
            }
        };

        let id = id?;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(Some(id), value),
            Err(e) => {
                tracing::warn!("{} failed: {}", request.method, e);
                JsonRpcResponse::error(Some(id), e.into())
            }
        })
    }

    fn factory(&self) -> ServerResult<Arc<dyn EmbeddingFactory>> {
        Ok(self.system_app.get_component::<dyn EmbeddingFactory>()?)
    }

    fn handle_model_info(&self) -> ServerResult<Value> {
        let factory = self.factory()?;
        // Local factories hand out their cached engine, so this is free for them.
        let dimension = match factory.strategy() {
            embedding_component::Strategy::Local => factory.create(None, None)?.dimension(),
            embedding_component::Strategy::Remote => None,
        };

        Ok(serde_json::to_value(ModelInfoResult {
            model_name: factory.default_model_name().to_string(),
            strategy: factory.strategy().to_string(),
            dimension,
        })?)
    }

    async fn handle_embed_documents(&self, params: Option<Value>) -> ServerResult<Value> {
        let params: EmbedDocumentsParams = parse_params(params)?;
        let texts = params.texts;

        let (model, embeddings) = self
            .with_engine(params.model, move |engine| engine.embed_documents(&texts))
            .await?;

        Ok(serde_json::to_value(EmbedDocumentsResult { model, embeddings })?)
    }

    async fn handle_embed_query(&self, params: Option<Value>) -> ServerResult<Value> {
        let params: EmbedQueryParams = parse_params(params)?;
        let text = params.text;

        let (model, embedding) = self
            .with_engine(params.model, move |engine| engine.embed_query(&text))
            .await?;

        Ok(serde_json::to_value(EmbedQueryResult { model, embedding })?)
    }

    /// Create an engine and run `f` on a blocking thread.
    ///
    /// Both steps may block: the remote strategy looks up a dispatcher handle
    /// in `create`, and engines run inference or HTTP calls synchronously.
    async fn with_engine<T, F>(&self, model: Option<String>, f: F) -> ServerResult<(String, T)>
    where
        T: Send + 'static,
        F: FnOnce(&dyn EmbeddingEngine) -> embedding_component::Result<T> + Send + 'static,
    {
        let factory = self.factory()?;

        let (model_name, output) = tokio::task::spawn_blocking(move || {
            let engine = factory.create(model.as_deref(), None)?;
            let output = f(engine.as_ref())?;
            Ok::<_, ServerError>((engine.model_name().to_string(), output))
        })
        .await??;

        Ok((model_name, output))
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> ServerResult<T> {
    let params = params.ok_or_else(|| ServerError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| ServerError::InvalidParams(e.to_string()))
}
