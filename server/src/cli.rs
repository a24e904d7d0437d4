//! Command line options.

use crate::error::ServerResult;
use clap::Parser;
use embedding_component::config::parse_key_val;
use embedding_component::EmbeddingConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "embedding-server")]
#[command(about = "Embedding service with local or remote model execution")]
#[command(version)]
pub struct Args {
    /// JSON config file; flags given on the command line take precedence
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Route embedding requests to the worker pool instead of loading a model
    #[arg(long)]
    pub remote_embedding: bool,

    /// Default embedding model
    #[arg(long)]
    pub embedding_model_name: Option<String>,

    /// Model directory (local strategy only)
    #[arg(long)]
    pub embedding_model_path: Option<String>,

    /// Backend parameter as key=value, may be repeated
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Worker controller base URL
    #[arg(long)]
    pub controller_addr: Option<String>,

    /// Bearer token for the worker controller
    #[arg(long)]
    pub controller_api_key: Option<String>,

    /// Timeout for requests to the worker controller
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub controller_timeout_secs: u64,
}

impl Args {
    /// Merge the config file (if any) with command line overrides.
    pub fn into_config(self) -> ServerResult<EmbeddingConfig> {
        let mut config = match &self.config {
            Some(path) => EmbeddingConfig::from_file(path)?,
            None => EmbeddingConfig::default(),
        };

        if self.remote_embedding {
            config.remote_embedding = true;
        }
        if let Some(name) = self.embedding_model_name {
            config.embedding_model_name = name;
        }
        if self.embedding_model_path.is_some() {
            config.embedding_model_path = self.embedding_model_path;
        }
        config.embedding_params.extend(self.params);
        if self.controller_addr.is_some() {
            config.controller_addr = self.controller_addr;
        }
        if self.controller_api_key.is_some() {
            config.controller_api_key = self.controller_api_key;
        }

        Ok(config)
    }
}
