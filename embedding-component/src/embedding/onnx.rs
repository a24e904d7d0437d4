//! In-process embeddings through fastembed (ONNX Runtime)

use super::discovery::{find_model_source, ModelSource, TOKENIZER_FILES};
use super::EmbeddingEngine;
use crate::error::{EmbeddingError, Result};
use crate::params::{LocalEmbeddingParams, PoolingStrategy};
use fastembed::{
    EmbeddingModel, InitOptions, InitOptionsUserDefined, Pooling, TextEmbedding, TokenizerFiles,
    UserDefinedEmbeddingModel,
};
use parking_lot::Mutex;
use std::fmt;
use std::fs;
use std::path::Path;

/// fastembed model wrapper
///
/// Inference calls are serialized through a mutex; the ONNX session already
/// spreads a single batch over its intra-op thread pool.
pub struct FastEmbedEngine {
    model: Mutex<TextEmbedding>,
    model_name: String,
    batch_size: usize,
    normalize: bool,
    dimension: usize,
}

impl FastEmbedEngine {
    /// Resolve the model files for `params` and load them.
    pub fn load(params: &LocalEmbeddingParams) -> Result<Self> {
        let source = find_model_source(params, |code| builtin_model(code).is_some())?;

        let model = match &source {
            ModelSource::UserDefined {
                onnx_file,
                tokenizer_dir,
            } => load_user_defined(onnx_file, tokenizer_dir, params)?,
            ModelSource::BuiltIn {
                model_code,
                cache_dir,
            } => {
                let builtin = builtin_model(model_code).ok_or_else(|| {
                    EmbeddingError::model(format!("Unknown built-in model: {}", model_code))
                })?;
                let mut options = InitOptions::new(builtin)
                    .with_max_length(params.max_length)
                    .with_show_download_progress(false);
                if let Some(dir) = cache_dir {
                    options = options.with_cache_dir(dir.clone());
                }
                TextEmbedding::try_new(options).map_err(|e| {
                    EmbeddingError::model(format!("Failed to load {}: {}", model_code, e))
                })?
            }
        };

        // Get dimension by encoding test string
        let probe = model
            .embed(vec!["test"], None)
            .map_err(|e| EmbeddingError::model(format!("Failed to encode test string: {}", e)))?;
        let dimension = probe
            .first()
            .map(|e| e.len())
            .ok_or_else(|| EmbeddingError::model("Model returned no embedding for test string"))?;

        log::info!(
            "Loaded {} ({}d, max {} tokens, normalize: {})",
            params.model_name,
            dimension,
            params.max_length,
            params.normalize_embeddings
        );

        Ok(Self {
            model: Mutex::new(model),
            model_name: params.model_name.clone(),
            batch_size: params.batch_size,
            normalize: params.normalize_embeddings,
            dimension,
        })
    }
}

fn load_user_defined(
    onnx_file: &Path,
    tokenizer_dir: &Path,
    params: &LocalEmbeddingParams,
) -> Result<TextEmbedding> {
    let read = |name: &str| fs::read(tokenizer_dir.join(name));
    let [tokenizer, config, special_tokens_map, tokenizer_config] = TOKENIZER_FILES;

    let tokenizer_files = TokenizerFiles {
        tokenizer_file: read(tokenizer)?,
        config_file: read(config)?,
        special_tokens_map_file: read(special_tokens_map)?,
        tokenizer_config_file: read(tokenizer_config)?,
    };

    let pooling = match params.pooling {
        PoolingStrategy::Mean => Pooling::Mean,
        PoolingStrategy::Cls => Pooling::Cls,
    };

    let model = UserDefinedEmbeddingModel::new(fs::read(onnx_file)?, tokenizer_files)
        .with_pooling(pooling);
    let options = InitOptionsUserDefined::new().with_max_length(params.max_length);

    TextEmbedding::try_new_from_user_defined(model, options).map_err(|e| {
        EmbeddingError::model(format!(
            "Failed to load ONNX model {}: {}",
            onnx_file.display(),
            e
        ))
    })
}

/// Look up a fastembed built-in model by its model code, e.g. `BAAI/bge-small-en-v1.5`.
pub(crate) fn builtin_model(model_code: &str) -> Option<EmbeddingModel> {
    TextEmbedding::list_supported_models()
        .into_iter()
        .find(|info| info.model_code.eq_ignore_ascii_case(model_code))
        .map(|info| info.model)
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

impl EmbeddingEngine for FastEmbedEngine {
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self
            .model
            .lock()
            .embed(inputs, Some(self.batch_size))
            .map_err(|e| EmbeddingError::embedding(format!("Failed to encode texts: {}", e)))?;

        if self.normalize {
            Ok(embeddings.into_iter().map(normalize).collect())
        } else {
            Ok(embeddings)
        }
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

impl fmt::Debug for FastEmbedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastEmbedEngine")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}
