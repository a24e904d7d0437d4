//! Model file discovery
//!
//! Finds the ONNX model and tokenizer files for a locally loaded model.

use crate::error::{EmbeddingError, Result};
use crate::params::LocalEmbeddingParams;
use std::path::{Path, PathBuf};

/// ONNX graph file name
pub const ONNX_MODEL_FILE: &str = "model.onnx";

/// Tokenizer files expected next to a user-supplied ONNX model
pub const TOKENIZER_FILES: [&str; 4] = [
    "tokenizer.json",
    "config.json",
    "special_tokens_map.json",
    "tokenizer_config.json",
];

/// Where the model weights come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// ONNX file plus tokenizer directory on disk
    UserDefined {
        onnx_file: PathBuf,
        tokenizer_dir: PathBuf,
    },
    /// Model known to fastembed, downloaded into `cache_dir` if missing
    BuiltIn {
        model_code: String,
        cache_dir: Option<PathBuf>,
    },
}

/// Resolve the model source with priority:
/// 1. `model_path` containing `model.onnx` (or `onnx/model.onnx`) and tokenizer files
/// 2. `EMBEDDING_MODELS_PATH/<model_name>` laid out the same way
/// 3. A fastembed built-in model whose code equals `model_name`
pub fn find_model_source(
    params: &LocalEmbeddingParams,
    is_builtin: impl Fn(&str) -> bool,
) -> Result<ModelSource> {
    if let Some(path) = params.model_path.as_deref() {
        let dir = PathBuf::from(path);
        if let Some(source) = user_defined_source(&dir) {
            log::info!("Using model files at: {}", dir.display());
            return Ok(source);
        }
    }

    if let Ok(models_path) = std::env::var("EMBEDDING_MODELS_PATH") {
        let dir = PathBuf::from(&models_path).join(&params.model_name);
        if let Some(source) = user_defined_source(&dir) {
            log::info!("Using EMBEDDING_MODELS_PATH: {}", dir.display());
            return Ok(source);
        }
        log::warn!(
            "EMBEDDING_MODELS_PATH set but model not found: {}",
            dir.display()
        );
    }

    if is_builtin(&params.model_name) {
        let cache_dir = params
            .cache_dir
            .as_deref()
            .or(params.model_path.as_deref())
            .map(PathBuf::from);
        log::info!(
            "Using built-in model {} (cache: {:?})",
            params.model_name,
            cache_dir
        );
        return Ok(ModelSource::BuiltIn {
            model_code: params.model_name.clone(),
            cache_dir,
        });
    }

    Err(EmbeddingError::model(format!(
        "Embedding model `{}` not found. Checked:\n\
         - model_path ({})\n\
         - EMBEDDING_MODELS_PATH environment variable\n\
         - fastembed built-in models",
        params.model_name,
        params.model_path.as_deref().unwrap_or("unset"),
    )))
}

fn user_defined_source(dir: &Path) -> Option<ModelSource> {
    if !has_tokenizer_files(dir) {
        return None;
    }

    [dir.join(ONNX_MODEL_FILE), dir.join("onnx").join(ONNX_MODEL_FILE)]
        .into_iter()
        .find(|p| p.is_file())
        .map(|onnx_file| ModelSource::UserDefined {
            onnx_file,
            tokenizer_dir: dir.to_path_buf(),
        })
}

fn has_tokenizer_files(dir: &Path) -> bool {
    TOKENIZER_FILES.iter().all(|f| dir.join(f).is_file())
}
