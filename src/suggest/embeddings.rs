// Sentence embeddings with all-MiniLM-L6-v2, run locally via ONNX.
//
// Industry names are short ("Metals & Mining", "Drugs (Biotechnology)")
// while user descriptions are full sentences, so keyword matching does
// poorly. A sentence transformer places "company that mines copper" near
// "Metals & Mining" even though they share no words.
//
// Mean pooling over token embeddings matches how the model was trained.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::TextEmbedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Sentence embedder backed by a local ONNX session.
///
/// `ort::Session::run` takes `&mut self`, hence the Mutex; the Arcs let the
/// CPU-bound work move onto `spawn_blocking`.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl SentenceEmbedder {
    /// Load the model and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Run `keystone download-model` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `keystone download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `keystone download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;

        debug!(
            "Loaded sentence embedding model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextEmbedder for SentenceEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || embed_sync(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }
}

/// Tokenize, run inference, and mean-pool. Runs on the blocking pool.
fn embed_sync(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
    }

    // BERT inputs, right-padded to max_len with pad id 0.
    let mut input_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut token_type_ids: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let ids = enc.get_ids();
        let pad_len = max_len - ids.len();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        input_ids.extend(std::iter::repeat_n(0i64, pad_len));

        attention_mask.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
        attention_mask.extend(std::iter::repeat_n(0i64, pad_len));

        token_type_ids.extend(std::iter::repeat_n(0i64, max_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids))
        .context("Failed to create token_type_ids tensor")?;

    // last_hidden_state: [batch, seq_len, 384]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    let expected = batch_size * max_len * EMBEDDING_DIM;
    if hidden_states.len() != expected {
        anyhow::bail!(
            "Unexpected embedding output size: got {}, expected {expected}",
            hidden_states.len()
        );
    }

    let embeddings: Vec<Vec<f64>> = (0..batch_size)
        .map(|i| {
            let mask = &attention_mask[i * max_len..(i + 1) * max_len];
            let tokens = &hidden_states[i * max_len * EMBEDDING_DIM..(i + 1) * max_len * EMBEDDING_DIM];
            mean_pool(tokens, mask)
        })
        .collect();

    debug!(
        batch_size = batch_size,
        dim = EMBEDDING_DIM,
        "Computed sentence embeddings"
    );

    Ok(embeddings)
}

/// Average the token vectors of one sequence, counting only tokens whose
/// attention mask is set. `tokens` is `mask.len() * EMBEDDING_DIM` long.
fn mean_pool(tokens: &[f32], mask: &[i64]) -> Vec<f64> {
    let mut sum = vec![0.0_f64; EMBEDDING_DIM];
    let mut count = 0.0_f64;

    for (j, &m) in mask.iter().enumerate() {
        if m > 0 {
            count += m as f64;
            let row = &tokens[j * EMBEDDING_DIM..(j + 1) * EMBEDDING_DIM];
            for (acc, &v) in sum.iter_mut().zip(row) {
                *acc += v as f64 * m as f64;
            }
        }
    }

    if count > 0.0 {
        for v in &mut sum {
            *v /= count;
        }
    }
    sum
}
