// Text embedder trait: the seam between the ranker and whatever model
// produces the vectors.
//
// The default implementation is the local ONNX SentenceEmbedder. Tests
// substitute a deterministic embedder so ranking can be checked without
// downloading a model.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for turning text into fixed-length vectors.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            anyhow::bail!("Embedder returned {} vectors for 1 text", vectors.len());
        }
        Ok(vectors.remove(0))
    }
}
