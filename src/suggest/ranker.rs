// Industry ranker: top-K catalog entries by cosine similarity to a query.
//
// The catalog labels are embedded once, on the first query, and cached on
// the ranker. Every later query only embeds the query text itself. The
// cache is a OnceCell, so concurrent first queries still run the model on
// the catalog only once.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use super::traits::TextEmbedder;
use crate::catalog::{BetaKind, IndustryCatalog};

/// Number of suggestions shown by default.
pub const DEFAULT_TOP_K: usize = 3;

/// One suggested industry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSuggestion {
    /// 1-based position in the result list.
    pub rank: usize,
    pub name: String,
    pub beta: Option<f64>,
    pub similarity: f64,
}

#[derive(Debug, Error)]
pub enum RankError {
    #[error("no industry data loaded; the catalog is empty")]
    EmptyCatalog,

    #[error("describe the industry first; the query is blank")]
    BlankQuery,

    #[error("embedding failed: {0:#}")]
    Embedding(anyhow::Error),

    #[error("embedder returned {embeddings} vectors for {labels} catalog labels")]
    Misaligned { labels: usize, embeddings: usize },
}

/// Ranks catalog industries against free-text descriptions.
///
/// Owns the catalog and its embedding cache for the lifetime of the
/// session. Construct once and reuse across queries.
pub struct IndustryRanker {
    embedder: Arc<dyn TextEmbedder>,
    catalog: IndustryCatalog,
    beta_kind: BetaKind,
    catalog_embeddings: OnceCell<Vec<Vec<f64>>>,
}

impl IndustryRanker {
    pub fn new(embedder: Arc<dyn TextEmbedder>, catalog: IndustryCatalog, beta_kind: BetaKind) -> Self {
        Self {
            embedder,
            catalog,
            beta_kind,
            catalog_embeddings: OnceCell::new(),
        }
    }

    pub fn catalog(&self) -> &IndustryCatalog {
        &self.catalog
    }

    /// Whether the catalog embeddings have been computed yet.
    pub fn is_warm(&self) -> bool {
        self.catalog_embeddings.initialized()
    }

    /// Embed the catalog now instead of on the first query.
    pub async fn warm_up(&self) -> Result<(), RankError> {
        self.embeddings().await.map(|_| ())
    }

    /// Top `DEFAULT_TOP_K` industries for `query`.
    pub async fn rank(&self, query: &str) -> Result<Vec<RankedSuggestion>, RankError> {
        self.rank_top(query, DEFAULT_TOP_K).await
    }

    /// Top `k` industries for `query`, most similar first.
    ///
    /// Returns all entries when `k` exceeds the catalog size; `k = 0` is
    /// treated as 1. Equal scores keep catalog order.
    pub async fn rank_top(&self, query: &str, k: usize) -> Result<Vec<RankedSuggestion>, RankError> {
        if self.catalog.is_empty() {
            return Err(RankError::EmptyCatalog);
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(RankError::BlankQuery);
        }

        let catalog_vectors = self.embeddings().await?;
        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(RankError::Embedding)?;

        let top = top_k(&query_vector, catalog_vectors, k.max(1));

        debug!(
            query = query,
            candidates = catalog_vectors.len(),
            best = top.first().map(|(_, s)| *s),
            "Ranked industries"
        );

        let entries = self.catalog.entries();
        Ok(top
            .into_iter()
            .enumerate()
            .map(|(pos, (idx, similarity))| RankedSuggestion {
                rank: pos + 1,
                name: entries[idx].name.clone(),
                beta: entries[idx].beta(self.beta_kind),
                similarity,
            })
            .collect())
    }

    async fn embeddings(&self) -> Result<&Vec<Vec<f64>>, RankError> {
        self.catalog_embeddings
            .get_or_try_init(|| async {
                let labels = self.catalog.labels();
                let vectors = self
                    .embedder
                    .embed_batch(&labels)
                    .await
                    .map_err(RankError::Embedding)?;
                if vectors.len() != labels.len() {
                    return Err(RankError::Misaligned {
                        labels: labels.len(),
                        embeddings: vectors.len(),
                    });
                }
                debug!(labels = labels.len(), "Cached catalog embeddings");
                Ok(vectors)
            })
            .await
    }
}

/// Indices of the `k` most similar candidates with their scores, most
/// similar first. Stable: equal scores keep candidate order, and NaN scores
/// sort last.
pub fn top_k(query: &[f64], candidates: &[Vec<f64>], k: usize) -> Vec<(usize, f64)> {
    let mut scored: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let sim = cosine_similarity(query, c);
            (i, if sim.is_nan() { f64::NEG_INFINITY } else { sim })
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    scored
}

/// Cosine similarity in [-1, 1].
///
/// Returns 0.0 for mismatched lengths, empty input, or a zero vector.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}
