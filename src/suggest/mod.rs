// Industry suggestions: free-text description in, closest Damodaran
// industries out, via sentence embeddings and cosine similarity.

pub mod download;
pub mod embeddings;
pub mod ranker;
pub mod traits;

pub use ranker::{IndustryRanker, RankError, RankedSuggestion, DEFAULT_TOP_K};
pub use traits::TextEmbedder;
