// Unit tests for the industry ranker.
//
// Uses a vocabulary embedder so rankings are deterministic and don't need
// a downloaded model. The one test against the real model is ignored by
// default.

mod common;

use std::sync::Arc;

use common::{sample_catalog, BrokenEmbedder, ShortEmbedder, VocabEmbedder, INDUSTRY_NAMES};
use keystone::catalog::{BetaKind, IndustryCatalog};
use keystone::suggest::{IndustryRanker, RankError, TextEmbedder, DEFAULT_TOP_K};

fn vocab_ranker(catalog: IndustryCatalog, extra: &[&str]) -> (Arc<VocabEmbedder>, IndustryRanker) {
    let mut corpus: Vec<&str> = INDUSTRY_NAMES.to_vec();
    corpus.extend_from_slice(extra);
    let embedder = Arc::new(VocabEmbedder::new(&corpus));
    let ranker = IndustryRanker::new(
        embedder.clone() as Arc<dyn TextEmbedder>,
        catalog,
        BetaKind::UnleveredCashCorrected,
    );
    (embedder, ranker)
}

fn names(suggestions: &[keystone::suggest::RankedSuggestion]) -> Vec<String> {
    suggestions.iter().map(|s| s.name.clone()).collect()
}

// ============================================================
// Result size
// ============================================================

#[tokio::test]
async fn returns_three_for_larger_catalog() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    let results = ranker.rank("metals mining steel").await.unwrap();
    assert_eq!(results.len(), DEFAULT_TOP_K);
    let ranks: Vec<usize> = results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn k_larger_than_catalog_returns_everything() {
    let catalog = IndustryCatalog::new(vec![
        common::industry("Steel", 1.0),
        common::industry("Precious Metals", 0.9),
    ]);
    let (_, ranker) = vocab_ranker(catalog, &[]);
    let results = ranker.rank("steel").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "Steel");
}

#[tokio::test]
async fn k_zero_is_treated_as_one() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    let results = ranker.rank_top("steel", 0).await.unwrap();
    assert_eq!(results.len(), 1);
}

// ============================================================
// Ordering
// ============================================================

#[tokio::test]
async fn exact_label_ranks_first() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    for name in INDUSTRY_NAMES {
        let results = ranker.rank(name).await.unwrap();
        assert_eq!(results[0].name, name);
        assert!(
            (results[0].similarity - 1.0).abs() < 1e-9,
            "self-similarity for {name} was {}",
            results[0].similarity
        );
    }
}

#[tokio::test]
async fn ranks_by_shared_meaning() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    let results = ranker.rank("metals mining steel").await.unwrap();
    assert_eq!(
        names(&results),
        vec!["Metals & Mining", "Steel", "Precious Metals"]
    );
    assert!(results[0].similarity > results[1].similarity);
    assert!(results[1].similarity > results[2].similarity);
}

#[tokio::test]
async fn ties_keep_catalog_order() {
    // No query word appears in any label: every score is 0.0.
    let (_, ranker) = vocab_ranker(sample_catalog(), &["bakery"]);
    let results = ranker.rank("bakery").await.unwrap();
    assert_eq!(names(&results), INDUSTRY_NAMES[..3].to_vec());
}

#[tokio::test]
async fn repeated_queries_are_stable() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    let first = ranker.rank("energy coal metals").await.unwrap();
    for _ in 0..5 {
        assert_eq!(ranker.rank("energy coal metals").await.unwrap(), first);
    }
}

#[tokio::test]
async fn permuted_catalog_gives_same_top_names() {
    let (_, ranker) = vocab_ranker(sample_catalog(), &[]);
    let original = names(&ranker.rank("metals mining steel").await.unwrap());

    let mut reversed: Vec<_> = sample_catalog().entries().to_vec();
    reversed.reverse();
    let (_, permuted_ranker) = vocab_ranker(IndustryCatalog::new(reversed), &[]);
    let permuted = names(&permuted_ranker.rank("metals mining steel").await.unwrap());

    let mut a = original.clone();
    let mut b = permuted.clone();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}

#[tokio::test]
async fn suggestion_carries_selected_beta() {
    let embedder: Arc<dyn TextEmbedder> = Arc::new(VocabEmbedder::new(&INDUSTRY_NAMES));
    let ranker = IndustryRanker::new(embedder, sample_catalog(), BetaKind::Levered);
    let results = ranker.rank("Steel").await.unwrap();
    let steel = sample_catalog().find("Steel").unwrap().clone();
    assert_eq!(results[0].beta, steel.levered_beta);
}

// ============================================================
// Catalog embedding cache
// ============================================================

#[tokio::test]
async fn catalog_is_embedded_once() {
    let (embedder, ranker) = vocab_ranker(sample_catalog(), &[]);
    assert!(!ranker.is_warm());

    ranker.rank("steel").await.unwrap();
    ranker.rank("coal").await.unwrap();
    ranker.rank("software").await.unwrap();

    assert!(ranker.is_warm());
    // One catalog batch plus one single-text batch per query.
    assert_eq!(embedder.texts_embedded(), INDUSTRY_NAMES.len() + 3);
    assert_eq!(embedder.batches(), 4);
}

#[tokio::test]
async fn concurrent_first_queries_share_one_catalog_embedding() {
    let (embedder, ranker) = vocab_ranker(sample_catalog(), &[]);
    let (a, b) = tokio::join!(ranker.rank("steel"), ranker.rank("coal"));
    a.unwrap();
    b.unwrap();
    assert_eq!(embedder.texts_embedded(), INDUSTRY_NAMES.len() + 2);
}

#[tokio::test]
async fn warm_up_populates_cache() {
    let (embedder, ranker) = vocab_ranker(sample_catalog(), &[]);
    ranker.warm_up().await.unwrap();
    assert!(ranker.is_warm());
    assert_eq!(embedder.texts_embedded(), INDUSTRY_NAMES.len());
}

// ============================================================
// Failure conditions
// ============================================================

#[tokio::test]
async fn empty_catalog_reports_no_data() {
    let (_, ranker) = vocab_ranker(IndustryCatalog::default(), &[]);
    let err = ranker.rank("steel").await.unwrap_err();
    assert!(matches!(err, RankError::EmptyCatalog));
}

#[tokio::test]
async fn blank_query_is_rejected_before_embedding() {
    let (embedder, ranker) = vocab_ranker(sample_catalog(), &[]);
    for query in ["", "   ", "\t\n"] {
        let err = ranker.rank(query).await.unwrap_err();
        assert!(matches!(err, RankError::BlankQuery));
    }
    assert_eq!(embedder.texts_embedded(), 0);
}

#[tokio::test]
async fn embedder_failure_is_reported() {
    let ranker = IndustryRanker::new(
        Arc::new(BrokenEmbedder),
        sample_catalog(),
        BetaKind::default(),
    );
    let err = ranker.rank("steel").await.unwrap_err();
    assert!(matches!(err, RankError::Embedding(_)));
    assert!(err.to_string().contains("model not loaded"));
    assert!(!ranker.is_warm());
}

#[tokio::test]
async fn misaligned_embeddings_are_rejected() {
    let ranker = IndustryRanker::new(
        Arc::new(ShortEmbedder),
        sample_catalog(),
        BetaKind::default(),
    );
    let err = ranker.rank("steel").await.unwrap_err();
    match err {
        RankError::Misaligned { labels, embeddings } => {
            assert_eq!(labels, INDUSTRY_NAMES.len());
            assert_eq!(embeddings, INDUSTRY_NAMES.len() - 1);
        }
        other => panic!("expected Misaligned, got {other:?}"),
    }
}

// ============================================================
// Real model (requires `keystone download-model`)
// ============================================================

#[tokio::test]
#[ignore = "requires the downloaded all-MiniLM-L6-v2 model"]
async fn real_model_suggests_mining_for_copper() {
    use keystone::suggest::download::{default_model_dir, embedding_model_dir};
    use keystone::suggest::embeddings::SentenceEmbedder;

    let embedder = SentenceEmbedder::load(&embedding_model_dir(&default_model_dir())).unwrap();
    let catalog = IndustryCatalog::new(vec![
        common::industry("Metals & Mining", 1.05),
        common::industry("Oil/Gas Distribution", 0.48),
        common::industry("Software (Internet)", 1.3),
    ]);
    let ranker = IndustryRanker::new(Arc::new(embedder), catalog, BetaKind::default());

    let results = ranker.rank("company that mines copper").await.unwrap();
    assert_eq!(results[0].name, "Metals & Mining");

    let exact = ranker.rank("Software (Internet)").await.unwrap();
    assert_eq!(exact[0].name, "Software (Internet)");
    assert!((exact[0].similarity - 1.0).abs() < 1e-3);
}
