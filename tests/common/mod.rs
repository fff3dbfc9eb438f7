// Shared test fixtures: a deterministic embedder and sample catalog rows.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use keystone::catalog::{IndustryBeta, IndustryCatalog};
use keystone::sources::sheet::Cell;
use keystone::suggest::TextEmbedder;

/// Bag-of-words embedder over a fixed vocabulary.
///
/// Each dimension counts one vocabulary word; words outside the vocabulary
/// are ignored. Identical texts get identical vectors, and scores depend
/// only on shared words, so rankings are easy to reason about.
pub struct VocabEmbedder {
    vocab: Vec<String>,
    texts_embedded: AtomicUsize,
    batches: AtomicUsize,
}

impl VocabEmbedder {
    pub fn new(corpus: &[&str]) -> Self {
        let mut vocab: Vec<String> = Vec::new();
        for text in corpus {
            for word in words(text) {
                if !vocab.contains(&word) {
                    vocab.push(word);
                }
            }
        }
        Self {
            vocab,
            texts_embedded: AtomicUsize::new(0),
            batches: AtomicUsize::new(0),
        }
    }

    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }

    fn vector(&self, text: &str) -> Vec<f64> {
        let mut v = vec![0.0; self.vocab.len()];
        for word in words(text) {
            if let Some(i) = self.vocab.iter().position(|w| *w == word) {
                v[i] += 1.0;
            }
        }
        v
    }
}

#[async_trait]
impl TextEmbedder for VocabEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }
}

/// Embedder that always fails, standing in for a missing model.
pub struct BrokenEmbedder;

#[async_trait]
impl TextEmbedder for BrokenEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
        anyhow::bail!("model not loaded")
    }
}

/// Embedder that drops the last vector of every batch.
pub struct ShortEmbedder;

#[async_trait]
impl TextEmbedder for ShortEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .skip(1)
            .map(|_| vec![1.0, 0.0])
            .collect())
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

pub fn industry(name: &str, cash_beta: f64) -> IndustryBeta {
    IndustryBeta {
        name: name.to_string(),
        firms: Some(10),
        levered_beta: Some(cash_beta + 0.3),
        unlevered_beta: Some(cash_beta + 0.1),
        unlevered_beta_cash: Some(cash_beta),
    }
}

pub const INDUSTRY_NAMES: [&str; 6] = [
    "Metals & Mining",
    "Oil/Gas Distribution",
    "Software (Internet)",
    "Precious Metals",
    "Coal & Related Energy",
    "Steel",
];

pub fn sample_catalog() -> IndustryCatalog {
    IndustryCatalog::new(
        INDUSTRY_NAMES
            .iter()
            .enumerate()
            .map(|(i, n)| industry(n, 0.8 + i as f64 * 0.1))
            .collect(),
    )
}

pub fn text(s: &str) -> Cell {
    Cell::Text(s.to_string())
}

pub fn num(v: f64) -> Cell {
    Cell::Number(v)
}

/// Rows shaped like the industry averages sheet of betas.xls: a few lines
/// of preamble, then the header, then data.
pub fn betas_sheet_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![text("Date updated:"), text("5-Jan-25")],
        vec![text("Created by:"), text("Aswath Damodaran")],
        vec![Cell::Empty],
        vec![
            text("Industry Name"),
            text("Number of firms"),
            text("Beta "),
            text("D/E Ratio"),
            text("Effective Tax rate"),
            text("Unlevered beta"),
            text("Cash/Firm value"),
            text("Unlevered beta\ncorrected for cash"),
        ],
        vec![
            text("Advertising"),
            num(54.0),
            num(1.34),
            num(0.43),
            num(0.06),
            num(0.97),
            num(0.07),
            num(1.04),
        ],
        vec![
            text("Metals & Mining"),
            num(66.0),
            num(1.16),
            num(0.19),
            num(0.05),
            num(1.0),
            num(0.04),
            num(1.05),
        ],
        vec![
            text("Oil/Gas Distribution"),
            num(21.0),
            num(0.88),
            num(0.94),
            num(0.11),
            num(0.48),
            num(0.01),
            text("#N/A"),
        ],
        vec![Cell::Empty, Cell::Empty],
        vec![
            text("Total Market"),
            num(5981.0),
            num(1.0),
            num(0.28),
            num(0.1),
            num(0.8),
            num(0.06),
            num(0.85),
        ],
    ]
}

/// Rows shaped like the "ERPs by country" sheet of ctryprem.xlsx.
pub fn erp_sheet_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![text("Country risk premiums, January 2025")],
        vec![Cell::Empty],
        vec![
            text("Country"),
            text("Africa"),
            text("Moody's rating"),
            text("Rating-based Default Spread"),
            text("Total  Equity Risk Premium"),
            text("Country Risk\nPremium"),
        ],
        vec![
            text("Peru"),
            text("Central and South America"),
            text("Baa1"),
            num(0.0178),
            num(0.0677),
            num(0.0244),
        ],
        vec![
            text("Germany"),
            text("Western Europe"),
            text("Aaa"),
            num(0.0),
            num(0.0433),
            num(0.0),
        ],
        vec![
            text("Atlantis"),
            text("Nowhere"),
            text("NR"),
            Cell::Empty,
            text("NA"),
            Cell::Empty,
        ],
    ]
}
