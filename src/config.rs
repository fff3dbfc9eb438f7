use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::catalog::BetaKind;
use crate::sources::{damodaran, fred};
use crate::suggest::DEFAULT_TOP_K;

/// Default country for the equity risk premium.
pub const DEFAULT_COUNTRY: &str = "Peru";

/// Default industry for the beta lookup.
pub const DEFAULT_INDUSTRY: &str = "Metals & Mining";

/// Central configuration loaded from environment variables.
///
/// A .env file, if present, is loaded at startup via dotenvy. Every value
/// has a default, so the tool works with no configuration at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// Country whose total ERP feeds the estimate.
    pub country: String,
    /// Industry whose beta feeds the estimate.
    pub industry: String,
    /// Which beta column to use.
    pub beta_kind: BetaKind,
    /// Industry betas workbook (URL or local path).
    pub betas_url: String,
    /// Sheet index or name within the betas workbook.
    pub betas_sheet: String,
    /// Country risk premium workbook (URL or local path).
    pub erp_url: String,
    /// Sheet index or name within the ERP workbook.
    pub erp_sheet: String,
    /// FRED CSV export (URL or local path).
    pub risk_free_url: String,
    /// FRED series id to read from the CSV.
    pub risk_free_series: String,
    /// Base directory for model files.
    pub model_dir: PathBuf,
    /// Number of industry suggestions to show.
    pub top_k: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let beta_kind = match env::var("KEYSTONE_BETA_KIND") {
            Ok(raw) => raw
                .parse::<BetaKind>()
                .map_err(|e| anyhow::anyhow!("KEYSTONE_BETA_KIND: {e}"))?,
            Err(_) => BetaKind::default(),
        };

        let top_k = match env::var("KEYSTONE_TOP_K") {
            Ok(raw) => parse_top_k(&raw)?,
            Err(_) => DEFAULT_TOP_K,
        };

        let model_dir = env::var("KEYSTONE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::suggest::download::default_model_dir());

        Ok(Self {
            country: env::var("KEYSTONE_COUNTRY").unwrap_or_else(|_| DEFAULT_COUNTRY.to_string()),
            industry: env::var("KEYSTONE_INDUSTRY")
                .unwrap_or_else(|_| DEFAULT_INDUSTRY.to_string()),
            beta_kind,
            betas_url: env::var("KEYSTONE_BETAS_URL")
                .unwrap_or_else(|_| damodaran::BETAS_URL.to_string()),
            betas_sheet: env::var("KEYSTONE_BETAS_SHEET")
                .unwrap_or_else(|_| damodaran::BETAS_SHEET.to_string()),
            erp_url: env::var("KEYSTONE_ERP_URL")
                .unwrap_or_else(|_| damodaran::ERP_URL.to_string()),
            erp_sheet: env::var("KEYSTONE_ERP_SHEET")
                .unwrap_or_else(|_| damodaran::ERP_SHEET.to_string()),
            risk_free_url: env::var("KEYSTONE_RISK_FREE_URL")
                .unwrap_or_else(|_| fred::DEFAULT_URL.to_string()),
            risk_free_series: env::var("KEYSTONE_RISK_FREE_SERIES")
                .unwrap_or_else(|_| fred::DEFAULT_SERIES.to_string()),
            model_dir,
            top_k,
        })
    }

    /// Directory holding the sentence embedding model files.
    pub fn embedding_model_dir(&self) -> PathBuf {
        crate::suggest::download::embedding_model_dir(&self.model_dir)
    }

    /// Check that the embedding model has been downloaded.
    /// Call this before any operation that needs industry suggestions.
    pub fn require_embedding_model(&self) -> Result<()> {
        if !crate::suggest::download::embedding_files_present(&self.model_dir) {
            anyhow::bail!(
                "Embedding model files not found in {}\n\
                 Run `keystone download-model` to download them.",
                self.embedding_model_dir().display()
            );
        }
        Ok(())
    }
}

fn parse_top_k(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => anyhow::bail!("KEYSTONE_TOP_K must be a positive integer, got \"{raw}\""),
    }
}
