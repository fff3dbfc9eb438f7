// Market data sources: FRED for the risk-free rate, Damodaran for betas
// and country risk premiums.
//
// These are external collaborators: each fetch is one attempt, and a
// failure is surfaced to the user with the location that failed.

pub mod client;
pub mod damodaran;
pub mod fred;
pub mod sheet;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{BetaKind, CountryPremiums, IndustryCatalog};
use crate::config::Config;
use client::SourceClient;
use fred::RiskFreeRate;
use sheet::SheetSelector;

/// Everything a cost-of-equity estimate needs, loaded once per run.
pub struct MarketData {
    pub risk_free: RiskFreeRate,
    pub premiums: CountryPremiums,
    pub industries: IndustryCatalog,
}

/// Fetch the industry beta catalog.
pub async fn load_industries(
    client: &SourceClient,
    config: &Config,
    kind: BetaKind,
) -> Result<IndustryCatalog> {
    let bytes = client
        .fetch(&config.betas_url)
        .await
        .with_context(|| format!("Failed to fetch industry betas from {}", config.betas_url))?;
    let selector = SheetSelector::parse(&config.betas_sheet);
    let rows = sheet::read_workbook_sheet(bytes, &selector)
        .context("Failed to read industry betas workbook")?;
    damodaran::parse_industry_betas(&rows, kind)
}

/// Fetch the country equity risk premium table.
pub async fn load_premiums(client: &SourceClient, config: &Config) -> Result<CountryPremiums> {
    let bytes = client.fetch(&config.erp_url).await.with_context(|| {
        format!("Failed to fetch country risk premiums from {}", config.erp_url)
    })?;
    let selector = SheetSelector::parse(&config.erp_sheet);
    let rows = sheet::read_workbook_sheet(bytes, &selector)
        .context("Failed to read country risk premium workbook")?;
    damodaran::parse_country_premiums(&rows)
}

/// Fetch the latest risk-free rate.
pub async fn load_risk_free(client: &SourceClient, config: &Config) -> Result<RiskFreeRate> {
    let bytes = client.fetch(&config.risk_free_url).await.with_context(|| {
        format!("Failed to fetch risk-free rate from {}", config.risk_free_url)
    })?;
    fred::parse_risk_free_csv(&bytes, &config.risk_free_series)
}

/// Fetch all three sources concurrently. Any single failure fails the load.
pub async fn load_market_data(
    client: &SourceClient,
    config: &Config,
    kind: BetaKind,
) -> Result<MarketData> {
    let (risk_free, premiums, industries) = futures::try_join!(
        load_risk_free(client, config),
        load_premiums(client, config),
        load_industries(client, config, kind),
    )?;

    info!(
        rf = risk_free.rate,
        observed_on = %risk_free.observed_on,
        countries = premiums.len(),
        industries = industries.len(),
        "Loaded market data"
    );

    Ok(MarketData {
        risk_free,
        premiums,
        industries,
    })
}
