// FRED risk-free rate: latest observation of a daily Treasury series.
//
// FRED's graph CSV export has two columns: a date column (named "DATE" in
// older exports, "observation_date" in newer ones) and the series id.
// Holidays are reported as "." rather than left empty.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Default FRED series: 10-Year Treasury Constant Maturity Rate.
pub const DEFAULT_SERIES: &str = "DGS10";

/// Default CSV export URL for the default series.
pub const DEFAULT_URL: &str = "https://fred.stlouisfed.org/graph/fredgraph.csv?id=DGS10";

/// The most recent observation of a risk-free series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFreeRate {
    pub series: String,
    pub observed_on: NaiveDate,
    /// Rate as a decimal (FRED publishes percent; 4.25 becomes 0.0425).
    pub rate: f64,
}

/// Parse a FRED CSV export and return the latest valid observation.
pub fn parse_risk_free_csv(bytes: &[u8], series: &str) -> Result<RiskFreeRate> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read FRED CSV header")?
        .iter()
        .map(|h| h.trim().to_uppercase())
        .collect();

    let date_col = headers.iter().position(|h| h.contains("DATE")).unwrap_or(0);
    let wanted = series.trim().to_uppercase();
    let value_col = headers
        .iter()
        .position(|h| *h == wanted)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "FRED CSV has no {wanted} column (columns: {})",
                headers.join(", ")
            )
        })?;

    let mut observations: Vec<(NaiveDate, f64)> = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record.context("Failed to read FRED CSV record")?;
        let date = record
            .get(date_col)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        let value = record
            .get(value_col)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite());

        match (date, value) {
            (Some(d), Some(v)) => observations.push((d, v)),
            _ => skipped += 1,
        }
    }

    // Stable sort: same-date rows keep file order, so the later row wins.
    observations.sort_by_key(|(d, _)| *d);

    debug!(
        series = %wanted,
        observations = observations.len(),
        skipped,
        "Parsed FRED series"
    );

    let (observed_on, percent) = observations
        .last()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("FRED series {wanted} has no valid observations"))?;

    Ok(RiskFreeRate {
        series: wanted,
        observed_on,
        rate: percent / 100.0,
    })
}
