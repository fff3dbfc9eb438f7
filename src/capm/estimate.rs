// A single cost-of-equity estimate, assembled from the three sources.

use serde::Serialize;

use super::{cost_of_equity, sensitivity, SensitivityPoint, DEFAULT_SENSITIVITY_BETAS};
use crate::catalog::{BetaKind, LookupError};
use crate::sources::fred::RiskFreeRate;
use crate::sources::MarketData;

/// Everything shown for one estimate. Serializable for `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct EstimateReport {
    pub country: String,
    pub industry: String,
    pub beta_kind: BetaKind,
    pub risk_free: RiskFreeRate,
    pub equity_risk_premium: f64,
    pub beta: f64,
    pub cost_of_equity: f64,
    pub sensitivity: Vec<SensitivityPoint>,
}

impl EstimateReport {
    /// Look up the country ERP and industry beta, then compute Ke.
    ///
    /// Names are echoed back in their canonical catalog spelling. A miss on
    /// either lookup is returned as-is; no fallback value is substituted.
    pub fn build(
        data: &MarketData,
        country: &str,
        industry: &str,
        kind: BetaKind,
    ) -> Result<Self, LookupError> {
        let premium = data.premiums.find(country)?;
        let equity_risk_premium = data.premiums.total_erp_for(country)?;
        let industry_entry = data.industries.find(industry)?;
        let beta = data.industries.beta_for(industry, kind)?;
        let rf = data.risk_free.rate;

        Ok(Self {
            country: premium.country.clone(),
            industry: industry_entry.name.clone(),
            beta_kind: kind,
            risk_free: data.risk_free.clone(),
            equity_risk_premium,
            beta,
            cost_of_equity: cost_of_equity(rf, beta, equity_risk_premium),
            sensitivity: sensitivity(rf, equity_risk_premium, &DEFAULT_SENSITIVITY_BETAS),
        })
    }
}
