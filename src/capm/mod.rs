// Capital Asset Pricing Model: cost of equity from Rf, beta, and ERP.
//
//   Ke = Rf + β × ERP
//
// All rates are decimals (0.045, not 4.5).

pub mod estimate;

use serde::Serialize;

/// Betas used for the sensitivity table when none are given.
pub const DEFAULT_SENSITIVITY_BETAS: [f64; 4] = [0.5, 1.0, 1.5, 2.0];

/// Cost of equity under CAPM.
pub fn cost_of_equity(risk_free: f64, beta: f64, equity_risk_premium: f64) -> f64 {
    risk_free + beta * equity_risk_premium
}

/// One row of a sensitivity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivityPoint {
    pub beta: f64,
    pub cost_of_equity: f64,
}

/// Cost of equity at each of `betas`, holding Rf and ERP fixed.
pub fn sensitivity(risk_free: f64, equity_risk_premium: f64, betas: &[f64]) -> Vec<SensitivityPoint> {
    betas
        .iter()
        .map(|&beta| SensitivityPoint {
            beta,
            cost_of_equity: cost_of_equity(risk_free, beta, equity_risk_premium),
        })
        .collect()
}
