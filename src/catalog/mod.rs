// Reference catalogs: industry betas and country risk premiums.
//
// These are the strongly-typed records the rest of the tool works with.
// They are built once per run by the parsers in `sources::damodaran` and
// never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Which of Damodaran's beta columns feeds the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetaKind {
    /// "Beta": raw regression beta, reflecting the industry's leverage.
    Levered,
    /// "Unlevered beta": leverage removed.
    Unlevered,
    /// "Unlevered beta corrected for cash": leverage and cash holdings removed.
    #[default]
    #[serde(rename = "unlevered-cash")]
    UnleveredCashCorrected,
}

impl BetaKind {
    /// Column header in the betas workbook.
    pub fn column(self) -> &'static str {
        match self {
            BetaKind::Levered => "Beta",
            BetaKind::Unlevered => "Unlevered beta",
            BetaKind::UnleveredCashCorrected => "Unlevered beta corrected for cash",
        }
    }

    /// Short name used on the command line and in env vars.
    pub fn as_str(self) -> &'static str {
        match self {
            BetaKind::Levered => "levered",
            BetaKind::Unlevered => "unlevered",
            BetaKind::UnleveredCashCorrected => "unlevered-cash",
        }
    }
}

impl fmt::Display for BetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for BetaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "levered" | "beta" => Ok(BetaKind::Levered),
            "unlevered" => Ok(BetaKind::Unlevered),
            "unlevered-cash" | "unlevered_cash" | "cash-corrected" => {
                Ok(BetaKind::UnleveredCashCorrected)
            }
            other => Err(format!(
                "unknown beta kind \"{other}\" (expected levered, unlevered, or unlevered-cash)"
            )),
        }
    }
}

/// One row of the industry betas table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryBeta {
    pub name: String,
    pub firms: Option<u32>,
    pub levered_beta: Option<f64>,
    pub unlevered_beta: Option<f64>,
    pub unlevered_beta_cash: Option<f64>,
}

impl IndustryBeta {
    /// The beta selected by `kind`, or None if that cell was missing or
    /// malformed in the source.
    pub fn beta(&self, kind: BetaKind) -> Option<f64> {
        match kind {
            BetaKind::Levered => self.levered_beta,
            BetaKind::Unlevered => self.unlevered_beta,
            BetaKind::UnleveredCashCorrected => self.unlevered_beta_cash,
        }
    }
}

/// Ordered list of industries, in source-sheet order with unique names.
#[derive(Debug, Clone, Default)]
pub struct IndustryCatalog {
    entries: Vec<IndustryBeta>,
}

impl IndustryCatalog {
    /// Build a catalog, trimming names and dropping blanks and repeats
    /// (first occurrence wins).
    pub fn new(entries: Vec<IndustryBeta>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let entries = entries
            .into_iter()
            .filter_map(|mut e| {
                e.name = e.name.trim().to_string();
                if e.name.is_empty() || !seen.insert(e.name.clone()) {
                    None
                } else {
                    Some(e)
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[IndustryBeta] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Industry names, index-aligned with `entries()`.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Find an industry by name (case-insensitive, surrounding whitespace ignored).
    pub fn find(&self, name: &str) -> Result<&IndustryBeta, LookupError> {
        let wanted = name.trim();
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LookupError::NotFound {
                kind: LookupKind::Industry,
                name: wanted.to_string(),
            })
    }

    /// Beta for an industry. A missing industry and a missing beta value
    /// are both errors; there is no default.
    pub fn beta_for(&self, name: &str, kind: BetaKind) -> Result<f64, LookupError> {
        let entry = self.find(name)?;
        entry.beta(kind).ok_or_else(|| LookupError::MissingValue {
            kind: LookupKind::Industry,
            name: entry.name.clone(),
            field: kind.column(),
        })
    }
}

/// One row of the country risk premium table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPremium {
    pub country: String,
    pub country_risk_premium: Option<f64>,
    pub total_erp: Option<f64>,
}

/// Ordered list of country premiums.
#[derive(Debug, Clone, Default)]
pub struct CountryPremiums {
    entries: Vec<CountryPremium>,
}

impl CountryPremiums {
    pub fn new(entries: Vec<CountryPremium>) -> Self {
        let entries = entries
            .into_iter()
            .filter_map(|mut e| {
                e.country = e.country.trim().to_string();
                (!e.country.is_empty()).then_some(e)
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CountryPremium] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, country: &str) -> Result<&CountryPremium, LookupError> {
        let wanted = country.trim();
        self.entries
            .iter()
            .find(|e| e.country.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LookupError::NotFound {
                kind: LookupKind::Country,
                name: wanted.to_string(),
            })
    }

    /// Total equity risk premium for a country (decimal, e.g. 0.0712).
    pub fn total_erp_for(&self, country: &str) -> Result<f64, LookupError> {
        let entry = self.find(country)?;
        entry.total_erp.ok_or_else(|| LookupError::MissingValue {
            kind: LookupKind::Country,
            name: entry.country.clone(),
            field: "Total Equity Risk Premium",
        })
    }
}

/// What a lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Industry,
    Country,
}

impl LookupKind {
    /// CLI subcommand that lists valid names for this kind.
    fn list_command(self) -> &'static str {
        match self {
            LookupKind::Industry => "keystone industries",
            LookupKind::Country => "keystone countries",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Industry => f.write_str("industry"),
            LookupKind::Country => f.write_str("country"),
        }
    }
}

/// A catalog lookup that found nothing usable.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("{kind} \"{name}\" not found. Run `{}` to list valid names.", .kind.list_command())]
    NotFound { kind: LookupKind, name: String },

    #[error("{kind} \"{name}\" has no usable \"{field}\" value in the source data")]
    MissingValue {
        kind: LookupKind,
        name: String,
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, cash: Option<f64>) -> IndustryBeta {
        IndustryBeta {
            name: name.to_string(),
            firms: None,
            levered_beta: Some(1.1),
            unlevered_beta: Some(0.9),
            unlevered_beta_cash: cash,
        }
    }

    #[test]
    fn test_catalog_dedupes_and_trims() {
        let catalog = IndustryCatalog::new(vec![
            entry(" Metals & Mining ", Some(1.0)),
            entry("Metals & Mining", Some(2.0)),
            entry("   ", Some(3.0)),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].name, "Metals & Mining");
        assert_eq!(catalog.entries()[0].unlevered_beta_cash, Some(1.0));
    }

    #[test]
    fn test_beta_kind_round_trip_names() {
        for kind in [
            BetaKind::Levered,
            BetaKind::Unlevered,
            BetaKind::UnleveredCashCorrected,
        ] {
            assert_eq!(kind.as_str().parse::<BetaKind>().unwrap(), kind);
        }
        assert!("sideways".parse::<BetaKind>().is_err());
    }

    #[test]
    fn test_not_found_message_points_at_listing() {
        let catalog = IndustryCatalog::new(vec![entry("Steel", Some(1.0))]);
        let err = catalog.find("Gold").unwrap_err();
        assert!(err.to_string().contains("keystone industries"));
    }
}
