// Colored terminal output for estimates, suggestions, and catalog listings.

use colored::Colorize;

use super::percent;
use crate::capm::estimate::EstimateReport;
use crate::catalog::{BetaKind, CountryPremiums, IndustryCatalog};
use crate::suggest::RankedSuggestion;

/// Display a cost-of-equity estimate with its inputs and sensitivity table.
pub fn display_estimate(report: &EstimateReport) {
    println!("\n{}", "=== Cost of Equity (CAPM) ===".bold());
    println!("  {}", "Ke = Rf + β × ERP".dimmed());
    println!();

    println!(
        "  Risk-free rate (Rf)   {:>8.4}  {}",
        report.risk_free.rate,
        format!(
            "FRED {} as of {}",
            report.risk_free.series, report.risk_free.observed_on
        )
        .dimmed()
    );
    println!(
        "  Equity risk premium   {:>8.4}  {}",
        report.equity_risk_premium,
        format!("Total ERP, {}", report.country).dimmed()
    );
    println!(
        "  Beta (β)              {:>8.4}  {}",
        report.beta,
        format!("{}, {}", report.industry, report.beta_kind).dimmed()
    );

    println!(
        "\n  {} {}",
        "Ke =".bold(),
        percent(report.cost_of_equity, 2).green().bold()
    );

    println!("\n  {}", "Sensitivity to β".bold());
    for point in &report.sensitivity {
        println!(
            "    β = {:.1} → Ke = {}",
            point.beta,
            percent(point.cost_of_equity, 2)
        );
    }
}

/// Display ranked industry suggestions for a description.
pub fn display_suggestions(query: &str, suggestions: &[RankedSuggestion]) {
    println!(
        "\n{}",
        format!(
            "Industries closest to \"{}\":",
            super::truncate_chars(query, 60)
        )
        .bold()
    );
    for s in suggestions {
        println!("{}", suggestion_line(s));
    }
}

/// One suggestion row. The name is padded before styling so escape codes
/// don't count toward the column width.
fn suggestion_line(s: &RankedSuggestion) -> String {
    let beta = match s.beta {
        Some(b) => format!("β = {b:.4}"),
        None => "β = n/a".dimmed().to_string(),
    };
    format!(
        "  {}. {} {}  {}",
        s.rank,
        format!("{:<40}", s.name).bold(),
        beta,
        format!("(similarity {:.3})", s.similarity).dimmed()
    )
}

/// List catalog industries, optionally filtered by substring.
pub fn display_industries(catalog: &IndustryCatalog, kind: BetaKind, filter: Option<&str>) {
    let needle = filter.map(str::to_lowercase);
    let rows: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|e| {
            needle
                .as_deref()
                .is_none_or(|n| e.name.to_lowercase().contains(n))
        })
        .collect();

    println!(
        "\n{}",
        format!("=== Industries ({} of {}) ===", rows.len(), catalog.len()).bold()
    );
    println!(
        "  {:<48} {:>7}  {:>8}",
        "Industry".dimmed(),
        "Firms".dimmed(),
        "Beta".dimmed()
    );
    println!("  {}", "-".repeat(66).dimmed());

    for e in rows {
        let firms = e.firms.map(|f| f.to_string()).unwrap_or_else(|| "-".into());
        let beta = e
            .beta(kind)
            .map(|b| format!("{b:.4}"))
            .unwrap_or_else(|| "n/a".into());
        println!("  {:<48} {:>7}  {:>8}", e.name, firms, beta);
    }
    println!("\n  {}", format!("Beta column: {kind}").dimmed());
}

/// List countries with their risk premiums, optionally filtered by substring.
pub fn display_countries(premiums: &CountryPremiums, filter: Option<&str>) {
    let needle = filter.map(str::to_lowercase);
    let rows: Vec<_> = premiums
        .entries()
        .iter()
        .filter(|e| {
            needle
                .as_deref()
                .is_none_or(|n| e.country.to_lowercase().contains(n))
        })
        .collect();

    println!(
        "\n{}",
        format!("=== Countries ({} of {}) ===", rows.len(), premiums.len()).bold()
    );
    println!(
        "  {:<36} {:>9}  {:>9}",
        "Country".dimmed(),
        "CRP".dimmed(),
        "Total ERP".dimmed()
    );
    println!("  {}", "-".repeat(58).dimmed());

    let fmt = |v: Option<f64>| v.map(|r| percent(r, 2)).unwrap_or_else(|| "n/a".into());
    for e in rows {
        println!(
            "  {:<36} {:>9}  {:>9}",
            e.country,
            fmt(e.country_risk_premium),
            fmt(e.total_erp)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str) -> RankedSuggestion {
        RankedSuggestion {
            rank: 1,
            name: name.to_string(),
            beta: Some(1.05),
            similarity: 0.8,
        }
    }

    #[test]
    fn test_suggestion_line_pads_name_inside_styling() {
        colored::control::set_override(true);
        let line = suggestion_line(&suggestion("Steel"));
        colored::control::unset_override();

        assert!(line.contains(&format!("{:<40}", "Steel")), "got: {line:?}");
        assert!(line.contains("β = 1.0500"));
    }

    #[test]
    fn test_suggestion_line_missing_beta() {
        let line = suggestion_line(&RankedSuggestion {
            beta: None,
            ..suggestion("Oil/Gas Distribution")
        });
        assert!(line.contains("n/a"));
    }
}
