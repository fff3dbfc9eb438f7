// Damodaran datasets: industry betas and country equity risk premiums.
//
// Both workbooks are published at pages.stern.nyu.edu/~adamodar and
// refreshed each January. The parsers here work on already-decoded rows
// (see `sheet::read_workbook_sheet`) so they can be tested without a
// workbook on disk.

use anyhow::Result;
use tracing::{debug, warn};

use super::sheet::{cell_at, locate_header, Cell, HeaderRow};
use crate::catalog::{
    BetaKind, CountryPremium, CountryPremiums, IndustryBeta, IndustryCatalog,
};

/// Global industry betas workbook (legacy .xls).
pub const BETAS_URL: &str = "https://www.stern.nyu.edu/~adamodar/pc/datasets/betas.xls";

/// The industry averages live on the second sheet.
pub const BETAS_SHEET: &str = "1";

/// Country risk premiums workbook.
pub const ERP_URL: &str = "https://www.stern.nyu.edu/~adamodar/pc/datasets/ctryprem.xlsx";

pub const ERP_SHEET: &str = "ERPs by country";

const INDUSTRY_NAME: &str = "Industry Name";
const NUMBER_OF_FIRMS: &str = "Number of firms";
const COUNTRY: &str = "Country";
const TOTAL_ERP: &str = "Total Equity Risk Premium";
const COUNTRY_RISK_PREMIUM: &str = "Country Risk Premium";

/// Parse the industry averages sheet into a catalog.
///
/// "Industry Name" and the column for `required` must be present; the other
/// beta columns are read when available. Malformed numbers become None.
pub fn parse_industry_betas(rows: &[Vec<Cell>], required: BetaKind) -> Result<IndustryCatalog> {
    let header = locate_header(rows, &[INDUSTRY_NAME, required.column()]).ok_or_else(|| {
        anyhow::anyhow!(
            "Betas sheet: no header row with \"{INDUSTRY_NAME}\" and \"{}\"",
            required.column()
        )
    })?;

    let name_col = header.require(INDUSTRY_NAME, "Betas sheet")?;
    let firms_col = header.column(NUMBER_OF_FIRMS);
    let levered_col = header.column(BetaKind::Levered.column());
    let unlevered_col = header.column(BetaKind::Unlevered.column());
    let cash_col = header.column(BetaKind::UnleveredCashCorrected.column());

    let read = |row: &[Cell], col: Option<usize>| col.and_then(|c| cell_at(row, c).number());

    let entries: Vec<IndustryBeta> = data_rows(rows, &header)
        .filter_map(|row| {
            let name = cell_at(row, name_col).text();
            if name.trim().is_empty() {
                return None;
            }
            Some(IndustryBeta {
                name,
                firms: read(row, firms_col)
                    .filter(|f| *f >= 0.0)
                    .map(|f| f.round() as u32),
                levered_beta: read(row, levered_col),
                unlevered_beta: read(row, unlevered_col),
                unlevered_beta_cash: read(row, cash_col),
            })
        })
        .collect();

    let catalog = IndustryCatalog::new(entries);
    let missing = catalog
        .entries()
        .iter()
        .filter(|e| e.beta(required).is_none())
        .count();
    if missing > 0 {
        warn!(
            missing,
            column = required.column(),
            "Some industries have no usable beta"
        );
    }
    debug!(
        industries = catalog.len(),
        header_row = header.row,
        "Parsed industry betas"
    );

    Ok(catalog)
}

/// Parse the "ERPs by country" sheet.
pub fn parse_country_premiums(rows: &[Vec<Cell>]) -> Result<CountryPremiums> {
    let header = locate_header(rows, &[COUNTRY, TOTAL_ERP]).ok_or_else(|| {
        anyhow::anyhow!("ERP sheet: no header row with \"{COUNTRY}\" and \"{TOTAL_ERP}\"")
    })?;

    let country_col = header.require(COUNTRY, "ERP sheet")?;
    let erp_col = header.require(TOTAL_ERP, "ERP sheet")?;
    let crp_col = header.column(COUNTRY_RISK_PREMIUM);

    let entries: Vec<CountryPremium> = data_rows(rows, &header)
        .filter_map(|row| {
            let country = cell_at(row, country_col).text();
            if country.trim().is_empty() {
                return None;
            }
            Some(CountryPremium {
                country,
                country_risk_premium: crp_col.and_then(|c| cell_at(row, c).number()),
                total_erp: cell_at(row, erp_col).number(),
            })
        })
        .collect();

    let premiums = CountryPremiums::new(entries);
    debug!(
        countries = premiums.len(),
        header_row = header.row,
        "Parsed country risk premiums"
    );

    Ok(premiums)
}

fn data_rows<'a>(
    rows: &'a [Vec<Cell>],
    header: &HeaderRow,
) -> impl Iterator<Item = &'a [Cell]> + 'a {
    rows.iter().skip(header.row + 1).map(Vec::as_slice)
}
