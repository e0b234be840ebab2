//! CSV snapshot loading
//!
//! Parses the outlet sales table into `SalesRecord`s. The canonical export
//! carries Korean headers (유통사/매장명/브랜드/매장 면적) plus one column per
//! season label; English header names are accepted as well.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use crate::error::{ReportError, Result};
use crate::models::{SalesRecord, Season};

const DISTRIBUTOR_COLUMNS: [&str; 2] = ["유통사", "distributor"];
const STORE_COLUMNS: [&str; 2] = ["매장명", "store"];
const BRAND_COLUMNS: [&str; 2] = ["브랜드", "brand"];
const AREA_COLUMNS: [&str; 2] = ["매장 면적", "area"];

/// Load the sales snapshot from a CSV file.
///
/// A season column that is absent from the header means "all amounts 0 for
/// that season", not a load error. Rows missing a distributor, store, or
/// brand value are skipped with a warning; blank or unparseable amount
/// cells read as 0 and a blank area reads as absent.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        ReportError::DataSource(format!("cannot open {}: {}", path.display(), e))
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let distributor_col = find_column(&headers, &DISTRIBUTOR_COLUMNS)
        .ok_or_else(|| ReportError::DataSource("missing distributor column".to_string()))?;
    let store_col = find_column(&headers, &STORE_COLUMNS)
        .ok_or_else(|| ReportError::DataSource("missing store column".to_string()))?;
    let brand_col = find_column(&headers, &BRAND_COLUMNS)
        .ok_or_else(|| ReportError::DataSource("missing brand column".to_string()))?;
    let area_col = find_column(&headers, &AREA_COLUMNS);
    let season_cols: Vec<(Season, usize)> = Season::ALL
        .into_iter()
        .filter_map(|season| find_column(&headers, &[season.label()]).map(|col| (season, col)))
        .collect();

    let mut records = Vec::new();
    for (row_number, row) in reader.records().enumerate() {
        let row = row?;
        let distributor = cell(&row, distributor_col);
        let store = cell(&row, store_col);
        let brand = cell(&row, brand_col);
        if distributor.is_empty() || store.is_empty() || brand.is_empty() {
            warn!(row = row_number + 2, "skipping row with blank key fields");
            continue;
        }

        let mut record = SalesRecord::new(distributor, store, brand);
        if let Some(col) = area_col {
            if let Some(area) = parse_number(cell(&row, col)) {
                record = record.with_area(area);
            }
        }
        for &(season, col) in &season_cols {
            let amount = parse_number(cell(&row, col)).unwrap_or(0.0);
            record = record.with_amount(season, amount);
        }
        records.push(record);
    }

    Ok(records)
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|header| names.iter().any(|name| header == *name))
}

fn cell<'a>(row: &'a StringRecord, col: usize) -> &'a str {
    row.get(col).unwrap_or("")
}

/// Parse a numeric cell, tolerating thousands separators. Blank or
/// non-numeric cells read as `None`.
fn parse_number(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.replace(',', "").parse::<f64>().ok()
}
