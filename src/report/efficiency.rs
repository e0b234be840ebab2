//! Per-area sales efficiency report
//!
//! Amount divided by store floor area, per season and averaged across all
//! known seasons. Stores without a positive area are excluded outright.

use serde::{Deserialize, Serialize};

use crate::models::{SalesRecord, Season};

/// Efficiency of one season for one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonEfficiency {
    pub season: Season,
    pub amount: f64,
    /// Amount per unit of floor area.
    pub per_area: f64,
}

/// One store's efficiency row, covering every known season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEfficiency {
    pub store: String,
    pub distributor: String,
    pub brand: String,
    pub area: f64,
    pub seasons: Vec<SeasonEfficiency>,
    /// Mean per-area efficiency across all known seasons, zero seasons
    /// included.
    pub average: f64,
}

/// Compute per-area efficiency for every store with a known positive area,
/// sorted descending by average efficiency. An optional brand scopes the
/// report (case-sensitive exact match).
pub fn store_efficiency(records: &[SalesRecord], brand: Option<&str>) -> Vec<StoreEfficiency> {
    let mut rows: Vec<StoreEfficiency> = records
        .iter()
        .filter(|record| brand.map_or(true, |b| b == record.brand))
        .filter_map(|record| {
            let area = record.area.filter(|&a| a > 0.0)?;
            let seasons: Vec<SeasonEfficiency> = Season::ALL
                .into_iter()
                .map(|season| {
                    let amount = record.amount(season);
                    SeasonEfficiency {
                        season,
                        amount,
                        per_area: amount / area,
                    }
                })
                .collect();
            let average =
                seasons.iter().map(|s| s.per_area).sum::<f64>() / seasons.len() as f64;

            Some(StoreEfficiency {
                store: record.store.clone(),
                distributor: record.distributor.clone(),
                brand: record.brand.clone(),
                area,
                seasons,
                average,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
