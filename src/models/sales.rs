//! Sales data models: seasons, records, and report output rows

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A labeled sales period, in chronological order.
///
/// The derive order of the variants defines the chronology, so `Ord`
/// compares seasons the way the reporting convention expects
/// (23SS < 23FW < 24SS < 24FW < 25SS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    #[serde(rename = "23SS")]
    Ss23,
    #[serde(rename = "23FW")]
    Fw23,
    #[serde(rename = "24SS")]
    Ss24,
    #[serde(rename = "24FW")]
    Fw24,
    #[serde(rename = "25SS")]
    Ss25,
}

impl Season {
    /// All known seasons, chronologically.
    pub const ALL: [Season; 5] = [
        Season::Ss23,
        Season::Fw23,
        Season::Ss24,
        Season::Fw24,
        Season::Ss25,
    ];

    /// The canonical column label for this season (e.g. "25SS").
    pub fn label(&self) -> &'static str {
        match self {
            Season::Ss23 => "23SS",
            Season::Fw23 => "23FW",
            Season::Ss24 => "24SS",
            Season::Fw24 => "24FW",
            Season::Ss25 => "25SS",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReportError::InvalidArgument(format!("unknown season label: {}", s)))
    }
}

/// One row of the source table: a store's amounts across seasons.
///
/// Missing season amounts read as 0 (never as "excluded"); `area` is the
/// store floor area in a fixed unit, absent when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub distributor: String,
    pub store: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    pub amounts: HashMap<Season, f64>,
}

impl SalesRecord {
    pub fn new(
        distributor: impl Into<String>,
        store: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            distributor: distributor.into(),
            store: store.into(),
            brand: brand.into(),
            area: None,
            amounts: HashMap::new(),
        }
    }

    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_amount(mut self, season: Season, amount: f64) -> Self {
        self.amounts.insert(season, amount);
        self
    }

    /// Amount for a season, with missing entries reading as 0.
    pub fn amount(&self, season: Season) -> f64 {
        self.amounts.get(&season).copied().unwrap_or(0.0)
    }
}

/// The dimension reports are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupField {
    Distributor,
    Brand,
}

impl GroupField {
    /// The grouping key of a record under this field.
    pub fn key_of<'a>(&self, record: &'a SalesRecord) -> &'a str {
        match self {
            GroupField::Distributor => &record.distributor,
            GroupField::Brand => &record.brand,
        }
    }
}

impl FromStr for GroupField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distributor" => Ok(GroupField::Distributor),
            "brand" => Ok(GroupField::Brand),
            _ => Err(ReportError::InvalidArgument(format!(
                "unknown group field: {} (expected distributor or brand)",
                s
            ))),
        }
    }
}

/// Which metric ranks and growth are computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Total,
    Average,
}

impl FromStr for Metric {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "total" => Ok(Metric::Total),
            "average" => Ok(Metric::Average),
            _ => Err(ReportError::InvalidArgument(format!(
                "unknown metric: {} (expected total or average)",
                s
            ))),
        }
    }
}

/// Sentinel filter value meaning "no filter on this field".
pub const ALL: &str = "ALL";

/// Exact-match filter conjunction applied before grouping.
///
/// An absent field or the `ALL` sentinel leaves that field unfiltered;
/// matching is case-sensitive on the stored values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl RecordFilter {
    pub fn distributor(mut self, distributor: impl Into<String>) -> Self {
        self.distributor = Some(distributor.into());
        self
    }

    pub fn store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        field_matches(&self.distributor, &record.distributor)
            && field_matches(&self.store, &record.store)
            && field_matches(&self.brand, &record.brand)
    }
}

fn field_matches(selected: &Option<String>, value: &str) -> bool {
    match selected.as_deref() {
        None => true,
        Some(ALL) => true,
        Some(selected) => selected == value,
    }
}

/// One output row of the season comparison: a group's totals, averages,
/// growth rates, and rank movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    /// Distinct contributing stores (counted as (distributor, store) pairs,
    /// since store names are only unique within a distributor).
    pub member_count: usize,
    pub current_total: f64,
    pub prior_total: f64,
    pub current_average: f64,
    pub prior_average: f64,
    /// Period-over-period growth of the total, in percent; 0 when the
    /// prior total is 0.
    pub growth_total: f64,
    pub growth_average: f64,
    /// 1-based position in the descending sort on the chosen current metric.
    pub rank: usize,
    /// 1-based position in the corresponding prior-period sort.
    pub prior_rank: usize,
    /// `prior_rank - rank`; positive means the group moved up.
    pub rank_delta: i64,
}

impl GroupSummary {
    /// Presentation state of the rank movement.
    ///
    /// `group_count` is the number of groups in the report this summary
    /// came from; a prior rank beyond it marks a group with no prior
    /// standing.
    pub fn rank_move(&self, group_count: usize) -> RankMove {
        if self.prior_rank > group_count {
            RankMove::New
        } else if self.rank_delta > 0 {
            RankMove::Up(self.rank_delta as u64)
        } else if self.rank_delta < 0 {
            RankMove::Down(self.rank_delta.unsigned_abs())
        } else {
            RankMove::Unchanged
        }
    }
}

/// Three-way rank movement, plus "new" for groups without a prior standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMove {
    Up(u64),
    Down(u64),
    Unchanged,
    New,
}

impl fmt::Display for RankMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankMove::Up(n) => write!(f, "▲{}", n),
            RankMove::Down(n) => write!(f, "▼{}", n),
            RankMove::Unchanged => f.write_str("-"),
            RankMove::New => f.write_str("new"),
        }
    }
}
