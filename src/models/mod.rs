//! Shared data models spanning the report layers.

pub mod sales;

pub use sales::{
    GroupField, GroupSummary, Metric, RankMove, RecordFilter, SalesRecord, Season, ALL,
};
