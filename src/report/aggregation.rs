//! Season-over-season comparison aggregation
//!
//! The one place growth and rank-delta arithmetic lives: filter, partition
//! by distributor or brand, sum and average the two seasons, then rank the
//! groups on the current and prior period independently.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::{GroupField, GroupSummary, Metric, RecordFilter, SalesRecord, Season};

/// Compute one `GroupSummary` per group present after filtering, emitted in
/// ascending rank order (best current performer first).
///
/// The computation is pure: it reads the record slice, allocates its
/// output, and touches no other state. Empty input (or input the filter
/// removes entirely) yields an empty output, not an error.
pub fn aggregate(
    records: &[SalesRecord],
    group_field: GroupField,
    current: Season,
    prior: Season,
    metric: Metric,
    filter: &RecordFilter,
) -> Vec<GroupSummary> {
    let filtered: Vec<&SalesRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .collect();

    // Partition preserving first-seen key order; the stable rank sorts
    // below fall back to this order on ties.
    let mut key_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&SalesRecord>> = HashMap::new();
    for record in filtered.iter().copied() {
        let key = group_field.key_of(record);
        groups
            .entry(key)
            .or_insert_with(|| {
                key_order.push(key);
                Vec::new()
            })
            .push(record);
    }

    let mut summaries: Vec<GroupSummary> = key_order
        .iter()
        .map(|&key| {
            let members = &groups[key];
            let current_total: f64 = members.iter().map(|r| r.amount(current)).sum();
            let prior_total: f64 = members.iter().map(|r| r.amount(prior)).sum();
            let current_average = active_average(members, current);
            let prior_average = active_average(members, prior);

            GroupSummary {
                key: key.to_string(),
                member_count: distinct_stores(members),
                current_total,
                prior_total,
                current_average,
                prior_average,
                growth_total: growth_pct(current_total, prior_total),
                growth_average: growth_pct(current_average, prior_average),
                rank: 0,
                prior_rank: 0,
                rank_delta: 0,
            }
        })
        .collect();

    // Two independent stable sort passes: the prior rank is never derived
    // from the current one, even for the average metric.
    let current_ranks = rank_positions(&summaries, |s| match metric {
        Metric::Total => s.current_total,
        Metric::Average => s.current_average,
    });
    let prior_ranks = rank_positions(&summaries, |s| match metric {
        Metric::Total => s.prior_total,
        Metric::Average => s.prior_average,
    });

    for (i, summary) in summaries.iter_mut().enumerate() {
        summary.rank = current_ranks[i];
        summary.prior_rank = prior_ranks[i];
        summary.rank_delta = summary.prior_rank as i64 - summary.rank as i64;
    }

    summaries.sort_by_key(|summary| summary.rank);
    summaries
}

/// Growth in percent, with a zero prior short-circuited to 0 rather than
/// raised or left as NaN. A group with no prior-period activity therefore
/// reads 0% growth; callers distinguishing "new entrant" from "flat" check
/// the prior value itself.
pub fn growth_pct(current: f64, prior: f64) -> f64 {
    if prior > 0.0 {
        (current - prior) / prior * 100.0
    } else {
        0.0
    }
}

/// Average over only the members whose amount for the season is strictly
/// positive, so stores not yet operating in a season do not drag the
/// average toward 0. Returns 0 when no member contributes.
fn active_average(members: &[&SalesRecord], season: Season) -> f64 {
    let mut sum = 0.0;
    let mut contributors = 0usize;
    for record in members {
        let amount = record.amount(season);
        if amount > 0.0 {
            sum += amount;
            contributors += 1;
        }
    }
    if contributors > 0 {
        sum / contributors as f64
    } else {
        0.0
    }
}

fn distinct_stores(members: &[&SalesRecord]) -> usize {
    members
        .iter()
        .map(|record| (record.distributor.as_str(), record.store.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

/// 1-based rank of each summary under a stable descending sort on `value`,
/// returned in the summaries' input order.
fn rank_positions<F>(summaries: &[GroupSummary], value: F) -> Vec<usize>
where
    F: Fn(&GroupSummary) -> f64,
{
    let mut indices: Vec<usize> = (0..summaries.len()).collect();
    indices.sort_by(|&a, &b| {
        value(&summaries[b])
            .partial_cmp(&value(&summaries[a]))
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0usize; summaries.len()];
    for (position, &index) in indices.iter().enumerate() {
        ranks[index] = position + 1;
    }
    ranks
}
