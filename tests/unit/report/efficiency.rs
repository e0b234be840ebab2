//! Unit tests for the per-area efficiency report

use outletiq::models::{SalesRecord, Season};
use outletiq::report::store_efficiency;

fn records() -> Vec<SalesRecord> {
    vec![
        SalesRecord::new("A", "Small", "Discovery")
            .with_area(50.0)
            .with_amount(Season::Ss25, 10_000.0),
        SalesRecord::new("A", "Large", "Discovery")
            .with_area(200.0)
            .with_amount(Season::Ss25, 20_000.0),
        // No area on record: excluded from the report entirely.
        SalesRecord::new("B", "Unknown", "Discovery").with_amount(Season::Ss25, 99_999.0),
        SalesRecord::new("B", "Other", "NorthPeak")
            .with_area(100.0)
            .with_amount(Season::Ss25, 30_000.0),
    ]
}

#[test]
fn excludes_stores_without_area() {
    let rows = store_efficiency(&records(), None);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.store != "Unknown"));
}

#[test]
fn excludes_zero_area() {
    let records = vec![SalesRecord::new("A", "Zero", "B")
        .with_area(0.0)
        .with_amount(Season::Ss25, 100.0)];
    assert!(store_efficiency(&records, None).is_empty());
}

#[test]
fn per_area_ratio_and_season_coverage() {
    let rows = store_efficiency(&records(), Some("NorthPeak"));
    assert_eq!(rows.len(), 1);
    let other = &rows[0];
    assert_eq!(other.seasons.len(), Season::ALL.len());

    let ss25 = other
        .seasons
        .iter()
        .find(|s| s.season == Season::Ss25)
        .unwrap();
    assert_eq!(ss25.per_area, 300.0);
    // Seasons with no recorded amount contribute zero.
    let ss23 = other
        .seasons
        .iter()
        .find(|s| s.season == Season::Ss23)
        .unwrap();
    assert_eq!(ss23.per_area, 0.0);
    // Mean across all five seasons, zero seasons included.
    assert_eq!(other.average, 300.0 / 5.0);
}

#[test]
fn sorts_descending_by_average_efficiency() {
    let rows = store_efficiency(&records(), None);
    // Other: 300/area-season, Small: 200, Large: 100.
    let stores: Vec<&str> = rows.iter().map(|r| r.store.as_str()).collect();
    assert_eq!(stores, vec!["Other", "Small", "Large"]);
    assert!(rows.windows(2).all(|w| w[0].average >= w[1].average));
}

#[test]
fn brand_filter_scopes_the_report() {
    let rows = store_efficiency(&records(), Some("Discovery"));
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.brand == "Discovery"));
}
