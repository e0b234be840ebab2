use outletiq::config::Config;
use outletiq::data::load_records;
use outletiq::models::{GroupField, GroupSummary, Metric, RecordFilter, Season};
use outletiq::report::aggregate;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let path = std::env::args().nth(1).unwrap_or(config.data_path);
    let records = load_records(&path)?;
    println!("Loaded {} records from {}", records.len(), path);
    println!();

    let filter = RecordFilter::default();

    let distributors = aggregate(
        &records,
        GroupField::Distributor,
        Season::Ss25,
        Season::Ss24,
        Metric::Total,
        &filter,
    );
    println!("Distributor comparison, 25SS vs 24SS (total sales):");
    print_summaries(&distributors, Season::Ss25, Season::Ss24);
    println!();

    let brands = aggregate(
        &records,
        GroupField::Brand,
        Season::Ss25,
        Season::Ss24,
        Metric::Total,
        &filter,
    );
    println!("Brand market-share ranking, 25SS vs 24SS:");
    print_summaries(&brands, Season::Ss25, Season::Ss24);

    Ok(())
}

fn print_summaries(summaries: &[GroupSummary], current: Season, prior: Season) {
    for summary in summaries {
        println!(
            "  {:>2}({}) {} | {} {} ({} {}) {} | {} stores",
            summary.rank,
            summary.rank_move(summaries.len()),
            summary.key,
            current,
            format_amount(summary.current_total),
            prior,
            format_amount(summary.prior_total),
            format_growth(summary.growth_total),
            summary.member_count,
        );
    }
}

/// Format an amount in 억 (hundreds of millions) units.
fn format_amount(amount: f64) -> String {
    format!("{:.2}억", amount / 100_000_000.0)
}

/// Format a growth percentage with the directional marker.
fn format_growth(growth: f64) -> String {
    if growth >= 0.0 {
        format!("▲{:.1}%", growth)
    } else {
        format!("▼{:.1}%", growth.abs())
    }
}
