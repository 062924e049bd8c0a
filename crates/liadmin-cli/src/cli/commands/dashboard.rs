//! Dashboard command handler.
//!
//! Two independent fetches, as on the web dashboard: the stat cards and
//! the traffic report. Both series arrive newest-first and are reversed
//! for display; session durations are shown in minutes.

use anyhow::{Context, Result};
use liadmin_core::api::ApiClient;
use liadmin_core::api::types::{AnalyticsCard, DateFilter, TrafficReport};

use super::table;

pub async fn run(client: &ApiClient, filter: &str) -> Result<()> {
    let filter: DateFilter = filter.parse().map_err(anyhow::Error::msg)?;

    // Fired together on mount; neither blocks the other.
    let (cards, traffic) = tokio::join!(client.analytics(filter), client.traffic(filter));

    // Each half fails independently, like the two dashboard panels.
    match cards {
        Ok(cards) => print_cards(&cards),
        Err(e) => eprintln!("Failed to fetch analytics: {e}"),
    }

    println!();

    let traffic = traffic.map_err(anyhow::Error::new).context("fetch traffic report")?;
    print_traffic(&traffic.into_oldest_first(), filter);
    Ok(())
}

fn print_cards(cards: &[AnalyticsCard]) {
    // Newest bucket first on the wire
    let Some(latest) = cards.first() else {
        println!("No analytics data.");
        return;
    };

    let mut out = table(&["Metric", "Value"]);
    out.add_row(vec!["Total Users".to_string(), format_metric(latest.total_users)]);
    out.add_row(vec![
        "Total Original Images".to_string(),
        format_metric(latest.total_original_images),
    ]);
    out.add_row(vec![
        "Total Regenerated Images".to_string(),
        format_metric(latest.total_regenerated_images),
    ]);
    out.add_row(vec!["Total Payments".to_string(), format_metric(latest.total_payments)]);
    out.add_row(vec![
        "Total Payment Amount".to_string(),
        format_metric(latest.total_payment_amount),
    ]);
    out.add_row(vec![
        "Total Credit Records".to_string(),
        format_metric(latest.total_credit_records),
    ]);
    out.add_row(vec![
        "Total Credit Added".to_string(),
        format_metric(latest.total_credit_added),
    ]);
    out.add_row(vec![
        "Total Credit Deducted".to_string(),
        format_metric(latest.total_credit_deducted),
    ]);
    println!("{out}");
}

fn print_traffic(report: &TrafficReport, filter: DateFilter) {
    if report.date.is_empty() {
        println!("No traffic data.");
        return;
    }

    println!("Traffic: website visitors (per {})", filter.as_str());
    let mut out = table(&["Date", "Page Views", "Users", "New Users", "Avg Session (min)"]);
    for (i, date) in report.date.iter().enumerate() {
        out.add_row(vec![
            date.clone(),
            series_value(&report.page_views, i),
            series_value(&report.users, i),
            series_value(&report.new_users, i),
            report
                .average_session_duration
                .get(i)
                .map(|seconds| format!("{:.1}", seconds / 60.0))
                .unwrap_or_default(),
        ]);
    }
    println!("{out}");
}

fn series_value(series: &[f64], i: usize) -> String {
    series.get(i).map(|v| format_metric(*v)).unwrap_or_default()
}

/// Whole numbers without a decimal point, fractions with two digits.
fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
