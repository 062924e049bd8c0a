//! Payment command handlers.

use anyhow::Result;
use liadmin_core::api::ApiClient;
use liadmin_core::table::{PaymentSortKey, SortDirection, apply_search, sort_payments};

use super::{fetch_once, table};

pub async fn list(
    client: &ApiClient,
    search: Option<&str>,
    sort: &str,
    desc: bool,
) -> Result<()> {
    let key: PaymentSortKey = sort.parse().map_err(anyhow::Error::msg)?;
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let mut payments = fetch_once(client.payments()).await?;

    sort_payments(&mut payments, key, direction);
    apply_search(&mut payments, search.unwrap_or(""));

    if payments.is_empty() {
        println!("No payments found.");
        return Ok(());
    }

    let mut out = table(&["ID", "Email", "Amount", "Credits", "Time", "Status", "Gateway ID"]);
    for payment in &payments {
        // Gateway IDs are long; the console truncates them too
        let gateway: String = payment.gateway_id.chars().take(30).collect();
        out.add_row(vec![
            format!("#{}", payment.payment_id),
            payment.email.clone(),
            format!("${}", payment.amount),
            payment.total_credits.to_string(),
            payment.time.clone(),
            payment.status.clone(),
            gateway,
        ]);
    }
    println!("{out}");
    println!("{} payment(s)", payments.len());
    Ok(())
}
