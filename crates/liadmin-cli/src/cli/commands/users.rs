//! User command handlers.

use anyhow::{Context, Result};
use liadmin_core::api::ApiClient;
use liadmin_core::api::types::UserDetailResponse;
use liadmin_core::table::{SortDirection, UserSortKey, apply_search, sort_users};

use super::{confirm, fetch_once, table};

pub async fn list(
    client: &ApiClient,
    search: Option<&str>,
    sort: &str,
    desc: bool,
) -> Result<()> {
    let key: UserSortKey = sort.parse().map_err(anyhow::Error::msg)?;
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };

    let mut users = fetch_once(client.get_all_users()).await?;

    sort_users(&mut users, key, direction);
    apply_search(&mut users, search.unwrap_or(""));

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    let mut out = table(&["ID", "Email", "Name", "Credits", "Registered on", "Status"]);
    for user in &users {
        out.add_row(vec![
            format!("#{}", user.user_id),
            user.email.clone(),
            user.name.clone(),
            user.total_credits.to_string(),
            user.registered_on.clone(),
            user.status_label().to_string(),
        ]);
    }
    println!("{out}");
    println!("{} user(s)", users.len());
    Ok(())
}

pub async fn view(client: &ApiClient, email: &str) -> Result<()> {
    let detail: UserDetailResponse = fetch_once(client.view_user(email))
        .await
        .with_context(|| format!("view user '{email}'"))?;

    let profile = &detail.user_data;
    println!("Email: {}", profile.email);
    println!("Name: {}", profile.name);
    println!("Total Credits: {}", profile.total_credits);
    println!("Registered on: {}", profile.registered_on);
    println!(
        "Verification Status: {}",
        if profile.verified { "Verified" } else { "Not Verified" }
    );
    if let Some(id) = &profile.stripe_customer_id {
        println!("Stripe Customer ID: {id}");
    }
    if let Some(name) = &profile.membership_name {
        println!("Membership Name: {name}");
    }
    if let Some(expiry) = &profile.membership_expiry {
        println!("Membership Expiry: {expiry}");
    }

    if detail.original_images.is_empty() {
        println!("\nNo images.");
        return Ok(());
    }

    // Pair each original with its regeneration, as the web console does.
    let mut out = table(&["Original", "Created", "Public", "Regenerated at", "Next regeneration"]);
    for original in &detail.original_images {
        let regenerated = detail
            .regenerated_images
            .iter()
            .find(|r| r.original_image_id == original.original_image_id);
        out.add_row(vec![
            original.original_image_name.clone(),
            original.created.clone(),
            match original.public {
                Some(true) => "Yes".to_string(),
                _ => "No".to_string(),
            },
            regenerated
                .map(|r| r.regenerated_at.clone())
                .or_else(|| original.regenerated_at.clone())
                .unwrap_or_default(),
            original.next_regeneration_at.clone().unwrap_or_default(),
        ]);
    }
    println!("\n{out}");
    Ok(())
}

pub async fn delete(client: &ApiClient, email: &str, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Are you sure you want to delete the user {email}?"))? {
        println!("Aborted.");
        return Ok(());
    }

    fetch_once(client.delete_user(email))
        .await
        .with_context(|| format!("delete user '{email}'"))?;
    println!("User deleted successfully");
    Ok(())
}
