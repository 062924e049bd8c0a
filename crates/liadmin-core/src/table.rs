//! Client-side search and sort over fetched rows.
//!
//! Applied after the fetch, to the already-loaded page of data, exactly
//! like the web console: case-insensitive substring search across every
//! displayed field, stable sort by one column with an
//! ascending/descending toggle.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::api::types::{OriginalImage, PaymentRow, RegeneratedImage, UserRow};

/// Sort order for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Current sort column and direction.
///
/// `toggle` reproduces the console's header-click behavior: clicking the
/// active column flips the direction, clicking another column sorts it
/// ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig<K: PartialEq + Copy> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: PartialEq + Copy> SortConfig<K> {
    pub fn new(key: K) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn toggle(&mut self, key: K) {
        if self.key == key && self.direction == SortDirection::Ascending {
            self.direction = SortDirection::Descending;
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Rows that can be matched against a search term.
pub trait Searchable {
    /// Every displayed field, as the console would search it.
    fn haystack(&self) -> Vec<String>;

    /// Case-insensitive substring match across the haystack.
    fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.haystack()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Drops rows not matching the term. No-op for an empty term.
pub fn apply_search<T: Searchable>(rows: &mut Vec<T>, term: &str) {
    if !term.is_empty() {
        rows.retain(|row| row.matches(term));
    }
}

impl Searchable for UserRow {
    fn haystack(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.name.clone(),
            self.user_id.to_string(),
            self.total_credits.to_string(),
            self.registered_on.clone(),
            self.status_label().to_string(),
        ]
    }
}

impl Searchable for PaymentRow {
    fn haystack(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.status.clone(),
            self.amount.clone(),
            self.payment_id.to_string(),
            self.total_credits.to_string(),
            self.time.clone(),
            self.gateway_id.clone(),
        ]
    }
}

impl Searchable for OriginalImage {
    fn haystack(&self) -> Vec<String> {
        let mut fields = vec![
            self.user.clone(),
            self.original_image_id.to_string(),
            self.original_image_name.clone(),
            self.original_image.clone(),
            self.prompt.clone(),
            self.created.clone(),
        ];
        fields.extend(self.user_image_name.clone());
        fields.extend(self.tag.clone());
        fields.extend(self.description.clone());
        fields
    }
}

impl Searchable for RegeneratedImage {
    fn haystack(&self) -> Vec<String> {
        vec![
            self.user.clone(),
            self.regenerated_image_id.to_string(),
            self.original_image_id.to_string(),
            self.original_image_name.clone(),
            self.regenerated_image.clone(),
            self.created.clone(),
            self.regenerated_at.clone(),
        ]
    }
}

/// Sortable columns of the user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    Id,
    Email,
    Name,
    Credits,
    RegisteredOn,
    Status,
}

impl FromStr for UserSortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "id" => Ok(UserSortKey::Id),
            "email" => Ok(UserSortKey::Email),
            "name" => Ok(UserSortKey::Name),
            "credits" => Ok(UserSortKey::Credits),
            "registered" => Ok(UserSortKey::RegisteredOn),
            "status" => Ok(UserSortKey::Status),
            _ => Err(format!(
                "Unknown sort column: {value} (expected id, email, name, credits, registered or status)"
            )),
        }
    }
}

/// Stable sort of the user list by one column.
pub fn sort_users(users: &mut [UserRow], key: UserSortKey, direction: SortDirection) {
    users.sort_by(|a, b| {
        let ord = match key {
            UserSortKey::Id => a.user_id.cmp(&b.user_id),
            UserSortKey::Email => a.email.cmp(&b.email),
            UserSortKey::Name => a.name.cmp(&b.name),
            UserSortKey::Credits => a.total_credits.cmp(&b.total_credits),
            UserSortKey::RegisteredOn => a.registered_on.cmp(&b.registered_on),
            UserSortKey::Status => a.verified.cmp(&b.verified),
        };
        direction.apply(ord)
    });
}

/// Sortable columns of the payment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentSortKey {
    Id,
    Email,
    Amount,
    Credits,
    Time,
    Status,
    Gateway,
}

impl FromStr for PaymentSortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "id" => Ok(PaymentSortKey::Id),
            "email" => Ok(PaymentSortKey::Email),
            "amount" => Ok(PaymentSortKey::Amount),
            "credits" => Ok(PaymentSortKey::Credits),
            "time" => Ok(PaymentSortKey::Time),
            "status" => Ok(PaymentSortKey::Status),
            "gateway" => Ok(PaymentSortKey::Gateway),
            _ => Err(format!(
                "Unknown sort column: {value} (expected id, email, amount, credits, time, status or gateway)"
            )),
        }
    }
}

/// Stable sort of the payment list by one column.
///
/// Amounts are compared as the strings the gateway reported, matching
/// the console's behavior.
pub fn sort_payments(payments: &mut [PaymentRow], key: PaymentSortKey, direction: SortDirection) {
    payments.sort_by(|a, b| {
        let ord = match key {
            PaymentSortKey::Id => a.payment_id.cmp(&b.payment_id),
            PaymentSortKey::Email => a.email.cmp(&b.email),
            PaymentSortKey::Amount => a.amount.cmp(&b.amount),
            PaymentSortKey::Credits => a.total_credits.cmp(&b.total_credits),
            PaymentSortKey::Time => a.time.cmp(&b.time),
            PaymentSortKey::Status => a.status.cmp(&b.status),
            PaymentSortKey::Gateway => a.gateway_id.cmp(&b.gateway_id),
        };
        direction.apply(ord)
    });
}
