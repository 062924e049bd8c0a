//! Typed payloads for the Livingimage admin API.
//!
//! Field names mirror the backend's JSON keys, spaced keys included, so
//! payloads pass through unmodified apart from client-side search/sort.

use serde::{Deserialize, Deserializer, Serialize};

/// Rows per page served by the paginated image endpoints.
///
/// The backend does not report its page size; the web console assumes 10.
pub const PAGE_SIZE: u64 = 10;

/// Time-range filter accepted by the analytics endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    Day,
    Week,
    Month,
}

impl DateFilter {
    /// Returns the wire value sent as `date_filter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::Day => "day",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
        }
    }

    /// Returns all filters for iteration.
    pub fn all() -> &'static [DateFilter] {
        &[DateFilter::Day, DateFilter::Week, DateFilter::Month]
    }
}

impl std::str::FromStr for DateFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "day" => Ok(DateFilter::Day),
            "week" => Ok(DateFilter::Week),
            "month" => Ok(DateFilter::Month),
            _ => Err(format!("Unknown date filter: {value} (expected day, week or month)")),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// Response body of `POST /login/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Status message; "Verify your account First!" gates unverified accounts
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    /// True when the account has admin rights
    #[serde(default)]
    pub admin: Option<bool>,
    /// Account verification flag
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub token: Option<LoginToken>,
}

/// Token pair issued on login. Only the access token is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ============================================================================
// Users
// ============================================================================

/// Response body of `POST /admin/get-all-user/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(rename = "Users Data")]
    pub users: Vec<UserRow>,
}

/// One row of the user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    #[serde(rename = "User ID")]
    pub user_id: u64,
    #[serde(rename = "User Email")]
    pub email: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Total Credits")]
    pub total_credits: i64,
    #[serde(rename = "Registered on")]
    pub registered_on: String,
    #[serde(rename = "Verification Status")]
    pub verified: bool,
}

impl UserRow {
    /// Display form of the verification flag.
    pub fn status_label(&self) -> &'static str {
        if self.verified { "Verified" } else { "Not Verified" }
    }
}

/// Response body of `POST /admin/view-user/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetailResponse {
    pub user_data: UserProfile,
    #[serde(rename = "Original_Image_data", default)]
    pub original_images: Vec<OriginalImage>,
    #[serde(rename = "Regenerated_Image_data", default)]
    pub regenerated_images: Vec<RegeneratedImage>,
}

/// Profile block of the user detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "User Email")]
    pub email: String,
    #[serde(rename = "User Name")]
    pub name: String,
    #[serde(rename = "Total Credits")]
    pub total_credits: i64,
    #[serde(rename = "Registered on")]
    pub registered_on: String,
    #[serde(rename = "Verification Status")]
    pub verified: bool,
    #[serde(rename = "Stripe Customer ID", default)]
    pub stripe_customer_id: Option<String>,
    #[serde(rename = "Membership Name", default)]
    pub membership_name: Option<String>,
    #[serde(rename = "Membership Expiry", default)]
    pub membership_expiry: Option<String>,
}

// ============================================================================
// Images
// ============================================================================

/// An uploaded original image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalImage {
    /// Owning user's email
    pub user: String,
    pub original_image_id: u64,
    pub original_image_name: String,
    /// Hosted image URL; empty for prompt-only entries
    #[serde(default)]
    pub original_image: String,
    #[serde(default)]
    pub prompt: String,
    pub created: String,
    #[serde(default)]
    pub user_image_name: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub regenerated_at: Option<String>,
    #[serde(default)]
    pub next_regeneration_at: Option<String>,
}

/// A regenerated image derived from an original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegeneratedImage {
    /// Owning user's email
    pub user: String,
    pub regenerated_image_id: u64,
    pub original_image_id: u64,
    pub original_image_name: String,
    pub regenerated_image: String,
    pub created: String,
    #[serde(default)]
    pub regenerated_at: String,
}

/// Paginated response of `POST /admin/get-all-original-admin/?page=N`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalImagePage {
    pub count: u64,
    pub results: OriginalImageBatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginalImageBatch {
    #[serde(rename = "Original_Image_data")]
    pub images: Vec<OriginalImage>,
}

/// Paginated response of `POST /admin/get-all-regen-admin/?page=N`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegeneratedImagePage {
    pub count: u64,
    pub results: RegeneratedImageBatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegeneratedImageBatch {
    #[serde(rename = "Regenerated_Image_data")]
    pub images: Vec<RegeneratedImage>,
}

/// Total page count for a paginated listing.
pub fn total_pages(count: u64) -> u64 {
    count.div_ceil(PAGE_SIZE).max(1)
}

/// Response body of `POST /admin/get-one-original-admin/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneOriginalResponse {
    #[serde(rename = "Original_Image_data")]
    pub image: OriginalImage,
}

/// Response body of `POST /admin/get-one-regen-admin/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneRegeneratedResponse {
    #[serde(rename = "Regenerated_Image_data")]
    pub image: RegeneratedImage,
}

// ============================================================================
// Payments
// ============================================================================

/// Response body of `POST /admin/get-all-payment/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsResponse {
    #[serde(rename = "Payment List")]
    pub payments: Vec<PaymentRow>,
}

/// One row of the payment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    #[serde(rename = "Payment ID")]
    pub payment_id: u64,
    #[serde(rename = "User Email")]
    pub email: String,
    /// Decimal amount as the gateway reported it, e.g. "29.99"
    #[serde(rename = "Payment Amount")]
    pub amount: String,
    #[serde(rename = "Total Credits")]
    pub total_credits: i64,
    #[serde(rename = "Payment time")]
    pub time: String,
    #[serde(rename = "Payment Status")]
    pub status: String,
    #[serde(rename = "Payment Gateway ID")]
    pub gateway_id: String,
}

// ============================================================================
// Analytics
// ============================================================================

/// One sample of `POST /admin/analytics/`. The backend serves these
/// newest-first; callers reverse before charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsCard {
    #[serde(rename = "Total user", deserialize_with = "lenient_f64")]
    pub total_users: f64,
    #[serde(rename = "Total Original Images", deserialize_with = "lenient_f64")]
    pub total_original_images: f64,
    #[serde(rename = "Total Regenerated Images", deserialize_with = "lenient_f64")]
    pub total_regenerated_images: f64,
    #[serde(rename = "Total Payments", deserialize_with = "lenient_f64")]
    pub total_payments: f64,
    #[serde(rename = "Total Payment Amount", deserialize_with = "lenient_f64")]
    pub total_payment_amount: f64,
    #[serde(rename = "Total Credit Records", deserialize_with = "lenient_f64")]
    pub total_credit_records: f64,
    #[serde(rename = "Total Credit Added", deserialize_with = "lenient_f64")]
    pub total_credit_added: f64,
    #[serde(rename = "Total Credit Deducted", deserialize_with = "lenient_f64")]
    pub total_credit_deducted: f64,
}

/// Response body of `POST /admin/google-analytics/`: parallel arrays, one
/// entry per bucket of the requested range, newest-first on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    pub date: Vec<String>,
    #[serde(rename = "pageViews")]
    pub page_views: Vec<f64>,
    pub users: Vec<f64>,
    #[serde(rename = "newUsers")]
    pub new_users: Vec<f64>,
    /// Seconds; the console displays minutes
    #[serde(rename = "averageSessionDuration")]
    pub average_session_duration: Vec<f64>,
}

impl TrafficReport {
    /// Reorders every series oldest-first for display.
    pub fn into_oldest_first(mut self) -> Self {
        self.date.reverse();
        self.page_views.reverse();
        self.users.reverse();
        self.new_users.reverse();
        self.average_session_duration.reverse();
        self
    }
}

/// Accepts both JSON numbers and numeric strings.
///
/// The analytics endpoint is inconsistent about which one it serves.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("not a number: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_rows_parse_the_spaced_keys() {
        let body = serde_json::json!({
            "Users Data": [{
                "User ID": 7,
                "User Email": "a@b.io",
                "Name": "Ada",
                "Total Credits": 120,
                "Registered on": "2024-03-01",
                "Verification Status": true
            }]
        });

        let parsed: UsersResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.users.len(), 1);
        assert_eq!(parsed.users[0].email, "a@b.io");
        assert_eq!(parsed.users[0].status_label(), "Verified");
    }

    #[test]
    fn analytics_accepts_numeric_strings() {
        let body = serde_json::json!([{
            "Total user": "42",
            "Total Original Images": 10,
            "Total Regenerated Images": 3.5,
            "Total Payments": "7",
            "Total Payment Amount": "199.99",
            "Total Credit Records": 1,
            "Total Credit Added": 2,
            "Total Credit Deducted": 0
        }]);

        let parsed: Vec<AnalyticsCard> = serde_json::from_value(body).unwrap();
        assert_eq!(parsed[0].total_users, 42.0);
        assert_eq!(parsed[0].total_payment_amount, 199.99);
    }

    #[test]
    fn traffic_report_reverses_every_series() {
        let report = TrafficReport {
            date: vec!["d2".into(), "d1".into()],
            page_views: vec![20.0, 10.0],
            users: vec![2.0, 1.0],
            new_users: vec![1.0, 0.0],
            average_session_duration: vec![120.0, 60.0],
        };

        let report = report.into_oldest_first();
        assert_eq!(report.date, vec!["d1".to_string(), "d2".to_string()]);
        assert_eq!(report.page_views, vec![10.0, 20.0]);
        assert_eq!(report.average_session_duration, vec![60.0, 120.0]);
    }

    #[test]
    fn page_count_rounds_up_and_never_hits_zero() {
        assert_eq!(total_pages(0), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(95), 10);
    }
}
