//! JSON fixture helpers for integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{Value, json};
use tempfile::TempDir;

/// A `liadmin` command pointed at a temp home and a mock backend.
///
/// `LIADMIN_BLOCK_REAL_API=1` makes any accidental use of the production
/// base URL panic instead of hitting the network.
pub fn liadmin(home: &TempDir, base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("liadmin").expect("binary builds");
    cmd.env("LIADMIN_HOME", home.path())
        .env("LIVINGIMAGE_BASE_URL", base_url)
        .env("LIADMIN_BLOCK_REAL_API", "1");
    cmd
}

/// Writes a logged-in session file, as a successful login would.
pub fn seed_session(home: &TempDir, token: &str) {
    let session = json!({
        "token": token,
        "verified": true,
        "raw": {"email": "admin@livingimage.io", "admin": true}
    });
    std::fs::write(
        home.path().join("session.json"),
        serde_json::to_string_pretty(&session).unwrap(),
    )
    .unwrap();
}

pub fn session_path(home: &TempDir) -> std::path::PathBuf {
    home.path().join("session.json")
}

pub fn login_success_body() -> Value {
    json!({
        "email": "admin@livingimage.io",
        "admin": true,
        "verified": true,
        "token": {"access": "test-access-token-1234567890", "refresh": "test-refresh"}
    })
}

pub fn users_body() -> Value {
    json!({
        "Users Data": [
            {"User ID": 2, "User Email": "bob@example.com", "Name": "Bob",
             "Total Credits": 5, "Registered on": "2024-02-01",
             "Verification Status": false},
            {"User ID": 1, "User Email": "ada@example.com", "Name": "Ada",
             "Total Credits": 10, "Registered on": "2024-01-01",
             "Verification Status": true},
            {"User ID": 3, "User Email": "cid@example.com", "Name": "Cid",
             "Total Credits": 0, "Registered on": "2024-03-01",
             "Verification Status": true}
        ]
    })
}

pub fn payments_body() -> Value {
    json!({
        "Payment List": [
            {"Payment ID": 11, "User Email": "ada@example.com",
             "Payment Amount": "29.99", "Total Credits": 300,
             "Payment time": "2024-03-05 10:00", "Payment Status": "Paid",
             "Payment Gateway ID": "pi_3OqX9aBcDeFgHiJkLmNoPqRs_secret_tail"},
            {"Payment ID": 12, "User Email": "bob@example.com",
             "Payment Amount": "5.00", "Total Credits": 50,
             "Payment time": "2024-03-06 11:30", "Payment Status": "Pending",
             "Payment Gateway ID": "pi_3OqXabBcDeFgHiJkLmNoPqRs_secret_tail"}
        ]
    })
}

pub fn original_page_body(count: u64) -> Value {
    json!({
        "count": count,
        "results": {
            "Original_Image_data": [
                {"user": "ada@example.com", "original_image_id": 101,
                 "original_image_name": "garden.png",
                 "original_image": "https://cdn.livingimage.example/o/101.png",
                 "prompt": "a garden in spring", "created": "2024-03-01",
                 "public": true, "regenerated_at": "2024-03-02",
                 "next_regeneration_at": "2024-03-09"},
                {"user": "bob@example.com", "original_image_id": 102,
                 "original_image_name": "portrait.png",
                 "original_image": "https://cdn.livingimage.example/o/102.png",
                 "prompt": "an oil portrait", "created": "2024-03-03"}
            ]
        }
    })
}

pub fn regenerated_page_body(count: u64) -> Value {
    json!({
        "count": count,
        "results": {
            "Regenerated_Image_data": [
                {"user": "ada@example.com", "regenerated_image_id": 201,
                 "original_image_id": 101, "original_image_name": "garden.png",
                 "regenerated_image": "https://cdn.livingimage.example/r/201.png",
                 "created": "2024-03-01", "regenerated_at": "2024-03-02"}
            ]
        }
    })
}

pub fn one_original_body() -> Value {
    json!({
        "Original_Image_data": {
            "user": "ada@example.com", "original_image_id": 101,
            "original_image_name": "garden.png",
            "original_image": "https://cdn.livingimage.example/o/101.png",
            "prompt": "a garden in spring", "created": "2024-03-01",
            "public": true
        }
    })
}

pub fn one_regenerated_body() -> Value {
    json!({
        "Regenerated_Image_data": {
            "user": "ada@example.com", "regenerated_image_id": 201,
            "original_image_id": 101, "original_image_name": "garden.png",
            "regenerated_image": "https://cdn.livingimage.example/r/201.png",
            "created": "2024-03-01", "regenerated_at": "2024-03-02"
        }
    })
}

pub fn analytics_body() -> Value {
    json!([
        {"Total user": 42, "Total Original Images": 120,
         "Total Regenerated Images": 310, "Total Payments": 7,
         "Total Payment Amount": "199.99", "Total Credit Records": 12,
         "Total Credit Added": 900, "Total Credit Deducted": 410},
        {"Total user": 40, "Total Original Images": 118,
         "Total Regenerated Images": 300, "Total Payments": 6,
         "Total Payment Amount": "170.00", "Total Credit Records": 11,
         "Total Credit Added": 850, "Total Credit Deducted": 400}
    ])
}

pub fn traffic_body() -> Value {
    json!({
        "date": ["2024-03-02", "2024-03-01"],
        "pageViews": [220, 180],
        "users": [30, 25],
        "newUsers": [5, 4],
        "averageSessionDuration": [150.0, 90.0]
    })
}

pub fn unauthorized_body() -> Value {
    json!({"errors": {"detail": "Given token not valid for any token type"}})
}
