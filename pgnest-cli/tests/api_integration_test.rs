use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;

fn pgnest_cmd(server: &mockito::Server, dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pgnest").unwrap();
    cmd.env_remove("PGNEST_API_URL")
        .env_remove("PGNEST_API_KEY")
        .arg("-d")
        .arg(dir.path())
        .arg("-u")
        .arg(server.url())
        .arg("-k")
        .arg("test-key");
    cmd
}

fn sample_property() -> serde_json::Value {
    json!({
        "id": "prop-1",
        "owner_id": "owner-1",
        "title": "Lotus Girls PG",
        "description": "Near campus",
        "property_type": "pg",
        "gender": "girls",
        "location": {
            "address": "14 1st Main",
            "area": "Koramangala",
            "city": "Bengaluru",
            "pincode": "560034"
        },
        "rent": 7000,
        "deposit": 14000,
        "amenities": ["wifi"],
        "images": [],
        "available": true,
        "approval_status": "approved",
        "rejection_reason": null,
        "created_at": "2026-01-05T10:00:00Z",
        "updated_at": "2026-01-05T10:00:00Z"
    })
}

#[tokio::test]
async fn test_properties_search_sends_filters() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("GET", "/api/v1/properties")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("city".into(), "Bengaluru".into()),
            Matcher::UrlEncoded("max_rent".into(), "8000".into()),
            Matcher::UrlEncoded("gender".into(), "girls".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "properties": [sample_property()],
                "total": 1,
                "page": 1,
                "per_page": 20
            })
            .to_string(),
        )
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["properties", "search", "--city", "Bengaluru", "--max-rent", "8000"])
        .args(["--gender", "girls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lotus Girls PG"))
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[tokio::test]
async fn test_me_sends_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("GET", "/api/v1/me")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "user-1",
                "external_id": "asha",
                "email": "asha@example.com",
                "name": "Asha",
                "phone": null,
                "role": "student",
                "blacklisted": false,
                "blacklist_reason": null,
                "blacklisted_at": null,
                "created_at": "2026-01-05T10:00:00Z",
                "updated_at": "2026-01-05T10:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .arg("me")
        .assert()
        .success()
        .stdout(predicate::str::contains("asha@example.com"));
}

#[tokio::test]
async fn test_booking_create_posts_body() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("POST", "/api/v1/bookings")
        .match_body(Matcher::PartialJson(json!({
            "property_id": "prop-1",
            "move_in": "2026-12-01",
            "duration_months": 6
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "booking-1",
                "property_id": "prop-1",
                "student_id": "user-1",
                "owner_id": "owner-1",
                "move_in": "2026-12-01",
                "duration_months": 6,
                "message": null,
                "status": "pending",
                "created_at": "2026-10-16T10:00:00Z",
                "updated_at": "2026-10-16T10:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["bookings", "create", "prop-1", "--move-in", "2026-12-01", "--months", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("booking-1"))
        .stdout(predicate::str::contains("pending"));
}

#[tokio::test]
async fn test_admin_blacklist() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("POST", "/api/v1/admin/users/user-2/blacklist")
        .match_body(Matcher::Json(json!({"reason": "spam"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "user-2",
                "external_id": "ravi",
                "email": "ravi@example.com",
                "name": "Ravi",
                "phone": null,
                "role": "student",
                "blacklisted": true,
                "blacklist_reason": "spam",
                "blacklisted_at": "2026-10-16T10:00:00Z",
                "created_at": "2026-01-05T10:00:00Z",
                "updated_at": "2026-10-16T10:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["admin", "blacklist", "user-2", "--reason", "spam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"blacklisted\": true"));
}

#[tokio::test]
async fn test_admin_review_property_reject() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let mut rejected = sample_property();
    rejected["approval_status"] = json!("rejected");
    rejected["rejection_reason"] = json!("Blurry photos");

    let _m = server
        .mock("POST", "/api/v1/admin/properties/prop-1/review")
        .match_body(Matcher::Json(
            json!({"decision": "reject", "reason": "Blurry photos"}),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rejected.to_string())
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["admin", "review-property", "prop-1", "--reject", "--reason", "Blurry photos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blurry photos"));
}

#[tokio::test]
async fn test_error_handling() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("GET", "/api/v1/properties/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": "Not found: properties missing"}).to_string())
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["properties", "get", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("API error: 404"))
        .stderr(predicate::str::contains("Not found: properties missing"));
}

#[tokio::test]
async fn test_chat_prints_reply() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();

    let _m = server
        .mock("POST", "/api/v1/chat")
        .match_body(Matcher::Json(json!({"message": "pg in hsr under 9k"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "reply": "No PGs in HSR Layout, Bengaluru under ₹9,000 right now.",
                "filters": {
                    "city": "Bengaluru",
                    "area": "HSR Layout",
                    "min_rent": null,
                    "max_rent": 9000,
                    "gender": null,
                    "property_type": "pg",
                    "amenities": []
                },
                "properties": [],
                "total": 0
            })
            .to_string(),
        )
        .create_async()
        .await;

    pgnest_cmd(&server, &dir)
        .args(["chat", "pg in hsr under 9k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HSR Layout"));
}
