use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use pgnest_http::handlers::test_helpers::{
    ADMIN_KEY, OTHER_STUDENT_KEY, OWNER_KEY, STUDENT_KEY, create_test_app, create_test_state,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    key: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn property_body(title: &str, area: &str, rent: u32) -> Value {
    json!({
        "title": title,
        "description": "Walking distance to college, home cooked meals",
        "property_type": "pg",
        "gender": "girls",
        "location": {
            "address": "14 1st Main",
            "area": area,
            "city": "Bengaluru",
            "pincode": "560034"
        },
        "rent": rent,
        "deposit": rent * 2,
        "amenities": ["wifi", "meals"],
        "images": ["https://img.example.com/1.jpg"]
    })
}

fn move_in() -> String {
    (Utc::now().date_naive() + Duration::days(14)).to_string()
}

/// Owner lists a property and an admin approves it.
async fn approved_property(app: &Router, title: &str, area: &str, rent: u32) -> String {
    let (status, created) = send(
        app,
        "POST",
        "/api/v1/properties",
        Some(OWNER_KEY),
        Some(property_body(title, area, rent)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        app,
        "POST",
        &format!("/api/v1/admin/properties/{}/review", id),
        Some(ADMIN_KEY),
        Some(json!({"decision": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_health_and_docs_are_public() {
    let app = create_test_app(create_test_state());

    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/properties"].is_object());
    assert!(doc["paths"]["/owner/drafts/{draft_id}/steps/{step}"].is_object());
}

#[tokio::test]
async fn test_authentication_required() {
    let app = create_test_app(create_test_state());

    let (status, body) = send(&app, "GET", "/api/v1/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/v1/me", Some("nobody-key"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = send(&app, "GET", "/api/v1/me", Some(STUDENT_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "asha@example.com");
    assert_eq!(me["role"], "student");

    let (status, me) = send(&app, "GET", "/api/v1/me", Some(ADMIN_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let app = create_test_app(create_test_state());
    let request = Request::builder()
        .uri("/api/v1/me")
        .header("Authorization", format!("Bearer {}", OWNER_KEY))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_listing_lifecycle() {
    let app = create_test_app(create_test_state());

    // students cannot list
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/properties",
        Some(STUDENT_KEY),
        Some(property_body("Nope", "Koramangala", 7000)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/properties",
        Some(OWNER_KEY),
        Some(property_body("Lotus Girls PG", "Koramangala", 7000)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["approval_status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/properties/{}", id);

    // hidden until approved
    let (_, search) = send(&app, "GET", "/api/v1/properties", None, None).await;
    assert_eq!(search["total"], 0);
    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &uri, Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, queue) = send(
        &app,
        "GET",
        "/api/v1/admin/properties?status=pending",
        Some(ADMIN_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["properties"].as_array().unwrap().len(), 1);

    // rejection needs a reason
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/admin/properties/{}/review", id),
        Some(ADMIN_KEY),
        Some(json!({"decision": "reject", "reason": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, approved) = send(
        &app,
        "POST",
        &format!("/api/v1/admin/properties/{}/review", id),
        Some(ADMIN_KEY),
        Some(json!({"decision": "approve"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["approval_status"], "approved");

    let (status, search) = send(
        &app,
        "GET",
        "/api/v1/properties?city=bengaluru&max_rent=8000&amenities=wifi",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(search["total"], 1);
    assert_eq!(search["properties"][0]["title"], "Lotus Girls PG");

    // a rent change sends it back for review
    let (status, edited) = send(
        &app,
        "PUT",
        &uri,
        Some(OWNER_KEY),
        Some(json!({"rent": 7500})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["approval_status"], "pending");

    // other users cannot edit or delete
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(STUDENT_KEY),
        Some(json!({"available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_rejects_inverted_rent_range() {
    let app = create_test_app(create_test_state());
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/properties?min_rent=9000&max_rent=5000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("min_rent"));
}

#[tokio::test]
async fn test_malformed_input_is_json_bad_request() {
    let app = create_test_app(create_test_state());

    let mut listing = property_body("Castle PG", "Koramangala", 9000);
    listing["property_type"] = json!("castle");
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/properties",
        Some(OWNER_KEY),
        Some(listing),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("castle"));

    let (status, body) = send(&app, "GET", "/api/v1/properties?gender=aliens", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("aliens"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(STUDENT_KEY),
        Some(json!({"property_id": "p1", "move_in": "next week"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_booking_flow() {
    let app = create_test_app(create_test_state());
    let property_id = approved_property(&app, "Lotus Girls PG", "Koramangala", 7000).await;

    let booking = json!({
        "property_id": property_id,
        "move_in": move_in(),
        "duration_months": 6,
        "message": "Can I visit on Saturday?"
    });

    // owners do not book
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(OWNER_KEY),
        Some(booking.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(STUDENT_KEY),
        Some(booking.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    let booking_id = created["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/v1/bookings/{}/status", booking_id);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(STUDENT_KEY),
        Some(booking),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, owner_view) = send(&app, "GET", "/api/v1/owner/bookings", Some(OWNER_KEY), None).await;
    assert_eq!(owner_view["bookings"].as_array().unwrap().len(), 1);

    // a stranger cannot touch it
    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(OTHER_STUDENT_KEY),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // students cannot confirm their own booking
    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(STUDENT_KEY),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, confirmed) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(OWNER_KEY),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(OWNER_KEY),
        Some(json!({"status": "pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, cancelled) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(STUDENT_KEY),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (_, mine) = send(&app, "GET", "/api/v1/bookings", Some(STUDENT_KEY), None).await;
    assert_eq!(mine["bookings"][0]["status"], "cancelled");
}

#[tokio::test]
async fn test_booking_past_move_in_rejected() {
    let app = create_test_app(create_test_state());
    let property_id = approved_property(&app, "Lotus Girls PG", "Koramangala", 7000).await;
    let yesterday = (Utc::now().date_naive() - Duration::days(1)).to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/bookings",
        Some(STUDENT_KEY),
        Some(json!({
            "property_id": property_id,
            "move_in": yesterday,
            "duration_months": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("move_in"));
}

#[tokio::test]
async fn test_promotion_flow() {
    let app = create_test_app(create_test_state());

    let request = json!({
        "business_name": "Asha Stays",
        "phone": "9876543210",
        "message": "I manage two flats near campus"
    });
    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/promotion-requests",
        Some(STUDENT_KEY),
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    let request_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/promotion-requests",
        Some(STUDENT_KEY),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, queue) = send(
        &app,
        "GET",
        "/api/v1/admin/promotion-requests?status=pending",
        Some(ADMIN_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["requests"].as_array().unwrap().len(), 1);

    let review_uri = format!("/api/v1/admin/promotion-requests/{}/review", request_id);
    let (status, reviewed) = send(
        &app,
        "POST",
        &review_uri,
        Some(ADMIN_KEY),
        Some(json!({"approve": true, "note": "Verified by phone"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "approved");
    assert_eq!(reviewed["review_note"], "Verified by phone");

    let (_, me) = send(&app, "GET", "/api/v1/me", Some(STUDENT_KEY), None).await;
    assert_eq!(me["role"], "owner");

    let (status, _) = send(
        &app,
        "POST",
        &review_uri,
        Some(ADMIN_KEY),
        Some(json!({"approve": false})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = send(
        &app,
        "GET",
        "/api/v1/promotion-requests/mine",
        Some(STUDENT_KEY),
        None,
    )
    .await;
    assert_eq!(mine["requests"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_blacklist_blocks_private_routes() {
    let state = create_test_state();
    let app = create_test_app(state.clone());

    let (_, ravi) = send(&app, "GET", "/api/v1/me", Some(OTHER_STUDENT_KEY), None).await;
    let ravi_id = ravi["id"].as_str().unwrap().to_string();
    let blacklist_uri = format!("/api/v1/admin/users/{}/blacklist", ravi_id);

    let (status, _) = send(
        &app,
        "POST",
        &blacklist_uri,
        Some(ADMIN_KEY),
        Some(json!({"reason": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, banned) = send(
        &app,
        "POST",
        &blacklist_uri,
        Some(ADMIN_KEY),
        Some(json!({"reason": "Fake listings reported"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banned["blacklisted"], true);

    let (status, body) = send(&app, "GET", "/api/v1/me", Some(OTHER_STUDENT_KEY), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("blacklisted"));

    // public browsing still works
    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/properties",
        Some(OTHER_STUDENT_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, logs) = send(
        &app,
        "GET",
        "/api/v1/admin/audit-logs?action=user_blacklisted",
        Some(ADMIN_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["logs"][0]["target_id"], ravi_id.as_str());
    assert_eq!(logs["logs"][0]["details"], "Fake listings reported");

    let (status, _) = send(&app, "DELETE", &blacklist_uri, Some(ADMIN_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/api/v1/me", Some(OTHER_STUDENT_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_need_admin() {
    let app = create_test_app(create_test_state());
    for uri in [
        "/api/v1/admin/users",
        "/api/v1/admin/properties",
        "/api/v1/admin/bookings",
        "/api/v1/admin/promotion-requests",
        "/api/v1/admin/audit-logs",
        "/api/v1/admin/stats",
    ] {
        let (status, _) = send(&app, "GET", uri, Some(OWNER_KEY), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
    }
}

#[tokio::test]
async fn test_admin_role_change_and_stats() {
    let app = create_test_app(create_test_state());
    approved_property(&app, "Lotus Girls PG", "Koramangala", 7000).await;

    let (_, asha) = send(&app, "GET", "/api/v1/me", Some(STUDENT_KEY), None).await;
    let asha_id = asha["id"].as_str().unwrap();

    let (status, changed) = send(
        &app,
        "PATCH",
        &format!("/api/v1/admin/users/{}/role", asha_id),
        Some(ADMIN_KEY),
        Some(json!({"role": "owner"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(changed["role"], "owner");

    let (status, owners) = send(
        &app,
        "GET",
        "/api/v1/admin/users?role=owner",
        Some(ADMIN_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(owners["users"].as_array().unwrap().len(), 2);

    let (status, stats) = send(&app, "GET", "/api/v1/admin/stats", Some(ADMIN_KEY), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["owners"], 2);
    assert_eq!(stats["admins"], 1);
    assert_eq!(stats["properties_approved"], 1);
}

#[tokio::test]
async fn test_listing_wizard() {
    let app = create_test_app(create_test_state());

    let (status, draft) = send(&app, "POST", "/api/v1/owner/drafts", Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(draft["current"], "basics");
    let base = format!("/api/v1/owner/drafts/{}", draft["id"].as_str().unwrap());

    // skipping ahead is refused
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{}/steps/pricing", base),
        Some(OWNER_KEY),
        Some(json!({"rent": 6500})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("{}/steps/nonsense", base),
        Some(OWNER_KEY),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let steps = [
        (
            "basics",
            json!({
                "title": "Maple Boys Hostel",
                "description": "Quiet rooms near the metro",
                "property_type": "hostel",
                "gender": "boys"
            }),
            "location",
        ),
        (
            "location",
            json!({
                "address": "3 MG Road",
                "area": "Indiranagar",
                "city": "Bengaluru",
                "pincode": "560038"
            }),
            "pricing",
        ),
        ("pricing", json!({"rent": 6500, "deposit": 13000}), "amenities"),
        ("amenities", json!({"amenities": ["wifi", "laundry"]}), "photos"),
        (
            "photos",
            json!({"images": ["https://img.example.com/maple.jpg"]}),
            "review",
        ),
    ];
    for (step, body, next) in steps {
        let (status, draft) = send(
            &app,
            "PUT",
            &format!("{}/steps/{}", base, step),
            Some(OWNER_KEY),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "step {}", step);
        assert_eq!(draft["current"], next);
    }

    let (status, draft) = send(
        &app,
        "POST",
        &format!("{}/back", base),
        Some(OWNER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["current"], "photos");

    let (status, _) = send(&app, "POST", &format!("{}/finish", base), Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(
        &app,
        "PUT",
        &format!("{}/steps/photos", base),
        Some(OWNER_KEY),
        Some(json!({"images": ["https://img.example.com/maple.jpg"]})),
    )
    .await;

    let (status, property) =
        send(&app, "POST", &format!("{}/finish", base), Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(property["title"], "Maple Boys Hostel");
    assert_eq!(property["rent"], 6500);
    assert_eq!(property["approval_status"], "pending");

    let (status, _) = send(&app, "GET", &base, Some(OWNER_KEY), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, mine) = send(&app, "GET", "/api/v1/owner/properties", Some(OWNER_KEY), None).await;
    assert_eq!(mine["properties"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wizard_is_for_owners() {
    let app = create_test_app(create_test_state());
    let (status, _) = send(&app, "POST", "/api/v1/owner/drafts", Some(STUDENT_KEY), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_chat_search() {
    let app = create_test_app(create_test_state());
    approved_property(&app, "Lotus Girls PG", "Koramangala", 7000).await;
    approved_property(&app, "Rose Residency", "Koramangala", 11000).await;

    let (status, reply) = send(
        &app,
        "POST",
        "/api/v1/chat",
        None,
        Some(json!({"message": "girls pg in koramangala under 8k with wifi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["total"], 1);
    assert_eq!(reply["filters"]["max_rent"], 8000);
    assert_eq!(reply["filters"]["area"], "Koramangala");
    assert_eq!(reply["properties"][0]["title"], "Lotus Girls PG");
    assert!(reply["reply"].as_str().unwrap().starts_with("Found 1 match"));

    let (status, reply) = send(
        &app,
        "POST",
        "/api/v1/chat",
        None,
        Some(json!({"message": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reply["reply"].as_str().unwrap().starts_with("Hi!"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/chat",
        None,
        Some(json!({"message": "x".repeat(501)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
