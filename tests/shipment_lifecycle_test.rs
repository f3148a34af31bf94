//! End-to-end tests for the shipment lifecycle:
//! booking, scan-driven status transitions, the projected timeline,
//! the public tracking endpoint, and deletion.

mod common;

use axum::http::{Method, StatusCode};
use common::{response_json, TestApp};
use serde_json::{json, Value};

fn booking_payload() -> Value {
    json!({
        "sender_name": "Ada Martin",
        "sender_phone": "+1-212-555-0142",
        "sender_address": "1 Liberty Plaza",
        "sender_city": "New York",
        "sender_state": "NY",
        "receiver_name": "John Doe",
        "receiver_phone": "+1-310-555-0175",
        "receiver_address": "600 Sunset Blvd",
        "receiver_city": "Los Angeles",
        "receiver_state": "CA",
        "package_description": "Books",
        "weight_kg": 2.5,
        "dimensions_cm": "30x20x10",
        "declared_value": "120",
        "service_level": "express",
        "transport_mode": "road"
    })
}

async fn book_shipment(app: &TestApp) -> (String, String) {
    let response = app
        .request_as_staff(Method::POST, "/api/v1/shipments", Some(booking_payload()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let id = body["data"]["id"].as_str().expect("shipment id").to_string();
    let tracking_number = body["data"]["tracking_number"]
        .as_str()
        .expect("tracking number")
        .to_string();
    (id, tracking_number)
}

async fn advance(app: &TestApp, id: &str, status: &str, location: Option<&str>) -> StatusCode {
    let mut payload = json!({ "status": status });
    if let Some(location) = location {
        payload["location"] = json!(location);
    }
    app.request_as_staff(
        Method::POST,
        &format!("/api/v1/shipments/{id}/status"),
        Some(payload),
    )
    .await
    .status()
}

#[tokio::test]
async fn booking_creates_shipment_with_initial_event() {
    let app = TestApp::new().await;
    let (id, tracking_number) = book_shipment(&app).await;

    assert!(tracking_number.starts_with("SS"));

    let response = app
        .request_as_staff(Method::GET, &format!("/api/v1/shipments/{id}/timeline"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["data"]["shipment"]["status"], "created");
    assert_eq!(body["data"]["progress_percent"], 10);
    let timeline = body["data"]["timeline"].as_array().expect("timeline");
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["status"], "created");
    assert_eq!(timeline[0]["is_current"], true);
}

#[tokio::test]
async fn booking_applies_express_pricing() {
    let app = TestApp::new().await;
    let response = app
        .request_as_staff(Method::POST, "/api/v1/shipments", Some(booking_payload()))
        .await;
    let body = response_json(response).await;

    // base 15, weight 2.5 * 5 = 12.5, express surcharge (15 + 12.5) * 0.5
    // = 13.75, insurance 120 * 0.02 = 2.4 => 43.65 total
    assert_eq!(body["data"]["total_amount"], "43.65");
}

// Scenario A: created -> in_transit with a location; timeline has two
// events, the current one is in_transit at Phoenix, progress is 50.
#[tokio::test]
async fn transition_to_in_transit_updates_timeline_and_progress() {
    let app = TestApp::new().await;
    let (id, tracking_number) = book_shipment(&app).await;

    assert_eq!(
        advance(&app, &id, "in_transit", Some("Phoenix, AZ")).await,
        StatusCode::OK
    );

    let response = app
        .request(Method::GET, &format!("/api/v1/track/{tracking_number}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;

    assert_eq!(body["data"]["shipment"]["status"], "in_transit");
    assert_eq!(body["data"]["progress_percent"], 50);

    let timeline = body["data"]["timeline"].as_array().expect("timeline");
    assert_eq!(timeline.len(), 2);
    let current: Vec<&Value> = timeline
        .iter()
        .filter(|entry| entry["is_current"] == true)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["status"], "in_transit");
    assert_eq!(current[0]["location"], "Phoenix, AZ");
    // Earlier milestones read as completed.
    assert_eq!(timeline[0]["is_completed"], true);
}

// Scenario B: an illegal backward transition is rejected, names both
// statuses, and leaves the store untouched.
#[tokio::test]
async fn backward_transition_is_rejected_and_store_unchanged() {
    let app = TestApp::new().await;
    let (id, _) = book_shipment(&app).await;

    assert_eq!(
        advance(&app, &id, "out_for_delivery", None).await,
        StatusCode::OK
    );

    let response = app
        .request_as_staff(
            Method::POST,
            &format!("/api/v1/shipments/{id}/status"),
            Some(json!({ "status": "created" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    let message = body["message"].as_str().expect("message");
    assert!(message.contains("out_for_delivery"));
    assert!(message.contains("created"));

    let timeline_body = response_json(
        app.request_as_staff(Method::GET, &format!("/api/v1/shipments/{id}/timeline"), None)
            .await,
    )
    .await;
    assert_eq!(timeline_body["data"]["shipment"]["status"], "out_for_delivery");
    assert_eq!(
        timeline_body["data"]["timeline"].as_array().unwrap().len(),
        2
    );
}

// Scenario C: a transition to exception without a location is accepted and
// the description falls back to the status label.
#[tokio::test]
async fn exception_without_location_gets_the_default_description() {
    let app = TestApp::new().await;
    let (id, _) = book_shipment(&app).await;

    assert_eq!(advance(&app, &id, "in_transit", None).await, StatusCode::OK);
    assert_eq!(advance(&app, &id, "exception", None).await, StatusCode::OK);

    let body = response_json(
        app.request_as_staff(Method::GET, &format!("/api/v1/shipments/{id}/timeline"), None)
            .await,
    )
    .await;

    let timeline = body["data"]["timeline"].as_array().expect("timeline");
    let current = timeline
        .iter()
        .find(|entry| entry["is_current"] == true)
        .expect("current event");
    assert_eq!(current["status"], "exception");
    assert_eq!(current["description"], "Exception");
    // Exceptions carry no defined progress.
    assert_eq!(body["data"]["progress_percent"], Value::Null);
}

// A recovered shipment can resume the forward sequence.
#[tokio::test]
async fn exception_recovery_resumes_forward_progress() {
    let app = TestApp::new().await;
    let (id, _) = book_shipment(&app).await;

    assert_eq!(advance(&app, &id, "in_transit", None).await, StatusCode::OK);
    assert_eq!(advance(&app, &id, "exception", None).await, StatusCode::OK);
    assert_eq!(
        advance(&app, &id, "out_for_delivery", None).await,
        StatusCode::OK
    );
}

// P4/P5: delivery advances the status, appends exactly one event and
// stamps delivered_at.
#[tokio::test]
async fn delivery_sets_delivered_at_and_appends_one_event() {
    let app = TestApp::new().await;
    let (id, _) = book_shipment(&app).await;

    assert_eq!(advance(&app, &id, "in_transit", None).await, StatusCode::OK);
    assert_eq!(
        advance(&app, &id, "delivered", Some("Los Angeles, CA")).await,
        StatusCode::OK
    );

    let body = response_json(
        app.request_as_staff(Method::GET, &format!("/api/v1/shipments/{id}"), None)
            .await,
    )
    .await;
    assert_eq!(body["data"]["status"], "delivered");
    let delivered_at = body["data"]["delivered_at"].as_str().expect("delivered_at");
    let created_at = body["data"]["created_at"].as_str().expect("created_at");
    assert!(delivered_at >= created_at);

    let timeline_body = response_json(
        app.request_as_staff(Method::GET, &format!("/api/v1/shipments/{id}/timeline"), None)
            .await,
    )
    .await;
    let timeline = timeline_body["data"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 3);
    // A delivered latest entry is both current and completed.
    assert_eq!(timeline[2]["is_current"], true);
    assert_eq!(timeline[2]["is_completed"], true);

    // Delivered is terminal.
    assert_eq!(
        advance(&app, &id, "returned", None).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn scan_flow_records_a_transition_by_tracking_number() {
    let app = TestApp::new().await;
    let (_, tracking_number) = book_shipment(&app).await;

    let response = app
        .request_as_staff(
            Method::POST,
            "/api/v1/scan",
            Some(json!({
                "tracking_number": tracking_number,
                "status": "received_at_origin",
                "location": "New York, NY",
                "notes": "inbound dock 3"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["shipment"]["status"], "received_at_origin");
    let timeline = body["data"]["timeline"].as_array().unwrap();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[1]["notes"], "inbound dock 3");
}

#[tokio::test]
async fn duplicate_scan_is_rejected_as_a_no_op() {
    let app = TestApp::new().await;
    let (id, _) = book_shipment(&app).await;

    assert_eq!(advance(&app, &id, "in_transit", None).await, StatusCode::OK);
    assert_eq!(
        advance(&app, &id, "in_transit", None).await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn public_tracking_rejects_short_and_unknown_numbers() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/track/SS1", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::GET, "/api/v1/track/SSZZZZZZZZ", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn road_route_stops_follow_the_forward_sequence() {
    let app = TestApp::new().await;
    let (id, tracking_number) = book_shipment(&app).await;

    assert_eq!(advance(&app, &id, "in_transit", None).await, StatusCode::OK);

    let body = response_json(
        app.request(Method::GET, &format!("/api/v1/track/{tracking_number}"), None)
            .await,
    )
    .await;
    let route = body["data"]["route"].as_array().expect("route stops");
    assert_eq!(route.len(), 2);
    assert_eq!(route[0]["completed"], true, "distribution center reached");
    assert_eq!(route[1]["completed"], false, "regional hub not yet reached");
}

#[tokio::test]
async fn deleting_a_shipment_cascades_to_its_events() {
    let app = TestApp::new().await;
    let (id, tracking_number) = book_shipment(&app).await;

    // Staff may not delete.
    let response = app
        .request_as_staff(Method::DELETE, &format!("/api/v1/shipments/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request_as_admin(Method::DELETE, &format!("/api/v1/shipments/{id}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(Method::GET, &format!("/api/v1/track/{tracking_number}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn staff_routes_require_a_session() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/v1/shipments", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_as_staff(Method::POST, "/api/v1/auth/logout", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request_as_staff(Method::GET, "/api/v1/shipments", None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_breakdown_counts_current_statuses() {
    let app = TestApp::new().await;
    let (first, _) = book_shipment(&app).await;
    let (_second, _) = book_shipment(&app).await;

    assert_eq!(advance(&app, &first, "in_transit", None).await, StatusCode::OK);

    let body = response_json(
        app.request_as_staff(Method::GET, "/api/v1/reports/status-breakdown", None)
            .await,
    )
    .await;
    let breakdown = body["data"].as_array().expect("breakdown");
    let count_for = |status: &str| {
        breakdown
            .iter()
            .find(|row| row["status"] == status)
            .and_then(|row| row["count"].as_u64())
            .unwrap_or(0)
    };
    assert_eq!(count_for("created"), 1);
    assert_eq!(count_for("in_transit"), 1);
}
