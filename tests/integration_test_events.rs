mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_create_event_counts_tickets_and_snapshots_organizer() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;

    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;
    let event = app.event(&event_id).await;

    assert_eq!(event["ticketsAvailable"], 55);
    assert_eq!(event["ticketsSold"], 0);
    assert_eq!(event["totalTickets"], 55);
    assert_eq!(event["status"], "pending");
    assert_eq!(event["version"], 0);
    assert_eq!(event["organizer"]["userId"], organizer.id.as_str());
    assert_eq!(event["organizer"]["fullName"], "Test organizer");
    assert_eq!(event["location"]["city"], "Lisbon");
}

#[tokio::test]
async fn test_create_event_requires_organizer_and_valid_fields() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;

    let valid = json!({
        "title": "Gig",
        "eventDate": (Utc::now() + Duration::days(3)).to_rfc3339(),
        "location": {"venue": "Club", "city": "Porto", "country": "PT"},
        "category": "music",
        "ticketTypes": [{"name": "GA", "price": 10.0, "quantity": 5}]
    });

    let (status, _) = app.send("POST", "/api/v1/events", Some(&customer.token), Some(valid.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut missing_title = valid.clone();
    missing_title["title"] = json!("");
    let (status, _) = app.send("POST", "/api/v1/events", Some(&organizer.token), Some(missing_title)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut duplicate_types = valid.clone();
    duplicate_types["ticketTypes"] = json!([
        {"name": "GA", "price": 10.0, "quantity": 5},
        {"name": "GA", "price": 12.0, "quantity": 5}
    ]);
    let (status, _) = app.send("POST", "/api/v1/events", Some(&organizer.token), Some(duplicate_types)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut negative_price = valid.clone();
    negative_price["ticketTypes"] = json!([{"name": "GA", "price": -1.0, "quantity": 5}]);
    let (status, _) = app.send("POST", "/api/v1/events", Some(&organizer.token), Some(negative_price)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/v1/events", Some(&organizer.token), Some(valid)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_public_listing_shows_only_approved_upcoming_events() {
    let app = TestApp::new().await;
    let admin = app.seed_admin().await;
    let organizer = app.register("host@example.com", "organizer").await;

    let approved = app.create_event(&organizer, &[("GA", 10.0, 10)]).await;
    let _pending = app.create_event(&organizer, &[("GA", 10.0, 10)]).await;
    let past = app.create_event(&organizer, &[("GA", 10.0, 10)]).await;

    for id in [&approved, &past] {
        let (status, _) = app.send("PUT", &format!("/api/v1/events/{}", id), Some(&admin.token), Some(json!({"status": "approved"}))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = app.send("PUT", &format!("/api/v1/events/{}", past), Some(&admin.token), Some(json!({
        "eventDate": (Utc::now() - Duration::days(2)).to_rfc3339()
    }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("GET", "/api/v1/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["events"][0]["id"], approved.as_str());

    let (_, body) = app.send("GET", "/api/v1/events?showPast=true", None, None).await;
    assert_eq!(body["pagination"]["total"], 2);
    // soonest first
    assert_eq!(body["events"][0]["id"], past.as_str());
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["pages"], 1);

    let (status, body) = app.send("GET", "/api/v1/events/all", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 3);

    let (status, _) = app.send("GET", "/api/v1/events/all", Some(&organizer.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_event_errors() {
    let app = TestApp::new().await;

    let (status, _) = app.send("GET", "/api/v1/events/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", &format!("/api/v1/events/{}", uuid::Uuid::new_v4()), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_event_permissions() {
    let app = TestApp::new().await;
    let owner = app.register("owner@example.com", "organizer").await;
    let rival = app.register("rival@example.com", "organizer").await;
    let event_id = app.create_event(&owner, &[("GA", 10.0, 10)]).await;
    let path = format!("/api/v1/events/{}", event_id);

    let (status, _) = app.send("PUT", &path, Some(&rival.token), Some(json!({"title": "Hijacked"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("PUT", &path, Some(&owner.token), Some(json!({"status": "approved"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("PUT", &path, Some(&owner.token), Some(json!({"title": "Renamed"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["version"], 1);

    let (status, _) = app.send("DELETE", &path, Some(&rival.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_replacing_ticket_types_keeps_sold_count() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5)]).await;

    let (status, _) = app.book(&customer, &event_id, &[("VIP", 2)]).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send("PUT", &format!("/api/v1/events/{}", event_id), Some(&organizer.token), Some(json!({
        "ticketTypes": [{"name": "VIP", "price": 120.0, "quantity": 3}, {"name": "GA", "price": 30.0, "quantity": 40}]
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticketsAvailable"], 43);
    assert_eq!(body["ticketsSold"], 2);
    assert_eq!(body["totalTickets"], 45);
}

#[tokio::test]
async fn test_delete_event() {
    let app = TestApp::new().await;
    let admin = app.seed_admin().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let mine = app.create_event(&organizer, &[("GA", 10.0, 10)]).await;
    let other = app.create_event(&organizer, &[("GA", 10.0, 10)]).await;

    let (status, body) = app.send("DELETE", &format!("/api/v1/events/{}", mine), Some(&organizer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, _) = app.send("DELETE", &format!("/api/v1/events/{}", other), Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send("GET", &format!("/api/v1/events/{}", mine), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
