mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_booking_draws_down_inventory() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;

    let (status, body) = app.book(&customer, &event_id, &[("VIP", 2)]).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Booking created successfully");

    let booking = &body["booking"];
    assert_eq!(booking["totalAmount"], 200.0);
    assert_eq!(booking["discountPercent"], 0.0);
    assert_eq!(booking["finalPrice"], 200.0);
    assert_eq!(booking["totalQuantityBooked"], 2);
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["bookedTickets"][0]["ticketTypeName"], "VIP");
    assert_eq!(booking["bookedTickets"][0]["quantity"], 2);
    assert_eq!(booking["customer"]["userId"], customer.id.as_str());
    assert_eq!(booking["event"]["eventId"], event_id.as_str());
    assert_eq!(booking["event"]["title"], "Summer Concert");

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketTypes"][0]["quantity"], 3);
    assert_eq!(event["ticketTypes"][1]["quantity"], 50);
    assert_eq!(event["ticketsAvailable"], 53);
    assert_eq!(event["ticketsSold"], 2);
    assert_eq!(event["totalTickets"], 55);
}

#[tokio::test]
async fn test_booking_with_discount_and_multiple_lines() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;

    let (status, body) = app.send("POST", "/api/v1/bookings", Some(&customer.token), Some(json!({
        "eventId": event_id,
        "tickets": [
            {"ticketTypeName": "VIP", "ticketQuantity": 1},
            {"ticketTypeName": "GA", "ticketQuantity": 5}
        ],
        "discountPercent": 25
    }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["totalAmount"], 200.0);
    assert_eq!(body["booking"]["finalPrice"], 150.0);
    assert_eq!(body["booking"]["totalQuantityBooked"], 6);

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketsSold"], 6);
    assert_eq!(event["ticketsAvailable"], 49);
}

#[tokio::test]
async fn test_insufficient_inventory_leaves_event_untouched() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;

    let (status, body) = app.book(&customer, &event_id, &[("GA", 3), ("VIP", 6)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Not enough tickets available for type 'VIP'. Only 5 left.");

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketsAvailable"], 55);
    assert_eq!(event["ticketsSold"], 0);
    assert_eq!(event["version"], 0);

    let (_, body) = app.send("GET", "/api/v1/users/bookings", Some(&customer.token), None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_booking_request_validation() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5)]).await;

    let (status, body) = app.send("POST", "/api/v1/bookings", Some(&customer.token), Some(json!({
        "eventId": event_id, "tickets": []
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event ID and non-empty array ticket are required.");

    let (status, _) = app.book(&customer, &event_id, &[("VIP", 0)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.book(&customer, &event_id, &[("Balcony", 1)]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ticket type 'Balcony' not found for this event.");

    let (status, body) = app.book(&customer, "not-a-uuid", &[("VIP", 1)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid event ID format.");

    let (status, body) = app.book(&customer, &uuid::Uuid::new_v4().to_string(), &[("VIP", 1)]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found.");

    let (status, _) = app.send("POST", "/api/v1/bookings", Some(&customer.token), Some(json!({
        "eventId": event_id,
        "tickets": [{"ticketTypeName": "VIP", "ticketQuantity": 1}],
        "discountPercent": 150
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.book(&organizer, &event_id, &[("VIP", 1)]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketsAvailable"], 5);
}

#[tokio::test]
async fn test_booking_is_visible_only_to_its_owner() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let owner = app.register("owner@example.com", "user").await;
    let stranger = app.register("stranger@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5)]).await;

    let (_, body) = app.book(&owner, &event_id, &[("VIP", 1)]).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/bookings/{}", booking_id);

    let (status, body) = app.send("GET", &path, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["id"], booking_id.as_str());
    assert_eq!(body["booking"]["finalPrice"], 100.0);

    let (status, body) = app.send("GET", &path, Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to view this booking.");

    let (status, body) = app.send("DELETE", &path, Some(&stranger.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not authorized to delete this booking.");

    let (status, _) = app.send("GET", "/api/v1/bookings/not-a-uuid", Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("GET", &format!("/api/v1/bookings/{}", uuid::Uuid::new_v4()), Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_restores_inventory() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;

    let (_, body) = app.book(&customer, &event_id, &[("VIP", 2), ("GA", 4)]).await;
    let path = format!("/api/v1/bookings/{}", body["booking"]["id"].as_str().unwrap());

    let (status, body) = app.send("DELETE", &path, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking deleted successfully and tickets restored.");
    assert_eq!(body["unrestoredTickets"], json!([]));

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketTypes"][0]["quantity"], 5);
    assert_eq!(event["ticketTypes"][1]["quantity"], 50);
    assert_eq!(event["ticketsAvailable"], 55);
    assert_eq!(event["ticketsSold"], 0);

    let (status, body) = app.send("DELETE", &path, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found.");
}

#[tokio::test]
async fn test_cancel_reports_ticket_types_removed_from_event() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5), ("GA", 20.0, 50)]).await;

    let (_, body) = app.book(&customer, &event_id, &[("VIP", 2), ("GA", 1)]).await;
    let path = format!("/api/v1/bookings/{}", body["booking"]["id"].as_str().unwrap());

    let (status, _) = app.send("PUT", &format!("/api/v1/events/{}", event_id), Some(&organizer.token), Some(json!({
        "ticketTypes": [{"name": "GA", "price": 20.0, "quantity": 49}]
    }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("DELETE", &path, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unrestoredTickets"], json!([{"ticketTypeName": "VIP", "quantity": 2}]));

    let event = app.event(&event_id).await;
    assert_eq!(event["ticketTypes"][0]["quantity"], 50);
    assert_eq!(event["ticketsAvailable"], 50);
    assert_eq!(event["ticketsSold"], 0);
}

#[tokio::test]
async fn test_cancel_after_event_deleted_keeps_booking() {
    let app = TestApp::new().await;
    let organizer = app.register("host@example.com", "organizer").await;
    let customer = app.register("fan@example.com", "user").await;
    let event_id = app.create_event(&organizer, &[("VIP", 100.0, 5)]).await;

    let (_, body) = app.book(&customer, &event_id, &[("VIP", 1)]).await;
    let path = format!("/api/v1/bookings/{}", body["booking"]["id"].as_str().unwrap());

    let (status, _) = app.send("DELETE", &format!("/api/v1/events/{}", event_id), Some(&organizer.token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send("DELETE", &path, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Associated event not found.");

    let (status, body) = app.send("GET", &path, Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["event"]["title"], "Summer Concert");
}
