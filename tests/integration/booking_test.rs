//! Integration tests for the booking lifecycle endpoints.

mod helpers;

use axum::http::StatusCode;
use uuid::Uuid;

fn booking_body(stadium_id: &Uuid, field_id: &Uuid, date: &str, start: &str, end: &str) -> serde_json::Value {
    serde_json::json!({
        "stadium_id": stadium_id,
        "field_id": field_id,
        "booking_date": date,
        "start_time": start,
        "end_time": end,
    })
}

#[tokio::test]
async fn test_create_booking() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-10", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;

    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "Expected 201, got {}: {:?}",
        response.status,
        response.body
    );
    let data = &response.body["data"];
    assert!(
        data["booking_number"]
            .as_str()
            .is_some_and(|n| n.starts_with("BK-20300610-"))
    );
    assert_eq!(data["status"], "pending");
    // Two hours at the base rate of 100,000.
    assert_eq!(data["pricing"]["total_amount"], 200_000);
}

#[tokio::test]
async fn test_double_booking_conflicts() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    let first = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-11", "09:00", "11:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    // Overlapping window on the same field and date.
    let second = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-11", "10:00", "12:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "SLOT_CONFLICT");
}

#[tokio::test]
async fn test_back_to_back_bookings_allowed() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    let first = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-12", "09:00", "11:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    // A booking starting exactly at the previous end does not overlap.
    let second = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-12", "11:00", "13:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_outside_schedule_rejected() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    // The field opens at 08:00.
    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-13", "06:00", "08:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_owner_can_cancel_with_notice() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-14", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let cancelled = app
        .request(
            "POST",
            &format!("/api/bookings/{}/cancel", id),
            Some(serde_json::json!({"reason": "rain"})),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["booking"]["status"], "cancelled");
    // Unpaid booking, no refund.
    assert_eq!(cancelled.body["data"]["refund_amount"], 0);
}

#[tokio::test]
async fn test_other_user_cannot_read_booking() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let owner = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-15", "09:00", "11:00")),
            Some(&owner),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let other = Uuid::new_v4();
    let response = app
        .request("GET", &format!("/api/bookings/{}", id), None, Some(&other), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Staff may read it.
    let staff = app
        .request("GET", &format!("/api/bookings/{}", id), None, Some(&other), Some("staff"))
        .await;
    assert_eq!(staff.status, StatusCode::OK);
}

#[tokio::test]
async fn test_payment_marks_booking_paid() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-16", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let paid = app
        .request(
            "POST",
            &format!("/api/bookings/{}/payments", id),
            Some(serde_json::json!({"amount": 200_000, "method": "card"})),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(paid.status, StatusCode::OK);
    assert_eq!(paid.body["data"]["payment_status"], "paid");
}

#[tokio::test]
async fn test_membership_series_created() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "stadium_id": stadium_id,
                "field_id": field_id,
                "start_date": "2030-06-01",
                "day_of_week": 3,
                "start_time": "19:00",
                "end_time": "21:00",
                "recurrence_pattern": "weekly",
                "total_occurrences": 4,
            })),
            Some(&user),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    assert_eq!(data["occurrences"].as_array().unwrap().len(), 4);
    assert_eq!(data["failures"].as_array().unwrap().len(), 0);
    // All Wednesdays.
    assert_eq!(data["occurrences"][0]["booking_date"], "2030-06-05");
    assert_eq!(data["occurrences"][3]["booking_date"], "2030-06-26");
}

#[tokio::test]
async fn test_reschedule_moves_and_reprices_together() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-18", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created.body["data"]["pricing"]["total_amount"], 200_000);

    // Moving to a three-hour window reprices in the same response.
    let moved = app
        .request(
            "PUT",
            &format!("/api/bookings/{}/schedule", id),
            Some(serde_json::json!({
                "booking_date": "2030-06-19",
                "start_time": "14:00",
                "end_time": "17:00",
            })),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["data"]["booking_date"], "2030-06-19");
    assert_eq!(moved.body["data"]["start_time"], "14:00");
    assert_eq!(moved.body["data"]["pricing"]["total_amount"], 300_000);
}

#[tokio::test]
async fn test_failed_reschedule_leaves_booking_untouched() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let blocker = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-20", "14:00", "16:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(blocker.status, StatusCode::CREATED);

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-20", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    let moved = app
        .request(
            "PUT",
            &format!("/api/bookings/{}/schedule", id),
            Some(serde_json::json!({
                "booking_date": "2030-06-20",
                "start_time": "15:00",
                "end_time": "17:00",
            })),
            Some(&user),
            None,
        )
        .await;
    assert_eq!(moved.status, StatusCode::CONFLICT);

    // The booking keeps its slot and its price.
    let unchanged = app
        .request("GET", &format!("/api/bookings/{}", id), None, Some(&user), None)
        .await;
    assert_eq!(unchanged.body["data"]["start_time"], "09:00");
    assert_eq!(unchanged.body["data"]["end_time"], "11:00");
    assert_eq!(unchanged.body["data"]["pricing"]["total_amount"], 200_000);
}

#[tokio::test]
async fn test_membership_partial_failure_returns_persisted() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    // Occupy the second Wednesday before the series is requested.
    let blocker = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-12", "19:00", "21:00")),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(blocker.status, StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "stadium_id": stadium_id,
                "field_id": field_id,
                "start_date": "2030-06-01",
                "day_of_week": 3,
                "start_time": "19:00",
                "end_time": "21:00",
                "recurrence_pattern": "weekly",
                "total_occurrences": 4,
            })),
            Some(&user),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    let occurrences = data["occurrences"].as_array().unwrap();
    assert_eq!(occurrences.len(), 3);
    assert_eq!(data["failures"].as_array().unwrap().len(), 1);
    assert_eq!(data["failures"][0]["date"], "2030-06-12");
    // Counters describe the persisted subset only.
    for occurrence in occurrences {
        assert_eq!(occurrence["membership"]["total_occurrences"], 3);
    }
    assert_eq!(occurrences[0]["membership"]["next_booking_date"], "2030-06-19");
}

#[tokio::test]
async fn test_history_records_lifecycle() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;
    let user = Uuid::new_v4();

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(booking_body(&stadium_id, &field_id, "2030-06-17", "09:00", "11:00")),
            Some(&user),
            None,
        )
        .await;
    let id = created.body["data"]["id"].as_str().unwrap().to_string();

    app.request(
        "POST",
        &format!("/api/bookings/{}/confirm", id),
        None,
        Some(&user),
        None,
    )
    .await;

    let history = app
        .request(
            "GET",
            &format!("/api/bookings/{}/history", id),
            None,
            Some(&user),
            None,
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    let entries = history.body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "booking.created");
    assert_eq!(entries[1]["action"], "booking.confirmed");
}
