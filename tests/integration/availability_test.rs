//! Integration tests for the availability endpoints.

mod helpers;

use axum::http::StatusCode;
use uuid::Uuid;

#[tokio::test]
async fn test_check_open_slot() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    let response = app
        .request(
            "GET",
            &format!(
                "/api/fields/{}/availability/check?date=2030-07-01&start_time=09:00&end_time=11:00",
                field_id
            ),
            None,
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["available"], true);
}

#[tokio::test]
async fn test_check_reflects_existing_booking() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    let created = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({
                "stadium_id": stadium_id,
                "field_id": field_id,
                "booking_date": "2030-07-02",
                "start_time": "09:00",
                "end_time": "11:00",
            })),
            Some(&Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let taken = app
        .request(
            "GET",
            &format!(
                "/api/fields/{}/availability/check?date=2030-07-02&start_time=10:00&end_time=12:00",
                field_id
            ),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(taken.body["data"]["available"], false);

    // Adjacent window stays free.
    let free = app
        .request(
            "GET",
            &format!(
                "/api/fields/{}/availability/check?date=2030-07-02&start_time=11:00&end_time=13:00",
                field_id
            ),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(free.body["data"]["available"], true);
}

#[tokio::test]
async fn test_outside_schedule_unavailable() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    // The field closes at 22:00.
    let response = app
        .request(
            "GET",
            &format!(
                "/api/fields/{}/availability/check?date=2030-07-03&start_time=22:00&end_time=23:00",
                field_id
            ),
            None,
            None,
            None,
        )
        .await;
    assert_eq!(response.body["data"]["available"], false);
}

#[tokio::test]
async fn test_day_availability_calendar() {
    let app = helpers::TestApp::new().await;
    let stadium_id = app.create_test_stadium("Asia/Ho_Chi_Minh").await;
    let field_id = app.create_test_field(&stadium_id).await;

    let response = app
        .request(
            "GET",
            &format!("/api/fields/{}/availability?date=2030-07-04", field_id),
            None,
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["date"], "2030-07-04");
    assert_eq!(data["total_slots"], 1);
    assert_eq!(data["available_slots"], 1);
    assert_eq!(data["slots"][0]["state"], "available");
}
