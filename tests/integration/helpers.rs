//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use arena_core::config::AppConfig;
use arena_service::{AvailabilityChecker, BookingService};

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Database pool for direct queries.
    pub db_pool: PgPool,
    /// Application config.
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application against the test database.
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db = arena_database::DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database");
        let db_pool = db.into_pool();

        arena_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let cache = Arc::new(
            arena_cache::provider::CacheManager::new(&config.cache)
                .await
                .expect("Failed to init cache"),
        );

        let booking_repo = Arc::new(
            arena_database::repositories::booking::BookingRepository::new(db_pool.clone()),
        );
        let field_repo = Arc::new(arena_database::repositories::field::FieldRepository::new(
            db_pool.clone(),
        ));
        let stadium_repo = Arc::new(
            arena_database::repositories::stadium::StadiumRepository::new(db_pool.clone()),
        );
        let staff_repo = Arc::new(arena_database::repositories::staff::StaffRepository::new(
            db_pool.clone(),
        ));
        let payment_repo = Arc::new(
            arena_database::repositories::payment::PaymentRepository::new(db_pool.clone()),
        );
        let history_repo = Arc::new(
            arena_database::repositories::history::HistoryRepository::new(db_pool.clone()),
        );

        let availability = Arc::new(AvailabilityChecker::new(
            Arc::clone(&booking_repo),
            Arc::clone(&cache),
            &config.booking,
        ));
        let booking_service = Arc::new(BookingService::new(
            Arc::clone(&booking_repo),
            Arc::clone(&field_repo),
            Arc::clone(&stadium_repo),
            Arc::clone(&staff_repo),
            Arc::clone(&payment_repo),
            Arc::clone(&history_repo),
            Arc::clone(&availability),
            &config.booking,
        ));

        let app_state = arena_api::state::AppState {
            config: Arc::new(config.clone()),
            db_pool: db_pool.clone(),
            cache,
            field_repo,
            stadium_repo,
            availability,
            booking_service,
        };

        let router = arena_api::router::build_router(app_state);

        Self {
            router,
            db_pool,
            config,
        }
    }

    /// Clean all test data from the database.
    async fn clean_database(pool: &PgPool) {
        let tables = ["booking_history", "payments", "bookings", "staff", "fields", "stadiums"];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test stadium and return its ID.
    pub async fn create_test_stadium(&self, timezone: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"INSERT INTO stadiums (id, owner_id, name, timezone, is_active, created_at, updated_at)
               VALUES ($1, $2, 'Test Arena', $3, TRUE, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(Uuid::new_v4())
        .bind(timezone)
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test stadium");
        id
    }

    /// Create a test field open 08:00-22:00 every day and return its ID.
    pub async fn create_test_field(&self, stadium_id: &Uuid) -> Uuid {
        let id = Uuid::new_v4();
        let schedule: Vec<Value> = (0..7)
            .map(|day| {
                serde_json::json!({
                    "day_of_week": day,
                    "slots": [
                        {"start_time": "08:00", "end_time": "22:00", "is_available": true, "special_rate": null}
                    ]
                })
            })
            .collect();

        sqlx::query(
            r#"INSERT INTO fields
                   (id, stadium_id, name, field_type, surface, base_hourly_rate, currency,
                    pricing_tiers, seasonal_rates, weekly_schedule, special_dates,
                    is_active, created_at, updated_at)
               VALUES ($1, $2, 'Pitch 1', 'football_5', 'artificial_turf', 100000, 'VND',
                       '[]', '[]', $3, '[]', TRUE, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(stadium_id)
        .bind(serde_json::json!(schedule))
        .execute(&self.db_pool)
        .await
        .expect("Failed to create test field");
        id
    }

    /// Make an HTTP request to the test app as `actor_id`.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor_id: Option<&Uuid>,
        actor_role: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(actor_id) = actor_id {
            req = req.header("X-Actor-Id", actor_id.to_string());
        }
        if let Some(role) = actor_role {
            req = req.header("X-Actor-Role", role);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}
