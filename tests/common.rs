use event_booking::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::user::{NewUserParams, Role, User},
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

pub const PASSWORD: &str = "correct-horse";

pub struct Session {
    pub id: String,
    pub token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_max_attempts(5).await
    }

    pub async fn with_max_attempts(booking_max_attempts: u32) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url,
            port: 0,
            jwt_secret: "integration-test-secret".to_string(),
            jwt_ttl_days: 30,
            environment: "test".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            booking_max_attempts,
            db_max_connections: Some(5),
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteBookingRepo::new(pool.clone())),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request and returns the status with the decoded body
    /// (`Value::Null` when the body is empty).
    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn register(&self, email: &str, role: &str) -> Session {
        let (status, body) = self.send("POST", "/api/v1/register", None, Some(json!({
            "firstName": "Test",
            "lastName": role,
            "email": email,
            "password": PASSWORD,
            "role": role,
        }))).await;

        if status != StatusCode::CREATED {
            panic!("Registration failed in test helper: status {} body {}", status, body);
        }

        Session {
            id: body["user"]["id"].as_str().expect("No user id in body").to_string(),
            token: body["token"].as_str().expect("No token in body").to_string(),
        }
    }

    /// Admins cannot self-register, so they are written straight to the store.
    pub async fn seed_admin(&self) -> Session {
        let user = User::new(NewUserParams {
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            email: format!("admin-{}@example.com", Uuid::new_v4()),
            password_hash: self.state.auth_service.hash_password(PASSWORD).unwrap(),
            role: Role::Admin,
            profile_picture: None,
        });
        let user = self.state.user_repo.create(&user).await.unwrap();
        let token = self.state.auth_service.issue_token(&user).unwrap();
        Session { id: user.id, token }
    }

    /// Creates an event one month out with the given `[(name, price, quantity)]`
    /// ticket types and returns its id.
    pub async fn create_event(&self, organizer: &Session, ticket_types: &[(&str, f64, u32)]) -> String {
        let ticket_types: Vec<Value> = ticket_types
            .iter()
            .map(|(name, price, quantity)| json!({"name": name, "price": price, "quantity": quantity}))
            .collect();

        let (status, body) = self.send("POST", "/api/v1/events", Some(&organizer.token), Some(json!({
            "title": "Summer Concert",
            "description": "Open air",
            "eventDate": (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339(),
            "location": {"venue": "Park Stage", "city": "Lisbon", "country": "PT"},
            "category": "music",
            "ticketTypes": ticket_types,
        }))).await;

        if status != StatusCode::CREATED {
            panic!("Event creation failed in test helper: status {} body {}", status, body);
        }
        body["id"].as_str().expect("No event id in body").to_string()
    }

    pub async fn event(&self, event_id: &str) -> Value {
        let (status, body) = self.send("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
        assert_eq!(status, StatusCode::OK, "event lookup failed: {}", body);
        body
    }

    pub async fn book(&self, customer: &Session, event_id: &str, tickets: &[(&str, i64)]) -> (StatusCode, Value) {
        let tickets: Vec<Value> = tickets
            .iter()
            .map(|(name, quantity)| json!({"ticketTypeName": name, "ticketQuantity": quantity}))
            .collect();

        self.send("POST", "/api/v1/bookings", Some(&customer.token), Some(json!({
            "eventId": event_id,
            "tickets": tickets,
        }))).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
