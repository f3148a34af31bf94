use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use swiftship_api::{
    auth::{user, AuthService},
    config::AppConfig,
    db::{self, DbConfig},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

const TEST_JWT_SECRET: &str =
    "test_secret_key_for_swiftship_integration_tests_at_least_64_characters_long";
const ADMIN_PASSWORD: &str = "admin-password-1";
const STAFF_PASSWORD: &str = "staff-password-1";

/// Helper harness for spinning up an application backed by an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    admin_token: String,
    staff_token: String,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory
        // database.
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            acquire_timeout: Duration::from_secs(5),
        };
        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("database connection");
        db::run_migrations(&pool).await.expect("migrations");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth_service = Arc::new(AuthService::new(
            db_arc.clone(),
            TEST_JWT_SECRET,
            3_600,
        ));

        Self::seed_user(
            &db_arc,
            "admin@swiftship.test",
            ADMIN_PASSWORD,
            user::Role::Admin,
        )
        .await;
        Self::seed_user(
            &db_arc,
            "staff@swiftship.test",
            STAFF_PASSWORD,
            user::Role::Staff,
        )
        .await;

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            TEST_JWT_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            auth_service: auth_service.clone(),
            services,
        };
        let router = swiftship_api::app_router(state.clone());

        let (admin_token, _) = auth_service
            .sign_in("admin@swiftship.test", ADMIN_PASSWORD)
            .await
            .expect("admin sign in");
        let (staff_token, _) = auth_service
            .sign_in("staff@swiftship.test", STAFF_PASSWORD)
            .await
            .expect("staff sign in");

        Self {
            router,
            state,
            admin_token,
            staff_token,
            _event_task: event_task,
        }
    }

    async fn seed_user(db: &Arc<sea_orm::DatabaseConnection>, email: &str, password: &str, role: user::Role) {
        let now = Utc::now();
        let account = user::ActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(AuthService::hash_password(password).expect("hash")),
            display_name: Set(email.split('@').next().unwrap_or("user").to_string()),
            role: Set(role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        account.insert(&**db).await.expect("seed user");
    }

    fn build_request(
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    /// Issue a request with no credentials.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Self::build_request(method, uri, body, None))
            .await
            .expect("response")
    }

    /// Issue a request as the seeded staff account.
    pub async fn request_as_staff(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Self::build_request(
                method,
                uri,
                body,
                Some(&self.staff_token),
            ))
            .await
            .expect("response")
    }

    /// Issue a request as the seeded admin account.
    pub async fn request_as_admin(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Self::build_request(
                method,
                uri,
                body,
                Some(&self.admin_token),
            ))
            .await
            .expect("response")
    }
}

/// Decode a response body as JSON.
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
