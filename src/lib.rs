//! SwiftShip API Library
//!
//! Parcel-shipping tracking and back-office administration service.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod request_id;
pub mod services;
pub mod tracking;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::auth::{AuthRouterExt, AuthService, ADMIN_ONLY, BACK_OFFICE};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub auth_service: Arc<AuthService>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn shipment_service(&self) -> Arc<services::shipments::ShipmentService> {
        self.services.shipments.clone()
    }

    pub fn pricing_service(&self) -> Arc<services::pricing::PricingService> {
        self.services.pricing.clone()
    }

    pub fn branch_service(&self) -> Arc<services::branches::BranchService> {
        self.services.branches.clone()
    }

    pub fn driver_service(&self) -> Arc<services::drivers::DriverService> {
        self.services.drivers.clone()
    }

    pub fn customer_service(&self) -> Arc<services::customers::CustomerService> {
        self.services.customers.clone()
    }

    pub fn report_service(&self) -> Arc<services::reports::ReportService> {
        self.services.reports.clone()
    }

    pub fn settings_service(&self) -> Arc<services::settings::SettingsService> {
        self.services.settings.clone()
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: request_id::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Common query parameters for list endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// All v1 routes, grouped by the role each group requires.
pub fn api_v1_routes() -> Router<AppState> {
    // Public surfaces: tracking lookups and quotes need no session.
    let public = Router::new()
        .route(
            "/track/:tracking_number",
            get(handlers::shipments::track_by_number),
        )
        .route("/quote", axum::routing::post(handlers::pricing::quote))
        .route("/auth/login", axum::routing::post(handlers::auth::login));

    // Any signed-in account.
    let signed_in = Router::new()
        .route("/auth/logout", axum::routing::post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .with_auth();

    // Staff portal: shipments, scan flow, back-office records, reports.
    let staff = Router::new()
        .route(
            "/shipments",
            get(handlers::shipments::list_shipments)
                .post(handlers::shipments::create_shipment),
        )
        .route(
            "/shipments/:id",
            get(handlers::shipments::get_shipment)
                .put(handlers::shipments::update_shipment)
                .delete(handlers::shipments::delete_shipment),
        )
        .route(
            "/shipments/:id/status",
            axum::routing::post(handlers::shipments::update_status),
        )
        .route(
            "/shipments/:id/timeline",
            get(handlers::shipments::get_timeline),
        )
        .route("/scan", axum::routing::post(handlers::shipments::scan_package))
        .route(
            "/branches",
            get(handlers::branches::list_branches).post(handlers::branches::create_branch),
        )
        .route(
            "/branches/:id",
            get(handlers::branches::get_branch)
                .put(handlers::branches::update_branch)
                .delete(handlers::branches::delete_branch),
        )
        .route(
            "/drivers",
            get(handlers::drivers::list_drivers).post(handlers::drivers::create_driver),
        )
        .route(
            "/drivers/:id",
            get(handlers::drivers::get_driver)
                .put(handlers::drivers::update_driver)
                .delete(handlers::drivers::delete_driver),
        )
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route("/reports/summary", get(handlers::reports::summary))
        .route(
            "/reports/status-breakdown",
            get(handlers::reports::status_breakdown),
        )
        .route("/reports/recent", get(handlers::reports::recent_shipments))
        .require_role(BACK_OFFICE);

    // Configuration surfaces are admin only; shipment deletion checks the
    // admin role in its handler since the path is shared with staff routes.
    let admin = Router::new()
        .route(
            "/pricing-rules",
            get(handlers::pricing::list_rules).post(handlers::pricing::create_rule),
        )
        .route(
            "/pricing-rules/:id",
            axum::routing::put(handlers::pricing::update_rule)
                .delete(handlers::pricing::delete_rule),
        )
        .route("/settings", get(handlers::settings::list_settings))
        .route(
            "/settings/:key",
            get(handlers::settings::get_setting).put(handlers::settings::upsert_setting),
        )
        .require_role(ADMIN_ONLY);

    Router::new()
        .route("/status", get(api_status))
        .merge(public)
        .merge(signed_in)
        .merge(staff)
        .merge(admin)
}

/// Builds the complete application router with middleware layers.
pub fn app_router(state: AppState) -> Router {
    let auth_service = state.auth_service.clone();

    Router::new()
        .nest("/api/v1", api_v1_routes())
        .route("/health", get(health_check))
        .merge(openapi::swagger_router())
        .layer(Extension(auth_service))
        .layer(axum::middleware::from_fn(request_id::propagate_request_id))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::compression::CompressionLayer::new())
        .with_state(state)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "swiftship-api",
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            request_id::scope_request_id(request_id::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            request_id::scope_request_id(request_id::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }
}
