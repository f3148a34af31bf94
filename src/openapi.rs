use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

/// Aggregated OpenAPI document for the v1 surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SwiftShip API",
        description = "Parcel-shipping tracking and back-office administration",
    ),
    paths(
        handlers::shipments::list_shipments,
        handlers::shipments::get_shipment,
        handlers::shipments::create_shipment,
        handlers::shipments::update_shipment,
        handlers::shipments::update_status,
        handlers::shipments::get_timeline,
        handlers::shipments::scan_package,
        handlers::shipments::delete_shipment,
        handlers::shipments::track_by_number,
        handlers::pricing::quote,
        handlers::pricing::list_rules,
        handlers::pricing::create_rule,
        handlers::pricing::update_rule,
        handlers::pricing::delete_rule,
        handlers::branches::list_branches,
        handlers::branches::get_branch,
        handlers::branches::create_branch,
        handlers::branches::update_branch,
        handlers::branches::delete_branch,
        handlers::drivers::list_drivers,
        handlers::drivers::get_driver,
        handlers::drivers::create_driver,
        handlers::drivers::update_driver,
        handlers::drivers::delete_driver,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::reports::summary,
        handlers::reports::status_breakdown,
        handlers::reports::recent_shipments,
        handlers::settings::list_settings,
        handlers::settings::get_setting,
        handlers::settings::upsert_setting,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
    ),
    tags(
        (name = "tracking", description = "Public shipment tracking"),
        (name = "shipments", description = "Shipment management"),
        (name = "pricing", description = "Quotes and pricing rules"),
        (name = "branches", description = "Branch offices"),
        (name = "drivers", description = "Delivery drivers"),
        (name = "customers", description = "Customer accounts"),
        (name = "reports", description = "Operational reports"),
        (name = "settings", description = "Application settings"),
        (name = "auth", description = "Sessions"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs.
pub fn swagger_router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
