use axum::{
    extract::{Path, State},
    response::Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::ServiceError,
    models::pricing_rule,
    models::shipment::ServiceLevel,
    services::pricing::Quote,
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    /// Weight in kilograms
    #[schema(example = 2.5)]
    pub weight_kg: f64,
    pub service_level: ServiceLevel,
    pub declared_value: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PricingRuleRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub origin_zone: Option<String>,
    pub destination_zone: Option<String>,
    pub base_price: Decimal,
    pub price_per_kg: Decimal,
    #[schema(example = 1.5)]
    pub express_multiplier: Decimal,
    #[schema(example = 2.0)]
    pub same_day_multiplier: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PricingRuleUpdateRequest {
    pub base_price: Option<Decimal>,
    pub price_per_kg: Option<Decimal>,
    pub express_multiplier: Option<Decimal>,
    pub same_day_multiplier: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/v1/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Itemized quote", body = ApiResponse<Quote>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> ApiResult<Quote> {
    let quote = state
        .pricing_service()
        .quote(
            payload.weight_kg,
            payload.service_level,
            payload.declared_value,
        )
        .await?;
    Ok(Json(ApiResponse::success(quote)))
}

#[utoipa::path(
    get,
    path = "/api/v1/pricing-rules",
    responses(
        (status = 200, description = "Pricing rules listed", body = ApiResponse<Vec<pricing_rule::Model>>)
    ),
    tag = "pricing"
)]
pub async fn list_rules(State(state): State<AppState>) -> ApiResult<Vec<pricing_rule::Model>> {
    let rules = state.pricing_service().list_rules().await?;
    Ok(Json(ApiResponse::success(rules)))
}

#[utoipa::path(
    post,
    path = "/api/v1/pricing-rules",
    request_body = PricingRuleRequest,
    responses(
        (status = 200, description = "Pricing rule created", body = ApiResponse<pricing_rule::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn create_rule(
    State(state): State<AppState>,
    Json(payload): Json<PricingRuleRequest>,
) -> ApiResult<pricing_rule::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let created = state
        .pricing_service()
        .create_rule(
            payload.name,
            payload.origin_zone,
            payload.destination_zone,
            payload.base_price,
            payload.price_per_kg,
            payload.express_multiplier,
            payload.same_day_multiplier,
        )
        .await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/pricing-rules/{id}",
    params(("id" = Uuid, Path, description = "Pricing rule ID")),
    request_body = PricingRuleUpdateRequest,
    responses(
        (status = 200, description = "Pricing rule updated", body = ApiResponse<pricing_rule::Model>),
        (status = 404, description = "Pricing rule not found", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PricingRuleUpdateRequest>,
) -> ApiResult<pricing_rule::Model> {
    let updated = state
        .pricing_service()
        .update_rule(
            id,
            payload.base_price,
            payload.price_per_kg,
            payload.express_multiplier,
            payload.same_day_multiplier,
            payload.is_active,
        )
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pricing-rules/{id}",
    params(("id" = Uuid, Path, description = "Pricing rule ID")),
    responses(
        (status = 200, description = "Pricing rule deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Pricing rule not found", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.pricing_service().delete_rule(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
