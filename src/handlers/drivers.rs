use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::ServiceError, models::driver, services::drivers::DriverInput, ApiResponse, ApiResult,
    AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DriverListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DriverRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>,
    pub branch_id: Option<Uuid>,
    /// Only honored on update
    pub is_active: Option<bool>,
}

impl DriverRequest {
    fn into_input(self) -> (DriverInput, Option<bool>) {
        let is_active = self.is_active;
        (
            DriverInput {
                name: self.name,
                phone: self.phone,
                email: self.email,
                license_number: self.license_number,
                vehicle_type: self.vehicle_type,
                vehicle_plate: self.vehicle_plate,
                branch_id: self.branch_id,
            },
            is_active,
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers",
    params(DriverListQuery),
    responses(
        (status = 200, description = "Drivers listed", body = ApiResponse<PaginatedResponse<driver::Model>>)
    ),
    tag = "drivers"
)]
pub async fn list_drivers(
    State(state): State<AppState>,
    Query(query): Query<DriverListQuery>,
) -> ApiResult<PaginatedResponse<driver::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (items, total) = state
        .driver_service()
        .list_drivers(page, limit, query.branch_id)
        .await?;
    let total_pages = (total + limit - 1) / limit;
    Ok(Json(ApiResponse::success(PaginatedResponse {
        items,
        total,
        page,
        limit,
        total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/drivers/{id}",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver fetched", body = ApiResponse<driver::Model>),
        (status = 404, description = "Driver not found", body = crate::errors::ErrorResponse)
    ),
    tag = "drivers"
)]
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<driver::Model> {
    match state.driver_service().get_driver(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!("Driver {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/drivers",
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Driver created", body = ApiResponse<driver::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "drivers"
)]
pub async fn create_driver(
    State(state): State<AppState>,
    Json(payload): Json<DriverRequest>,
) -> ApiResult<driver::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, _) = payload.into_input();
    let created = state.driver_service().create_driver(input).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/drivers/{id}",
    params(("id" = Uuid, Path, description = "Driver ID")),
    request_body = DriverRequest,
    responses(
        (status = 200, description = "Driver updated", body = ApiResponse<driver::Model>),
        (status = 404, description = "Driver not found", body = crate::errors::ErrorResponse)
    ),
    tag = "drivers"
)]
pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DriverRequest>,
) -> ApiResult<driver::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, is_active) = payload.into_input();
    let updated = state
        .driver_service()
        .update_driver(id, input, is_active)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drivers/{id}",
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Driver not found", body = crate::errors::ErrorResponse)
    ),
    tag = "drivers"
)]
pub async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.driver_service().delete_driver(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
