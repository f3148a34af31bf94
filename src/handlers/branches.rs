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
    errors::ServiceError, models::branch, services::branches::BranchInput, ApiResponse, ApiResult,
    AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BranchListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BranchRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 2, max = 16))]
    #[schema(example = "NYC01")]
    pub code: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub state: Option<String>,
    #[validate(length(min = 1))]
    pub country: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Only honored on update
    pub is_active: Option<bool>,
}

impl BranchRequest {
    fn into_input(self) -> (BranchInput, Option<bool>) {
        let is_active = self.is_active;
        (
            BranchInput {
                name: self.name,
                code: self.code,
                address: self.address,
                city: self.city,
                state: self.state,
                country: self.country,
                phone: self.phone,
                email: self.email,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            is_active,
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/branches",
    params(BranchListQuery),
    responses(
        (status = 200, description = "Branches listed", body = ApiResponse<PaginatedResponse<branch::Model>>)
    ),
    tag = "branches"
)]
pub async fn list_branches(
    State(state): State<AppState>,
    Query(query): Query<BranchListQuery>,
) -> ApiResult<PaginatedResponse<branch::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (items, total) = state.branch_service().list_branches(page, limit).await?;
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
    path = "/api/v1/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Branch fetched", body = ApiResponse<branch::Model>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<branch::Model> {
    match state.branch_service().get_branch(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!("Branch {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/branches",
    request_body = BranchRequest,
    responses(
        (status = 200, description = "Branch created", body = ApiResponse<branch::Model>),
        (status = 409, description = "Branch code already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn create_branch(
    State(state): State<AppState>,
    Json(payload): Json<BranchRequest>,
) -> ApiResult<branch::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, _) = payload.into_input();
    let created = state.branch_service().create_branch(input).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    request_body = BranchRequest,
    responses(
        (status = 200, description = "Branch updated", body = ApiResponse<branch::Model>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BranchRequest>,
) -> ApiResult<branch::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, is_active) = payload.into_input();
    let updated = state
        .branch_service()
        .update_branch(id, input, is_active)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Branch deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Branch not found", body = crate::errors::ErrorResponse)
    ),
    tag = "branches"
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.branch_service().delete_branch(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
