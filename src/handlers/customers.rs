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
    errors::ServiceError, models::customer, services::customers::CustomerInput, ApiResponse,
    ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub phone: String,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(min = 1))]
    pub country: String,
    /// Only honored on update
    pub is_active: Option<bool>,
}

impl CustomerRequest {
    fn into_input(self) -> (CustomerInput, Option<bool>) {
        let is_active = self.is_active;
        (
            CustomerInput {
                name: self.name,
                email: self.email,
                phone: self.phone,
                company: self.company,
                address: self.address,
                city: self.city,
                state: self.state,
                country: self.country,
            },
            is_active,
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(CustomerListQuery),
    responses(
        (status = 200, description = "Customers listed", body = ApiResponse<PaginatedResponse<customer::Model>>)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<CustomerListQuery>,
) -> ApiResult<PaginatedResponse<customer::Model>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let (items, total) = state
        .customer_service()
        .list_customers(page, limit, query.search)
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
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer fetched", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<customer::Model> {
    match state.customer_service().get_customer(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!("Customer {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer created", body = ApiResponse<customer::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<customer::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, _) = payload.into_input();
    let created = state.customer_service().create_customer(input).await?;
    Ok(Json(ApiResponse::success(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<customer::Model>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<customer::Model> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    let (input, is_active) = payload.into_input();
    let updated = state
        .customer_service()
        .update_customer(id, input, is_active)
        .await?;
    Ok(Json(ApiResponse::success(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.customer_service().delete_customer(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
