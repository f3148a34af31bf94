use axum::{extract::State, response::Json, Extension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{user::Role, AuthSession},
    errors::ServiceError,
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "dispatch@swiftship.example")]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let (token, account) = state
        .auth_service
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        user: UserProfile {
            id: account.id,
            email: account.email,
            display_name: account.display_name,
            role: account.role,
        },
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Token revoked", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Not signed in", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<serde_json::Value> {
    state
        .auth_service
        .sign_out(&session)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?;
    Ok(Json(ApiResponse::success(json!({ "signed_out": true }))))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserProfile>),
        (status = 401, description = "Not signed in", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<UserProfile> {
    let account = state
        .auth_service
        .current_user(&session)
        .await
        .map_err(|e| ServiceError::InternalError(e.to_string()))?
        .ok_or_else(|| ServiceError::Unauthorized("account no longer active".to_string()))?;

    Ok(Json(ApiResponse::success(UserProfile {
        id: account.id,
        email: account.email,
        display_name: account.display_name,
        role: account.role,
    })))
}
