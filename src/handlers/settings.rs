use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::AuthSession, errors::ServiceError, models::setting, ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingRequest {
    pub value: serde_json::Value,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "All settings", body = ApiResponse<Vec<setting::Model>>)
    ),
    tag = "settings"
)]
pub async fn list_settings(State(state): State<AppState>) -> ApiResult<Vec<setting::Model>> {
    let settings = state.settings_service().list().await?;
    Ok(Json(ApiResponse::success(settings)))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting fetched", body = ApiResponse<setting::Model>),
        (status = 404, description = "Setting not found", body = crate::errors::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<setting::Model> {
    match state.settings_service().get(&key).await? {
        Some(model) => Ok(Json(ApiResponse::success(model))),
        None => Err(ServiceError::NotFound(format!(
            "Setting '{}' not found",
            key
        ))),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = SettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = ApiResponse<setting::Model>)
    ),
    tag = "settings"
)]
pub async fn upsert_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<SettingRequest>,
) -> ApiResult<setting::Model> {
    let stored = state
        .settings_service()
        .upsert(
            &key,
            payload.value,
            payload.description,
            Some(session.user_id),
        )
        .await?;
    Ok(Json(ApiResponse::success(stored)))
}
