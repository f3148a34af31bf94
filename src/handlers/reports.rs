use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    handlers::shipments::ShipmentSummary,
    services::reports::{StatusCount, SummaryReport},
    ApiResponse, ApiResult, AppState,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Inclusive lower bound on shipment creation time
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on shipment creation time
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(ReportQuery),
    responses(
        (status = 200, description = "Headline totals", body = ApiResponse<SummaryReport>)
    ),
    tag = "reports"
)]
pub async fn summary(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<SummaryReport> {
    let report = state
        .report_service()
        .summary(query.from, query.to)
        .await?;
    Ok(Json(ApiResponse::success(report)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/status-breakdown",
    params(ReportQuery),
    responses(
        (status = 200, description = "Shipment count per status", body = ApiResponse<Vec<StatusCount>>)
    ),
    tag = "reports"
)]
pub async fn status_breakdown(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Vec<StatusCount>> {
    let breakdown = state
        .report_service()
        .status_breakdown(query.from, query.to)
        .await?;
    Ok(Json(ApiResponse::success(breakdown)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Most recently booked shipments", body = ApiResponse<Vec<ShipmentSummary>>)
    ),
    tag = "reports"
)]
pub async fn recent_shipments(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> ApiResult<Vec<ShipmentSummary>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 50);
    let shipments = state.report_service().recent_shipments(limit).await?;
    let items = shipments.into_iter().map(ShipmentSummary::from).collect();
    Ok(Json(ApiResponse::success(items)))
}
