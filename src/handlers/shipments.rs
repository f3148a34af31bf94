use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthSession,
    errors::ServiceError,
    models::shipment::{self, PaymentStatus, ServiceLevel, ShipmentStatus, TransportMode},
    services::shipments::{CreateShipmentInput, RecordStatusOptions, UpdateShipmentInput},
    tracking::{route_stops, RouteStop, TimelineEntry},
    ApiResponse, ApiResult, AppState, PaginatedResponse,
};

#[derive(Debug, Deserialize, Default, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShipmentListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "990e8400-e29b-41d4-a716-446655440000",
    "tracking_number": "SS9X2K41ABCDEF",
    "status": "in_transit",
    "service_level": "express",
    "transport_mode": "road",
    "sender_name": "Ada Martin",
    "sender_city": "New York",
    "receiver_name": "John Doe",
    "receiver_city": "Los Angeles",
    "weight_kg": 2.5,
    "total_amount": "41.25",
    "payment_status": "unpaid",
    "current_location": "Phoenix, AZ",
    "estimated_delivery": "2025-03-04T18:00:00Z",
    "delivered_at": null,
    "created_at": "2025-03-01T10:30:00Z",
    "updated_at": "2025-03-01T14:30:00Z"
}))]
pub struct ShipmentSummary {
    pub id: Uuid,
    /// Public tracking number ("SS" prefixed)
    #[schema(example = "SS9X2K41ABCDEF")]
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub service_level: ServiceLevel,
    pub transport_mode: TransportMode,
    pub sender_name: String,
    pub sender_city: String,
    pub receiver_name: String,
    pub receiver_city: String,
    pub weight_kg: f64,
    pub dimensions_cm: Option<String>,
    pub declared_value: Option<Decimal>,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub amount_paid: Option<Decimal>,
    pub current_location: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<shipment::Model> for ShipmentSummary {
    fn from(model: shipment::Model) -> Self {
        Self {
            id: model.id,
            tracking_number: model.tracking_number,
            status: model.status,
            service_level: model.service_level,
            transport_mode: model.transport_mode,
            sender_name: model.sender_name,
            sender_city: model.sender_city,
            receiver_name: model.receiver_name,
            receiver_city: model.receiver_city,
            weight_kg: model.weight_kg,
            dimensions_cm: model.dimensions_cm,
            declared_value: model.declared_value,
            total_amount: model.total_amount,
            payment_status: model.payment_status,
            amount_paid: model.amount_paid,
            current_location: model.current_location,
            estimated_delivery: model.estimated_delivery,
            delivered_at: model.delivered_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShipmentRequest {
    #[validate(length(min = 1))]
    pub sender_name: String,
    #[validate(length(min = 1))]
    pub sender_phone: String,
    #[validate(email)]
    pub sender_email: Option<String>,
    #[validate(length(min = 1))]
    pub sender_address: String,
    #[validate(length(min = 1))]
    pub sender_city: String,
    pub sender_state: Option<String>,

    #[validate(length(min = 1))]
    pub receiver_name: String,
    #[validate(length(min = 1))]
    pub receiver_phone: String,
    #[validate(email)]
    pub receiver_email: Option<String>,
    #[validate(length(min = 1))]
    pub receiver_address: String,
    #[validate(length(min = 1))]
    pub receiver_city: String,
    pub receiver_state: Option<String>,

    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,

    pub package_description: Option<String>,
    /// Weight in kilograms
    #[schema(example = 2.5)]
    pub weight_kg: f64,
    /// Encoded as "LxWxH" in centimeters
    pub dimensions_cm: Option<String>,
    pub declared_value: Option<Decimal>,

    pub service_level: ServiceLevel,
    pub transport_mode: TransportMode,

    pub origin_branch_id: Option<Uuid>,
    pub destination_branch_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,

    pub estimated_delivery: Option<DateTime<Utc>>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateShipmentRequest {
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    #[validate(email)]
    pub receiver_email: Option<String>,
    pub receiver_address: Option<String>,
    pub receiver_city: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,
    pub package_description: Option<String>,
    pub dimensions_cm: Option<String>,
    pub assigned_driver_id: Option<Uuid>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub payment_status: Option<PaymentStatus>,
    pub amount_paid: Option<Decimal>,
    pub pod_signature: Option<String>,
    pub pod_photo_url: Option<String>,
    pub pod_receiver_name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ShipmentStatus,
    #[schema(example = "Phoenix, AZ")]
    pub location: Option<String>,
    pub branch_id: Option<Uuid>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScanRequest {
    /// Tracking number as scanned or typed at the kiosk
    #[validate(length(min = 6))]
    #[schema(example = "SS9X2K41ABCDEF")]
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub location: Option<String>,
    pub branch_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Everything the tracking page needs in one response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackingResponse {
    pub shipment: ShipmentSummary,
    /// None for exception/returned/cancelled shipments: progress is
    /// unknown, not zero.
    pub progress_percent: Option<u8>,
    pub timeline: Vec<TimelineEntry>,
    pub route: Vec<RouteStop>,
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments",
    params(ShipmentListQuery),
    responses(
        (status = 200, description = "Shipments listed", body = ApiResponse<PaginatedResponse<ShipmentSummary>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<ShipmentListQuery>,
) -> ApiResult<PaginatedResponse<ShipmentSummary>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);

    let (records, total) = state
        .shipment_service()
        .list_shipments(page, limit, query.status)
        .await?;

    let items: Vec<ShipmentSummary> = records.into_iter().map(ShipmentSummary::from).collect();
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
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment fetched", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ShipmentSummary> {
    match state.shipment_service().get_shipment(id).await? {
        Some(model) => Ok(Json(ApiResponse::success(ShipmentSummary::from(model)))),
        None => Err(ServiceError::NotFound(format!("Shipment {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments",
    request_body = CreateShipmentRequest,
    responses(
        (status = 200, description = "Shipment created", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn create_shipment(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<CreateShipmentRequest>,
) -> ApiResult<ShipmentSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;
    if payload.weight_kg <= 0.0 {
        return Err(ServiceError::ValidationError(
            "weight must be greater than zero".to_string(),
        ));
    }

    let quote = state
        .pricing_service()
        .quote(
            payload.weight_kg,
            payload.service_level,
            payload.declared_value,
        )
        .await?;

    let input = CreateShipmentInput {
        sender_name: payload.sender_name,
        sender_phone: payload.sender_phone,
        sender_email: payload.sender_email,
        sender_address: payload.sender_address,
        sender_city: payload.sender_city,
        sender_state: payload.sender_state,
        receiver_name: payload.receiver_name,
        receiver_phone: payload.receiver_phone,
        receiver_email: payload.receiver_email,
        receiver_address: payload.receiver_address,
        receiver_city: payload.receiver_city,
        receiver_state: payload.receiver_state,
        delivery_address: payload.delivery_address,
        delivery_city: payload.delivery_city,
        delivery_state: payload.delivery_state,
        package_description: payload.package_description,
        weight_kg: payload.weight_kg,
        dimensions_cm: payload.dimensions_cm,
        declared_value: payload.declared_value,
        service_level: payload.service_level,
        transport_mode: payload.transport_mode,
        origin_branch_id: payload.origin_branch_id,
        destination_branch_id: payload.destination_branch_id,
        customer_id: payload.customer_id,
        estimated_delivery: payload.estimated_delivery,
        pickup_date: payload.pickup_date,
        notes: payload.notes,
        created_by: Some(session.user_id),
    };

    let created = state.shipment_service().create_shipment(input, quote).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(created))))
}

#[utoipa::path(
    put,
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = UpdateShipmentRequest,
    responses(
        (status = 200, description = "Shipment updated", body = ApiResponse<ShipmentSummary>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShipmentRequest>,
) -> ApiResult<ShipmentSummary> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let input = UpdateShipmentInput {
        receiver_name: payload.receiver_name,
        receiver_phone: payload.receiver_phone,
        receiver_email: payload.receiver_email.map(Some),
        receiver_address: payload.receiver_address,
        receiver_city: payload.receiver_city,
        delivery_address: payload.delivery_address.map(Some),
        delivery_city: payload.delivery_city.map(Some),
        delivery_state: payload.delivery_state.map(Some),
        package_description: payload.package_description.map(Some),
        dimensions_cm: payload.dimensions_cm.map(Some),
        assigned_driver_id: payload.assigned_driver_id.map(Some),
        estimated_delivery: payload.estimated_delivery.map(Some),
        pickup_date: payload.pickup_date.map(Some),
        payment_status: payload.payment_status,
        amount_paid: payload.amount_paid.map(Some),
        pod_signature: payload.pod_signature.map(Some),
        pod_photo_url: payload.pod_photo_url.map(Some),
        pod_receiver_name: payload.pod_receiver_name.map(Some),
        notes: payload.notes.map(Some),
    };

    let updated = state.shipment_service().update_shipment(id, input).await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}

#[utoipa::path(
    post,
    path = "/api/v1/shipments/{id}/status",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status recorded", body = ApiResponse<ShipmentSummary>),
        (status = 400, description = "Illegal transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Lost a concurrent update", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<ShipmentSummary> {
    let options = RecordStatusOptions {
        location: payload.location,
        branch_id: payload.branch_id,
        description: payload.description,
        notes: payload.notes,
        recorded_by: Some(session.user_id),
    };
    let updated = state
        .shipment_service()
        .record_status(id, payload.status, options)
        .await?;
    Ok(Json(ApiResponse::success(ShipmentSummary::from(updated))))
}

#[utoipa::path(
    get,
    path = "/api/v1/shipments/{id}/timeline",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Projected timeline", body = ApiResponse<TrackingResponse>),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<TrackingResponse> {
    let shipment = state
        .shipment_service()
        .get_shipment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", id)))?;
    let timeline = state.shipment_service().timeline(id).await?;
    Ok(Json(ApiResponse::success(tracking_response(
        shipment, timeline,
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Scan recorded", body = ApiResponse<TrackingResponse>),
        (status = 400, description = "Illegal transition or short tracking number", body = crate::errors::ErrorResponse),
        (status = 404, description = "No shipment for that tracking number", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn scan_package(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(payload): Json<ScanRequest>,
) -> ApiResult<TrackingResponse> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

    let shipment = state
        .shipment_service()
        .find_by_tracking_number(&payload.tracking_number)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Shipment with tracking number {} not found",
                payload.tracking_number.trim()
            ))
        })?;

    let options = RecordStatusOptions {
        location: payload.location,
        branch_id: payload.branch_id,
        description: None,
        notes: payload.notes,
        recorded_by: Some(session.user_id),
    };
    let updated = state
        .shipment_service()
        .record_status(shipment.id, payload.status, options)
        .await?;
    let timeline = state.shipment_service().timeline(updated.id).await?;
    Ok(Json(ApiResponse::success(tracking_response(
        updated, timeline,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shipments/{id}",
    params(("id" = Uuid, Path, description = "Shipment ID")),
    responses(
        (status = 200, description = "Shipment and its events deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Not an administrator", body = crate::errors::ErrorResponse),
        (status = 404, description = "Shipment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "shipments"
)]
pub async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(session): Extension<AuthSession>,
) -> ApiResult<serde_json::Value> {
    if !session.is_admin() {
        return Err(ServiceError::Forbidden(
            "only administrators may delete shipments".to_string(),
        ));
    }
    state.shipment_service().delete_shipment(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}

#[utoipa::path(
    get,
    path = "/api/v1/track/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Public tracking number")),
    responses(
        (status = 200, description = "Shipment status and timeline", body = ApiResponse<TrackingResponse>),
        (status = 400, description = "Tracking number too short", body = crate::errors::ErrorResponse),
        (status = 404, description = "No shipment for that tracking number", body = crate::errors::ErrorResponse)
    ),
    tag = "tracking"
)]
pub async fn track_by_number(
    State(state): State<AppState>,
    Path(tracking_number): Path<String>,
) -> ApiResult<TrackingResponse> {
    let shipment = state
        .shipment_service()
        .find_by_tracking_number(&tracking_number)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "Shipment with tracking number {} not found",
                tracking_number.trim()
            ))
        })?;

    let timeline = state.shipment_service().timeline(shipment.id).await?;
    Ok(Json(ApiResponse::success(tracking_response(
        shipment, timeline,
    ))))
}

fn tracking_response(shipment: shipment::Model, timeline: Vec<TimelineEntry>) -> TrackingResponse {
    let progress_percent = shipment.status.progress_percent();
    let route = route_stops(shipment.transport_mode, shipment.status);
    TrackingResponse {
        shipment: ShipmentSummary::from(shipment),
        progress_percent,
        timeline,
        route,
    }
}
