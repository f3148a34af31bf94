use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::shipment::ShipmentStatus;

fn current_request_id() -> Option<String> {
    crate::request_id::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Shipment with tracking number SS9X2K41ABCDEF not found",
    "details": null,
    "request_id": "req-abc123xyz",
    "timestamp": "2025-03-01T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Shipment with tracking number SS9X2K41ABCDEF not found")]
    pub message: String,
    /// Additional error details (validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Rejected by the lifecycle transition rules; no store mutation
    /// happened.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: ShipmentStatus,
        to: ShipmentStatus,
    },

    /// The shipment status was updated but the tracking event append
    /// failed, leaving the history one event short. The operator must
    /// re-attempt the event append rather than the whole transition.
    #[error("Partial update for shipment {shipment_id}: status changed to {status} but the tracking event was not recorded")]
    PartialUpdateFailure {
        shipment_id: Uuid,
        status: ShipmentStatus,
    },

    #[error("Concurrent modification of shipment {0}")]
    ConcurrentModification(Uuid),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<crate::tracking::InvalidTransition> for ServiceError {
    fn from(err: crate::tracking::InvalidTransition) -> Self {
        ServiceError::InvalidTransition {
            from: err.from,
            to: err.to,
        }
    }
}

impl ServiceError {
    /// Wraps a string-based database failure.
    pub fn db_error(message: impl Into<String>) -> Self {
        ServiceError::DatabaseError(sea_orm::error::DbErr::Custom(message.into()))
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_)
            | Self::InvalidOperation(_)
            | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::PartialUpdateFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConcurrentModification(_) | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::AuthError(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking
    /// implementation details; the partial-update case stays verbatim so
    /// the operator knows reconciliation is needed.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = self.response_message();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: error_message,
            details: None,
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};

    #[tokio::test]
    async fn service_error_response_includes_request_id() {
        let response = crate::request_id::scope_request_id(
            crate::request_id::RequestId::new("req-123"),
            async { ServiceError::NotFound("missing".into()).into_response() },
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.request_id.as_deref(), Some("req-123"));
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::InvalidTransition {
                from: ShipmentStatus::Delivered,
                to: ShipmentStatus::InTransit,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::PartialUpdateFailure {
                shipment_id: Uuid::nil(),
                status: ShipmentStatus::InTransit,
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::ConcurrentModification(Uuid::nil()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_transition_message_names_both_statuses() {
        let err = ServiceError::InvalidTransition {
            from: ShipmentStatus::OutForDelivery,
            to: ShipmentStatus::Created,
        };
        let message = err.response_message();
        assert!(message.contains("out_for_delivery"));
        assert!(message.contains("created"));
    }

    #[test]
    fn partial_update_message_is_not_sanitized() {
        let shipment_id = Uuid::new_v4();
        let err = ServiceError::PartialUpdateFailure {
            shipment_id,
            status: ShipmentStatus::Delivered,
        };
        let message = err.response_message();
        assert!(message.contains(&shipment_id.to_string()));
        assert!(message.contains("tracking event was not recorded"));
    }

    #[test]
    fn internal_details_are_hidden() {
        assert_eq!(
            ServiceError::db_error("connection refused on 10.0.0.3").response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::InternalError("stack trace".into()).response_message(),
            "Internal server error"
        );
    }
}
