use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::shipment::{self, PaymentStatus, ServiceLevel, ShipmentStatus, TransportMode};
use crate::models::tracking_event;
use crate::services::pricing::Quote;
use crate::tracking::{self, validate_transition, TimelineEntry};

/// Tracking numbers start with this prefix; lookups shorter than the
/// minimum are rejected before touching the store.
const TRACKING_NUMBER_PREFIX: &str = "SS";
const TRACKING_QUERY_MIN_LEN: usize = 6;
const TRACKING_SUFFIX_LEN: usize = 6;
const DEFAULT_DELIVERY_ESTIMATE_DAYS: i64 = 3;

const TRACKING_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fields accepted when booking a new shipment.
#[derive(Debug, Clone)]
pub struct CreateShipmentInput {
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_email: Option<String>,
    pub sender_address: String,
    pub sender_city: String,
    pub sender_state: Option<String>,

    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_email: Option<String>,
    pub receiver_address: String,
    pub receiver_city: String,
    pub receiver_state: Option<String>,

    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,

    pub package_description: Option<String>,
    pub weight_kg: f64,
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
    pub created_by: Option<Uuid>,
}

/// Optional context recorded alongside a status transition.
#[derive(Debug, Clone, Default)]
pub struct RecordStatusOptions {
    pub location: Option<String>,
    pub branch_id: Option<Uuid>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
}

/// Fields an operator may edit after booking. Status is never edited
/// directly; it only moves through `record_status`.
#[derive(Debug, Clone, Default)]
pub struct UpdateShipmentInput {
    pub receiver_name: Option<String>,
    pub receiver_phone: Option<String>,
    pub receiver_email: Option<Option<String>>,
    pub receiver_address: Option<String>,
    pub receiver_city: Option<String>,
    pub delivery_address: Option<Option<String>>,
    pub delivery_city: Option<Option<String>>,
    pub delivery_state: Option<Option<String>>,
    pub package_description: Option<Option<String>>,
    pub dimensions_cm: Option<Option<String>>,
    pub assigned_driver_id: Option<Option<Uuid>>,
    pub estimated_delivery: Option<Option<DateTime<Utc>>>,
    pub pickup_date: Option<Option<DateTime<Utc>>>,
    pub payment_status: Option<PaymentStatus>,
    pub amount_paid: Option<Option<Decimal>>,
    pub pod_signature: Option<Option<String>>,
    pub pod_photo_url: Option<Option<String>>,
    pub pod_receiver_name: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// Service for managing shipments and their tracking history
#[derive(Clone)]
pub struct ShipmentService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ShipmentService {
    /// Creates a new shipment service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Generates a fresh tracking number: "SS" + base-36 timestamp + random
    /// suffix.
    pub fn generate_tracking_number() -> String {
        let mut millis = Utc::now().timestamp_millis().unsigned_abs();
        let mut stamp = Vec::new();
        while millis > 0 {
            stamp.push(TRACKING_CHARSET[(millis % 36) as usize]);
            millis /= 36;
        }
        stamp.reverse();

        let mut rng = rand::thread_rng();
        let suffix: String = (0..TRACKING_SUFFIX_LEN)
            .map(|_| TRACKING_CHARSET[rng.gen_range(0..TRACKING_CHARSET.len())] as char)
            .collect();

        format!(
            "{}{}{}",
            TRACKING_NUMBER_PREFIX,
            String::from_utf8(stamp).unwrap_or_default(),
            suffix
        )
    }

    /// Books a shipment: the row and its implicit `created` tracking event
    /// are written in one transaction.
    #[instrument(skip(self, input, quote))]
    pub async fn create_shipment(
        &self,
        input: CreateShipmentInput,
        quote: Quote,
    ) -> Result<shipment::Model, ServiceError> {
        let now = Utc::now();
        let tracking_number = Self::generate_tracking_number();
        let estimated_delivery = input
            .estimated_delivery
            .unwrap_or(now + Duration::days(DEFAULT_DELIVERY_ESTIMATE_DAYS));
        let current_location = input.sender_city.clone();
        let origin_branch_id = input.origin_branch_id;

        let saved = self
            .db_pool
            .transaction::<_, shipment::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let new_shipment = shipment::ActiveModel {
                        tracking_number: Set(tracking_number),
                        sender_name: Set(input.sender_name),
                        sender_phone: Set(input.sender_phone),
                        sender_email: Set(input.sender_email),
                        sender_address: Set(input.sender_address),
                        sender_city: Set(input.sender_city),
                        sender_state: Set(input.sender_state),
                        receiver_name: Set(input.receiver_name),
                        receiver_phone: Set(input.receiver_phone),
                        receiver_email: Set(input.receiver_email),
                        receiver_address: Set(input.receiver_address),
                        receiver_city: Set(input.receiver_city),
                        receiver_state: Set(input.receiver_state),
                        delivery_address: Set(input.delivery_address),
                        delivery_city: Set(input.delivery_city),
                        delivery_state: Set(input.delivery_state),
                        package_description: Set(input.package_description),
                        weight_kg: Set(input.weight_kg),
                        dimensions_cm: Set(input.dimensions_cm),
                        declared_value: Set(input.declared_value),
                        service_level: Set(input.service_level),
                        transport_mode: Set(input.transport_mode),
                        origin_branch_id: Set(origin_branch_id),
                        destination_branch_id: Set(input.destination_branch_id),
                        current_branch_id: Set(origin_branch_id),
                        assigned_driver_id: Set(None),
                        customer_id: Set(input.customer_id),
                        base_price: Set(quote.base_price),
                        weight_charge: Set(quote.weight_charge),
                        service_charge: Set(quote.service_charge),
                        insurance_fee: Set(quote.insurance_fee),
                        total_amount: Set(quote.total_amount),
                        payment_status: Set(PaymentStatus::Unpaid),
                        amount_paid: Set(None),
                        status: Set(ShipmentStatus::Created),
                        current_location: Set(Some(current_location.clone())),
                        estimated_delivery: Set(Some(estimated_delivery)),
                        delivered_at: Set(None),
                        pickup_date: Set(input.pickup_date),
                        pod_signature: Set(None),
                        pod_photo_url: Set(None),
                        pod_receiver_name: Set(None),
                        notes: Set(input.notes),
                        created_by: Set(input.created_by),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    };
                    let saved = new_shipment.insert(txn).await?;

                    let initial_event = tracking_event::ActiveModel {
                        shipment_id: Set(saved.id),
                        status: Set(ShipmentStatus::Created),
                        event_type: Set(ShipmentStatus::Created.as_str().to_string()),
                        location: Set(Some(current_location)),
                        branch_id: Set(origin_branch_id),
                        description: Set(Some(ShipmentStatus::Created.label().to_string())),
                        notes: Set(None),
                        created_by: Set(input.created_by),
                        created_at: Set(now),
                        ..Default::default()
                    };
                    initial_event.insert(txn).await?;

                    Ok(saved)
                })
            })
            .await
            .map_err(|e| {
                error!("transaction failed while creating shipment: {}", e);
                match e {
                    TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                    TransactionError::Transaction(service_err) => service_err,
                }
            })?;

        self.event_sender
            .send_or_log(Event::ShipmentCreated(saved.id))
            .await;
        Ok(saved)
    }

    /// Records a status transition: validates it, advances the shipment row
    /// and appends exactly one tracking event.
    ///
    /// The row update carries an optimistic guard on the expected current
    /// status; a lost race surfaces as `ConcurrentModification` rather than
    /// silently overwriting another operator's scan. If the event append
    /// fails after the row was updated the shipment is one event short and
    /// the caller gets `PartialUpdateFailure` so the append alone can be
    /// retried.
    #[instrument(skip(self, options))]
    pub async fn record_status(
        &self,
        shipment_id: Uuid,
        next_status: ShipmentStatus,
        options: RecordStatusOptions,
    ) -> Result<shipment::Model, ServiceError> {
        let db = &*self.db_pool;
        let current = shipment::Entity::find_by_id(shipment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))?;

        validate_transition(current.status, next_status)?;

        let now = Utc::now();
        let mut update = shipment::Entity::update_many()
            .col_expr(shipment::Column::Status, Expr::value(next_status))
            .col_expr(shipment::Column::UpdatedAt, Expr::value(now));
        if let Some(location) = &options.location {
            update = update.col_expr(
                shipment::Column::CurrentLocation,
                Expr::value(Some(location.clone())),
            );
        }
        if let Some(branch_id) = options.branch_id {
            update = update.col_expr(
                shipment::Column::CurrentBranchId,
                Expr::value(Some(branch_id)),
            );
        }
        if next_status == ShipmentStatus::Delivered {
            update = update.col_expr(shipment::Column::DeliveredAt, Expr::value(Some(now)));
        }

        let result = update
            .filter(shipment::Column::Id.eq(shipment_id))
            .filter(shipment::Column::Status.eq(current.status))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            warn!(%shipment_id, "status changed underneath this transition");
            return Err(ServiceError::ConcurrentModification(shipment_id));
        }

        let event_at = self.next_event_timestamp(shipment_id, now).await?;
        let event = tracking_event::ActiveModel {
            shipment_id: Set(shipment_id),
            status: Set(next_status),
            event_type: Set(next_status.as_str().to_string()),
            location: Set(options.location),
            branch_id: Set(options.branch_id),
            description: Set(Some(
                options
                    .description
                    .unwrap_or_else(|| next_status.label().to_string()),
            )),
            notes: Set(options.notes),
            created_by: Set(options.recorded_by),
            created_at: Set(event_at),
            ..Default::default()
        };
        if let Err(db_err) = event.insert(db).await {
            error!(
                %shipment_id,
                %next_status,
                "status row updated but event append failed: {}",
                db_err
            );
            return Err(ServiceError::PartialUpdateFailure {
                shipment_id,
                status: next_status,
            });
        }

        self.event_sender
            .send_or_log(Event::ShipmentStatusChanged {
                shipment_id,
                old_status: current.status,
                new_status: next_status,
            })
            .await;
        if next_status == ShipmentStatus::Delivered {
            self.event_sender
                .send_or_log(Event::ShipmentDelivered(shipment_id))
                .await;
        }

        shipment::Entity::find_by_id(shipment_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))
    }

    /// Two events for one shipment must never share a timestamp: the
    /// current-event derivation depends on a strict order.
    async fn next_event_timestamp(
        &self,
        shipment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ServiceError> {
        let latest = tracking_event::Entity::find()
            .filter(tracking_event::Column::ShipmentId.eq(shipment_id))
            .order_by_desc(tracking_event::Column::CreatedAt)
            .one(&*self.db_pool)
            .await?;
        Ok(match latest {
            Some(event) if now <= event.created_at => {
                event.created_at + Duration::microseconds(1)
            }
            _ => now,
        })
    }

    /// Gets a shipment by ID
    #[instrument(skip(self))]
    pub async fn get_shipment(
        &self,
        shipment_id: Uuid,
    ) -> Result<Option<shipment::Model>, ServiceError> {
        let found = shipment::Entity::find_by_id(shipment_id)
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Finds a shipment by tracking number. Queries shorter than the public
    /// minimum are a validation error, not a miss.
    #[instrument(skip(self))]
    pub async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<shipment::Model>, ServiceError> {
        let needle = tracking_number.trim();
        if needle.len() < TRACKING_QUERY_MIN_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Tracking number must be at least {} characters long",
                TRACKING_QUERY_MIN_LEN
            )));
        }
        let found = shipment::Entity::find()
            .filter(shipment::Column::TrackingNumber.eq(needle))
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Raw tracking events for one shipment, in no guaranteed order; the
    /// timeline projection sorts them itself.
    #[instrument(skip(self))]
    pub async fn list_tracking_events(
        &self,
        shipment_id: Uuid,
    ) -> Result<Vec<tracking_event::Model>, ServiceError> {
        let events = tracking_event::Entity::find()
            .filter(tracking_event::Column::ShipmentId.eq(shipment_id))
            .all(&*self.db_pool)
            .await?;
        Ok(events)
    }

    /// Projects the display-ready timeline for one shipment.
    #[instrument(skip(self))]
    pub async fn timeline(&self, shipment_id: Uuid) -> Result<Vec<TimelineEntry>, ServiceError> {
        let events = self.list_tracking_events(shipment_id).await?;
        Ok(tracking::project(&events))
    }

    /// Lists shipments with pagination and an optional status filter.
    #[instrument(skip(self))]
    pub async fn list_shipments(
        &self,
        page: u64,
        limit: u64,
        status: Option<String>,
    ) -> Result<(Vec<shipment::Model>, u64), ServiceError> {
        let mut query = shipment::Entity::find();

        if let Some(status_filter) = status {
            match status_filter.parse::<ShipmentStatus>() {
                Ok(parsed) => query = query.filter(shipment::Column::Status.eq(parsed)),
                // Unknown status matches nothing.
                Err(_) => return Ok((vec![], 0)),
            }
        }

        let paginator = query
            .order_by_desc(shipment::Column::CreatedAt)
            .paginate(&*self.db_pool, limit);

        let total = paginator.num_items().await?;
        let shipments = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((shipments, total))
    }

    /// Applies an administrative edit. Lifecycle fields are out of reach:
    /// status moves only through `record_status`.
    #[instrument(skip(self, input))]
    pub async fn update_shipment(
        &self,
        shipment_id: Uuid,
        input: UpdateShipmentInput,
    ) -> Result<shipment::Model, ServiceError> {
        let model = shipment::Entity::find_by_id(shipment_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Shipment {} not found", shipment_id)))?;

        let mut active: shipment::ActiveModel = model.into();
        if let Some(value) = input.receiver_name {
            active.receiver_name = Set(value);
        }
        if let Some(value) = input.receiver_phone {
            active.receiver_phone = Set(value);
        }
        if let Some(value) = input.receiver_email {
            active.receiver_email = Set(value);
        }
        if let Some(value) = input.receiver_address {
            active.receiver_address = Set(value);
        }
        if let Some(value) = input.receiver_city {
            active.receiver_city = Set(value);
        }
        if let Some(value) = input.delivery_address {
            active.delivery_address = Set(value);
        }
        if let Some(value) = input.delivery_city {
            active.delivery_city = Set(value);
        }
        if let Some(value) = input.delivery_state {
            active.delivery_state = Set(value);
        }
        if let Some(value) = input.package_description {
            active.package_description = Set(value);
        }
        if let Some(value) = input.dimensions_cm {
            active.dimensions_cm = Set(value);
        }
        if let Some(value) = input.assigned_driver_id {
            active.assigned_driver_id = Set(value);
        }
        if let Some(value) = input.estimated_delivery {
            active.estimated_delivery = Set(value);
        }
        if let Some(value) = input.pickup_date {
            active.pickup_date = Set(value);
        }
        if let Some(value) = input.payment_status {
            active.payment_status = Set(value);
        }
        if let Some(value) = input.amount_paid {
            active.amount_paid = Set(value);
        }
        if let Some(value) = input.pod_signature {
            active.pod_signature = Set(value);
        }
        if let Some(value) = input.pod_photo_url {
            active.pod_photo_url = Set(value);
        }
        if let Some(value) = input.pod_receiver_name {
            active.pod_receiver_name = Set(value);
        }
        if let Some(value) = input.notes {
            active.notes = Set(value);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::ShipmentUpdated(updated.id))
            .await;
        Ok(updated)
    }

    /// Deletes a shipment and its tracking events.
    #[instrument(skip(self))]
    pub async fn delete_shipment(&self, shipment_id: Uuid) -> Result<(), ServiceError> {
        let deleted = self
            .db_pool
            .transaction::<_, u64, ServiceError>(move |txn| {
                Box::pin(async move {
                    tracking_event::Entity::delete_many()
                        .filter(tracking_event::Column::ShipmentId.eq(shipment_id))
                        .exec(txn)
                        .await?;
                    let result = shipment::Entity::delete_by_id(shipment_id).exec(txn).await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        if deleted == 0 {
            return Err(ServiceError::NotFound(format!(
                "Shipment {} not found",
                shipment_id
            )));
        }
        self.event_sender
            .send_or_log(Event::ShipmentDeleted(shipment_id))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_numbers_carry_the_public_prefix() {
        let number = ShipmentService::generate_tracking_number();
        assert!(number.starts_with(TRACKING_NUMBER_PREFIX));
        assert!(number.len() >= TRACKING_QUERY_MIN_LEN);
        assert!(number
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn consecutive_tracking_numbers_differ() {
        let first = ShipmentService::generate_tracking_number();
        let second = ShipmentService::generate_tracking_number();
        assert_ne!(first, second);
    }
}
