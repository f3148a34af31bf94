use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Shipment lifecycle status.
///
/// The first six variants form the canonical forward sequence; `Exception`,
/// `Returned` and `Cancelled` are side branches reachable from any
/// non-terminal status. `Delivered` and `Cancelled` are terminal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[sea_orm(string_value = "created")]
    Created,
    #[sea_orm(string_value = "received_at_origin")]
    ReceivedAtOrigin,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "arrived_at_destination")]
    ArrivedAtDestination,
    #[sea_orm(string_value = "out_for_delivery")]
    OutForDelivery,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "exception")]
    Exception,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl ShipmentStatus {
    /// Position on the canonical forward sequence, `None` for side branches.
    pub fn forward_rank(&self) -> Option<u8> {
        match self {
            Self::Created => Some(0),
            Self::ReceivedAtOrigin => Some(1),
            Self::InTransit => Some(2),
            Self::ArrivedAtDestination => Some(3),
            Self::OutForDelivery => Some(4),
            Self::Delivered => Some(5),
            Self::Exception | Self::Returned | Self::Cancelled => None,
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Progress-bar percentage for forward-sequence statuses. Side branches
    /// have no defined progress; callers must render "unknown" rather than
    /// defaulting.
    pub fn progress_percent(&self) -> Option<u8> {
        match self {
            Self::Created => Some(10),
            Self::ReceivedAtOrigin => Some(25),
            Self::InTransit => Some(50),
            Self::ArrivedAtDestination => Some(75),
            Self::OutForDelivery => Some(90),
            Self::Delivered => Some(100),
            Self::Exception | Self::Returned | Self::Cancelled => None,
        }
    }

    /// Human-readable label, also the default tracking-event description.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::ReceivedAtOrigin => "Received at Origin",
            Self::InTransit => "In Transit",
            Self::ArrivedAtDestination => "Arrived at Destination",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Exception => "Exception",
            Self::Returned => "Returned",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Wire value, matching the stored string and the JSON representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ReceivedAtOrigin => "received_at_origin",
            Self::InTransit => "in_transit",
            Self::ArrivedAtDestination => "arrived_at_destination",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Exception => "exception",
            Self::Returned => "returned",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "created" => Ok(Self::Created),
            "received_at_origin" => Ok(Self::ReceivedAtOrigin),
            "in_transit" => Ok(Self::InTransit),
            "arrived_at_destination" => Ok(Self::ArrivedAtDestination),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "exception" => Ok(Self::Exception),
            "returned" => Ok(Self::Returned),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown shipment status '{}'", other)),
        }
    }
}

/// Service level offered at booking time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    #[sea_orm(string_value = "standard")]
    Standard,
    #[sea_orm(string_value = "express")]
    Express,
    #[sea_orm(string_value = "same_day")]
    SameDay,
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Express => write!(f, "express"),
            Self::SameDay => write!(f, "same_day"),
        }
    }
}

impl FromStr for ServiceLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "same_day" | "sameday" => Ok(Self::SameDay),
            other => Err(format!("unknown service level '{}'", other)),
        }
    }
}

/// How the parcel moves between origin and destination.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[sea_orm(string_value = "road")]
    Road,
    #[sea_orm(string_value = "sea")]
    Sea,
    #[sea_orm(string_value = "air")]
    Air,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Road => write!(f, "road"),
            Self::Sea => write!(f, "sea"),
            Self::Air => write!(f, "air"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "road" => Ok(Self::Road),
            "sea" => Ok(Self::Sea),
            "air" => Ok(Self::Air),
            other => Err(format!("unknown transport mode '{}'", other)),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unpaid => write!(f, "unpaid"),
            Self::Partial => write!(f, "partial"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// Shipment entity model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Human-facing identifier, unique and immutable once assigned.
    #[sea_orm(unique)]
    pub tracking_number: String,

    #[validate(length(min = 1, max = 200))]
    pub sender_name: String,
    pub sender_phone: String,
    #[validate(email)]
    pub sender_email: Option<String>,
    pub sender_address: String,
    pub sender_city: String,
    pub sender_state: Option<String>,

    #[validate(length(min = 1, max = 200))]
    pub receiver_name: String,
    pub receiver_phone: String,
    #[validate(email)]
    pub receiver_email: Option<String>,
    pub receiver_address: String,
    pub receiver_city: String,
    pub receiver_state: Option<String>,

    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_state: Option<String>,

    pub package_description: Option<String>,
    pub weight_kg: f64,
    /// Encoded as "LxWxH" in centimeters.
    pub dimensions_cm: Option<String>,
    pub declared_value: Option<Decimal>,

    pub service_level: ServiceLevel,
    pub transport_mode: TransportMode,

    pub origin_branch_id: Option<Uuid>,
    pub destination_branch_id: Option<Uuid>,
    pub current_branch_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,

    pub base_price: Decimal,
    pub weight_charge: Decimal,
    pub service_charge: Decimal,
    pub insurance_fee: Decimal,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub amount_paid: Option<Decimal>,

    pub status: ShipmentStatus,
    pub current_location: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub pickup_date: Option<DateTime<Utc>>,

    pub pod_signature: Option<String>,
    pub pod_photo_url: Option<String>,
    pub pod_receiver_name: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracking_event::Entity")]
    TrackingEvents,

    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::OriginBranchId",
        to = "super::branch::Column::Id"
    )]
    OriginBranch,

    #[sea_orm(
        belongs_to = "super::driver::Entity",
        from = "Column::AssignedDriverId",
        to = "super::driver::Column::Id"
    )]
    AssignedDriver,

    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::tracking_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingEvents.def()
    }
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OriginBranch.def()
    }
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedDriver.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert && !matches!(&active_model.id, ActiveValue::Set(id) if !id.is_nil()) {
            active_model.id = Set(Uuid::new_v4());
        }
        Ok(active_model)
    }
}

impl Model {
    /// Whether the delivery missed its estimate.
    pub fn is_delivery_late(&self) -> bool {
        match (self.status, self.estimated_delivery) {
            (ShipmentStatus::Delivered, Some(estimated)) => self
                .delivered_at
                .map(|delivered| delivered > estimated)
                .unwrap_or(false),
            (status, Some(estimated)) if status != ShipmentStatus::Cancelled => {
                Utc::now() > estimated
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_ranks_follow_the_canonical_sequence() {
        let sequence = [
            ShipmentStatus::Created,
            ShipmentStatus::ReceivedAtOrigin,
            ShipmentStatus::InTransit,
            ShipmentStatus::ArrivedAtDestination,
            ShipmentStatus::OutForDelivery,
            ShipmentStatus::Delivered,
        ];
        for (expected, status) in sequence.iter().enumerate() {
            assert_eq!(status.forward_rank(), Some(expected as u8));
        }
        assert_eq!(ShipmentStatus::Exception.forward_rank(), None);
        assert_eq!(ShipmentStatus::Returned.forward_rank(), None);
        assert_eq!(ShipmentStatus::Cancelled.forward_rank(), None);
    }

    #[test]
    fn progress_is_undefined_for_side_branches() {
        assert_eq!(ShipmentStatus::Created.progress_percent(), Some(10));
        assert_eq!(ShipmentStatus::InTransit.progress_percent(), Some(50));
        assert_eq!(ShipmentStatus::Delivered.progress_percent(), Some(100));
        assert_eq!(ShipmentStatus::Exception.progress_percent(), None);
        assert_eq!(ShipmentStatus::Returned.progress_percent(), None);
        assert_eq!(ShipmentStatus::Cancelled.progress_percent(), None);
    }

    #[test]
    fn status_round_trips_through_its_wire_value() {
        for status in [
            ShipmentStatus::Created,
            ShipmentStatus::ReceivedAtOrigin,
            ShipmentStatus::InTransit,
            ShipmentStatus::ArrivedAtDestination,
            ShipmentStatus::OutForDelivery,
            ShipmentStatus::Delivered,
            ShipmentStatus::Exception,
            ShipmentStatus::Returned,
            ShipmentStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ShipmentStatus>(), Ok(status));
        }
        assert!("lost_in_the_mail".parse::<ShipmentStatus>().is_err());
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(
            ShipmentStatus::ReceivedAtOrigin.label(),
            "Received at Origin"
        );
        assert_eq!(ShipmentStatus::OutForDelivery.label(), "Out for Delivery");
        assert_eq!(ShipmentStatus::Exception.label(), "Exception");
    }
}
