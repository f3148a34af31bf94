pub mod branch;
pub mod customer;
pub mod driver;
pub mod pricing_rule;
pub mod setting;
pub mod shipment;
pub mod tracking_event;

pub use shipment::{PaymentStatus, ServiceLevel, ShipmentStatus, TransportMode};
