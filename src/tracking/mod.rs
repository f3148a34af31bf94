//! Shipment lifecycle engine: the pure logic shared by the public tracking
//! page, the admin detail view and the exported reports.
//!
//! Nothing in this module performs I/O. The persistence side lives in
//! [`crate::services::shipments`].

pub mod route;
pub mod timeline;
pub mod transitions;

pub use route::{route_stops, RouteStop};
pub use timeline::{project, TimelineEntry};
pub use transitions::{validate_transition, InvalidTransition};
