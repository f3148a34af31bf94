pub mod auth;
pub mod branches;
pub mod customers;
pub mod drivers;
pub mod pricing;
pub mod reports;
pub mod settings;
pub mod shipments;

use std::sync::Arc;

use crate::db::DbPool;
use crate::events::EventSender;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub shipments: Arc<crate::services::shipments::ShipmentService>,
    pub pricing: Arc<crate::services::pricing::PricingService>,
    pub branches: Arc<crate::services::branches::BranchService>,
    pub drivers: Arc<crate::services::drivers::DriverService>,
    pub customers: Arc<crate::services::customers::CustomerService>,
    pub reports: Arc<crate::services::reports::ReportService>,
    pub settings: Arc<crate::services::settings::SettingsService>,
}

impl AppServices {
    /// Builds the service container shared by every handler.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            shipments: Arc::new(crate::services::shipments::ShipmentService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            pricing: Arc::new(crate::services::pricing::PricingService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            branches: Arc::new(crate::services::branches::BranchService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            drivers: Arc::new(crate::services::drivers::DriverService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            customers: Arc::new(crate::services::customers::CustomerService::new(
                db_pool.clone(),
                event_sender,
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(
                db_pool.clone(),
            )),
            settings: Arc::new(crate::services::settings::SettingsService::new(db_pool)),
        }
    }
}
