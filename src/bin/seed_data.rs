//! Seeds a development database with an admin account, the default pricing
//! rule, a demo branch and one shipment with a short scan history.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use tracing::info;

use swiftship_api as api;
use swiftship_api::auth::user::Role;
use swiftship_api::models::shipment::{ServiceLevel, ShipmentStatus, TransportMode};
use swiftship_api::services::branches::BranchInput;
use swiftship_api::services::shipments::{CreateShipmentInput, RecordStatusOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    let db = Arc::new(api::db::establish_connection_from_app_config(&cfg).await?);
    api::db::run_migrations(&db).await?;

    let (event_tx, event_rx) = mpsc::channel(64);
    let event_sender = Arc::new(api::events::EventSender::new(event_tx));
    tokio::spawn(api::events::process_events(event_rx));

    let services = api::handlers::AppServices::new(db.clone(), event_sender);

    // Admin account
    let now = Utc::now();
    let admin = api::auth::user::ActiveModel {
        email: Set("admin@swiftship.example".to_string()),
        password_hash: Set(api::auth::AuthService::hash_password("swiftship-admin")?),
        display_name: Set("Administrator".to_string()),
        role: Set(Role::Admin),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let admin = admin.insert(&*db).await?;
    info!(email = %admin.email, "seeded admin account");

    // Default pricing rule
    let rule = services
        .pricing
        .create_rule(
            "Default".to_string(),
            None,
            None,
            dec!(15),
            dec!(5),
            dec!(1.5),
            dec!(2.0),
        )
        .await?;
    info!(rule_id = %rule.id, "seeded default pricing rule");

    // Demo branch
    let branch = services
        .branches
        .create_branch(BranchInput {
            name: "New York Hub".to_string(),
            code: "NYC01".to_string(),
            address: "250 Hudson St".to_string(),
            city: "New York".to_string(),
            state: Some("NY".to_string()),
            country: "US".to_string(),
            phone: Some("+1-212-555-0100".to_string()),
            email: Some("nyc@swiftship.example".to_string()),
            latitude: Some(40.726),
            longitude: Some(-74.007),
        })
        .await?;
    info!(branch_id = %branch.id, "seeded demo branch");

    // Demo shipment with a short history
    let quote = services
        .pricing
        .quote(2.5, ServiceLevel::Express, Some(dec!(120)))
        .await?;
    let shipment = services
        .shipments
        .create_shipment(
            CreateShipmentInput {
                sender_name: "Ada Martin".to_string(),
                sender_phone: "+1-212-555-0142".to_string(),
                sender_email: Some("ada@example.com".to_string()),
                sender_address: "1 Liberty Plaza".to_string(),
                sender_city: "New York".to_string(),
                sender_state: Some("NY".to_string()),
                receiver_name: "John Doe".to_string(),
                receiver_phone: "+1-310-555-0175".to_string(),
                receiver_email: None,
                receiver_address: "600 Sunset Blvd".to_string(),
                receiver_city: "Los Angeles".to_string(),
                receiver_state: Some("CA".to_string()),
                delivery_address: None,
                delivery_city: None,
                delivery_state: None,
                package_description: Some("Books".to_string()),
                weight_kg: 2.5,
                dimensions_cm: Some("30x20x10".to_string()),
                declared_value: Some(dec!(120)),
                service_level: ServiceLevel::Express,
                transport_mode: TransportMode::Road,
                origin_branch_id: Some(branch.id),
                destination_branch_id: None,
                customer_id: None,
                estimated_delivery: None,
                pickup_date: None,
                notes: None,
                created_by: Some(admin.id),
            },
            quote,
        )
        .await?;

    services
        .shipments
        .record_status(
            shipment.id,
            ShipmentStatus::ReceivedAtOrigin,
            RecordStatusOptions {
                location: Some("New York, NY".to_string()),
                branch_id: Some(branch.id),
                recorded_by: Some(admin.id),
                ..Default::default()
            },
        )
        .await?;
    services
        .shipments
        .record_status(
            shipment.id,
            ShipmentStatus::InTransit,
            RecordStatusOptions {
                location: Some("Phoenix, AZ".to_string()),
                recorded_by: Some(admin.id),
                ..Default::default()
            },
        )
        .await?;

    info!(
        tracking_number = %shipment.tracking_number,
        "seeded demo shipment"
    );
    println!("demo tracking number: {}", shipment.tracking_number);

    Ok(())
}
