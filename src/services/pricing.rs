use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::pricing_rule;
use crate::models::shipment::ServiceLevel;

/// Fallback rates when no default pricing rule is configured.
const FALLBACK_BASE_PRICE: Decimal = dec!(15);
const FALLBACK_PRICE_PER_KG: Decimal = dec!(5);
const FALLBACK_EXPRESS_MULTIPLIER: Decimal = dec!(1.5);
const FALLBACK_SAME_DAY_MULTIPLIER: Decimal = dec!(2.0);
const INSURANCE_RATE: Decimal = dec!(0.02);

/// Itemized shipping charges for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Quote {
    pub base_price: Decimal,
    pub weight_charge: Decimal,
    pub service_charge: Decimal,
    pub insurance_fee: Decimal,
    pub total_amount: Decimal,
}

/// Service for pricing rules and shipping quotes
#[derive(Clone)]
pub struct PricingService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PricingService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// The active default rule: both zones null. None means fallback rates.
    async fn default_rule(&self) -> Result<Option<pricing_rule::Model>, ServiceError> {
        let rule = pricing_rule::Entity::find()
            .filter(pricing_rule::Column::IsActive.eq(true))
            .filter(pricing_rule::Column::OriginZone.is_null())
            .filter(pricing_rule::Column::DestinationZone.is_null())
            .order_by_desc(pricing_rule::Column::UpdatedAt)
            .one(&*self.db_pool)
            .await?;
        Ok(rule)
    }

    /// Computes an itemized quote.
    ///
    /// `service_charge` is the surcharge over the standard rate, so a
    /// standard shipment always carries a zero service charge:
    /// `(base + weight_charge) * (multiplier - 1)`. Insurance is a flat 2%
    /// of the declared value.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        weight_kg: f64,
        service_level: ServiceLevel,
        declared_value: Option<Decimal>,
    ) -> Result<Quote, ServiceError> {
        if weight_kg < 0.0 {
            return Err(ServiceError::ValidationError(
                "weight must not be negative".to_string(),
            ));
        }
        let weight = Decimal::try_from(weight_kg)
            .map_err(|_| ServiceError::ValidationError("weight is not a number".to_string()))?;

        let rule = self.default_rule().await?;
        let (base_price, price_per_kg, express_multiplier, same_day_multiplier) = match &rule {
            Some(rule) => (
                rule.base_price,
                rule.price_per_kg,
                rule.express_multiplier,
                rule.same_day_multiplier,
            ),
            None => (
                FALLBACK_BASE_PRICE,
                FALLBACK_PRICE_PER_KG,
                FALLBACK_EXPRESS_MULTIPLIER,
                FALLBACK_SAME_DAY_MULTIPLIER,
            ),
        };

        let multiplier = match service_level {
            ServiceLevel::Standard => Decimal::ONE,
            ServiceLevel::Express => express_multiplier,
            ServiceLevel::SameDay => same_day_multiplier,
        };

        let weight_charge = weight * price_per_kg;
        let service_charge = (base_price + weight_charge) * (multiplier - Decimal::ONE);
        let insurance_fee = declared_value.unwrap_or(Decimal::ZERO) * INSURANCE_RATE;
        let total_amount = base_price + weight_charge + service_charge + insurance_fee;

        Ok(Quote {
            base_price,
            weight_charge,
            service_charge,
            insurance_fee,
            total_amount,
        })
    }

    /// Creates a pricing rule
    #[instrument(skip(self))]
    pub async fn create_rule(
        &self,
        name: String,
        origin_zone: Option<String>,
        destination_zone: Option<String>,
        base_price: Decimal,
        price_per_kg: Decimal,
        express_multiplier: Decimal,
        same_day_multiplier: Decimal,
    ) -> Result<pricing_rule::Model, ServiceError> {
        let now = Utc::now();
        let rule = pricing_rule::ActiveModel {
            name: Set(name),
            origin_zone: Set(origin_zone),
            destination_zone: Set(destination_zone),
            base_price: Set(base_price),
            price_per_kg: Set(price_per_kg),
            express_multiplier: Set(express_multiplier),
            same_day_multiplier: Set(same_day_multiplier),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = rule.insert(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::PricingRuleChanged(created.id))
            .await;
        Ok(created)
    }

    /// Updates mutable fields of a pricing rule
    #[instrument(skip(self))]
    pub async fn update_rule(
        &self,
        rule_id: Uuid,
        base_price: Option<Decimal>,
        price_per_kg: Option<Decimal>,
        express_multiplier: Option<Decimal>,
        same_day_multiplier: Option<Decimal>,
        is_active: Option<bool>,
    ) -> Result<pricing_rule::Model, ServiceError> {
        let rule = pricing_rule::Entity::find_by_id(rule_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Pricing rule {} not found", rule_id)))?;

        let mut active: pricing_rule::ActiveModel = rule.into();
        if let Some(value) = base_price {
            active.base_price = Set(value);
        }
        if let Some(value) = price_per_kg {
            active.price_per_kg = Set(value);
        }
        if let Some(value) = express_multiplier {
            active.express_multiplier = Set(value);
        }
        if let Some(value) = same_day_multiplier {
            active.same_day_multiplier = Set(value);
        }
        if let Some(value) = is_active {
            active.is_active = Set(value);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::PricingRuleChanged(updated.id))
            .await;
        Ok(updated)
    }

    /// Lists all pricing rules
    #[instrument(skip(self))]
    pub async fn list_rules(&self) -> Result<Vec<pricing_rule::Model>, ServiceError> {
        let rules = pricing_rule::Entity::find()
            .order_by_asc(pricing_rule::Column::Name)
            .all(&*self.db_pool)
            .await?;
        Ok(rules)
    }

    /// Deletes a pricing rule
    #[instrument(skip(self))]
    pub async fn delete_rule(&self, rule_id: Uuid) -> Result<(), ServiceError> {
        let result = pricing_rule::Entity::delete_by_id(rule_id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Pricing rule {} not found",
                rule_id
            )));
        }
        Ok(())
    }
}
