use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A pricing rule scoped to an origin/destination zone pair.
///
/// The rule with both zones null is the default rule applied when no
/// narrower match exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[sea_orm(table_name = "pricing_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub origin_zone: Option<String>,
    pub destination_zone: Option<String>,

    pub base_price: Decimal,
    pub price_per_kg: Decimal,
    pub express_multiplier: Decimal,
    pub same_day_multiplier: Decimal,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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
