use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A physical branch office / depot.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[sea_orm(table_name = "branches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Short unique code used on scans and reports.
    #[sea_orm(unique)]
    #[validate(length(min = 2, max = 16))]
    pub code: String,

    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::driver::Entity")]
    Drivers,
}

impl Related<super::driver::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drivers.def()
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
