use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shipment::ShipmentStatus;

/// One immutable milestone record in a shipment's history.
///
/// Events are append-only: they are created exactly once per status
/// transition and never updated or reassigned. Ordered by `created_at`
/// ascending they form the authoritative history; the last event determines
/// the shipment's current status.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracking_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub shipment_id: Uuid,

    /// Status this event transitions the shipment *to*.
    pub status: ShipmentStatus,

    /// Mirrors the status, or a finer-grained scan type.
    pub event_type: String,

    pub location: Option<String>,
    pub branch_id: Option<Uuid>,
    pub description: Option<String>,
    pub notes: Option<String>,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shipment::Entity",
        from = "Column::ShipmentId",
        to = "super::shipment::Column::Id",
        on_delete = "Cascade"
    )]
    Shipment,

    #[sea_orm(
        belongs_to = "super::branch::Entity",
        from = "Column::BranchId",
        to = "super::branch::Column::Id"
    )]
    Branch,
}

impl Related<super::shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipment.def()
    }
}

impl Related<super::branch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Branch.def()
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
