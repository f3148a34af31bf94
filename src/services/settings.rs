use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::models::setting;

/// Service for the key/value application settings store
#[derive(Clone)]
pub struct SettingsService {
    db_pool: Arc<DbPool>,
}

impl SettingsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, key: &str) -> Result<Option<setting::Model>, ServiceError> {
        let found = setting::Entity::find()
            .filter(setting::Column::Key.eq(key))
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<setting::Model>, ServiceError> {
        let settings = setting::Entity::find()
            .order_by_asc(setting::Column::Key)
            .all(&*self.db_pool)
            .await?;
        Ok(settings)
    }

    /// Creates or replaces the value stored under `key`.
    #[instrument(skip(self, value))]
    pub async fn upsert(
        &self,
        key: &str,
        value: serde_json::Value,
        description: Option<String>,
        updated_by: Option<Uuid>,
    ) -> Result<setting::Model, ServiceError> {
        let now = Utc::now();
        match self.get(key).await? {
            Some(existing) => {
                let mut active: setting::ActiveModel = existing.into();
                active.value = Set(value);
                if description.is_some() {
                    active.description = Set(description);
                }
                active.updated_by = Set(updated_by);
                active.updated_at = Set(now);
                Ok(active.update(&*self.db_pool).await?)
            }
            None => {
                let new_setting = setting::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value),
                    description: Set(description),
                    updated_by: Set(updated_by),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                Ok(new_setting.insert(&*self.db_pool).await?)
            }
        }
    }
}
