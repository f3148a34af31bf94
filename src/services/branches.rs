use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::branch;

/// Fields accepted when registering or editing a branch.
#[derive(Debug, Clone)]
pub struct BranchInput {
    pub name: String,
    pub code: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Service for managing branch offices
#[derive(Clone)]
pub struct BranchService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl BranchService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a branch; codes are unique.
    #[instrument(skip(self, input))]
    pub async fn create_branch(&self, input: BranchInput) -> Result<branch::Model, ServiceError> {
        let existing = branch::Entity::find()
            .filter(branch::Column::Code.eq(input.code.clone()))
            .one(&*self.db_pool)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Branch code '{}' is already in use",
                input.code
            )));
        }

        let now = Utc::now();
        let new_branch = branch::ActiveModel {
            name: Set(input.name),
            code: Set(input.code),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            phone: Set(input.phone),
            email: Set(input.email),
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = new_branch.insert(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::BranchCreated(created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_branch(&self, branch_id: Uuid) -> Result<Option<branch::Model>, ServiceError> {
        let found = branch::Entity::find_by_id(branch_id)
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Lists branches with pagination
    #[instrument(skip(self))]
    pub async fn list_branches(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<branch::Model>, u64), ServiceError> {
        let paginator = branch::Entity::find()
            .order_by_asc(branch::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let branches = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((branches, total))
    }

    /// Updates a branch, including its active flag.
    #[instrument(skip(self, input))]
    pub async fn update_branch(
        &self,
        branch_id: Uuid,
        input: BranchInput,
        is_active: Option<bool>,
    ) -> Result<branch::Model, ServiceError> {
        let model = branch::Entity::find_by_id(branch_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Branch {} not found", branch_id)))?;

        let mut active: branch::ActiveModel = model.into();
        active.name = Set(input.name);
        active.code = Set(input.code);
        active.address = Set(input.address);
        active.city = Set(input.city);
        active.state = Set(input.state);
        active.country = Set(input.country);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.latitude = Set(input.latitude);
        active.longitude = Set(input.longitude);
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::BranchUpdated(updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_branch(&self, branch_id: Uuid) -> Result<(), ServiceError> {
        let result = branch::Entity::delete_by_id(branch_id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Branch {} not found",
                branch_id
            )));
        }
        Ok(())
    }
}
