use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{branch, driver};

/// Fields accepted when registering or editing a driver.
#[derive(Debug, Clone)]
pub struct DriverInput {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>,
    pub branch_id: Option<Uuid>,
}

/// Service for managing delivery drivers
#[derive(Clone)]
pub struct DriverService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DriverService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn check_branch(&self, branch_id: Option<Uuid>) -> Result<(), ServiceError> {
        if let Some(branch_id) = branch_id {
            branch::Entity::find_by_id(branch_id)
                .one(&*self.db_pool)
                .await?
                .ok_or_else(|| {
                    ServiceError::ValidationError(format!("Branch {} does not exist", branch_id))
                })?;
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_driver(&self, input: DriverInput) -> Result<driver::Model, ServiceError> {
        self.check_branch(input.branch_id).await?;

        let now = Utc::now();
        let new_driver = driver::ActiveModel {
            user_id: Set(None),
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            license_number: Set(input.license_number),
            vehicle_type: Set(input.vehicle_type),
            vehicle_plate: Set(input.vehicle_plate),
            branch_id: Set(input.branch_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = new_driver.insert(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::DriverCreated(created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_driver(&self, driver_id: Uuid) -> Result<Option<driver::Model>, ServiceError> {
        let found = driver::Entity::find_by_id(driver_id)
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Lists drivers with pagination, optionally scoped to one branch.
    #[instrument(skip(self))]
    pub async fn list_drivers(
        &self,
        page: u64,
        limit: u64,
        branch_id: Option<Uuid>,
    ) -> Result<(Vec<driver::Model>, u64), ServiceError> {
        let mut query = driver::Entity::find();
        if let Some(branch_id) = branch_id {
            query = query.filter(driver::Column::BranchId.eq(branch_id));
        }
        let paginator = query
            .order_by_asc(driver::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let drivers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((drivers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_driver(
        &self,
        driver_id: Uuid,
        input: DriverInput,
        is_active: Option<bool>,
    ) -> Result<driver::Model, ServiceError> {
        self.check_branch(input.branch_id).await?;

        let model = driver::Entity::find_by_id(driver_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Driver {} not found", driver_id)))?;

        let mut active: driver::ActiveModel = model.into();
        active.name = Set(input.name);
        active.phone = Set(input.phone);
        active.email = Set(input.email);
        active.license_number = Set(input.license_number);
        active.vehicle_type = Set(input.vehicle_type);
        active.vehicle_plate = Set(input.vehicle_plate);
        active.branch_id = Set(input.branch_id);
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::DriverUpdated(updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_driver(&self, driver_id: Uuid) -> Result<(), ServiceError> {
        let result = driver::Entity::delete_by_id(driver_id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Driver {} not found",
                driver_id
            )));
        }
        Ok(())
    }
}
