use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::customer;

/// Fields accepted when registering or editing a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub company: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_customer(
        &self,
        input: CustomerInput,
    ) -> Result<customer::Model, ServiceError> {
        let now = Utc::now();
        let new_customer = customer::ActiveModel {
            user_id: Set(None),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            company: Set(input.company),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = new_customer.insert(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::CustomerCreated(created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Option<customer::Model>, ServiceError> {
        let found = customer::Entity::find_by_id(customer_id)
            .one(&*self.db_pool)
            .await?;
        Ok(found)
    }

    /// Lists customers with pagination and an optional name search.
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        limit: u64,
        search: Option<String>,
    ) -> Result<(Vec<customer::Model>, u64), ServiceError> {
        let mut query = customer::Entity::find();
        if let Some(needle) = search.filter(|s| !s.trim().is_empty()) {
            query = query.filter(customer::Column::Name.contains(needle.trim()));
        }
        let paginator = query
            .order_by_asc(customer::Column::Name)
            .paginate(&*self.db_pool, limit);
        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((customers, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: CustomerInput,
        is_active: Option<bool>,
    ) -> Result<customer::Model, ServiceError> {
        let model = customer::Entity::find_by_id(customer_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", customer_id)))?;

        let mut active: customer::ActiveModel = model.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.company = Set(input.company);
        active.address = Set(input.address);
        active.city = Set(input.city);
        active.state = Set(input.state);
        active.country = Set(input.country);
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&*self.db_pool).await?;
        self.event_sender
            .send_or_log(Event::CustomerUpdated(updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), ServiceError> {
        let result = customer::Entity::delete_by_id(customer_id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Customer {} not found",
                customer_id
            )));
        }
        Ok(())
    }
}
