use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::models::shipment::{self, ShipmentStatus};

/// Aggregate figures shown on the dashboard and the reports page.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryReport {
    pub total_shipments: u64,
    pub delivered: u64,
    pub in_transit: u64,
    pub exceptions: u64,
    pub revenue: Decimal,
}

/// Count of shipments currently in one status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: ShipmentStatus,
    pub count: u64,
}

/// Service producing report aggregates over the shipments table
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn scoped(
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Select<shipment::Entity> {
        let mut query = shipment::Entity::find();
        if let Some(from) = from {
            query = query.filter(shipment::Column::CreatedAt.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(shipment::Column::CreatedAt.lte(to));
        }
        query
    }

    /// Headline totals over an optional creation-date range.
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<SummaryReport, ServiceError> {
        let db = &*self.db_pool;

        let total_shipments = Self::scoped(from, to).count(db).await?;
        let delivered = Self::scoped(from, to)
            .filter(shipment::Column::Status.eq(ShipmentStatus::Delivered))
            .count(db)
            .await?;
        let in_transit = Self::scoped(from, to)
            .filter(shipment::Column::Status.eq(ShipmentStatus::InTransit))
            .count(db)
            .await?;
        let exceptions = Self::scoped(from, to)
            .filter(shipment::Column::Status.eq(ShipmentStatus::Exception))
            .count(db)
            .await?;

        let revenue: Option<Decimal> = Self::scoped(from, to)
            .select_only()
            .column_as(shipment::Column::TotalAmount.sum(), "revenue")
            .into_tuple()
            .one(db)
            .await?
            .flatten();

        Ok(SummaryReport {
            total_shipments,
            delivered,
            in_transit,
            exceptions,
            revenue: revenue.unwrap_or(Decimal::ZERO),
        })
    }

    /// Shipment count per current status, over an optional date range.
    #[instrument(skip(self))]
    pub async fn status_breakdown(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<StatusCount>, ServiceError> {
        let rows: Vec<(ShipmentStatus, i64)> = Self::scoped(from, to)
            .select_only()
            .column(shipment::Column::Status)
            .column_as(shipment::Column::Id.count(), "count")
            .group_by(shipment::Column::Status)
            .into_tuple()
            .all(&*self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(status, count)| StatusCount {
                status,
                count: count.max(0) as u64,
            })
            .collect())
    }

    /// Most recently booked shipments for the dashboard.
    #[instrument(skip(self))]
    pub async fn recent_shipments(
        &self,
        limit: u64,
    ) -> Result<Vec<shipment::Model>, ServiceError> {
        let shipments = shipment::Entity::find()
            .order_by_desc(shipment::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(shipments)
    }
}
