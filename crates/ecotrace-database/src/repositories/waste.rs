//! Waste-item repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use ecotrace_core::error::{AppError, ErrorKind};
use ecotrace_core::result::AppResult;
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_entity::waste::model::CreateWasteItem;
use ecotrace_entity::waste::{ValorizationOutcome, WasteItem, WasteItemStatus};

/// Repository for waste-item CRUD and valorization transitions.
#[derive(Debug, Clone)]
pub struct WasteRepository {
    pool: PgPool,
}

impl WasteRepository {
    /// Create a new waste repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a waste item by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<WasteItem>> {
        sqlx::query_as::<_, WasteItem>("SELECT * FROM waste_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find waste item", e))
    }

    /// List items in a given processing state, oldest first so technicians
    /// work the backlog in arrival order.
    pub async fn find_by_status(
        &self,
        status: WasteItemStatus,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WasteItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waste_items WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count waste items", e)
            })?;

        let items = sqlx::query_as::<_, WasteItem>(
            "SELECT * FROM waste_items WHERE status = $1 \
             ORDER BY created_at ASC LIMIT $2 OFFSET $3",
        )
        .bind(status)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list waste items", e))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List every item of one collection.
    pub async fn find_by_collection(&self, collection_id: Uuid) -> AppResult<Vec<WasteItem>> {
        sqlx::query_as::<_, WasteItem>(
            "SELECT * FROM waste_items WHERE collection_id = $1 ORDER BY created_at ASC",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list collection items", e)
        })
    }

    /// List items a requester can see (those from their collections).
    pub async fn find_by_requester(
        &self,
        requester_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<WasteItem>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM waste_items w \
             JOIN collections c ON c.id = w.collection_id \
             WHERE c.requester_id = $1",
        )
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count waste items", e))?;

        let items = sqlx::query_as::<_, WasteItem>(
            "SELECT w.* FROM waste_items w \
             JOIN collections c ON c.id = w.collection_id \
             WHERE c.requester_id = $1 \
             ORDER BY w.created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(requester_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requester's items", e)
        })?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Insert one waste item.
    pub async fn create(&self, data: &CreateWasteItem) -> AppResult<WasteItem> {
        sqlx::query_as::<_, WasteItem>(
            "INSERT INTO waste_items \
                (collection_id, waste_type, category, description, quantity_kg, supplementary) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING *",
        )
        .bind(data.collection_id)
        .bind(data.waste_type)
        .bind(&data.category)
        .bind(&data.description)
        .bind(data.quantity_kg)
        .bind(data.supplementary)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create waste item", e))
    }

    /// Insert the batch of items produced by one delivery confirmation.
    pub async fn create_batch(&self, items: &[CreateWasteItem]) -> AppResult<Vec<WasteItem>> {
        let mut created = Vec::with_capacity(items.len());
        for item in items {
            created.push(self.create(item).await?);
        }
        Ok(created)
    }

    /// Start valorization: assign the technician and move to `en_cours`.
    /// Returns `None` if the item was not `nouveau`.
    pub async fn start(&self, id: Uuid, technician_id: Uuid) -> AppResult<Option<WasteItem>> {
        sqlx::query_as::<_, WasteItem>(
            "UPDATE waste_items \
             SET status = 'en_cours', technician_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'nouveau' \
             RETURNING *",
        )
        .bind(id)
        .bind(technician_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to start valorization", e))
    }

    /// Finalize valorization: record the outcome and move to `termine`.
    /// Returns `None` if the item was not `en_cours`, leaving a previously
    /// recorded outcome untouched.
    pub async fn finalize(
        &self,
        id: Uuid,
        outcome: ValorizationOutcome,
        quantity_valorized_kg: Option<f64>,
        yield_pct: Option<f64>,
        notes: Option<&str>,
    ) -> AppResult<Option<WasteItem>> {
        sqlx::query_as::<_, WasteItem>(
            "UPDATE waste_items \
             SET status = 'termine', outcome = $2, quantity_valorized_kg = $3, \
                 yield_pct = $4, technician_notes = $5, processed_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'en_cours' \
             RETURNING *",
        )
        .bind(id)
        .bind(outcome)
        .bind(quantity_valorized_kg)
        .bind(yield_pct)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to finalize valorization", e)
        })
    }

    /// Count items per processing state for dashboards.
    pub async fn count_by_status(&self, status: WasteItemStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM waste_items WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count waste items", e)
            })
    }

    /// Count items processed by a technician.
    pub async fn count_by_technician(&self, technician_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM waste_items WHERE technician_id = $1")
            .bind(technician_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count waste items", e)
            })
    }
}
