//! Scheduled-collection repository implementation.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ecotrace_core::error::{AppError, ErrorKind};
use ecotrace_core::result::AppResult;
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_core::types::reference::ReferenceKind;
use ecotrace_entity::collection::model::CreateCollection;
use ecotrace_entity::collection::{Collection, CollectionStatus};

/// Maximum sequential reference candidates tried before the random fallback.
const MAX_REFERENCE_ATTEMPTS: usize = 50;

/// Repository for collection CRUD and the two-phase transport handshake.
///
/// Like the request repository, every status mutation is conditional on the
/// expected source state; the service layer maps a zero-row update to an
/// invalid-transition error.
#[derive(Debug, Clone)]
pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    /// Create a new collection repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a collection by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find collection", e))
    }

    /// Find the collection referencing a request, if any.
    pub async fn find_by_request(&self, request_id: Uuid) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE request_id = $1")
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find collection by request", e)
            })
    }

    /// List all collections, newest pickup first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Collection>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collections")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count collections", e)
            })?;

        let collections = sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections ORDER BY scheduled_date DESC, created_at DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list collections", e))?;

        Ok(PageResponse::new(
            collections,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a requester's collections.
    pub async fn find_by_requester(
        &self,
        requester_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Collection>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM collections WHERE requester_id = $1")
                .bind(requester_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count collections", e)
                })?;

        let collections = sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections WHERE requester_id = $1 \
             ORDER BY scheduled_date DESC LIMIT $2 OFFSET $3",
        )
        .bind(requester_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requester's collections", e)
        })?;

        Ok(PageResponse::new(
            collections,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List collections visible to a transporter: the ones assigned to them
    /// plus unassigned planned ones they could pick up.
    pub async fn find_for_transporter(
        &self,
        transporter_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Collection>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM collections \
             WHERE transporter_id = $1 \
                OR (transporter_id IS NULL AND status = 'PLANIFIEE')",
        )
        .bind(transporter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count collections", e))?;

        let collections = sqlx::query_as::<_, Collection>(
            "SELECT * FROM collections \
             WHERE transporter_id = $1 \
                OR (transporter_id IS NULL AND status = 'PLANIFIEE') \
             ORDER BY scheduled_date ASC LIMIT $2 OFFSET $3",
        )
        .bind(transporter_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list transporter collections", e)
        })?;

        Ok(PageResponse::new(
            collections,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Schedule a new collection with a freshly generated reference.
    ///
    /// The unique constraint on `request_id` enforces the one-to-one
    /// invariant at the storage layer; a violation surfaces as `Conflict`.
    pub async fn create(&self, data: &CreateCollection) -> AppResult<Collection> {
        let year = Utc::now().year();

        for attempt in 0..MAX_REFERENCE_ATTEMPTS {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM collections WHERE created_at::date = CURRENT_DATE",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count today's collections", e)
            })?;

            let reference = ReferenceKind::Collection.sequential(year, count + 1 + attempt as i64);
            match self.insert(data, &reference).await {
                Ok(collection) => return Ok(collection),
                Err(e) if is_reference_collision(&e) => continue,
                Err(e) => return Err(e),
            }
        }

        let reference = ReferenceKind::Collection.fallback(year);
        self.insert(data, &reference).await
    }

    async fn insert(&self, data: &CreateCollection, reference: &str) -> AppResult<Collection> {
        sqlx::query_as::<_, Collection>(
            "INSERT INTO collections \
                (reference, request_id, requester_id, transporter_id, scheduled_date, \
                 address, phone, instructions) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(reference)
        .bind(data.request_id)
        .bind(data.requester_id)
        .bind(data.transporter_id)
        .bind(data.scheduled_date)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.instructions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("collections_request_id_key") =>
            {
                AppError::conflict("A collection already references this request")
            }
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("collections_reference_key") =>
            {
                AppError::conflict(format!("Reference '{reference}' already taken"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create collection", e),
        })
    }

    /// Assign a transporter. Returns `None` if the collection left
    /// `PLANIFIEE` in the meantime.
    pub async fn assign_transporter(
        &self,
        id: Uuid,
        transporter_id: Uuid,
    ) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections SET transporter_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'PLANIFIEE' \
             RETURNING *",
        )
        .bind(id)
        .bind(transporter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign transporter", e))
    }

    /// Record receipt confirmation. Returns `None` if the collection was
    /// not `PLANIFIEE`.
    pub async fn confirm_reception(
        &self,
        id: Uuid,
        notes: Option<&str>,
    ) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections \
             SET status = 'EN_COURS', reception_notes = $2, received_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'PLANIFIEE' \
             RETURNING *",
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to confirm reception", e))
    }

    /// Record delivery confirmation. Returns `None` if the collection was
    /// not `EN_COURS`.
    pub async fn confirm_delivery(
        &self,
        id: Uuid,
        notes: &str,
    ) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections \
             SET status = 'TERMINEE', delivery_notes = $2, delivered_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'EN_COURS' \
             RETURNING *",
        )
        .bind(id)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to confirm delivery", e))
    }

    /// Cancel a collection from either non-terminal state. Returns `None`
    /// if the collection was already terminal.
    pub async fn cancel(&self, id: Uuid, motive: &str) -> AppResult<Option<Collection>> {
        sqlx::query_as::<_, Collection>(
            "UPDATE collections \
             SET status = 'ANNULEE', cancellation_motive = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('PLANIFIEE', 'EN_COURS') \
             RETURNING *",
        )
        .bind(id)
        .bind(motive)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to cancel collection", e))
    }

    /// Count collections per status for dashboards.
    pub async fn count_by_status(&self, status: CollectionStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM collections WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count collections", e)
            })
    }

    /// Count a transporter's assigned collections per status.
    pub async fn count_for_transporter(
        &self,
        transporter_id: Uuid,
        status: CollectionStatus,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM collections WHERE transporter_id = $1 AND status = $2",
        )
        .bind(transporter_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count collections", e))
    }

    /// Count unassigned planned collections (available work).
    pub async fn count_unassigned_planned(&self) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM collections WHERE transporter_id IS NULL AND status = 'PLANIFIEE'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count collections", e))
    }
}

/// Whether the error is a unique violation on the reference column.
fn is_reference_collision(err: &AppError) -> bool {
    err.kind == ErrorKind::Conflict && err.message.contains("Reference")
}
