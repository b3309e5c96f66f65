//! Collection-request repository implementation.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use ecotrace_core::error::{AppError, ErrorKind};
use ecotrace_core::result::AppResult;
use ecotrace_core::types::pagination::{PageRequest, PageResponse};
use ecotrace_core::types::reference::ReferenceKind;
use ecotrace_entity::request::model::CreateRequest;
use ecotrace_entity::request::{CollectionRequest, RequestPriority, RequestStatus};

/// Maximum sequential reference candidates tried before the random fallback.
const MAX_REFERENCE_ATTEMPTS: usize = 50;

/// Repository for collection-request CRUD and status transitions.
///
/// Status updates are conditional on the expected source state so that a
/// concurrent decision loses cleanly instead of overwriting: the service
/// layer treats a zero-row update as an invalid transition.
#[derive(Debug, Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a request by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CollectionRequest>> {
        sqlx::query_as::<_, CollectionRequest>("SELECT * FROM collection_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find request", e))
    }

    /// List all requests, newest first.
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<CollectionRequest>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM collection_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count requests", e)
            })?;

        let requests = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list requests", e))?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List a requester's own requests, newest first.
    pub async fn find_by_requester(
        &self,
        requester_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<CollectionRequest>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM collection_requests WHERE requester_id = $1")
                .bind(requester_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count requests", e)
                })?;

        let requests = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE requester_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(requester_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requester's requests", e)
        })?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List requests in any of the given states, newest first.
    pub async fn find_by_statuses(
        &self,
        statuses: &[RequestStatus],
        page: &PageRequest,
    ) -> AppResult<PageResponse<CollectionRequest>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM collection_requests WHERE status = ANY($1)",
        )
        .bind(statuses)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))?;

        let requests = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE status = ANY($1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(statuses)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requests by status", e)
        })?;

        Ok(PageResponse::new(
            requests,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Create a new request with a freshly generated reference.
    ///
    /// Sequential candidates (`COL-<year>-<nnn>`, counted per day) are tried
    /// first; after [`MAX_REFERENCE_ATTEMPTS`] unique-violation retries the
    /// random-suffix fallback guarantees termination.
    pub async fn create(&self, data: &CreateRequest) -> AppResult<CollectionRequest> {
        let year = Utc::now().year();

        for attempt in 0..MAX_REFERENCE_ATTEMPTS {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM collection_requests WHERE created_at::date = CURRENT_DATE",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count today's requests", e)
            })?;

            let reference = ReferenceKind::Request.sequential(year, count + 1 + attempt as i64);
            match self.insert(data, &reference).await {
                Ok(request) => return Ok(request),
                Err(e) if is_reference_collision(&e) => continue,
                Err(e) => return Err(e),
            }
        }

        let reference = ReferenceKind::Request.fallback(year);
        self.insert(data, &reference).await
    }

    async fn insert(&self, data: &CreateRequest, reference: &str) -> AppResult<CollectionRequest> {
        sqlx::query_as::<_, CollectionRequest>(
            "INSERT INTO collection_requests \
                (reference, requester_id, waste_type, description, quantity, mode, \
                 desired_date, time_slot, address, phone, special_instructions, photo_urls) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING *",
        )
        .bind(reference)
        .bind(data.requester_id)
        .bind(data.waste_type)
        .bind(&data.description)
        .bind(data.quantity)
        .bind(data.mode)
        .bind(data.desired_date)
        .bind(data.time_slot)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(&data.special_instructions)
        .bind(&data.photo_urls)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("collection_requests_reference_key") =>
            {
                AppError::conflict(format!("Reference '{reference}' already taken"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create request", e),
        })
    }

    /// Approve a pending request. Returns `None` if the request was no
    /// longer `EN_ATTENTE` (lost a concurrent decision).
    pub async fn approve(
        &self,
        id: Uuid,
        priority: RequestPriority,
        notes: Option<&str>,
    ) -> AppResult<Option<CollectionRequest>> {
        sqlx::query_as::<_, CollectionRequest>(
            "UPDATE collection_requests \
             SET status = 'APPROUVEE', priority = $2, admin_notes = $3, \
                 decided_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'EN_ATTENTE' \
             RETURNING *",
        )
        .bind(id)
        .bind(priority)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to approve request", e))
    }

    /// Reject a pending request with a motive. Returns `None` if the request
    /// was no longer `EN_ATTENTE`.
    pub async fn reject(
        &self,
        id: Uuid,
        motive: &str,
        notes: Option<&str>,
    ) -> AppResult<Option<CollectionRequest>> {
        sqlx::query_as::<_, CollectionRequest>(
            "UPDATE collection_requests \
             SET status = 'REJETEE', rejection_motive = $2, admin_notes = $3, \
                 decided_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND status = 'EN_ATTENTE' \
             RETURNING *",
        )
        .bind(id)
        .bind(motive)
        .bind(notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reject request", e))
    }

    /// Denormalize `PLANIFIEE` onto an approved request at scheduling time.
    /// Returns `None` if the request was not `APPROUVEE`.
    pub async fn mark_planned(&self, id: Uuid) -> AppResult<Option<CollectionRequest>> {
        sqlx::query_as::<_, CollectionRequest>(
            "UPDATE collection_requests \
             SET status = 'PLANIFIEE', updated_at = NOW() \
             WHERE id = $1 AND status = 'APPROUVEE' \
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark request planned", e))
    }

    /// Count requests per status for dashboards.
    pub async fn count_by_status(&self, status: RequestStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM collection_requests WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count requests", e)
            })
    }

    /// Count a requester's requests per status.
    pub async fn count_by_requester_and_status(
        &self,
        requester_id: Uuid,
        status: RequestStatus,
    ) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM collection_requests WHERE requester_id = $1 AND status = $2",
        )
        .bind(requester_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))
    }
}

/// Whether the error is a unique violation on the reference column.
fn is_reference_collision(err: &AppError) -> bool {
    err.kind == ErrorKind::Conflict && err.message.contains("Reference")
}
