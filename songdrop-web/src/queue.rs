//! Request queue manager with database persistence
//!
//! **Responsibilities:**
//! - Queue mutations (submit, mark played, mark skipped, reorder)
//! - Queue queries (public queue, admin queue)
//! - Ordering rank assignment and the status state machine
//!
//! All mutations are serialized through a single write guard so concurrent
//! HTTP handlers can never produce duplicate ranks or lost updates. Readers
//! query the pool directly; WAL keeps their snapshots untorn.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use songdrop_common::db::models::ANONYMOUS_NAME;
use songdrop_common::{Error, RequestStatus, Result, SongRequest};

/// Submission input, before validation and normalization
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub name: Option<String>,
    pub song_title: String,
    pub payment_reference: Option<String>,
}

/// Public projection of a pending request: no id, no status, no rank
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicEntry {
    pub name: String,
    #[serde(rename = "songTitle")]
    pub song_title: String,
}

/// Row shape shared by every `requests` query
type RequestRow = (
    String,
    String,
    String,
    String,
    i64,
    Option<String>,
    DateTime<Utc>,
);

const REQUEST_COLUMNS: &str =
    "id, requester_name, song_title, status, display_order, payment_reference, created_at";

fn row_to_request(row: RequestRow) -> Result<SongRequest> {
    let id = Uuid::parse_str(&row.0)
        .map_err(|e| Error::Internal(format!("Corrupt request id {:?}: {}", row.0, e)))?;
    let status = RequestStatus::parse(&row.3)
        .ok_or_else(|| Error::Internal(format!("Corrupt request status {:?}", row.3)))?;

    Ok(SongRequest {
        id,
        requester_name: row.1,
        song_title: row.2,
        status,
        display_order: row.4,
        payment_reference: row.5,
        created_at: row.6,
    })
}

/// Queue manager owns the authoritative request collection
pub struct QueueManager {
    db: SqlitePool,
    /// Serializes submit / mark / reorder; readers never take it
    write_guard: Mutex<()>,
}

impl QueueManager {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            write_guard: Mutex::new(()),
        }
    }

    /// Submit a new song request.
    ///
    /// Validates the title, rejects reused payment references before any
    /// insert, normalizes an empty name to "Anonymous", and appends at the
    /// end of the queue: rank = highest existing rank + 1 (0 when empty),
    /// so ascending rank is arrival order.
    pub async fn submit(&self, new: NewRequest) -> Result<SongRequest> {
        let song_title = new.song_title.trim().to_string();
        if song_title.is_empty() {
            return Err(Error::Validation("songTitle is required".to_string()));
        }

        let requester_name = match new.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => ANONYMOUS_NAME.to_string(),
        };

        let _guard = self.write_guard.lock().await;

        if let Some(reference) = new.payment_reference.as_deref() {
            let existing: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE payment_reference = ?")
                    .bind(reference)
                    .fetch_one(&self.db)
                    .await?;
            if existing > 0 {
                return Err(Error::DuplicateReference(reference.to_string()));
            }
        }

        // Rank over all rows, not just pending, so arrival order stays
        // stable even after earlier entries went terminal
        let display_order: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(display_order) + 1, 0) FROM requests")
                .fetch_one(&self.db)
                .await?;

        let request = SongRequest {
            id: Uuid::new_v4(),
            requester_name,
            song_title,
            status: RequestStatus::Pending,
            display_order,
            payment_reference: new.payment_reference,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO requests (
                id, requester_name, song_title, status, display_order,
                payment_reference, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id.to_string())
        .bind(&request.requester_name)
        .bind(&request.song_title)
        .bind(request.status.as_str())
        .bind(request.display_order)
        .bind(&request.payment_reference)
        .bind(request.created_at)
        .execute(&self.db)
        .await?;

        info!(
            "Song request {} submitted at rank {}: {:?} by {:?}",
            request.id, request.display_order, request.song_title, request.requester_name
        );
        Ok(request)
    }

    /// Pending requests in display order, projected for the public page
    pub async fn public_queue(&self) -> Result<Vec<PublicEntry>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT requester_name, song_title FROM requests \
             WHERE status = 'pending' ORDER BY display_order ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, song_title)| PublicEntry { name, song_title })
            .collect())
    }

    /// Full records for the admin dashboard: pending first by rank, then
    /// the played/skipped history
    pub async fn admin_queue(&self) -> Result<Vec<SongRequest>> {
        let rows: Vec<RequestRow> = sqlx::query_as(&format!(
            "SELECT {} FROM requests \
             ORDER BY (status = 'pending') DESC, display_order ASC, created_at ASC",
            REQUEST_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_request).collect()
    }

    /// Fetch one request by id
    pub async fn get(&self, id: Uuid) -> Result<SongRequest> {
        let row: Option<RequestRow> = sqlx::query_as(&format!(
            "SELECT {} FROM requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row_to_request(row),
            None => Err(Error::NotFound(format!("No request with id {}", id))),
        }
    }

    /// Mark a request played. Idempotent on already-played requests;
    /// rejects skipped requests (conflicting terminal outcome).
    pub async fn mark_played(&self, id: Uuid) -> Result<SongRequest> {
        self.transition(id, RequestStatus::Played).await
    }

    /// Mark a request skipped, symmetric to [`mark_played`](Self::mark_played)
    pub async fn mark_skipped(&self, id: Uuid) -> Result<SongRequest> {
        self.transition(id, RequestStatus::Skipped).await
    }

    async fn transition(&self, id: Uuid, target: RequestStatus) -> Result<SongRequest> {
        let _guard = self.write_guard.lock().await;

        let mut request = self.get(id).await?;

        if request.status == target {
            // Same-state repeat, e.g. a double-clicked button
            debug!("Request {} already {}", id, target);
            return Ok(request);
        }
        if !request.status.can_become(target) {
            return Err(Error::Conflict(format!(
                "Request {} is {} and cannot become {}",
                id, request.status, target
            )));
        }

        // display_order is left untouched; it is vestigial once terminal
        sqlx::query("UPDATE requests SET status = ? WHERE id = ?")
            .bind(target.as_str())
            .bind(id.to_string())
            .execute(&self.db)
            .await?;

        request.status = target;
        info!("Marked request {} ({:?}) as {}", id, request.song_title, target);
        Ok(request)
    }

    /// Reassign ranks from a caller-supplied desired order.
    ///
    /// Each known pending id gets `display_order = position` (0-based).
    /// Unknown and terminal ids are ignored; pending ids omitted from the
    /// list keep their previous rank. The whole reassignment happens inside
    /// one transaction: all supplied ids get their new rank or none do.
    ///
    /// Returns the number of requests whose rank was updated.
    pub async fn reorder(&self, ordered_ids: &[Uuid]) -> Result<usize> {
        let _guard = self.write_guard.lock().await;

        let mut tx = self.db.begin().await?;
        let mut updated = 0usize;

        for (position, id) in ordered_ids.iter().enumerate() {
            let result =
                sqlx::query("UPDATE requests SET display_order = ? WHERE id = ? AND status = 'pending'")
                    .bind(position as i64)
                    .bind(id.to_string())
                    .execute(&mut *tx)
                    .await?;
            updated += result.rows_affected() as usize;
        }

        tx.commit().await?;

        debug!("Reordered queue: {} of {} ids updated", updated, ordered_ids.len());
        Ok(updated)
    }
}
