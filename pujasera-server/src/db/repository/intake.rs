//! Intake Queue Repository
//!
//! Queue reads and failure bookkeeping for the intake worker. Enqueue
//! happens inside the intake transaction; successful dequeue happens
//! inside the fan-out transaction.

use super::{BaseRepository, RepoError, RepoResult, parse_ref};
use crate::db::models::IntakeRecord;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "intake_queue";

#[derive(Clone)]
pub struct IntakeRepository {
    base: BaseRepository,
}

impl IntakeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Oldest record still waiting for fan-out, across all venues
    pub async fn next_pending(&self) -> RepoResult<Option<IntakeRecord>> {
        self.next_pending_excluding(&[]).await
    }

    /// Oldest waiting record not in `skip`
    ///
    /// The worker passes the ids it already attempted this pass, so a
    /// failing record at the head of the queue cannot starve the
    /// records behind it.
    pub async fn next_pending_excluding(
        &self,
        skip: &[RecordId],
    ) -> RepoResult<Option<IntakeRecord>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM intake_queue WHERE dead_letter = false AND id NOT IN $skip \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("skip", skip.to_vec()))
            .await?;
        let records: Vec<IntakeRecord> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// Find intake record by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<IntakeRecord>> {
        let rid = parse_ref(TABLE, id)?;
        let record: Option<IntakeRecord> = self.base.db().select(rid).await?;
        Ok(record)
    }

    /// Record a fan-out failure; parks the record as dead-letter once
    /// `max_attempts` is reached
    pub async fn record_failure(
        &self,
        id: &RecordId,
        error: &str,
        max_attempts: i32,
    ) -> RepoResult<IntakeRecord> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET attempts += 1, last_error = $error, \
                 dead_letter = (attempts >= $max) RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("error", error.to_string()))
            .bind(("max", max_attempts))
            .await?;
        let records: Vec<IntakeRecord> = result.take(0)?;
        records
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Intake record {} not found", id)))
    }

    /// Remove an intake record outside the fan-out transaction. Used
    /// when a retry discovers the order was already fanned out.
    pub async fn delete(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $id")
            .bind(("id", id.clone()))
            .await?
            .check()
            .map_err(RepoError::from)?;
        Ok(())
    }

    /// Dead-lettered records for a venue, oldest first
    pub async fn find_dead_letter(&self, venue_id: &str) -> RepoResult<Vec<IntakeRecord>> {
        let venue = parse_ref("venue", venue_id)?;
        let records: Vec<IntakeRecord> = self
            .base
            .db()
            .query(
                "SELECT * FROM intake_queue WHERE venue = $venue AND dead_letter = true \
                 ORDER BY created_at ASC",
            )
            .bind(("venue", venue))
            .await?
            .take(0)?;
        Ok(records)
    }
}
