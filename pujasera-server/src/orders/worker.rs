//! Intake Worker
//!
//! Background task that drains the intake queue through fan-out. One
//! record at a time, oldest first; a record that keeps failing is
//! parked as dead-letter after the configured number of attempts so it
//! cannot block the queue.

use std::time::Duration;

use crate::core::ServerState;
use crate::db::models::IntakeRecord;
use crate::db::repository::{IntakeRepository, RepoError};
use crate::orders::{FanOutError, FanOutService};

pub struct IntakeWorker {
    state: ServerState,
}

impl IntakeWorker {
    pub fn new(state: ServerState) -> Self {
        Self { state }
    }

    /// Poll loop; runs for the lifetime of the server
    pub async fn run(self) {
        let interval = Duration::from_millis(self.state.config.intake_poll_interval_ms);
        tracing::info!(
            poll_interval_ms = self.state.config.intake_poll_interval_ms,
            "Intake worker started"
        );
        loop {
            match self.drain().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(processed = n, "Intake queue drained"),
                Err(e) => tracing::warn!(error = %e, "Intake queue poll failed"),
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Process queued records until the queue is empty
    ///
    /// Exposed separately from [`run`] so tests can drive the queue
    /// deterministically.
    pub async fn drain(&self) -> Result<usize, RepoError> {
        let repo = IntakeRepository::new(self.state.get_db());
        let fan_out = FanOutService::new(self.state.get_db());
        let max_attempts = self.state.config.fan_out_max_attempts as i32;

        let mut processed = 0;
        // Each record gets at most one attempt per pass; a failing
        // record is skipped for the rest of the pass so it cannot
        // block the records queued behind it
        let mut attempted: Vec<surrealdb::RecordId> = Vec::new();
        while let Some(record) = repo.next_pending_excluding(&attempted).await? {
            let Some(id) = record.id.clone() else { break };
            attempted.push(id);
            self.process(&repo, &fan_out, record, max_attempts).await;
            processed += 1;
        }
        Ok(processed)
    }

    async fn process(
        &self,
        repo: &IntakeRepository,
        fan_out: &FanOutService,
        record: IntakeRecord,
        max_attempts: i32,
    ) {
        let Some(id) = record.id.clone() else {
            return;
        };

        match fan_out.fan_out(&record).await {
            Ok(receipt_number) => {
                tracing::info!(
                    intake = %id,
                    venue = %record.venue,
                    receipt_number,
                    "Intake record fanned out"
                );
            }
            // An earlier attempt already expanded this record; drop it
            Err(FanOutError::AlreadyFannedOut) => {
                tracing::info!(intake = %id, "Intake record was already fanned out, dropping");
                if let Err(e) = repo.delete(&id).await {
                    tracing::warn!(intake = %id, error = %e, "Failed to drop duplicate intake record");
                }
            }
            // Retrying cannot fix an empty cart; park immediately
            Err(e @ FanOutError::EmptyCart) => {
                self.park(repo, &id, &e.to_string(), 0).await;
            }
            Err(e) => {
                self.park(repo, &id, &e.to_string(), max_attempts).await;
            }
        }
    }

    async fn park(&self, repo: &IntakeRepository, id: &surrealdb::RecordId, error: &str, max_attempts: i32) {
        match repo.record_failure(id, error, max_attempts).await {
            Ok(updated) if updated.dead_letter => {
                tracing::error!(
                    intake = %id,
                    attempts = updated.attempts,
                    error,
                    "Intake record dead-lettered"
                );
            }
            Ok(updated) => {
                tracing::warn!(
                    intake = %id,
                    attempts = updated.attempts,
                    error,
                    "Fan-out failed, will retry"
                );
            }
            Err(e) => {
                tracing::error!(intake = %id, error = %e, "Failed to record fan-out failure");
            }
        }
    }
}
