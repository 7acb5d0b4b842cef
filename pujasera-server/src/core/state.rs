use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::notify::{LogNotifier, NotificationTrigger, StatusNotification};

/// Shared server state - one cloneable handle over all services
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Configuration (immutable) |
/// | db | Surreal<Db> | Embedded document store |
/// | jwt_service | Arc<JwtService> | JWT authentication |
/// | notifier | Arc<dyn NotificationTrigger> | Customer notification boundary |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
    /// Customer notification boundary (fire-and-forget)
    pub notifier: Arc<dyn NotificationTrigger>,
}

impl ServerState {
    /// Build state from pre-constructed services
    ///
    /// Used by tests to inject an in-memory database or a capturing
    /// notifier; production code uses [`ServerState::initialize`].
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        notifier: Arc<dyn NotificationTrigger>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            notifier,
        }
    }

    /// Initialize server state
    ///
    /// 1. Ensure the work directory structure exists
    /// 2. Open the embedded database (work_dir/database/pujasera.db)
    /// 3. Construct services (JWT, notifier)
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be
    /// initialized; the server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("pujasera.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::new(
            config.clone(),
            db_service.db,
            Arc::new(JwtService::new(config.jwt.clone())),
            Arc::new(LogNotifier),
        )
    }

    /// Start background tasks
    ///
    /// Must be called before `Server::run()`. Spawns the intake worker
    /// that drains the intake queue into parent/sub-order documents.
    pub fn start_background_tasks(&self) {
        let worker = crate::orders::IntakeWorker::new(self.clone());
        tokio::spawn(worker.run());
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Fire-and-forget customer notification after a status transition
    ///
    /// Failures are logged and never propagated: notification is
    /// best-effort and must not roll back or fail the transition that
    /// triggered it.
    pub fn notify_status_change(&self, notification: StatusNotification) {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.order_status_changed(&notification).await {
                tracing::warn!(
                    receipt_number = notification.receipt_number,
                    error = %e,
                    "Customer notification failed"
                );
            }
        });
    }
}
