//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::info;

use coedit_core::config::worker::WorkerConfig;
use coedit_core::error::AppError;
use coedit_service::SessionStore;

use crate::jobs::sweep;

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
    sessions: SessionStore,
    sweep_schedule: String,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("sweep_schedule", &self.sweep_schedule)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(config: &WorkerConfig, sessions: SessionStore) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            sessions,
            sweep_schedule: config.session_sweep_schedule.clone(),
        })
    }

    /// Register all scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_session_sweep().await?;
        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Idle session sweep on the configured cron expression.
    async fn register_session_sweep(&self) -> Result<(), AppError> {
        let sessions = self.sessions.clone();
        let job = CronJob::new_async(self.sweep_schedule.as_str(), move |_uuid, _lock| {
            let sessions = sessions.clone();
            Box::pin(async move {
                sweep::sweep_idle_sessions(&sessions).await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep job: {e}")))?;

        Ok(())
    }
}
