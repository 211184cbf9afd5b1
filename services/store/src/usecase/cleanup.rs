use chrono::{DateTime, Utc};

use crate::domain::repository::{DelayedTaskRepository, OrderRepository};
use crate::domain::types::{DelayedTask, PurgeOrderPayload, TASK_PURGE_ORDER};
use crate::error::StoreServiceError;

/// Tasks picked up per sweep.
pub const SWEEP_BATCH: u64 = 20;

/// One sweep of the delayed-task consumer.
///
/// Each due task is claimed with an atomic conditional update before it is
/// executed, so concurrent consumers process a given task exactly once. The
/// purge itself is idempotent; the claim protects the task bookkeeping.
pub struct ProcessDueTasksUseCase<T: DelayedTaskRepository, O: OrderRepository> {
    pub tasks: T,
    pub orders: O,
    pub retry_delay: chrono::Duration,
    pub max_attempts: i32,
}

impl<T: DelayedTaskRepository, O: OrderRepository> ProcessDueTasksUseCase<T, O> {
    /// Returns the number of tasks completed this sweep.
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<u32, StoreServiceError> {
        let due = self.tasks.due(now, SWEEP_BATCH).await?;
        let mut completed = 0;
        for task in due {
            if !self.tasks.claim(task.id, now).await? {
                continue;
            }
            match self.run(&task).await {
                Ok(()) => {
                    self.tasks.mark_completed(task.id).await?;
                    completed += 1;
                }
                Err(e) => {
                    let message = e.to_string();
                    if task.attempts + 1 >= self.max_attempts {
                        tracing::warn!(task_id = %task.id, error = %message, "delayed task failed for good");
                        self.tasks.mark_failed(task.id, &message).await?;
                    } else {
                        self.tasks
                            .retry_later(task.id, &message, now + self.retry_delay)
                            .await?;
                    }
                }
            }
        }
        Ok(completed)
    }

    async fn run(&self, task: &DelayedTask) -> Result<(), StoreServiceError> {
        match task.kind.as_str() {
            TASK_PURGE_ORDER => {
                let payload: PurgeOrderPayload = serde_json::from_value(task.payload.clone())
                    .map_err(|e| anyhow::anyhow!("bad purge_order payload: {e}"))?;
                self.orders.purge(payload.order_id).await
            }
            other => Err(anyhow::anyhow!("unknown task kind {other:?}").into()),
        }
    }
}
