use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::state::AppState;
use crate::usecase::cleanup::ProcessDueTasksUseCase;

/// The single delayed-task consumer. Spawned once from `main`; the claim
/// guard in the repository keeps execution exactly-once even if a second
/// deployment runs its own consumer.
pub async fn run_cleanup_worker(
    state: AppState,
    poll: Duration,
    retry_delay: chrono::Duration,
    max_attempts: i32,
) {
    let usecase = ProcessDueTasksUseCase {
        tasks: state.task_repo(),
        orders: state.order_repo(),
        retry_delay,
        max_attempts,
    };
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match usecase.execute(Utc::now()).await {
            Ok(0) => {}
            Ok(n) => info!(completed = n, "processed delayed tasks"),
            Err(e) => error!(error = %e, "delayed task sweep failed"),
        }
    }
}
