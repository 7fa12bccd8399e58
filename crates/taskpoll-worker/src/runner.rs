//! Task runner - the poll, dispatch and report loop.
//!
//! One polling cadence runs per registered task type. Claimed tasks run on a
//! shared pool of `thread_count` slots; a cadence only polls while it holds
//! a free slot, so a saturated pool skips polls instead of claiming work it
//! cannot start.

use std::any::Any;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use taskpoll_client::OrchestratorClient;
use taskpoll_core::{Task, TaskResult};

use crate::config::WorkerConfig;
use crate::error::RunnerError;
use crate::handlers::TaskHandler;
use crate::registry::WorkerRegistry;

/// Drives polling for every registered task type.
pub struct TaskRunner {
    shutdown: CancellationToken,
    slots: Arc<Semaphore>,
    active_task_count: Arc<AtomicU32>,
    cadences: Vec<JoinHandle<()>>,
    dispatched: TaskTracker,
}

impl TaskRunner {
    /// Validate `config` and start one polling cadence per task type.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        client: Arc<dyn OrchestratorClient>,
        registry: WorkerRegistry,
        config: WorkerConfig,
    ) -> Result<Self, RunnerError> {
        config.validate(registry.len())?;

        let shutdown = CancellationToken::new();
        let slots = Arc::new(Semaphore::new(config.thread_count));
        let active_task_count = Arc::new(AtomicU32::new(0));
        let dispatched = TaskTracker::new();
        let config = Arc::new(config);
        let task_types: Vec<&str> = registry.task_types().collect();

        info!(
            task_types = ?task_types,
            thread_count = config.thread_count,
            poll_interval_ms = config.poll_interval.as_millis() as u64,
            "Starting task runner"
        );

        let cadences = registry
            .iter()
            .map(|registration| {
                let cadence = Cadence {
                    task_type: registration.task_type.clone(),
                    handler: registration.handler.clone(),
                    client: client.clone(),
                    slots: slots.clone(),
                    active_task_count: active_task_count.clone(),
                    shutdown: shutdown.clone(),
                    dispatched: dispatched.clone(),
                    config: config.clone(),
                };
                tokio::spawn(cadence.run())
            })
            .collect();

        Ok(Self {
            shutdown,
            slots,
            active_task_count,
            cadences,
            dispatched,
        })
    }

    /// Ask every cadence to exit after its current iteration.
    ///
    /// Tasks already dispatched keep running and are still reported.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    /// Stop polling, then wait for every dispatched task to finish and be
    /// reported.
    pub async fn shutdown(self) {
        self.stop();
        for cadence in self.cadences {
            if let Err(e) = cadence.await {
                error!(error = %e, "Polling cadence ended abnormally");
            }
        }

        self.dispatched.close();
        if !self.dispatched.is_empty() {
            info!(
                in_flight = self.active_task_count.load(Ordering::SeqCst),
                "Waiting for in-flight tasks"
            );
        }
        self.dispatched.wait().await;
        info!("Task runner stopped");
    }

    /// Number of tasks currently executing or being reported.
    pub fn active_tasks(&self) -> u32 {
        self.active_task_count.load(Ordering::SeqCst)
    }

    /// Number of free execution slots.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }
}

/// Polling state for one task type.
struct Cadence {
    task_type: String,
    handler: Arc<dyn TaskHandler>,
    client: Arc<dyn OrchestratorClient>,
    slots: Arc<Semaphore>,
    active_task_count: Arc<AtomicU32>,
    shutdown: CancellationToken,
    dispatched: TaskTracker,
    config: Arc<WorkerConfig>,
}

impl Cadence {
    async fn run(self) {
        info!(task_type = %self.task_type, "Polling started");

        while !self.shutdown.is_cancelled() {
            let permit = match self.slots.clone().try_acquire_owned() {
                Ok(permit) => permit,
                Err(_) => {
                    debug!(task_type = %self.task_type, "No free slot, skipping poll");
                    if !self.idle().await {
                        break;
                    }
                    continue;
                }
            };

            match self.client.poll(&self.task_type).await {
                Ok(Some(task)) => {
                    // Poll again right away; there may be more work queued.
                    self.dispatch(task, permit);
                }
                Ok(None) => {
                    drop(permit);
                    if !self.idle().await {
                        break;
                    }
                }
                Err(e) => {
                    drop(permit);
                    warn!(task_type = %self.task_type, error = %e, "Poll failed");
                    if !self.idle().await {
                        break;
                    }
                }
            }
        }

        info!(task_type = %self.task_type, "Polling stopped");
    }

    /// Sleep one poll interval. Returns false if shutdown was requested.
    async fn idle(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.config.poll_interval) => true,
        }
    }

    /// Run `task` on the pool. The slot is released once the result has
    /// been reported.
    fn dispatch(&self, task: Task, permit: OwnedSemaphorePermit) {
        info!(
            task_type = %self.task_type,
            task_id = %task.task_id,
            poll_count = task.poll_count,
            "Dispatching task"
        );

        let handler = self.handler.clone();
        let client = self.client.clone();
        let config = self.config.clone();
        let active_task_count = self.active_task_count.clone();

        active_task_count.fetch_add(1, Ordering::SeqCst);

        self.dispatched.spawn(async move {
            let result = execute_isolated(handler, task).await;
            report_with_retry(client.as_ref(), &result, &config).await;

            active_task_count.fetch_sub(1, Ordering::SeqCst);
            drop(permit);
        });
    }
}

/// Run a handler, turning errors and panics into FAILED results.
///
/// The handler runs in its own task so a panic is contained there.
pub async fn execute_isolated(handler: Arc<dyn TaskHandler>, task: Task) -> TaskResult {
    let handler_task = task.clone();
    let outcome = tokio::spawn(async move { handler.execute(&handler_task).await }).await;

    match outcome {
        Ok(Ok(mut result)) => {
            if result.task_id != task.task_id {
                warn!(
                    task_id = %task.task_id,
                    returned = %result.task_id,
                    "Handler returned a result for another task id"
                );
                result.task_id = task.task_id.clone();
            }
            result
        }
        Ok(Err(e)) => {
            warn!(task_id = %task.task_id, error = %e, "Handler failed");
            TaskResult::fault(&task, e.to_string())
        }
        Err(e) if e.is_panic() => {
            let message = panic_message(e.into_panic());
            error!(task_id = %task.task_id, panic = %message, "Handler panicked");
            TaskResult::fault(&task, format!("handler panicked: {}", message))
        }
        Err(e) => {
            error!(task_id = %task.task_id, error = %e, "Handler task aborted");
            TaskResult::fault(&task, "handler aborted")
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Report a result, retrying transport failures with capped exponential
/// backoff. Returns false if the result was dropped.
async fn report_with_retry(
    client: &dyn OrchestratorClient,
    result: &TaskResult,
    config: &WorkerConfig,
) -> bool {
    let mut backoff: Duration = config.report_initial_backoff;

    for attempt in 1..=config.report_max_attempts {
        match client.report_result(result).await {
            Ok(()) => {
                info!(
                    task_id = %result.task_id,
                    status = %result.status,
                    attempt,
                    "Reported task result"
                );
                return true;
            }
            Err(e) if attempt < config.report_max_attempts => {
                warn!(
                    task_id = %result.task_id,
                    attempt,
                    retry_in_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Failed to report task result, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = config.next_backoff(backoff);
            }
            Err(e) => {
                error!(
                    task_id = %result.task_id,
                    status = %result.status,
                    attempts = attempt,
                    error = %e,
                    "Dropping task result; the orchestrator will redeliver after its timeout"
                );
            }
        }
    }

    false
}
