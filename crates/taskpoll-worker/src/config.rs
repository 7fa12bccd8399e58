//! Runner configuration.

use std::time::Duration;

use tracing::warn;

use crate::error::RunnerError;

/// Task runner configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum number of tasks executing at once, across all task types.
    pub thread_count: usize,

    /// Sleep between poll cycles that produced no task.
    pub poll_interval: Duration,

    /// Attempts made to report one result before it is dropped.
    pub report_max_attempts: u32,

    /// Delay before the first report retry; doubles on each retry.
    pub report_initial_backoff: Duration,

    /// Upper bound on the report retry delay.
    pub report_max_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_count: 3,
            poll_interval: Duration::from_millis(100),
            report_max_attempts: 5,
            report_initial_backoff: Duration::from_millis(200),
            report_max_backoff: Duration::from_secs(5),
        }
    }
}

impl WorkerConfig {
    /// Check the configuration against the number of registered task types.
    ///
    /// Fewer slots than task types is allowed, but some task types may then
    /// never get a slot to poll with.
    pub fn validate(&self, task_type_count: usize) -> Result<(), RunnerError> {
        if task_type_count == 0 {
            return Err(RunnerError::NoTaskTypes);
        }
        if self.thread_count == 0 {
            return Err(RunnerError::InvalidThreadCount);
        }
        if self.report_max_attempts == 0 {
            return Err(RunnerError::InvalidReportAttempts);
        }
        if self.thread_count < task_type_count {
            warn!(
                thread_count = self.thread_count,
                task_types = task_type_count,
                "thread_count is lower than the number of task types; some task types may starve"
            );
        }
        Ok(())
    }

    /// Calculate the next report backoff duration.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        let next = current.saturating_mul(2);
        if next > self.report_max_backoff {
            self.report_max_backoff
        } else {
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let config = WorkerConfig::default();
        assert!(config.validate(3).is_ok());
        assert!(matches!(config.validate(0), Err(RunnerError::NoTaskTypes)));

        // Starvation risk is tolerated
        assert!(config.validate(5).is_ok());

        let zero = WorkerConfig {
            thread_count: 0,
            ..WorkerConfig::default()
        };
        assert!(matches!(zero.validate(1), Err(RunnerError::InvalidThreadCount)));

        let no_reports = WorkerConfig {
            report_max_attempts: 0,
            ..WorkerConfig::default()
        };
        assert!(matches!(
            no_reports.validate(1),
            Err(RunnerError::InvalidReportAttempts)
        ));
    }

    #[test]
    fn test_next_backoff_is_capped() {
        let config = WorkerConfig {
            report_max_backoff: Duration::from_secs(1),
            ..WorkerConfig::default()
        };
        assert_eq!(
            config.next_backoff(Duration::from_millis(200)),
            Duration::from_millis(400)
        );
        assert_eq!(
            config.next_backoff(Duration::from_millis(800)),
            Duration::from_secs(1)
        );
    }
}
