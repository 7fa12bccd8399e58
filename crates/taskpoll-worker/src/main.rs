//! taskpoll worker daemon

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use taskpoll_client::HttpOrchestratorClient;
use taskpoll_core::WorkerId;
use taskpoll_store::{InMemoryRecordStore, RecordStore, SqliteRecordStore};
use taskpoll_worker::{build_registry, ServiceProfile, TaskRunner, WorkerConfig};

/// Pull-based task worker for a Conductor orchestrator.
#[derive(Parser, Debug)]
#[command(name = "taskpoll-worker", about = "Pull-based task worker for a Conductor orchestrator")]
struct Args {
    /// Orchestrator API base URL
    #[arg(long, env = "CONDUCTOR_URL", default_value = "http://conductor:8080/api/")]
    conductor_url: String,

    /// Catalog service to run as
    #[arg(long, value_enum, env = "TASKPOLL_SERVICE", default_value = "chart")]
    service: ServiceProfile,

    /// Maximum tasks executing at once, across all task types
    #[arg(long, env = "TASKPOLL_THREAD_COUNT", default_value_t = 3)]
    thread_count: usize,

    /// Sleep between empty polls (milliseconds)
    #[arg(long, env = "TASKPOLL_POLL_INTERVAL_MS", default_value_t = 100)]
    poll_interval_ms: u64,

    /// Attempts made to report a result before dropping it
    #[arg(long, env = "TASKPOLL_REPORT_MAX_ATTEMPTS", default_value_t = 5)]
    report_max_attempts: u32,

    /// Orchestrator request timeout (seconds)
    #[arg(long, env = "TASKPOLL_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// SQLite database file; records are kept in memory when omitted
    #[arg(long, env = "TASKPOLL_DATABASE")]
    database: Option<PathBuf>,

    /// Worker id sent to the orchestrator (generated when omitted)
    #[arg(long, env = "TASKPOLL_WORKER_ID")]
    worker_id: Option<String>,

    /// Only poll tasks scheduled in this domain
    #[arg(long, env = "TASKPOLL_DOMAIN")]
    domain: Option<String>,

    /// Override the insert task type name
    #[arg(long)]
    insert_task: Option<String>,

    /// Override the delete task type name
    #[arg(long)]
    delete_task: Option<String>,

    /// Override the query task type name
    #[arg(long)]
    query_task: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taskpoll=info".parse()?))
        .with_target(true)
        .init();

    let config = WorkerConfig {
        thread_count: args.thread_count,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
        report_max_attempts: args.report_max_attempts,
        ..WorkerConfig::default()
    };

    let catalog = args.service.catalog();
    let store: Arc<dyn RecordStore> = match &args.database {
        Some(path) => Arc::new(SqliteRecordStore::open(path, catalog).await?),
        None => {
            warn!("No database configured, records are kept in memory only");
            Arc::new(InMemoryRecordStore::new())
        }
    };

    let names = args.service.default_task_names().with_overrides(
        args.insert_task,
        args.delete_task,
        args.query_task,
    );
    let registry = build_registry(&names, store)?;

    let worker_id = args
        .worker_id
        .map(WorkerId::new)
        .unwrap_or_else(WorkerId::generate);
    let mut client = HttpOrchestratorClient::new(&args.conductor_url, worker_id.clone())
        .with_timeout(Duration::from_secs(args.request_timeout_secs))?;
    if let Some(domain) = args.domain {
        client = client.with_domain(domain);
    }

    info!(
        worker_id = %worker_id,
        conductor = %args.conductor_url,
        service = ?args.service,
        table = catalog.table_name(),
        "Starting taskpoll worker"
    );

    let runner = TaskRunner::start(Arc::new(client), registry, config)?;

    tokio::signal::ctrl_c().await?;
    info!(
        in_flight = runner.active_tasks(),
        "Shutdown requested, stopping polling"
    );
    runner.shutdown().await;

    Ok(())
}
