//! HTTP client for the Conductor task endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use taskpoll_core::{Task, TaskResult, WorkerId};

use crate::error::ClientError;
use crate::OrchestratorClient;

/// Orchestrator client over the Conductor REST API.
///
/// - Poll: `GET {base}/tasks/poll/{taskType}?workerid=..[&domain=..]`
/// - Update: `POST {base}/tasks`
pub struct HttpOrchestratorClient {
    inner: reqwest::Client,
    base_url: String,
    worker_id: WorkerId,
    domain: Option<String>,
}

impl HttpOrchestratorClient {
    /// Create a new client for the API rooted at `base_url`
    /// (e.g. `http://conductor:8080/api/`).
    pub fn new(base_url: &str, worker_id: WorkerId) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            worker_id,
            domain: None,
        }
    }

    /// Poll only for tasks scheduled in `domain`.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Apply a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        self.inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;
        Ok(self)
    }
}

#[async_trait]
impl OrchestratorClient for HttpOrchestratorClient {
    async fn poll(&self, task_type: &str) -> Result<Option<Task>, ClientError> {
        let path = format!("/tasks/poll/{}", task_type);
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, worker_id = %self.worker_id, "Polling for task");

        let mut request = self
            .inner
            .get(&url)
            .query(&[("workerid", self.worker_id.as_str())]);
        if let Some(domain) = &self.domain {
            request = request.query(&[("domain", domain.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path,
            });
        }

        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }

        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| ClientError::Serialization(e.to_string()))
    }

    async fn report_result(&self, result: &TaskResult) -> Result<(), ClientError> {
        let path = "/tasks".to_string();
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, task_id = %result.task_id, status = %result.status, "Updating task");

        let mut body = result.clone();
        if body.worker_id.is_none() {
            body.worker_id = Some(self.worker_id.clone());
        }

        let response = self.inner.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use taskpoll_core::TaskStatus;

    #[derive(Clone, Default)]
    struct Stub {
        polls: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
        updates: Arc<Mutex<Vec<Value>>>,
    }

    async fn poll_handler(
        State(stub): State<Stub>,
        Path(task_type): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        stub.polls
            .lock()
            .unwrap()
            .push((task_type.clone(), params));

        match task_type.as_str() {
            "chart_delete_product" => Json(json!({
                "taskType": "chart_delete_product",
                "taskId": "t-1",
                "workflowInstanceId": "wf-1",
                "inputData": {"productCode": "ABC"},
                "status": "IN_PROGRESS"
            }))
            .into_response(),
            "broken" => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            _ => AxumStatus::NO_CONTENT.into_response(),
        }
    }

    async fn update_handler(State(stub): State<Stub>, Json(body): Json<Value>) -> &'static str {
        stub.updates.lock().unwrap().push(body);
        "t-1"
    }

    async fn spawn_stub() -> (String, Stub) {
        let stub = Stub::default();
        let app = Router::new()
            .route("/api/tasks/poll/:task_type", get(poll_handler))
            .route("/api/tasks", post(update_handler))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/api/", addr), stub)
    }

    #[tokio::test]
    async fn test_poll_returns_task() {
        let (base, stub) = spawn_stub().await;
        let client = HttpOrchestratorClient::new(&base, WorkerId::new("w-1")).with_domain("blue");

        let task = client.poll("chart_delete_product").await.unwrap().unwrap();
        assert_eq!(task.task_id.as_str(), "t-1");
        assert_eq!(task.input_str("productCode").unwrap(), "ABC");

        let polls = stub.polls.lock().unwrap();
        assert_eq!(polls.len(), 1);
        assert_eq!(polls[0].1.get("workerid").map(String::as_str), Some("w-1"));
        assert_eq!(polls[0].1.get("domain").map(String::as_str), Some("blue"));
    }

    #[tokio::test]
    async fn test_poll_no_content_is_none() {
        let (base, _stub) = spawn_stub().await;
        let client = HttpOrchestratorClient::new(&base, WorkerId::new("w-1"));

        assert!(client.poll("idle_type").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_poll_server_error() {
        let (base, _stub) = spawn_stub().await;
        let client = HttpOrchestratorClient::new(&base, WorkerId::new("w-1"));

        let err = client.poll("broken").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_report_stamps_worker_id() {
        let (base, stub) = spawn_stub().await;
        let client = HttpOrchestratorClient::new(&base, WorkerId::new("w-1"));

        let task = taskpoll_core::Task::new("chart_delete_product", "t-1")
            .with_workflow_instance_id("wf-1");
        let result = TaskResult::completed(&task).with_output("name", "Widget");
        client.report_result(&result).await.unwrap();

        let updates = stub.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0]["taskId"], "t-1");
        assert_eq!(updates[0]["status"], "COMPLETED");
        assert_eq!(updates[0]["workerId"], "w-1");
        assert_eq!(updates[0]["workflowInstanceId"], "wf-1");
        assert_eq!(updates[0]["outputData"]["name"], "Widget");
        assert_eq!(result.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_unreachable_orchestrator() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpOrchestratorClient::new(&format!("http://{}/api", addr), WorkerId::new("w"));
        let task = taskpoll_core::Task::new("t", "1");
        let err = client
            .report_result(&TaskResult::failed(&task))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
