/// REST transport for the board API
///
/// Talks to the `taskboard-api` server with a bearer access token.
///
/// # Example
///
/// ```no_run
/// use taskboard_client::http::{ClientConfig, HttpTransport};
/// use taskboard_client::transport::BoardTransport;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(ClientConfig::new("http://localhost:8000", "eyJ..."))?;
/// let columns = transport.list_columns(Uuid::new_v4()).await?;
/// # Ok(())
/// # }
/// ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use taskboard_shared::models::{column::Column, task::TaskView};
use uuid::Uuid;

use crate::transport::{BoardTransport, TransportError, TransportResult};

/// Connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8000`
    pub base_url: String,

    /// Access token sent as `Authorization: Bearer`
    pub token: String,

    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Error body produced by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> TransportResult<T> {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);
        return Err(TransportError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

#[async_trait]
impl BoardTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_columns(&self, project_id: Uuid) -> TransportResult<Vec<Column>> {
        let url = self.url(&format!("/projects/{}/columns", project_id));
        self.send(self.client.get(url)).await
    }

    async fn list_tasks(&self, project_id: Uuid) -> TransportResult<Vec<TaskView>> {
        let url = self.url(&format!("/projects/{}/tasks", project_id));
        self.send(self.client.get(url)).await
    }

    async fn move_task(&self, task_id: Uuid, column_id: Uuid, order: i32) -> TransportResult<TaskView> {
        let url = self.url(&format!("/tasks/{}/move", task_id));
        let body = json!({ "column_id": column_id, "order": order });
        self.send(self.client.patch(url).json(&body)).await
    }
}
