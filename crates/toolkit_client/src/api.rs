use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use toolkit_logging::toolkit_debug;
use url::Url;

use crate::submit::build_multipart;
use crate::{ClientError, FailureKind, ProgressSnapshot, Submission, SubmissionBody, SubmitReply};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` waits as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The server endpoints the controller talks to.
#[async_trait::async_trait]
pub trait ToolkitApi: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, ClientError>;

    async fn progress(&self, task_id: &str) -> Result<ProgressSnapshot, ClientError>;

    /// Reply JSON is returned as-is.
    async fn generate_qr(&self, text: &str) -> Result<serde_json::Value, ClientError>;

    /// Link to the finished artifact, `/download/{task_id}` resolved against
    /// the base URL into an absolute URL. Never fetched by the client.
    fn download_href(&self, task_id: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ClientSettings) -> Result<Self, ClientError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, target: &str) -> Result<Url, ClientError> {
        self.base
            .join(target)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// `{base}/{segments...}/{task_id}` with the task id encoded as one segment.
    fn task_url(&self, segments: &[&str], task_id: &str) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ClientError::new(FailureKind::InvalidUrl, "base url cannot carry a path")
            })?;
            path.pop_if_empty().extend(segments).push(task_id);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            // Error replies still carry a JSON body worth reading.
            toolkit_debug!("{} answered {}", response.url(), status);
        }
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ToolkitApi for ReqwestApi {
    async fn submit(&self, submission: &Submission) -> Result<SubmitReply, ClientError> {
        let url = self.resolve(&submission.target)?;
        let request = match &submission.body {
            SubmissionBody::Json(fields) => {
                let body = serde_json::to_vec(fields)
                    .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
            }
            SubmissionBody::Multipart(parts) => {
                let form = build_multipart(parts).await?;
                self.client.post(url).multipart(form)
            }
        };
        self.send(request).await
    }

    async fn progress(&self, task_id: &str) -> Result<ProgressSnapshot, ClientError> {
        let url = self.task_url(&["api", "progress"], task_id)?;
        self.send(self.client.get(url)).await
    }

    async fn generate_qr(&self, text: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.resolve("/api/qr/generate")?;
        let body = serde_json::to_vec(&serde_json::json!({ "text": text }))
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request).await
    }

    /// Absolute link. Falls back to the relative `/download/{task_id}` path
    /// only when the task id cannot be joined onto the base URL.
    fn download_href(&self, task_id: &str) -> String {
        self.task_url(&["download"], task_id)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| format!("/download/{task_id}"))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ClientError::new(FailureKind::Decode, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
