use std::time::Duration;

use assistant_logging::{assistant_debug, assistant_warn};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    AnswerReply, ApiError, AskRequest, Endpoint, FailureKind, HealthReply, UploadPayload,
    UploadReply,
};

/// Base URL the app talks to. Not configurable at runtime.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

const UPLOAD_FIELD: &str = "file";
const UPLOAD_MIME: &str = "application/pdf";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// `None` leaves the connection attempt unbounded.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the whole request unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

impl ApiSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Joins the base URL and the endpoint path with exactly one `/`.
    pub fn endpoint(&self, endpoint: Endpoint) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.path()
        );
        Url::parse(&joined)
            .map_err(|err| ApiError::new(endpoint, FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, payload: UploadPayload) -> Result<UploadReply, ApiError>;

    async fn ask(&self, question: &str) -> Result<AnswerReply, ApiError>;

    async fn health(&self) -> Result<HealthReply, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ApiSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| map_reqwest_error(endpoint, err))?;

        let status = response.status();
        if !status.is_success() {
            assistant_warn!("{:?} answered with status {}", endpoint, status);
            return Err(ApiError::new(
                endpoint,
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| map_reqwest_error(endpoint, err))?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(endpoint, FailureKind::InvalidBody, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn upload(&self, payload: UploadPayload) -> Result<UploadReply, ApiError> {
        let url = self.settings.endpoint(Endpoint::Upload)?;
        assistant_debug!(
            "POST {} file={} bytes={}",
            url,
            payload.file_name,
            payload.bytes.len()
        );
        let part = Part::bytes(payload.bytes)
            .file_name(payload.file_name)
            .mime_str(UPLOAD_MIME)
            .map_err(|err| map_reqwest_error(Endpoint::Upload, err))?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        self.send(Endpoint::Upload, self.client.post(url).multipart(form))
            .await
    }

    async fn ask(&self, question: &str) -> Result<AnswerReply, ApiError> {
        let url = self.settings.endpoint(Endpoint::Ask)?;
        assistant_debug!("POST {} question_len={}", url, question.len());
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&AskRequest { question });
        self.send(Endpoint::Ask, request).await
    }

    async fn health(&self) -> Result<HealthReply, ApiError> {
        let url = self.settings.endpoint(Endpoint::Health)?;
        self.send(Endpoint::Health, self.client.get(url)).await
    }
}

fn map_reqwest_error(endpoint: Endpoint, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(endpoint, FailureKind::Timeout, err.to_string());
    }
    ApiError::new(endpoint, FailureKind::Network, err.to_string())
}
