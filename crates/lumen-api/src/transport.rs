use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// A file handed to the upload endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Raw JSON exchange with the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;

    async fn post_json(&self, path: &str, body: Value) -> Result<Value>;

    async fn post_multipart(&self, path: &str, upload: Upload) -> Result<Value>;
}

/// [`Transport`] over HTTP
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value> {
        tracing::debug!(path, "GET");
        let response = self.http_client.get(self.url(path)).send().await?;
        Self::read_json(response).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value> {
        tracing::debug!(path, "POST");
        let response = self
            .http_client
            .post(self.url(path))
            .json(&body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn post_multipart(&self, path: &str, upload: Upload) -> Result<Value> {
        tracing::debug!(path, file = %upload.file_name, size = upload.bytes.len(), "POST multipart");
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime_type {
            part = part.mime_str(&mime)?;
        }
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpTransport::new("ftp://example.com", Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(matches!(err, ApiError::InvalidConfig(_)));
    }

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
        assert_eq!(transport.url("/api/status"), "http://localhost:8000/api/status");
        assert_eq!(transport.url("api/status"), "http://localhost:8000/api/status");
    }
}
