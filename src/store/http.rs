//! REST content API client
//!
//! - `GET  {base}/pages/{key}` returns `{ "content": string | null }`; 404 means no page
//! - `POST {base}/pages/{key}` with `{ "content": ... }` and bearer auth
//! - `POST {base}/upload/media` multipart field `file`, answers `{ "url" }` or `{ "detail" }`

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Access, ContentApi, MediaFile, StoreError, Uploader};
use crate::config::ClientConfig;

#[derive(Debug, Deserialize)]
struct PageRecord {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct PageWrite<'a> {
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Content API over HTTP
#[derive(Debug, Clone)]
pub struct HttpContentApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpContentApi {
    pub fn new(config: &ClientConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn page_url(&self, key: &str) -> String {
        format!("{}/pages/{}", self.base_url, key)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn fetch(&self, key: &str, access: Access) -> Result<Option<String>, StoreError> {
        let mut request = self.client.get(self.page_url(key));
        if access == Access::Operator {
            request = self.authorize(request);
        }

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(page = key, "page not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let record: PageRecord = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(record.content)
    }

    async fn store(&self, key: &str, content: String) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.page_url(key))
            .json(&PageWrite { content: &content });
        let response = self.authorize(request).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Uploader for HttpContentApi {
    async fn upload(&self, file: MediaFile) -> Result<String, StoreError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| StoreError::Upload(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(format!("{}/upload/media", self.base_url))
            .multipart(form);
        let response = self.authorize(request).send().await.map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        let reply: UploadReply = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Err(StoreError::Upload(
                reply.detail.unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }
        reply
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| StoreError::Malformed(format!("upload reply without url: {}", body)))
    }
}
