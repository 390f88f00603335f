use crate::config::EditorConfig;
use crate::document::NodeId;
use crate::error::EditorError;
use async_trait::async_trait;
use entity_embed_model::PreviewResponse;
use reqwest::Url;
use tracing::debug;

/// One preview fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub format: String,
    /// Serialized outer markup of the marker.
    pub value: String,
}

/// The rendering endpoint.
#[async_trait]
pub trait PreviewEndpoint: Send + Sync {
    async fn fetch(&self, request: PreviewRequest) -> Result<PreviewResponse, EditorError>;
}

/// Result of a fetch, delivered back to the editor loop.
#[derive(Debug)]
pub struct PreviewCompletion {
    pub node: NodeId,
    pub preview_id: String,
    pub result: Result<PreviewResponse, EditorError>,
}

/// Fetches previews from `GET {base}/embed/preview/{format}?value=...`.
#[derive(Debug, Clone)]
pub struct HttpPreviewEndpoint {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPreviewEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// An endpoint at the editor's configured `preview_base_url`.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.preview_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The preview URL for `format`. The format id is one encoded path
    /// segment.
    pub fn url(&self, format: &str) -> Result<Url, EditorError> {
        let invalid = || EditorError::InvalidBaseUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["embed", "preview", format]);
        Ok(url)
    }
}

#[async_trait]
impl PreviewEndpoint for HttpPreviewEndpoint {
    async fn fetch(&self, request: PreviewRequest) -> Result<PreviewResponse, EditorError> {
        let url = self.url(&request.format)?;
        debug!(%url, "Fetching preview");
        let response = self
            .client
            .get(url)
            .query(&[("value", request.value.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EditorError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json::<PreviewResponse>().await?)
    }
}
