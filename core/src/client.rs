//! Access to the design-document service.
//!
//! [`FigmaApi`] is the seam the pipeline talks through; [`FigmaClient`] is the HTTP
//! implementation used by the binary.

use std::sync::LazyLock;

use async_trait::async_trait;
use indexmap::IndexMap;
use itertools::Itertools;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{error::UpstreamError, node::Node};

static DEFAULT_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://api.figma.com/v1/")
        .expect("unreachable error: failed to parse default base URL")
});

const TOKEN_HEADER: &str = "X-FIGMA-TOKEN";

#[derive(Debug, Deserialize)]
pub struct FileResponse {
    pub document: Node,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FileNodesResponse {
    pub nodes: IndexMap<String, Option<NodeEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub document: Node,
    pub components: Option<IndexMap<String, ComponentMeta>>,
    #[serde(default)]
    pub component_sets: IndexMap<String, ComponentSetMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMeta {
    pub name: String,
    pub component_set_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSetMeta {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct FileImagesResponse {
    pub err: Option<String>,
    #[serde(default)]
    pub images: IndexMap<String, Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

#[async_trait]
pub trait FigmaApi: Send + Sync {
    /// The whole file, truncated at `depth`.
    async fn file(&self, depth: u32) -> Result<FileResponse, UpstreamError>;

    async fn file_nodes(
        &self,
        ids: &[String],
        depth: Option<u32>,
    ) -> Result<FileNodesResponse, UpstreamError>;

    /// Render urls for `ids`, keyed by node id.
    async fn file_images(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<FileImagesResponse, UpstreamError>;

    /// Plain GET of a rendered asset.
    async fn download(&self, url: &str) -> Result<String, UpstreamError>;
}

pub struct FigmaClient {
    http: Client,
    base_url: Url,
    file_key: String,
    token: String,
}

impl FigmaClient {
    pub fn new(file_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.clone(),
            file_key: file_key.into(),
            token: token.into(),
        }
    }

    /// Points the client at another API root. The url should end with `/`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::InvalidUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        let body = check_status(response)?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl FigmaApi for FigmaClient {
    async fn file(&self, depth: u32) -> Result<FileResponse, UpstreamError> {
        let url = self.endpoint(&format!("files/{}", self.file_key))?;
        self.get_json(url, &[("depth", depth.to_string())]).await
    }

    async fn file_nodes(
        &self,
        ids: &[String],
        depth: Option<u32>,
    ) -> Result<FileNodesResponse, UpstreamError> {
        let url = self.endpoint(&format!("files/{}/nodes", self.file_key))?;
        let mut query = vec![("ids", ids.iter().join(","))];
        if let Some(depth) = depth {
            query.push(("depth", depth.to_string()));
        }
        self.get_json(url, &query).await
    }

    async fn file_images(
        &self,
        ids: &[String],
        format: ImageFormat,
    ) -> Result<FileImagesResponse, UpstreamError> {
        let url = self.endpoint(&format!("images/{}", self.file_key))?;
        let query = [
            ("ids", ids.iter().join(",")),
            ("format", format.as_str().to_string()),
        ];
        let mut response: FileImagesResponse = self.get_json(url, &query).await?;
        if let Some(err) = response.err.take() {
            return Err(UpstreamError::Api(err));
        }
        Ok(response)
    }

    async fn download(&self, url: &str) -> Result<String, UpstreamError> {
        let response = self.http.get(url).send().await?;
        Ok(check_status(response)?.text().await?)
    }
}
