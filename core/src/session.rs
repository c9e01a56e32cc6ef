use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use crate::{
    client::{ComponentMeta, ComponentSetMeta, FigmaApi, FileResponse, ImageFormat},
    error::UpstreamError,
    fetch::Progress,
    node::Node,
};

/// Depth that reaches every token nested under a page.
pub const SUBTREE_DEPTH: u32 = 100;

/// Ids per images request.
pub const SVG_URL_BATCH: usize = 500;

/// Everything needed to extract icons from one subtree.
#[derive(Debug)]
pub struct ComponentIndex {
    pub document: Node,
    pub components: IndexMap<String, ComponentMeta>,
    pub component_sets: IndexMap<String, ComponentSetMeta>,
}

/// One run's handle on the document service.
#[derive(Clone)]
pub struct Session {
    api: Arc<dyn FigmaApi>,
}

impl Session {
    pub fn new(api: impl FigmaApi + 'static) -> Self {
        Self { api: Arc::new(api) }
    }

    pub fn from_arc(api: Arc<dyn FigmaApi>) -> Self {
        Self { api }
    }

    /// The document with its pages only.
    pub async fn load_root(&self) -> Result<FileResponse, UpstreamError> {
        self.api.file(1).await
    }

    pub async fn load_subtree(&self, id: &str) -> Result<Node, UpstreamError> {
        let mut response = self
            .api
            .file_nodes(&[id.to_string()], Some(SUBTREE_DEPTH))
            .await?;
        response
            .nodes
            .swap_remove(id)
            .flatten()
            .map(|entry| entry.document)
            .ok_or_else(|| UpstreamError::NodeNotFound(id.to_string()))
    }

    pub async fn load_component_index(&self, id: &str) -> Result<ComponentIndex, UpstreamError> {
        let mut response = self.api.file_nodes(&[id.to_string()], None).await?;
        let entry = response
            .nodes
            .swap_remove(id)
            .flatten()
            .ok_or_else(|| UpstreamError::NodeNotFound(id.to_string()))?;
        let components = entry
            .components
            .ok_or_else(|| UpstreamError::MissingComponents(id.to_string()))?;
        Ok(ComponentIndex {
            document: entry.document,
            components,
            component_sets: entry.component_sets,
        })
    }

    /// Resolves svg render urls, one request per [`SVG_URL_BATCH`] ids.
    pub async fn load_svg_urls(
        &self,
        ids: &[String],
    ) -> Result<IndexMap<String, Option<String>>, UpstreamError> {
        let total = ids.len();
        let mut urls = IndexMap::with_capacity(total);

        for (index, chunk) in ids.chunks(SVG_URL_BATCH).enumerate() {
            info!("fetch icons meta: {}", Progress::of(index * SVG_URL_BATCH, total));
            let response = self.api.file_images(chunk, ImageFormat::Svg).await?;
            urls.extend(response.images);
        }
        info!("fetch icons meta: {}", Progress::Done);

        Ok(urls)
    }

    pub async fn load_svg(&self, url: &str) -> Result<String, UpstreamError> {
        self.api.download(url).await
    }
}
