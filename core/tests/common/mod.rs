#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use design_tokens_core::{
    client::{FileImagesResponse, FileNodesResponse, FileResponse, ImageFormat},
    FigmaApi, UpstreamError,
};
use serde_json::{json, Value};
use tracing::subscriber::DefaultGuard;

/// In-memory document service.
#[derive(Default)]
pub struct MockApi {
    pub document: Option<Value>,
    /// Node id to `{ document, components?, componentSets? }`.
    pub nodes: HashMap<String, Value>,
    pub images: HashMap<String, Option<String>>,
    /// Url to svg body, unknown urls answer 404.
    pub svgs: HashMap<String, String>,
    pub image_batches: Mutex<Vec<usize>>,
    pub node_depths: Mutex<Vec<Option<u32>>>,
}

impl MockApi {
    pub fn with_node(mut self, id: &str, entry: Value) -> Self {
        self.nodes.insert(id.to_string(), entry);
        self
    }

    pub fn with_svg(mut self, id: &str, body: &str) -> Self {
        let url = format!("https://cdn.test/{id}.svg");
        self.images.insert(id.to_string(), Some(url.clone()));
        self.svgs.insert(url, body.to_string());
        self
    }
}

#[async_trait]
impl FigmaApi for MockApi {
    async fn file(&self, _depth: u32) -> Result<FileResponse, UpstreamError> {
        let document = self.document.clone().ok_or_else(|| UpstreamError::Status {
            status: 404,
            url: "files/mock".to_string(),
        })?;
        Ok(serde_json::from_value(json!({ "name": "mock", "document": document }))?)
    }

    async fn file_nodes(
        &self,
        ids: &[String],
        depth: Option<u32>,
    ) -> Result<FileNodesResponse, UpstreamError> {
        self.node_depths.lock().unwrap().push(depth);
        let mut nodes = serde_json::Map::new();
        for id in ids {
            nodes.insert(id.clone(), self.nodes.get(id).cloned().unwrap_or(Value::Null));
        }
        Ok(serde_json::from_value(json!({ "nodes": nodes }))?)
    }

    async fn file_images(
        &self,
        ids: &[String],
        _format: ImageFormat,
    ) -> Result<FileImagesResponse, UpstreamError> {
        self.image_batches.lock().unwrap().push(ids.len());
        Ok(FileImagesResponse {
            err: None,
            images: ids
                .iter()
                .map(|id| (id.clone(), self.images.get(id).cloned().flatten()))
                .collect(),
        })
    }

    async fn download(&self, url: &str) -> Result<String, UpstreamError> {
        self.svgs.get(url).cloned().ok_or_else(|| UpstreamError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

pub fn page(id: &str, name: &str, children: Value) -> Value {
    json!({ "id": id, "name": name, "type": "CANVAS", "children": children })
}

pub fn text(name: &str, size: f64) -> Value {
    json!({
        "name": name,
        "type": "TEXT",
        "style": {
            "fontFamily": "Inter",
            "fontPostScriptName": null,
            "fontWeight": 400,
            "fontSize": size,
            "lineHeightPx": size + 4.0
        }
    })
}

pub fn swatch(name: &str, rgb: [f64; 3], opacity: Option<f64>) -> Value {
    let mut fill = json!({
        "type": "SOLID",
        "color": { "r": rgb[0], "g": rgb[1], "b": rgb[2], "a": 1 }
    });
    if let Some(opacity) = opacity {
        fill["opacity"] = json!(opacity);
    }
    json!({ "name": name, "type": "RECTANGLE", "fills": [fill] })
}

/// Log output of the current thread, captured while the guard is alive.
#[derive(Clone, Default)]
pub struct Logs(Arc<Mutex<Vec<u8>>>);

impl io::Write for Logs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Logs {
    pub fn capture() -> (Self, DefaultGuard) {
        let logs = Logs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    /// Whatever follows `prefix` on each line that contains it.
    pub fn after(&self, prefix: &str) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter_map(|line| line.split_once(prefix).map(|(_, rest)| rest.trim().to_string()))
            .collect()
    }
}
