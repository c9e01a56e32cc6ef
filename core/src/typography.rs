use serde::Serialize;
use tracing::{error, warn};

use crate::{
    error::TokenError,
    node::{flatten, Node, NodeType},
    session::Session,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub name: String,
    pub italic: bool,
    pub font_weight: f64,
    pub font_size: f64,
    pub line_height_px: f64,
    pub font_family: String,
    pub font_post_script_name: Option<String>,
}

impl TryFrom<&Node> for Typography {
    type Error = TokenError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        let style = node
            .style
            .as_ref()
            .ok_or_else(|| TokenError::malformed("TEXT", &node.name, "missing style"))?;
        let missing = |field: &str| {
            TokenError::malformed("TEXT", &node.name, format!("style has no {field}"))
        };
        Ok(Typography {
            name: node.name.clone(),
            italic: style.italic,
            font_weight: style.font_weight.ok_or_else(|| missing("fontWeight"))?,
            font_size: style.font_size.ok_or_else(|| missing("fontSize"))?,
            line_height_px: style.line_height_px.ok_or_else(|| missing("lineHeightPx"))?,
            font_family: style
                .font_family
                .clone()
                .ok_or_else(|| missing("fontFamily"))?,
            font_post_script_name: style.font_post_script_name.clone(),
        })
    }
}

#[tracing::instrument(skip(session))]
pub async fn extract_typography(session: &Session, node_id: &str) -> Option<Vec<Typography>> {
    match session.load_subtree(node_id).await {
        Ok(root) => Some(typography_from(&root)),
        Err(err) => {
            error!("typography subtree not loaded: {err}");
            None
        }
    }
}

/// Text styles of every text leaf under `root`.
pub fn typography_from(root: &Node) -> Vec<Typography> {
    flatten(root.children())
        .into_iter()
        .filter(|node| node.type_ == NodeType::Text)
        .filter_map(|node| match Typography::try_from(node) {
            Ok(typography) => Some(typography),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}
