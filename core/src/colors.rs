use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::TokenError,
    node::{flatten, Node, NodeType, PaintType},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub name: String,
    pub color: Option<Rgb>,
    /// Absent when the fill is fully opaque.
    pub opacity: Option<f64>,
}

impl TryFrom<&Node> for ColorRecord {
    type Error = TokenError;

    fn try_from(node: &Node) -> Result<Self, Self::Error> {
        let fill = node
            .fills
            .first()
            .ok_or_else(|| TokenError::malformed("RECTANGLE", &node.name, "no fills"))?;
        if fill.type_ != PaintType::Solid {
            return Err(TokenError::malformed(
                "RECTANGLE",
                &node.name,
                "primary fill is not solid",
            ));
        }
        let [r, g, b] = fill
            .color
            .ok_or_else(|| TokenError::malformed("RECTANGLE", &node.name, "fill has no color"))?
            .channels()
            .ok_or_else(|| {
                TokenError::malformed("RECTANGLE", &node.name, "color is missing a channel")
            })?;
        Ok(ColorRecord {
            name: node.name.clone(),
            color: Some(Rgb { r, g, b }),
            opacity: fill.opacity,
        })
    }
}

#[tracing::instrument(skip(session))]
pub async fn extract_colors(session: &Session, node_id: &str) -> Option<Vec<ColorRecord>> {
    match session.load_subtree(node_id).await {
        Ok(root) => Some(colors_from(&root)),
        Err(err) => {
            error!("colors subtree not loaded: {err}");
            None
        }
    }
}

/// Primary fills of every rectangle leaf under `root`.
pub fn colors_from(root: &Node) -> Vec<ColorRecord> {
    flatten(root.children())
        .into_iter()
        .filter(|node| node.type_ == NodeType::Rectangle)
        .filter_map(|node| match ColorRecord::try_from(node) {
            Ok(color) => Some(color),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect()
}
