use serde::Serialize;

use colors::{extract_colors, ColorRecord};
use config::Config;
use icons::{extract_icons, Icons};
use node::Node;
use session::Session;
use typography::{extract_typography, Typography};

pub mod client;
pub mod colors;
pub mod config;
pub mod error;
pub mod fetch;
pub mod icons;
pub mod node;
pub mod session;
pub mod themes;
pub mod typography;

pub use client::{FigmaApi, FigmaClient};
pub use error::{ConfigError, TokenError, UpstreamError};

/// Tokens extracted in one run. A field is `None` when its page is not configured or its
/// subtree could not be loaded.
#[derive(Debug, Default, Serialize)]
pub struct DesignTokens {
    pub typography: Option<Vec<Typography>>,
    pub colors: Option<Vec<ColorRecord>>,
    pub icons: Option<Icons>,
}

/// Extracts every configured kind of token from the document `root`.
pub async fn generate(session: &Session, root: &Node, config: &Config) -> DesignTokens {
    let nodes = config.nodes_for_export(root);

    let typography = match &nodes.typography {
        Some(id) => extract_typography(session, id).await,
        None => None,
    };
    let colors = match &nodes.colors {
        Some(id) => extract_colors(session, id).await,
        None => None,
    };
    let icons = match &nodes.icons {
        Some(id) => extract_icons(session, id).await,
        None => None,
    };

    DesignTokens {
        typography,
        colors,
        icons,
    }
}
