use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::{
    error::ConfigError,
    node::{find, Node},
};

/// Which page (by name or node id) holds each kind of token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pages {
    pub typography: Option<String>,
    pub colors: Option<String>,
    pub icons: Option<String>,
}

/// Subtrees the pipeline should extract from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportNodes {
    pub typography: Option<String>,
    pub colors: Option<String>,
    pub icons: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub project_id: String,
    pub figma_token: Option<String>,
    #[serde(default)]
    pub pages: Pages,
    #[serde(default, deserialize_with = "lowercase_themes")]
    pub themes: Option<Vec<String>>,
    #[serde(default = "enabled")]
    pub generate_css: bool,
    /// Appended to `:root` in each theme's stylesheet, `{theme}` is substituted.
    pub css_root_selector: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    pub colors_dir: Option<PathBuf>,
    pub icons_dir: Option<PathBuf>,
    pub typography_dir: Option<PathBuf>,
}

fn enabled() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn lowercase_themes<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let themes = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(themes.map(|themes| themes.iter().map(|theme| theme.to_lowercase()).collect()))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            figma_token: None,
            pages: Pages::default(),
            themes: None,
            generate_css: true,
            css_root_selector: None,
            output_dir: default_output_dir(),
            colors_dir: None,
            icons_dir: None,
            typography_dir: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn themes(&self) -> &[String] {
        self.themes.as_deref().unwrap_or_default()
    }

    pub fn multiple_themes(&self) -> bool {
        !self.themes().is_empty()
    }

    pub fn css_root_selector(&self, theme: &str) -> Option<String> {
        self.css_root_selector
            .as_ref()
            .map(|template| template.replace("{theme}", theme))
    }

    /// Resolves the configured pages against the loaded document.
    pub fn nodes_for_export(&self, document: &Node) -> ExportNodes {
        ExportNodes {
            typography: locate(document, "typography", self.pages.typography.as_deref()),
            colors: locate(document, "colors", self.pages.colors.as_deref()),
            icons: locate(document, "icons", self.pages.icons.as_deref()),
        }
    }
}

fn locate(document: &Node, role: &str, page: Option<&str>) -> Option<String> {
    let page = page?;
    match find(document.children(), &|node: &Node| node.id == page || node.name == page) {
        Some(node) => Some(node.id.clone()),
        None => {
            warn!("{role} page '{page}' not found in document");
            None
        }
    }
}
