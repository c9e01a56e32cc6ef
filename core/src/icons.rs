use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::{
    client::ComponentMeta,
    error::{TokenError, UpstreamError},
    fetch::{fetch_bounded, FetchOptions, Progress, QUEUE_SIZE},
    session::{ComponentIndex, Session},
};

/// Icon name to svg markup.
pub type Icons = IndexMap<String, String>;

impl ComponentIndex {
    /// Name of the set `meta` belongs to, or `""`.
    pub fn parent_name(&self, meta: &ComponentMeta) -> &str {
        meta.component_set_id
            .as_ref()
            .and_then(|id| self.component_sets.get(id))
            .map(|set| set.name.as_str())
            .unwrap_or_default()
    }

    pub fn icon_name(&self, meta: &ComponentMeta) -> String {
        icon_name(meta, self.parent_name(meta))
    }
}

/// `logo` stays `logo`; variant `size=16, variant=outline` of set `arrow` becomes
/// `arrow-16-outline`.
pub fn icon_name(meta: &ComponentMeta, parent: &str) -> String {
    if parent.is_empty() {
        return meta.name.clone();
    }
    let props = meta
        .name
        .split(", ")
        .map(|prop| prop.split('=').nth(1).unwrap_or_default());
    std::iter::once(parent).chain(props).join("-")
}

struct IconJob {
    id: String,
    name: String,
    url: Option<String>,
}

#[tracing::instrument(skip(session))]
pub async fn extract_icons(session: &Session, node_id: &str) -> Option<Icons> {
    let index = match session.load_component_index(node_id).await {
        Ok(index) => index,
        Err(err) => {
            error!("icons subtree not loaded: {err}");
            return None;
        }
    };

    let ids: Vec<String> = index.components.keys().cloned().collect();
    let mut urls = match session.load_svg_urls(&ids).await {
        Ok(urls) => urls,
        Err(err) => {
            error!("svg urls not resolved: {err}");
            return None;
        }
    };

    let mut names = HashSet::new();
    let jobs: Vec<IconJob> = index
        .components
        .iter()
        .map(|(id, meta)| {
            let name = index.icon_name(meta);
            if !names.insert(name.clone()) {
                warn!("duplicate icon name '{name}', component {id} replaces an earlier one");
            }
            IconJob {
                id: id.clone(),
                name,
                url: urls.swap_remove(id).flatten(),
            }
        })
        .collect();

    let icons = fetch_bounded(
        jobs,
        |job| download_icon(session, job),
        FetchOptions {
            limit: QUEUE_SIZE,
            on_progress: &mut |progress: Progress| info!("fetch icons progress: {progress}"),
        },
    )
    .await;

    Some(icons)
}

async fn download_icon(session: &Session, job: IconJob) -> Result<(String, String), TokenError> {
    let fetched = match job.url {
        Some(url) => session.load_svg(&url).await,
        None => Err(UpstreamError::MissingSvgUrl(job.id.clone())),
    };
    match fetched {
        Ok(svg) => Ok((job.name, svg)),
        Err(source) => Err(TokenError::IconFetch { id: job.id, source }),
    }
}
