use std::{fmt, future::Future, hash::Hash};

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::warn;

/// How many downloads run between two barriers.
pub const QUEUE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// Percentage in `[0, 100)`.
    Running(f64),
    Done,
}

impl Progress {
    pub fn of(completed: usize, total: usize) -> Self {
        if total == 0 {
            return Progress::Running(0.0);
        }
        Progress::Running(completed as f64 / total as f64 * 100.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Running(percent) => write!(f, "{percent:.2}%"),
            Progress::Done => f.write_str("100%"),
        }
    }
}

pub struct FetchOptions<'a> {
    pub limit: usize,
    pub on_progress: &'a mut dyn FnMut(Progress),
}

/// Runs `worker` over `items`, at most `limit` at a time, and collects the successful
/// results.
///
/// Items are submitted in order. Once `limit` are pending the fetcher waits for the whole
/// batch before submitting more, so progress is reported once per batch and never goes
/// backwards. A failing item is logged and left out of the result. Later keys overwrite
/// earlier ones.
pub async fn fetch_bounded<T, K, V, E, W, Fut>(
    items: Vec<T>,
    mut worker: W,
    options: FetchOptions<'_>,
) -> IndexMap<K, V>
where
    W: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(K, V), E>>,
    K: Hash + Eq,
    E: fmt::Display,
{
    let FetchOptions { limit, on_progress } = options;
    let limit = limit.max(1);
    let total = items.len();
    let mut completed = 0;
    let mut results = IndexMap::with_capacity(total);
    let mut in_flight = Vec::with_capacity(limit);

    for item in items {
        if in_flight.is_empty() {
            on_progress(Progress::of(completed, total));
        }
        in_flight.push(worker(item));
        if in_flight.len() == limit {
            settle(&mut results, join_all(std::mem::take(&mut in_flight)).await);
            completed += limit;
        }
    }
    settle(&mut results, join_all(in_flight).await);
    on_progress(Progress::Done);

    results
}

fn settle<K: Hash + Eq, V, E: fmt::Display>(
    results: &mut IndexMap<K, V>,
    batch: Vec<Result<(K, V), E>>,
) {
    for outcome in batch {
        match outcome {
            Ok((key, value)) => {
                results.insert(key, value);
            }
            Err(err) => warn!("{err}"),
        }
    }
}
