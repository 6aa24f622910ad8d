//! テスト用のローダーとウォッチリスト

use crate::error::{MlvError, Result};
use crate::image::{CropMode, ImageLoader, Thumbnail};
use crate::movie::{Movie, MovieId};
use crate::watchlist::{SimulatedOutcome, WatchlistOp, WatchlistService};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub fn make_movie(id: u64, title: &str, genre: &[&str]) -> Movie {
    Movie {
        id: MovieId(id),
        title: title.to_string(),
        rating: 8.0,
        genre: genre.iter().map(|g| g.to_string()).collect(),
        year: 2000 + id as i32,
        thumbnail_url: format!("https://example.com/{id}.jpg"),
    }
}

pub fn make_movies(titles: &[&str]) -> Vec<Movie> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| make_movie(i as u64, t, &["Drama"]))
        .collect()
}

/// URL をそのまま本文として返すローダー。`fail` なら常に失敗
#[derive(Debug, Default)]
pub struct StaticLoader {
    pub fail: bool,
}

impl ImageLoader for StaticLoader {
    fn fetch(&self, url: &str, crop: CropMode) -> impl Future<Output = Result<Thumbnail>> + Send {
        let result = if self.fail {
            Err(MlvError::ThumbnailsDisabled)
        } else {
            Ok(Thumbnail {
                url: url.to_string(),
                data: url.as_bytes().to_vec(),
                content_type: Some("image/jpeg".to_string()),
                crop,
            })
        };
        std::future::ready(result)
    }
}

/// 結果を順番に返すウォッチリスト（尽きたら成功）
#[derive(Debug, Default)]
pub struct ScriptedWatchlist {
    outcomes: Mutex<VecDeque<SimulatedOutcome>>,
}

impl ScriptedWatchlist {
    pub fn new(outcomes: &[SimulatedOutcome]) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.iter().copied().collect()),
        }
    }
}

impl WatchlistService for ScriptedWatchlist {
    fn perform(&self, _op: WatchlistOp, movie: &Movie) -> impl Future<Output = Result<()>> + Send {
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        let result = match outcome {
            SimulatedOutcome::Succeed => Ok(()),
            SimulatedOutcome::Fail => Err(MlvError::SimulatedOperationFailed {
                title: movie.title.clone(),
            }),
        };
        std::future::ready(result)
    }
}

/// `release` されるまで完了しないウォッチリスト
#[derive(Debug, Clone)]
pub struct GatedWatchlist {
    gate: Arc<Semaphore>,
    calls: Arc<AtomicUsize>,
}

impl GatedWatchlist {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 待機中の操作を `n` 件完了させる
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WatchlistService for GatedWatchlist {
    fn perform(&self, _op: WatchlistOp, _movie: &Movie) -> impl Future<Output = Result<()>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&self.gate);
        async move {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
            Ok(())
        }
    }
}
