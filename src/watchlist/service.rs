//! ウォッチリスト操作の実行
//!
//! 実サーバーは持たない。`SimulatedWatchlist` が固定遅延の後に結果を返す。

use super::state::WatchlistOp;
use crate::config::WatchlistConfig;
use crate::error::{MlvError, Result};
use crate::movie::Movie;
use std::future::Future;
use std::time::Duration;

/// ウォッチリスト操作を実行するトレイト
///
/// 返す Future はバックグラウンドタスクで実行される。
/// 実装はバインダーの状態に触れてはならない。
pub trait WatchlistService: Send + Sync + 'static {
    fn perform(&self, op: WatchlistOp, movie: &Movie) -> impl Future<Output = Result<()>> + Send;
}

/// シミュレーション結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulatedOutcome {
    #[default]
    Succeed,
    Fail,
}

/// 固定遅延のシミュレーション
#[derive(Debug, Clone)]
pub struct SimulatedWatchlist {
    latency: Duration,
    outcome: SimulatedOutcome,
}

impl SimulatedWatchlist {
    pub fn new(latency: Duration, outcome: SimulatedOutcome) -> Self {
        Self { latency, outcome }
    }

    pub fn from_config(config: &WatchlistConfig) -> Self {
        let outcome = if config.fail {
            SimulatedOutcome::Fail
        } else {
            SimulatedOutcome::Succeed
        };
        Self::new(config.latency(), outcome)
    }
}

impl Default for SimulatedWatchlist {
    fn default() -> Self {
        Self::from_config(&WatchlistConfig::default())
    }
}

impl WatchlistService for SimulatedWatchlist {
    fn perform(&self, op: WatchlistOp, movie: &Movie) -> impl Future<Output = Result<()>> + Send {
        let latency = self.latency;
        let outcome = self.outcome;
        let title = movie.title.clone();
        async move {
            tracing::debug!(?op, %title, ?latency, "simulating watchlist operation");
            tokio::time::sleep(latency).await;
            match outcome {
                SimulatedOutcome::Succeed => Ok(()),
                SimulatedOutcome::Fail => Err(MlvError::SimulatedOperationFailed { title }),
            }
        }
    }
}
