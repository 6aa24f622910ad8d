//! ウォッチリスト操作
//!
//! - `state`: 行アイコンの状態遷移表
//! - `service`: バックグラウンド操作の抽象化とシミュレーション実装

mod service;
mod state;

pub use service::{SimulatedOutcome, SimulatedWatchlist, WatchlistService};
pub use state::{IconState, Notice, WatchlistOp};
