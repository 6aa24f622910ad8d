//! ログ設定
//!
//! `MLV_LOG` で tracing のフィルタを指定する（既定は warn）。
//! 出力先は stderr。TUI 実行中は `MLV_LOG` が明示されない限り出力しない。

use crate::env::{EnvVar, LOG_FILTER_VAR};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// ログの出力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// stderr に出力
    Stderr,
    /// 代替スクリーン使用中（明示指定がなければ破棄）
    Tui,
}

/// フィルタ文字列を決定
fn filter_directive(mode: LogMode) -> Option<String> {
    match (EnvVar::get(LOG_FILTER_VAR), mode) {
        (Some(filter), _) => Some(filter),
        (None, LogMode::Stderr) => Some(DEFAULT_FILTER.to_string()),
        (None, LogMode::Tui) => None,
    }
}

/// グローバルサブスクライバを初期化（2回目以降は何もしない）
pub fn init(mode: LogMode) {
    let Some(directive) = filter_directive(mode) else {
        return;
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
