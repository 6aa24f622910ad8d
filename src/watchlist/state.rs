//! 行アイコンの状態遷移
//!
//! | 現在    | タップで開始する操作 | 成功    | 失敗  |
//! |---------|----------------------|---------|-------|
//! | Addable | Add                  | Added   | Error |
//! | Added   | Remove               | Addable | Error |
//! | Error   | RetryAdd             | Added   | Error |

use serde::{Deserialize, Serialize};
use std::fmt;

/// 行のアクションアイコン状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconState {
    /// 未登録（追加可能）
    #[default]
    Addable,
    /// 登録済み
    Added,
    /// 直前の操作が失敗（タップで再試行）
    Error,
}

impl IconState {
    /// タップ時に開始する操作
    pub fn tap_op(self) -> WatchlistOp {
        match self {
            IconState::Addable => WatchlistOp::Add,
            IconState::Added => WatchlistOp::Remove,
            IconState::Error => WatchlistOp::RetryAdd,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IconState::Addable => "addable",
            IconState::Added => "added",
            IconState::Error => "error",
        }
    }
}

impl fmt::Display for IconState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ウォッチリスト操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchlistOp {
    Add,
    Remove,
    RetryAdd,
}

impl WatchlistOp {
    /// 成功時の遷移先
    pub fn on_success(self) -> IconState {
        match self {
            WatchlistOp::Add | WatchlistOp::RetryAdd => IconState::Added,
            WatchlistOp::Remove => IconState::Addable,
        }
    }

    /// 失敗時の遷移先（常に Error）
    pub fn on_failure(self) -> IconState {
        IconState::Error
    }

    /// 成功時の通知（追加系のみタイトルを表示）
    pub fn success_notice(self, title: &str) -> Option<Notice> {
        match self {
            WatchlistOp::Add | WatchlistOp::RetryAdd => Some(Notice::Added {
                title: title.to_string(),
            }),
            WatchlistOp::Remove => None,
        }
    }

    pub fn progress_label(self) -> &'static str {
        match self {
            WatchlistOp::Add => "Adding to watchlist",
            WatchlistOp::Remove => "Removing from watchlist",
            WatchlistOp::RetryAdd => "Retrying add to watchlist",
        }
    }
}

/// ユーザー向けの一時通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// 追加成功（映画タイトル付き）
    Added { title: String },
    /// 操作失敗（汎用メッセージ）
    Failed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Added { title } => format!("{title} added to watchlist"),
            Notice::Failed => "Something went wrong".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
