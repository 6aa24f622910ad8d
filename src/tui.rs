//! TUI (Terminal User Interface) コンポーネント
//!
//! ratatui/crossterm を使用した映画一覧ブラウザを提供する。

mod browser;

pub use browser::run;
