//! ブラウザ画面の Model/Msg 定義
//!
//! 行ビューはプールで再利用する。可視行 `row` はスロット `row % capacity` に
//! バインドされ、スクロールで別の行が同じスロットを使い回す。

use crate::binder::{ListBinder, RowView};
use crate::error::Result;
use crate::image::ImageLoader;
use crate::watchlist::{Notice, WatchlistService};
use crossterm::event::KeyCode;
use std::time::{Duration, Instant};

/// 通知の表示時間
pub const TOAST_DURATION: Duration = Duration::from_secs(2);

// ============================================================================
// RowPool（再利用される行ビュー）
// ============================================================================

#[derive(Debug, Default)]
struct PooledRow {
    view: RowView,
    bound: Option<usize>,
    dirty: bool,
}

/// 行ビューのプール
#[derive(Debug, Default)]
pub struct RowPool {
    slots: Vec<PooledRow>,
}

impl RowPool {
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 容量を変更（変わった場合は全スロットを作り直す）
    pub fn resize(&mut self, capacity: usize) {
        if capacity != self.slots.len() {
            self.slots = (0..capacity).map(|_| PooledRow::default()).collect();
        }
    }

    fn slot_mut(&mut self, row: usize) -> Option<&mut PooledRow> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        self.slots.get_mut(row % capacity)
    }

    /// `rows` の各行がバインド済みになるようにする
    ///
    /// スロットが別の行を保持しているか、無効化されていれば再 bind する。
    pub fn ensure_bound<L: ImageLoader, S: WatchlistService>(
        &mut self,
        binder: &ListBinder<L, S>,
        rows: std::ops::Range<usize>,
    ) -> Result<()> {
        for row in rows {
            let Some(slot) = self.slot_mut(row) else {
                return Ok(());
            };
            if slot.bound != Some(row) || slot.dirty {
                binder.bind(row, &mut slot.view)?;
                slot.bound = Some(row);
                slot.dirty = false;
            }
        }
        Ok(())
    }

    /// 行を無効化（次の同期で再 bind）
    pub fn invalidate(&mut self, row: usize) {
        if let Some(slot) = self.slot_mut(row) {
            if slot.bound == Some(row) {
                slot.dirty = true;
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        for slot in &mut self.slots {
            slot.dirty = true;
        }
    }

    /// 行 `row` をバインドしている行ビュー
    pub fn get(&self, row: usize) -> Option<&RowView> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        self.slots
            .get(row % capacity)
            .filter(|slot| slot.bound == Some(row))
            .map(|slot| &slot.view)
    }
}

// ============================================================================
// Toast（一時通知）
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub notice: Notice,
    pub shown_at: Instant,
}

// ============================================================================
// Msg
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Up,
    Down,
    PageUp,
    PageDown,
    /// 選択行のアクションアイコンをタップ
    Tap,
    /// カタログを読み直して一覧を差し替える
    Reload,
    Quit,
}

/// キー入力をメッセージに変換
pub fn key_to_msg(key: KeyCode) -> Option<Msg> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => Some(Msg::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Msg::Down),
        KeyCode::PageUp => Some(Msg::PageUp),
        KeyCode::PageDown => Some(Msg::PageDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Msg::Tap),
        KeyCode::Char('r') => Some(Msg::Reload),
        KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
        _ => None,
    }
}

// ============================================================================
// Model
// ============================================================================

/// ブラウザ画面の状態
pub struct Model<L, S> {
    pub binder: ListBinder<L, S>,
    pub pool: RowPool,
    /// 選択中の行
    pub selected: usize,
    /// 先頭に表示している行
    pub offset: usize,
    pub toast: Option<Toast>,
    /// 次のループでカタログを読み直す
    pub reload_requested: bool,
    pub should_quit: bool,
}

impl<L: ImageLoader, S: WatchlistService> Model<L, S> {
    pub fn new(binder: ListBinder<L, S>) -> Self {
        Self {
            binder,
            pool: RowPool::default(),
            selected: 0,
            offset: 0,
            toast: None,
            reload_requested: false,
            should_quit: false,
        }
    }

    /// 表示可能な行数
    pub fn viewport(&self) -> usize {
        self.pool.capacity()
    }

    /// 現在表示している行の範囲
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        let end = (self.offset + self.viewport()).min(self.binder.row_count());
        self.offset.min(end)..end
    }

    pub fn show_toast(&mut self, notice: Notice, now: Instant) {
        self.toast = Some(Toast {
            notice,
            shown_at: now,
        });
    }

    /// 表示時間を過ぎた通知を消す
    pub fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| now.duration_since(t.shown_at) >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }
}
