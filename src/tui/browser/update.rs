//! ブラウザ画面の update（状態更新）

use super::model::{Model, Msg};
use crate::binder::{Effect, Redraw};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::image::ImageLoader;
use crate::watchlist::{Notice, WatchlistService};
use std::time::Instant;

/// メッセージに応じて状態を更新
pub fn update<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>, msg: Msg) {
    let page = model.viewport().max(1);
    let current = model.selected;
    match msg {
        Msg::Up => select(model, current.saturating_sub(1)),
        Msg::Down => select(model, current + 1),
        Msg::PageUp => select(model, current.saturating_sub(page)),
        Msg::PageDown => select(model, current + page),
        Msg::Tap => tap_selected(model),
        Msg::Reload => model.reload_requested = true,
        Msg::Quit => model.should_quit = true,
    }
}

/// 選択行を移動し、表示範囲に収まるようにスクロール
fn select<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>, row: usize) {
    let len = model.binder.row_count();
    if len == 0 {
        model.selected = 0;
        model.offset = 0;
        return;
    }
    model.selected = row.min(len - 1);
    scroll_to_selected(model);
}

fn scroll_to_selected<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>) {
    let viewport = model.viewport().max(1);
    if model.selected < model.offset {
        model.offset = model.selected;
    } else if model.selected >= model.offset + viewport {
        model.offset = model.selected + 1 - viewport;
    }
}

/// 選択行の行ビューに設定されたタップハンドラを起動
fn tap_selected<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>) {
    if let Some(row) = model.pool.get(model.selected) {
        row.tap();
    }
}

/// 表示可能な行数を反映
pub fn resize<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>, rows: usize) {
    if model.viewport() != rows {
        model.pool.resize(rows);
        scroll_to_selected(model);
    }
}

/// 可視行をバインド
pub fn sync<L: ImageLoader, S: WatchlistService>(model: &mut Model<L, S>) -> Result<()> {
    let rows = model.visible_rows();
    model.pool.ensure_bound(&model.binder, rows)
}

/// バインダーからの効果を反映
pub fn apply_effect<L: ImageLoader, S: WatchlistService>(
    model: &mut Model<L, S>,
    effect: Effect,
    now: Instant,
) {
    match effect.redraw {
        Some(Redraw::Row(row)) => model.pool.invalidate(row),
        Some(Redraw::All) => {
            model.pool.invalidate_all();
            let selected = model.selected;
            select(model, selected);
        }
        // 画像スロットは共有されているので再描画だけでよい
        Some(Redraw::Thumbnail(_)) | None => {}
    }
    if let Some(notice) = effect.notice {
        model.show_toast(notice, now);
    }
}

/// 読み直したカタログで一覧を差し替える
///
/// 実行中の操作は中断され、その結果は反映されない。
/// 読み込みに失敗した場合は一覧をそのまま残して通知する。
pub fn reload<L: ImageLoader, S: WatchlistService>(
    model: &mut Model<L, S>,
    loaded: Result<Catalog>,
    now: Instant,
) {
    model.reload_requested = false;
    let replaced = loaded.and_then(|catalog| {
        let (movies, states) = catalog.into_parts();
        model.binder.replace_movies(movies, states)
    });
    match replaced {
        Ok(effect) => {
            tracing::debug!(rows = model.binder.row_count(), "catalog reloaded");
            apply_effect(model, effect, now);
        }
        Err(e) => {
            tracing::warn!(error = %e, "catalog reload failed");
            model.show_toast(Notice::Failed, now);
        }
    }
}

#[cfg(test)]
#[path = "update_test.rs"]
mod tests;
