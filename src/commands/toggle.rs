//! mlv toggle コマンド
//!
//! 1行分のタップを実行し、シミュレートされた操作の完了を待って結果を表示する。

use crate::binder::{Effect, ListBinder, Redraw, TapOutcome};
use crate::catalog;
use crate::cli::CatalogArgs;
use crate::error::{MlvError, Result};
use crate::image::ImageLoader;
use crate::output::{notice_line, CommandSummary};
use crate::watchlist::{IconState, Notice, SimulatedWatchlist, WatchlistService};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Row index of the movie to toggle
    pub index: usize,
}

/// 切り替え結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    pub title: String,
    pub before: IconState,
    pub after: IconState,
    pub notice: Option<Notice>,
}

pub async fn run(args: Args) -> std::result::Result<(), String> {
    let config = args.catalog.resolve_config()?;
    let (movies, states) = catalog::load(&args.catalog.source, &config.http)
        .await
        .map_err(|e| e.to_string())?
        .into_parts();

    // bind しないのでサムネイルは読み込まない
    let mut binder = ListBinder::new(
        movies,
        states,
        crate::image::DisabledLoader,
        SimulatedWatchlist::from_config(&config.watchlist),
    )
    .map_err(|e| e.to_string())?;

    let report = toggle_row(&mut binder, args.index)
        .await
        .map_err(|e| e.to_string())?;

    println!(
        "{}",
        CommandSummary::transition(&report.title, report.before, report.after).line()
    );
    if let Some(notice) = &report.notice {
        println!("{}", notice_line(notice));
    }
    Ok(())
}

/// タップを実行し、その行の完了まで待つ
pub async fn toggle_row<L: ImageLoader, S: WatchlistService>(
    binder: &mut ListBinder<L, S>,
    index: usize,
) -> Result<ToggleReport> {
    let before = binder
        .icon_state(index)
        .ok_or(MlvError::RowOutOfRange {
            index,
            len: binder.row_count(),
        })?;
    let title = binder
        .movie(index)
        .map(|m| m.title.clone())
        .unwrap_or_default();

    let op = match binder.on_action_tap(index)? {
        TapOutcome::Started(op) => op,
        TapOutcome::Busy => return Err(MlvError::RowBusy { index }),
    };

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("{}: {}", op.progress_label(), title));
    pb.enable_steady_tick(Duration::from_millis(80));

    let effect = wait_for_row(binder, index).await;
    pb.finish_and_clear();

    Ok(ToggleReport {
        title,
        before,
        after: binder.icon_state(index).unwrap_or(before),
        notice: effect.notice,
    })
}

async fn wait_for_row<L: ImageLoader, S: WatchlistService>(
    binder: &mut ListBinder<L, S>,
    index: usize,
) -> Effect {
    loop {
        let effect = binder.next_event().await;
        if effect.redraw == Some(Redraw::Row(index)) {
            return effect;
        }
    }
}

#[cfg(test)]
#[path = "toggle_test.rs"]
mod tests;
