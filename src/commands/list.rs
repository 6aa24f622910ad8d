//! mlv list コマンド
//!
//! カタログの各行をバインダー経由で行ビューに書き込み、一覧表示する。

use crate::binder::{ListBinder, RowView};
use crate::catalog;
use crate::config::AppConfig;
use crate::image::DisabledLoader;
use crate::output::{icon_label, CommandSummary};
use crate::watchlist::{IconState, SimulatedWatchlist};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Catalog JSON file path or http(s) URL
    pub source: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// 出力用の1行
#[derive(Debug, Clone, Serialize)]
struct ListedRow {
    index: usize,
    id: u64,
    title: String,
    rating: String,
    genre: String,
    year: String,
    state: IconState,
}

pub async fn run(args: Args) -> Result<(), String> {
    let config = AppConfig::load().map_err(|e| e.to_string())?;
    let (movies, states) = catalog::load(&args.source, &config.http)
        .await
        .map_err(|e| e.to_string())?
        .into_parts();

    let binder = ListBinder::new(
        movies,
        states,
        DisabledLoader,
        SimulatedWatchlist::from_config(&config.watchlist),
    )
    .map_err(|e| e.to_string())?;

    let rows = bind_rows(&binder).map_err(|e| e.to_string())?;

    if args.json {
        print_json(&rows)?;
    } else {
        print_table(&rows);
    }
    Ok(())
}

/// 全行を bind して出力用の行に変換
fn bind_rows(
    binder: &ListBinder<DisabledLoader, SimulatedWatchlist>,
) -> crate::error::Result<Vec<ListedRow>> {
    let mut view = RowView::new();
    let mut rows = Vec::with_capacity(binder.row_count());

    for index in 0..binder.row_count() {
        binder.bind(index, &mut view)?;
        let id = binder.movie(index).map(|m| m.id.0).unwrap_or_default();
        rows.push(ListedRow {
            index,
            id,
            title: view.title.clone(),
            rating: view.rating.clone(),
            genre: view.genre.clone(),
            year: view.year.clone(),
            state: view.action_icon,
        });
    }
    Ok(rows)
}

fn print_json(rows: &[ListedRow]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(rows).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn print_table(rows: &[ListedRow]) {
    if rows.is_empty() {
        println!("{}", CommandSummary::empty().line());
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Title", "Rating", "Genre", "Year", "Watchlist"]);

    for row in rows {
        table.add_row(vec![
            row.index.to_string(),
            row.title.clone(),
            row.rating.clone(),
            row.genre.clone(),
            row.year.clone(),
            icon_label(row.state),
        ]);
    }

    println!("{table}");
    println!("Total: {} movie(s)", rows.len());
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
