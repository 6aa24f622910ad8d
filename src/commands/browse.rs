//! mlv browse コマンド
//!
//! カタログを読み込み、TUI ブラウザで一覧表示する。

use crate::binder::ListBinder;
use crate::catalog;
use crate::cli::CatalogArgs;
use crate::image::ConfiguredLoader;
use crate::logging::{self, LogMode};
use crate::tui;
use crate::watchlist::SimulatedWatchlist;
use clap::Parser;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

pub async fn run(args: Args) -> Result<(), String> {
    logging::init(LogMode::Tui);

    let config = args.catalog.resolve_config()?;
    let (movies, states) = catalog::load(&args.catalog.source, &config.http)
        .await
        .map_err(|e| e.to_string())?
        .into_parts();

    let binder = ListBinder::new(
        movies,
        states,
        ConfiguredLoader::from_config(&config.http),
        SimulatedWatchlist::from_config(&config.watchlist),
    )
    .map_err(|e| e.to_string())?;

    let source = args.catalog.source.clone();
    let http = config.http.clone();
    let runtime = tokio::runtime::Handle::current();
    let reload = move || runtime.block_on(catalog::load(&source, &http));

    // TUI はブロッキングで動作し、バックグラウンド処理はワーカースレッドで進む
    tokio::task::block_in_place(|| tui::run(binder, reload))
        .map_err(|e| format!("TUI error: {e}"))
}
