use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::commands::{browse, list, toggle};
use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "mlv")]
#[command(about = "Movie list viewer with a simulated watchlist", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// カタログを一覧表示
    #[command(about = "Print the movies of a catalog")]
    List(list::Args),

    /// カタログを TUI で閲覧
    #[command(about = "Browse a catalog interactively and toggle the watchlist")]
    Browse(browse::Args),

    /// 1行のウォッチリスト状態を切り替え
    #[command(about = "Toggle the watchlist state of one movie")]
    Toggle(toggle::Args),
}

/// カタログを扱うコマンドの共通引数
#[derive(Debug, Clone, ClapArgs)]
pub struct CatalogArgs {
    /// Catalog JSON file path or http(s) URL
    pub source: String,

    /// Latency of the simulated watchlist operation in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Make every simulated watchlist operation fail
    #[arg(long)]
    pub fail: bool,

    /// Do not load thumbnails
    #[arg(long)]
    pub no_thumbnails: bool,
}

impl CatalogArgs {
    /// 設定ファイルの値にフラグを上書き
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(latency_ms) = self.latency_ms {
            config.watchlist.latency_ms = latency_ms;
        }
        if self.fail {
            config.watchlist.fail = true;
        }
        if self.no_thumbnails {
            config.http.thumbnails = false;
        }
        config
    }

    /// 設定ファイルを読み込んでフラグを反映
    pub fn resolve_config(&self) -> Result<AppConfig, String> {
        let config = AppConfig::load().map_err(|e| e.to_string())?;
        Ok(self.apply(config))
    }
}
