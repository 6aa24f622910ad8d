//! 設定ファイルとHTTP設定
//!
//! `config.toml` の探索順:
//! 1. 環境変数 `MLV_CONFIG`
//! 2. `$XDG_CONFIG_HOME/mlv/config.toml`
//! 3. `~/.config/mlv/config.toml`
//!
//! ファイルが存在しない場合はデフォルト値を使用する。

use crate::env::{EnvVar, CONFIG_PATH_VAR};
use crate::error::Result;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// アプリケーション設定
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub watchlist: WatchlistConfig,
    pub http: HttpConfig,
}

/// シミュレートされたウォッチリスト操作の設定
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchlistConfig {
    /// 操作1回あたりの遅延（ミリ秒）
    pub latency_ms: u64,
    /// true なら全操作を失敗させる
    pub fail: bool,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            fail: false,
        }
    }
}

impl WatchlistConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// HTTP設定（カタログ取得とサムネイル読み込みで共有）
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// タイムアウト（秒）。0 ならタイムアウトなし
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
    /// false ならサムネイルを読み込まない
    pub thumbnails: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "mlv-cli".to_string(),
            thumbnails: true,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// reqwest::Client を構築
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_else(|_| Client::new())
    }
}

impl AppConfig {
    /// 既定の場所から設定を読み込む
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// 指定パスから設定を読み込む（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// 設定ファイルのパスを解決
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = EnvVar::get(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }
    if let Some(xdg) = EnvVar::get("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("mlv").join("config.toml"));
    }
    EnvVar::get("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("mlv")
            .join("config.toml")
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
