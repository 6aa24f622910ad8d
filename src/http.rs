//! 共通HTTPヘルパー

use crate::error::{MlvError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

/// http(s) URL かどうか
pub fn is_http_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// レスポンス本文を取得
///
/// 非 2xx ステータスは `MlvError::HttpStatus` として返す。
/// 戻り値は (本文, Content-Type)。
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<(Vec<u8>, Option<String>)> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(MlvError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response.bytes().await?;
    Ok((bytes.to_vec(), content_type))
}

/// スピナー付きで本文を取得（CLI 用）
pub async fn fetch_bytes_with_spinner(client: &Client, url: &str) -> Result<Vec<u8>> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {url}"));
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    let result = fetch_bytes(client, url).await;
    pb.finish_and_clear();

    result.map(|(bytes, _)| bytes)
}
