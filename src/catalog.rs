//! 映画カタログの読み込み
//!
//! JSON 配列を読み込み、映画一覧と初期アイコン状態を同じ順序で返す。
//!
//! ```json
//! [
//!   {
//!     "title": "Dawn of the Planet of the Apes",
//!     "image": "https://example.com/1.jpg",
//!     "rating": 8.3,
//!     "releaseYear": 2014,
//!     "genre": ["Action", "Drama", "Sci-Fi"],
//!     "state": "added"
//!   }
//! ]
//! ```
//!
//! `id` を省略した場合はファイル内の位置をIDとする。

use crate::config::HttpConfig;
use crate::error::{MlvError, Result};
use crate::http;
use crate::movie::{Movie, MovieId};
use crate::watchlist::IconState;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// カタログファイルの1エントリ
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(default)]
    id: Option<u64>,
    title: String,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    genre: Vec<String>,
    #[serde(alias = "releaseYear")]
    year: i32,
    #[serde(alias = "image", default)]
    thumbnail_url: String,
    #[serde(default)]
    state: IconState,
}

/// 読み込み済みカタログ（movies と states はインデックスで対応）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub states: Vec<IconState>,
}

impl Catalog {
    pub fn into_parts(self) -> (Vec<Movie>, Vec<IconState>) {
        (self.movies, self.states)
    }
}

/// JSON 文字列からカタログを構築
pub fn parse(json: &str) -> Result<Catalog> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    let mut catalog = Catalog::default();

    for (position, entry) in entries.into_iter().enumerate() {
        let id = MovieId(entry.id.unwrap_or(position as u64));
        if !seen.insert(id) {
            return Err(MlvError::InvalidCatalog(format!("duplicate movie id {id}")));
        }
        if entry.title.trim().is_empty() {
            return Err(MlvError::InvalidCatalog(format!(
                "movie at position {position} has an empty title"
            )));
        }
        catalog.states.push(entry.state);
        catalog.movies.push(Movie {
            id,
            title: entry.title,
            rating: entry.rating,
            genre: entry.genre,
            year: entry.year,
            thumbnail_url: entry.thumbnail_url,
        });
    }

    Ok(catalog)
}

/// ファイルパスまたは http(s) URL からカタログを読み込む
pub async fn load(source: &str, config: &HttpConfig) -> Result<Catalog> {
    let json = if http::is_http_url(source) {
        let client = config.build_client();
        let bytes = http::fetch_bytes_with_spinner(&client, source).await?;
        String::from_utf8(bytes)
            .map_err(|e| MlvError::InvalidCatalog(format!("catalog is not UTF-8: {e}")))?
    } else {
        std::fs::read_to_string(Path::new(source))?
    };
    let catalog = parse(&json)?;
    tracing::debug!(source, movies = catalog.movies.len(), "catalog loaded");
    Ok(catalog)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
