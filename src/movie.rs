//! 映画レコード
//!
//! バインダーからは読み取り専用。行の表示用テキストの整形もここで行う。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 映画の安定ID（並べ替え後も同じ映画を指す）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 映画
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub rating: f64,
    pub genre: Vec<String>,
    pub year: i32,
    pub thumbnail_url: String,
}

impl Movie {
    /// ジャンルを ", " で連結したテキスト
    pub fn genre_text(&self) -> String {
        join_genres(&self.genre)
    }

    /// "Rating: 8.3" 形式の評価テキスト
    pub fn rating_text(&self) -> String {
        format!("Rating: {}", format_rating(self.rating))
    }

    pub fn year_text(&self) -> String {
        self.year.to_string()
    }
}

/// ジャンルタグを連結
///
/// 空リストは空文字列。末尾に区切り文字は残らない。
pub fn join_genres(genres: &[String]) -> String {
    genres.join(", ")
}

/// 評価値を整形（整数値でも小数点以下1桁は表示する）
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() && rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        rating.to_string()
    }
}

#[cfg(test)]
#[path = "movie_test.rs"]
mod tests;
