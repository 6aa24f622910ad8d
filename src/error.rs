use thiserror::Error;

/// MLV統一エラー型
#[derive(Debug, Error)]
pub enum MlvError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {url} (status: {status})")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Icon state count ({states}) does not match movie count ({movies})")]
    StateLengthMismatch { movies: usize, states: usize },

    #[error("Row {index} is out of range (row count: {len})")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Row {index} already has an operation in flight")]
    RowBusy { index: usize },

    #[error("Watchlist operation failed for '{title}'")]
    SimulatedOperationFailed { title: String },

    #[error("Thumbnails are disabled")]
    ThumbnailsDisabled,

    #[error("No async runtime available")]
    RuntimeUnavailable,
}

pub type Result<T> = std::result::Result<T, MlvError>;

impl MlvError {
    /// ウォッチリスト操作の失敗かどうか（行を Error 状態に遷移させる）
    pub fn is_operation_failure(&self) -> bool {
        matches!(self, MlvError::SimulatedOperationFailed { .. })
    }
}
