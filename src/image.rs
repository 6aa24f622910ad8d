//! サムネイル読み込み
//!
//! バインダーは `ImageLoader` を「URL から画像を取得する」不透明な能力として扱う。
//! 読み込み失敗はプレースホルダー表示になり、エラーとして表に出さない。

use crate::config::HttpConfig;
use crate::error::{MlvError, Result};
use crate::http;
use reqwest::Client;
use std::future::Future;

/// 画像の切り抜きモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    #[default]
    CenterCrop,
}

/// 読み込み済みサムネイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub crop: CropMode,
}

impl Thumbnail {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// 画像ローダー
pub trait ImageLoader: Send + Sync + 'static {
    fn fetch(&self, url: &str, crop: CropMode) -> impl Future<Output = Result<Thumbnail>> + Send;
}

/// reqwest によるローダー
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: Client,
}

impl HttpImageLoader {
    pub fn new(config: &HttpConfig) -> Self {
        Self {
            client: config.build_client(),
        }
    }
}

impl ImageLoader for HttpImageLoader {
    fn fetch(&self, url: &str, crop: CropMode) -> impl Future<Output = Result<Thumbnail>> + Send {
        let client = self.client.clone();
        let url = url.to_string();
        async move {
            let (data, content_type) = http::fetch_bytes(&client, &url).await?;
            Ok(Thumbnail {
                url,
                data,
                content_type,
                crop,
            })
        }
    }
}

/// サムネイルを読み込まないローダー（常にプレースホルダー）
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLoader;

impl ImageLoader for DisabledLoader {
    fn fetch(&self, _url: &str, _crop: CropMode) -> impl Future<Output = Result<Thumbnail>> + Send {
        std::future::ready(Err(MlvError::ThumbnailsDisabled))
    }
}

/// 設定に応じたローダー
#[derive(Debug, Clone)]
pub enum ConfiguredLoader {
    Http(HttpImageLoader),
    Disabled(DisabledLoader),
}

impl ConfiguredLoader {
    pub fn from_config(config: &HttpConfig) -> Self {
        if config.thumbnails {
            ConfiguredLoader::Http(HttpImageLoader::new(config))
        } else {
            ConfiguredLoader::Disabled(DisabledLoader)
        }
    }
}

impl ImageLoader for ConfiguredLoader {
    fn fetch(&self, url: &str, crop: CropMode) -> impl Future<Output = Result<Thumbnail>> + Send {
        let pending = match self {
            ConfiguredLoader::Http(loader) => Some(loader.fetch(url, crop)),
            ConfiguredLoader::Disabled(_) => None,
        };
        async move {
            match pending {
                Some(fut) => fut.await,
                None => Err(MlvError::ThumbnailsDisabled),
            }
        }
    }
}
