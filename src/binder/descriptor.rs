//! 行ビュー記述子
//!
//! ホストのリストウィジェットが生成・再利用する1行分の表示スロット。
//! バインダーは記述子を所有せず、`bind` 時に値を書き込むだけ。

use super::list_binder::{BinderEvent, TapTarget};
use crate::error::Result;
use crate::image::Thumbnail;
use crate::watchlist::IconState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;

/// 1行分の表示スロットへの書き込み口
pub trait RowDescriptor {
    fn set_title(&mut self, title: &str);
    fn set_rating(&mut self, rating: &str);
    fn set_genre(&mut self, genre: &str);
    fn set_year(&mut self, year: &str);
    fn set_action_icon(&mut self, icon: IconState);
    fn set_tap_handler(&mut self, handler: TapHandler);
    fn thumbnail(&self) -> &ImageSlot;
}

// ============================================================================
// TapHandler
// ============================================================================

/// アクションアイコンのタップハンドラ
///
/// bind 時点の `TapTarget` を値で保持する。起動するとバインダーの
/// イベントキューにタップを積むだけで、状態には直接触れない。
#[derive(Debug, Clone)]
pub struct TapHandler {
    target: TapTarget,
    events: UnboundedSender<BinderEvent>,
}

impl TapHandler {
    pub(super) fn new(target: TapTarget, events: UnboundedSender<BinderEvent>) -> Self {
        Self { target, events }
    }

    #[cfg(test)]
    pub fn target(&self) -> TapTarget {
        self.target
    }

    /// タップを通知（バインダーが破棄済みなら何もしない）
    pub fn invoke(&self) {
        if self.events.send(BinderEvent::Tap(self.target)).is_err() {
            tracing::debug!(tap = ?self.target, "tap dropped: binder is gone");
        }
    }
}

// ============================================================================
// ImageSlot
// ============================================================================

/// 画像スロットの内容
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotImage {
    #[default]
    Empty,
    Loading {
        url: String,
    },
    Loaded(Thumbnail),
    /// 読み込み失敗時の代替表示
    Placeholder {
        url: String,
    },
}

#[derive(Debug, Default)]
struct SlotInner {
    ticket: u64,
    image: SlotImage,
}

/// 非同期に埋められる画像スロット
///
/// 記述子が再利用されても最後に発行した読み込みだけが反映される。
/// `resolve` はバインダーの所有スレッドからのみ呼ばれる。
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    inner: Arc<Mutex<SlotInner>>,
}

impl ImageSlot {
    fn lock(&self) -> MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 新しい読み込みを開始し、チケットを返す
    pub fn begin(&self, url: &str) -> u64 {
        let mut inner = self.lock();
        inner.ticket += 1;
        inner.image = SlotImage::Loading {
            url: url.to_string(),
        };
        inner.ticket
    }

    /// 読み込み結果を反映（古いチケットなら false）
    pub fn resolve(&self, ticket: u64, result: Result<Thumbnail>) -> bool {
        let mut inner = self.lock();
        if inner.ticket != ticket {
            return false;
        }
        let url = match &inner.image {
            SlotImage::Loading { url } => url.clone(),
            _ => return false,
        };
        inner.image = match result {
            Ok(thumbnail) => SlotImage::Loaded(thumbnail),
            Err(e) => {
                tracing::debug!(%url, error = %e, "thumbnail load failed, using placeholder");
                SlotImage::Placeholder { url }
            }
        };
        true
    }

    /// `url` の読み込み中、または読み込み済みかどうか
    pub fn holds(&self, url: &str) -> bool {
        match &self.lock().image {
            SlotImage::Empty => false,
            SlotImage::Loading { url: current } | SlotImage::Placeholder { url: current } => {
                current == url
            }
            SlotImage::Loaded(thumbnail) => thumbnail.url == url,
        }
    }

    pub fn image(&self) -> SlotImage {
        self.lock().image.clone()
    }

    #[cfg(test)]
    pub fn ticket(&self) -> u64 {
        self.lock().ticket
    }
}

// ============================================================================
// RowView
// ============================================================================

/// 汎用の行ビュー（TUI とテストで使用）
#[derive(Debug, Clone, Default)]
pub struct RowView {
    pub title: String,
    pub rating: String,
    pub genre: String,
    pub year: String,
    pub action_icon: IconState,
    thumbnail: ImageSlot,
    tap_handler: Option<TapHandler>,
}

impl RowView {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn tap_handler(&self) -> Option<&TapHandler> {
        self.tap_handler.as_ref()
    }

    /// アクションアイコンのタップ（ハンドラ未設定なら false）
    pub fn tap(&self) -> bool {
        match &self.tap_handler {
            Some(handler) => {
                handler.invoke();
                true
            }
            None => false,
        }
    }
}

impl RowDescriptor for RowView {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_rating(&mut self, rating: &str) {
        self.rating = rating.to_string();
    }

    fn set_genre(&mut self, genre: &str) {
        self.genre = genre.to_string();
    }

    fn set_year(&mut self, year: &str) {
        self.year = year.to_string();
    }

    fn set_action_icon(&mut self, icon: IconState) {
        self.action_icon = icon;
    }

    fn set_tap_handler(&mut self, handler: TapHandler) {
        self.tap_handler = Some(handler);
    }

    fn thumbnail(&self) -> &ImageSlot {
        &self.thumbnail
    }
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
