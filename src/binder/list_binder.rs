//! リストバインダー
//!
//! 映画一覧と行ごとのアイコン状態を保持し、ホストの要求に応じて
//! 行記述子へ値を書き込む。
//!
//! ## スレッドモデル
//!
//! 状態の変更はすべて `&mut ListBinder` を持つ所有スレッドで行う。
//! 画像読み込みとウォッチリスト操作は tokio タスクで実行され、結果は
//! `BinderEvent` としてキューに積まれる。所有スレッドが
//! `process_pending` / `next_event` で取り出して反映する。
//!
//! ## 世代と行ID
//!
//! `replace_movies` のたびに世代が進み、実行中の操作は中断される。
//! タップと完了通知は bind 時点の世代と映画IDを持ち、世代が古いものや
//! IDが一覧から消えたものは無視する。

use super::descriptor::{ImageSlot, RowDescriptor, TapHandler};
use crate::error::{MlvError, Result};
use crate::image::{CropMode, ImageLoader, Thumbnail};
use crate::movie::{Movie, MovieId};
use crate::watchlist::{IconState, Notice, WatchlistOp, WatchlistService};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

// ============================================================================
// イベントと効果
// ============================================================================

/// タップハンドラが bind 時に捕捉する値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapTarget {
    /// bind 時点の行位置（表示用）
    pub index: usize,
    pub movie_id: MovieId,
    pub generation: u64,
}

/// バックグラウンド操作の完了通知
#[derive(Debug)]
pub struct Completion {
    pub movie_id: MovieId,
    pub generation: u64,
    pub op: WatchlistOp,
    pub result: Result<()>,
}

/// 所有スレッドで処理されるイベント
#[derive(Debug)]
pub enum BinderEvent {
    /// アクションアイコンのタップ
    Tap(TapTarget),
    /// ウォッチリスト操作の完了
    ActionFinished(Completion),
    /// サムネイル読み込みの完了
    ImageLoaded {
        row: usize,
        slot: ImageSlot,
        ticket: u64,
        result: Result<Thumbnail>,
    },
}

/// ホストへの再描画要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// 行のデータが変わった（再 bind が必要）
    Row(usize),
    /// 一覧全体が変わった
    All,
    /// 行の画像スロットだけが変わった（再 bind は不要）
    Thumbnail(usize),
}

/// イベント処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    pub redraw: Option<Redraw>,
    pub notice: Option<Notice>,
}

impl Effect {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw(redraw: Redraw) -> Self {
        Self {
            redraw: Some(redraw),
            notice: None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.redraw.is_none() && self.notice.is_none()
    }
}

/// タップの受付結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// 操作を開始した
    Started(WatchlistOp),
    /// 同じ行の操作が実行中のため拒否
    Busy,
}

// ============================================================================
// ListBinder
// ============================================================================

/// 映画一覧を行記述子にバインドする
pub struct ListBinder<L, S> {
    movies: Vec<Movie>,
    icon_states: Vec<IconState>,
    generation: u64,
    in_flight: HashMap<MovieId, JoinHandle<()>>,
    loader: Arc<L>,
    service: Arc<S>,
    events_tx: UnboundedSender<BinderEvent>,
    events_rx: UnboundedReceiver<BinderEvent>,
    runtime: Handle,
}

impl<L: ImageLoader, S: WatchlistService> ListBinder<L, S> {
    /// バインダーを作成
    ///
    /// tokio ランタイム内で呼ぶ必要がある。
    /// `movies` と `icon_states` は同じ長さでなければならない。
    pub fn new(movies: Vec<Movie>, icon_states: Vec<IconState>, loader: L, service: S) -> Result<Self> {
        check_aligned(&movies, &icon_states)?;
        let runtime = Handle::try_current().map_err(|_| MlvError::RuntimeUnavailable)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            movies,
            icon_states,
            generation: 0,
            in_flight: HashMap::new(),
            loader: Arc::new(loader),
            service: Arc::new(service),
            events_tx,
            events_rx,
            runtime,
        })
    }

    /// 行数（映画一覧の長さ）
    pub fn row_count(&self) -> usize {
        self.movies.len()
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    #[cfg(test)]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn icon_state(&self, index: usize) -> Option<IconState> {
        self.icon_states.get(index).copied()
    }

    #[cfg(test)]
    pub fn icon_states(&self) -> &[IconState] {
        &self.icon_states
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 行の操作が実行中かどうか
    pub fn is_busy(&self, index: usize) -> bool {
        self.movies
            .get(index)
            .is_some_and(|m| self.in_flight.contains_key(&m.id))
    }

    #[cfg(test)]
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    fn index_of(&self, id: MovieId) -> Option<usize> {
        self.movies.iter().position(|m| m.id == id)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.movies.len() {
            Ok(())
        } else {
            Err(MlvError::RowOutOfRange {
                index,
                len: self.movies.len(),
            })
        }
    }

    /// 行記述子に映画 `index` の内容を書き込む
    ///
    /// サムネイルの読み込みは投げっぱなしで、完了は `ImageLoaded` イベントで届く。
    /// 記述子が同じ URL を保持していれば読み込み直さない。
    pub fn bind<D: RowDescriptor + ?Sized>(&self, index: usize, row: &mut D) -> Result<()> {
        self.check_index(index)?;
        let movie = &self.movies[index];
        tracing::trace!(index, id = %movie.id, "bind row");

        row.set_title(&movie.title);
        row.set_rating(&movie.rating_text());
        row.set_year(&movie.year_text());
        row.set_genre(&movie.genre_text());
        row.set_action_icon(self.icon_states[index]);
        row.set_tap_handler(TapHandler::new(
            TapTarget {
                index,
                movie_id: movie.id,
                generation: self.generation,
            },
            self.events_tx.clone(),
        ));

        let slot = row.thumbnail();
        if !slot.holds(&movie.thumbnail_url) {
            self.load_thumbnail(index, &movie.thumbnail_url, slot);
        }
        Ok(())
    }

    fn load_thumbnail(&self, row: usize, url: &str, slot: &ImageSlot) {
        let ticket = slot.begin(url);
        let slot = slot.clone();
        let url = url.to_string();
        let loader = Arc::clone(&self.loader);
        let events = self.events_tx.clone();

        self.runtime.spawn(async move {
            let result = loader.fetch(&url, CropMode::CenterCrop).await;
            let _ = events.send(BinderEvent::ImageLoaded {
                row,
                slot,
                ticket,
                result,
            });
        });
    }

    /// 行 `index` のアクションアイコンがタップされた
    ///
    /// 現在の状態から操作を決め、バックグラウンドで実行する。
    /// 同じ行の操作が実行中なら `Busy` を返して何もしない。
    pub fn on_action_tap(&mut self, index: usize) -> Result<TapOutcome> {
        self.check_index(index)?;
        let movie = self.movies[index].clone();

        if self.in_flight.contains_key(&movie.id) {
            tracing::debug!(index, id = %movie.id, "tap rejected: operation in flight");
            return Ok(TapOutcome::Busy);
        }

        let op = self.icon_states[index].tap_op();
        let generation = self.generation;
        let service = Arc::clone(&self.service);
        let events = self.events_tx.clone();
        let movie_id = movie.id;
        tracing::debug!(index, id = %movie_id, ?op, generation, "starting watchlist operation");

        let handle = self.runtime.spawn(async move {
            let result = service.perform(op, &movie).await;
            let _ = events.send(BinderEvent::ActionFinished(Completion {
                movie_id,
                generation,
                op,
                result,
            }));
        });
        self.in_flight.insert(movie_id, handle);

        Ok(TapOutcome::Started(op))
    }

    /// 映画一覧を差し替える
    ///
    /// 世代を進め、実行中の操作をすべて中断する。
    pub fn replace_movies(&mut self, movies: Vec<Movie>, icon_states: Vec<IconState>) -> Result<Effect> {
        check_aligned(&movies, &icon_states)?;

        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
        self.generation += 1;
        self.movies = movies;
        self.icon_states = icon_states;
        tracing::debug!(generation = self.generation, rows = self.movies.len(), "movies replaced");

        Ok(Effect::redraw(Redraw::All))
    }

    /// イベントを1件処理
    pub fn dispatch(&mut self, event: BinderEvent) -> Effect {
        match event {
            BinderEvent::Tap(target) => self.handle_tap(target),
            BinderEvent::ActionFinished(completion) => self.apply_completion(completion),
            BinderEvent::ImageLoaded {
                row,
                slot,
                ticket,
                result,
            } => {
                if slot.resolve(ticket, result) {
                    Effect::redraw(Redraw::Thumbnail(row))
                } else {
                    Effect::none()
                }
            }
        }
    }

    /// キューに溜まったイベントをすべて処理（ブロックしない）
    pub fn process_pending(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            let effect = self.dispatch(event);
            if !effect.is_none() {
                effects.push(effect);
            }
        }
        effects
    }

    /// 次のイベントを待って処理
    pub async fn next_event(&mut self) -> Effect {
        match self.events_rx.recv().await {
            Some(event) => self.dispatch(event),
            // 送信側を自身で保持しているため閉じることはない
            None => Effect::none(),
        }
    }

    fn handle_tap(&mut self, target: TapTarget) -> Effect {
        if target.generation != self.generation {
            tracing::debug!(tap = ?target, current = self.generation, "stale tap ignored");
            return Effect::none();
        }
        let Some(index) = self.index_of(target.movie_id) else {
            tracing::debug!(tap = ?target, "tap for removed movie ignored");
            return Effect::none();
        };
        // 実行中の表示は is_busy で読まれるため、受付時点では再 bind しない
        if let Err(e) = self.on_action_tap(index) {
            tracing::warn!(error = %e, "tap could not be handled");
        }
        Effect::none()
    }

    fn apply_completion(&mut self, completion: Completion) -> Effect {
        let Completion {
            movie_id,
            generation,
            op,
            result,
        } = completion;

        if generation != self.generation {
            tracing::debug!(id = %movie_id, generation, "stale completion ignored");
            return Effect::none();
        }
        self.in_flight.remove(&movie_id);

        let Some(index) = self.index_of(movie_id) else {
            return Effect::none();
        };

        let notice = match result {
            Ok(()) => {
                self.icon_states[index] = op.on_success();
                op.success_notice(&self.movies[index].title)
            }
            Err(e) => {
                if e.is_operation_failure() {
                    tracing::warn!(index, id = %movie_id, ?op, error = %e, "watchlist operation failed");
                } else {
                    tracing::error!(index, id = %movie_id, ?op, error = %e, "watchlist operation errored");
                }
                self.icon_states[index] = op.on_failure();
                Some(Notice::Failed)
            }
        };
        tracing::debug!(index, state = %self.icon_states[index], "icon state updated");

        Effect {
            redraw: Some(Redraw::Row(index)),
            notice,
        }
    }
}

impl<L, S> Drop for ListBinder<L, S> {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }
}

fn check_aligned(movies: &[Movie], icon_states: &[IconState]) -> Result<()> {
    if movies.len() != icon_states.len() {
        return Err(MlvError::StateLengthMismatch {
            movies: movies.len(),
            states: icon_states.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_binder_test.rs"]
mod tests;
