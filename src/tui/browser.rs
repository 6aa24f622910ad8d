//! 映画一覧ブラウザ TUI
//!
//! バインダーのホストとして動作するリストウィジェット。
//! 可視行だけを再利用される行ビューにバインドし、タップは行ビューの
//! タップハンドラ経由でバインダーへ届ける。
//!
//! - `model`: 画面状態と行ビューのプール
//! - `update`: メッセージと効果の反映
//! - `view`: 画面描画

mod model;
mod update;
mod view;

use crate::binder::ListBinder;
use crate::catalog::Catalog;
use crate::error::Result;
use crate::image::ImageLoader;
use crate::watchlist::WatchlistService;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use model::{key_to_msg, Model};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

/// キー入力の待ち時間（この間隔でバインダーのイベントを処理する）
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TUI を実行
///
/// `reload` は `r` キーでカタログを読み直すときに呼ばれる。
pub fn run<L, S, R>(binder: ListBinder<L, S>, mut reload: R) -> io::Result<()>
where
    L: ImageLoader,
    S: WatchlistService,
    R: FnMut() -> Result<Catalog>,
{
    // ターミナル設定
    terminal::enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut model = Model::new(binder);
    let result = event_loop(&mut terminal, &mut model, &mut reload);

    // ターミナルを復元
    terminal::disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop<L, S, R>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut Model<L, S>,
    reload: &mut R,
) -> io::Result<()>
where
    L: ImageLoader,
    S: WatchlistService,
    R: FnMut() -> Result<Catalog>,
{
    while !model.should_quit {
        let (_, height) = terminal::size()?;
        update::resize(model, view::visible_rows(height));
        update::sync(model).map_err(|e| io::Error::other(e.to_string()))?;

        terminal.draw(|f| view::view(f, model))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = key_to_msg(key.code) {
                        update::update(model, msg);
                    }
                }
            }
        }

        let now = Instant::now();
        if model.reload_requested {
            update::reload(model, reload(), now);
        }

        // バックグラウンドの結果はここで所有スレッドに反映する
        for effect in model.binder.process_pending() {
            update::apply_effect(model, effect, now);
        }
        model.expire_toast(now);
    }
    Ok(())
}
