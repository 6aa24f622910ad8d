use super::*;
use crate::binder::descriptor::{RowView, SlotImage};
use crate::binder::fakes::{make_movie, make_movies, GatedWatchlist, ScriptedWatchlist, StaticLoader};
use crate::watchlist::{SimulatedOutcome, SimulatedWatchlist};
use std::time::Duration;

type TestBinder<S> = ListBinder<StaticLoader, S>;

fn instant_binder(titles: &[&str]) -> TestBinder<SimulatedWatchlist> {
    let movies = make_movies(titles);
    let states = vec![IconState::Addable; movies.len()];
    ListBinder::new(
        movies,
        states,
        StaticLoader::default(),
        SimulatedWatchlist::new(Duration::ZERO, SimulatedOutcome::Succeed),
    )
    .unwrap()
}

fn binder_with<S: WatchlistService>(titles: &[&str], service: S) -> TestBinder<S> {
    let movies = make_movies(titles);
    let states = vec![IconState::Addable; movies.len()];
    ListBinder::new(movies, states, StaticLoader::default(), service).unwrap()
}

/// 操作の完了まで待つ（サムネイルのイベントは読み飛ばす）
async fn wait_for_row<L: ImageLoader, S: WatchlistService>(binder: &mut ListBinder<L, S>) -> Effect {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let effect = binder.next_event().await;
            if matches!(effect.redraw, Some(Redraw::Row(_))) {
                return effect;
            }
        }
    })
    .await
    .expect("operation did not complete")
}

// ============================================================================
// 構築
// ============================================================================

#[tokio::test]
async fn new_rejects_misaligned_states() {
    let result = ListBinder::new(
        make_movies(&["A", "B"]),
        vec![IconState::Addable],
        StaticLoader::default(),
        SimulatedWatchlist::default(),
    );
    assert!(matches!(
        result,
        Err(MlvError::StateLengthMismatch {
            movies: 2,
            states: 1
        })
    ));
}

#[test]
fn new_outside_runtime_is_error() {
    let result = ListBinder::new(
        make_movies(&["A"]),
        vec![IconState::Addable],
        StaticLoader::default(),
        SimulatedWatchlist::default(),
    );
    assert!(matches!(result, Err(MlvError::RuntimeUnavailable)));
}

#[tokio::test]
async fn row_count_matches_movies_and_is_stable() {
    let binder = instant_binder(&["A", "B", "C"]);
    assert_eq!(binder.row_count(), 3);
    assert_eq!(binder.row_count(), binder.movies().len());

    let mut row = RowView::new();
    binder.bind(2, &mut row).unwrap();
    assert_eq!(binder.row_count(), 3);
}

// ============================================================================
// bind
// ============================================================================

#[tokio::test]
async fn bind_writes_movie_fields_into_descriptor() {
    let movies = vec![
        make_movie(10, "Dawn of the Planet of the Apes", &["Action", "Drama", "Sci-Fi"]),
        make_movie(11, "District 9", &[]),
    ];
    let binder = ListBinder::new(
        movies,
        vec![IconState::Addable, IconState::Added],
        StaticLoader::default(),
        SimulatedWatchlist::default(),
    )
    .unwrap();

    for index in 0..binder.row_count() {
        let mut row = RowView::new();
        binder.bind(index, &mut row).unwrap();

        let movie = binder.movie(index).unwrap();
        assert_eq!(row.title, movie.title);
        assert_eq!(row.rating, movie.rating_text());
        assert_eq!(row.year, movie.year.to_string());
        assert_eq!(row.genre, movie.genre_text());
        assert_eq!(Some(row.action_icon), binder.icon_state(index));
    }
}

#[tokio::test]
async fn bind_formats_genre_and_rating() {
    let binder = ListBinder::new(
        vec![make_movie(0, "Gravity", &["Action", "Drama"])],
        vec![IconState::Error],
        StaticLoader::default(),
        SimulatedWatchlist::default(),
    )
    .unwrap();

    let mut row = RowView::new();
    binder.bind(0, &mut row).unwrap();

    assert_eq!(row.genre, "Action, Drama");
    assert_eq!(row.rating, "Rating: 8.0");
    assert_eq!(row.year, "2000");
    assert_eq!(row.action_icon, IconState::Error);
}

#[tokio::test]
async fn bind_out_of_range_is_error() {
    let binder = instant_binder(&["A"]);
    let mut row = RowView::new();
    let err = binder.bind(1, &mut row).unwrap_err();
    assert!(matches!(err, MlvError::RowOutOfRange { index: 1, len: 1 }));
    assert!(row.tap_handler().is_none());
}

#[tokio::test]
async fn bind_captures_tap_target_by_value() {
    let binder = instant_binder(&["A", "B"]);
    let mut row = RowView::new();
    binder.bind(1, &mut row).unwrap();

    let target = row.tap_handler().unwrap().target();
    assert_eq!(
        target,
        TapTarget {
            index: 1,
            movie_id: MovieId(1),
            generation: 0,
        }
    );
}

#[tokio::test]
async fn bind_loads_thumbnail_into_slot() {
    let mut binder = instant_binder(&["A", "B"]);
    let mut row = RowView::new();
    binder.bind(1, &mut row).unwrap();

    assert!(matches!(row.thumbnail().image(), SlotImage::Loading { .. }));

    let effect = binder.next_event().await;
    assert_eq!(effect.redraw, Some(Redraw::Thumbnail(1)));
    match row.thumbnail().image() {
        SlotImage::Loaded(thumb) => {
            assert_eq!(thumb.url, "https://example.com/1.jpg");
            assert_eq!(thumb.crop, CropMode::CenterCrop);
        }
        other => panic!("Expected Loaded, got {other:?}"),
    }
}

#[tokio::test]
async fn rebinding_reused_descriptor_keeps_last_thumbnail() {
    let mut binder = instant_binder(&["A", "B"]);
    let mut row = RowView::new();

    binder.bind(0, &mut row).unwrap();
    binder.bind(1, &mut row).unwrap();

    // 2件の読み込み完了のうち反映されるのは後発の1件だけ
    let mut thumbnail_redraws = 0;
    for _ in 0..2 {
        if binder.next_event().await.redraw.is_some() {
            thumbnail_redraws += 1;
        }
    }
    assert_eq!(thumbnail_redraws, 1);
    assert_eq!(row.title, "B");
    match row.thumbnail().image() {
        SlotImage::Loaded(thumb) => assert_eq!(thumb.url, "https://example.com/1.jpg"),
        other => panic!("Expected Loaded, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_thumbnail_shows_placeholder() {
    let mut binder = ListBinder::new(
        make_movies(&["A"]),
        vec![IconState::Addable],
        StaticLoader { fail: true },
        SimulatedWatchlist::default(),
    )
    .unwrap();
    let mut row = RowView::new();
    binder.bind(0, &mut row).unwrap();

    binder.next_event().await;
    assert_eq!(
        row.thumbnail().image(),
        SlotImage::Placeholder {
            url: "https://example.com/0.jpg".to_string()
        }
    );
    // 画像の失敗はアイコン状態に影響しない
    assert_eq!(binder.icon_state(0), Some(IconState::Addable));
}

// ============================================================================
// 状態遷移
// ============================================================================

#[tokio::test]
async fn successful_taps_round_trip_addable_added_addable() {
    let mut binder = instant_binder(&["Gravity"]);

    assert_eq!(binder.on_action_tap(0).unwrap(), TapOutcome::Started(WatchlistOp::Add));
    let effect = wait_for_row(&mut binder).await;
    assert_eq!(binder.icon_state(0), Some(IconState::Added));
    assert_eq!(effect.redraw, Some(Redraw::Row(0)));
    assert_eq!(
        effect.notice,
        Some(Notice::Added {
            title: "Gravity".to_string()
        })
    );

    assert_eq!(
        binder.on_action_tap(0).unwrap(),
        TapOutcome::Started(WatchlistOp::Remove)
    );
    let effect = wait_for_row(&mut binder).await;
    assert_eq!(binder.icon_state(0), Some(IconState::Addable));
    assert_eq!(effect.notice, None);
}

#[tokio::test]
async fn failed_tap_errors_then_retry_adds() {
    let mut binder = binder_with(&["Gravity"], ScriptedWatchlist::new(&[SimulatedOutcome::Fail]));

    binder.on_action_tap(0).unwrap();
    let effect = wait_for_row(&mut binder).await;
    assert_eq!(binder.icon_state(0), Some(IconState::Error));
    assert_eq!(effect.notice, Some(Notice::Failed));
    assert!(!binder.is_busy(0), "row must be tappable again after failure");

    assert_eq!(
        binder.on_action_tap(0).unwrap(),
        TapOutcome::Started(WatchlistOp::RetryAdd)
    );
    wait_for_row(&mut binder).await;
    assert_eq!(binder.icon_state(0), Some(IconState::Added));
}

#[tokio::test]
async fn failed_remove_errors() {
    let movies = make_movies(&["Gravity"]);
    let mut binder = ListBinder::new(
        movies,
        vec![IconState::Added],
        StaticLoader::default(),
        ScriptedWatchlist::new(&[SimulatedOutcome::Fail]),
    )
    .unwrap();

    binder.on_action_tap(0).unwrap();
    wait_for_row(&mut binder).await;
    assert_eq!(binder.icon_state(0), Some(IconState::Error));
}

#[tokio::test]
async fn tap_only_changes_its_own_row() {
    let mut binder = instant_binder(&["A", "B", "C"]);

    binder.on_action_tap(1).unwrap();
    wait_for_row(&mut binder).await;

    assert_eq!(
        binder.icon_states(),
        &[IconState::Addable, IconState::Added, IconState::Addable]
    );
}

#[tokio::test]
async fn tap_out_of_range_is_error() {
    let mut binder = instant_binder(&["A"]);
    assert!(matches!(
        binder.on_action_tap(5),
        Err(MlvError::RowOutOfRange { index: 5, len: 1 })
    ));
}

#[tokio::test]
async fn descriptor_tap_handler_drives_state_machine() {
    let mut binder = instant_binder(&["A", "B"]);
    let mut row = RowView::new();
    binder.bind(1, &mut row).unwrap();

    assert!(row.tap());
    let effect = wait_for_row(&mut binder).await;

    assert_eq!(effect.redraw, Some(Redraw::Row(1)));
    assert!(effect.notice.is_some());
    assert_eq!(binder.icon_state(1), Some(IconState::Added));
}

#[tokio::test]
async fn accepted_tap_does_not_request_rebind() {
    let gate = GatedWatchlist::new();
    let mut binder = binder_with(&["A"], gate.clone());
    let mut row = RowView::new();
    binder.bind(0, &mut row).unwrap();

    let target = row.tap_handler().unwrap().target();
    let effect = binder.dispatch(BinderEvent::Tap(target));

    // 実行中の表示は is_busy で読まれる
    assert!(effect.is_none());
    assert!(binder.is_busy(0));
    gate.release(1);
}

#[tokio::test]
async fn rebinding_same_movie_keeps_loaded_thumbnail() {
    let mut binder = instant_binder(&["A"]);
    let mut row = RowView::new();
    binder.bind(0, &mut row).unwrap();
    assert_eq!(binder.next_event().await.redraw, Some(Redraw::Thumbnail(0)));
    let ticket = row.thumbnail().ticket();

    binder.on_action_tap(0).unwrap();
    wait_for_row(&mut binder).await;
    binder.bind(0, &mut row).unwrap();

    assert_eq!(row.action_icon, IconState::Added);
    assert_eq!(row.thumbnail().ticket(), ticket);
    assert!(matches!(row.thumbnail().image(), SlotImage::Loaded(_)));
    assert!(binder.process_pending().is_empty());
}

// ============================================================================
// 実行中の操作
// ============================================================================

#[tokio::test]
async fn second_tap_while_pending_is_rejected() {
    let gate = GatedWatchlist::new();
    let mut binder = binder_with(&["A"], gate.clone());

    assert_eq!(binder.on_action_tap(0).unwrap(), TapOutcome::Started(WatchlistOp::Add));
    assert_eq!(binder.on_action_tap(0).unwrap(), TapOutcome::Busy);
    assert!(binder.is_busy(0));

    gate.release(2);
    wait_for_row(&mut binder).await;

    // 1件の操作の結果だけが反映される
    assert_eq!(binder.icon_state(0), Some(IconState::Added));
    assert_eq!(gate.calls(), 1);
    assert!(!binder.is_busy(0));
    assert!(binder.process_pending().is_empty());
}

#[tokio::test]
async fn pending_rows_are_tracked_independently() {
    let gate = GatedWatchlist::new();
    let mut binder = binder_with(&["A", "B"], gate.clone());

    binder.on_action_tap(0).unwrap();
    assert_eq!(binder.on_action_tap(1).unwrap(), TapOutcome::Started(WatchlistOp::Add));
    assert_eq!(binder.in_flight_count(), 2);

    gate.release(2);
    wait_for_row(&mut binder).await;
    wait_for_row(&mut binder).await;

    assert_eq!(binder.icon_states(), &[IconState::Added, IconState::Added]);
    assert_eq!(binder.in_flight_count(), 0);
}

// ============================================================================
// 一覧の差し替え
// ============================================================================

#[tokio::test]
async fn replace_movies_cancels_in_flight_operations() {
    let gate = GatedWatchlist::new();
    let mut binder = binder_with(&["A", "B"], gate.clone());
    binder.on_action_tap(0).unwrap();

    let effect = binder
        .replace_movies(make_movies(&["A", "B", "C"]), vec![IconState::Addable; 3])
        .unwrap();

    assert_eq!(effect.redraw, Some(Redraw::All));
    assert_eq!(binder.generation(), 1);
    assert_eq!(binder.row_count(), 3);
    assert_eq!(binder.in_flight_count(), 0);

    gate.release(1);
    tokio::task::yield_now().await;
    assert!(binder.process_pending().is_empty());
    assert_eq!(binder.icon_state(0), Some(IconState::Addable));
}

#[tokio::test]
async fn stale_completion_is_ignored() {
    let mut binder = instant_binder(&["A"]);
    binder
        .replace_movies(make_movies(&["A"]), vec![IconState::Addable])
        .unwrap();

    let effect = binder.dispatch(BinderEvent::ActionFinished(Completion {
        movie_id: MovieId(0),
        generation: 0,
        op: WatchlistOp::Add,
        result: Ok(()),
    }));

    assert!(effect.is_none());
    assert_eq!(binder.icon_state(0), Some(IconState::Addable));
}

#[tokio::test]
async fn stale_descriptor_tap_is_ignored() {
    let mut binder = instant_binder(&["A", "B"]);
    let mut row = RowView::new();
    binder.bind(0, &mut row).unwrap();

    // 並べ替え後、古い記述子のタップは別の映画に作用しない
    let reordered = vec![make_movie(1, "B", &[]), make_movie(0, "A", &[])];
    binder
        .replace_movies(reordered, vec![IconState::Addable; 2])
        .unwrap();

    let effect = binder.dispatch(BinderEvent::Tap(row.tap_handler().unwrap().target()));
    assert!(effect.is_none());
    assert_eq!(binder.in_flight_count(), 0);
}

#[tokio::test]
async fn replace_movies_rejects_misaligned_states() {
    let mut binder = instant_binder(&["A"]);
    let result = binder.replace_movies(make_movies(&["A", "B"]), vec![IconState::Added]);

    assert!(matches!(result, Err(MlvError::StateLengthMismatch { .. })));
    assert_eq!(binder.row_count(), 1);
    assert_eq!(binder.generation(), 0);
}

#[tokio::test]
async fn completion_for_removed_movie_is_ignored() {
    let mut binder = instant_binder(&["A", "B"]);
    let effect = binder.dispatch(BinderEvent::ActionFinished(Completion {
        movie_id: MovieId(99),
        generation: 0,
        op: WatchlistOp::Add,
        result: Ok(()),
    }));
    assert!(effect.is_none());
    assert_eq!(binder.icon_states(), &[IconState::Addable, IconState::Addable]);
}
