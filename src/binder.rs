//! 映画一覧と行ビューのバインド
//!
//! - `descriptor`: 行ビュー記述子（ホストが所有・再利用）
//! - `list_binder`: 一覧の保持、bind、タップ処理、状態遷移

mod descriptor;
mod list_binder;

#[cfg(test)]
pub(crate) mod fakes;

pub use descriptor::{ImageSlot, RowDescriptor, RowView, SlotImage, TapHandler};
pub use list_binder::{
    BinderEvent, Completion, Effect, ListBinder, Redraw, TapOutcome, TapTarget,
};
