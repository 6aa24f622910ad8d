//! ブラウザ画面の view（描画）

use super::model::Model;
use crate::binder::{RowDescriptor, RowView, SlotImage};
use crate::image::ImageLoader;
use crate::watchlist::{IconState, Notice, WatchlistService};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// 1行あたりの表示行数
const LINES_PER_ROW: u16 = 2;

/// リスト以外に使う行数（枠線2 + 通知1 + ヘルプ1）
const CHROME_LINES: u16 = 4;

/// 端末の高さから表示可能な行数を計算
pub fn visible_rows(height: u16) -> usize {
    (height.saturating_sub(CHROME_LINES) / LINES_PER_ROW) as usize
}

fn icon_span(icon: IconState, busy: bool) -> Span<'static> {
    if busy {
        return Span::styled("[…]", Style::default().fg(Color::Yellow));
    }
    match icon {
        IconState::Addable => Span::styled("[+]", Style::default().fg(Color::White)),
        IconState::Added => Span::styled("[✓]", Style::default().fg(Color::Green)),
        IconState::Error => Span::styled("[!]", Style::default().fg(Color::Red)),
    }
}

fn thumbnail_label(image: &SlotImage) -> String {
    match image {
        SlotImage::Empty => String::new(),
        SlotImage::Loading { .. } => "thumb: loading".to_string(),
        SlotImage::Loaded(thumb) => format!("thumb: {:.1} KB", thumb.size() as f64 / 1024.0),
        SlotImage::Placeholder { .. } => "thumb: -".to_string(),
    }
}

fn row_item(row: &RowView, busy: bool) -> ListItem<'static> {
    let first = Line::from(vec![
        icon_span(row.action_icon, busy),
        Span::raw(" "),
        Span::styled(row.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  ({})", row.year), Style::default().fg(Color::DarkGray)),
    ]);
    let mut details = vec![row.rating.clone()];
    if !row.genre.is_empty() {
        details.push(row.genre.clone());
    }
    let thumb = thumbnail_label(&row.thumbnail().image());
    if !thumb.is_empty() {
        details.push(thumb);
    }
    let second = Line::from(Span::styled(
        format!("    {}", details.join(" | ")),
        Style::default().fg(Color::Gray),
    ));
    ListItem::new(vec![first, second])
}

/// 画面を描画
pub fn view<L: ImageLoader, S: WatchlistService>(f: &mut Frame, model: &Model<L, S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // リスト
            Constraint::Length(1), // 通知
            Constraint::Length(1), // ヘルプ
        ])
        .split(f.area());

    let items: Vec<ListItem> = model
        .visible_rows()
        .filter_map(|row| {
            model
                .pool
                .get(row)
                .map(|view| row_item(view, model.binder.is_busy(row)))
        })
        .collect();

    let mut state = ListState::default();
    if model.binder.row_count() > 0 {
        state.select(Some(model.selected.saturating_sub(model.offset)));
    }

    let title = format!(" Movies ({}) ", model.binder.row_count());
    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(toast) = &model.toast {
        let style = match toast.notice {
            Notice::Added { .. } => Style::default().fg(Color::Cyan),
            Notice::Failed => Style::default().fg(Color::Red),
        };
        f.render_widget(
            Paragraph::new(format!(" {}", toast.notice.message())).style(style),
            chunks[1],
        );
    }

    let help = Paragraph::new(" up/down: move | Enter/Space: toggle watchlist | r: reload | q: quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}
