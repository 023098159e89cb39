//! Track rows and the time ruler. A row is drawn column by column from the
//! block geometry, then merged into styled spans.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use super::mode::HitMap;
use super::{rgb, text_on};
use crate::shared::{RowView, TrackId};

pub fn draw_ruler(frame: &mut Frame, area: Rect, ticks: &[(u32, u32)], scroll: u32) {
    let text = ruler_text(ticks, scroll, area.width as usize);
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

pub fn draw_row(
    frame: &mut Frame,
    area: Rect,
    track: TrackId,
    row: &RowView,
    extent: u32,
    scroll: u32,
    hits: &mut HitMap,
) {
    let title = if row.armed { format!(" {track} (armed) ") } else { format!(" {track} ") };
    let border = if row.armed { Color::Yellow } else { Color::DarkGray };
    let block = Block::bordered().title(title).border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    hits.rows[track.index()] = inner;

    let lines = row_lines(row, extent, scroll, inner.width, inner.height);
    frame.render_widget(Paragraph::new(lines), inner);
}

// "|0s      |1s      |2s" shifted by the scroll offset
pub fn ruler_text(ticks: &[(u32, u32)], scroll: u32, width: usize) -> String {
    let mut chars = vec![' '; width];
    for &(x, second) in ticks {
        let Some(col) = x.checked_sub(scroll).map(|c| c as usize) else {
            continue;
        };
        for (i, ch) in format!("|{second}s").chars().enumerate() {
            if let Some(slot) = chars.get_mut(col + i) {
                *slot = ch;
            }
        }
    }
    chars.into_iter().collect()
}

pub fn row_lines(row: &RowView, extent: u32, scroll: u32, width: u16, height: u16) -> Vec<Line<'static>> {
    (0..height)
        .map(|line| {
            let cells = (0..width as u32).map(|col| cell(row, extent, scroll + col, line == 0));
            Line::from(merge(cells))
        })
        .collect()
}

fn cell(row: &RowView, extent: u32, t: u32, label_line: bool) -> (char, Style) {
    let (mut ch, mut style) = match row.blocks.iter().find(|b| b.contains(t)) {
        Some(b) => {
            let mut style = Style::default().bg(rgb(b.color)).fg(text_on(b.color));
            if row.selected == Some(b.index) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if row.playing == Some(b.index) {
                style = style.add_modifier(Modifier::BOLD);
            }
            let ch = if b.width > 1 && t + 1 == b.end() {
                '▕'
            } else if label_line {
                b.label.chars().nth((t - b.x) as usize).unwrap_or(' ')
            } else {
                ' '
            };
            (ch, style)
        }
        // unused timeline stays black up to the extent
        None if t < extent => (' ', Style::default().bg(Color::Black)),
        None => (' ', Style::default()),
    };

    if row.dragging.is_some_and(|(_, x)| x == t) {
        ch = '┃';
        style = style.fg(Color::Cyan);
    }
    if row.sweep_x == Some(t) {
        ch = '│';
        style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
    }
    (ch, style)
}

fn merge(cells: impl Iterator<Item = (char, Style)>) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut current: Option<Style> = None;
    for (ch, style) in cells {
        if current != Some(style) {
            if let Some(prev) = current {
                spans.push(Span::styled(std::mem::take(&mut text), prev));
            }
            current = Some(style);
        }
        text.push(ch);
    }
    if let Some(prev) = current {
        spans.push(Span::styled(text, prev));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::color_cache::ClipColor;
    use crate::pipeline::timeline::BlockGeom;
    use crate::shared::ClipId;

    fn block(index: usize, x: u32, width: u32, label: &str) -> BlockGeom {
        BlockGeom {
            index,
            clip: ClipId(index),
            x,
            width,
            color: ClipColor::from_u32(0xFFFFFF),
            label: label.to_string(),
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn ruler_follows_the_scroll() {
        let ticks = [(0, 0), (10, 1), (20, 2)];
        assert_eq!(ruler_text(&ticks, 0, 14), "|0s       |1s ");
        assert_eq!(ruler_text(&ticks, 10, 14), "|1s       |2s ");
    }

    #[test]
    fn blocks_show_labels_on_the_first_line() {
        let row = RowView {
            blocks: vec![block(0, 0, 4, "kick"), block(1, 4, 6, "snare")],
            ..Default::default()
        };
        let lines = row_lines(&row, 12, 0, 12, 2);
        assert_eq!(text(&lines[0]), "kic▕snare▕  ");
        assert_eq!(text(&lines[1]), "   ▕     ▕  ");
    }

    #[test]
    fn sweep_and_selection_are_drawn_over_blocks() {
        let row = RowView {
            blocks: vec![block(0, 0, 4, "kick")],
            selected: Some(0),
            sweep_x: Some(2),
            ..Default::default()
        };
        let lines = row_lines(&row, 4, 0, 4, 1);
        assert_eq!(text(&lines[0]), "ki│▕");
        let sweep = lines[0].spans.iter().find(|s| s.content == "│").unwrap();
        assert_eq!(sweep.style.fg, Some(Color::Yellow));
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn scrolled_rows_start_mid_block() {
        let row = RowView {
            blocks: vec![block(0, 0, 10, "longclip")],
            ..Default::default()
        };
        let lines = row_lines(&row, 10, 4, 4, 1);
        assert_eq!(text(&lines[0]), "clip");
    }
}
