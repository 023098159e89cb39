use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use ratatui::Frame;

use super::mode::HitMap;
use super::{rgb, text_on};
use crate::shared::PadView;

pub fn draw_pad_grid(frame: &mut Frame, area: Rect, pads: &[PadView], columns: usize, hits: &mut HitMap) {
    if pads.is_empty() {
        let empty = Paragraph::new("no clips found")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = columns.max(1);
    let n_rows = pads.len().div_ceil(columns);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, n_rows as u32); n_rows])
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col_idx, cell_area) in cols.iter().enumerate() {
            let Some(pad) = pads.get(row_idx * columns + col_idx) else {
                break;
            };
            draw_pad(frame, *cell_area, pad);
            hits.pads.push((*cell_area, pad.clip));
        }
    }
}

fn draw_pad(frame: &mut Frame, area: Rect, pad: &PadView) {
    let fill = Style::default().bg(rgb(pad.color)).fg(text_on(pad.color));

    let (border_type, border_style) = if pad.focused {
        (BorderType::Double, fill.fg(Color::White).add_modifier(Modifier::BOLD))
    } else if pad.hovered {
        (BorderType::Thick, fill.fg(Color::Yellow))
    } else {
        (BorderType::Rounded, fill)
    };

    let mut block = Block::bordered()
        .border_type(border_type)
        .border_style(border_style);
    if pad.picked {
        block = block.title("picked");
    }

    let label = Paragraph::new(pad.label.as_str())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(fill)
        .block(block);
    frame.render_widget(label, area);
}
