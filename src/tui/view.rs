use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::mode::{Button, HitMap};
use super::{grid, timeline};
use crate::shared::{DisplayState, TrackId};

const BUTTONS: [(&str, Button); 3] = [
    ("[Play]", Button::Play),
    ("[Stop]", Button::Stop),
    ("[Clear]", Button::Clear),
];

const HELP: &str = "1/2 arm  click pick  right-click add  enter add focused  del remove  [ ] scroll  q quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, hits: &mut HitMap) {
    hits.clear();
    hits.scroll = state.scroll;

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + status
            Constraint::Min(6),    // pad grid
            Constraint::Length(1), // ruler
            Constraint::Length(4), // track 1
            Constraint::Length(4), // track 2
            Constraint::Length(1), // transport
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_status(frame, sections[0], state);
    grid::draw_pad_grid(frame, sections[1], &state.pads, state.grid_columns, hits);

    // the ruler lines up with the rows' inner area, inside their borders
    let ruler = Rect {
        x: sections[2].x + 1,
        width: sections[2].width.saturating_sub(2),
        ..sections[2]
    };
    timeline::draw_ruler(frame, ruler, &state.ruler, state.scroll);
    for track in TrackId::ALL {
        timeline::draw_row(
            frame,
            sections[3 + track.index()],
            track,
            &state.rows[track.index()],
            state.extent,
            state.scroll,
            hits,
        );
    }

    draw_transport(frame, sections[5], state, hits);
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        sections[6],
    );
}

fn draw_status(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let line = Line::from(vec![
        Span::styled(" soundboard ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(state.display_text.as_str()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState, hits: &mut HitMap) {
    let mut spans = Vec::new();
    let mut x = area.x;
    for (label, button) in BUTTONS {
        let lit = button == Button::Play && state.playing;
        let style = if lit {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let width = label.len() as u16;
        hits.buttons.push((Rect::new(x, area.y, width, 1), button));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    let (symbol, color) = if state.playing { ("▶ playing", Color::Green) } else { ("■ stopped", Color::DarkGray) };
    spans.push(Span::styled(format!(" {symbol}"), Style::default().fg(color)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
