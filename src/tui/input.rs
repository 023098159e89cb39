use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use super::mode::{Button, TuiState};
use crate::shared::{ClipId, InputEvent, TrackId};

// timeline columns per scroll step
const SCROLL_STEP: i32 = 5;

// poll for input from the terminal and resolve keys and mouse gestures into
// semantic input events, using the hit map of the last rendered frame
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key)),
        Event::Mouse(mouse) => Ok(handle_mouse(mouse, ts)),
        _ => Ok(vec![]),
    }
}

fn handle_key(key: KeyEvent) -> Vec<InputEvent> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],

        // transport
        KeyCode::Char(' ') | KeyCode::Char('p') => vec![InputEvent::Play],
        KeyCode::Char('s') => vec![InputEvent::Stop],
        KeyCode::Char('c') => vec![InputEvent::Clear],

        KeyCode::Char('1') => vec![InputEvent::ArmTrack(TrackId::One)],
        KeyCode::Char('2') => vec![InputEvent::ArmTrack(TrackId::Two)],

        // shift+left/right scroll the timeline, plain arrows walk the pads
        KeyCode::Left if shift => vec![InputEvent::Scroll(-SCROLL_STEP)],
        KeyCode::Right if shift => vec![InputEvent::Scroll(SCROLL_STEP)],
        KeyCode::Left => vec![InputEvent::FocusPad(-1, 0)],
        KeyCode::Right => vec![InputEvent::FocusPad(1, 0)],
        KeyCode::Up => vec![InputEvent::FocusPad(0, -1)],
        KeyCode::Down => vec![InputEvent::FocusPad(0, 1)],
        KeyCode::Enter => vec![InputEvent::AppendFocused],

        KeyCode::Char('[') => vec![InputEvent::Scroll(-SCROLL_STEP)],
        KeyCode::Char(']') => vec![InputEvent::Scroll(SCROLL_STEP)],

        KeyCode::Delete | KeyCode::Backspace => vec![InputEvent::DeleteSelected],

        _ => vec![],
    }
}

fn handle_mouse(mouse: MouseEvent, ts: &mut TuiState) -> Vec<InputEvent> {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved => {
            let pad = ts.hits.pad_at(col, row);
            hover(pad, ts)
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(clip) = ts.hits.pad_at(col, row) {
                return vec![InputEvent::PadClick(clip)];
            }
            if let Some(button) = ts.hits.button_at(col, row) {
                return vec![match button {
                    Button::Play => InputEvent::Play,
                    Button::Stop => InputEvent::Stop,
                    Button::Clear => InputEvent::Clear,
                }];
            }
            match ts.hits.row_at(col, row) {
                Some((track, x)) => {
                    ts.drag_row = Some(track);
                    vec![InputEvent::TrackPress { track, x }]
                }
                None => vec![],
            }
        }
        MouseEventKind::Down(MouseButton::Right) => ts
            .hits
            .pad_at(col, row)
            .map(|clip| vec![InputEvent::PadAppend(clip)])
            .unwrap_or_default(),
        MouseEventKind::Drag(MouseButton::Left) => match ts.drag_row {
            Some(track) => vec![InputEvent::DragMove { x: ts.hits.timeline_x(track, col) }],
            None => vec![],
        },
        MouseEventKind::Up(MouseButton::Left) => match ts.drag_row.take() {
            Some(track) => vec![InputEvent::DragEnd { x: ts.hits.timeline_x(track, col) }],
            None => vec![],
        },
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => vec![InputEvent::Scroll(-SCROLL_STEP)],
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => vec![InputEvent::Scroll(SCROLL_STEP)],
        _ => vec![],
    }
}

// moving between pads leaves the old one before entering the new one
fn hover(pad: Option<ClipId>, ts: &mut TuiState) -> Vec<InputEvent> {
    if pad == ts.hovered {
        return vec![];
    }
    let mut events = Vec::new();
    if ts.hovered.is_some() {
        events.push(InputEvent::PadHoverLeave);
    }
    if let Some(clip) = pad {
        events.push(InputEvent::PadHoverEnter(clip));
    }
    ts.hovered = pad;
    events
}
