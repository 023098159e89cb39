use ratatui::layout::{Position, Rect};

use crate::shared::{ClipId, NUM_TRACKS, TrackId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Play,
    Stop,
    Clear,
}

// where everything landed in the last rendered frame, written by the view
// and read by input to turn mouse positions into semantic events
#[derive(Clone, Debug, Default)]
pub struct HitMap {
    pub pads: Vec<(Rect, ClipId)>,
    pub rows: [Rect; NUM_TRACKS], // inner area of each timeline row
    pub buttons: Vec<(Rect, Button)>,
    pub scroll: u32,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.pads.clear();
        self.buttons.clear();
        self.rows = [Rect::default(); NUM_TRACKS];
    }

    pub fn pad_at(&self, column: u16, row: u16) -> Option<ClipId> {
        let pos = Position::new(column, row);
        self.pads.iter().find(|(r, _)| r.contains(pos)).map(|(_, id)| *id)
    }

    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let pos = Position::new(column, row);
        self.buttons.iter().find(|(r, _)| r.contains(pos)).map(|(_, b)| *b)
    }

    pub fn row_at(&self, column: u16, row: u16) -> Option<(TrackId, u32)> {
        let pos = Position::new(column, row);
        TrackId::ALL
            .into_iter()
            .find(|t| self.rows[t.index()].contains(pos))
            .map(|t| (t, self.timeline_x(t, column)))
    }

    // screen column to timeline column on `track`'s row, clamped to the row
    pub fn timeline_x(&self, track: TrackId, column: u16) -> u32 {
        let r = self.rows[track.index()];
        let offset = column.saturating_sub(r.x).min(r.width.saturating_sub(1));
        offset as u32 + self.scroll
    }
}

// state local to tui: the last frame's hit map plus the gesture in progress
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub hits: HitMap,
    pub hovered: Option<ClipId>,
    pub drag_row: Option<TrackId>, // row a left-button press started on
}
