// The input plan:
//
// Pads (the clip grid):
//   mouse hover          //  PadHoverEnter(clip) / PadHoverLeave, previews after a delay
//   mouse click          //  PadClick(clip), picks the clip for a drop onto a row
//   right click          //  PadAppend(clip), appends straight to the armed track
//   arrows               //  FocusPad(dx, dy)
//   Enter                //  AppendFocused
//   1 / 2                //  ArmTrack(One / Two)
//
// Timeline rows:
//   click                //  TrackPress { track, x }, drops the picked clip or selects a block
//   drag                 //  DragMove { x }
//   release              //  DragEnd { x }, reorders the dragged block
//   Delete / Backspace   //  DeleteSelected
//   [ / ], wheel         //  Scroll(-n / n), both rows scroll together
//
// Transport:
//   Space / p            //  Play
//   s                    //  Stop
//   c                    //  Clear
//   q / Esc              //  Quit
//
// The middle layer owns the tracks, the catalog and the scheduler. Every frame
// the TUI renders `middle.display_state()` and hands back semantic events; it
// never interprets the model itself.

use std::fmt;

use crate::loader::color_cache::ClipColor;
use crate::pipeline::timeline::BlockGeom;

pub const NUM_TRACKS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackId {
    One,
    Two,
}

impl TrackId {
    pub const ALL: [TrackId; NUM_TRACKS] = [TrackId::One, TrackId::Two];

    pub fn index(self) -> usize {
        match self {
            TrackId::One => 0,
            TrackId::Two => 1,
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.index() + 1)
    }
}

// index into the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // pads
    PadHoverEnter(ClipId),
    PadHoverLeave,
    PadClick(ClipId),
    PadAppend(ClipId),
    FocusPad(i32, i32),
    AppendFocused,
    ArmTrack(TrackId),

    // timeline, x is a timeline column (scroll already applied)
    TrackPress { track: TrackId, x: u32 },
    DragMove { x: u32 },
    DragEnd { x: u32 },
    DeleteSelected,
    Scroll(i32),

    // transport
    Play,
    Stop,
    Clear,

    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PadView {
    pub clip: ClipId,
    pub label: String,
    pub color: ClipColor,
    pub focused: bool,
    pub hovered: bool,
    pub picked: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowView {
    pub blocks: Vec<BlockGeom>,
    pub selected: Option<usize>,
    pub armed: bool,
    pub playing: Option<usize>, // block under the track's cursor
    pub sweep_x: Option<u32>,
    pub dragging: Option<(usize, u32)>, // (block, current column)
}

#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    pub pads: Vec<PadView>,
    pub grid_columns: usize,
    pub rows: [RowView; NUM_TRACKS],
    pub extent: u32, // timeline width in columns, shared by both rows
    pub ruler: Vec<(u32, u32)>, // (column, second)
    pub scroll: u32,
    pub playing: bool,
    pub display_text: String,
}
