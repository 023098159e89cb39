use crate::audio_api::{AudioCommand, MixerChannel, NUM_CHANNELS};
use crate::config::{Config, GridConfig};
use crate::loader::catalog::Catalog;
use crate::pipeline::playback::Sequencer;
use crate::pipeline::timeline::{self, TimelineLayout, TimelineScale};
use crate::pipeline::track::Tracks;
use crate::shared::{ClipId, DisplayState, InputEvent, PadView, RowView, TrackId};

// a block being dragged along its row
#[derive(Clone, Copy, Debug)]
struct Drag {
    track: TrackId,
    index: usize,
    x: u32,
}

pub struct Middle {
    catalog: Catalog,
    tracks: Tracks,
    sequencer: Sequencer,
    scale: TimelineScale,
    layout: TimelineLayout, // rebuilt after every track mutation
    grid: GridConfig,
    preview_delay: f64,

    clock: f64, // seconds since start, advanced by tick
    busy: [bool; NUM_CHANNELS],

    armed: TrackId,
    focus: usize,
    hovered: Option<ClipId>,
    pending_preview: Option<(ClipId, f64)>,
    picked: Option<ClipId>,
    selected: Option<(TrackId, usize)>,
    drag: Option<Drag>,
    scroll: u32,
    status: String,
}

impl Middle {
    pub fn new(catalog: Catalog, config: &Config) -> Self {
        if catalog.len() > config.grid.capacity() {
            log::warn!(
                "{} clips found, the {}x{} grid shows the first {}",
                catalog.len(),
                config.grid.columns,
                config.grid.rows,
                config.grid.capacity()
            );
        }
        let silent = catalog.iter().filter(|(_, clip)| !clip.is_loaded()).count();
        if silent > 0 {
            log::warn!("{silent} clips have no decoded audio and will play silent");
        }
        let mut middle = Self {
            catalog,
            tracks: Tracks::default(),
            sequencer: Sequencer::new(config.playback.settings()),
            scale: config.timeline.scale(),
            layout: TimelineLayout::default(),
            grid: config.grid.clone(),
            preview_delay: config.playback.preview_delay(),
            clock: 0.0,
            busy: [false; NUM_CHANNELS],
            armed: TrackId::One,
            focus: 0,
            hovered: None,
            pending_preview: None,
            picked: None,
            selected: None,
            drag: None,
            scroll: 0,
            status: String::new(),
        };
        middle.relayout();
        middle
    }

    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_active()
    }

    // engine "still playing" flags, synced from the audio handle every frame
    pub fn set_busy(&mut self, busy: [bool; NUM_CHANNELS]) {
        self.busy = busy;
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<AudioCommand> {
        match event {
            // pads
            InputEvent::PadHoverEnter(clip) => {
                if self.hovered == Some(clip) {
                    return vec![];
                }
                let cmds = self.cancel_preview();
                self.hovered = Some(clip);
                self.pending_preview = Some((clip, self.clock + self.preview_delay));
                cmds
            }
            InputEvent::PadHoverLeave => {
                self.hovered = None;
                self.cancel_preview()
            }
            InputEvent::PadClick(clip) => {
                self.picked = Some(clip);
                self.status = format!("picked {}, click a track to drop it", self.label(clip));
                vec![]
            }
            InputEvent::PadAppend(clip) => {
                self.append(self.armed, clip);
                vec![]
            }
            InputEvent::FocusPad(dx, dy) => {
                self.move_focus(dx, dy);
                vec![]
            }
            InputEvent::AppendFocused => {
                if self.focus < self.visible_pads() {
                    self.append(self.armed, ClipId(self.focus));
                }
                vec![]
            }
            InputEvent::ArmTrack(track) => {
                self.armed = track;
                self.status = format!("{track} armed");
                vec![]
            }

            // timeline
            InputEvent::TrackPress { track, x } => {
                self.press_track(track, x);
                vec![]
            }
            InputEvent::DragMove { x } => {
                if let Some(drag) = self.drag.as_mut() {
                    drag.x = x;
                }
                vec![]
            }
            InputEvent::DragEnd { x } => {
                self.end_drag(x);
                vec![]
            }
            InputEvent::DeleteSelected => {
                self.delete_selected();
                vec![]
            }
            InputEvent::Scroll(delta) => {
                let max = self.layout.extent as i64;
                self.scroll = (self.scroll as i64 + delta as i64).clamp(0, max) as u32;
                vec![]
            }

            // transport
            InputEvent::Play => {
                let cmds = self
                    .sequencer
                    .start(self.clock, &self.tracks, &self.catalog, &self.layout);
                if !self.sequencer.is_active() {
                    self.status = "nothing to play, both tracks are empty".to_string();
                }
                cmds
            }
            InputEvent::Stop => self.stop(),
            InputEvent::Clear => {
                let cmds = self.stop();
                self.tracks.clear_all();
                self.selected = None;
                self.drag = None;
                self.scroll = 0;
                self.relayout();
                self.status = "tracks cleared".to_string();
                cmds
            }

            InputEvent::Quit => vec![],
        }
    }

    pub fn tick(&mut self, elapsed: f64) -> Vec<AudioCommand> {
        self.clock += elapsed;
        let mut cmds = Vec::new();

        if let Some((clip, due)) = self.pending_preview {
            if self.clock >= due {
                self.pending_preview = None;
                match self.catalog.get(clip).and_then(|c| c.sample_id) {
                    Some(sample) => cmds.push(AudioCommand::Play {
                        channel: MixerChannel::Preview,
                        sample,
                    }),
                    None => log::warn!("preview error: {} has no decoded audio", self.label(clip)),
                }
            }
        }

        cmds.extend(self.sequencer.tick(
            self.clock,
            self.busy,
            &self.tracks,
            &self.catalog,
            &self.layout,
        ));
        cmds
    }

    pub fn display_state(&self) -> DisplayState {
        let pads = self
            .catalog
            .iter()
            .take(self.visible_pads())
            .map(|(id, clip)| PadView {
                clip: id,
                label: clip.label().to_string(),
                color: clip.color,
                focused: id.0 == self.focus,
                hovered: self.hovered == Some(id),
                picked: self.picked == Some(id),
            })
            .collect();

        let rows = TrackId::ALL.map(|track| RowView {
            blocks: self.layout.row(track).to_vec(),
            selected: self.selected.filter(|(t, _)| *t == track).map(|(_, i)| i),
            armed: self.armed == track,
            playing: self.sequencer.cursor(track),
            sweep_x: self.sequencer.sweep_x(track),
            dragging: self.drag.filter(|d| d.track == track).map(|d| (d.index, d.x)),
        });

        DisplayState {
            pads,
            grid_columns: self.grid.columns,
            rows,
            extent: self.layout.extent,
            ruler: self.scale.ruler(&self.layout),
            scroll: self.scroll,
            playing: self.sequencer.is_active(),
            display_text: self.status.clone(),
        }
    }

    // ── helpers ───────────────────────────────────────────────────

    fn relayout(&mut self) {
        self.layout = self.scale.layout(&self.tracks, &self.catalog);
        self.scroll = self.scroll.min(self.layout.extent);
    }

    fn label(&self, clip: ClipId) -> String {
        self.catalog
            .get(clip)
            .map_or_else(|| format!("clip {}", clip.0), |c| c.label().to_string())
    }

    fn visible_pads(&self) -> usize {
        self.catalog.len().min(self.grid.capacity())
    }

    fn append(&mut self, track: TrackId, clip: ClipId) {
        if self.catalog.get(clip).is_none() {
            return;
        }
        self.tracks.get_mut(track).append(clip);
        self.relayout();
        self.status = format!("added {} to {track}", self.label(clip));
    }

    fn cancel_preview(&mut self) -> Vec<AudioCommand> {
        self.pending_preview = None;
        vec![AudioCommand::StopChannel(MixerChannel::Preview)]
    }

    fn stop(&mut self) -> Vec<AudioCommand> {
        self.pending_preview = None;
        self.status = "stopped".to_string();
        self.sequencer.stop()
    }

    fn move_focus(&mut self, dx: i32, dy: i32) {
        let count = self.visible_pads();
        let columns = self.grid.columns.max(1);
        if count == 0 {
            return;
        }
        let col = (self.focus % columns) as i32 + dx;
        let row = (self.focus / columns) as i32 + dy;
        if col < 0 || col >= columns as i32 || row < 0 {
            return;
        }
        let next = row as usize * columns + col as usize;
        if next < count {
            self.focus = next;
        }
    }

    // drop the picked clip, or select (and start dragging) the block under x
    fn press_track(&mut self, track: TrackId, x: u32) {
        if let Some(clip) = self.picked.take() {
            self.append(track, clip);
            return;
        }
        match timeline::hit_test(self.layout.row(track), x) {
            Some(index) => {
                self.selected = Some((track, index));
                self.drag = Some(Drag { track, index, x });
            }
            None => self.selected = None,
        }
    }

    fn end_drag(&mut self, x: u32) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let target = timeline::drop_index(self.layout.row(drag.track), x);
        if target == drag.index || target == drag.index + 1 {
            return;
        }
        if self.tracks.get_mut(drag.track).move_block(drag.index, target) {
            let landed = if target > drag.index { target - 1 } else { target };
            self.selected = Some((drag.track, landed));
            self.relayout();
            log::debug!("{}: moved block {} to {landed}", drag.track, drag.index);
        }
    }

    fn delete_selected(&mut self) {
        let Some((track, index)) = self.selected.take() else {
            return;
        };
        match self.tracks.remove(track, index) {
            Ok(clip) => {
                self.relayout();
                self.status = format!("removed {} from {track}", self.label(clip));
            }
            Err(e) => log::warn!("delete ignored: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SampleId;
    use crate::pipeline::test_fixture::catalog_with;

    // a = 0.5 s, b = 1.5 s, c = 1.0 s; a and b decoded, c not
    fn middle() -> Middle {
        let mut catalog = catalog_with(&[("a.wav", 0.5), ("b.wav", 1.5), ("c.wav", 1.0)]);
        catalog.set_sample_id(ClipId(0), SampleId(10));
        catalog.set_sample_id(ClipId(1), SampleId(11));
        Middle::new(catalog, &Config::default())
    }

    fn ids(m: &Middle, track: TrackId) -> Vec<usize> {
        m.tracks().get(track).clips().iter().map(|c| c.0).collect()
    }

    #[test]
    fn hover_previews_after_the_delay() {
        let mut m = middle();
        m.handle_input(InputEvent::PadHoverEnter(ClipId(1)));
        assert!(m.tick(1.5).is_empty());
        assert_eq!(
            m.tick(0.5),
            [AudioCommand::Play { channel: MixerChannel::Preview, sample: SampleId(11) }]
        );
        assert!(m.tick(5.0).is_empty());
    }

    #[test]
    fn leaving_the_pad_cancels_the_preview() {
        let mut m = middle();
        m.handle_input(InputEvent::PadHoverEnter(ClipId(0)));
        m.tick(1.0);
        assert_eq!(
            m.handle_input(InputEvent::PadHoverLeave),
            [AudioCommand::StopChannel(MixerChannel::Preview)]
        );
        assert!(m.tick(3.0).is_empty());
    }

    #[test]
    fn preview_of_an_undecoded_clip_is_skipped() {
        let mut m = middle();
        m.handle_input(InputEvent::PadHoverEnter(ClipId(2)));
        assert!(m.tick(2.5).is_empty());
    }

    #[test]
    fn picked_clip_drops_onto_the_clicked_row() {
        let mut m = middle();
        m.handle_input(InputEvent::PadClick(ClipId(1)));
        assert!(m.display_state().pads[1].picked);

        m.handle_input(InputEvent::TrackPress { track: TrackId::Two, x: 0 });
        assert_eq!(ids(&m, TrackId::Two), [1]);
        assert!(ids(&m, TrackId::One).is_empty());

        // the pick is consumed
        m.handle_input(InputEvent::TrackPress { track: TrackId::Two, x: 30 });
        assert_eq!(ids(&m, TrackId::Two), [1]);
    }

    #[test]
    fn append_goes_to_the_armed_track() {
        let mut m = middle();
        m.handle_input(InputEvent::PadAppend(ClipId(0)));
        m.handle_input(InputEvent::ArmTrack(TrackId::Two));
        m.handle_input(InputEvent::FocusPad(1, 0));
        m.handle_input(InputEvent::AppendFocused);
        m.handle_input(InputEvent::FocusPad(0, 1)); // no pad below, focus stays
        m.handle_input(InputEvent::AppendFocused);

        assert_eq!(ids(&m, TrackId::One), [0]);
        assert_eq!(ids(&m, TrackId::Two), [1, 1]);
        assert!(m.display_state().rows[1].armed);
    }

    #[test]
    fn select_then_delete_a_block() {
        let mut m = middle();
        m.handle_input(InputEvent::PadAppend(ClipId(0)));
        m.handle_input(InputEvent::PadAppend(ClipId(1)));

        // a spans [0, 5), b spans [5, 20)
        m.handle_input(InputEvent::TrackPress { track: TrackId::One, x: 7 });
        m.handle_input(InputEvent::DragEnd { x: 7 });
        assert_eq!(m.display_state().rows[0].selected, Some(1));

        m.handle_input(InputEvent::DeleteSelected);
        assert_eq!(ids(&m, TrackId::One), [0]);
        assert_eq!(m.display_state().rows[0].selected, None);

        // nothing selected any more
        m.handle_input(InputEvent::DeleteSelected);
        assert_eq!(ids(&m, TrackId::One), [0]);
    }

    #[test]
    fn dragging_a_block_reorders_the_track() {
        let mut m = middle();
        m.handle_input(InputEvent::PadAppend(ClipId(0)));
        m.handle_input(InputEvent::PadAppend(ClipId(1)));

        m.handle_input(InputEvent::TrackPress { track: TrackId::One, x: 2 });
        m.handle_input(InputEvent::DragMove { x: 15 });
        assert_eq!(m.display_state().rows[0].dragging, Some((0, 15)));

        m.handle_input(InputEvent::DragEnd { x: 19 });
        assert_eq!(ids(&m, TrackId::One), [1, 0]);
        assert_eq!(m.display_state().rows[0].selected, Some(1));
        assert_eq!(m.display_state().rows[0].dragging, None);
    }

    #[test]
    fn play_stop_and_clear() {
        let mut m = middle();
        assert!(m.handle_input(InputEvent::Play).is_empty());
        assert!(!m.is_playing());

        m.handle_input(InputEvent::PadAppend(ClipId(0)));
        let cmds = m.handle_input(InputEvent::Play);
        assert!(cmds.contains(&AudioCommand::Play { channel: MixerChannel::Track1, sample: SampleId(10) }));
        assert!(m.display_state().playing);
        assert_eq!(m.display_state().rows[0].playing, Some(0));

        assert_eq!(m.handle_input(InputEvent::Stop), [AudioCommand::StopAll]);
        assert!(!m.is_playing());

        m.handle_input(InputEvent::Play);
        assert_eq!(m.handle_input(InputEvent::Clear), [AudioCommand::StopAll]);
        assert!(!m.is_playing());
        assert!(m.tracks().is_empty());
        assert_eq!(m.display_state().extent, 10); // the one-second floor
    }

    #[test]
    fn stop_cancels_a_pending_preview() {
        let mut m = middle();
        m.handle_input(InputEvent::PadHoverEnter(ClipId(0)));
        m.handle_input(InputEvent::Stop);
        assert!(m.tick(3.0).is_empty());
    }

    #[test]
    fn playback_ends_on_its_own() {
        let mut m = middle();
        m.handle_input(InputEvent::PadAppend(ClipId(0)));
        m.handle_input(InputEvent::Play);
        m.tick(0.6);
        assert!(!m.is_playing());
    }

    #[test]
    fn grid_shows_at_most_its_capacity() {
        let names: Vec<String> = (0..40).map(|i| format!("clip{i:02}.wav")).collect();
        let clips: Vec<(&str, f64)> = names.iter().map(|n| (n.as_str(), 1.0)).collect();
        let m = Middle::new(catalog_with(&clips), &Config::default());
        let ds = m.display_state();
        assert_eq!(ds.pads.len(), 36);
        assert_eq!(ds.grid_columns, 6);
        assert_eq!(ds.pads[0].label, "clip00");
        assert!(ds.pads[0].focused);
    }

    #[test]
    fn scroll_stays_within_the_timeline() {
        let mut m = middle();
        m.handle_input(InputEvent::Scroll(-3));
        assert_eq!(m.display_state().scroll, 0);
        m.handle_input(InputEvent::Scroll(50));
        assert_eq!(m.display_state().scroll, 10);
    }
}
