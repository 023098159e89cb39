//! The two-track scheduler. Nothing here sleeps or spawns: the UI loop calls
//! `tick` with its clock every frame, and every deadline that has passed
//! fires then. Both tracks run independent chains on their own mixer channel.

use serde::{Deserialize, Serialize};

use super::timeline::TimelineLayout;
use super::track::Tracks;
use crate::audio_api::{AudioCommand, MixerChannel, NUM_CHANNELS};
use crate::loader::catalog::Catalog;
use crate::shared::{NUM_TRACKS, TrackId};

/// How a chain decides that the current clip is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceMode {
    /// Wait for the clip's nominal duration.
    #[default]
    Timer,
    /// Poll the track's mixer channel until it is no longer busy.
    BusyPoll,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// One sweep per row across the whole timeline for the whole run.
    #[default]
    Timeline,
    /// The sweep restarts over every clip's own block.
    PerClip,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSettings {
    pub advance: AdvanceMode,
    pub sweep: SweepMode,
    pub sweep_frame: f64, // seconds
    pub busy_poll: f64,   // seconds
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            advance: AdvanceMode::Timer,
            sweep: SweepMode::Timeline,
            sweep_frame: 0.030,
            busy_poll: 0.100,
        }
    }
}

// ── Sweep ─────────────────────────────────────────────────────────

/// A progress line stepping across `width` columns in `duration` seconds,
/// one step per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Sweep {
    start_x: f64,
    step_size: f64,
    steps: u32,
    step: u32,
    frame: f64,
    next_at: f64,
}

impl Sweep {
    pub fn new(start_x: f64, width: f64, duration: f64, frame: f64, now: f64) -> Option<Self> {
        if frame <= 0.0 {
            return None;
        }
        // 0.3 / 0.03 lands just under 10
        let steps = (duration / frame + 1e-9).floor();
        if steps < 1.0 {
            return None;
        }
        Some(Self {
            start_x,
            step_size: width / steps,
            steps: steps as u32,
            step: 0,
            frame,
            next_at: now + frame,
        })
    }

    pub fn advance(&mut self, now: f64) {
        while self.step < self.steps && now >= self.next_at {
            self.step += 1;
            self.next_at += self.frame;
        }
    }

    pub fn x(&self) -> u32 {
        (self.start_x + self.step as f64 * self.step_size).round() as u32
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }
}

// ── Sequencer ─────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
struct Chain {
    cursor: usize,
    due: Option<f64>, // timer deadline or next busy poll
    finished: bool,
    silent: bool, // current block has no audio, so its deadline is a timer
    sweep: Option<Sweep>,
}

pub struct Sequencer {
    settings: PlaybackSettings,
    active: bool,
    chains: [Chain; NUM_TRACKS],
}

impl Sequencer {
    pub fn new(settings: PlaybackSettings) -> Self {
        Self {
            settings,
            active: false,
            chains: Default::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the block `track` is playing right now.
    pub fn cursor(&self, track: TrackId) -> Option<usize> {
        let chain = &self.chains[track.index()];
        (self.active && !chain.finished).then_some(chain.cursor)
    }

    pub fn sweep_x(&self, track: TrackId) -> Option<u32> {
        self.chains[track.index()].sweep.as_ref().map(Sweep::x)
    }

    /// Starts both chains from the first block. Anything already playing is
    /// stopped first; with both tracks empty this is a no-op.
    pub fn start(
        &mut self,
        now: f64,
        tracks: &Tracks,
        catalog: &Catalog,
        layout: &TimelineLayout,
    ) -> Vec<AudioCommand> {
        if tracks.is_empty() {
            log::debug!("play ignored, both tracks are empty");
            return Vec::new();
        }

        let mut cmds = self.stop();
        self.active = true;
        log::info!(
            "playback started ({} + {} blocks)",
            tracks.get(TrackId::One).len(),
            tracks.get(TrackId::Two).len()
        );

        for track in TrackId::ALL {
            if self.settings.sweep == SweepMode::Timeline {
                let (width, duration) = layout.sweep_span(track);
                self.chains[track.index()].sweep =
                    Sweep::new(0.0, width, duration, self.settings.sweep_frame, now);
            }
            self.step(track, now, tracks, catalog, layout, &mut cmds);
        }
        cmds
    }

    pub fn stop(&mut self) -> Vec<AudioCommand> {
        if self.active {
            log::info!("playback stopped");
        }
        self.active = false;
        self.chains = Default::default();
        vec![AudioCommand::StopAll]
    }

    /// Fires every deadline up to `now`. `busy` is the engine's per-channel
    /// "still playing" snapshot, read only in busy-poll mode.
    pub fn tick(
        &mut self,
        now: f64,
        busy: [bool; NUM_CHANNELS],
        tracks: &Tracks,
        catalog: &Catalog,
        layout: &TimelineLayout,
    ) -> Vec<AudioCommand> {
        let mut cmds = Vec::new();
        if !self.active {
            return cmds;
        }

        for track in TrackId::ALL {
            let i = track.index();
            match self.settings.advance {
                AdvanceMode::Timer => {
                    // a long frame can cover several short clips
                    while let Some(due) = self.chains[i].due.filter(|&d| now >= d) {
                        self.chains[i].cursor += 1;
                        self.step(track, due, tracks, catalog, layout, &mut cmds);
                    }
                }
                AdvanceMode::BusyPoll => {
                    // one poll per frame, the busy snapshot predates any Play sent here
                    let Some(due) = self.chains[i].due.filter(|&d| now >= d) else {
                        continue;
                    };
                    let silent = self.chains[i].silent;
                    if !silent && busy[MixerChannel::for_track(track).index()] {
                        self.chains[i].due = Some(now.max(due) + self.settings.busy_poll);
                    } else {
                        self.chains[i].cursor += 1;
                        let at = if silent { due } else { now };
                        self.step(track, at, tracks, catalog, layout, &mut cmds);
                    }
                }
            }
        }

        for chain in self.chains.iter_mut() {
            if let Some(sweep) = chain.sweep.as_mut().filter(|s| !s.is_finished()) {
                sweep.advance(now);
            }
        }

        if self.chains.iter().all(|c| c.finished) {
            self.active = false;
            self.chains.iter_mut().for_each(|c| c.sweep = None);
            log::info!("playback finished");
        }
        cmds
    }

    // Plays the block under the track's cursor at time `at` and arms the
    // advance, or finishes the chain when the cursor ran off the end.
    fn step(
        &mut self,
        track: TrackId,
        at: f64,
        tracks: &Tracks,
        catalog: &Catalog,
        layout: &TimelineLayout,
        cmds: &mut Vec<AudioCommand>,
    ) {
        let settings = self.settings;
        let active = self.active;
        let channel = MixerChannel::for_track(track);
        let chain = &mut self.chains[track.index()];

        let next = tracks
            .get(track)
            .get(chain.cursor)
            .filter(|_| active)
            .and_then(|id| catalog.get(id));

        let Some(clip) = next else {
            chain.finished = true;
            chain.due = None;
            if settings.sweep == SweepMode::PerClip {
                chain.sweep = None;
            }
            cmds.push(AudioCommand::StopChannel(channel));
            log::debug!("{track} reached its end");
            return;
        };

        match clip.sample_id {
            Some(sample) => cmds.push(AudioCommand::Play { channel, sample }),
            None => log::warn!("{track}: {} has no decoded audio, skipping its sound", clip.name),
        }
        chain.silent = clip.sample_id.is_none();

        // a silent block never reads busy, so it waits out its duration
        chain.due = Some(
            at + match settings.advance {
                AdvanceMode::BusyPoll if !chain.silent => settings.busy_poll,
                _ => clip.duration,
            },
        );

        if settings.sweep == SweepMode::PerClip {
            chain.sweep = layout.block(track, chain.cursor).and_then(|b| {
                Sweep::new(b.x as f64, b.width as f64, clip.duration, settings.sweep_frame, at)
            });
        }
    }
}
