//! Timeline geometry, in terminal columns. Everything here is recomputed from
//! the tracks on every frame; nothing is cached between renders.

use serde::{Deserialize, Serialize};

use super::track::{Track, Tracks};
use crate::loader::catalog::Catalog;
use crate::loader::color_cache::ClipColor;
use crate::shared::{ClipId, NUM_TRACKS, TrackId};

// a shared canvas is never narrower than this many seconds
const MIN_SHARED_SECS: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Both rows are scaled against the longer track, so equal columns mean
    /// equal time across rows.
    #[default]
    Shared,
    /// Every row uses a fixed columns-per-second on its own.
    PerTrack,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockGeom {
    pub index: usize, // position in the track
    pub clip: ClipId,
    pub x: u32,
    pub width: u32,
    pub color: ClipColor,
    pub label: String,
}

impl BlockGeom {
    pub fn end(&self) -> u32 {
        self.x + self.width
    }

    pub fn contains(&self, x: u32) -> bool {
        x >= self.x && x < self.end()
    }

    fn midpoint(&self) -> f64 {
        self.x as f64 + self.width as f64 / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineScale {
    pub columns_per_second: f64,
    pub policy: ScalePolicy,
}

impl Default for TimelineScale {
    fn default() -> Self {
        Self {
            columns_per_second: 10.0,
            policy: ScalePolicy::Shared,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimelineLayout {
    pub rows: [Vec<BlockGeom>; NUM_TRACKS],
    pub row_extents: [u32; NUM_TRACKS],
    pub row_durations: [f64; NUM_TRACKS],
    pub extent: u32, // widest row, what the ruler and scrolling cover
    pub span_secs: f64, // seconds covered by `extent`
    pub policy: ScalePolicy,
}

impl TimelineLayout {
    pub fn row(&self, track: TrackId) -> &[BlockGeom] {
        &self.rows[track.index()]
    }

    pub fn block(&self, track: TrackId, index: usize) -> Option<&BlockGeom> {
        self.rows[track.index()].get(index)
    }

    /// The (width, duration) a whole-run sweep covers on this row.
    pub fn sweep_span(&self, track: TrackId) -> (f64, f64) {
        match self.policy {
            ScalePolicy::Shared => (self.extent as f64, self.span_secs),
            ScalePolicy::PerTrack => (
                self.row_extents[track.index()] as f64,
                self.row_durations[track.index()],
            ),
        }
    }
}

impl TimelineScale {
    pub fn layout(&self, tracks: &Tracks, catalog: &Catalog) -> TimelineLayout {
        let row_durations = TrackId::ALL.map(|t| tracks.get(t).total_duration(catalog));

        let (extent, span_secs) = match self.policy {
            ScalePolicy::Shared => {
                let span = tracks.max_duration(catalog).max(MIN_SHARED_SECS);
                ((span * self.columns_per_second) as u32, span)
            }
            // refined below, once every row is laid out
            ScalePolicy::PerTrack => (0, row_durations.iter().copied().fold(0.0, f64::max)),
        };

        let rows = TrackId::ALL.map(|t| {
            layout_row(tracks.get(t), catalog, |d| self.block_width(d, span_secs, extent))
        });
        let row_extents = std::array::from_fn(|i| rows[i].last().map_or(0, BlockGeom::end));

        let extent = match self.policy {
            ScalePolicy::Shared => extent,
            ScalePolicy::PerTrack => row_extents.iter().copied().max().unwrap_or(0),
        };

        TimelineLayout {
            rows,
            row_extents,
            row_durations,
            extent,
            span_secs,
            policy: self.policy,
        }
    }

    fn block_width(&self, duration: f64, span_secs: f64, extent: u32) -> u32 {
        let w = match self.policy {
            ScalePolicy::Shared if span_secs > 0.0 => duration / span_secs * extent as f64,
            ScalePolicy::Shared => 0.0,
            ScalePolicy::PerTrack => duration * self.columns_per_second,
        };
        (w as u32).max(1)
    }

    /// Ruler ticks as (column, second), one per whole second of `span_secs`.
    pub fn ruler(&self, layout: &TimelineLayout) -> Vec<(u32, u32)> {
        let seconds = layout.span_secs.floor() as u32;
        (0..=seconds)
            .map(|s| {
                let x = match self.policy {
                    ScalePolicy::Shared if layout.span_secs > 0.0 => {
                        s as f64 / layout.span_secs * layout.extent as f64
                    }
                    ScalePolicy::Shared => 0.0,
                    ScalePolicy::PerTrack => s as f64 * self.columns_per_second,
                };
                (x as u32, s)
            })
            .collect()
    }
}

fn layout_row(track: &Track, catalog: &Catalog, width_of: impl Fn(f64) -> u32) -> Vec<BlockGeom> {
    let mut x = 0;
    track
        .clips()
        .iter()
        .enumerate()
        .filter_map(|(index, &clip)| {
            let c = catalog.get(clip)?;
            let width = width_of(c.duration);
            let geom = BlockGeom {
                index,
                clip,
                x,
                width,
                color: c.color,
                label: c.label().to_string(),
            };
            x += width;
            Some(geom)
        })
        .collect()
}

/// The block under column `x`, if any.
pub fn hit_test(blocks: &[BlockGeom], x: u32) -> Option<usize> {
    blocks.iter().find(|b| b.contains(x)).map(|b| b.index)
}

/// Where a block dropped at column `x` is inserted: before the first block
/// whose midpoint lies right of `x`, else at the end.
pub fn drop_index(blocks: &[BlockGeom], x: u32) -> usize {
    blocks
        .iter()
        .find(|b| b.midpoint() > x as f64)
        .map_or(blocks.len(), |b| b.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_fixture::catalog_with;

    fn tracks(one: &[usize], two: &[usize]) -> Tracks {
        let mut t = Tracks::default();
        one.iter().for_each(|&i| t.get_mut(TrackId::One).append(ClipId(i)));
        two.iter().for_each(|&i| t.get_mut(TrackId::Two).append(ClipId(i)));
        t
    }

    fn spans(blocks: &[BlockGeom]) -> Vec<(u32, u32)> {
        blocks.iter().map(|b| (b.x, b.width)).collect()
    }

    #[test]
    fn shared_scale_is_relative_to_the_longer_track() {
        let catalog = catalog_with(&[("a.wav", 1.0), ("b.wav", 2.0)]);
        let scale = TimelineScale { columns_per_second: 10.0, policy: ScalePolicy::Shared };
        let layout = scale.layout(&tracks(&[0, 1, 0], &[1]), &catalog);

        assert_eq!(layout.extent, 40);
        assert_eq!(spans(layout.row(TrackId::One)), [(0, 10), (10, 20), (30, 10)]);
        assert_eq!(spans(layout.row(TrackId::Two)), [(0, 20)]);
        assert_eq!(layout.row(TrackId::One)[1].label, "b");
    }

    #[test]
    fn shared_scale_has_a_one_second_floor() {
        let catalog = catalog_with(&[("tick.wav", 0.25)]);
        let scale = TimelineScale { columns_per_second: 100.0, policy: ScalePolicy::Shared };
        let layout = scale.layout(&tracks(&[0], &[]), &catalog);

        assert_eq!(layout.extent, 100);
        assert_eq!(layout.span_secs, 1.0);
        assert_eq!(spans(layout.row(TrackId::One)), [(0, 25)]);
        assert!(layout.row(TrackId::Two).is_empty());
    }

    #[test]
    fn tiny_clips_are_at_least_one_column() {
        let catalog = catalog_with(&[("long.wav", 30.0), ("blip.wav", 0.001)]);
        let scale = TimelineScale { columns_per_second: 2.0, policy: ScalePolicy::Shared };
        let layout = scale.layout(&tracks(&[0], &[1, 1]), &catalog);
        assert_eq!(spans(layout.row(TrackId::Two)), [(0, 1), (1, 1)]);
    }

    #[test]
    fn per_track_scale_uses_fixed_columns_per_second() {
        let catalog = catalog_with(&[("a.wav", 1.5), ("b.wav", 0.5)]);
        let scale = TimelineScale { columns_per_second: 10.0, policy: ScalePolicy::PerTrack };
        let layout = scale.layout(&tracks(&[0, 1], &[1]), &catalog);

        assert_eq!(spans(layout.row(TrackId::One)), [(0, 15), (15, 5)]);
        assert_eq!(layout.row_extents, [20, 5]);
        assert_eq!(layout.extent, 20);
        assert_eq!(layout.sweep_span(TrackId::Two), (5.0, 0.5));
    }

    #[test]
    fn ruler_ticks_every_second() {
        let catalog = catalog_with(&[("a.wav", 2.5)]);
        let scale = TimelineScale { columns_per_second: 10.0, policy: ScalePolicy::Shared };
        let layout = scale.layout(&tracks(&[0], &[]), &catalog);
        assert_eq!(scale.ruler(&layout), [(0, 0), (10, 1), (20, 2)]);
    }

    #[test]
    fn hit_test_and_drop_index() {
        let catalog = catalog_with(&[("a.wav", 1.0), ("b.wav", 2.0)]);
        let scale = TimelineScale::default();
        let layout = scale.layout(&tracks(&[0, 1, 0], &[]), &catalog);
        let row = layout.row(TrackId::One); // [0,10) [10,30) [30,40)

        assert_eq!(hit_test(row, 0), Some(0));
        assert_eq!(hit_test(row, 29), Some(1));
        assert_eq!(hit_test(row, 40), None);

        assert_eq!(drop_index(row, 3), 0);
        assert_eq!(drop_index(row, 12), 1); // left of b's midpoint at 20
        assert_eq!(drop_index(row, 21), 2);
        assert_eq!(drop_index(row, 39), 3);
    }
}
