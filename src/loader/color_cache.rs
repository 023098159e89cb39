// Stable per-clip display colors. The map lives on disk as
// { "<file name>": "#rrggbb" } (see pipeline/persistence.rs) so repeated
// runs keep showing a clip in the same color.

use std::collections::BTreeMap;

use rand::Rng;

pub type ColorMap = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ClipColor {
    // generated colors stay out of the darkest range so blocks show up on black
    pub const MIN: u32 = 0x444444;
    pub const MAX: u32 = 0xFFFFFF;

    pub fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_u32(rng.gen_range(Self::MIN..=Self::MAX))
    }

    // accepts exactly "#rrggbb"
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }

    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.to_u32())
    }

    // black or white text, whichever reads better on this background
    pub fn is_light(self) -> bool {
        let luma = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        luma > 140.0
    }
}

/// Looks up a color for every name, generating (and inserting) one for names
/// the map hasn't seen and replacing entries that don't parse.
///
/// Returns the colors in the order of `names` and whether the map changed,
/// i.e. whether it needs to be written back.
pub fn resolve<'a, R, I>(map: &mut ColorMap, names: I, rng: &mut R) -> (Vec<ClipColor>, bool)
where
    R: Rng,
    I: IntoIterator<Item = &'a str>,
{
    let mut updated = false;
    let colors = names
        .into_iter()
        .map(|name| {
            if let Some(color) = map.get(name).and_then(|hex| ClipColor::parse_hex(hex)) {
                return color;
            }
            if let Some(bad) = map.get(name) {
                log::warn!("color map entry for {name:?} is not a #rrggbb color ({bad:?}), regenerating");
            }
            let color = ClipColor::random(rng);
            map.insert(name.to_string(), color.to_hex());
            updated = true;
            color
        })
        .collect();
    (colors, updated)
}
