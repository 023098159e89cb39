use ratatui::style::Color;

use crate::loader::color_cache::ClipColor;

pub mod grid;
pub mod input;
pub mod mode;
pub mod timeline;
pub mod view;

pub fn rgb(c: ClipColor) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

// readable text on top of a clip color
pub fn text_on(c: ClipColor) -> Color {
    if c.is_light() { Color::Black } else { Color::White }
}
