pub mod catalog;
pub mod color_cache;
pub mod sample_loader;
