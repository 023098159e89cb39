pub mod persistence;
pub mod playback;
pub mod timeline;
pub mod track;

#[cfg(test)]
pub mod test_fixture;
