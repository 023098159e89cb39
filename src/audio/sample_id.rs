use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

// Handle for a buffer registered with the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleId(pub u64);

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sample #{}", self.0)
    }
}

// atomic counter, ids stay unique whichever thread loads the clip
pub fn next_sample_id() -> SampleId {
    SampleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}
