//! Process-wide circular-segment count tunable.
//!
//! Set once at startup (or left at its default of 20) and read by every
//! Shape constructor that needs to tessellate a circular arc (cylinders,
//! spheres, rounded cubes). This is one of the two pieces of explicit
//! global state the design calls for — the other is the provenance
//! registry, owned by `mfd-component`.

use std::sync::atomic::{AtomicU32, Ordering};

static SEGMENTS: AtomicU32 = AtomicU32::new(20);

/// Read the current default circular-segment count.
pub fn default_segments() -> u32 {
    SEGMENTS.load(Ordering::Relaxed)
}

/// Set the default circular-segment count used by subsequent Shape
/// constructors that do not specify an explicit count. Intended to be
/// called once at process startup; concurrent mutation mid-run is
/// undefined, matching the reference implementation's module-level global.
pub fn set_default_segments(segments: u32) {
    SEGMENTS.store(segments, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_twenty() {
        assert_eq!(default_segments(), 20);
    }
}
