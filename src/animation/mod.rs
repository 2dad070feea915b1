//! Scroll-driven page animation: one-shot reveals and the stats count-up.

mod counter;
mod reveal;

pub use counter::{CountUp, StatCounter, StatCounters, COUNT_DURATION_MS, FRAME_MS, STATS_THRESHOLD};
pub use reveal::{
    RevealAnimator, RevealElement, RevealState, Viewport, Visibility, REVEALED_CLASSES,
    REVEAL_CLASSES, REVEAL_THRESHOLD,
};
