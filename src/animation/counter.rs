//! Animated statistic counters.
//!
//! The counters in the stats section stay at rest until the section is half
//! visible, then all count up together from zero to their target over about
//! two seconds. The trigger fires once per page.

use crate::animation::Visibility;
use tracing::warn;

pub const COUNT_DURATION_MS: u64 = 2000;

/// One animation frame at ~60fps.
pub const FRAME_MS: u64 = 16;

/// Share of the stats section that must be visible to start counting.
pub const STATS_THRESHOLD: f64 = 0.5;

/// Displayed values of one count-up, frame by frame.
///
/// Each frame adds `target / (COUNT_DURATION_MS / FRAME_MS)` and shows the
/// floor of the running value; the final frame shows exactly `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    target: u64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CountUp {
    pub fn new(target: u64) -> Self {
        let frames = COUNT_DURATION_MS as f64 / FRAME_MS as f64;
        Self {
            target,
            increment: target as f64 / frames,
            current: 0.0,
            finished: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for CountUp {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.finished {
            return None;
        }

        self.current += self.increment;
        if self.current < self.target as f64 {
            Some(self.current.floor() as u64)
        } else {
            self.finished = true;
            Some(self.target)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    id: String,
    target: u64,
    display: String,
    animation: Option<CountUp>,
}

impl StatCounter {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Whether the counter is mid-animation (the `counting` class).
    pub fn is_counting(&self) -> bool {
        self.animation.is_some()
    }

    fn tick(&mut self) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };

        if let Some(value) = animation.next() {
            self.display = value.to_string();
        }
        if animation.is_finished() {
            self.animation = None;
        }
    }
}

/// All counters of the stats section.
#[derive(Debug, Clone, Default)]
pub struct StatCounters {
    counters: Vec<StatCounter>,
    triggered: bool,
}

impl StatCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a counter from its `data-count` attribute and current text.
    ///
    /// The target is the attribute's leading run of digits, so `"5000+"`
    /// counts to 5000. Counters without leading digits are skipped.
    pub fn register(&mut self, id: impl Into<String>, data_count: &str, initial: &str) -> bool {
        let id = id.into();
        let Some(target) = leading_integer(data_count) else {
            warn!("Stat counter {} has invalid data-count '{}'", id, data_count);
            return false;
        };

        self.counters.push(StatCounter {
            id,
            target,
            display: initial.to_string(),
            animation: None,
        });
        true
    }

    /// Feed a visibility observation of the stats section. Returns `true`
    /// when this observation started the counters.
    pub fn observe_section(&mut self, visibility: Visibility) -> bool {
        if self.triggered || !visibility.meets(STATS_THRESHOLD) {
            return false;
        }

        self.triggered = true;
        for counter in &mut self.counters {
            counter.animation = Some(CountUp::new(counter.target));
            counter.tick();
        }
        true
    }

    /// Advance every running counter by one frame. Returns `true` while any
    /// counter is still counting.
    pub fn tick(&mut self) -> bool {
        for counter in &mut self.counters {
            counter.tick();
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.counters.iter().any(StatCounter::is_counting)
    }

    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    pub fn counter(&self, id: &str) -> Option<&StatCounter> {
        self.counters.iter().find(|c| c.id == id)
    }
}

/// Leading decimal digits of `raw` after optional whitespace and `+`.
fn leading_integer(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
