//! Passion categories, per-player score ledgers, and star-milestone math.

use serde::{Deserialize, Serialize};

/// The six passion categories tracked per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Passion {
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Orange,
}

impl Passion {
    /// All passions in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Orange,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Orange => "orange",
        }
    }
}

/// Whether score mutations are floored at zero or may go negative.
///
/// The two shipped board variants disagreed on this, so it is a policy
/// knob rather than a hard-coded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreClamp {
    /// Scores never drop below zero.
    #[default]
    FloorAtZero,
    /// Scores may go negative.
    AllowNegative,
}

/// Per-passion score counters for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScoreSet {
    #[serde(default)]
    pub yellow: i32,
    #[serde(default)]
    pub green: i32,
    #[serde(default)]
    pub blue: i32,
    #[serde(default)]
    pub purple: i32,
    #[serde(default)]
    pub pink: i32,
    #[serde(default)]
    pub orange: i32,
}

impl ScoreSet {
    #[must_use]
    pub const fn get(&self, passion: Passion) -> i32 {
        match passion {
            Passion::Yellow => self.yellow,
            Passion::Green => self.green,
            Passion::Blue => self.blue,
            Passion::Purple => self.purple,
            Passion::Pink => self.pink,
            Passion::Orange => self.orange,
        }
    }

    /// Apply a signed delta under the given clamp policy.
    pub fn add(&mut self, passion: Passion, delta: i32, clamp: ScoreClamp) {
        let slot = match passion {
            Passion::Yellow => &mut self.yellow,
            Passion::Green => &mut self.green,
            Passion::Blue => &mut self.blue,
            Passion::Purple => &mut self.purple,
            Passion::Pink => &mut self.pink,
            Passion::Orange => &mut self.orange,
        };
        let next = slot.saturating_add(delta);
        *slot = match clamp {
            ScoreClamp::FloorAtZero => next.max(0),
            ScoreClamp::AllowNegative => next,
        };
    }

    /// Sum across all passions (no multipliers applied).
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.yellow + self.green + self.blue + self.purple + self.pink + self.orange
    }
}

/// Flat per-passion point deltas carried by card and item payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PassionAmounts {
    #[serde(default)]
    pub yellow: i32,
    #[serde(default)]
    pub green: i32,
    #[serde(default)]
    pub blue: i32,
    #[serde(default)]
    pub purple: i32,
    #[serde(default)]
    pub pink: i32,
    #[serde(default)]
    pub orange: i32,
}

impl PassionAmounts {
    #[must_use]
    pub const fn amount(&self, passion: Passion) -> i32 {
        match passion {
            Passion::Yellow => self.yellow,
            Passion::Green => self.green,
            Passion::Blue => self.blue,
            Passion::Purple => self.purple,
            Passion::Pink => self.pink,
            Passion::Orange => self.orange,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.yellow == 0
            && self.green == 0
            && self.blue == 0
            && self.purple == 0
            && self.pink == 0
            && self.orange == 0
    }
}

/// Per-passion score multipliers carried by items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassionMultipliers {
    #[serde(default = "default_one")]
    pub yellow: f32,
    #[serde(default = "default_one")]
    pub green: f32,
    #[serde(default = "default_one")]
    pub blue: f32,
    #[serde(default = "default_one")]
    pub purple: f32,
    #[serde(default = "default_one")]
    pub pink: f32,
    #[serde(default = "default_one")]
    pub orange: f32,
}

impl PassionMultipliers {
    #[must_use]
    pub const fn factor(&self, passion: Passion) -> f32 {
        match passion {
            Passion::Yellow => self.yellow,
            Passion::Green => self.green,
            Passion::Blue => self.blue,
            Passion::Purple => self.purple,
            Passion::Pink => self.pink,
            Passion::Orange => self.orange,
        }
    }
}

impl Default for PassionMultipliers {
    fn default() -> Self {
        Self {
            yellow: 1.0,
            green: 1.0,
            blue: 1.0,
            purple: 1.0,
            pink: 1.0,
            orange: 1.0,
        }
    }
}

const fn default_one() -> f32 {
    1.0
}

/// Round a base amount through the multiplier pipeline.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rounded_points(base: i32, factor: f32) -> i32 {
    #[allow(clippy::cast_precision_loss)]
    let scaled = base as f32 * factor;
    scaled.round() as i32
}

/// Number of star milestones crossed by a single upward score change.
///
/// Stars never decrease; a downward change yields zero.
#[must_use]
pub fn stars_crossed(before: i32, after: i32, threshold: i32) -> u32 {
    if threshold <= 0 || after <= before {
        return 0;
    }
    let floor = |value: i32| value.max(0) / threshold;
    u32::try_from(floor(after) - floor(before)).unwrap_or(0)
}
