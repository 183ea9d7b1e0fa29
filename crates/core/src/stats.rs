//! Bounded resource pools, attribute blocks, and level scaling.
//!
//! Every mutation clamps: health and mana stay within `[0, max]`, attributes
//! within `[1, 30]`. External code reads through accessors and mutates
//! through the clamping operations, never through raw fields, so the bounds
//! hold centrally.

/// Inclusive bounds for derived attributes.
const ATTRIBUTE_MIN: i32 = 1;
const ATTRIBUTE_MAX: i32 = 30;

// ============================================================================
// Resource Meter
// ============================================================================

/// A bounded pool (health or mana) clamped to `[0, max]` on every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceMeter {
    current: i32,
    max: i32,
}

impl ResourceMeter {
    /// Create a full meter with the given maximum (floored at 1).
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Current value as a fraction of the maximum, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.current) / f64::from(self.max)
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        self.current >= cost
    }

    /// Reduce the pool, clamping at zero.
    pub fn damage(&mut self, amount: i32) {
        self.set_current(self.current - amount.max(0));
    }

    /// Pay a cost from the pool, clamping at zero.
    pub fn spend(&mut self, cost: i32) {
        self.damage(cost);
    }

    /// Refill the pool, clamping at the maximum.
    pub fn restore(&mut self, amount: i32) {
        self.set_current(self.current + amount.max(0));
    }

    /// Force the current value, clamped to `[0, max]`.
    pub fn set_current(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Enum referencing one derived attribute, for debuff application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Strength,
    Agility,
    Intellect,
}

/// Derived attribute block, each value clamped to `[1, 30]`.
///
/// Debuffs reduce attributes permanently; the floor of 1 holds on every
/// mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attributes {
    strength: i32,
    agility: i32,
    intellect: i32,
}

impl Attributes {
    pub fn new(strength: i32, agility: i32, intellect: i32) -> Self {
        Self {
            strength: clamp_attribute(strength),
            agility: clamp_attribute(agility),
            intellect: clamp_attribute(intellect),
        }
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn agility(&self) -> i32 {
        self.agility
    }

    pub fn intellect(&self) -> i32 {
        self.intellect
    }

    pub fn get(&self, kind: AttributeKind) -> i32 {
        match kind {
            AttributeKind::Strength => self.strength,
            AttributeKind::Agility => self.agility,
            AttributeKind::Intellect => self.intellect,
        }
    }

    /// Permanently reduce an attribute, clamping at the floor of 1.
    pub fn reduce(&mut self, kind: AttributeKind, by: i32) {
        let slot = match kind {
            AttributeKind::Strength => &mut self.strength,
            AttributeKind::Agility => &mut self.agility,
            AttributeKind::Intellect => &mut self.intellect,
        };
        *slot = clamp_attribute(*slot - by.max(0));
    }
}

fn clamp_attribute(value: i32) -> i32 {
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

// ============================================================================
// Level Scaling
// ============================================================================

/// Class-independent base stats for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseProfile {
    pub health: i32,
    pub mana: i32,
    pub strength: i32,
    pub agility: i32,
    pub intellect: i32,
}

/// Anchor levels with known base stats; levels in between interpolate
/// linearly (truncating to integer), levels outside clamp to the ends.
const ANCHORS: [(u8, BaseProfile); 4] = [
    (
        1,
        BaseProfile {
            health: 100,
            mana: 50,
            strength: 10,
            agility: 10,
            intellect: 10,
        },
    ),
    (
        5,
        BaseProfile {
            health: 150,
            mana: 75,
            strength: 15,
            agility: 15,
            intellect: 15,
        },
    ),
    (
        10,
        BaseProfile {
            health: 200,
            mana: 100,
            strength: 20,
            agility: 20,
            intellect: 20,
        },
    ),
    (
        20,
        BaseProfile {
            health: 300,
            mana: 150,
            strength: 30,
            agility: 30,
            intellect: 30,
        },
    ),
];

/// Base stats scaled to the given level.
pub fn scaled_profile(level: u8) -> BaseProfile {
    let (first_level, first) = ANCHORS[0];
    if level <= first_level {
        return first;
    }
    let (last_level, last) = ANCHORS[ANCHORS.len() - 1];
    if level >= last_level {
        return last;
    }
    for window in ANCHORS.windows(2) {
        let (lo_level, lo) = window[0];
        let (hi_level, hi) = window[1];
        if (lo_level..=hi_level).contains(&level) {
            let ratio = f64::from(level - lo_level) / f64::from(hi_level - lo_level);
            return BaseProfile {
                health: lerp(lo.health, hi.health, ratio),
                mana: lerp(lo.mana, hi.mana, ratio),
                strength: lerp(lo.strength, hi.strength, ratio),
                agility: lerp(lo.agility, hi.agility, ratio),
                intellect: lerp(lo.intellect, hi.intellect, ratio),
            };
        }
    }
    first
}

fn lerp(lo: i32, hi: i32, ratio: f64) -> i32 {
    (f64::from(lo) + f64::from(hi - lo) * ratio) as i32
}
