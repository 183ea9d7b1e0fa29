//! Encounter configuration constants and tunable parameters.

/// Compile-time sizing and tuning knobs for one encounter.
///
/// Numeric combat constants (costs, damage ranges, chances) live next to the
/// skill definitions in [`crate::skill`]; this struct holds the knobs that
/// shape the encounter as a whole.
pub struct EncounterConfig;

impl EncounterConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum party size the setup collaborator may hand over.
    pub const MAX_PARTY: usize = 4;
    /// Maximum skill slots per actor (the boss carries the largest catalog).
    pub const MAX_SKILL_SLOTS: usize = 8;
    /// Maximum summoned helpers alive at once.
    pub const MAX_MINIONS: usize = 4;

    // ===== party decision policy =====
    /// An ally is "wounded" below this fraction of its maximum health.
    pub const WOUNDED_FRACTION: f64 = 0.6;
    /// Chance a party member falls back to its basic attack instead of
    /// searching for an offensive skill.
    pub const BASIC_ATTACK_BIAS: f64 = 0.7;

    // ===== boss phase thresholds (fractions of max health) =====
    /// Below this fraction the boss switches to area attacks.
    pub const AOE_PHASE_THRESHOLD: f64 = 0.5;
    /// Below this fraction the boss enrages.
    pub const ENRAGED_PHASE_THRESHOLD: f64 = 0.2;

    // ===== boss policy skill-use probabilities =====
    pub const AGGRESSIVE_SKILL_CHANCE: f64 = 0.8;
    pub const AOE_SKILL_CHANCE: f64 = 0.9;
    pub const ENRAGED_SKILL_CHANCE: f64 = 0.95;

    // ===== summoned helpers =====
    /// Chance the whole helper pack despawns after it has acted.
    pub const MINION_DESPAWN_CHANCE: f64 = 0.3;
    pub const MINION_DAMAGE_MIN: i32 = 5;
    pub const MINION_DAMAGE_MAX: i32 = 10;
}
