//! Skill catalog: costs, cooldowns, tags, and resolution formulas.
//!
//! Resolution functions are pure combat math plus narration: they verify
//! affordability and target validity, mutate the target(s), and return the
//! narration line. Paying the mana cost and starting the cooldown is the
//! dispatching caller's job, and only happens after a successful resolution.

use bitflags::bitflags;

use crate::actor::Actor;
use crate::effect::Effect;
use crate::env::Dice;
use crate::error::TurnFault;
use crate::stats::AttributeKind;

// ============================================================================
// Tags
// ============================================================================

bitflags! {
    /// Behavioral categories the decision policies filter on.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SkillTags: u8 {
        /// Strikes every living opponent at once.
        const AOE = 1 << 0;
        /// High-impact ability the enraged boss prefers.
        const POWERFUL = 1 << 1;
        /// Beneficial ability; only valid on the user's own side.
        const SUPPORT = 1 << 2;
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Every skill in the encounter, across all classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    // ===== warrior =====
    #[strum(to_string = "Swing Sword")]
    SwingSword,
    #[strum(to_string = "Heavy Slam")]
    HeavySlam,
    // ===== mage =====
    #[strum(to_string = "Fireball")]
    Fireball,
    #[strum(to_string = "Arcane Missile")]
    ArcaneMissile,
    // ===== healer =====
    #[strum(to_string = "Heal")]
    Heal,
    #[strum(to_string = "Divine Shield")]
    DivineShield,
    // ===== boss =====
    #[strum(to_string = "Dragon Breath")]
    DragonBreath,
    #[strum(to_string = "Tail Swipe")]
    TailSwipe,
    #[strum(to_string = "Wing Buffet")]
    WingBuffet,
    #[strum(to_string = "Fear Roar")]
    FearRoar,
    #[strum(to_string = "Summon Minions")]
    SummonMinions,
    #[strum(to_string = "Meteor Shower")]
    MeteorShower,
    #[strum(to_string = "Earthquake")]
    Earthquake,
}

impl SkillKind {
    pub fn mana_cost(self) -> i32 {
        match self {
            SkillKind::SwingSword => 0,
            SkillKind::HeavySlam => 10,
            SkillKind::Fireball => 15,
            SkillKind::ArcaneMissile => 10,
            SkillKind::Heal => 20,
            SkillKind::DivineShield => 25,
            SkillKind::DragonBreath => 30,
            SkillKind::TailSwipe => 15,
            SkillKind::WingBuffet => 20,
            SkillKind::FearRoar => 25,
            SkillKind::SummonMinions => 40,
            SkillKind::MeteorShower => 50,
            SkillKind::Earthquake => 40,
        }
    }

    /// Cooldown in rounds after a skilled use. Basic-attack uses never start
    /// this cooldown.
    pub fn cooldown(self) -> u8 {
        match self {
            SkillKind::SwingSword => 0,
            SkillKind::HeavySlam => 3,
            SkillKind::Fireball => 2,
            SkillKind::ArcaneMissile => 2,
            SkillKind::Heal => 3,
            SkillKind::DivineShield => 4,
            SkillKind::DragonBreath => 3,
            SkillKind::TailSwipe => 2,
            SkillKind::WingBuffet => 2,
            SkillKind::FearRoar => 4,
            SkillKind::SummonMinions => 5,
            SkillKind::MeteorShower => 4,
            SkillKind::Earthquake => 3,
        }
    }

    pub fn tags(self) -> SkillTags {
        match self {
            SkillKind::Heal | SkillKind::DivineShield => SkillTags::SUPPORT,
            SkillKind::DragonBreath | SkillKind::MeteorShower | SkillKind::Earthquake => {
                SkillTags::AOE | SkillTags::POWERFUL
            }
            SkillKind::WingBuffet => SkillTags::AOE,
            SkillKind::SummonMinions => SkillTags::POWERFUL,
            _ => SkillTags::empty(),
        }
    }

    pub fn is_support(self) -> bool {
        self.tags().contains(SkillTags::SUPPORT)
    }

    /// Whether this skill resolves against a single combatant (as opposed to
    /// a whole-side wave or the summoning ritual).
    pub fn is_single_target(self) -> bool {
        !matches!(
            self,
            SkillKind::DragonBreath
                | SkillKind::WingBuffet
                | SkillKind::FearRoar
                | SkillKind::SummonMinions
                | SkillKind::MeteorShower
                | SkillKind::Earthquake
        )
    }
}

// ============================================================================
// Single-target resolution
// ============================================================================

fn ensure_affordable(user: &Actor, kind: SkillKind) -> Result<(), TurnFault> {
    if !user.mana.can_afford(kind.mana_cost()) {
        return Err(TurnFault::InsufficientMana { skill: kind });
    }
    Ok(())
}

/// Resolve a single-target skill from `user` onto `target`.
///
/// Offensive skills refuse dead targets; support skills accept any ally.
/// Side validity (support at the opposing side) is enforced by the caller,
/// which knows which side the target sits on.
pub fn resolve_single(
    kind: SkillKind,
    user: &Actor,
    target: &mut Actor,
    dice: &mut dyn Dice,
) -> Result<String, TurnFault> {
    if !kind.is_support() && !target.is_alive() {
        return Err(TurnFault::InvalidTarget);
    }
    ensure_affordable(user, kind)?;

    let line = match kind {
        SkillKind::SwingSword => {
            let mut damage = user.attributes.strength() + dice.roll(1, 5);
            let mut crit = false;
            if let Some(profile) = user.crit_profile() {
                if dice.chance(profile.chance) {
                    damage = (f64::from(damage) * profile.multiplier) as i32;
                    crit = true;
                }
            }
            target.take_damage(damage);
            if crit {
                format!(
                    "{} lands a critical sword blow on {} for {} damage!",
                    user.name, target.name, damage
                )
            } else {
                format!(
                    "{} swings a sword at {} for {} damage.",
                    user.name, target.name, damage
                )
            }
        }
        SkillKind::HeavySlam => {
            let damage = user.attributes.strength() * 2 + dice.roll(3, 7);
            target.take_damage(damage);
            format!(
                "{} slams {} with a crushing blow for {} damage!",
                user.name, target.name, damage
            )
        }
        SkillKind::Fireball => {
            let damage = user.attributes.intellect() + dice.roll(5, 10);
            target.take_damage(damage);
            let mut line = format!(
                "{} hurls a fireball at {} for {} damage!",
                user.name, target.name, damage
            );
            if dice.chance(0.3) {
                let attach = target.attach_effect(Effect::poison(3, 3));
                line.push(' ');
                line.push_str(&attach);
            }
            line
        }
        SkillKind::ArcaneMissile => {
            // One roll sets the per-missile damage; the three hits land
            // independently so shields absorb each in turn.
            let per_hit = user.attributes.intellect() + dice.roll(3, 6);
            for _ in 0..3 {
                target.take_damage(per_hit);
            }
            format!(
                "{} unleashes 3 arcane missiles at {} for {} total damage!",
                user.name,
                target.name,
                per_hit * 3
            )
        }
        SkillKind::Heal => {
            let amount = user.attributes.intellect() + dice.roll(8, 12);
            target.restore_health(amount);
            format!("{} heals {} for {} HP.", user.name, target.name, amount)
        }
        SkillKind::DivineShield => {
            let attach = target.attach_effect(Effect::shield(20, 2));
            format!(
                "{} blesses {} with a divine shield! {}",
                user.name, target.name, attach
            )
        }
        SkillKind::TailSwipe => {
            let damage = user.attributes.strength() * 2 + dice.roll(5, 10);
            target.take_damage(damage);
            let mut line = format!(
                "{} lashes {} with its tail for {} damage!",
                user.name, target.name, damage
            );
            if dice.chance(0.25) {
                let attach = target.attach_effect(Effect::stun());
                line.push(' ');
                line.push_str(&attach);
            }
            line
        }
        // Whole-side waves and the summoning ritual have their own entry
        // points below; a single-target dispatch of them is a caller bug.
        SkillKind::DragonBreath
        | SkillKind::WingBuffet
        | SkillKind::FearRoar
        | SkillKind::SummonMinions
        | SkillKind::MeteorShower
        | SkillKind::Earthquake => return Err(TurnFault::InvalidTarget),
    };
    Ok(line)
}

// ============================================================================
// Boss resolution
// ============================================================================

/// The boss's untyped fallback attack. Costs nothing and never fails.
pub fn boss_basic_attack(boss: &Actor, target: &mut Actor, dice: &mut dyn Dice) -> String {
    let damage = boss.attributes.strength() + dice.roll(5, 12);
    target.take_damage(damage);
    format!(
        "{} savagely attacks {} for {} damage!",
        boss.name, target.name, damage
    )
}

/// Resolve one of the boss's whole-party skills against every living member.
pub fn resolve_boss_wave(
    kind: SkillKind,
    boss: &Actor,
    party: &mut [Actor],
    dice: &mut dyn Dice,
) -> Result<String, TurnFault> {
    ensure_affordable(boss, kind)?;

    let mut notes = Vec::new();
    for member in party.iter_mut().filter(|m| m.is_alive()) {
        let note = match kind {
            SkillKind::DragonBreath => {
                let damage = boss.attributes.intellect() + dice.roll(15, 25);
                member.take_damage(damage);
                if dice.chance(0.6) {
                    member.attach_effect(Effect::poison(8, 3));
                    format!("{} takes {} breath damage and catches fire", member.name, damage)
                } else {
                    format!("{} takes {} breath damage", member.name, damage)
                }
            }
            SkillKind::WingBuffet => {
                let damage = boss.attributes.strength() / 2 + dice.roll(8, 15);
                member.take_damage(damage);
                if dice.chance(0.5) {
                    member.attributes.reduce(AttributeKind::Agility, 8);
                    format!("{} is thrown back for {} damage and staggered", member.name, damage)
                } else {
                    format!("{} is thrown back for {} damage", member.name, damage)
                }
            }
            SkillKind::FearRoar => {
                member.attributes.reduce(AttributeKind::Strength, 5);
                member.attributes.reduce(AttributeKind::Intellect, 5);
                member.attributes.reduce(AttributeKind::Agility, 3);
                format!("{} is shaken", member.name)
            }
            SkillKind::MeteorShower => {
                let damage = boss.attributes.intellect() * 2 + dice.roll(20, 35);
                member.take_damage(damage);
                if dice.chance(0.4) {
                    member.attach_effect(Effect::stun());
                    format!("{} takes {} meteor damage and is stunned", member.name, damage)
                } else {
                    format!("{} takes {} meteor damage", member.name, damage)
                }
            }
            SkillKind::Earthquake => {
                let damage = boss.attributes.strength() + dice.roll(10, 20);
                member.take_damage(damage);
                member.attributes.reduce(AttributeKind::Strength, 4);
                member.attributes.reduce(AttributeKind::Intellect, 4);
                member.attributes.reduce(AttributeKind::Agility, 6);
                format!("{} takes {} damage and is weakened", member.name, damage)
            }
            _ => return Err(TurnFault::InvalidTarget),
        };
        notes.push(note);
    }

    let notes = notes.join(". ");
    let line = match kind {
        SkillKind::DragonBreath => format!("{} belches a torrent of flame! {}", boss.name, notes),
        SkillKind::WingBuffet => format!("{} beats its wings! {}", boss.name, notes),
        SkillKind::FearRoar => format!(
            "{} lets out a terrifying roar! {}. Their attributes wither!",
            boss.name, notes
        ),
        SkillKind::MeteorShower => {
            format!("{} calls down a meteor shower! {}", boss.name, notes)
        }
        SkillKind::Earthquake => format!("{} splits the earth! {}", boss.name, notes),
        _ => return Err(TurnFault::InvalidTarget),
    };
    Ok(line)
}

/// Resolve the boss's summoning ritual, replacing any surviving helper pack.
pub fn resolve_summon(boss: &mut Actor, dice: &mut dyn Dice) -> Result<String, TurnFault> {
    ensure_affordable(boss, SkillKind::SummonMinions)?;
    let count = dice.roll(2, 4) as usize;
    boss.summon_minions(count);
    Ok(format!(
        "{} summons {} minions! They will join the assault next round.",
        boss.name, count
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ClassKind;
    use crate::env::testing::ScriptedDice;

    fn warrior() -> Actor {
        Actor::new("Borin", ClassKind::Warrior, 5)
    }

    fn mage() -> Actor {
        Actor::new("Sable", ClassKind::Mage, 5)
    }

    fn boss() -> Actor {
        Actor::new("Urlog", ClassKind::Boss, 8)
    }

    #[test]
    fn display_names_are_human_readable() {
        assert_eq!(SkillKind::SwingSword.to_string(), "Swing Sword");
        assert_eq!(SkillKind::DivineShield.to_string(), "Divine Shield");
        assert_eq!(SkillKind::DragonBreath.to_string(), "Dragon Breath");
    }

    #[test]
    fn unaffordable_skill_leaves_everything_untouched() {
        let mut user = mage();
        user.mana.spend(user.mana.max() - 5);
        let mut target = boss();
        let mut dice = ScriptedDice::new();

        let result = resolve_single(SkillKind::Fireball, &user, &mut target, &mut dice);
        assert_eq!(
            result,
            Err(TurnFault::InsufficientMana {
                skill: SkillKind::Fireball
            })
        );
        assert_eq!(user.mana.current(), 5);
        assert_eq!(target.health.current(), target.health.max());
        assert!(!user.is_on_cooldown(SkillKind::Fireball));
    }

    #[test]
    fn offensive_skill_refuses_a_dead_target() {
        let user = warrior();
        let mut target = boss();
        target.health.damage(target.health.max());
        let mut dice = ScriptedDice::new();

        let result = resolve_single(SkillKind::SwingSword, &user, &mut target, &mut dice);
        assert_eq!(result, Err(TurnFault::InvalidTarget));
    }

    #[test]
    fn swing_sword_crits_through_the_warrior_profile() {
        let user = warrior();
        let mut target = boss();
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(5);
        dice.chances.push_back(true);

        let line = resolve_single(SkillKind::SwingSword, &user, &mut target, &mut dice).unwrap();
        // (19 strength + 5) * 1.5 = 36
        assert!(line.contains("critical sword blow"));
        assert!(line.contains("36 damage"));
        assert_eq!(target.health.current(), target.health.max() - 36);
    }

    #[test]
    fn fireball_can_ignite_a_lingering_poison() {
        let user = mage();
        let mut target = boss();
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(7);
        dice.chances.push_back(true);

        let line = resolve_single(SkillKind::Fireball, &user, &mut target, &mut dice).unwrap();
        assert!(line.contains("hurls a fireball"));
        assert!(line.contains("is poisoned!"));
        assert_eq!(target.effects().len(), 1);
    }

    #[test]
    fn arcane_missiles_land_three_identical_hits() {
        let user = mage();
        let mut target = boss();
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(4);

        let line = resolve_single(SkillKind::ArcaneMissile, &user, &mut target, &mut dice).unwrap();
        // 21 intellect + 4 per missile, three missiles.
        assert!(line.contains("75 total damage"));
        assert_eq!(target.health.current(), target.health.max() - 75);
    }

    #[test]
    fn heal_accepts_a_downed_check_free_target_and_clamps() {
        let user = Actor::new("Mira", ClassKind::Healer, 5);
        let mut target = warrior();
        target.health.damage(10);
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(12);

        let line = resolve_single(SkillKind::Heal, &user, &mut target, &mut dice).unwrap();
        assert!(line.contains("heals Borin"));
        assert_eq!(target.health.current(), target.health.max());
    }

    #[test]
    fn dragon_breath_sweeps_only_the_living() {
        let boss = boss();
        let mut party = vec![warrior(), mage()];
        party[1].health.damage(10_000);
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(20);
        dice.chances.push_back(false);

        let line = resolve_boss_wave(SkillKind::DragonBreath, &boss, &mut party, &mut dice).unwrap();
        assert!(line.contains("Borin takes"));
        assert!(!line.contains("Sable"));
        assert_eq!(party[1].health.current(), 0);
    }

    #[test]
    fn fear_roar_withers_attributes_without_damage() {
        let boss = boss();
        let mut party = vec![warrior()];
        let before = party[0].attributes;
        let mut dice = ScriptedDice::new();

        let line = resolve_boss_wave(SkillKind::FearRoar, &boss, &mut party, &mut dice).unwrap();
        assert!(line.contains("Their attributes wither!"));
        assert_eq!(party[0].health.current(), party[0].health.max());
        assert_eq!(party[0].attributes.strength(), before.strength() - 5);
        assert_eq!(party[0].attributes.agility(), before.agility() - 3);
    }

    #[test]
    fn summoning_replaces_the_helper_pack() {
        let mut boss = boss();
        boss.summon_minions(2);
        let mut dice = ScriptedDice::new();
        dice.rolls.push_back(4);

        let line = resolve_summon(&mut boss, &mut dice).unwrap();
        assert!(line.contains("summons 4 minions"));
        assert_eq!(boss.minions().len(), 4);
    }
}
