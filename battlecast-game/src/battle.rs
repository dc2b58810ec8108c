//! Battle preview: adventurer attacks, beast counter-attacks, until one falls.
use serde::{Deserialize, Serialize};

use crate::config::{BattleShortcut, PreviewConfig};
use crate::constants::{GOLD_REWARD_DIVISOR, GOLD_RING_BONUS_PER_LEVEL, GOLD_RING_ID, MAX_CRIT_LUCK};
use crate::engine::{
    SimulationOutcome, Step, Terminal, TurnModel, TurnSummary, counter_attack, simulate,
};
use crate::error::{PreviewError, ensure_probability};
use crate::grouping::{DamageGroup, group_armor_damage};
use crate::model::{Adventurer, Beast};
use crate::numbers::{clamp_unit, floor_f64_to_u32};
use crate::report::AggregateResult;
use crate::rules::{CombatRules, DamagePair};

/// Remaining health on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BattleState {
    pub adventurer_health: u32,
    pub beast_health: u32,
}

/// Everything the battle engine needs, resolved from the combatants up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    pub adventurer_health: u32,
    pub beast_health: u32,
    /// The beast's undamaged health, which scales the early-stop shortcut.
    pub full_beast_health: u32,
    pub attack: DamagePair,
    pub adventurer_crit_chance: f64,
    pub beast_crit_chance: f64,
    pub groups: Vec<DamageGroup>,
    /// Swapping gear costs the adventurer the first attack.
    pub equipment_changed: bool,
}

impl BattleSetup {
    /// Resolve damage, crit chances and armor groups for `adventurer` against `beast`.
    ///
    /// A fight already underway resumes from the adventurer's recorded beast health.
    #[must_use]
    pub fn from_combatants<R>(
        rules: &R,
        adventurer: &Adventurer,
        beast: &Beast,
        equipment_changed: bool,
    ) -> Self
    where
        R: CombatRules + ?Sized,
    {
        let level = rules.level_from_xp(adventurer.xp);
        let beast_health = if adventurer.beast_health > 0 {
            adventurer.beast_health
        } else {
            beast.health
        };
        Self {
            adventurer_health: adventurer.health,
            beast_health,
            full_beast_health: beast.health,
            attack: rules.attack_damage(&adventurer.equipment.weapon, adventurer, beast),
            adventurer_crit_chance: adventurer_crit_chance(adventurer),
            beast_crit_chance: beast_crit_chance(level),
            groups: group_armor_damage(rules, adventurer, beast),
            equipment_changed,
        }
    }

    /// # Errors
    ///
    /// Returns an error if a crit chance or group probability is not a probability.
    pub fn validate(&self) -> Result<(), PreviewError> {
        ensure_probability("adventurer_crit_chance", self.adventurer_crit_chance)?;
        ensure_probability("beast_crit_chance", self.beast_crit_chance)?;
        for group in &self.groups {
            ensure_probability("damage_group.probability", group.probability)?;
        }
        Ok(())
    }
}

/// Luck converts one-for-one into crit percent, capped at 100.
#[must_use]
pub fn adventurer_crit_chance(adventurer: &Adventurer) -> f64 {
    f64::from(adventurer.stats.luck.min(MAX_CRIT_LUCK)) / 100.0
}

/// Beasts crit more often against higher-level adventurers.
#[must_use]
pub fn beast_crit_chance(adventurer_level: u16) -> f64 {
    clamp_unit(f64::from(adventurer_level) / 100.0)
}

struct BattleModel<'a> {
    setup: &'a BattleSetup,
    shortcut: &'a BattleShortcut,
}

impl BattleModel<'_> {
    fn attack_for_turn(&self, turn: u32) -> DamagePair {
        if self.setup.equipment_changed && turn == 1 {
            DamagePair::ZERO
        } else {
            self.setup.attack
        }
    }

    fn damage_taken(&self, state: &BattleState) -> u32 {
        self.setup
            .adventurer_health
            .saturating_sub(state.adventurer_health)
    }
}

impl TurnModel for BattleModel<'_> {
    type State = BattleState;

    fn initial_state(&self) -> BattleState {
        BattleState {
            adventurer_health: self.setup.adventurer_health,
            beast_health: self.setup.beast_health,
        }
    }

    fn terminal(&self, state: &BattleState) -> Option<Terminal> {
        if state.beast_health == 0 {
            Some(Terminal::Success {
                damage_taken: self.damage_taken(state),
            })
        } else if state.adventurer_health == 0 {
            Some(Terminal::Failure)
        } else {
            None
        }
    }

    fn expand(&self, turn: u32, state: BattleState, mass: f64, step: &mut Step<'_, BattleState>) {
        let attack = self.attack_for_turn(turn);
        let crit = self.setup.adventurer_crit_chance;
        for (chance, damage) in [(1.0 - crit, attack.normal), (crit, attack.critical)] {
            let branch = mass * chance;
            if branch <= 0.0 {
                continue;
            }
            let beast_health = state.beast_health.saturating_sub(damage);
            if beast_health == 0 {
                step.succeed(branch, self.damage_taken(&state), turn);
                continue;
            }
            counter_attack(
                step,
                &self.setup.groups,
                self.setup.beast_crit_chance,
                state.adventurer_health,
                branch,
                |adventurer_health| BattleState {
                    adventurer_health,
                    beast_health,
                },
            );
        }
    }

    fn settles_early(&self, turn: u32, live_mass: f64) -> bool {
        let hit = u64::from(self.setup.attack.normal) * u64::from(self.shortcut.health_divisor);
        hit >= u64::from(self.setup.full_beast_health)
            && turn >= self.shortcut.min_turn
            && live_mass < self.shortcut.remaining_mass
    }
}

/// Run the battle engine for a resolved setup.
///
/// # Errors
///
/// Returns an error if the setup carries an out-of-range probability.
pub fn run_battle(
    setup: &BattleSetup,
    config: &PreviewConfig,
) -> Result<SimulationOutcome, PreviewError> {
    setup.validate()?;
    let model = BattleModel {
        setup,
        shortcut: &config.battle_shortcut,
    };
    Ok(simulate(&model, config))
}

/// What winning the fight would pay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRewards {
    pub xp: u32,
    pub levels_up: bool,
    /// Level after collecting the XP (unchanged when no level up).
    pub new_level: u16,
    pub gold: u32,
}

#[must_use]
pub fn battle_rewards<R>(rules: &R, adventurer: &Adventurer, beast: &Beast) -> BattleRewards
where
    R: CombatRules + ?Sized,
{
    let level = rules.level_from_xp(adventurer.xp);
    let xp = rules.xp_reward(beast.level, beast.tier, level);
    let total_xp = adventurer.xp.saturating_add(xp);
    let levels_up = total_xp >= rules.next_level_xp(level);
    let new_level = if levels_up {
        rules.level_from_xp(total_xp)
    } else {
        level
    };

    let base_gold = beast.power() / GOLD_REWARD_DIVISOR;
    let ring = &adventurer.equipment.ring;
    let gold = if ring.id == GOLD_RING_ID {
        let ring_level = f64::from(rules.level_from_xp(ring.xp));
        let bonus = f64::from(base_gold) * GOLD_RING_BONUS_PER_LEVEL * ring_level;
        floor_f64_to_u32(f64::from(base_gold) + bonus)
    } else {
        base_gold
    };

    BattleRewards {
        xp,
        levels_up,
        new_level,
        gold,
    }
}

/// Full battle preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub result: AggregateResult,
    pub rewards: BattleRewards,
    pub attack: DamagePair,
    pub damage_groups: Vec<DamageGroup>,
    pub starting_beast_health: u32,
    /// The fight is already underway and the beast is wounded.
    pub from_current_state: bool,
    pub equipment_changed: bool,
    pub trace: Vec<TurnSummary>,
}

/// Preview fighting `beast` to the end.
///
/// # Errors
///
/// Returns [`PreviewError::NoExperience`] for an adventurer with no XP, or a
/// probability error if the rules produce out-of-range chances.
pub fn analyze_battle<R>(
    rules: &R,
    adventurer: &Adventurer,
    beast: &Beast,
    equipment_changed: bool,
    config: &PreviewConfig,
) -> Result<BattleReport, PreviewError>
where
    R: CombatRules + ?Sized,
{
    if adventurer.xp == 0 {
        return Err(PreviewError::NoExperience);
    }
    let setup = BattleSetup::from_combatants(rules, adventurer, beast, equipment_changed);
    let outcome = run_battle(&setup, config)?;
    let result = AggregateResult::from(&outcome);
    log::debug!(
        "battle preview: survival {:.4}, death {:.4} over {} turns",
        result.success_probability,
        result.death_probability,
        result.turns_simulated
    );

    Ok(BattleReport {
        rewards: battle_rewards(rules, adventurer, beast),
        attack: setup.attack,
        from_current_state: adventurer.beast_health > 0 && adventurer.beast_health < beast.health,
        starting_beast_health: setup.beast_health,
        damage_groups: setup.groups,
        equipment_changed,
        trace: outcome.trace,
        result,
    })
}
