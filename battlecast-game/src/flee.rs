//! Flee preview: repeated escape attempts, each failure answered by a beast strike.
use serde::{Deserialize, Serialize};

use crate::battle::beast_crit_chance;
use crate::config::{FleeShortcut, PreviewConfig};
use crate::engine::{Step, Terminal, TurnModel, TurnSummary, counter_attack, simulate};
use crate::error::{PreviewError, ensure_probability};
use crate::grouping::{DamageGroup, group_armor_damage};
use crate::model::{Adventurer, Beast};
use crate::report::AggregateResult;
use crate::rules::CombatRules;

/// Remaining adventurer health while fleeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FleeState {
    pub adventurer_health: u32,
}

/// Per-attempt flee chance in percent: dexterity over level, capped at 100.
#[must_use]
pub fn flee_chance_percent<R>(rules: &R, adventurer: &Adventurer) -> f64
where
    R: CombatRules + ?Sized,
{
    let level = rules.level_from_xp(adventurer.xp).max(1);
    let percent = f64::from(adventurer.stats.dexterity) / f64::from(level) * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Inputs for the flee engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleeSetup {
    pub adventurer_health: u32,
    pub flee_chance_percent: f64,
    pub beast_crit_chance: f64,
    pub groups: Vec<DamageGroup>,
    pub equipment_changed: bool,
}

impl FleeSetup {
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
        Self {
            adventurer_health: adventurer.health,
            flee_chance_percent: flee_chance_percent(rules, adventurer),
            beast_crit_chance: beast_crit_chance(rules.level_from_xp(adventurer.xp)),
            groups: group_armor_damage(rules, adventurer, beast),
            equipment_changed,
        }
    }

    fn escape_chance(&self) -> f64 {
        self.flee_chance_percent / 100.0
    }
}

/// How the escape odds read before any simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeOutlook {
    Guaranteed,
    Impossible,
    Uncertain,
}

impl EscapeOutlook {
    #[must_use]
    pub fn of_chance(flee_chance_percent: f64) -> Self {
        if flee_chance_percent >= 100.0 {
            Self::Guaranteed
        } else if flee_chance_percent <= 0.0 {
            Self::Impossible
        } else {
            Self::Uncertain
        }
    }
}

struct FleeModel<'a> {
    setup: &'a FleeSetup,
    shortcut: &'a FleeShortcut,
}

impl TurnModel for FleeModel<'_> {
    type State = FleeState;

    fn initial_state(&self) -> FleeState {
        FleeState {
            adventurer_health: self.setup.adventurer_health,
        }
    }

    fn terminal(&self, state: &FleeState) -> Option<Terminal> {
        (state.adventurer_health == 0).then_some(Terminal::Failure)
    }

    fn expand(&self, turn: u32, state: FleeState, mass: f64, step: &mut Step<'_, FleeState>) {
        let escape = if self.setup.equipment_changed && turn == 1 {
            0.0
        } else {
            self.setup.escape_chance()
        };
        let escaped = mass * escape;
        if escaped > 0.0 {
            let damage_taken = self
                .setup
                .adventurer_health
                .saturating_sub(state.adventurer_health);
            step.succeed(escaped, damage_taken, turn);
        }
        let caught = mass * (1.0 - escape);
        if caught > 0.0 {
            counter_attack(
                step,
                &self.setup.groups,
                self.setup.beast_crit_chance,
                state.adventurer_health,
                caught,
                |adventurer_health| FleeState { adventurer_health },
            );
        }
    }

    fn settles_early(&self, turn: u32, live_mass: f64) -> bool {
        self.setup.flee_chance_percent >= self.shortcut.min_chance
            && turn >= self.shortcut.min_turn
            && live_mass < self.shortcut.remaining_mass
    }
}

/// Escape statistics plus the per-turn trace, when the engine ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleeRun {
    pub outlook: EscapeOutlook,
    pub result: AggregateResult,
    pub trace: Vec<TurnSummary>,
}

/// Run the flee engine, short-circuiting certain and impossible escapes.
///
/// # Errors
///
/// Returns an error if the setup carries an out-of-range chance.
pub fn run_flee(setup: &FleeSetup, config: &PreviewConfig) -> Result<FleeRun, PreviewError> {
    ensure_probability("flee_chance", setup.escape_chance())?;
    ensure_probability("beast_crit_chance", setup.beast_crit_chance)?;
    for group in &setup.groups {
        ensure_probability("damage_group.probability", group.probability)?;
    }

    let outlook = EscapeOutlook::of_chance(setup.flee_chance_percent);
    let (result, trace) = match outlook {
        EscapeOutlook::Guaranteed => {
            log::debug!("flee chance is certain; skipping simulation");
            (AggregateResult::certain_success(), Vec::new())
        }
        EscapeOutlook::Impossible => {
            log::debug!("flee chance is zero; skipping simulation");
            (AggregateResult::certain_failure(), Vec::new())
        }
        EscapeOutlook::Uncertain => {
            let model = FleeModel {
                setup,
                shortcut: &config.flee_shortcut,
            };
            let outcome = simulate(&model, config);
            (AggregateResult::from(&outcome), outcome.trace)
        }
    };
    Ok(FleeRun {
        outlook,
        result,
        trace,
    })
}

/// Full flee preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleeReport {
    pub flee_chance_percent: f64,
    pub outlook: EscapeOutlook,
    pub result: AggregateResult,
    pub damage_groups: Vec<DamageGroup>,
    pub equipment_changed: bool,
    pub trace: Vec<TurnSummary>,
}

/// Preview trying to flee from `beast` until escape or death.
///
/// # Errors
///
/// Returns [`PreviewError::NoExperience`] for an adventurer with no XP, or a
/// probability error if the rules produce out-of-range chances.
pub fn analyze_flee<R>(
    rules: &R,
    adventurer: &Adventurer,
    beast: &Beast,
    equipment_changed: bool,
    config: &PreviewConfig,
) -> Result<FleeReport, PreviewError>
where
    R: CombatRules + ?Sized,
{
    if adventurer.xp == 0 {
        return Err(PreviewError::NoExperience);
    }
    let setup = FleeSetup::from_combatants(rules, adventurer, beast, equipment_changed);
    let run = run_flee(&setup, config)?;
    log::debug!(
        "flee preview: chance {:.1}%, escape {:.4}, death {:.4}",
        setup.flee_chance_percent,
        run.result.success_probability,
        run.result.death_probability
    );
    Ok(FleeReport {
        flee_chance_percent: setup.flee_chance_percent,
        outlook: run.outlook,
        result: run.result,
        damage_groups: setup.groups,
        equipment_changed,
        trace: run.trace,
    })
}
