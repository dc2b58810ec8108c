//! Conversion of raw accumulated mass into reported statistics.
use serde::{Deserialize, Serialize};

use crate::engine::SimulationOutcome;
use crate::numbers::{as_percent, ratio_or_zero, round_f64_to_u32};

/// Final statistics for a battle or flee preview.
///
/// "Success" means winning the battle or escaping the beast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub success_probability: f64,
    pub death_probability: f64,
    /// Average health lost across successful outcomes.
    pub average_damage_on_success: f64,
    /// Average turns (attacks or flee attempts) across successful outcomes.
    pub average_turns_to_success: f64,
    pub hit_iteration_cap: bool,
    pub turns_simulated: u32,
    /// Mass still live when the run stopped; already counted in `death_probability`.
    pub unresolved_mass: f64,
}

impl AggregateResult {
    /// Result for an outcome that is certain to succeed on the first turn.
    #[must_use]
    pub const fn certain_success() -> Self {
        Self {
            success_probability: 1.0,
            death_probability: 0.0,
            average_damage_on_success: 0.0,
            average_turns_to_success: 1.0,
            hit_iteration_cap: false,
            turns_simulated: 0,
            unresolved_mass: 0.0,
        }
    }

    /// Result for an outcome that can never succeed.
    #[must_use]
    pub const fn certain_failure() -> Self {
        Self {
            success_probability: 0.0,
            death_probability: 1.0,
            average_damage_on_success: 0.0,
            average_turns_to_success: 0.0,
            hit_iteration_cap: false,
            turns_simulated: 0,
            unresolved_mass: 0.0,
        }
    }

    #[must_use]
    pub fn success_percent(&self) -> f64 {
        as_percent(self.success_probability)
    }

    #[must_use]
    pub fn death_percent(&self) -> f64 {
        as_percent(self.death_probability)
    }
}

impl From<&SimulationOutcome> for AggregateResult {
    fn from(outcome: &SimulationOutcome) -> Self {
        let ledger = &outcome.ledger;
        Self {
            success_probability: ledger.success_mass,
            death_probability: ledger.death_mass,
            average_damage_on_success: ratio_or_zero(ledger.damage_weighted, ledger.success_mass),
            average_turns_to_success: ratio_or_zero(ledger.turns_weighted, ledger.success_mass),
            hit_iteration_cap: outcome.hit_iteration_cap(),
            turns_simulated: outcome.turns_simulated,
            unresolved_mass: outcome.unresolved_mass,
        }
    }
}

/// Accumulated weights from the exploration enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskTally {
    /// Mass of scenarios where a single hit kills.
    pub death_weight: f64,
    /// Σ mass × damage over survivable scenarios.
    pub damage_weighted: f64,
    pub non_fatal_weight: f64,
}

impl RiskTally {
    pub fn record(&mut self, mass: f64, damage: u32, health: u32) {
        if damage >= health {
            self.death_weight += mass;
        } else {
            self.damage_weighted += mass * f64::from(damage);
            self.non_fatal_weight += mass;
        }
    }
}

/// Instant-death odds and typical damage for one exploration event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    /// Percent chance, per exploration step, of dying outright to this event.
    pub instant_death_probability: f64,
    pub average_non_fatal_damage: u32,
}

impl RiskResult {
    /// Scale a tally by the chance the event happens at all.
    ///
    /// `encounter_probability` is a fraction, `trigger_percent` a percentage.
    #[must_use]
    pub fn from_tally(tally: &RiskTally, encounter_probability: f64, trigger_percent: f64) -> Self {
        let death = encounter_probability * (trigger_percent / 100.0) * tally.death_weight;
        Self {
            instant_death_probability: as_percent(death),
            average_non_fatal_damage: round_f64_to_u32(ratio_or_zero(
                tally.damage_weighted,
                tally.non_fatal_weight,
            )),
        }
    }
}

/// Coarse reading of a rate, used to colour reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Favorable,
    Uncertain,
    Dire,
}

impl Outlook {
    /// Survival/escape chances: ≥ 80 % favorable, ≥ 50 % uncertain.
    #[must_use]
    pub fn of_success(probability: f64) -> Self {
        if probability >= 0.8 {
            Self::Favorable
        } else if probability >= 0.5 {
            Self::Uncertain
        } else {
            Self::Dire
        }
    }

    /// Death chances: ≥ 50 % dire, ≥ 20 % uncertain.
    #[must_use]
    pub fn of_death(probability: f64) -> Self {
        if probability >= 0.5 {
            Self::Dire
        } else if probability >= 0.2 {
            Self::Uncertain
        } else {
            Self::Favorable
        }
    }

    /// Flee death chances: ≥ 10 % dire, ≥ 5 % uncertain.
    #[must_use]
    pub fn of_flee_death(probability: f64) -> Self {
        if probability >= 0.1 {
            Self::Dire
        } else if probability >= 0.05 {
            Self::Uncertain
        } else {
            Self::Favorable
        }
    }

    /// Per-event instant-death percentages: > 10 dire, > 5 uncertain.
    #[must_use]
    pub fn of_event_risk(percent: f64) -> Self {
        if percent > 10.0 {
            Self::Dire
        } else if percent > 5.0 {
            Self::Uncertain
        } else {
            Self::Favorable
        }
    }

    /// Combined exploration percentages: > 20 dire, > 10 uncertain.
    #[must_use]
    pub fn of_cumulative_risk(percent: f64) -> Self {
        if percent > 20.0 {
            Self::Dire
        } else if percent > 10.0 {
            Self::Uncertain
        } else {
            Self::Favorable
        }
    }
}
