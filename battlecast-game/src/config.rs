//! Tunable thresholds for the preview engine.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BATTLE_SHORTCUT_HEALTH_DIVISOR, DEFAULT_BATTLE_SHORTCUT_MIN_TURN,
    DEFAULT_BATTLE_SHORTCUT_REMAINING_MASS, DEFAULT_ENCOUNTER_PROBABILITY,
    DEFAULT_FLEE_SHORTCUT_MIN_CHANCE, DEFAULT_FLEE_SHORTCUT_MIN_TURN,
    DEFAULT_FLEE_SHORTCUT_REMAINING_MASS, DEFAULT_MAX_TURNS, DEFAULT_NEGLIGIBLE_MASS,
    DEFAULT_RESOLUTION_THRESHOLD, MAX_TURNS_CEILING,
};
use crate::error::{PreviewError, ensure_probability};

/// Engine limits and early-termination thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "PreviewConfig::default_max_turns")]
    pub max_turns: u32,
    /// Live mass below which the remaining tail is abandoned.
    #[serde(default = "PreviewConfig::default_negligible_mass")]
    pub negligible_mass: f64,
    /// Resolved mass above which the run stops.
    #[serde(default = "PreviewConfig::default_resolution_threshold")]
    pub resolution_threshold: f64,
    #[serde(default)]
    pub battle_shortcut: BattleShortcut,
    #[serde(default)]
    pub flee_shortcut: FleeShortcut,
    /// Chance that an exploration step meets a beast or obstacle at all.
    #[serde(default = "PreviewConfig::default_encounter_probability")]
    pub encounter_probability: f64,
}

impl PreviewConfig {
    const fn default_max_turns() -> u32 {
        DEFAULT_MAX_TURNS
    }

    const fn default_negligible_mass() -> f64 {
        DEFAULT_NEGLIGIBLE_MASS
    }

    const fn default_resolution_threshold() -> f64 {
        DEFAULT_RESOLUTION_THRESHOLD
    }

    const fn default_encounter_probability() -> f64 {
        DEFAULT_ENCOUNTER_PROBABILITY
    }

    /// Parse a JSON document, filling omitted fields with defaults, and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a threshold is out of range.
    pub fn from_json(json: &str) -> Result<Self, PreviewError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| PreviewError::ConfigParse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every threshold against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.max_turns == 0 || self.max_turns > MAX_TURNS_CEILING {
            return Err(PreviewError::RangeViolation {
                field: "max_turns",
                min: 1.0,
                max: f64::from(MAX_TURNS_CEILING),
                value: f64::from(self.max_turns),
            });
        }
        ensure_probability("negligible_mass", self.negligible_mass)?;
        ensure_probability("resolution_threshold", self.resolution_threshold)?;
        ensure_probability("encounter_probability", self.encounter_probability)?;
        self.battle_shortcut.validate()?;
        self.flee_shortcut.validate()?;
        Ok(())
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_turns: Self::default_max_turns(),
            negligible_mass: Self::default_negligible_mass(),
            resolution_threshold: Self::default_resolution_threshold(),
            battle_shortcut: BattleShortcut::default(),
            flee_shortcut: FleeShortcut::default(),
            encounter_probability: Self::default_encounter_probability(),
        }
    }
}

/// Stop a battle early once a strong attacker has left only a sliver of mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleShortcut {
    #[serde(default = "BattleShortcut::default_min_turn")]
    pub min_turn: u32,
    /// Applies when one normal hit removes at least `1 / health_divisor` of the beast.
    #[serde(default = "BattleShortcut::default_health_divisor")]
    pub health_divisor: u32,
    #[serde(default = "BattleShortcut::default_remaining_mass")]
    pub remaining_mass: f64,
}

impl BattleShortcut {
    const fn default_min_turn() -> u32 {
        DEFAULT_BATTLE_SHORTCUT_MIN_TURN
    }

    const fn default_health_divisor() -> u32 {
        DEFAULT_BATTLE_SHORTCUT_HEALTH_DIVISOR
    }

    const fn default_remaining_mass() -> f64 {
        DEFAULT_BATTLE_SHORTCUT_REMAINING_MASS
    }

    fn validate(&self) -> Result<(), PreviewError> {
        if self.health_divisor == 0 {
            return Err(PreviewError::MinViolation {
                field: "battle_shortcut.health_divisor",
                min: 1.0,
                value: 0.0,
            });
        }
        ensure_probability("battle_shortcut.remaining_mass", self.remaining_mass)?;
        Ok(())
    }
}

impl Default for BattleShortcut {
    fn default() -> Self {
        Self {
            min_turn: Self::default_min_turn(),
            health_divisor: Self::default_health_divisor(),
            remaining_mass: Self::default_remaining_mass(),
        }
    }
}

/// Stop a flee run early when escape is highly likely each attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleeShortcut {
    /// Minimum per-attempt flee chance, in percent.
    #[serde(default = "FleeShortcut::default_min_chance")]
    pub min_chance: f64,
    #[serde(default = "FleeShortcut::default_min_turn")]
    pub min_turn: u32,
    #[serde(default = "FleeShortcut::default_remaining_mass")]
    pub remaining_mass: f64,
}

impl FleeShortcut {
    const fn default_min_chance() -> f64 {
        DEFAULT_FLEE_SHORTCUT_MIN_CHANCE
    }

    const fn default_min_turn() -> u32 {
        DEFAULT_FLEE_SHORTCUT_MIN_TURN
    }

    const fn default_remaining_mass() -> f64 {
        DEFAULT_FLEE_SHORTCUT_REMAINING_MASS
    }

    fn validate(&self) -> Result<(), PreviewError> {
        if !(0.0..=100.0).contains(&self.min_chance) {
            return Err(PreviewError::RangeViolation {
                field: "flee_shortcut.min_chance",
                min: 0.0,
                max: 100.0,
                value: self.min_chance,
            });
        }
        ensure_probability("flee_shortcut.remaining_mass", self.remaining_mass)?;
        Ok(())
    }
}

impl Default for FleeShortcut {
    fn default() -> Self {
        Self {
            min_chance: Self::default_min_chance(),
            min_turn: Self::default_min_turn(),
            remaining_mass: Self::default_remaining_mass(),
        }
    }
}
