//! Entry point: hypothetical adventurer assembly plus the analyses that consume it.
use serde::{Deserialize, Serialize};

use crate::battle::{BattleReport, analyze_battle};
use crate::config::PreviewConfig;
use crate::constants::{HEALTH_PER_VITALITY, POTION_HEALTH, STARTING_HEALTH};
use crate::error::PreviewError;
use crate::flee::{FleeReport, analyze_flee};
use crate::model::{Adventurer, Beast, Equipment, Item, Slot, Stats};
use crate::report::RiskResult;
use crate::risk::{EncounterKind, ExplorationReport, analyze_encounter, analyze_exploration};
use crate::rules::{CombatRules, StandardRules};

/// Items the player is considering equipping, by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EquipmentDeltas {
    pub weapon: Option<Item>,
    pub chest: Option<Item>,
    pub head: Option<Item>,
    pub waist: Option<Item>,
    pub foot: Option<Item>,
    pub hand: Option<Item>,
    pub neck: Option<Item>,
    pub ring: Option<Item>,
}

impl EquipmentDeltas {
    #[must_use]
    pub const fn get(&self, slot: Slot) -> Option<Item> {
        match slot {
            Slot::Weapon => self.weapon,
            Slot::Chest => self.chest,
            Slot::Head => self.head,
            Slot::Waist => self.waist,
            Slot::Foot => self.foot,
            Slot::Hand => self.hand,
            Slot::Neck => self.neck,
            Slot::Ring => self.ring,
        }
    }

    pub const fn set(&mut self, slot: Slot, item: Item) {
        match slot {
            Slot::Weapon => self.weapon = Some(item),
            Slot::Chest => self.chest = Some(item),
            Slot::Head => self.head = Some(item),
            Slot::Waist => self.waist = Some(item),
            Slot::Foot => self.foot = Some(item),
            Slot::Hand => self.hand = Some(item),
            Slot::Neck => self.neck = Some(item),
            Slot::Ring => self.ring = Some(item),
        }
    }

    /// `equipment` with every proposed item swapped in.
    #[must_use]
    pub fn apply(&self, equipment: &Equipment) -> Equipment {
        let mut next = *equipment;
        for slot in Slot::ALL {
            if let Some(item) = self.get(slot) {
                next.set(slot, item);
            }
        }
        next
    }
}

/// The committed adventurer plus the changes the player is weighing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreviewInput {
    pub base_adventurer: Adventurer,
    #[serde(default)]
    pub stat_deltas: Stats,
    #[serde(default)]
    pub equipment_deltas: EquipmentDeltas,
    #[serde(default)]
    pub potion_count: u32,
}

impl PreviewInput {
    #[must_use]
    pub fn new(base_adventurer: Adventurer) -> Self {
        Self {
            base_adventurer,
            ..Self::default()
        }
    }

    /// The adventurer as they would stand after potions, stat points and gear swaps.
    ///
    /// Health gains are capped by the maximum the new vitality allows.
    #[must_use]
    pub fn hypothetical(&self) -> Adventurer {
        let base = &self.base_adventurer;
        let stats = base.stats + self.stat_deltas;
        let vitality_gain = u32::from(self.stat_deltas.vitality).saturating_mul(HEALTH_PER_VITALITY);
        let potion_gain = self.potion_count.saturating_mul(POTION_HEALTH);
        let max_health = STARTING_HEALTH
            .saturating_add(u32::from(stats.vitality).saturating_mul(HEALTH_PER_VITALITY));
        let health = base
            .health
            .saturating_add(potion_gain)
            .saturating_add(vitality_gain)
            .min(max_health);

        Adventurer {
            health,
            stats,
            equipment: self.equipment_deltas.apply(&base.equipment),
            ..base.clone()
        }
    }

    /// Slots whose proposed item differs from the committed one.
    #[must_use]
    pub fn changed_slots(&self) -> Vec<Slot> {
        self.equipment_deltas
            .apply(&self.base_adventurer.equipment)
            .changed_slots(&self.base_adventurer.equipment)
    }

    #[must_use]
    pub fn has_equipment_change(&self) -> bool {
        !self.changed_slots().is_empty()
    }
}

/// Runs previews against one ruleset and configuration.
#[derive(Debug, Clone)]
pub struct Preview<R = StandardRules> {
    rules: R,
    config: PreviewConfig,
}

impl Preview<StandardRules> {
    /// Stock rules with default thresholds.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: StandardRules,
            config: PreviewConfig::default(),
        }
    }
}

impl<R: CombatRules> Preview<R> {
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(rules: R, config: PreviewConfig) -> Result<Self, PreviewError> {
        config.validate()?;
        Ok(Self { rules, config })
    }

    pub const fn rules(&self) -> &R {
        &self.rules
    }

    pub const fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// # Errors
    ///
    /// See [`analyze_battle`].
    pub fn battle(&self, input: &PreviewInput, beast: &Beast) -> Result<BattleReport, PreviewError> {
        analyze_battle(
            &self.rules,
            &input.hypothetical(),
            beast,
            input.has_equipment_change(),
            &self.config,
        )
    }

    /// # Errors
    ///
    /// See [`analyze_flee`].
    pub fn flee(&self, input: &PreviewInput, beast: &Beast) -> Result<FleeReport, PreviewError> {
        analyze_flee(
            &self.rules,
            &input.hypothetical(),
            beast,
            input.has_equipment_change(),
            &self.config,
        )
    }

    /// # Errors
    ///
    /// See [`analyze_encounter`].
    pub fn encounter(
        &self,
        input: &PreviewInput,
        kind: EncounterKind,
    ) -> Result<RiskResult, PreviewError> {
        analyze_encounter(&self.rules, &input.hypothetical(), kind, &self.config)
    }

    /// # Errors
    ///
    /// See [`analyze_encounter`].
    pub fn ambush(&self, input: &PreviewInput) -> Result<RiskResult, PreviewError> {
        self.encounter(input, EncounterKind::Ambush)
    }

    /// # Errors
    ///
    /// See [`analyze_encounter`].
    pub fn obstacle(&self, input: &PreviewInput) -> Result<RiskResult, PreviewError> {
        self.encounter(input, EncounterKind::Obstacle)
    }

    /// # Errors
    ///
    /// See [`analyze_exploration`].
    pub fn exploration(&self, input: &PreviewInput) -> Result<ExplorationReport, PreviewError> {
        analyze_exploration(&self.rules, &input.hypothetical(), &self.config)
    }
}
