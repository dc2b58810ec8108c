//! Exploration risk: one-shot ambush and obstacle hits, enumerated exactly.
//!
//! Every beast level, type and tier the adventurer could meet is paired with
//! every armor slot it could strike; ambushes by named beasts also branch on
//! whether the beast's name matches the armor's specials. Each leaf then splits
//! on the crit roll and lands either in the instant-death weight or in the
//! non-fatal damage sums.
use serde::{Deserialize, Serialize};

use crate::config::PreviewConfig;
use crate::constants::{
    ARMOR_SLOT_COUNT, BEAST_SPECIAL_NAME_LEVEL_UNLOCK, BEAST_TIER_COUNT, DISCOVERY_GOLD_SHARE,
    DISCOVERY_HEALTH_SHARE, DISCOVERY_LOOT_SHARE, DISCOVERY_PROBABILITY,
    PREFIXES_UNLOCK_GREATNESS,
};
use crate::error::{PreviewError, ensure_probability};
use crate::model::{Adventurer, Beast, BeastType, Item, Slot};
use crate::numbers::{clamp_unit, usize_to_f64};
use crate::report::{RiskResult, RiskTally};
use crate::rules::{CombatRules, ItemSpecials};

/// Exploration events that strike once without a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    Ambush,
    Obstacle,
}

impl EncounterKind {
    pub const ALL: [Self; 2] = [Self::Ambush, Self::Obstacle];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ambush => "ambush",
            Self::Obstacle => "obstacle",
        }
    }

    /// The stat that lets the adventurer avoid this event.
    #[must_use]
    pub const fn avoidance_stat(self, adventurer: &Adventurer) -> u16 {
        match self {
            Self::Ambush => adventurer.stats.wisdom,
            Self::Obstacle => adventurer.stats.intelligence,
        }
    }

    /// Only beasts carry names, so only ambushes can match armor specials.
    #[must_use]
    pub const fn rolls_specials(self) -> bool {
        matches!(self, Self::Ambush)
    }
}

impl std::fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Extra encounter levels unlocked as the adventurer climbs brackets.
#[must_use]
pub const fn beast_level_bonus(adventurer_level: u16) -> u16 {
    match adventurer_level {
        50.. => 80,
        40..=49 => 40,
        30..=39 => 20,
        20..=29 => 10,
        _ => 0,
    }
}

/// Highest beast or obstacle level the adventurer can meet.
#[must_use]
pub const fn max_encounter_level(adventurer_level: u16) -> u16 {
    adventurer_level
        .saturating_mul(3)
        .saturating_add(beast_level_bonus(adventurer_level))
}

/// One way a named beast's specials can line up with the struck armor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecialScenario {
    pub prefix_matches: bool,
    pub suffix_matches: bool,
    pub probability: f64,
}

/// The four match outcomes for pools of `prefixes` and `suffixes` names.
///
/// `None` when either pool is empty.
#[must_use]
pub fn special_scenarios(prefixes: u32, suffixes: u32) -> Option<[SpecialScenario; 4]> {
    if prefixes == 0 || suffixes == 0 {
        return None;
    }
    let p = f64::from(prefixes);
    let s = f64::from(suffixes);
    let total = p * s;
    let scenario = |prefix_matches, suffix_matches, count: f64| SpecialScenario {
        prefix_matches,
        suffix_matches,
        probability: count / total,
    };
    Some([
        scenario(false, false, (p - 1.0) * (s - 1.0)),
        scenario(true, false, s - 1.0),
        scenario(false, true, p - 1.0),
        scenario(true, true, 1.0),
    ])
}

fn tally_hit<R>(
    rules: &R,
    adventurer: &Adventurer,
    beast: &Beast,
    armor: &Item,
    mass: f64,
    crit_chance: f64,
    tally: &mut RiskTally,
) where
    R: CombatRules + ?Sized,
{
    let damage = rules.beast_damage(beast, adventurer, armor);
    tally.record(mass * (1.0 - crit_chance), damage.normal, adventurer.health);
    tally.record(mass * crit_chance, damage.critical, adventurer.health);
}

/// Enumerate every encounter `kind` can produce and weigh the single hit each deals.
///
/// Weights in the returned tally sum to one.
#[must_use]
pub fn enumerate_encounters<R>(rules: &R, adventurer: &Adventurer, kind: EncounterKind) -> RiskTally
where
    R: CombatRules + ?Sized,
{
    let level = rules.level_from_xp(adventurer.xp);
    let max_level = max_encounter_level(level).max(1);
    let crit_chance = clamp_unit(f64::from(level) / 100.0);
    let scenarios = if kind.rolls_specials() {
        special_scenarios(rules.prefix_pool_size(), rules.suffix_pool_size())
    } else {
        None
    };

    let leaf_mass = 1.0
        / f64::from(max_level)
        / usize_to_f64(BeastType::ALL.len())
        / f64::from(BEAST_TIER_COUNT)
        / usize_to_f64(ARMOR_SLOT_COUNT);

    let mut tally = RiskTally::default();
    for beast_level in 1..=max_level {
        for beast_type in BeastType::ALL {
            for tier in 1..=BEAST_TIER_COUNT {
                let beast = Beast::nameless(beast_level, tier, beast_type);
                for slot in Slot::ARMOR {
                    let armor = adventurer.equipment.get(slot);
                    let armor_specials = named_armor_specials(rules, adventurer, armor);
                    match (scenarios, armor_specials) {
                        (Some(scenarios), Some(specials))
                            if beast_level >= BEAST_SPECIAL_NAME_LEVEL_UNLOCK =>
                        {
                            for scenario in scenarios {
                                let named = Beast {
                                    special_prefix: specials
                                        .prefix
                                        .filter(|_| scenario.prefix_matches),
                                    special_suffix: specials
                                        .suffix
                                        .filter(|_| scenario.suffix_matches),
                                    ..beast.clone()
                                };
                                tally_hit(
                                    rules,
                                    adventurer,
                                    &named,
                                    armor,
                                    leaf_mass * scenario.probability,
                                    crit_chance,
                                    &mut tally,
                                );
                            }
                        }
                        _ => tally_hit(
                            rules,
                            adventurer,
                            &beast,
                            armor,
                            leaf_mass,
                            crit_chance,
                            &mut tally,
                        ),
                    }
                }
            }
        }
    }
    tally
}

/// Specials of an equipped armor piece strong enough to carry a full name.
fn named_armor_specials<R>(rules: &R, adventurer: &Adventurer, armor: &Item) -> Option<ItemSpecials>
where
    R: CombatRules + ?Sized,
{
    if armor.is_empty() {
        return None;
    }
    let armor_level = rules.level_from_xp(armor.xp);
    (armor_level >= PREFIXES_UNLOCK_GREATNESS)
        .then(|| rules.specials_for_item(armor, armor_level, adventurer.item_specials_seed))
}

/// Percent chance the adventurer fails to avoid a `kind` event once it occurs.
#[must_use]
pub fn trigger_percent<R>(rules: &R, adventurer: &Adventurer, kind: EncounterKind) -> f64
where
    R: CombatRules + ?Sized,
{
    let avoid = rules
        .ability_based_percentage(adventurer.xp, kind.avoidance_stat(adventurer))
        .min(100);
    f64::from(100 - avoid)
}

/// Instant-death odds and typical damage from one `kind` event per exploration step.
///
/// # Errors
///
/// Returns an error if the configured encounter probability is out of range.
pub fn analyze_encounter<R>(
    rules: &R,
    adventurer: &Adventurer,
    kind: EncounterKind,
    config: &PreviewConfig,
) -> Result<RiskResult, PreviewError>
where
    R: CombatRules + ?Sized,
{
    let prior = ensure_probability("encounter_probability", config.encounter_probability)?;
    let tally = enumerate_encounters(rules, adventurer, kind);
    let trigger = trigger_percent(rules, adventurer, kind);
    let result = RiskResult::from_tally(&tally, prior, trigger);
    log::debug!(
        "{kind} risk: trigger {trigger:.0}%, instant death {:.3}%, avg damage {}",
        result.instant_death_probability,
        result.average_non_fatal_damage
    );
    Ok(result)
}

/// What a discovery step tends to pay out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryRewards {
    /// Percent chance per exploration step.
    pub gold_chance: f64,
    pub health_chance: f64,
    pub loot_chance: f64,
    pub average_gold: f64,
    pub average_health: f64,
}

impl DiscoveryRewards {
    #[must_use]
    pub fn for_level(level: u16) -> Self {
        let level = f64::from(level);
        Self {
            gold_chance: DISCOVERY_PROBABILITY * DISCOVERY_GOLD_SHARE / 100.0,
            health_chance: DISCOVERY_PROBABILITY * DISCOVERY_HEALTH_SHARE / 100.0,
            loot_chance: DISCOVERY_PROBABILITY * DISCOVERY_LOOT_SHARE / 100.0,
            average_gold: (1.0 + level) / 2.0,
            average_health: 1.0 + level,
        }
    }
}

/// Combined picture of one exploration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationReport {
    pub ambush: RiskResult,
    pub obstacle: RiskResult,
    /// Sum of both instant-death percentages.
    pub cumulative_death_percent: f64,
    /// Mean of both average non-fatal damages.
    pub cumulative_average_damage: f64,
    pub discovery: DiscoveryRewards,
}

impl ExplorationReport {
    #[must_use]
    pub fn combine(ambush: RiskResult, obstacle: RiskResult, discovery: DiscoveryRewards) -> Self {
        let cumulative_death_percent =
            ambush.instant_death_probability + obstacle.instant_death_probability;
        let cumulative_average_damage = (f64::from(ambush.average_non_fatal_damage)
            + f64::from(obstacle.average_non_fatal_damage))
            / 2.0;
        Self {
            ambush,
            obstacle,
            cumulative_death_percent,
            cumulative_average_damage,
            discovery,
        }
    }
}

/// Preview both exploration hazards plus discovery rewards.
///
/// # Errors
///
/// Returns an error if the configured encounter probability is out of range.
pub fn analyze_exploration<R>(
    rules: &R,
    adventurer: &Adventurer,
    config: &PreviewConfig,
) -> Result<ExplorationReport, PreviewError>
where
    R: CombatRules + ?Sized,
{
    let ambush = analyze_encounter(rules, adventurer, EncounterKind::Ambush, config)?;
    let obstacle = analyze_encounter(rules, adventurer, EncounterKind::Obstacle, config)?;
    let discovery = DiscoveryRewards::for_level(rules.level_from_xp(adventurer.xp));
    Ok(ExplorationReport::combine(ambush, obstacle, discovery))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemType;
    use crate::rules::{DamagePair, StandardRules};

    fn armored(xp: u32, health: u32) -> Adventurer {
        let mut adventurer = Adventurer {
            health,
            xp,
            item_specials_seed: 11,
            ..Adventurer::default()
        };
        for (id, slot) in (20_u8..).zip(Slot::ARMOR) {
            adventurer
                .equipment
                .set(slot, Item::new(id, 400, 1, ItemType::Hide));
        }
        adventurer
    }

    #[test]
    fn encounter_levels_follow_brackets() {
        assert_eq!(max_encounter_level(1), 3);
        assert_eq!(max_encounter_level(19), 57);
        assert_eq!(max_encounter_level(20), 70);
        assert_eq!(max_encounter_level(35), 125);
        assert_eq!(max_encounter_level(45), 175);
        assert_eq!(max_encounter_level(50), 230);
    }

    /// Flat damage with a large bump per matched name half, so each match outcome is visible.
    struct NameBumpRules;

    impl CombatRules for NameBumpRules {
        fn attack_damage(&self, _weapon: &Item, _adventurer: &Adventurer, _beast: &Beast) -> DamagePair {
            DamagePair::ZERO
        }

        fn beast_damage(&self, beast: &Beast, _adventurer: &Adventurer, _armor: &Item) -> DamagePair {
            let prefix = if beast.special_prefix.is_some() { 100 } else { 0 };
            let suffix = if beast.special_suffix.is_some() { 1000 } else { 0 };
            let damage = 10 + prefix + suffix;
            DamagePair::new(damage, damage)
        }

        fn level_from_xp(&self, xp: u32) -> u16 {
            StandardRules.level_from_xp(xp)
        }

        fn next_level_xp(&self, level: u16) -> u32 {
            StandardRules.next_level_xp(level)
        }

        fn xp_reward(&self, beast_level: u16, beast_tier: u8, adventurer_level: u16) -> u32 {
            StandardRules.xp_reward(beast_level, beast_tier, adventurer_level)
        }

        fn ability_based_percentage(&self, xp: u32, stat: u16) -> u8 {
            StandardRules.ability_based_percentage(xp, stat)
        }

        fn specials_for_item(&self, _item: &Item, _item_level: u16, _seed: u16) -> ItemSpecials {
            ItemSpecials {
                prefix: Some(1),
                suffix: Some(2),
            }
        }

        fn prefix_pool_size(&self) -> u32 {
            4
        }

        fn suffix_pool_size(&self) -> u32 {
            3
        }
    }

    #[test]
    fn special_scenarios_weigh_each_match() {
        let [neither, prefix, suffix, both] = special_scenarios(69, 18).unwrap();
        let total = 69.0 * 18.0;

        assert!(!neither.prefix_matches && !neither.suffix_matches);
        assert!((neither.probability - 68.0 * 17.0 / total).abs() < 1e-15);

        assert!(prefix.prefix_matches && !prefix.suffix_matches);
        assert!((prefix.probability - 17.0 / total).abs() < 1e-15);

        assert!(!suffix.prefix_matches && suffix.suffix_matches);
        assert!((suffix.probability - 68.0 / total).abs() < 1e-15);

        assert!(both.prefix_matches && both.suffix_matches);
        assert!((both.probability - 1.0 / total).abs() < 1e-15);
    }

    #[test]
    fn ambush_splits_named_hits_by_match_outcome() {
        // Level 7 meets beasts up to level 21, so levels 19..=21 (one seventh) carry names.
        // Pools of 4 prefixes and 3 suffixes: neither 6/12, prefix 2/12, suffix 3/12, both 1/12.
        let adventurer = armored(49, 100_000);
        let tally = enumerate_encounters(&NameBumpRules, &adventurer, EncounterKind::Ambush);
        let named = 10.0 + 100.0 * 3.0 / 12.0 + 1000.0 * 4.0 / 12.0;
        let expected = 6.0 / 7.0 * 10.0 + named / 7.0;
        assert!(tally.death_weight.abs() < f64::EPSILON);
        assert!((tally.non_fatal_weight - 1.0).abs() < 1e-9);
        assert!((tally.damage_weighted - expected).abs() < 1e-9);

        // At 1000 health only suffix matches (1010 and 1110 damage) kill.
        let fragile = armored(49, 1000);
        let tally = enumerate_encounters(&NameBumpRules, &fragile, EncounterKind::Ambush);
        assert!((tally.death_weight - 1.0 / 7.0 * 4.0 / 12.0).abs() < 1e-9);
        let survivable = 6.0 / 7.0 * 10.0 + (10.0 * 6.0 / 12.0 + 110.0 * 2.0 / 12.0) / 7.0;
        assert!((tally.damage_weighted - survivable).abs() < 1e-9);

        let obstacle = enumerate_encounters(&NameBumpRules, &fragile, EncounterKind::Obstacle);
        assert!(obstacle.death_weight.abs() < f64::EPSILON);
        assert!((obstacle.damage_weighted - 10.0).abs() < 1e-9);
    }

    #[test]
    fn special_scenarios_partition_unity() {
        let scenarios = special_scenarios(69, 18).unwrap();
        let total: f64 = scenarios.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((scenarios[3].probability - 1.0 / 1242.0).abs() < 1e-15);
        assert!(special_scenarios(0, 18).is_none());
    }

    #[test]
    fn fragile_adventurer_always_dies() {
        let mut adventurer = Adventurer {
            health: 1,
            xp: 100,
            ..Adventurer::default()
        };
        adventurer.stats.wisdom = 5;
        let result = analyze_encounter(
            &StandardRules,
            &adventurer,
            EncounterKind::Ambush,
            &PreviewConfig::default(),
        )
        .unwrap();
        // Prior 0.33, trigger 50 %, every leaf fatal.
        assert!((result.instant_death_probability - 16.5).abs() < 1e-9);
        assert_eq!(result.average_non_fatal_damage, 0);
    }

    #[test]
    fn tally_weights_sum_to_one() {
        let adventurer = armored(49, 60);
        for kind in EncounterKind::ALL {
            let tally = enumerate_encounters(&StandardRules, &adventurer, kind);
            let total = tally.death_weight + tally.non_fatal_weight;
            assert!((total - 1.0).abs() < 1e-9, "{kind} weights sum to {total}");
        }
    }

    #[test]
    fn name_matches_only_hurt_in_ambushes() {
        let adventurer = armored(49, 100_000);
        let ambush = enumerate_encounters(&StandardRules, &adventurer, EncounterKind::Ambush);
        let obstacle = enumerate_encounters(&StandardRules, &adventurer, EncounterKind::Obstacle);
        assert!(ambush.death_weight.abs() < f64::EPSILON);
        assert!(ambush.damage_weighted > obstacle.damage_weighted);
    }

    #[test]
    fn unnamed_armor_makes_events_identical() {
        let adventurer = armored(49, 100_000);
        let mut plain = adventurer.clone();
        for slot in Slot::ARMOR {
            let mut item = *plain.equipment.get(slot);
            item.xp = 100;
            plain.equipment.set(slot, item);
        }
        let ambush = enumerate_encounters(&StandardRules, &plain, EncounterKind::Ambush);
        let obstacle = enumerate_encounters(&StandardRules, &plain, EncounterKind::Obstacle);
        assert_eq!(ambush, obstacle);
    }

    #[test]
    fn wise_adventurers_avoid_ambushes() {
        let mut adventurer = armored(100, 1);
        adventurer.stats.wisdom = 10;
        let ambush = trigger_percent(&StandardRules, &adventurer, EncounterKind::Ambush);
        let obstacle = trigger_percent(&StandardRules, &adventurer, EncounterKind::Obstacle);
        assert!(ambush.abs() < f64::EPSILON);
        assert!((obstacle - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exploration_sums_both_events() {
        let mut adventurer = armored(100, 40);
        adventurer.stats.intelligence = 3;
        let report =
            analyze_exploration(&StandardRules, &adventurer, &PreviewConfig::default()).unwrap();
        let expected =
            report.ambush.instant_death_probability + report.obstacle.instant_death_probability;
        assert!((report.cumulative_death_percent - expected).abs() < 1e-12);
        assert!((report.discovery.average_gold - 5.5).abs() < f64::EPSILON);
        assert!((report.discovery.average_health - 11.0).abs() < f64::EPSILON);
        assert!((report.discovery.gold_chance - 14.985).abs() < 1e-9);
        assert!((report.discovery.loot_chance - 3.33).abs() < 1e-9);
    }

    #[test]
    fn bad_prior_is_rejected() {
        let config = PreviewConfig {
            encounter_probability: 1.5,
            ..PreviewConfig::default()
        };
        let adventurer = armored(49, 10);
        let result = analyze_encounter(&StandardRules, &adventurer, EncounterKind::Obstacle, &config);
        assert!(result.is_err());
    }
}
