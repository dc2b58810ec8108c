//! Game formulas consumed by the previews.
//!
//! The preview engine never owns damage, level or reward arithmetic; it calls
//! into a [`CombatRules`] implementation. [`StandardRules`] reproduces the
//! stock tier/level ruleset so previews work without a custom collaborator.
use serde::{Deserialize, Serialize};

use crate::constants::{
    MIN_ADVENTURER_DAMAGE, MIN_BEAST_DAMAGE, MIN_XP_REWARD, NAME_PREFIX_COUNT, NAME_SUFFIX_COUNT,
    PREFIX_MATCH_MULTIPLIER, PREFIXES_UNLOCK_GREATNESS, STRENGTH_BONUS_PERCENT,
    SUFFIX_MATCH_MULTIPLIER, SUFFIX_UNLOCK_GREATNESS, TIER_CEILING, UNARMED_ATTACK,
    XP_REWARD_DIVISOR,
};
use crate::model::{Adventurer, Beast, Item, ItemType};

/// Damage dealt by one hit, without and with a critical strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct DamagePair {
    pub normal: u32,
    pub critical: u32,
}

impl DamagePair {
    pub const ZERO: Self = Self {
        normal: 0,
        critical: 0,
    };

    #[must_use]
    pub const fn new(normal: u32, critical: u32) -> Self {
        Self { normal, critical }
    }
}

/// Name specials rolled onto an item once it is strong enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ItemSpecials {
    pub prefix: Option<u8>,
    pub suffix: Option<u8>,
}

/// External game formulas. Implementations must be pure.
pub trait CombatRules {
    /// Damage the adventurer deals to `beast` with `weapon`.
    fn attack_damage(&self, weapon: &Item, adventurer: &Adventurer, beast: &Beast) -> DamagePair;

    /// Damage `beast` deals when it strikes `armor`.
    fn beast_damage(&self, beast: &Beast, adventurer: &Adventurer, armor: &Item) -> DamagePair;

    fn level_from_xp(&self, xp: u32) -> u16;

    /// Total XP required to leave `level`.
    fn next_level_xp(&self, level: u16) -> u32;

    fn xp_reward(&self, beast_level: u16, beast_tier: u8, adventurer_level: u16) -> u32;

    /// Chance in percent (`0..=100`) that a stat lets the adventurer avoid an event.
    fn ability_based_percentage(&self, xp: u32, stat: u16) -> u8;

    fn specials_for_item(&self, item: &Item, item_level: u16, seed: u16) -> ItemSpecials;

    fn prefix_pool_size(&self) -> u32;

    fn suffix_pool_size(&self) -> u32;
}

/// Elemental effectiveness of an attack class against an armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effectiveness {
    Strong,
    Fair,
    Weak,
}

fn effectiveness(attack: ItemType, armor: Option<ItemType>) -> Effectiveness {
    let Some(armor) = armor else {
        return Effectiveness::Strong;
    };
    match (attack, armor) {
        (ItemType::Magic, ItemType::Metal)
        | (ItemType::Blade, ItemType::Cloth)
        | (ItemType::Bludgeon, ItemType::Hide) => Effectiveness::Strong,
        (ItemType::Magic, ItemType::Hide)
        | (ItemType::Blade, ItemType::Metal)
        | (ItemType::Bludgeon, ItemType::Cloth) => Effectiveness::Weak,
        _ => Effectiveness::Fair,
    }
}

fn elemental_adjust(attack: u32, effectiveness: Effectiveness) -> u32 {
    match effectiveness {
        Effectiveness::Strong => attack.saturating_add(attack / 2),
        Effectiveness::Fair => attack,
        Effectiveness::Weak => attack - attack / 2,
    }
}

fn name_match_bonus(elemental: u32, attacker: ItemSpecials, defender: ItemSpecials) -> u32 {
    let mut bonus = 0_u32;
    if attacker.prefix.is_some() && attacker.prefix == defender.prefix {
        bonus = bonus.saturating_add(elemental.saturating_mul(PREFIX_MATCH_MULTIPLIER));
    }
    if attacker.suffix.is_some() && attacker.suffix == defender.suffix {
        bonus = bonus.saturating_add(elemental.saturating_mul(SUFFIX_MATCH_MULTIPLIER));
    }
    bonus
}

const fn beast_specials(beast: &Beast) -> ItemSpecials {
    ItemSpecials {
        prefix: beast.special_prefix,
        suffix: beast.special_suffix,
    }
}

/// Stock ruleset: level × tier arithmetic, elemental advantage, name-match bonuses
/// and minimum damage floors.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    fn item_level(self, item: &Item) -> u16 {
        self.level_from_xp(item.xp)
    }

    fn item_power(self, item: &Item) -> u32 {
        u32::from(self.item_level(item)) * item.tier_weight()
    }
}

impl CombatRules for StandardRules {
    fn attack_damage(&self, weapon: &Item, adventurer: &Adventurer, beast: &Beast) -> DamagePair {
        let attack = if weapon.is_empty() {
            UNARMED_ATTACK
        } else {
            self.item_power(weapon)
        };
        let elemental = elemental_adjust(
            attack,
            effectiveness(weapon.kind, Some(beast.beast_type.armor_kind())),
        );
        let strength_bonus = elemental
            .saturating_mul(u32::from(adventurer.stats.strength))
            .saturating_mul(STRENGTH_BONUS_PERCENT)
            / 100;
        let weapon_specials = self.specials_for_item(
            weapon,
            self.item_level(weapon),
            adventurer.item_specials_seed,
        );
        let special_bonus = name_match_bonus(elemental, weapon_specials, beast_specials(beast));
        let armor = beast.power();

        let normal = elemental
            .saturating_add(strength_bonus)
            .saturating_add(special_bonus);
        let critical = normal.saturating_add(elemental);
        DamagePair::new(
            normal.saturating_sub(armor).max(MIN_ADVENTURER_DAMAGE),
            critical.saturating_sub(armor).max(MIN_ADVENTURER_DAMAGE),
        )
    }

    fn beast_damage(&self, beast: &Beast, adventurer: &Adventurer, armor: &Item) -> DamagePair {
        let attack = beast.power();
        let (armor_value, armor_kind) = if armor.is_empty() {
            (0, None)
        } else {
            (self.item_power(armor), Some(armor.kind))
        };
        let elemental = elemental_adjust(
            attack,
            effectiveness(beast.beast_type.attack_kind(), armor_kind),
        );
        let armor_specials = self.specials_for_item(
            armor,
            self.item_level(armor),
            adventurer.item_specials_seed,
        );
        let special_bonus = name_match_bonus(elemental, beast_specials(beast), armor_specials);

        let normal = elemental.saturating_add(special_bonus);
        let critical = normal.saturating_add(elemental);
        DamagePair::new(
            normal.saturating_sub(armor_value).max(MIN_BEAST_DAMAGE),
            critical.saturating_sub(armor_value).max(MIN_BEAST_DAMAGE),
        )
    }

    fn level_from_xp(&self, xp: u32) -> u16 {
        u16::try_from(xp.isqrt()).unwrap_or(u16::MAX).max(1)
    }

    fn next_level_xp(&self, level: u16) -> u32 {
        let next = u32::from(level) + 1;
        next.saturating_mul(next)
    }

    fn xp_reward(&self, beast_level: u16, beast_tier: u8, _adventurer_level: u16) -> u32 {
        let weight = TIER_CEILING.saturating_sub(u32::from(beast_tier));
        (u32::from(beast_level) * weight / XP_REWARD_DIVISOR).max(MIN_XP_REWARD)
    }

    fn ability_based_percentage(&self, xp: u32, stat: u16) -> u8 {
        let level = self.level_from_xp(xp);
        if stat >= level {
            return 100;
        }
        let percent = u32::from(stat) * 100 / u32::from(level);
        u8::try_from(percent).unwrap_or(100)
    }

    fn specials_for_item(&self, item: &Item, item_level: u16, seed: u16) -> ItemSpecials {
        if item.is_empty() || item_level < SUFFIX_UNLOCK_GREATNESS {
            return ItemSpecials::default();
        }
        let id = u32::from(item.id);
        let seed = u32::from(seed);
        let suffix = (id + seed) % NAME_SUFFIX_COUNT + 1;
        let prefix = (item_level >= PREFIXES_UNLOCK_GREATNESS)
            .then(|| (id * 7 + seed) % NAME_PREFIX_COUNT + 1);
        ItemSpecials {
            prefix: prefix.and_then(|p| u8::try_from(p).ok()),
            suffix: u8::try_from(suffix).ok(),
        }
    }

    fn prefix_pool_size(&self) -> u32 {
        NAME_PREFIX_COUNT
    }

    fn suffix_pool_size(&self) -> u32 {
        NAME_SUFFIX_COUNT
    }
}
