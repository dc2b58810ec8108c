//! Centralized balance and tuning constants for battlecast previews.
//!
//! These values mirror the on-chain game rules the previews are computed
//! against. Keeping them together ensures the preview math can only drift
//! from the game through reviewed code changes.

// Engine defaults ----------------------------------------------------------
pub(crate) const DEFAULT_MAX_TURNS: u32 = 50;
pub(crate) const DEFAULT_NEGLIGIBLE_MASS: f64 = 1e-4;
pub(crate) const DEFAULT_RESOLUTION_THRESHOLD: f64 = 0.9999;
pub(crate) const DEFAULT_BATTLE_SHORTCUT_MIN_TURN: u32 = 20;
pub(crate) const DEFAULT_BATTLE_SHORTCUT_HEALTH_DIVISOR: u32 = 5;
pub(crate) const DEFAULT_BATTLE_SHORTCUT_REMAINING_MASS: f64 = 0.01;
pub(crate) const DEFAULT_FLEE_SHORTCUT_MIN_CHANCE: f64 = 80.0;
pub(crate) const DEFAULT_FLEE_SHORTCUT_MIN_TURN: u32 = 10;
pub(crate) const DEFAULT_FLEE_SHORTCUT_REMAINING_MASS: f64 = 0.01;
pub(crate) const DEFAULT_ENCOUNTER_PROBABILITY: f64 = 0.33;
pub(crate) const MAX_TURNS_CEILING: u32 = 1_000;

// Adventurer ---------------------------------------------------------------
pub const STARTING_HEALTH: u32 = 100;
pub const HEALTH_PER_VITALITY: u32 = 15;
pub const POTION_HEALTH: u32 = 10;
pub(crate) const MAX_CRIT_LUCK: u16 = 100;

// Armor slots --------------------------------------------------------------
pub const ARMOR_SLOT_COUNT: usize = 5;

// Exploration --------------------------------------------------------------
pub(crate) const BEAST_TIER_COUNT: u8 = 5;
pub(crate) const DISCOVERY_PROBABILITY: f64 = 33.3;
pub(crate) const DISCOVERY_GOLD_SHARE: f64 = 45.0;
pub(crate) const DISCOVERY_HEALTH_SHARE: f64 = 45.0;
pub(crate) const DISCOVERY_LOOT_SHARE: f64 = 10.0;

// Specials -----------------------------------------------------------------
pub const BEAST_SPECIAL_NAME_LEVEL_UNLOCK: u16 = 19;
pub const SUFFIX_UNLOCK_GREATNESS: u16 = 15;
pub const PREFIXES_UNLOCK_GREATNESS: u16 = 19;
pub const NAME_PREFIX_COUNT: u32 = 69;
pub const NAME_SUFFIX_COUNT: u32 = 18;
pub(crate) const PREFIX_MATCH_MULTIPLIER: u32 = 8;
pub(crate) const SUFFIX_MATCH_MULTIPLIER: u32 = 2;

// Damage -------------------------------------------------------------------
pub(crate) const MIN_ADVENTURER_DAMAGE: u32 = 4;
pub(crate) const MIN_BEAST_DAMAGE: u32 = 2;
pub(crate) const STRENGTH_BONUS_PERCENT: u32 = 10;
pub(crate) const UNARMED_ATTACK: u32 = 1;
pub(crate) const TIER_CEILING: u32 = 6;

// Rewards ------------------------------------------------------------------
pub(crate) const XP_REWARD_DIVISOR: u32 = 2;
pub(crate) const MIN_XP_REWARD: u32 = 4;
pub(crate) const GOLD_REWARD_DIVISOR: u32 = 2;
pub(crate) const GOLD_RING_BONUS_PER_LEVEL: f64 = 0.03;
pub const GOLD_RING_ID: u8 = 8;
