//! Adventurer, beast and equipment value types consumed by the previews.
use serde::{Deserialize, Serialize};
use std::ops::Add;

use crate::constants::TIER_CEILING;

/// Equipment slot identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Weapon,
    Chest,
    Head,
    Waist,
    Foot,
    Hand,
    Neck,
    Ring,
}

impl Slot {
    /// The five armor slots a beast can strike, in grouping order.
    pub const ARMOR: [Self; 5] = [Self::Head, Self::Chest, Self::Waist, Self::Hand, Self::Foot];

    /// Every equipment slot.
    pub const ALL: [Self; 8] = [
        Self::Weapon,
        Self::Chest,
        Self::Head,
        Self::Waist,
        Self::Foot,
        Self::Hand,
        Self::Neck,
        Self::Ring,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Chest => "chest",
            Self::Head => "head",
            Self::Waist => "waist",
            Self::Foot => "foot",
            Self::Hand => "hand",
            Self::Neck => "neck",
            Self::Ring => "ring",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Material or weapon class of an item, which drives elemental advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Magic,
    Blade,
    Bludgeon,
    Cloth,
    Hide,
    Metal,
    Necklace,
    Ring,
    #[default]
    None,
}

/// A single piece of equipment. An `id` of zero marks an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Item {
    pub id: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub tier: u8,
    #[serde(default)]
    pub kind: ItemType,
}

impl Item {
    pub const EMPTY: Self = Self {
        id: 0,
        xp: 0,
        tier: 0,
        kind: ItemType::None,
    };

    #[must_use]
    pub const fn new(id: u8, xp: u32, tier: u8, kind: ItemType) -> Self {
        Self { id, xp, tier, kind }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// Tier weight used by level-times-tier formulas (tier 1 is strongest).
    #[must_use]
    pub fn tier_weight(&self) -> u32 {
        TIER_CEILING.saturating_sub(u32::from(self.tier))
    }
}

/// Core adventurer attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Stats {
    pub strength: u16,
    pub dexterity: u16,
    pub vitality: u16,
    pub intelligence: u16,
    pub wisdom: u16,
    pub charisma: u16,
    pub luck: u16,
}

impl Add for Stats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            strength: self.strength.saturating_add(rhs.strength),
            dexterity: self.dexterity.saturating_add(rhs.dexterity),
            vitality: self.vitality.saturating_add(rhs.vitality),
            intelligence: self.intelligence.saturating_add(rhs.intelligence),
            wisdom: self.wisdom.saturating_add(rhs.wisdom),
            charisma: self.charisma.saturating_add(rhs.charisma),
            luck: self.luck.saturating_add(rhs.luck),
        }
    }
}

/// Items worn in each slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Equipment {
    pub weapon: Item,
    pub chest: Item,
    pub head: Item,
    pub waist: Item,
    pub foot: Item,
    pub hand: Item,
    pub neck: Item,
    pub ring: Item,
}

impl Equipment {
    #[must_use]
    pub const fn get(&self, slot: Slot) -> &Item {
        match slot {
            Slot::Weapon => &self.weapon,
            Slot::Chest => &self.chest,
            Slot::Head => &self.head,
            Slot::Waist => &self.waist,
            Slot::Foot => &self.foot,
            Slot::Hand => &self.hand,
            Slot::Neck => &self.neck,
            Slot::Ring => &self.ring,
        }
    }

    pub const fn set(&mut self, slot: Slot, item: Item) {
        match slot {
            Slot::Weapon => self.weapon = item,
            Slot::Chest => self.chest = item,
            Slot::Head => self.head = item,
            Slot::Waist => self.waist = item,
            Slot::Foot => self.foot = item,
            Slot::Hand => self.hand = item,
            Slot::Neck => self.neck = item,
            Slot::Ring => self.ring = item,
        }
    }

    /// Slots whose item id differs from `committed`.
    #[must_use]
    pub fn changed_slots(&self, committed: &Self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| self.get(slot).id != committed.get(slot).id)
            .collect()
    }
}

/// The player-controlled combat entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Adventurer {
    pub health: u32,
    pub xp: u32,
    /// Health of the beast currently being fought, 0 when no fight is underway.
    #[serde(default)]
    pub beast_health: u32,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub item_specials_seed: u16,
}

/// Beast families; each attacks with one weapon class and wears one armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeastType {
    Magic,
    Hunter,
    Brute,
}

impl BeastType {
    pub const ALL: [Self; 3] = [Self::Magic, Self::Hunter, Self::Brute];

    #[must_use]
    pub const fn attack_kind(self) -> ItemType {
        match self {
            Self::Magic => ItemType::Magic,
            Self::Hunter => ItemType::Blade,
            Self::Brute => ItemType::Bludgeon,
        }
    }

    #[must_use]
    pub const fn armor_kind(self) -> ItemType {
        match self {
            Self::Magic => ItemType::Cloth,
            Self::Hunter => ItemType::Hide,
            Self::Brute => ItemType::Metal,
        }
    }
}

/// The opposing combat entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beast {
    pub level: u16,
    pub tier: u8,
    pub beast_type: BeastType,
    pub health: u32,
    #[serde(default)]
    pub special_prefix: Option<u8>,
    #[serde(default)]
    pub special_suffix: Option<u8>,
}

impl Beast {
    /// A nameless beast used for exploration enumeration, where health is irrelevant.
    #[must_use]
    pub const fn nameless(level: u16, tier: u8, beast_type: BeastType) -> Self {
        Self {
            level,
            tier,
            beast_type,
            health: 1,
            special_prefix: None,
            special_suffix: None,
        }
    }

    /// Level times tier weight, the base of beast attack, armor and gold rewards.
    #[must_use]
    pub fn power(&self) -> u32 {
        u32::from(self.level) * TIER_CEILING.saturating_sub(u32::from(self.tier))
    }
}
