//! Collapse the armor slots into classes that take identical damage.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::ARMOR_SLOT_COUNT;
use crate::model::{Adventurer, Beast, Slot};
use crate::numbers::usize_to_f64;
use crate::rules::{CombatRules, DamagePair};

/// Armor slots sharing the same (normal, critical) damage from one beast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageGroup {
    pub slots: SmallVec<[Slot; ARMOR_SLOT_COUNT]>,
    pub normal_damage: u32,
    pub critical_damage: u32,
    /// Chance a beast strike lands on one of these slots.
    pub probability: f64,
}

impl DamageGroup {
    #[must_use]
    pub const fn damage(&self) -> DamagePair {
        DamagePair::new(self.normal_damage, self.critical_damage)
    }
}

/// Group the five armor slots by the damage `beast` would deal to each.
///
/// A strike lands on each slot with equal chance, so a group's probability is
/// its slot count over five. Groups keep the order of the first slot that
/// introduced them, which keeps downstream summation order stable.
#[must_use]
pub fn group_armor_damage<R>(rules: &R, adventurer: &Adventurer, beast: &Beast) -> Vec<DamageGroup>
where
    R: CombatRules + ?Sized,
{
    let mut groups: Vec<DamageGroup> = Vec::with_capacity(ARMOR_SLOT_COUNT);
    for slot in Slot::ARMOR {
        let armor = adventurer.equipment.get(slot);
        let damage = rules.beast_damage(beast, adventurer, armor);
        if let Some(group) = groups.iter_mut().find(|g| g.damage() == damage) {
            group.slots.push(slot);
        } else {
            groups.push(DamageGroup {
                slots: smallvec::smallvec![slot],
                normal_damage: damage.normal,
                critical_damage: damage.critical,
                probability: 0.0,
            });
        }
    }

    let slot_count = usize_to_f64(ARMOR_SLOT_COUNT);
    for group in &mut groups {
        group.probability = usize_to_f64(group.slots.len()) / slot_count;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BeastType, Item, ItemType};
    use crate::rules::StandardRules;

    fn armored_adventurer() -> Adventurer {
        let mut adventurer = Adventurer {
            health: 100,
            xp: 100,
            ..Adventurer::default()
        };
        adventurer
            .equipment
            .set(Slot::Head, Item::new(10, 25, 3, ItemType::Metal));
        adventurer
            .equipment
            .set(Slot::Chest, Item::new(11, 25, 3, ItemType::Metal));
        adventurer
            .equipment
            .set(Slot::Foot, Item::new(12, 9, 5, ItemType::Cloth));
        adventurer
    }

    #[test]
    fn probabilities_partition_all_slots() {
        let beast = Beast::nameless(12, 2, BeastType::Hunter);
        let groups = group_armor_damage(&StandardRules, &armored_adventurer(), &beast);
        let total: f64 = groups.iter().map(|g| g.probability).sum();
        assert!((total - 1.0).abs() < 1e-12);
        let slots: usize = groups.iter().map(|g| g.slots.len()).sum();
        assert_eq!(slots, ARMOR_SLOT_COUNT);
    }

    #[test]
    fn identical_armor_shares_a_group() {
        let beast = Beast::nameless(12, 2, BeastType::Hunter);
        let groups = group_armor_damage(&StandardRules, &armored_adventurer(), &beast);
        let metal = groups
            .iter()
            .find(|g| g.slots.contains(&Slot::Head))
            .expect("head grouped");
        assert!(metal.slots.contains(&Slot::Chest));
        let bare = groups
            .iter()
            .find(|g| g.slots.contains(&Slot::Waist))
            .expect("waist grouped");
        assert!(bare.slots.contains(&Slot::Hand));
        assert!((bare.probability - 0.4).abs() < 1e-12);
    }

    #[test]
    fn grouping_is_idempotent() {
        let beast = Beast::nameless(7, 4, BeastType::Magic);
        let adventurer = armored_adventurer();
        let first = group_armor_damage(&StandardRules, &adventurer, &beast);
        let second = group_armor_damage(&StandardRules, &adventurer, &beast);
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_beast_still_partitions() {
        let beast = Beast::nameless(0, 5, BeastType::Brute);
        let groups = group_armor_damage(&StandardRules, &Adventurer::default(), &beast);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].slots.len(), ARMOR_SLOT_COUNT);
        assert!((groups[0].probability - 1.0).abs() < f64::EPSILON);
    }
}
