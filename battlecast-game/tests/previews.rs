use battlecast_game::{
    Adventurer, Beast, BeastType, CombatRules, DamagePair, EncounterKind, EscapeOutlook, Item,
    ItemSpecials, ItemType, Preview, PreviewConfig, PreviewError, PreviewInput, Slot,
    StandardRules,
};

/// Rules with fixed damage in both directions, for hand-checkable previews.
struct FixedRules {
    attack: DamagePair,
    strike: DamagePair,
}

impl CombatRules for FixedRules {
    fn attack_damage(&self, _weapon: &Item, _adventurer: &Adventurer, _beast: &Beast) -> DamagePair {
        self.attack
    }

    fn beast_damage(&self, _beast: &Beast, _adventurer: &Adventurer, _armor: &Item) -> DamagePair {
        self.strike
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
        ItemSpecials::default()
    }

    fn prefix_pool_size(&self) -> u32 {
        StandardRules.prefix_pool_size()
    }

    fn suffix_pool_size(&self) -> u32 {
        StandardRules.suffix_pool_size()
    }
}

fn fixed(attack: (u32, u32), strike: (u32, u32)) -> Preview<FixedRules> {
    Preview::new(
        FixedRules {
            attack: DamagePair::new(attack.0, attack.1),
            strike: DamagePair::new(strike.0, strike.1),
        },
        PreviewConfig::default(),
    )
    .expect("default config is valid")
}

/// Level 5 (5% beast crits) with 10% crit luck.
fn fighter(health: u32) -> PreviewInput {
    let mut adventurer = Adventurer {
        health,
        xp: 25,
        ..Adventurer::default()
    };
    adventurer.stats.luck = 10;
    PreviewInput::new(adventurer)
}

fn beast(health: u32) -> Beast {
    Beast {
        health,
        ..Beast::nameless(8, 3, BeastType::Hunter)
    }
}

#[test]
fn hundred_versus_fifty_resolves_within_three_turns() {
    let preview = fixed((20, 40), (10, 20));
    let report = preview.battle(&fighter(100), &beast(50)).expect("battle");

    assert!(report.trace[0].resolved_mass.abs() < f64::EPSILON);
    let by_third: f64 = report.trace.iter().take(3).map(|t| t.resolved_mass).sum();
    assert!(by_third > 0.9);

    let result = &report.result;
    assert!((result.success_probability - 1.0).abs() < 1e-12);
    assert!((result.average_turns_to_success - 2.81).abs() < 1e-9);
    assert!(!result.hit_iteration_cap);
}

#[test]
fn harmless_fight_stops_at_the_turn_cap() {
    let preview = fixed((0, 0), (0, 0));
    let report = preview.battle(&fighter(100), &beast(50)).expect("battle");
    let result = &report.result;
    assert_eq!(result.turns_simulated, 50);
    assert!(result.hit_iteration_cap);
    assert!((result.death_probability - 1.0).abs() < 1e-12);
    assert!((result.unresolved_mass - 1.0).abs() < 1e-12);
    assert_eq!(report.trace.len(), 50);
}

#[test]
fn turn_cap_follows_configuration() {
    let config = PreviewConfig {
        max_turns: 12,
        ..PreviewConfig::default()
    };
    let rules = FixedRules {
        attack: DamagePair::ZERO,
        strike: DamagePair::ZERO,
    };
    let preview = Preview::new(rules, config).expect("valid config");
    let report = preview.flee(&fighter(40), &beast(50)).expect("flee");
    assert_eq!(report.outlook, EscapeOutlook::Impossible);

    let mut nimble = fighter(40);
    nimble.stat_deltas.dexterity = 1;
    let report = preview.flee(&nimble, &beast(50)).expect("flee");
    assert_eq!(report.outlook, EscapeOutlook::Uncertain);
    assert_eq!(report.result.turns_simulated, 12);
    assert!(report.result.hit_iteration_cap);
    let tail = 0.8_f64.powi(12);
    assert!((report.result.success_probability - (1.0 - tail)).abs() < 1e-9);
}

#[test]
fn mass_is_conserved_turn_by_turn() {
    let preview = fixed((7, 15), (6, 13));
    let report = preview.battle(&fighter(45), &beast(60)).expect("battle");
    let mut resolved = 0.0;
    for turn in &report.trace {
        resolved += turn.resolved_mass;
        assert!((resolved + turn.live_mass_after - 1.0).abs() < 1e-9);
    }
    let result = &report.result;
    assert!((result.success_probability + result.death_probability - 1.0).abs() < 1e-9);
}

#[test]
fn previews_are_deterministic() {
    let preview = Preview::standard();
    let mut input = fighter(90);
    input
        .base_adventurer
        .equipment
        .set(Slot::Weapon, Item::new(9, 121, 2, ItemType::Bludgeon));
    input
        .base_adventurer
        .equipment
        .set(Slot::Chest, Item::new(17, 81, 3, ItemType::Cloth));
    let target = beast(80);
    let first = preview.battle(&input, &target).expect("battle");
    let second = preview.battle(&input, &target).expect("battle");
    assert_eq!(first, second);
    assert_eq!(
        first.result.success_probability.to_bits(),
        second.result.success_probability.to_bits()
    );
}

#[test]
fn gear_swap_costs_the_opening_action() {
    let preview = fixed((60, 60), (1, 1));
    let mut input = fighter(30);
    let report = preview.battle(&input, &beast(50)).expect("battle");
    assert!((report.result.average_turns_to_success - 1.0).abs() < 1e-12);

    input
        .equipment_deltas
        .set(Slot::Foot, Item::new(3, 0, 5, ItemType::Hide));
    let report = preview.battle(&input, &beast(50)).expect("battle");
    assert!(report.equipment_changed);
    assert!((report.result.average_turns_to_success - 2.0).abs() < 1e-12);
    assert!((report.result.average_damage_on_success - 1.0).abs() < 1e-12);
}

#[test]
fn nimble_adventurer_escapes_without_simulation() {
    let preview = fixed((1, 1), (5, 10));
    let mut input = fighter(30);
    input.base_adventurer.stats.dexterity = 5;
    let report = preview.flee(&input, &beast(50)).expect("flee");
    assert_eq!(report.outlook, EscapeOutlook::Guaranteed);
    assert!((report.result.success_probability - 1.0).abs() < f64::EPSILON);
    assert!(report.result.death_probability.abs() < f64::EPSILON);
    assert!(report.trace.is_empty());
}

#[test]
fn fresh_adventurer_cannot_preview_combat() {
    let preview = Preview::standard();
    let input = PreviewInput::new(Adventurer {
        health: 100,
        ..Adventurer::default()
    });
    assert_eq!(
        preview.battle(&input, &beast(10)).unwrap_err(),
        PreviewError::NoExperience
    );
    assert_eq!(
        preview.flee(&input, &beast(10)).unwrap_err(),
        PreviewError::NoExperience
    );
}

#[test]
fn ambush_risk_splits_on_the_crit_roll() {
    // Normal hits of 10 are survivable at 15 health; 5% crits of 20 are not.
    let preview = fixed((1, 1), (10, 20));
    let risk = preview.ambush(&fighter(15)).expect("ambush");
    assert!((risk.instant_death_probability - 1.65).abs() < 1e-9);
    assert_eq!(risk.average_non_fatal_damage, 10);
}

#[test]
fn fragile_adventurer_dies_to_every_encounter() {
    let preview = Preview::standard();
    let mut input = fighter(1);
    input.base_adventurer.stats.intelligence = 4;
    let risk = preview
        .encounter(&input, EncounterKind::Obstacle)
        .expect("obstacle");
    // Level 5 with 4 intelligence avoids 80% of obstacles.
    assert!((risk.instant_death_probability - 0.33 * 0.2 * 100.0).abs() < 1e-9);
}

#[test]
fn exploration_combines_both_hazards() {
    let preview = fixed((1, 1), (10, 20));
    let input = fighter(15);
    let report = preview.exploration(&input).expect("exploration");
    let ambush = preview.ambush(&input).expect("ambush");
    let obstacle = preview.obstacle(&input).expect("obstacle");
    assert_eq!(report.ambush, ambush);
    assert_eq!(report.obstacle, obstacle);
    assert!(
        (report.cumulative_death_percent
            - (ambush.instant_death_probability + obstacle.instant_death_probability))
            .abs()
            < 1e-12
    );
    assert!((report.cumulative_average_damage - 10.0).abs() < f64::EPSILON);
    assert!((report.discovery.average_gold - 3.0).abs() < f64::EPSILON);
}

#[test]
fn potions_feed_into_battle_health() {
    let preview = fixed((4, 4), (30, 30));
    let weak = fighter(30);
    let mut healed = fighter(30);
    healed.potion_count = 5;
    let base = preview.battle(&weak, &beast(8)).expect("battle");
    let boosted = preview.battle(&healed, &beast(8)).expect("battle");
    // One strike kills at 30 health; 80 survives it.
    assert!(boosted.result.success_probability > base.result.success_probability);
    assert!((boosted.result.success_probability - 1.0).abs() < 1e-12);
}
