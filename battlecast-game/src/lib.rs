//! Battlecast Preview Engine
//!
//! Exact outcome previews for a turn-based dungeon crawler: battle and flee
//! odds, exploration hazards and the rewards at stake, computed before the
//! player commits an irreversible action. Nothing is sampled; every figure is
//! an expectation over the full outcome space.
//!
//! Game formulas come in through [`CombatRules`]. [`StandardRules`] ships as the
//! stock ruleset so previews work out of the box.

pub mod battle;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod flee;
pub mod grouping;
pub mod model;
pub mod numbers;
pub mod preview;
pub mod report;
pub mod risk;
pub mod rules;

// Re-export commonly used types
pub use battle::{
    BattleReport, BattleRewards, BattleSetup, BattleState, analyze_battle, battle_rewards,
    run_battle,
};
pub use config::{BattleShortcut, FleeShortcut, PreviewConfig};
pub use engine::{
    Distribution, Ledger, SimulationOutcome, Step, StopReason, Terminal, TurnModel, TurnSummary,
    simulate,
};
pub use error::PreviewError;
pub use flee::{
    EscapeOutlook, FleeReport, FleeRun, FleeSetup, FleeState, analyze_flee, flee_chance_percent,
    run_flee,
};
pub use grouping::{DamageGroup, group_armor_damage};
pub use model::{Adventurer, Beast, BeastType, Equipment, Item, ItemType, Slot, Stats};
pub use preview::{EquipmentDeltas, Preview, PreviewInput};
pub use report::{AggregateResult, Outlook, RiskResult, RiskTally};
pub use risk::{
    DiscoveryRewards, EncounterKind, ExplorationReport, analyze_encounter, analyze_exploration,
    enumerate_encounters, max_encounter_level,
};
pub use rules::{CombatRules, DamagePair, ItemSpecials, StandardRules};
