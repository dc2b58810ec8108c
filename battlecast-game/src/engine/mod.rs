//! Forward state-space simulator.
//!
//! Pushes an exact probability distribution over combat states through one
//! turn at a time. Each live state branches on the actor's outcome and then on
//! the opponent's counter-attack; every branch either resolves (success or
//! death) or lands in the next turn's distribution. Nothing is sampled: the
//! result is the expectation itself.
//!
//! The loop stops when the live tail is negligible, when almost all mass has
//! resolved, when the model's own shortcut fires, or at the turn cap. Any mass
//! still live at that point counts as a failure.
use serde::{Deserialize, Serialize};

use crate::config::PreviewConfig;
use crate::grouping::DamageGroup;

mod distribution;

pub use distribution::Distribution;

/// How an already-settled state resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Success { damage_taken: u32 },
    Failure,
}

/// A turn structure the simulator can propagate.
pub trait TurnModel {
    type State: Copy + Ord + std::fmt::Debug;

    fn initial_state(&self) -> Self::State;

    /// `Some` when `state` has already resolved and must not branch again.
    fn terminal(&self, state: &Self::State) -> Option<Terminal>;

    /// Branch a live state's mass for `turn` (1-based) into `step`.
    fn expand(&self, turn: u32, state: Self::State, mass: f64, step: &mut Step<'_, Self::State>);

    /// Model-specific early stop, checked after the generic ones.
    fn settles_early(&self, _turn: u32, _live_mass: f64) -> bool {
        false
    }
}

/// Resolved mass and the weighted sums reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub success_mass: f64,
    pub death_mass: f64,
    /// Σ mass × health lost, over successful outcomes.
    pub damage_weighted: f64,
    /// Σ mass × turns taken, over successful outcomes.
    pub turns_weighted: f64,
}

impl Ledger {
    #[must_use]
    pub fn resolved_mass(&self) -> f64 {
        self.success_mass + self.death_mass
    }
}

/// Write access for one turn: the next distribution plus the run's ledger.
#[derive(Debug)]
pub struct Step<'a, S> {
    next: &'a mut Distribution<S>,
    ledger: &'a mut Ledger,
}

impl<S: Ord + Copy> Step<'_, S> {
    pub fn succeed(&mut self, mass: f64, damage_taken: u32, turns: u32) {
        self.ledger.success_mass += mass;
        self.ledger.damage_weighted += mass * f64::from(damage_taken);
        self.ledger.turns_weighted += mass * f64::from(turns);
    }

    pub fn fail(&mut self, mass: f64) {
        self.ledger.death_mass += mass;
    }

    pub fn carry(&mut self, state: S, mass: f64) {
        self.next.add(state, mass);
    }
}

/// Branch `mass` over every damage group and the opponent's crit roll.
///
/// Strikes that take `health` to zero resolve as deaths; the rest are carried
/// into the next turn at the state built by `to_state` from the remaining health.
pub fn counter_attack<S, F>(
    step: &mut Step<'_, S>,
    groups: &[DamageGroup],
    crit_chance: f64,
    health: u32,
    mass: f64,
    to_state: F,
) where
    S: Ord + Copy,
    F: Fn(u32) -> S,
{
    for group in groups {
        let outcomes = [
            (1.0 - crit_chance, group.normal_damage),
            (crit_chance, group.critical_damage),
        ];
        for (chance, damage) in outcomes {
            let branch = mass * group.probability * chance;
            if branch <= 0.0 {
                continue;
            }
            let remaining = health.saturating_sub(damage);
            if remaining == 0 {
                step.fail(branch);
            } else {
                step.carry(to_state(remaining), branch);
            }
        }
    }
}

/// Why the turn loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No live states, or only a negligible tail.
    Drained,
    /// Resolved mass crossed the resolution threshold.
    Resolved,
    /// The model's shortcut fired.
    Shortcut,
    /// The turn cap was reached with states still live.
    TurnLimit,
}

/// Mass accounting for one simulated turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub turn: u32,
    pub live_mass_before: f64,
    pub resolved_mass: f64,
    pub live_mass_after: f64,
    pub live_states: usize,
}

/// Raw result of a run, before conversion into reported statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Final ledger, with any unresolved tail already folded into deaths.
    pub ledger: Ledger,
    pub unresolved_mass: f64,
    pub turns_simulated: u32,
    pub stop_reason: StopReason,
    pub trace: Vec<TurnSummary>,
}

impl SimulationOutcome {
    /// True only when the turn cap ended the run.
    ///
    /// Drained, resolved and shortcut stops may still leave a small live tail; that
    /// tail is folded into deaths and reported through `unresolved_mass`, but it does
    /// not count as hitting the cap.
    #[must_use]
    pub fn hit_iteration_cap(&self) -> bool {
        self.stop_reason == StopReason::TurnLimit
    }
}

/// Run `model` forward until it resolves or `config.max_turns` is reached.
#[must_use]
pub fn simulate<M: TurnModel>(model: &M, config: &PreviewConfig) -> SimulationOutcome {
    let mut current = Distribution::single(model.initial_state());
    let mut ledger = Ledger::default();
    let mut trace = Vec::new();
    let mut stop_reason = StopReason::TurnLimit;
    let mut turns_simulated = 0;

    for turn in 1..=config.max_turns {
        turns_simulated = turn;
        let live_mass_before = current.total_mass();
        let resolved_before = ledger.resolved_mass();

        let mut next = Distribution::new();
        let mut step = Step {
            next: &mut next,
            ledger: &mut ledger,
        };
        for (state, mass) in current.iter() {
            match model.terminal(&state) {
                // Settled before this turn began, so it took one turn fewer.
                Some(Terminal::Success { damage_taken }) => {
                    step.succeed(mass, damage_taken, turn - 1);
                }
                Some(Terminal::Failure) => step.fail(mass),
                None => model.expand(turn, state, mass, &mut step),
            }
        }
        current = next;

        let live_mass_after = current.total_mass();
        let summary = TurnSummary {
            turn,
            live_mass_before,
            resolved_mass: ledger.resolved_mass() - resolved_before,
            live_mass_after,
            live_states: current.len(),
        };
        log::trace!(
            "turn {turn}: {} live states, live mass {live_mass_after:.6}, resolved {:.6}",
            summary.live_states,
            ledger.resolved_mass()
        );
        trace.push(summary);

        if current.is_empty() || live_mass_after < config.negligible_mass {
            stop_reason = StopReason::Drained;
            break;
        }
        if ledger.resolved_mass() > config.resolution_threshold {
            stop_reason = StopReason::Resolved;
            break;
        }
        if model.settles_early(turn, live_mass_after) {
            stop_reason = StopReason::Shortcut;
            break;
        }
    }

    let unresolved_mass = current.total_mass();
    ledger.death_mass += unresolved_mass;
    if stop_reason == StopReason::TurnLimit {
        log::debug!(
            "turn cap {} reached with {unresolved_mass:.6} mass unresolved",
            config.max_turns
        );
    } else {
        log::debug!(
            "simulation stopped after {turns_simulated} turns ({stop_reason:?}), {unresolved_mass:.6} mass unresolved"
        );
    }

    SimulationOutcome {
        ledger,
        unresolved_mass,
        turns_simulated,
        stop_reason,
        trace,
    }
}
