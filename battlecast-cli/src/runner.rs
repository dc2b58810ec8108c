use anyhow::{Context, Result};
use battlecast_game::{
    BattleReport, CombatRules, DiscoveryRewards, ExplorationReport, FleeReport, Preview,
    RiskResult, Slot,
};
use colored::Colorize;
use serde::Serialize;

use crate::scenario::{Analysis, ScenarioFile};

/// Everything one CLI run computed, ready for any report format.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewSummary {
    pub scenario: String,
    pub adventurer_health: u32,
    pub adventurer_level: u16,
    pub changed_slots: Vec<Slot>,
    /// Turn cap the combat previews ran under.
    pub max_turns: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battle: Option<BattleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flee: Option<FleeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambush: Option<RiskResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obstacle: Option<RiskResult>,
    /// Present when both exploration hazards were analyzed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration: Option<ExplorationReport>,
}

pub fn run_analyses<R: CombatRules>(
    preview: &Preview<R>,
    scenario: &ScenarioFile,
    analyses: &[Analysis],
) -> Result<PreviewSummary> {
    let input = &scenario.input;
    let adventurer = input.hypothetical();
    let mut summary = PreviewSummary {
        scenario: scenario.label().to_string(),
        adventurer_health: adventurer.health,
        adventurer_level: preview.rules().level_from_xp(adventurer.xp),
        changed_slots: input.changed_slots(),
        max_turns: preview.config().max_turns,
        battle: None,
        flee: None,
        ambush: None,
        obstacle: None,
        exploration: None,
    };

    for &analysis in analyses {
        if analysis.needs_beast() && scenario.beast.is_none() {
            eprintln!(
                "⚠️  Skipping {} preview: scenario has no beast",
                format!("{analysis:?}").to_lowercase().yellow()
            );
            continue;
        }
        log::info!("running {analysis:?} preview for {}", summary.scenario);
        match (analysis, scenario.beast.as_ref()) {
            (Analysis::Battle, Some(beast)) => {
                summary.battle = Some(
                    preview
                        .battle(input, beast)
                        .context("battle preview failed")?,
                );
            }
            (Analysis::Flee, Some(beast)) => {
                summary.flee = Some(preview.flee(input, beast).context("flee preview failed")?);
            }
            (Analysis::Ambush, _) => {
                summary.ambush = Some(preview.ambush(input).context("ambush preview failed")?);
            }
            (Analysis::Obstacle, _) => {
                summary.obstacle =
                    Some(preview.obstacle(input).context("obstacle preview failed")?);
            }
            _ => {}
        }
    }

    if let (Some(ambush), Some(obstacle)) = (&summary.ambush, &summary.obstacle) {
        summary.exploration = Some(ExplorationReport::combine(
            ambush.clone(),
            obstacle.clone(),
            DiscoveryRewards::for_level(summary.adventurer_level),
        ));
    }

    Ok(summary)
}
