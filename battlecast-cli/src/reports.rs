use anyhow::Result;
use battlecast_game::{
    AggregateResult, BattleReport, EscapeOutlook, ExplorationReport, FleeReport, Outlook,
    RiskResult, TurnSummary,
};
use colored::{ColoredString, Colorize};
use std::io::Write;

use crate::runner::PreviewSummary;

fn paint(text: String, outlook: Outlook) -> ColoredString {
    match outlook {
        Outlook::Favorable => text.green(),
        Outlook::Uncertain => text.yellow(),
        Outlook::Dire => text.red(),
    }
}

fn cap_note(result: &AggregateResult) -> String {
    if result.hit_iteration_cap {
        format!(
            " (turn cap {} reached, {:.2}% unresolved counted as death)",
            result.turns_simulated,
            result.unresolved_mass * 100.0
        )
    } else {
        String::new()
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    summary: &PreviewSummary,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "{}", "⚔️  Battlecast Preview".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;
    writeln!(out, "Scenario: {}", summary.scenario.bold())?;
    writeln!(
        out,
        "Adventurer: level {}, {} health",
        summary.adventurer_level, summary.adventurer_health
    )?;
    writeln!(out, "Turn cap: {}", summary.max_turns)?;
    if !summary.changed_slots.is_empty() {
        let slots: Vec<String> = summary.changed_slots.iter().map(ToString::to_string).collect();
        writeln!(
            out,
            "{}",
            format!("Gear changes: {} (first action forfeited)", slots.join(", ")).yellow()
        )?;
    }
    writeln!(out)?;

    if let Some(battle) = &summary.battle {
        console_battle(out, battle, verbose)?;
    }
    if let Some(flee) = &summary.flee {
        console_flee(out, flee, verbose)?;
    }
    if let Some(exploration) = &summary.exploration {
        console_exploration(out, exploration)?;
    } else {
        if let Some(ambush) = &summary.ambush {
            console_risk(out, "Ambush", ambush)?;
        }
        if let Some(obstacle) = &summary.obstacle {
            console_risk(out, "Obstacle", obstacle)?;
        }
    }
    Ok(())
}

fn console_battle(out: &mut dyn Write, battle: &BattleReport, verbose: bool) -> Result<()> {
    let result = &battle.result;
    writeln!(out, "{}", "🗡️  Battle".bright_yellow().bold())?;
    if battle.from_current_state {
        writeln!(
            out,
            "   Resuming fight: beast at {} health",
            battle.starting_beast_health
        )?;
    }
    writeln!(
        out,
        "   Your hit: {} normal / {} critical",
        battle.attack.normal, battle.attack.critical
    )?;
    for group in &battle.damage_groups {
        let slots: Vec<&str> = group.slots.iter().map(|slot| slot.label()).collect();
        writeln!(
            out,
            "   Beast hit on {}: {} / {} ({:.0}%)",
            slots.join("+"),
            group.normal_damage,
            group.critical_damage,
            group.probability * 100.0
        )?;
    }
    writeln!(
        out,
        "   Win chance: {}{}",
        paint(
            format!("{:.2}%", result.success_percent()),
            Outlook::of_success(result.success_probability)
        ),
        cap_note(result)
    )?;
    writeln!(
        out,
        "   Death chance: {}",
        paint(
            format!("{:.2}%", result.death_percent()),
            Outlook::of_death(result.death_probability)
        )
    )?;
    writeln!(
        out,
        "   On a win: {:.1} damage taken over {:.1} turns",
        result.average_damage_on_success, result.average_turns_to_success
    )?;
    let rewards = &battle.rewards;
    write!(out, "   Rewards: {} XP, {} gold", rewards.xp, rewards.gold)?;
    if rewards.levels_up {
        write!(out, " {}", format!("→ level {}", rewards.new_level).bright_green())?;
    }
    writeln!(out)?;
    if verbose {
        console_trace(out, &battle.trace)?;
    }
    writeln!(out)?;
    Ok(())
}

fn console_flee(out: &mut dyn Write, flee: &FleeReport, verbose: bool) -> Result<()> {
    let result = &flee.result;
    writeln!(out, "{}", "🏃 Flee".bright_yellow().bold())?;
    writeln!(out, "   Chance per attempt: {:.1}%", flee.flee_chance_percent)?;
    match flee.outlook {
        EscapeOutlook::Guaranteed => writeln!(out, "   {}", "Escape is guaranteed".green())?,
        EscapeOutlook::Impossible => writeln!(out, "   {}", "Escape is impossible".red())?,
        EscapeOutlook::Uncertain => {
            writeln!(
                out,
                "   Escape chance: {}{}",
                paint(
                    format!("{:.2}%", result.success_percent()),
                    Outlook::of_success(result.success_probability)
                ),
                cap_note(result)
            )?;
            writeln!(
                out,
                "   Death chance: {}",
                paint(
                    format!("{:.2}%", result.death_percent()),
                    Outlook::of_flee_death(result.death_probability)
                )
            )?;
            writeln!(
                out,
                "   On escape: {:.1} damage taken over {:.1} attempts",
                result.average_damage_on_success, result.average_turns_to_success
            )?;
        }
    }
    if verbose {
        console_trace(out, &flee.trace)?;
    }
    writeln!(out)?;
    Ok(())
}

fn console_risk(out: &mut dyn Write, label: &str, risk: &RiskResult) -> Result<()> {
    writeln!(
        out,
        "{}: instant death {} per step, {} average damage otherwise",
        label.bright_yellow().bold(),
        paint(
            format!("{:.2}%", risk.instant_death_probability),
            Outlook::of_event_risk(risk.instant_death_probability)
        ),
        risk.average_non_fatal_damage
    )?;
    Ok(())
}

fn console_exploration(out: &mut dyn Write, exploration: &ExplorationReport) -> Result<()> {
    writeln!(out, "{}", "🧭 Exploration".bright_yellow().bold())?;
    console_risk(out, "   Ambush", &exploration.ambush)?;
    console_risk(out, "   Obstacle", &exploration.obstacle)?;
    writeln!(
        out,
        "   Combined: {} instant death, {:.1} average damage",
        paint(
            format!("{:.2}%", exploration.cumulative_death_percent),
            Outlook::of_cumulative_risk(exploration.cumulative_death_percent)
        ),
        exploration.cumulative_average_damage
    )?;
    let discovery = &exploration.discovery;
    writeln!(
        out,
        "   Discoveries: gold {:.1}% (avg {:.1}), health {:.1}% (avg {:.1}), loot {:.1}%",
        discovery.gold_chance,
        discovery.average_gold,
        discovery.health_chance,
        discovery.average_health,
        discovery.loot_chance
    )?;
    writeln!(out)?;
    Ok(())
}

fn console_trace(out: &mut dyn Write, trace: &[TurnSummary]) -> Result<()> {
    for turn in trace {
        writeln!(
            out,
            "     turn {:>2}: resolved {:.6}, live {:.6} over {} states",
            turn.turn, turn.resolved_mass, turn.live_mass_after, turn.live_states
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, summary: &PreviewSummary) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, summary: &PreviewSummary) -> Result<()> {
    writeln!(out, "# Battlecast Preview: {}\n", summary.scenario)?;
    writeln!(out, "- **Level**: {}", summary.adventurer_level)?;
    writeln!(out, "- **Health**: {}", summary.adventurer_health)?;
    writeln!(out, "- **Turn cap**: {}", summary.max_turns)?;
    if !summary.changed_slots.is_empty() {
        let slots: Vec<String> = summary.changed_slots.iter().map(ToString::to_string).collect();
        writeln!(out, "- **Gear changes**: {}", slots.join(", "))?;
    }
    writeln!(out)?;

    let combat = [
        ("Battle", summary.battle.as_ref().map(|b| &b.result)),
        ("Flee", summary.flee.as_ref().map(|f| &f.result)),
    ];
    if combat.iter().any(|(_, result)| result.is_some()) {
        writeln!(out, "## Combat\n")?;
        writeln!(out, "| Action | Success | Death | Avg damage | Avg turns | Capped |")?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for (label, result) in combat {
            if let Some(result) = result {
                writeln!(
                    out,
                    "| {label} | {:.2}% | {:.2}% | {:.1} | {:.1} | {} |",
                    result.success_percent(),
                    result.death_percent(),
                    result.average_damage_on_success,
                    result.average_turns_to_success,
                    if result.hit_iteration_cap { "yes" } else { "no" }
                )?;
            }
        }
        writeln!(out)?;
    }
    if let Some(battle) = &summary.battle {
        let rewards = &battle.rewards;
        writeln!(
            out,
            "Battle rewards: {} XP, {} gold{}\n",
            rewards.xp,
            rewards.gold,
            if rewards.levels_up {
                format!(", levels up to {}", rewards.new_level)
            } else {
                String::new()
            }
        )?;
    }

    let hazards = [("Ambush", &summary.ambush), ("Obstacle", &summary.obstacle)];
    if hazards.iter().any(|(_, risk)| risk.is_some()) {
        writeln!(out, "## Exploration\n")?;
        writeln!(out, "| Event | Instant death | Avg damage |")?;
        writeln!(out, "|---|---|---|")?;
        for (label, risk) in hazards {
            if let Some(risk) = risk {
                writeln!(
                    out,
                    "| {label} | {:.2}% | {} |",
                    risk.instant_death_probability, risk.average_non_fatal_damage
                )?;
            }
        }
        if let Some(exploration) = &summary.exploration {
            writeln!(
                out,
                "| Combined | {:.2}% | {:.1} |",
                exploration.cumulative_death_percent, exploration.cumulative_average_damage
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run_analyses;
    use crate::scenario::{Analysis, ScenarioFile};
    use battlecast_game::{Adventurer, Beast, BeastType, Preview, PreviewInput};

    fn summary() -> PreviewSummary {
        let mut beast = Beast::nameless(4, 3, BeastType::Hunter);
        beast.health = 30;
        let mut adventurer = Adventurer {
            health: 70,
            xp: 81,
            ..Adventurer::default()
        };
        adventurer.stats.dexterity = 4;
        let scenario = ScenarioFile {
            name: Some("goblin ambush".to_string()),
            input: PreviewInput::new(adventurer),
            beast: Some(beast),
        };
        run_analyses(&Preview::standard(), &scenario, &Analysis::ALL).expect("preview runs")
    }

    #[test]
    fn markdown_lists_every_section() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# Battlecast Preview: goblin ambush"));
        assert!(text.contains("| Battle |"));
        assert!(text.contains("| Flee |"));
        assert!(text.contains("| Combined |"));
        assert!(text.contains("- **Turn cap**: 50"));
    }

    #[test]
    fn json_report_parses_back() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &summary()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["scenario"], "goblin ambush");
        assert!(value["battle"]["result"]["success_probability"].is_number());
        assert!(value["exploration"]["discovery"]["average_health"].is_number());
    }

    #[test]
    fn console_trace_only_when_verbose() {
        let summary = summary();
        let mut quiet = Vec::new();
        generate_console_report(&mut quiet, &summary, false).unwrap();
        let mut loud = Vec::new();
        generate_console_report(&mut loud, &summary, true).unwrap();
        let quiet = String::from_utf8(quiet).unwrap();
        let loud = String::from_utf8(loud).unwrap();
        assert!(!quiet.contains("turn  1:"));
        assert!(loud.contains("turn  1:"));
    }
}
