use anyhow::{Context, Result};
use battlecast_game::{Beast, PreviewConfig, PreviewInput};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A preview request on disk: the adventurer, the changes under consideration
/// and, for combat previews, the beast being faced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub name: Option<String>,
    pub input: PreviewInput,
    #[serde(default)]
    pub beast: Option<Beast>,
}

impl ScenarioFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed scenario")
    }
}

pub fn load_config(path: Option<&Path>) -> Result<PreviewConfig> {
    let Some(path) = path else {
        return Ok(PreviewConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    PreviewConfig::from_json(&raw).with_context(|| format!("invalid config {}", path.display()))
}

/// Previews the CLI can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Analysis {
    Battle,
    Flee,
    Ambush,
    Obstacle,
}

impl Analysis {
    pub const ALL: [Self; 4] = [Self::Battle, Self::Flee, Self::Ambush, Self::Obstacle];

    fn parse(token: &str) -> Option<Self> {
        match token {
            "battle" => Some(Self::Battle),
            "flee" => Some(Self::Flee),
            "ambush" => Some(Self::Ambush),
            "obstacle" => Some(Self::Obstacle),
            _ => None,
        }
    }

    pub const fn needs_beast(self) -> bool {
        matches!(self, Self::Battle | Self::Flee)
    }
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_lowercase())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Expand a comma-separated analysis list; `all` selects every analysis.
///
/// Unknown names are returned separately so the caller can warn about them.
pub fn expand_analyses(arg: &str) -> (Vec<Analysis>, Vec<String>) {
    let mut selected = Vec::new();
    let mut unknown = Vec::new();
    for token in split_csv(arg) {
        if token == "all" {
            selected.extend(Analysis::ALL);
        } else if let Some(analysis) = Analysis::parse(&token) {
            selected.push(analysis);
        } else {
            unknown.push(token);
        }
    }
    selected.sort_unstable();
    selected.dedup();
    (selected, unknown)
}
