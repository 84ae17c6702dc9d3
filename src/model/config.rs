use serde::{Deserialize, Serialize};

use super::plan::Workstream;

/// Configuration from workplan.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the assistant/export backend
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Access password for the login gate
    #[serde(default = "default_password")]
    pub access_password: String,
    /// Maximum undo/redo snapshots kept
    #[serde(default = "default_history_cap")]
    pub history_cap: usize,
    /// Workstreams a fresh plan is seeded with
    #[serde(default = "default_seed_workstreams")]
    pub seed_workstreams: Vec<SeedWorkstream>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedWorkstream {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            api_base: default_api_base(),
            access_password: default_password(),
            history_cap: default_history_cap(),
            seed_workstreams: default_seed_workstreams(),
        }
    }
}

impl AppConfig {
    /// Materialize the seed workstreams with freshly numbered IDs.
    pub fn seed_plan_workstreams(&self) -> Vec<Workstream> {
        self.seed_workstreams
            .iter()
            .enumerate()
            .map(|(i, seed)| Workstream {
                id: (i + 1) as u32,
                name: seed.name.clone(),
                description: seed.description.clone(),
            })
            .collect()
    }
}

fn default_api_base() -> String {
    "http://localhost:8001".to_string()
}

fn default_password() -> String {
    "Workplan2025!".to_string()
}

fn default_history_cap() -> usize {
    50
}

fn default_seed_workstreams() -> Vec<SeedWorkstream> {
    (1..=4)
        .map(|n| SeedWorkstream {
            name: format!("Workstream {}", n),
            description: "Workstream Description".to_string(),
        })
        .collect()
}
