use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::plan::{Milestone, Plan, Task, Workstream};
use crate::model::selection::SelectionSource;

/// Payload for the assistant chat endpoint: the whole plan, the selection
/// captured at send time, and where each resolved selection came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub workstreams: Vec<Workstream>,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
    pub selected_workstream_ids: Vec<u32>,
    pub selected_milestone_ids: Vec<u32>,
    pub selected_task_ids: Vec<u32>,
    pub active_step: u8,
    pub milestone_selection_source: SelectionSource,
    pub task_selection_source: SelectionSource,
}

/// Assistant reply: a chat message plus optional partial replacement lists,
/// one per entity kind. A field that is absent, null, or not a list means
/// "no update for this kind" — never an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub updated_workstreams: Option<Vec<Workstream>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub updated_milestones: Option<Vec<Milestone>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub updated_tasks: Option<Vec<Task>>,
}

fn default_role() -> String {
    "assistant".to_string()
}

/// Accept a JSON array (skipping entries that fail to parse); treat any
/// other value as "no update".
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Payload for the export endpoint: the full plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub workstreams: Vec<Workstream>,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
}

impl ExportRequest {
    pub fn from_plan(plan: &Plan) -> Self {
        ExportRequest {
            workstreams: plan.workstreams.clone(),
            milestones: plan.milestones.clone(),
            tasks: plan.tasks.clone(),
        }
    }
}

/// The downloadable file handed back by the export service.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}
