use crate::model::plan::{next_id, Milestone, Plan, Task, Workstream};
use crate::model::selection::{EntityKind, Selection};

/// Error type for direct plan edits
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("workstream not found: {0}")]
    WorkstreamNotFound(u32),
    #[error("milestone not found: {0}")]
    MilestoneNotFound(u32),
    #[error("task not found: {0}")]
    TaskNotFound(u32),
    #[error("unknown field for {kind}: {field}")]
    UnknownField { kind: &'static str, field: String },
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Append a new workstream with a minted ID. Returns the ID.
pub fn add_workstream(plan: &mut Plan, name: Option<String>) -> u32 {
    let id = next_id(&plan.workstreams);
    plan.workstreams.push(Workstream {
        id,
        name: name.unwrap_or_else(|| format!("Workstream {}", id)),
        description: "Workstream Description".to_string(),
    });
    id
}

/// Append a new milestone under `workstream_id` with a minted ID.
pub fn add_milestone(
    plan: &mut Plan,
    workstream_id: u32,
    name: Option<String>,
) -> Result<u32, PlanError> {
    if plan.workstream(workstream_id).is_none() {
        return Err(PlanError::WorkstreamNotFound(workstream_id));
    }
    let id = next_id(&plan.milestones);
    plan.milestones.push(Milestone {
        id,
        workstream_id,
        name: name.unwrap_or_else(|| format!("Milestone {}", id)),
        description: String::new(),
        start_date: None,
        end_date: None,
    });
    Ok(id)
}

/// Append a new task under `milestone_id` with a minted ID.
pub fn add_task(plan: &mut Plan, milestone_id: u32, name: Option<String>) -> Result<u32, PlanError> {
    if plan.milestone(milestone_id).is_none() {
        return Err(PlanError::MilestoneNotFound(milestone_id));
    }
    let id = next_id(&plan.tasks);
    plan.tasks.push(Task {
        id,
        milestone_id,
        name: name.unwrap_or_else(|| format!("Task {}", id)),
        description: "Task Description".to_string(),
        owner: String::new(),
        start_date: None,
        end_date: None,
    });
    Ok(id)
}

// ---------------------------------------------------------------------------
// Remove
// ---------------------------------------------------------------------------

/// Remove a workstream, cascading to its milestones and their tasks, and
/// prune the selection. Removal is consistent top-down here; only the
/// assistant-merge path leaves orphans behind.
pub fn remove_workstream(
    plan: &mut Plan,
    selection: &mut Selection,
    id: u32,
) -> Result<(), PlanError> {
    if plan.workstream(id).is_none() {
        return Err(PlanError::WorkstreamNotFound(id));
    }
    plan.workstreams.retain(|ws| ws.id != id);
    let dead_ms: Vec<u32> = plan
        .milestones
        .iter()
        .filter(|ms| ms.workstream_id == id)
        .map(|ms| ms.id)
        .collect();
    plan.milestones.retain(|ms| ms.workstream_id != id);
    plan.tasks.retain(|t| !dead_ms.contains(&t.milestone_id));

    let live_ws: Vec<u32> = plan.workstreams.iter().map(|ws| ws.id).collect();
    let live_ms: Vec<u32> = plan.milestones.iter().map(|ms| ms.id).collect();
    let live_tasks: Vec<u32> = plan.tasks.iter().map(|t| t.id).collect();
    selection.retain_live(EntityKind::Workstream, &live_ws);
    selection.retain_live(EntityKind::Milestone, &live_ms);
    selection.retain_live(EntityKind::Task, &live_tasks);
    Ok(())
}

/// Remove a milestone and its tasks, pruning the selection.
pub fn remove_milestone(
    plan: &mut Plan,
    selection: &mut Selection,
    id: u32,
) -> Result<(), PlanError> {
    if plan.milestone(id).is_none() {
        return Err(PlanError::MilestoneNotFound(id));
    }
    plan.milestones.retain(|ms| ms.id != id);
    plan.tasks.retain(|t| t.milestone_id != id);

    let live_ms: Vec<u32> = plan.milestones.iter().map(|ms| ms.id).collect();
    let live_tasks: Vec<u32> = plan.tasks.iter().map(|t| t.id).collect();
    selection.retain_live(EntityKind::Milestone, &live_ms);
    selection.retain_live(EntityKind::Task, &live_tasks);
    Ok(())
}

/// Remove a single task, pruning the selection.
pub fn remove_task(plan: &mut Plan, selection: &mut Selection, id: u32) -> Result<(), PlanError> {
    if plan.task(id).is_none() {
        return Err(PlanError::TaskNotFound(id));
    }
    plan.tasks.retain(|t| t.id != id);
    let live_tasks: Vec<u32> = plan.tasks.iter().map(|t| t.id).collect();
    selection.retain_live(EntityKind::Task, &live_tasks);
    Ok(())
}

// ---------------------------------------------------------------------------
// Field edits (replace-by-id)
// ---------------------------------------------------------------------------

pub fn set_workstream_field(
    plan: &mut Plan,
    id: u32,
    field: &str,
    value: &str,
) -> Result<(), PlanError> {
    let ws = plan
        .workstreams
        .iter_mut()
        .find(|ws| ws.id == id)
        .ok_or(PlanError::WorkstreamNotFound(id))?;
    match field {
        "name" => ws.name = value.to_string(),
        "description" => ws.description = value.to_string(),
        _ => {
            return Err(PlanError::UnknownField {
                kind: "workstream",
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

pub fn set_milestone_field(
    plan: &mut Plan,
    id: u32,
    field: &str,
    value: &str,
) -> Result<(), PlanError> {
    let ms = plan
        .milestones
        .iter_mut()
        .find(|ms| ms.id == id)
        .ok_or(PlanError::MilestoneNotFound(id))?;
    match field {
        "name" => ms.name = value.to_string(),
        "description" => ms.description = value.to_string(),
        "start-date" => ms.start_date = non_empty(value),
        "end-date" => ms.end_date = non_empty(value),
        _ => {
            return Err(PlanError::UnknownField {
                kind: "milestone",
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

pub fn set_task_field(plan: &mut Plan, id: u32, field: &str, value: &str) -> Result<(), PlanError> {
    let task = plan
        .tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(PlanError::TaskNotFound(id))?;
    match field {
        "name" => task.name = value.to_string(),
        "description" => task.description = value.to_string(),
        "owner" => task.owner = value.to_string(),
        "start-date" => task.start_date = non_empty(value),
        "end-date" => task.end_date = non_empty(value),
        _ => {
            return Err(PlanError::UnknownField {
                kind: "task",
                field: field.to_string(),
            });
        }
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
