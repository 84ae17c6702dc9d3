use serde::Serialize;

use crate::model::plan::Plan;
use crate::model::selection::{PlanStep, Selection};
use crate::session::Session;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ShowJson<'a> {
    pub step: u8,
    pub plan: &'a Plan,
    pub selection: &'a Selection,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl<'a> ShowJson<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        ShowJson {
            step: session.step.number(),
            plan: &session.plan,
            selection: &session.selection,
            can_undo: session.history.can_undo(),
            can_redo: session.history.can_redo(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn date_range(start: Option<&str>, end: Option<&str>) -> String {
    match (start, end) {
        (None, None) => String::new(),
        (start, end) => format!(
            "  [{} -> {}]",
            start.unwrap_or("?"),
            end.unwrap_or("?")
        ),
    }
}

fn marker(selected: bool) -> &'static str {
    if selected { "*" } else { " " }
}

/// Render the plan outline. Milestones and tasks appear under their parent;
/// an entity whose parent no longer exists is simply not rendered.
pub fn render_outline(session: &Session) -> String {
    let plan = &session.plan;
    let selection = &session.selection;
    let mut out = String::new();

    out.push_str(&format!("Step {} of 3\n", session.step.number()));
    for ws in &plan.workstreams {
        out.push_str(&format!(
            "{}[{}] {} - {}\n",
            marker(selection.workstream_ids().contains(&ws.id)),
            ws.id,
            ws.name,
            ws.description
        ));
        if session.step == PlanStep::Workstreams {
            continue;
        }
        for ms in plan.milestones.iter().filter(|ms| ms.workstream_id == ws.id) {
            out.push_str(&format!(
                "  {}[{}] {}{}\n",
                marker(selection.milestone_ids().contains(&ms.id)),
                ms.id,
                ms.name,
                date_range(ms.start_date.as_deref(), ms.end_date.as_deref())
            ));
            if session.step != PlanStep::Tasks {
                continue;
            }
            for task in plan.tasks.iter().filter(|t| t.milestone_id == ms.id) {
                let owner = if task.owner.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", task.owner)
                };
                out.push_str(&format!(
                    "    {}[{}] {}{}\n",
                    marker(selection.task_ids().contains(&task.id)),
                    task.id,
                    task.name,
                    owner
                ));
            }
        }
    }

    let undo = if session.history.can_undo() { "undo" } else { "-" };
    let redo = if session.history.can_redo() { "redo" } else { "-" };
    out.push_str(&format!("({} / {} available)\n", undo, redo));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use crate::model::plan::{Milestone, Task};
    use crate::model::selection::EntityKind;

    fn sample_session() -> Session {
        let mut session = Session::new(&AppConfig::default());
        session.plan.milestones = vec![Milestone {
            id: 1,
            workstream_id: 1,
            name: "Kickoff".into(),
            description: String::new(),
            start_date: Some("2025-01-01".into()),
            end_date: Some("2025-02-01".into()),
        }];
        session.plan.tasks = vec![Task {
            id: 1,
            milestone_id: 1,
            name: "Draft".into(),
            description: String::new(),
            owner: "sam".into(),
            start_date: None,
            end_date: None,
        }];
        session
    }

    #[test]
    fn outline_depth_follows_the_active_step() {
        let mut session = sample_session();
        let step1 = render_outline(&session);
        assert!(step1.contains("Workstream 1"));
        assert!(!step1.contains("Kickoff"));

        session.step = PlanStep::Milestones;
        let step2 = render_outline(&session);
        assert!(step2.contains("Kickoff"));
        assert!(!step2.contains("Draft"));

        session.step = PlanStep::Tasks;
        let step3 = render_outline(&session);
        assert!(step3.contains("Draft"));
        assert!(step3.contains("(sam)"));
    }

    #[test]
    fn selected_rows_are_marked() {
        let mut session = sample_session();
        session.step = PlanStep::Milestones;
        session.select_replace(EntityKind::Milestone, 1);
        let text = render_outline(&session);
        assert!(text.contains("*[1] Kickoff"));
    }

    #[test]
    fn orphaned_milestones_are_not_rendered() {
        let mut session = sample_session();
        session.step = PlanStep::Milestones;
        session.plan.milestones[0].workstream_id = 99;
        let text = render_outline(&session);
        assert!(!text.contains("Kickoff"));
    }

    #[test]
    fn show_json_reflects_history_flags() {
        let mut session = sample_session();
        session.add_workstream(None);
        let json = serde_json::to_value(ShowJson::from_session(&session)).unwrap();
        assert_eq!(json["can_undo"], true);
        assert_eq!(json["can_redo"], false);
        assert_eq!(json["step"], 1);
    }
}
