use std::collections::HashSet;

use crate::model::plan::Plan;
use crate::model::selection::{PlanStep, Selection, SelectionSource};

/// A selection resolved to concrete IDs plus the granularity it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSelection {
    pub ids: Vec<u32>,
    pub source: SelectionSource,
}

impl EffectiveSelection {
    pub fn all() -> Self {
        EffectiveSelection {
            ids: Vec::new(),
            source: SelectionSource::All,
        }
    }
}

/// The milestone IDs the current selection implies: an explicit milestone
/// selection verbatim, else every milestone under the selected workstreams,
/// else everything.
pub fn effective_milestone_selection(plan: &Plan, selection: &Selection) -> EffectiveSelection {
    let ms_ids = selection.milestone_ids();
    if !ms_ids.is_empty() {
        return EffectiveSelection {
            ids: ms_ids.to_vec(),
            source: SelectionSource::Milestone,
        };
    }
    let ws_ids = selection.workstream_ids();
    if !ws_ids.is_empty() {
        return EffectiveSelection {
            ids: plan.milestone_ids_in_workstreams(ws_ids),
            source: SelectionSource::Workstream,
        };
    }
    EffectiveSelection::all()
}

/// The task IDs the current selection implies. Falls back through milestone
/// and workstream granularity, reusing an already-resolved milestone
/// selection when it produced anything.
pub fn effective_task_selection(
    plan: &Plan,
    selection: &Selection,
    milestone_selection: &EffectiveSelection,
) -> EffectiveSelection {
    let task_ids = selection.task_ids();
    if !task_ids.is_empty() {
        return EffectiveSelection {
            ids: task_ids.to_vec(),
            source: SelectionSource::Task,
        };
    }
    let ms_ids = selection.milestone_ids();
    if !ms_ids.is_empty() {
        return EffectiveSelection {
            ids: plan.task_ids_in_milestones(ms_ids),
            source: SelectionSource::Milestone,
        };
    }
    let ws_ids = selection.workstream_ids();
    if !ws_ids.is_empty() {
        let allowed = if milestone_selection.ids.is_empty() {
            plan.milestone_ids_in_workstreams(ws_ids)
        } else {
            milestone_selection.ids.clone()
        };
        return EffectiveSelection {
            ids: plan.task_ids_in_milestones(&allowed),
            source: SelectionSource::Workstream,
        };
    }
    EffectiveSelection::all()
}

/// The context-sensitive select-all command. One command, an escalation
/// ladder: partial within a parent → full within that parent → all parents.
/// Any ambiguity (children spanning multiple parents) falls through to the
/// broadest action, selecting every workstream.
pub fn select_all(plan: &Plan, selection: &Selection, step: PlanStep) -> Selection {
    let all_workstreams =
        Selection::Workstreams(plan.workstreams.iter().map(|ws| ws.id).collect());

    match step {
        PlanStep::Workstreams => all_workstreams,
        PlanStep::Milestones => {
            let ms_ids = selection.milestone_ids();
            if let Some(shared_ws) = single_parent_workstream(plan, ms_ids) {
                let in_ws = plan.milestone_ids_in_workstreams(&[shared_ws]);
                let has_full_ws = !in_ws.is_empty() && ms_ids.len() == in_ws.len();
                if !has_full_ws {
                    return Selection::Milestones(in_ws);
                }
            }
            all_workstreams
        }
        PlanStep::Tasks => {
            let task_ids = selection.task_ids();
            let target_ms = single_parent_milestone(plan, task_ids);
            let tasks_of_ms = target_ms
                .map(|ms| plan.task_ids_in_milestones(&[ms]))
                .unwrap_or_default();

            // Partial task selection within one milestone: complete it.
            if target_ms.is_some() && !task_ids.is_empty() && task_ids.len() < tasks_of_ms.len()
            {
                return Selection::Tasks(tasks_of_ms);
            }

            // Otherwise escalate toward the milestone set of one workstream:
            // either from an explicit milestone selection, or from a full
            // task selection of one milestone.
            let ms_ids = selection.milestone_ids();
            let context = if let Some(shared_ws) = single_parent_workstream(plan, ms_ids) {
                let in_ws = plan.milestone_ids_in_workstreams(&[shared_ws]);
                let already_all = !in_ws.is_empty() && ms_ids.len() == in_ws.len();
                Some((in_ws, already_all))
            } else if let Some(ms) = target_ms
                && !task_ids.is_empty()
                && task_ids.len() == tasks_of_ms.len()
                && !tasks_of_ms.is_empty()
                && let Some(milestone) = plan.milestone(ms)
            {
                let in_ws = plan.milestone_ids_in_workstreams(&[milestone.workstream_id]);
                Some((in_ws, false))
            } else {
                None
            };

            if let Some((milestone_ids, already_all)) = context
                && !already_all
            {
                return Selection::Milestones(milestone_ids);
            }
            all_workstreams
        }
    }
}

/// The single workstream shared by all the given milestones, or `None` when
/// the set is empty or spans several workstreams.
fn single_parent_workstream(plan: &Plan, ms_ids: &[u32]) -> Option<u32> {
    if ms_ids.is_empty() {
        return None;
    }
    let parents: HashSet<u32> = ms_ids
        .iter()
        .filter_map(|id| plan.milestone(*id))
        .map(|ms| ms.workstream_id)
        .collect();
    if parents.len() == 1 {
        parents.into_iter().next()
    } else {
        None
    }
}

fn single_parent_milestone(plan: &Plan, task_ids: &[u32]) -> Option<u32> {
    if task_ids.is_empty() {
        return None;
    }
    let parents: HashSet<u32> = task_ids
        .iter()
        .filter_map(|id| plan.task(*id))
        .map(|t| t.milestone_id)
        .collect();
    if parents.len() == 1 {
        parents.into_iter().next()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plan::{Milestone, Task, Workstream};
    use pretty_assertions::assert_eq;

    fn sample_plan() -> Plan {
        let ws = |id: u32| Workstream {
            id,
            name: format!("ws {}", id),
            description: String::new(),
        };
        let ms = |id: u32, workstream_id: u32| Milestone {
            id,
            workstream_id,
            name: format!("ms {}", id),
            description: String::new(),
            start_date: None,
            end_date: None,
        };
        let task = |id: u32, milestone_id: u32| Task {
            id,
            milestone_id,
            name: format!("task {}", id),
            description: String::new(),
            owner: String::new(),
            start_date: None,
            end_date: None,
        };
        Plan {
            workstreams: vec![ws(1), ws(2)],
            milestones: vec![ms(10, 1), ms(11, 1), ms(20, 2)],
            tasks: vec![task(100, 10), task(101, 10), task(110, 11), task(200, 20)],
        }
    }

    // --- resolver ---

    #[test]
    fn explicit_milestone_selection_wins_verbatim() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![11, 10]);
        let eff = effective_milestone_selection(&plan, &sel);
        assert_eq!(eff.ids, vec![11, 10]);
        assert_eq!(eff.source, SelectionSource::Milestone);
    }

    #[test]
    fn workstream_selection_derives_its_milestones() {
        let plan = sample_plan();
        let sel = Selection::Workstreams(vec![1]);
        let eff = effective_milestone_selection(&plan, &sel);
        assert_eq!(eff.ids, vec![10, 11]);
        assert_eq!(eff.source, SelectionSource::Workstream);
    }

    #[test]
    fn empty_selection_resolves_to_all() {
        let plan = sample_plan();
        let eff = effective_milestone_selection(&plan, &Selection::None);
        assert!(eff.ids.is_empty());
        assert_eq!(eff.source, SelectionSource::All);
    }

    #[test]
    fn task_selection_falls_back_through_milestones() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10]);
        let ms_eff = effective_milestone_selection(&plan, &sel);
        let eff = effective_task_selection(&plan, &sel, &ms_eff);
        assert_eq!(eff.ids, vec![100, 101]);
        assert_eq!(eff.source, SelectionSource::Milestone);
    }

    #[test]
    fn task_selection_falls_back_through_workstreams() {
        let plan = sample_plan();
        let sel = Selection::Workstreams(vec![1]);
        let ms_eff = effective_milestone_selection(&plan, &sel);
        let eff = effective_task_selection(&plan, &sel, &ms_eff);
        assert_eq!(eff.ids, vec![100, 101, 110]);
        assert_eq!(eff.source, SelectionSource::Workstream);
    }

    // --- select-all ladder ---

    #[test]
    fn workstream_step_always_selects_all_workstreams() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Workstreams),
            Selection::Workstreams(vec![1, 2])
        );
    }

    #[test]
    fn milestone_step_completes_partial_selection_within_workstream() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Milestones),
            Selection::Milestones(vec![10, 11])
        );
    }

    #[test]
    fn milestone_step_escalates_full_workstream_to_all_workstreams() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10, 11]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Milestones),
            Selection::Workstreams(vec![1, 2])
        );
    }

    #[test]
    fn milestone_step_with_multi_parent_selection_falls_through() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10, 20]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Milestones),
            Selection::Workstreams(vec![1, 2])
        );
    }

    #[test]
    fn task_step_completes_partial_selection_within_milestone() {
        let plan = sample_plan();
        let sel = Selection::Tasks(vec![100]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Tasks),
            Selection::Tasks(vec![100, 101])
        );
    }

    #[test]
    fn task_step_escalates_full_milestone_to_its_milestone_set() {
        let plan = sample_plan();
        let sel = Selection::Tasks(vec![100, 101]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Tasks),
            Selection::Milestones(vec![10, 11])
        );
    }

    #[test]
    fn task_step_escalates_milestone_selection_to_full_set() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Tasks),
            Selection::Milestones(vec![10, 11])
        );
    }

    #[test]
    fn task_step_with_full_milestone_set_goes_to_all_workstreams() {
        let plan = sample_plan();
        let sel = Selection::Milestones(vec![10, 11]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Tasks),
            Selection::Workstreams(vec![1, 2])
        );
    }

    #[test]
    fn task_step_with_tasks_across_milestones_falls_through() {
        let plan = sample_plan();
        let sel = Selection::Tasks(vec![100, 110]);
        assert_eq!(
            select_all(&plan, &sel, PlanStep::Tasks),
            Selection::Workstreams(vec![1, 2])
        );
    }

    #[test]
    fn task_step_with_nothing_selected_selects_all_workstreams() {
        let plan = sample_plan();
        assert_eq!(
            select_all(&plan, &Selection::None, PlanStep::Tasks),
            Selection::Workstreams(vec![1, 2])
        );
    }
}
