use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::model::chat::ChatLog;
use crate::model::config::AppConfig;
use crate::model::plan::Plan;
use crate::model::selection::{EntityKind, PlanStep, Selection, SelectionSource};
use crate::ops::plan_ops::{self, PlanError};
use crate::ops::select::{self, EffectiveSelection};
use crate::ops::{dates, merge, reorder};
use crate::remote::protocol::{ChatRequest, ChatResponse};

/// Scripted reply shown when the chat request never came back.
pub const CHAT_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't reach the backend. Please try again in a moment.";

/// The selection context frozen at the moment a chat request is sent. The
/// response is merged against this, not against whatever the selection has
/// become since.
#[derive(Debug, Clone)]
pub struct CapturedSelection {
    pub workstream_ids: Vec<u32>,
    pub milestones: EffectiveSelection,
    pub tasks: EffectiveSelection,
}

/// All live editor state: the plan, the selection, the undo history, the
/// chat transcript, and the in-flight flag. Every mutation funnels through
/// here so each committed change lands as exactly one history snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub plan: Plan,
    pub selection: Selection,
    pub step: PlanStep,
    pub chat: ChatLog,
    pub history: History,
    #[serde(default)]
    pub busy: bool,
    /// Set by undo/redo so the restore itself is not re-captured.
    #[serde(skip)]
    restoring: bool,
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        let plan = Plan {
            workstreams: config.seed_plan_workstreams(),
            milestones: Vec::new(),
            tasks: Vec::new(),
        };
        Session {
            history: History::new(plan.clone(), config.history_cap),
            plan,
            selection: Selection::None,
            step: PlanStep::default(),
            chat: ChatLog::default(),
            busy: false,
            restoring: false,
        }
    }

    /// Record the current plan as a history snapshot — unless this change is
    /// an undo/redo restore, which consumes the suppression flag instead.
    fn commit(&mut self) {
        if self.restoring {
            self.restoring = false;
            return;
        }
        self.history.record(&self.plan);
    }

    // -----------------------------------------------------------------------
    // Undo / redo
    // -----------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.plan = snapshot;
        self.restoring = true;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.plan = snapshot;
        self.restoring = true;
        true
    }

    // -----------------------------------------------------------------------
    // Selection commands
    // -----------------------------------------------------------------------

    pub fn select_replace(&mut self, kind: EntityKind, id: u32) {
        self.selection.replace(kind, id);
    }

    pub fn select_toggle(&mut self, kind: EntityKind, id: u32) {
        self.selection.toggle(kind, id);
    }

    pub fn select_none(&mut self) {
        self.selection.clear();
    }

    /// The context-sensitive select-all escalation ladder.
    pub fn select_all(&mut self) {
        self.selection = select::select_all(&self.plan, &self.selection, self.step);
    }

    // -----------------------------------------------------------------------
    // Reorder commands
    // -----------------------------------------------------------------------

    /// Move workstreams to the gap at `target_index`. When the origin is part
    /// of the current workstream selection the whole selection moves;
    /// otherwise the origin is promoted to a singleton selection and moves
    /// alone.
    pub fn move_workstreams(&mut self, origin: u32, target_index: usize) -> bool {
        if self.plan.workstream(origin).is_none() {
            return false;
        }
        if !self.selection.contains(EntityKind::Workstream, origin) {
            self.selection.replace(EntityKind::Workstream, origin);
        }
        let moving = self.selection.workstream_ids().to_vec();
        let Some(next) =
            reorder::reorder_at_index(&self.plan.workstreams, |_| true, &moving, target_index)
        else {
            return false;
        };
        self.plan.workstreams = next;
        self.commit();
        true
    }

    /// Move milestones within the origin's workstream. Selected milestones
    /// from other workstreams are left where they are.
    pub fn move_milestones(&mut self, origin: u32, target_index: usize) -> bool {
        let Some(parent) = self.plan.milestone(origin).map(|ms| ms.workstream_id) else {
            return false;
        };
        if !self.selection.contains(EntityKind::Milestone, origin) {
            self.selection.replace(EntityKind::Milestone, origin);
        }
        let moving = self.selection.milestone_ids().to_vec();
        let Some(next) = reorder::reorder_at_index(
            &self.plan.milestones,
            |ms| ms.workstream_id == parent,
            &moving,
            target_index,
        ) else {
            return false;
        };
        self.plan.milestones = next;
        self.commit();
        true
    }

    /// Move tasks within the origin's milestone.
    pub fn move_tasks(&mut self, origin: u32, target_index: usize) -> bool {
        let Some(parent) = self.plan.task(origin).map(|t| t.milestone_id) else {
            return false;
        };
        if !self.selection.contains(EntityKind::Task, origin) {
            self.selection.replace(EntityKind::Task, origin);
        }
        let moving = self.selection.task_ids().to_vec();
        let Some(next) = reorder::reorder_at_index(
            &self.plan.tasks,
            |t| t.milestone_id == parent,
            &moving,
            target_index,
        ) else {
            return false;
        };
        self.plan.tasks = next;
        self.commit();
        true
    }

    // -----------------------------------------------------------------------
    // Direct edits
    // -----------------------------------------------------------------------

    pub fn add_workstream(&mut self, name: Option<String>) -> u32 {
        let id = plan_ops::add_workstream(&mut self.plan, name);
        self.commit();
        id
    }

    pub fn add_milestone(
        &mut self,
        workstream_id: u32,
        name: Option<String>,
    ) -> Result<u32, PlanError> {
        let id = plan_ops::add_milestone(&mut self.plan, workstream_id, name)?;
        // Adding a milestone drops any finer-grained selection.
        if matches!(
            self.selection,
            Selection::Milestones(_) | Selection::Tasks(_)
        ) {
            self.selection.clear();
        }
        self.commit();
        Ok(id)
    }

    pub fn add_task(&mut self, milestone_id: u32, name: Option<String>) -> Result<u32, PlanError> {
        let id = plan_ops::add_task(&mut self.plan, milestone_id, name)?;
        self.commit();
        Ok(id)
    }

    pub fn remove_workstream(&mut self, id: u32) -> Result<(), PlanError> {
        plan_ops::remove_workstream(&mut self.plan, &mut self.selection, id)?;
        self.commit();
        Ok(())
    }

    pub fn remove_milestone(&mut self, id: u32) -> Result<(), PlanError> {
        plan_ops::remove_milestone(&mut self.plan, &mut self.selection, id)?;
        self.commit();
        Ok(())
    }

    pub fn remove_task(&mut self, id: u32) -> Result<(), PlanError> {
        plan_ops::remove_task(&mut self.plan, &mut self.selection, id)?;
        self.commit();
        Ok(())
    }

    pub fn set_field(
        &mut self,
        kind: EntityKind,
        id: u32,
        field: &str,
        value: &str,
    ) -> Result<(), PlanError> {
        match kind {
            EntityKind::Workstream => plan_ops::set_workstream_field(&mut self.plan, id, field, value)?,
            EntityKind::Milestone => plan_ops::set_milestone_field(&mut self.plan, id, field, value)?,
            EntityKind::Task => plan_ops::set_task_field(&mut self.plan, id, field, value)?,
        }
        self.commit();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Chat flow
    // -----------------------------------------------------------------------

    /// Resolve the effective selections for both child kinds from the
    /// current explicit selection.
    pub fn capture_selection(&self) -> CapturedSelection {
        let milestones = select::effective_milestone_selection(&self.plan, &self.selection);
        let tasks = select::effective_task_selection(&self.plan, &self.selection, &milestones);
        CapturedSelection {
            workstream_ids: self.selection.workstream_ids().to_vec(),
            milestones,
            tasks,
        }
    }

    /// Append the user's message, freeze the selection context, raise the
    /// busy flag, and build the request payload. Returns `None` for a blank
    /// message.
    pub fn begin_chat(&mut self, message: &str) -> Option<(ChatRequest, CapturedSelection)> {
        let text = message.trim();
        if text.is_empty() {
            return None;
        }
        self.chat.push("user", text);
        let captured = self.capture_selection();
        self.busy = true;

        let request = ChatRequest {
            message: text.to_string(),
            workstreams: self.plan.workstreams.clone(),
            milestones: self.plan.milestones.clone(),
            tasks: self.plan.tasks.clone(),
            selected_workstream_ids: captured.workstream_ids.clone(),
            selected_milestone_ids: captured.milestones.ids.clone(),
            selected_task_ids: captured.tasks.ids.clone(),
            active_step: self.step.number(),
            milestone_selection_source: captured.milestones.source,
            task_selection_source: captured.tasks.source,
        };
        Some((request, captured))
    }

    /// Merge an assistant response into the plan using the selection
    /// captured at send time. Each present update list is reconciled in
    /// order — workstreams, then milestones (followed by date normalization
    /// and the cross-workstream sort), then tasks — and the matching
    /// selection granularity is pruned to survivors. One snapshot covers the
    /// whole response.
    pub fn apply_chat_response(&mut self, response: &ChatResponse, captured: &CapturedSelection) {
        self.busy = false;
        let role = if response.role.is_empty() {
            "assistant"
        } else {
            &response.role
        };
        self.chat.push(role, &response.text);

        let mut changed = false;

        if let Some(next) = merge::apply_scoped_update(
            &self.plan.workstreams,
            response.updated_workstreams.as_deref(),
            &captured.workstream_ids,
            false,
        ) {
            self.plan.workstreams = next;
            let live: Vec<u32> = self.plan.workstreams.iter().map(|ws| ws.id).collect();
            self.selection.retain_live(EntityKind::Workstream, &live);
            changed = true;
        }

        if let Some(next) = merge::apply_scoped_update(
            &self.plan.milestones,
            response.updated_milestones.as_deref(),
            &captured.milestones.ids,
            captured.milestones.source != SelectionSource::Milestone,
        ) {
            let mut next = next;
            dates::normalize_milestone_dates(&mut next);
            self.plan.milestones = dates::sort_milestones_by_end_date(next, &self.plan.workstreams);
            let live: Vec<u32> = self.plan.milestones.iter().map(|ms| ms.id).collect();
            self.selection.retain_live(EntityKind::Milestone, &live);
            changed = true;
        }

        if let Some(next) = merge::apply_scoped_update(
            &self.plan.tasks,
            response.updated_tasks.as_deref(),
            &captured.tasks.ids,
            captured.tasks.source != SelectionSource::Task,
        ) {
            self.plan.tasks = next;
            let live: Vec<u32> = self.plan.tasks.iter().map(|t| t.id).collect();
            self.selection.retain_live(EntityKind::Task, &live);
            changed = true;
        }

        if changed {
            self.commit();
        }
    }

    /// The chat request never resolved: clear the busy flag and append the
    /// scripted failure reply. The plan is untouched.
    pub fn chat_failed(&mut self) {
        self.busy = false;
        self.chat.push("assistant", CHAT_FAILURE_MESSAGE);
    }
}
