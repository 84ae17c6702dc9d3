use serde::{Deserialize, Serialize};

/// The active editor step. Each step exposes one granularity as its primary
/// surface; the select-all ladder keys off it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStep {
    #[default]
    Workstreams,
    Milestones,
    Tasks,
}

impl PlanStep {
    /// The 1-based step number used on the wire (`activeStep`).
    pub fn number(self) -> u8 {
        match self {
            PlanStep::Workstreams => 1,
            PlanStep::Milestones => 2,
            PlanStep::Tasks => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<PlanStep> {
        match n {
            1 => Some(PlanStep::Workstreams),
            2 => Some(PlanStep::Milestones),
            3 => Some(PlanStep::Tasks),
            _ => None,
        }
    }
}

/// The three selectable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Workstream,
    Milestone,
    Task,
}

/// Where a resolved selection came from. `All` means nothing was selected
/// and the whole collection is in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Task,
    Milestone,
    Workstream,
    All,
}

/// The current selection. Holding the three granularities in one enum makes
/// "at most one granularity at a time" structural instead of relying on
/// scattered clearing calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "ids")]
pub enum Selection {
    #[default]
    None,
    Workstreams(Vec<u32>),
    Milestones(Vec<u32>),
    Tasks(Vec<u32>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Workstreams(ids)
            | Selection::Milestones(ids)
            | Selection::Tasks(ids) => ids.is_empty(),
        }
    }

    /// Selected workstream IDs, or empty when another granularity is active.
    pub fn workstream_ids(&self) -> &[u32] {
        match self {
            Selection::Workstreams(ids) => ids,
            _ => &[],
        }
    }

    pub fn milestone_ids(&self) -> &[u32] {
        match self {
            Selection::Milestones(ids) => ids,
            _ => &[],
        }
    }

    pub fn task_ids(&self) -> &[u32] {
        match self {
            Selection::Tasks(ids) => ids,
            _ => &[],
        }
    }

    /// Plain click: replace the whole selection with a singleton of `kind`.
    pub fn replace(&mut self, kind: EntityKind, id: u32) {
        *self = Selection::of(kind, vec![id]);
    }

    /// Shift-click: toggle `id` within the given kind. Switching kinds drops
    /// the previous granularity first.
    pub fn toggle(&mut self, kind: EntityKind, id: u32) {
        let ids = match (&*self, kind) {
            (Selection::Workstreams(ids), EntityKind::Workstream)
            | (Selection::Milestones(ids), EntityKind::Milestone)
            | (Selection::Tasks(ids), EntityKind::Task) => {
                let mut ids = ids.clone();
                if let Some(pos) = ids.iter().position(|x| *x == id) {
                    ids.remove(pos);
                } else {
                    ids.push(id);
                }
                ids
            }
            _ => vec![id],
        };
        *self = if ids.is_empty() {
            Selection::None
        } else {
            Selection::of(kind, ids)
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Whether the active granularity matches `kind` and contains `id`.
    pub fn contains(&self, kind: EntityKind, id: u32) -> bool {
        let ids = match kind {
            EntityKind::Workstream => self.workstream_ids(),
            EntityKind::Milestone => self.milestone_ids(),
            EntityKind::Task => self.task_ids(),
        };
        ids.contains(&id)
    }

    /// Drop selected IDs of `kind` that no longer exist in `live_ids`. The
    /// selection never references deleted entities. No-op when the active
    /// granularity differs.
    pub fn retain_live(&mut self, kind: EntityKind, live_ids: &[u32]) {
        let matches = matches!(
            (&*self, kind),
            (Selection::Workstreams(_), EntityKind::Workstream)
                | (Selection::Milestones(_), EntityKind::Milestone)
                | (Selection::Tasks(_), EntityKind::Task)
        );
        if !matches {
            return;
        }
        if let Selection::Workstreams(ids)
        | Selection::Milestones(ids)
        | Selection::Tasks(ids) = self
        {
            ids.retain(|id| live_ids.contains(id));
            if ids.is_empty() {
                *self = Selection::None;
            }
        }
    }

    pub fn of(kind: EntityKind, ids: Vec<u32>) -> Selection {
        if ids.is_empty() {
            return Selection::None;
        }
        match kind {
            EntityKind::Workstream => Selection::Workstreams(ids),
            EntityKind::Milestone => Selection::Milestones(ids),
            EntityKind::Task => Selection::Tasks(ids),
        }
    }
}
