use serde::{Deserialize, Serialize};

/// Anything with a plan-local integer ID. The merge and reorder engines are
/// generic over this so they run identically for all three entity kinds.
pub trait HasId {
    fn id(&self) -> u32;
}

/// A top-level grouping container. Ordering is the ordering of the
/// collection itself; there is no rank field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workstream {
    pub id: u32,
    pub name: String,
    pub description: String,
}

/// A dated sub-goal belonging to exactly one workstream.
///
/// Dates are ISO-8601 `YYYY-MM-DD` strings or absent. They are kept as raw
/// strings: anything that fails the strict format check passes through
/// normalization and sorting untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: u32,
    pub workstream_id: u32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// An actionable item belonging to exactly one milestone. Task dates are
/// never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u32,
    pub milestone_id: u32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl HasId for Workstream {
    fn id(&self) -> u32 {
        self.id
    }
}

impl HasId for Milestone {
    fn id(&self) -> u32 {
        self.id
    }
}

impl HasId for Task {
    fn id(&self) -> u32 {
        self.id
    }
}

/// The authoritative plan: three ordered collections.
///
/// Milestones reference workstreams and tasks reference milestones by ID.
/// Referential integrity is not enforced here — an orphaned milestone or
/// task simply fails to show up under its (nonexistent) parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub workstreams: Vec<Workstream>,
    pub milestones: Vec<Milestone>,
    pub tasks: Vec<Task>,
}

/// Next free ID within one kind: `max + 1`, or `1` for an empty collection.
/// IDs are unique within kind only, never across kinds.
pub fn next_id<T: HasId>(items: &[T]) -> u32 {
    items.iter().map(HasId::id).max().map_or(1, |max| max + 1)
}

impl Plan {
    pub fn workstream(&self, id: u32) -> Option<&Workstream> {
        self.workstreams.iter().find(|ws| ws.id == id)
    }

    pub fn milestone(&self, id: u32) -> Option<&Milestone> {
        self.milestones.iter().find(|ms| ms.id == id)
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// IDs of all milestones under any of the given workstreams, in
    /// collection order.
    pub fn milestone_ids_in_workstreams(&self, ws_ids: &[u32]) -> Vec<u32> {
        self.milestones
            .iter()
            .filter(|ms| ws_ids.contains(&ms.workstream_id))
            .map(|ms| ms.id)
            .collect()
    }

    /// IDs of all tasks under any of the given milestones, in collection
    /// order.
    pub fn task_ids_in_milestones(&self, ms_ids: &[u32]) -> Vec<u32> {
        self.tasks
            .iter()
            .filter(|t| ms_ids.contains(&t.milestone_id))
            .map(|t| t.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_empty_collection_starts_at_one() {
        let ws: Vec<Workstream> = Vec::new();
        assert_eq!(next_id(&ws), 1);
    }

    #[test]
    fn next_id_is_max_plus_one_not_len_plus_one() {
        let ws = vec![
            Workstream {
                id: 7,
                name: "A".into(),
                description: String::new(),
            },
            Workstream {
                id: 2,
                name: "B".into(),
                description: String::new(),
            },
        ];
        assert_eq!(next_id(&ws), 8);
    }

    #[test]
    fn milestone_serde_uses_camel_case_wire_names() {
        let ms = Milestone {
            id: 3,
            workstream_id: 1,
            name: "Kickoff".into(),
            description: String::new(),
            start_date: Some("2025-01-01".into()),
            end_date: None,
        };
        let json = serde_json::to_value(&ms).unwrap();
        assert_eq!(json["workstreamId"], 1);
        assert_eq!(json["startDate"], "2025-01-01");
    }

    #[test]
    fn task_deserializes_with_missing_optional_fields() {
        let t: Task = serde_json::from_str(
            r#"{"id":1,"milestoneId":2,"name":"T","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(t.milestone_id, 2);
        assert_eq!(t.owner, "");
        assert!(t.start_date.is_none());
    }

    #[test]
    fn child_id_lookups_preserve_collection_order() {
        let plan = Plan {
            workstreams: vec![],
            milestones: vec![
                Milestone {
                    id: 10,
                    workstream_id: 2,
                    name: "m".into(),
                    description: String::new(),
                    start_date: None,
                    end_date: None,
                },
                Milestone {
                    id: 4,
                    workstream_id: 1,
                    name: "m".into(),
                    description: String::new(),
                    start_date: None,
                    end_date: None,
                },
                Milestone {
                    id: 9,
                    workstream_id: 2,
                    name: "m".into(),
                    description: String::new(),
                    start_date: None,
                    end_date: None,
                },
            ],
            tasks: vec![],
        };
        assert_eq!(plan.milestone_ids_in_workstreams(&[2]), vec![10, 9]);
    }
}
