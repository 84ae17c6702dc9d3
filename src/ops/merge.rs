use indexmap::IndexMap;
use std::collections::HashSet;

use crate::model::plan::HasId;

/// Reconcile an externally supplied partial/replacement list into an
/// authoritative ordered collection.
///
/// Returns `None` when `updates` is absent: the caller must leave the
/// collection untouched ("no update for this kind").
///
/// Unscoped (`selected_ids` empty): every current item mentioned in the
/// update is replaced in place, unmentioned items are kept, and updated items
/// with unknown IDs are appended in update order.
///
/// Scoped: unselected items are always kept. A selected item is replaced by
/// its update when one exists; a selected item the update never mentions is
/// kept when `preserve_missing_selected` is set (the assistant was asked
/// about a broader scope, so silence is not deletion) and dropped otherwise
/// (an implicit delete). Update entries never consumed are appended at the
/// end when their IDs are new; entries for unselected existing items are
/// discarded.
pub fn apply_scoped_update<T: HasId + Clone>(
    current: &[T],
    updates: Option<&[T]>,
    selected_ids: &[u32],
    preserve_missing_selected: bool,
) -> Option<Vec<T>> {
    let updates = updates?;

    let mut updated_map: IndexMap<u32, T> =
        updates.iter().map(|item| (item.id(), item.clone())).collect();
    let current_ids: HashSet<u32> = current.iter().map(HasId::id).collect();

    if selected_ids.is_empty() {
        let mut next: Vec<T> = current
            .iter()
            .map(|item| updated_map.get(&item.id()).unwrap_or(item).clone())
            .collect();
        for (id, item) in updated_map {
            if !current_ids.contains(&id) {
                next.push(item);
            }
        }
        return Some(next);
    }

    let selection: HashSet<u32> = selected_ids.iter().copied().collect();
    let mut next: Vec<T> = Vec::with_capacity(current.len());

    for item in current {
        if !selection.contains(&item.id()) {
            next.push(item.clone());
            continue;
        }
        if let Some(updated) = updated_map.shift_remove(&item.id()) {
            next.push(updated);
        } else if preserve_missing_selected {
            next.push(item.clone());
        }
        // else: selected but unmentioned — implicit delete
    }

    for (id, item) in updated_map {
        if !current_ids.contains(&id) {
            next.push(item);
        }
    }

    Some(next)
}

/// Drop selected IDs that no longer exist after a merge. A still-empty
/// selection passes through; an emptied collection empties the selection.
pub fn prune_selection<T: HasId>(selected: &[u32], items: &[T]) -> Vec<u32> {
    if selected.is_empty() {
        return selected.to_vec();
    }
    if items.is_empty() {
        return Vec::new();
    }
    let live: HashSet<u32> = items.iter().map(HasId::id).collect();
    selected
        .iter()
        .copied()
        .filter(|id| live.contains(id))
        .collect()
}
