use std::collections::HashSet;

use crate::model::plan::HasId;

/// Reorder `moving_ids` within the sub-sequence of `items` selected by
/// `in_scope`, dropping them at `target_index`.
///
/// `target_index` addresses the gaps between in-scope items (0 = before the
/// first, N = after the last), counted before any item is lifted out. The
/// index is rebased by the number of moving items that originally sat before
/// it, so dropping a block below its own position lands where the user
/// pointed instead of off by the block size.
///
/// Moving IDs that do not resolve to an in-scope item are silently
/// discarded; with none left, `None` is returned and the caller keeps the
/// collection untouched. Out-of-scope items keep their positions: the full
/// list is reassembled by walking it in order and pulling in-scope slots
/// from the newly ordered sub-sequence.
pub fn reorder_at_index<T, F>(
    items: &[T],
    in_scope: F,
    moving_ids: &[u32],
    target_index: usize,
) -> Option<Vec<T>>
where
    T: HasId + Clone,
    F: Fn(&T) -> bool,
{
    let scope: Vec<&T> = items.iter().filter(|item| in_scope(item)).collect();
    let scope_ids: HashSet<u32> = scope.iter().map(|item| item.id()).collect();

    let valid_moving: HashSet<u32> = moving_ids
        .iter()
        .copied()
        .filter(|id| scope_ids.contains(id))
        .collect();
    if valid_moving.is_empty() {
        return None;
    }

    let moving_items: Vec<T> = scope
        .iter()
        .filter(|item| valid_moving.contains(&item.id()))
        .map(|item| (*item).clone())
        .collect();
    let mut remaining: Vec<T> = scope
        .iter()
        .filter(|item| !valid_moving.contains(&item.id()))
        .map(|item| (*item).clone())
        .collect();

    let before_target = scope
        .iter()
        .enumerate()
        .filter(|(idx, item)| valid_moving.contains(&item.id()) && *idx < target_index)
        .count();

    let index = target_index
        .saturating_sub(before_target)
        .min(remaining.len());
    remaining.splice(index..index, moving_items);

    // Reassemble: out-of-scope items stay put, in-scope slots take the new order.
    let mut reordered = remaining.into_iter();
    let next = items
        .iter()
        .map(|item| {
            if in_scope(item) {
                reordered.next().expect("scope slot count unchanged")
            } else {
                item.clone()
            }
        })
        .collect();
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plan::{Milestone, Workstream};
    use pretty_assertions::assert_eq;

    fn ws(id: u32) -> Workstream {
        Workstream {
            id,
            name: format!("ws {}", id),
            description: String::new(),
        }
    }

    fn ms(id: u32, workstream_id: u32) -> Milestone {
        Milestone {
            id,
            workstream_id,
            name: format!("ms {}", id),
            description: String::new(),
            start_date: None,
            end_date: None,
        }
    }

    fn ids<T: HasId>(items: &[T]) -> Vec<u32> {
        items.iter().map(HasId::id).collect()
    }

    #[test]
    fn single_item_to_front() {
        let items = vec![ws(1), ws(2), ws(3), ws(4)];
        let next = reorder_at_index(&items, |_| true, &[2], 0).unwrap();
        assert_eq!(ids(&next), vec![2, 1, 3, 4]);
    }

    #[test]
    fn block_to_final_gap_lands_at_the_end() {
        let items = vec![ws(1), ws(2), ws(3), ws(4)];
        let next = reorder_at_index(&items, |_| true, &[1, 2], 4).unwrap();
        assert_eq!(ids(&next), vec![3, 4, 1, 2]);
    }

    #[test]
    fn block_target_is_rebased_by_movers_before_it() {
        let items = vec![ws(1), ws(2), ws(3), ws(4)];
        // Both movers sit before gap 3, so the block lands between 3 and 4
        // instead of drifting off by its own size.
        let next = reorder_at_index(&items, |_| true, &[1, 2], 3).unwrap();
        assert_eq!(ids(&next), vec![3, 1, 2, 4]);
    }

    #[test]
    fn drop_on_final_gap_moves_to_end() {
        let items = vec![ws(1), ws(2), ws(3), ws(4)];
        let next = reorder_at_index(&items, |_| true, &[1], 4).unwrap();
        assert_eq!(ids(&next), vec![2, 3, 4, 1]);
    }

    #[test]
    fn movers_keep_their_relative_order() {
        let items = vec![ws(1), ws(2), ws(3), ws(4), ws(5)];
        let next = reorder_at_index(&items, |_| true, &[4, 2], 0).unwrap();
        assert_eq!(ids(&next), vec![2, 4, 1, 3, 5]);
    }

    #[test]
    fn oversized_target_clamps_to_end() {
        let items = vec![ws(1), ws(2), ws(3)];
        let next = reorder_at_index(&items, |_| true, &[1], 99).unwrap();
        assert_eq!(ids(&next), vec![2, 3, 1]);
    }

    #[test]
    fn unknown_ids_are_discarded_silently() {
        let items = vec![ws(1), ws(2), ws(3)];
        let next = reorder_at_index(&items, |_| true, &[2, 42], 0).unwrap();
        assert_eq!(ids(&next), vec![2, 1, 3]);
    }

    #[test]
    fn no_valid_movers_aborts_with_no_change() {
        let items = vec![ws(1), ws(2)];
        assert!(reorder_at_index(&items, |_| true, &[42], 0).is_none());
    }

    #[test]
    fn scoped_move_leaves_other_parents_interleaving_intact() {
        // Milestones of workstream 1 and 2 interleaved in the flat list.
        let items = vec![ms(10, 1), ms(20, 2), ms(11, 1), ms(21, 2), ms(12, 1)];
        // Move milestone 12 to the front of workstream 1's sub-sequence.
        let next =
            reorder_at_index(&items, |m: &Milestone| m.workstream_id == 1, &[12], 0).unwrap();
        assert_eq!(ids(&next), vec![12, 20, 10, 21, 11]);
        // Workstream 2's milestones kept their absolute slots.
        assert_eq!(next[1].id, 20);
        assert_eq!(next[3].id, 21);
    }

    #[test]
    fn scoped_move_discards_movers_from_other_parents() {
        let items = vec![ms(10, 1), ms(20, 2), ms(11, 1)];
        // 20 belongs to workstream 2 and cannot travel with the block.
        let next =
            reorder_at_index(&items, |m: &Milestone| m.workstream_id == 1, &[11, 20], 0)
                .unwrap();
        assert_eq!(ids(&next), vec![11, 20, 10]);
    }

    #[test]
    fn target_index_counts_scope_gaps_not_flat_gaps() {
        let items = vec![ms(10, 1), ms(20, 2), ms(11, 1), ms(12, 1)];
        // Gap 2 within workstream 1 = between 11 and 12.
        let next =
            reorder_at_index(&items, |m: &Milestone| m.workstream_id == 1, &[10], 2).unwrap();
        assert_eq!(ids(&next), vec![11, 20, 10, 12]);
    }
}
