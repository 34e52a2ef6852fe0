/// Task ordering within a column
///
/// Tasks carry an integer `order`; a column is displayed by sorting its tasks
/// ascending by that value. This module holds the single repositioning rule
/// used by both the server-side engine and the client-side projection, so the
/// two sides compute identical arrangements from identical inputs.
///
/// # Shifting rule
///
/// Inserting a task at `target` into a column:
///
/// 1. Remove the moved task from the column (if it was there).
/// 2. Stable-sort the remaining siblings by `order`.
/// 3. Clamp `target` to one past the last sibling, so a position beyond
///    the end appends instead of leaving an arbitrary jump.
/// 4. Siblings with `order < target` keep their value.
/// 5. Siblings with `order >= target` are shifted: each one takes
///    `max(old + 1, previous + 1)` where `previous` starts at `target`.
/// 6. The moved task takes `order = target`.
///
/// On a dense column (`0, 1, 2, ...`) step 5 is exactly
/// `rank_among_shifted + target + 1`. On sparse or duplicated input every
/// shifted sibling still strictly increases and relative order is preserved,
/// so no two tasks share an `order` afterwards.
///
/// # Example
///
/// ```
/// use taskboard_shared::ordering::{reorder, Slot};
/// use uuid::Uuid;
///
/// let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
/// let column = vec![Slot::new(a, 0), Slot::new(b, 1), Slot::new(c, 2)];
///
/// let arranged = reorder(&column, c, 0);
/// let ids: Vec<Uuid> = arranged.iter().map(|slot| slot.id).collect();
/// assert_eq!(ids, vec![c, a, b]);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of one task inside a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Task ID
    pub id: Uuid,

    /// Sort key within the column
    pub order: i32,
}

impl Slot {
    pub fn new(id: Uuid, order: i32) -> Self {
        Self { id, order }
    }
}

/// Computes the arrangement of a column after inserting `moved` at `target`
///
/// `column` is the destination column's current content in read order (ties
/// on `order` are broken by position in this slice). It may or may not
/// contain `moved`; a cross-column move passes the destination without it.
///
/// Returns every task of the resulting column, including `moved`, sorted by
/// their new `order`. The moved task's slot carries the clamped target, which
/// callers persist instead of the requested value.
pub fn reorder(column: &[Slot], moved: Uuid, target: i32) -> Vec<Slot> {
    let mut siblings: Vec<Slot> = column.iter().filter(|slot| slot.id != moved).copied().collect();
    siblings.sort_by_key(|slot| slot.order);
    let target = target.min(next_order(siblings.iter().map(|slot| slot.order)));

    let mut previous = target;
    for slot in siblings.iter_mut().filter(|slot| slot.order >= target) {
        let shifted = slot.order.saturating_add(1).max(previous.saturating_add(1));
        slot.order = shifted;
        previous = shifted;
    }

    siblings.push(Slot::new(moved, target));
    siblings.sort_by_key(|slot| slot.order);
    siblings
}

/// Order `moved` ended up with in an arrangement from [`reorder`]
pub fn placed_order(arranged: &[Slot], moved: Uuid) -> Option<i32> {
    arranged.iter().find(|slot| slot.id == moved).map(|slot| slot.order)
}

/// Returns the slots of `after` whose `order` differs from `before`
///
/// Slots absent from `before` are reported as changed. Used to persist only
/// the rows a move actually touched.
pub fn changed_slots(before: &[Slot], after: &[Slot]) -> Vec<Slot> {
    after
        .iter()
        .filter(|slot| {
            before
                .iter()
                .find(|old| old.id == slot.id)
                .map_or(true, |old| old.order != slot.order)
        })
        .copied()
        .collect()
}

/// Order for an entity appended after `existing`: `max + 1`, or `0` when empty
pub fn next_order<I>(existing: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    existing
        .into_iter()
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(slots: &[Slot]) -> Vec<Uuid> {
        slots.iter().map(|slot| slot.id).collect()
    }

    fn order_of(slots: &[Slot], id: Uuid) -> i32 {
        slots.iter().find(|slot| slot.id == id).map(|slot| slot.order).unwrap()
    }

    #[test]
    fn test_move_last_to_front() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 0), Slot::new(b, 1), Slot::new(c, 2)];

        let arranged = reorder(&column, c, 0);

        assert_eq!(ids(&arranged), vec![c, a, b]);
        assert_eq!(order_of(&arranged, c), 0);
        assert_eq!(order_of(&arranged, a), 1);
        assert_eq!(order_of(&arranged, b), 2);
    }

    #[test]
    fn test_move_first_down_lands_before_target_sibling() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![
            Slot::new(a, 0),
            Slot::new(b, 1),
            Slot::new(c, 2),
            Slot::new(d, 3),
        ];

        let arranged = reorder(&column, a, 2);

        assert_eq!(ids(&arranged), vec![b, a, c, d]);
        assert_eq!(order_of(&arranged, b), 1);
        assert_eq!(order_of(&arranged, c), 3);
        assert_eq!(order_of(&arranged, d), 4);
    }

    #[test]
    fn test_siblings_below_target_keep_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 0), Slot::new(b, 1), Slot::new(c, 2)];

        let arranged = reorder(&column, c, 1);

        assert_eq!(order_of(&arranged, a), 0);
        assert_eq!(order_of(&arranged, c), 1);
        assert_eq!(order_of(&arranged, b), 2);
    }

    #[test]
    fn test_insert_into_other_column_shifts_destination() {
        let (x, y, moved) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let destination = vec![Slot::new(x, 0), Slot::new(y, 1)];

        let arranged = reorder(&destination, moved, 1);

        assert_eq!(ids(&arranged), vec![x, moved, y]);
        assert_eq!(order_of(&arranged, y), 2);
    }

    #[test]
    fn test_insert_into_empty_column() {
        let moved = Uuid::new_v4();
        let arranged = reorder(&[], moved, 0);
        assert_eq!(arranged, vec![Slot::new(moved, 0)]);
    }

    #[test]
    fn test_shifted_siblings_strictly_increase_on_sparse_input() {
        let (a, b, c, moved) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 0), Slot::new(b, 10), Slot::new(c, 11)];

        let arranged = reorder(&column, moved, 3);

        assert_eq!(order_of(&arranged, a), 0);
        assert!(order_of(&arranged, b) > 10);
        assert!(order_of(&arranged, c) > order_of(&arranged, b));
        assert_eq!(ids(&arranged), vec![a, moved, b, c]);
    }

    #[test]
    fn test_duplicate_orders_are_separated_in_read_order() {
        let (a, b, moved) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 2), Slot::new(b, 2)];

        let arranged = reorder(&column, moved, 2);

        assert_eq!(ids(&arranged), vec![moved, a, b]);
        assert_eq!(order_of(&arranged, a), 3);
        assert_eq!(order_of(&arranged, b), 4);
    }

    #[test]
    fn test_append_past_end_changes_nothing_else() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 0), Slot::new(b, 1)];

        let arranged = reorder(&column, a, 2);

        assert_eq!(ids(&arranged), vec![b, a]);
        assert_eq!(changed_slots(&column, &arranged), vec![Slot::new(a, 2)]);
    }

    #[test]
    fn test_target_far_past_end_is_clamped() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let column = vec![Slot::new(a, 0), Slot::new(b, 1), Slot::new(c, 2)];

        let arranged = reorder(&column, a, i32::MAX);
        assert_eq!(ids(&arranged), vec![b, c, a]);
        assert_eq!(placed_order(&arranged, a), Some(3));

        let again = reorder(&arranged, b, i32::MAX);
        assert_eq!(ids(&again), vec![c, a, b]);
        assert_eq!(placed_order(&again, b), Some(4));
        assert_eq!(order_of(&again, a), 3);
    }

    #[test]
    fn test_far_target_in_empty_column_becomes_zero() {
        let moved = Uuid::new_v4();
        assert_eq!(reorder(&[], moved, 500), vec![Slot::new(moved, 0)]);
    }

    #[test]
    fn test_changed_slots_reports_new_entries() {
        let (a, moved) = (Uuid::new_v4(), Uuid::new_v4());
        let before = vec![Slot::new(a, 0)];
        let after = reorder(&before, moved, 0);

        let changed = changed_slots(&before, &after);
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&Slot::new(moved, 0)));
        assert!(changed.contains(&Slot::new(a, 1)));
    }

    #[test]
    fn test_next_order() {
        assert_eq!(next_order(Vec::<i32>::new()), 0);
        assert_eq!(next_order(vec![0, 1, 2]), 3);
        assert_eq!(next_order(vec![4, 0, 7]), 8);
    }
}
