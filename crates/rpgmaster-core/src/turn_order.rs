//! Initiative ordering and cursor stepping.
//!
//! Turn order is never stored. The active roster is sorted on every read
//! (initiative descending, then name ascending), and the cursor is a plain
//! index into that sorted list. Everything here is pure so the tracker
//! service, the tests, and the status page all agree on one definition.
//!
//! Name comparison is byte-wise (`str::cmp`), which is locale-neutral and
//! case-sensitive. Combatants that tie on both initiative and name fall
//! back to their id, and ids are time-ordered, so earlier additions go
//! first.

use core::cmp::Ordering;
use core::num::NonZeroUsize;

use rpgmaster_types::{Category, Combatant, CombatantView, InitiativeBoard, TurnCursor};

/// Compare two combatants by turn order.
pub fn compare_turn_order(a: &Combatant, b: &Combatant) -> Ordering {
    b.initiative
        .cmp(&a.initiative)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Filter a roster down to its active combatants, sorted by turn order.
pub fn active_turn_order<I>(roster: I) -> Vec<Combatant>
where
    I: IntoIterator<Item = Combatant>,
{
    let mut active: Vec<Combatant> = roster.into_iter().filter(|c| c.active).collect();
    active.sort_by(compare_turn_order);
    active
}

/// Step the cursor forward one turn.
///
/// Returns `None` when there are no active combatants (nothing to do).
/// Wrapping back to index 0 starts a new round. A stale index left behind
/// by a shrinking roster is folded back into range here.
pub fn advance(cursor: TurnCursor, active_count: usize) -> Option<TurnCursor> {
    let count = NonZeroUsize::new(active_count)?;
    let next = cursor.current_turn.saturating_add(1) % count;

    let round_number = if next == 0 {
        cursor.round_number.saturating_add(1)
    } else {
        cursor.round_number
    };

    Some(TurnCursor {
        current_turn: next,
        round_number,
    })
}

/// Step the cursor back one turn.
///
/// Mirrors [`advance`]. The round only goes down when the step wraps from
/// index 0 to the last index, and never below 1.
pub fn retreat(cursor: TurnCursor, active_count: usize) -> Option<TurnCursor> {
    let count = NonZeroUsize::new(active_count)?;
    let last = count.get().saturating_sub(1);
    let prev = cursor.current_turn.saturating_add(last) % count;

    let wrapped = cursor.current_turn == 0 && prev == last;
    let round_number = if wrapped && cursor.round_number > 1 {
        cursor.round_number.saturating_sub(1)
    } else {
        cursor.round_number
    };

    Some(TurnCursor {
        current_turn: prev,
        round_number,
    })
}

/// Project a sorted active roster and the cursor into the board clients see.
///
/// `portrait` is only consulted for monsters that carry a content slug.
pub fn build_board<F>(sorted: &[Combatant], cursor: TurnCursor, mut portrait: F) -> InitiativeBoard
where
    F: FnMut(&str) -> Option<String>,
{
    let characters = sorted
        .iter()
        .enumerate()
        .map(|(index, c)| {
            let portrait_path = match (&c.category, c.content_ref.as_deref()) {
                (Category::Monster, Some(slug)) => portrait(slug),
                _ => None,
            };

            CombatantView {
                id: c.id,
                name: c.name.clone(),
                initiative: c.initiative,
                hp: c.hp,
                max_hp: c.max_hp,
                category: c.category.clone(),
                order: index.saturating_add(1),
                is_current: index == cursor.current_turn,
                portrait_path,
            }
        })
        .collect();

    InitiativeBoard {
        characters,
        current_turn: cursor.current_turn,
        round_number: cursor.round_number,
    }
}
