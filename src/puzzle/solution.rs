//! Item solutions.
//!
//! A solution naming items is written `Item: KEY`, `InventoryItem: KEY` or
//! `Prefab: KEY`, and several can be joined with `+`
//! (`Item: KEY+Item: NOTE`). The same predicate decides every item match:
//! requirement checks, container contents and media insertion.

use crate::core::PrefabId;

const ITEM_PREFIXES: [&str; 3] = ["InventoryItem:", "Item:", "Prefab:"];

/// Prefab named by a single `Item:`-style reference.
fn reference(part: &str) -> Option<PrefabId> {
    let part = part.trim();
    ITEM_PREFIXES.iter().find_map(|prefix| {
        part.strip_prefix(prefix)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(PrefabId::new)
    })
}

/// Whether `solution` names items at all.
#[must_use]
pub fn is_item_solution(solution: &str) -> bool {
    parts(solution).is_some()
}

/// The prefabs a solution requires, or `None` if any part is not an item
/// reference.
#[must_use]
pub fn parts(solution: &str) -> Option<Vec<PrefabId>> {
    solution.split('+').map(reference).collect()
}

/// Whether `identifiers` provide every item `solution` requires.
///
/// Each identifier satisfies at most one part, so `Item: COIN+Item: COIN`
/// needs two coins. Extra identifiers are ignored.
pub fn satisfied_by<'a, I>(solution: &str, identifiers: I) -> bool
where
    I: IntoIterator<Item = &'a PrefabId>,
{
    let Some(required) = parts(solution) else {
        return false;
    };
    let mut available: Vec<&PrefabId> = identifiers.into_iter().collect();
    required.iter().all(|needed| match available.iter().position(|id| *id == needed) {
        Some(index) => {
            available.swap_remove(index);
            true
        }
        None => false,
    })
}

/// First solution, in list order, satisfied by `identifiers`.
#[must_use]
pub fn first_satisfied<'s>(solutions: &'s [String], identifiers: &[PrefabId]) -> Option<&'s str> {
    solutions
        .iter()
        .find(|s| satisfied_by(s, identifiers))
        .map(String::as_str)
}
