//! Surplus items used to pad a recommendation to a full slate.

use std::collections::HashSet;

use nemesis_common::{ItemId, SLOT_COUNT};

use crate::catalog::Catalog;
use crate::inventory::Counts;

/// Pads `prefix` with the items held furthest beyond what is needed.
///
/// Items already in `prefix` are skipped. Surplus is `have - need`; only
/// positive surplus counts, largest first, ties in catalog order. Returns
/// `None` when there is not enough surplus to reach [`SLOT_COUNT`] items,
/// or when `prefix` alone already overflows the slots, so the result is
/// always a full slate or nothing.
#[must_use]
pub fn fill_slots(
    catalog: &Catalog,
    have: &Counts,
    need: &Counts,
    mut prefix: Vec<ItemId>,
) -> Option<Vec<ItemId>> {
    if prefix.len() > SLOT_COUNT {
        return None;
    }

    let skip: HashSet<ItemId> = prefix.iter().copied().collect();

    let mut extras: Vec<(ItemId, u32)> = catalog
        .ids()
        .filter(|id| !skip.contains(id))
        .filter_map(|id| {
            let held = have.get(&id).copied().unwrap_or(0);
            let needed = need.get(&id).copied().unwrap_or(0);
            let extra = held.saturating_sub(needed);
            (extra > 0).then_some((id, extra))
        })
        .collect();

    extras.sort_by(|u, v| v.1.cmp(&u.1));

    let wanted = SLOT_COUNT - prefix.len();
    if extras.len() < wanted {
        return None;
    }

    prefix.extend(extras.into_iter().take(wanted).map(|(id, _)| id));
    Some(prefix)
}
