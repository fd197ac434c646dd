//! Combat resolution for one conflict: shared per-team damage pools
//! drained against each fighter's defense, highest defense first.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::board::Grid;
use crate::types::{Pos, Team, Unit};

struct Fighter {
    pos: Pos,
    unit: Unit,
}

/// Resolve a conflict on the given grid and return the positions of the
/// units that die. Belligerents whose square has emptied since the scan
/// are ignored.
pub(super) fn resolve_conflict(grid: &Grid, belligerents: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    let mut fighters: Vec<Fighter> = belligerents
        .iter()
        .filter_map(|&pos| grid.unit(pos).map(|&unit| Fighter { pos, unit }))
        .collect();
    if fighters.len() < 2 {
        return BTreeSet::new();
    }
    let thinned = fighters.len() < belligerents.len();

    // Coordinate order from the set, then stable sort: equal defenses keep
    // coordinate order, so resolution is deterministic.
    fighters.sort_by(|a, b| b.unit.defense.cmp(&a.unit.defense));

    let mut pools = [0u32; 2];
    for fighter in &fighters {
        pools[fighter.unit.team.opponent().index()] += u32::from(fighter.unit.rank);
    }

    let mut teams_present = [false; 2];
    let mut casualties = BTreeSet::new();
    // Exact damage as a fraction pool/defense, for the forced-casualty
    // tie-break. Compared cross-multiplied to avoid rounding.
    let mut weakest: Option<(u32, u32)> = None;
    let mut weakest_positions = BTreeSet::new();

    for fighter in &fighters {
        teams_present[fighter.unit.team.index()] = true;
        let pool = &mut pools[fighter.unit.team.index()];
        let defense = u32::from(fighter.unit.defense);
        let damage = *pool / defense;
        let exact = (*pool, defense);
        *pool = pool.saturating_sub(defense);

        if damage > 0 {
            casualties.insert(fighter.pos);
        }

        match weakest {
            Some(current) => match cmp_exact(exact, current) {
                Ordering::Greater => {
                    weakest = Some(exact);
                    weakest_positions = BTreeSet::from([fighter.pos]);
                }
                Ordering::Equal => {
                    weakest_positions.insert(fighter.pos);
                }
                Ordering::Less => {}
            },
            None => {
                weakest = Some(exact);
                weakest_positions = BTreeSet::from([fighter.pos]);
            }
        }
    }

    // A fight where everyone shrugs off the damage still costs something:
    // the side that took the most exact damage loses its weakest units.
    // A conflict already thinned by an earlier resolution this tick is
    // exempt unless both teams are still standing.
    if casualties.is_empty() && (!thinned || teams_present.iter().all(|&present| present)) {
        return weakest_positions;
    }
    casualties
}

/// Compare two exact damage fractions `a.0 / a.1` and `b.0 / b.1`.
fn cmp_exact(a: (u32, u32), b: (u32, u32)) -> Ordering {
    let lhs = u64::from(a.0) * u64::from(b.1);
    let rhs = u64::from(b.0) * u64::from(a.1);
    lhs.cmp(&rhs)
}
