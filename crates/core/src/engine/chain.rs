//! Movement-chain extraction: a chain is a run of units that can all
//! advance one square this tick because the unit at its head steps onto a
//! free square. Everything outside a chain is locked in place.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::Grid;
use crate::types::Pos;

pub(super) struct ChainPlan {
    /// Movable chains, head (deepest unit) first. Disjoint: no position
    /// appears in two chains.
    pub chains: Vec<Vec<Pos>>,
    /// Every occupied position that moves in no chain this tick.
    pub locked: BTreeSet<Pos>,
}

pub(super) fn plan_chains(grid: &Grid, stuck: &BTreeSet<Pos>) -> ChainPlan {
    let mut chains: BTreeMap<Pos, Vec<Pos>> = BTreeMap::new();
    let mut identified: BTreeSet<Pos> = BTreeSet::new();

    for pos in grid.positions() {
        if grid.unit(pos).is_none() || identified.contains(&pos) {
            continue;
        }
        let mut visited = BTreeSet::new();
        let Some(chain) = extract_chain(grid, pos, stuck, &mut visited) else {
            continue;
        };
        // A later walk can re-enter squares an earlier chain already
        // claims. A walk that swallows an entire earlier chain replaces
        // it; a walk that merges into the middle of one loses the
        // contested follow and every one of its units stays locked.
        let merges_into_existing = chains.values().any(|members| {
            members.iter().any(|member| chain.contains(member))
                && !members.iter().all(|member| chain.contains(member))
        });
        if merges_into_existing {
            continue;
        }
        chains.retain(|_, members| !members.iter().all(|member| chain.contains(member)));
        identified.extend(chain.iter().copied());
        chains.insert(pos, chain);
    }

    let moving: BTreeSet<Pos> = chains.values().flatten().copied().collect();
    let locked = grid
        .positions()
        .filter(|&pos| grid.unit(pos).is_some() && !moving.contains(&pos))
        .collect();

    ChainPlan { chains: chains.into_values().collect(), locked }
}

/// Walk forward from `pos` along facings until a free square (chain
/// moves), an obstacle (chain cannot move), or a cycle (ditto).
fn extract_chain(
    grid: &Grid,
    pos: Pos,
    stuck: &BTreeSet<Pos>,
    visited: &mut BTreeSet<Pos>,
) -> Option<Vec<Pos>> {
    if stuck.contains(&pos) || !visited.insert(pos) {
        return None;
    }
    let unit = grid.unit(pos)?;
    let target = pos.step(unit.facing);
    let tile = grid.get(target)?;
    if !tile.terrain.passable() {
        return None;
    }
    if tile.unit.is_none() {
        return Some(vec![pos]);
    }
    let mut chain = extract_chain(grid, target, stuck, visited)?;
    chain.push(pos);
    Some(chain)
}
