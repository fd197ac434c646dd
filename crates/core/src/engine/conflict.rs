//! Conflict detection: before any movement, find every group of units
//! whose intended one-tile advances interfere.

use std::collections::{BTreeMap, BTreeSet};

use crate::board::Grid;
use crate::types::{Pos, Team};

/// Coordinates of every unit belligerent over one contested destination.
/// Ephemeral: built and resolved within a single tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) struct Conflict {
    pub belligerents: BTreeSet<Pos>,
}

pub(super) struct ConflictScan {
    /// Cross-team conflicts keyed by contested destination, resolved in
    /// key order.
    pub conflicts: BTreeMap<Pos, Conflict>,
    /// Losers of same-team ordering conflicts; they hold position this
    /// tick but are not in combat.
    pub stuck: BTreeSet<Pos>,
}

/// Destination claims per team: claimed square -> claiming sources, in
/// row-major discovery order.
struct ClaimTable {
    by_team: [BTreeMap<Pos, Vec<Pos>>; 2],
}

impl ClaimTable {
    fn new() -> ClaimTable {
        ClaimTable { by_team: [BTreeMap::new(), BTreeMap::new()] }
    }

    fn claims(&self, team: Team) -> &BTreeMap<Pos, Vec<Pos>> {
        &self.by_team[team.index()]
    }

    fn push(&mut self, team: Team, destination: Pos, source: Pos) {
        self.by_team[team.index()].entry(destination).or_default().push(source);
    }
}

pub(super) fn scan_conflicts(grid: &Grid) -> ConflictScan {
    let mut claim_table = ClaimTable::new();
    let mut conflicts: BTreeMap<Pos, Conflict> = BTreeMap::new();
    let mut same_team: BTreeMap<Pos, Conflict> = BTreeMap::new();

    for pos in grid.positions() {
        let Some(unit) = grid.unit(pos) else {
            continue;
        };
        let target = pos.step(unit.facing);
        let Some(tile) = grid.get(target) else {
            // Off-board facing: no claim; the chain phase locks the unit.
            continue;
        };
        if !tile.terrain.passable() {
            continue;
        }

        for team in Team::ALL {
            let Some(other_claimants) = claim_table.claims(team).get(&target) else {
                continue;
            };
            let bucket = if team == unit.team { &mut same_team } else { &mut conflicts };
            let conflict = bucket.entry(target).or_default();
            conflict.belligerents.insert(pos);
            conflict.belligerents.extend(other_claimants.iter().copied());
        }
        claim_table.push(unit.team, target, pos);
    }

    // Same-team contention: the claimant with the greatest coordinate
    // (greatest row, then greatest column) proceeds; everyone else holds.
    let mut stuck = BTreeSet::new();
    for conflict in same_team.values() {
        let Some(&winner) = conflict.belligerents.iter().next_back() else {
            continue;
        };
        stuck.extend(conflict.belligerents.iter().copied().filter(|&pos| pos != winner));
    }

    merge_passing_conflicts(&claim_table, &mut conflicts);

    ConflictScan { conflicts, stuck }
}

/// Two units swapping places through each other fight even though they
/// claim different squares.
fn merge_passing_conflicts(claim_table: &ClaimTable, conflicts: &mut BTreeMap<Pos, Conflict>) {
    for team in Team::ALL {
        for (&destination, sources) in claim_table.claims(team) {
            for &source in sources {
                let swaps_back = Team::ALL.iter().any(|&other| {
                    claim_table
                        .claims(other)
                        .get(&source)
                        .is_some_and(|claimants| claimants.contains(&destination))
                });
                if !swaps_back {
                    continue;
                }

                let pair = [source, destination];
                let existing = conflicts
                    .values_mut()
                    .find(|conflict| pair.iter().any(|pos| conflict.belligerents.contains(pos)));
                match existing {
                    Some(conflict) => conflict.belligerents.extend(pair),
                    None => {
                        conflicts.entry(destination).or_default().belligerents.extend(pair);
                    }
                }
            }
        }
    }
}
