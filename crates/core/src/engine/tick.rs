//! One simulation step: combat on the current grid, then movement into a
//! fresh next-state grid, then environmental effects, then formation
//! bonuses.

use crate::board::{Board, Grid};
use crate::engine::chain::{ChainPlan, plan_chains};
use crate::engine::combat::resolve_conflict;
use crate::engine::conflict::scan_conflicts;
use crate::events::BoardEventKind;
use crate::types::{MAX_DEFENSE, MAX_RANK, Pos, Team, Terrain, Tile, Unit};

/// Advance the board one tick. Returns whether anything on the grid
/// changed, formation-bonus recomputation excluded; callers loop until it
/// reports a settled board.
pub fn tick(board: &mut Board) -> bool {
    board.begin_tick();

    let scan = scan_conflicts(board.grid());
    for conflict in scan.conflicts.values() {
        let casualties = resolve_conflict(board.grid(), &conflict.belligerents);
        for pos in casualties {
            let Some(unit) = board.grid_mut().take_unit(pos) else {
                continue;
            };
            *board.units_killed.get_mut(unit.team) += 1;
            board.push_event(BoardEventKind::UnitDied { at: pos, team: unit.team });
        }
    }

    let plan = plan_chains(board.grid(), &scan.stuck);

    // Change detection compares against the post-combat grid, so a tick
    // whose only activity was combat still reports settled afterwards.
    let current = board.grid().clone();
    let mut next = current.terrain_only();

    apply_chains(board, &current, &mut next, &plan);
    settle_locked(board, &current, &mut next, &plan);
    apply_environment(board, &mut next);
    apply_bounce_pads(&mut next);

    let changed = next != current;
    board.set_grid(next);
    recompute_formations(board);
    changed
}

fn apply_chains(board: &mut Board, current: &Grid, next: &mut Grid, plan: &ChainPlan) {
    for chain in &plan.chains {
        // An earlier chain may have taken this chain's head destination
        // (two conflict survivors can still share a claim). The chain then
        // halts: the head and everyone queued behind it hold position.
        let mut halted = false;
        for &pos in chain {
            let unit = *current.unit(pos).expect("chain members are occupied");
            let target = pos.step(unit.facing);
            let target_free =
                !halted && next.get(target).is_some_and(|tile| tile.unit.is_none());
            if target_free {
                next.get_mut(target).expect("checked in bounds").unit = Some(unit);
                board.push_event(BoardEventKind::UnitMoved { from: pos, to: target });
            } else {
                halted = true;
                // Halted members hold squares no other chain can target:
                // chains are disjoint and heads only step into squares
                // that were free before movement. Never overwrite.
                let tile = next.get_mut(pos).expect("chain members are on the board");
                if tile.unit.is_none() {
                    tile.unit = Some(unit);
                }
            }
        }
    }
}

/// Units that hold position this tick either leave through an exit or are
/// carried over in place.
fn settle_locked(board: &mut Board, current: &Grid, next: &mut Grid, plan: &ChainPlan) {
    for &pos in &plan.locked {
        let unit = *current.unit(pos).expect("locked positions are occupied");
        let terrain = current.get(pos).expect("locked positions are on the board").terrain;
        if terrain == Terrain::Exit {
            *board.finished_units.get_mut(unit.team) += 1;
            board.push_event(BoardEventKind::UnitFinished { at: pos, team: unit.team });
        } else {
            next.get_mut(pos).expect("locked positions are on the board").unit = Some(unit);
        }
    }
}

fn apply_environment(board: &mut Board, next: &mut Grid) {
    let occupied: Vec<Pos> = next.positions().filter(|&pos| next.unit(pos).is_some()).collect();
    for pos in occupied {
        let Some(&unit) = next.unit(pos) else {
            continue;
        };
        let terrain = next.get(pos).expect("occupied implies on the board").terrain;
        match terrain {
            Terrain::Pit => {
                next.take_unit(pos);
                *board.units_killed.get_mut(unit.team) += 1;
                board.push_event(BoardEventKind::UnitDied { at: pos, team: unit.team });
            }
            Terrain::Teleporter { destination: Some(dest) } => {
                // A blocked or missing destination leaves the unit standing
                // on the pad.
                if next.get(dest).is_some_and(Tile::is_free) {
                    next.take_unit(pos);
                    next.get_mut(dest).expect("checked free").unit = Some(unit);
                    board.push_event(BoardEventKind::UnitMoved { from: pos, to: dest });
                }
            }
            _ => damage_faced_wall(next, pos, unit),
        }
    }
}

/// A unit facing an adjacent wall chips it for its rank each tick; a wall
/// that runs out of health collapses into rubble.
fn damage_faced_wall(next: &mut Grid, pos: Pos, unit: Unit) {
    let faced = pos.step(unit.facing);
    let Some(tile) = next.get_mut(faced) else {
        return;
    };
    let Terrain::Wall { health } = tile.terrain else {
        return;
    };
    if health > u32::from(unit.rank) {
        tile.terrain = Terrain::Wall { health: health - u32::from(unit.rank) };
    } else {
        tile.terrain = Terrain::Rubble;
    }
}

/// Bounce pads turn whoever stands on them at tick end: a facing along the
/// pad's orientation turns counter-clockwise, across it clockwise.
fn apply_bounce_pads(next: &mut Grid) {
    for pos in next.positions().collect::<Vec<_>>() {
        let tile = next.get_mut(pos).expect("positions are on the board");
        let Terrain::BouncePad { orientation } = tile.terrain else {
            continue;
        };
        let Some(unit) = tile.unit.as_mut() else {
            continue;
        };
        if orientation.is_horizontal() == unit.facing.is_horizontal() {
            unit.rotate_ccw();
        } else {
            unit.rotate_cw();
        }
    }
}

/// Formation bonuses, recomputed from scratch every tick: rank grows with
/// horizontal same-team runs, defense with vertical ones. Vertical runs
/// longer than one also raise a flank event.
fn recompute_formations(board: &mut Board) {
    let grid = board.grid();
    let mut rank_runs = Vec::new();
    for y in 0..grid.height() as i32 {
        collect_runs(grid, (0..grid.width() as i32).map(|x| Pos { y, x }), &mut rank_runs);
    }
    for run in &rank_runs {
        let rank = (run.len() as u8).min(MAX_RANK);
        for &pos in run {
            set_unit(board, pos, |unit| unit.rank = rank);
        }
    }

    let grid = board.grid();
    let mut defense_runs = Vec::new();
    for x in 0..grid.width() as i32 {
        collect_runs(grid, (0..grid.height() as i32).map(|y| Pos { y, x }), &mut defense_runs);
    }
    for run in &defense_runs {
        let defense = (run.len() as u8).min(MAX_DEFENSE);
        for &pos in run {
            set_unit(board, pos, |unit| unit.defense = defense);
        }
    }
    for run in &defense_runs {
        if run.len() > 1 {
            let first = run[0];
            let last = run[run.len() - 1];
            board.push_event(BoardEventKind::Flank {
                col: first.x,
                start_row: first.y,
                end_row: last.y,
            });
        }
    }
}

/// Split a line of positions into maximal same-team occupied runs.
fn collect_runs(grid: &Grid, line: impl Iterator<Item = Pos>, runs: &mut Vec<Vec<Pos>>) {
    let mut run: Vec<Pos> = Vec::new();
    let mut run_team: Option<Team> = None;
    for pos in line {
        let team = grid.unit(pos).map(|unit| unit.team);
        if team.is_some() && team == run_team {
            run.push(pos);
            continue;
        }
        if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
        if team.is_some() {
            run.push(pos);
        }
        run_team = team;
    }
    if !run.is_empty() {
        runs.push(run);
    }
}

fn set_unit(board: &mut Board, pos: Pos, update: impl FnOnce(&mut Unit)) {
    if let Some(unit) = board.grid_mut().get_mut(pos).and_then(|tile| tile.unit.as_mut()) {
        update(unit);
    }
}
