use std::collections::{BTreeMap, BTreeSet};

use crate::board::Board;
use crate::level::{UnitPlacement, board_from_layout};
use crate::types::{Direction, Pos, Team};

pub fn pos(y: i32, x: i32) -> Pos {
    Pos { y, x }
}

/// Board from a textual layout and unit list; all columns placeable.
pub fn board_from(rows: &[&str], units: &[(i32, i32, Direction, Team)]) -> Board {
    let placements: BTreeMap<Pos, UnitPlacement> = units
        .iter()
        .map(|&(y, x, facing, team)| (pos(y, x), UnitPlacement { facing, team }))
        .collect();
    let columns: BTreeSet<usize> =
        (0..rows.first().map_or(0, |row| row.len())).collect();
    board_from_layout(rows, &columns, &placements).expect("valid test layout")
}

/// Tick until the board reports no change; returns the number of ticks
/// taken, the final settled tick included.
pub fn run_to_rest(board: &mut Board, max_ticks: u32) -> u32 {
    for n in 1..=max_ticks {
        if !crate::engine::tick(board) {
            return n;
        }
    }
    panic!("board still changing after {max_ticks} ticks");
}
