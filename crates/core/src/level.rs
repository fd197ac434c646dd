//! Level data loading: rectangular single-character terrain layouts plus a
//! sparse initial-unit map. Malformed data fails fast here; nothing past
//! load time reports user-visible errors.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::board::{Board, Grid};
use crate::types::{Direction, Pos, Team, Terrain, Tile, Unit};

/// Initial-unit descriptor: units always spawn at rank 1 / defense 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitPlacement {
    pub facing: Direction,
    pub team: Team,
}

#[derive(Debug)]
pub enum LevelError {
    EmptyLayout,
    /// A row's length differs from the first row's.
    RaggedRow { row: usize, len: usize, expected: usize },
    UnknownTerrain { code: char, pos: Pos },
    UnitOutOfBounds { pos: Pos },
    UnitOnImpassable { pos: Pos },
    /// A persisted unit carried a rank or defense outside its legal range.
    InvalidUnitStats { pos: Pos, rank: u8, defense: u8 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayout => write!(f, "level layout has no rows or no columns"),
            Self::RaggedRow { row, len, expected } => {
                write!(f, "row {row} has {len} tiles, expected {expected}")
            }
            Self::UnknownTerrain { code, pos } => {
                write!(f, "unknown terrain code {code:?} at ({}, {})", pos.y, pos.x)
            }
            Self::UnitOutOfBounds { pos } => {
                write!(f, "unit placed outside the board at ({}, {})", pos.y, pos.x)
            }
            Self::UnitOnImpassable { pos } => {
                write!(f, "unit placed on impassable terrain at ({}, {})", pos.y, pos.x)
            }
            Self::InvalidUnitStats { pos, rank, defense } => {
                write!(
                    f,
                    "unit at ({}, {}) has out-of-range stats (rank {rank}, defense {defense})",
                    pos.y, pos.x
                )
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Build a board from a textual layout, the set of player-placeable
/// columns, and the level's initial units.
pub fn board_from_layout(
    rows: &[&str],
    placeable_columns: &BTreeSet<usize>,
    units: &BTreeMap<Pos, UnitPlacement>,
) -> Result<Board, LevelError> {
    let expected = rows.first().map_or(0, |row| row.chars().count());
    if rows.is_empty() || expected == 0 {
        return Err(LevelError::EmptyLayout);
    }

    let mut tile_rows = Vec::with_capacity(rows.len());
    for (y, row) in rows.iter().enumerate() {
        let len = row.chars().count();
        if len != expected {
            return Err(LevelError::RaggedRow { row: y, len, expected });
        }
        let mut tiles = Vec::with_capacity(expected);
        for (x, code) in row.chars().enumerate() {
            let pos = Pos { y: y as i32, x: x as i32 };
            let Some(terrain) = Terrain::from_code(code) else {
                return Err(LevelError::UnknownTerrain { code, pos });
            };
            let mut tile = Tile::new(terrain);
            tile.placeable = placeable_columns.contains(&x);
            tiles.push(tile);
        }
        tile_rows.push(tiles);
    }

    let mut grid = Grid::from_rows(tile_rows);
    for (&pos, placement) in units {
        let Some(tile) = grid.get_mut(pos) else {
            return Err(LevelError::UnitOutOfBounds { pos });
        };
        if !tile.terrain.passable() {
            return Err(LevelError::UnitOnImpassable { pos });
        }
        tile.unit = Some(Unit::new(placement.facing, placement.team));
    }

    Ok(Board::new(grid))
}
