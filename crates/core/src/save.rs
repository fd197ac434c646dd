//! Persisted board format: row-major nested arrays of per-tile records.
//!
//! The records are what the external serializer reads and writes; runtime
//! state never leaves the crate in any other shape. Per-variant terrain
//! data is flattened into fixed fields (`wall_health`,
//! `bounce_orientation`, `teleport_destination`) so every tile record has
//! the same schema, matching the original save files.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Grid};
use crate::level::LevelError;
use crate::types::{
    Direction, MAX_RANK, Pos, Team, Terrain, Tile, Unit, WALL_STARTING_HEALTH,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub rank: u8,
    pub direction: Direction,
    pub team: Team,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub terrain_code: char,
    pub unit: Option<UnitRecord>,
    pub placeable: bool,
    pub wall_health: u32,
    pub bounce_orientation: Direction,
    pub teleport_destination: Option<(i32, i32)>,
}

pub fn board_to_records(board: &Board) -> Vec<Vec<TileRecord>> {
    let grid = board.grid();
    (0..grid.height())
        .map(|y| {
            (0..grid.width())
                .map(|x| {
                    let pos = Pos { y: y as i32, x: x as i32 };
                    let tile = grid.get(pos).expect("positions come from grid dimensions");
                    tile_to_record(tile)
                })
                .collect()
        })
        .collect()
}

pub fn board_from_records(records: &[Vec<TileRecord>]) -> Result<Board, LevelError> {
    let expected = records.first().map_or(0, Vec::len);
    if records.is_empty() || expected == 0 {
        return Err(LevelError::EmptyLayout);
    }

    let mut rows = Vec::with_capacity(records.len());
    for (y, record_row) in records.iter().enumerate() {
        if record_row.len() != expected {
            return Err(LevelError::RaggedRow { row: y, len: record_row.len(), expected });
        }
        let mut row = Vec::with_capacity(expected);
        for (x, record) in record_row.iter().enumerate() {
            let pos = Pos { y: y as i32, x: x as i32 };
            row.push(tile_from_record(record, pos)?);
        }
        rows.push(row);
    }

    Ok(Board::new(Grid::from_rows(rows)))
}

fn tile_to_record(tile: &Tile) -> TileRecord {
    let mut record = TileRecord {
        terrain_code: tile.terrain.code(),
        unit: tile.unit.map(|unit| UnitRecord {
            rank: unit.rank,
            direction: unit.facing,
            team: unit.team,
        }),
        placeable: tile.placeable,
        wall_health: WALL_STARTING_HEALTH,
        bounce_orientation: Direction::Right,
        teleport_destination: None,
    };
    match tile.terrain {
        Terrain::Wall { health } => record.wall_health = health,
        Terrain::BouncePad { orientation } => record.bounce_orientation = orientation,
        Terrain::Teleporter { destination } => {
            record.teleport_destination = destination.map(|dest| (dest.y, dest.x));
        }
        _ => {}
    }
    record
}

fn tile_from_record(record: &TileRecord, pos: Pos) -> Result<Tile, LevelError> {
    let terrain = match Terrain::from_code(record.terrain_code) {
        Some(Terrain::Wall { .. }) => Terrain::Wall { health: record.wall_health },
        Some(Terrain::BouncePad { .. }) => {
            Terrain::BouncePad { orientation: record.bounce_orientation }
        }
        Some(Terrain::Teleporter { .. }) => Terrain::Teleporter {
            destination: record.teleport_destination.map(|(y, x)| Pos { y, x }),
        },
        Some(terrain) => terrain,
        None => return Err(LevelError::UnknownTerrain { code: record.terrain_code, pos }),
    };

    let unit = match record.unit {
        Some(unit_record) => {
            if !terrain.passable() {
                return Err(LevelError::UnitOnImpassable { pos });
            }
            if unit_record.rank < 1 || unit_record.rank > MAX_RANK {
                return Err(LevelError::InvalidUnitStats {
                    pos,
                    rank: unit_record.rank,
                    defense: 1,
                });
            }
            // Defense is not persisted; the first post-load tick's line
            // recompute assigns it.
            Some(Unit {
                rank: unit_record.rank,
                facing: unit_record.direction,
                team: unit_record.team,
                defense: 1,
            })
        }
        None => None,
    };

    Ok(Tile { terrain, unit, placeable: record.placeable })
}
