//! The board: a rectangular tile matrix plus per-team tallies, the tick
//! counter, and the per-tick presentation event queue.

use crate::events::{BoardEvent, BoardEventKind};
use crate::types::{Pos, Team, TeamCounts, Terrain, Tile, Unit};

/// Rectangular row-major tile matrix. Dimensions are fixed outside the
/// explicit editor row/column operations on [`Board`]; all other mutation
/// is cell-local.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, terrain: Terrain) -> Grid {
        Grid { width, height, tiles: vec![Tile::new(terrain); width * height] }
    }

    /// Build from pre-assembled rows. Rows must already be rectangular;
    /// the level loader validates that before calling.
    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>) -> Grid {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|row| row.len() == width));
        Grid { width, height, tiles: rows.into_iter().flatten().collect() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(&self.tiles[self.index(pos)])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        let idx = self.index(pos);
        Some(&mut self.tiles[idx])
    }

    pub fn unit(&self, pos: Pos) -> Option<&Unit> {
        self.get(pos).and_then(|tile| tile.unit.as_ref())
    }

    /// Transfer the unit out of `pos`, leaving the tile empty.
    pub fn take_unit(&mut self, pos: Pos) -> Option<Unit> {
        self.get_mut(pos).and_then(|tile| tile.unit.take())
    }

    /// Row-major coordinate order; the engine's mandated scan order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height)
            .flat_map(move |y| (0..width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    /// Fresh grid with the same terrain and no units. The next-state grid
    /// each tick starts from this, so snapshots never alias units.
    pub fn terrain_only(&self) -> Grid {
        Grid {
            width: self.width,
            height: self.height,
            tiles: self
                .tiles
                .iter()
                .map(|tile| Tile { terrain: tile.terrain, unit: None, placeable: tile.placeable })
                .collect(),
        }
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    pub finished_units: TeamCounts,
    pub units_killed: TeamCounts,
    ticks: u64,
    events: Vec<BoardEvent>,
}

impl Board {
    pub fn new(grid: Grid) -> Board {
        Board {
            grid,
            finished_units: TeamCounts::default(),
            units_killed: TeamCounts::default(),
            ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events produced by the most recent tick, in emission order.
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn count_units(&self, team: Team) -> u32 {
        self.grid
            .positions()
            .filter(|&pos| self.grid.unit(pos).is_some_and(|unit| unit.team == team))
            .count() as u32
    }

    /// Place a freshly created unit. Succeeds only on a free, placeable
    /// tile; returns whether the unit was placed.
    pub fn place_unit(&mut self, pos: Pos, unit: Unit) -> bool {
        let Some(tile) = self.grid.get_mut(pos) else {
            return false;
        };
        if !tile.is_free() || !tile.placeable {
            return false;
        }
        tile.unit = Some(unit);
        true
    }

    pub fn remove_unit(&mut self, pos: Pos) -> Option<Unit> {
        self.grid.take_unit(pos)
    }

    /// Editor rotation: turns the unit standing on the tile, or the pad
    /// orientation when an empty bounce-pad tile is targeted.
    pub fn rotate_cw(&mut self, pos: Pos) {
        let Some(tile) = self.grid.get_mut(pos) else {
            return;
        };
        match tile.unit.as_mut() {
            Some(unit) => unit.rotate_cw(),
            None => {
                if let Terrain::BouncePad { orientation } = tile.terrain {
                    tile.terrain = Terrain::BouncePad { orientation: orientation.rotated_cw() };
                }
            }
        }
    }

    pub fn rotate_ccw(&mut self, pos: Pos) {
        let Some(tile) = self.grid.get_mut(pos) else {
            return;
        };
        match tile.unit.as_mut() {
            Some(unit) => unit.rotate_ccw(),
            None => {
                if let Terrain::BouncePad { orientation } = tile.terrain {
                    tile.terrain = Terrain::BouncePad { orientation: orientation.rotated_ccw() };
                }
            }
        }
    }

    // Structural mutation below is the level editor's surface; the
    // simulation itself never resizes a board.

    pub fn add_row(&mut self) {
        let width = self.grid.width;
        self.grid.tiles.extend(vec![Tile::new(Terrain::Open); width]);
        self.grid.height += 1;
    }

    pub fn remove_row(&mut self) {
        if self.grid.height <= 1 {
            return;
        }
        let width = self.grid.width;
        self.grid.tiles.truncate(self.grid.tiles.len() - width);
        self.grid.height -= 1;
    }

    pub fn add_col(&mut self) {
        let old_width = self.grid.width;
        let mut tiles = Vec::with_capacity((old_width + 1) * self.grid.height);
        for row in self.grid.tiles.chunks(old_width) {
            tiles.extend_from_slice(row);
            tiles.push(Tile::new(Terrain::Open));
        }
        self.grid.tiles = tiles;
        self.grid.width += 1;
    }

    pub fn remove_col(&mut self) {
        if self.grid.width <= 1 {
            return;
        }
        let old_width = self.grid.width;
        let mut tiles = Vec::with_capacity((old_width - 1) * self.grid.height);
        for row in self.grid.tiles.chunks(old_width) {
            tiles.extend_from_slice(&row[..old_width - 1]);
        }
        self.grid.tiles = tiles;
        self.grid.width -= 1;
    }

    /// xxh3 over the canonical byte encoding of the full board state.
    /// Two boards that simulate identically hash identically.
    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write(&self.canonical_bytes());
        hasher.finish()
    }

    fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width as u32).to_le_bytes());
        bytes.extend((self.grid.height as u32).to_le_bytes());
        for tile in &self.grid.tiles {
            bytes.push(tile.terrain.code() as u8);
            match tile.terrain {
                Terrain::Wall { health } => bytes.extend(health.to_le_bytes()),
                Terrain::BouncePad { orientation } => bytes.push(direction_byte(orientation)),
                Terrain::Teleporter { destination: Some(dest) } => {
                    bytes.extend(dest.y.to_le_bytes());
                    bytes.extend(dest.x.to_le_bytes());
                }
                _ => {}
            }
            bytes.push(u8::from(tile.placeable));
            match &tile.unit {
                Some(unit) => {
                    bytes.push(1);
                    bytes.push(unit.rank);
                    bytes.push(direction_byte(unit.facing));
                    bytes.push(unit.team.index() as u8);
                    bytes.push(unit.defense);
                }
                None => bytes.push(0),
            }
        }
        for team in Team::ALL {
            bytes.extend(self.finished_units.get(team).to_le_bytes());
            bytes.extend(self.units_killed.get(team).to_le_bytes());
        }
        bytes.extend(self.ticks.to_le_bytes());
        bytes
    }

    pub(crate) fn begin_tick(&mut self) {
        self.events.clear();
        self.ticks += 1;
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub(crate) fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub(crate) fn push_event(&mut self, kind: BoardEventKind) {
        self.events.push(BoardEvent { tick: self.ticks, kind });
    }
}

fn direction_byte(direction: crate::types::Direction) -> u8 {
    use crate::types::Direction;
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}
