use serde::{Deserialize, Serialize};

/// Offensive power cap reached by a horizontal run of four or more.
pub const MAX_RANK: u8 = 4;
/// Defense cap reached by a vertical run of five or more.
pub const MAX_DEFENSE: u8 = 5;
pub const WALL_STARTING_HEALTH: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    /// Coordinate one tile away in `facing`. May fall outside any grid;
    /// callers bounds-check via `Grid::get`.
    pub fn step(self, facing: Direction) -> Pos {
        let (dy, dx) = facing.offset();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn rotated_cw(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn rotated_ccw(self) -> Direction {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Home,
    Rival,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Home, Team::Rival];

    pub fn opponent(self) -> Team {
        match self {
            Team::Home => Team::Rival,
            Team::Rival => Team::Home,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Team::Home => 0,
            Team::Rival => 1,
        }
    }
}

/// Tile terrain with the simulation-relevant per-variant data attached.
/// Presentation concerns (imagery) live in the renderer's own lookup
/// table keyed by the same variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terrain {
    Open,
    Water,
    BouncePad { orientation: Direction },
    Wall { health: u32 },
    Rubble,
    Pit,
    Exit,
    Teleporter { destination: Option<Pos> },
}

impl Terrain {
    pub fn passable(self) -> bool {
        !matches!(self, Terrain::Water | Terrain::Wall { .. })
    }

    /// Single-character code used by level layouts and the save format.
    pub fn code(self) -> char {
        match self {
            Terrain::Open => 'G',
            Terrain::Water => 'W',
            Terrain::BouncePad { .. } => 'T',
            Terrain::Wall { .. } => 'L',
            Terrain::Rubble => 'D',
            Terrain::Pit => 'R',
            Terrain::Exit => 'F',
            Terrain::Teleporter { .. } => 'N',
        }
    }

    /// Terrain for a layout code, with per-variant data at its defaults.
    pub fn from_code(code: char) -> Option<Terrain> {
        match code {
            'G' => Some(Terrain::Open),
            'W' => Some(Terrain::Water),
            'T' => Some(Terrain::BouncePad { orientation: Direction::Right }),
            'L' => Some(Terrain::Wall { health: WALL_STARTING_HEALTH }),
            'D' => Some(Terrain::Rubble),
            'R' => Some(Terrain::Pit),
            'F' => Some(Terrain::Exit),
            'N' => Some(Terrain::Teleporter { destination: None }),
            _ => None,
        }
    }
}

/// One movable combatant. Equality is by value (rank, facing, team,
/// defense); it backs board-change detection, not identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    pub rank: u8,
    pub facing: Direction,
    pub team: Team,
    pub defense: u8,
}

impl Unit {
    pub fn new(facing: Direction, team: Team) -> Unit {
        Unit { rank: 1, facing, team, defense: 1 }
    }

    pub fn rotate_cw(&mut self) {
        self.facing = self.facing.rotated_cw();
    }

    pub fn rotate_ccw(&mut self) {
        self.facing = self.facing.rotated_ccw();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub terrain: Terrain,
    pub unit: Option<Unit>,
    pub placeable: bool,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Tile {
        Tile { terrain, unit: None, placeable: true }
    }

    /// Clear to walk onto: passable terrain and no unit standing there.
    pub fn is_free(&self) -> bool {
        self.terrain.passable() && self.unit.is_none()
    }
}

/// Per-team counters (kills, finishes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamCounts {
    counts: [u32; 2],
}

impl TeamCounts {
    pub fn get(&self, team: Team) -> u32 {
        self.counts[team.index()]
    }

    pub fn get_mut(&mut self, team: Team) -> &mut u32 {
        &mut self.counts[team.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}
