pub mod board;
pub mod engine;
pub mod events;
pub mod level;
pub mod save;
pub mod types;

pub use board::{Board, Grid};
pub use engine::tick;
pub use events::{BoardEvent, BoardEventKind};
pub use level::{LevelError, UnitPlacement, board_from_layout};
pub use save::{TileRecord, UnitRecord, board_from_records, board_to_records};
pub use types::*;
