//! Presentation event queue produced by the tick orchestrator.
//!
//! The queue is cleared at the start of every tick and repopulated as the
//! tick runs; the renderer consumes and discards it each frame. Nothing in
//! the simulation reads these events back.

use crate::types::{Pos, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardEvent {
    /// Tick that produced this event.
    pub tick: u64,
    pub kind: BoardEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEventKind {
    UnitMoved { from: Pos, to: Pos },
    UnitDied { at: Pos, team: Team },
    UnitFinished { at: Pos, team: Team },
    /// Vertical same-team run longer than one closed at `col`, spanning
    /// `start_row..=end_row`.
    Flank { col: i32, start_row: i32, end_row: i32 },
}
