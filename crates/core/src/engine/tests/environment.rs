use super::support::{board_from, pos, run_to_rest};
use crate::engine::tick;
use crate::events::BoardEventKind;
use crate::types::{Direction, Pos, Team, Terrain};

#[test]
fn unit_stepping_onto_a_pit_dies_that_tick() {
    let mut board = board_from(&["GRG"], &[(0, 0, Direction::Right, Team::Home)]);

    assert!(tick(&mut board));
    assert_eq!(board.count_units(Team::Home), 0);
    assert_eq!(board.units_killed.get(Team::Home), 1);
    assert!(board.events().iter().any(|event| {
        event.kind == BoardEventKind::UnitDied { at: pos(0, 1), team: Team::Home }
    }));
}

#[test]
fn wall_chips_by_rank_then_collapses_to_rubble() {
    // A pair of rank-2 units; only the one at (0, 1) faces the wall. The
    // line recompute keeps them at rank 2 between ticks.
    let mut board = board_from(
        &["GGL"],
        &[(0, 0, Direction::Left, Team::Home), (0, 1, Direction::Right, Team::Home)],
    );
    for p in [pos(0, 0), pos(0, 1)] {
        board
            .grid_mut()
            .get_mut(p)
            .and_then(|tile| tile.unit.as_mut())
            .expect("unit present")
            .rank = 2;
    }
    board.grid_mut().get_mut(pos(0, 2)).expect("in bounds").terrain =
        Terrain::Wall { health: 3 };

    assert!(tick(&mut board));
    assert_eq!(
        board.grid().get(pos(0, 2)).expect("in bounds").terrain,
        Terrain::Wall { health: 1 }
    );

    assert!(tick(&mut board));
    assert_eq!(board.grid().get(pos(0, 2)).expect("in bounds").terrain, Terrain::Rubble);

    // The breach opens the tile for movement.
    assert!(tick(&mut board));
    assert!(board.grid().unit(pos(0, 2)).is_some());
}

#[test]
fn locked_unit_on_an_exit_is_tallied_and_removed() {
    let mut board = board_from(&["GF"], &[(0, 1, Direction::Right, Team::Home)]);

    assert!(tick(&mut board));
    assert_eq!(board.count_units(Team::Home), 0);
    assert_eq!(board.finished_units.get(Team::Home), 1);
    assert_eq!(board.units_killed.total(), 0);
    assert!(board.events().iter().any(|event| {
        event.kind == BoardEventKind::UnitFinished { at: pos(0, 1), team: Team::Home }
    }));
}

#[test]
fn marcher_walks_off_through_the_exit() {
    let mut board = board_from(&["GGF"], &[(0, 0, Direction::Right, Team::Home)]);

    run_to_rest(&mut board, 6);
    assert_eq!(board.count_units(Team::Home), 0);
    assert_eq!(board.finished_units.get(Team::Home), 1);
}

#[test]
fn teleporter_relocates_an_arriving_unit() {
    let mut board = board_from(&["GNGG"], &[(0, 0, Direction::Right, Team::Home)]);
    board.grid_mut().get_mut(pos(0, 1)).expect("in bounds").terrain =
        Terrain::Teleporter { destination: Some(Pos { y: 0, x: 3 }) };

    assert!(tick(&mut board));
    assert!(board.grid().unit(pos(0, 1)).is_none());
    assert!(board.grid().unit(pos(0, 3)).is_some());
    assert!(board.events().iter().any(|event| {
        event.kind == BoardEventKind::UnitMoved { from: pos(0, 1), to: pos(0, 3) }
    }));
}

#[test]
fn unconfigured_teleporter_leaves_the_unit_in_place() {
    let mut board = board_from(&["GNG"], &[(0, 0, Direction::Right, Team::Home)]);

    assert!(tick(&mut board));
    assert!(board.grid().unit(pos(0, 1)).is_some());
}

#[test]
fn blocked_teleporter_destination_leaves_the_unit_in_place() {
    let mut board = board_from(
        &["GNGG"],
        &[(0, 0, Direction::Right, Team::Home), (0, 3, Direction::Right, Team::Rival)],
    );
    board.grid_mut().get_mut(pos(0, 1)).expect("in bounds").terrain =
        Terrain::Teleporter { destination: Some(Pos { y: 0, x: 3 }) };

    tick(&mut board);
    assert!(board.grid().unit(pos(0, 1)).is_some());
    assert_eq!(board.count_units(Team::Home), 1);
    assert_eq!(board.count_units(Team::Rival), 1);
}

#[test]
fn bounce_pad_turns_an_aligned_facing_counter_clockwise() {
    // Pad orientation defaults to Right; an arriving Right-facing unit is
    // aligned with it and turns counter-clockwise to face Up.
    let mut board = board_from(&["GTG", "GGG"], &[(0, 0, Direction::Right, Team::Home)]);

    assert!(tick(&mut board));
    assert_eq!(board.grid().unit(pos(0, 1)).expect("on pad").facing, Direction::Up);
}

#[test]
fn bounce_pad_turns_a_crossing_facing_clockwise() {
    let mut board = board_from(&["GGG", "GTG"], &[(0, 1, Direction::Down, Team::Home)]);

    assert!(tick(&mut board));
    assert_eq!(board.grid().unit(pos(1, 1)).expect("on pad").facing, Direction::Left);
}
