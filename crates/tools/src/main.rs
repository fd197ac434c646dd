use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use game_core::{
    Board, Direction, Pos, Team, TileRecord, UnitPlacement, board_from_layout,
    board_from_records, tick,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a saved board JSON file; omit to run the built-in demo level
    #[arg(short, long)]
    board: Option<String>,
    /// Maximum ticks to simulate before giving up
    #[arg(short, long, default_value_t = 200)]
    max_ticks: u32,
}

fn demo_board() -> Board {
    let rows = [
        "FGGWWWGGF",
        "FGGGGGGGF",
        "FGGGGGGGF",
        "FGGGGGGGF",
        "FGGGGGGGF",
        "FGGGGGGGF",
    ];
    let placeable = BTreeSet::from([1, 2]);
    let units = BTreeMap::from([(
        Pos { y: 2, x: 1 },
        UnitPlacement { facing: Direction::Left, team: Team::Rival },
    )]);
    board_from_layout(&rows, &placeable, &units).expect("demo level is valid")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut board = match &args.board {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read board file: {path}"))?;
            let records: Vec<Vec<TileRecord>> =
                serde_json::from_str(&data).context("Failed to deserialize board JSON")?;
            board_from_records(&records).context("Board failed to load")?
        }
        None => demo_board(),
    };

    let mut settled = false;
    for _ in 0..args.max_ticks {
        if !tick(&mut board) {
            settled = true;
            break;
        }
    }

    println!("Simulation {} after {} ticks.", if settled { "settled" } else { "still running" }, board.ticks());
    for team in Team::ALL {
        println!(
            "{team:?}: {} on board, {} finished, {} killed",
            board.count_units(team),
            board.finished_units.get(team),
            board.units_killed.get(team),
        );
    }
    println!("Snapshot Hash: {}", board.snapshot_hash());

    Ok(())
}
