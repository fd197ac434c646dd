use anyhow::{Result, bail};
use clap::Parser;
use game_core::{Board, Direction, Grid, Pos, Team, Terrain, Unit, tick};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random boards to simulate
    #[arg(short, long, default_value_t = 500)]
    rounds: u64,
    /// Tick budget per board
    #[arg(short, long, default_value_t = 64)]
    ticks: u32,
}

const DIRECTIONS: [Direction; 4] =
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_board(rng: &mut ChaCha8Rng) -> Board {
    let width = 2 + (rng.next_u64() % 7) as usize;
    let height = 2 + (rng.next_u64() % 7) as usize;
    let mut grid = Grid::filled(width, height, Terrain::Open);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let roll = rng.next_u64() % 100;
            let terrain = match roll {
                0..55 => Terrain::Open,
                55..65 => Terrain::Water,
                65..73 => Terrain::Wall { health: 1 + (rng.next_u64() % 5) as u32 },
                73..80 => Terrain::Pit,
                80..86 => Terrain::Exit,
                86..91 => Terrain::Rubble,
                91..96 => Terrain::BouncePad { orientation: choose(rng, &DIRECTIONS) },
                _ => Terrain::Teleporter {
                    destination: Some(Pos {
                        y: (rng.next_u64() % height as u64) as i32,
                        x: (rng.next_u64() % width as u64) as i32,
                    }),
                },
            };
            grid.get_mut(Pos { y, x }).expect("in bounds").terrain = terrain;
        }
    }

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let tile = grid.get_mut(Pos { y, x }).expect("in bounds");
            if tile.terrain.passable() && rng.next_u64() % 100 < 30 {
                let facing = choose(rng, &DIRECTIONS);
                let team = if rng.next_u64() % 2 == 0 { Team::Home } else { Team::Rival };
                tile.unit = Some(Unit::new(facing, team));
            }
        }
    }

    Board::new(grid)
}

fn check_round(round: u64, board: &mut Board, max_ticks: u32) -> Result<()> {
    let starting: Vec<u32> = Team::ALL.iter().map(|&team| board.count_units(team)).collect();

    for _ in 0..max_ticks {
        let mut shadow = board.clone();
        let changed = tick(board);
        let shadow_changed = tick(&mut shadow);

        if changed != shadow_changed || board.snapshot_hash() != shadow.snapshot_hash() {
            bail!("round {round}: identical boards diverged on tick {}", board.ticks());
        }

        for pos in board.grid().positions() {
            let tile = board.grid().get(pos).expect("position in bounds");
            if tile.unit.is_some() && !tile.terrain.passable() {
                bail!(
                    "round {round}: unit on impassable terrain at ({}, {})",
                    pos.y,
                    pos.x
                );
            }
        }

        // Conservation holds per team: a lost unit of one side must not be
        // balanced by a phantom unit of the other.
        for (&team, &started) in Team::ALL.iter().zip(&starting) {
            let accounted = board.count_units(team)
                + board.units_killed.get(team)
                + board.finished_units.get(team);
            if accounted != started {
                bail!(
                    "round {round}: {team:?} had {started} units at start, {accounted} accounted for on tick {}",
                    board.ticks()
                );
            }
        }

        if !changed {
            break;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!(
        "Starting fuzz harness on seed {} for {} rounds of up to {} ticks...",
        args.seed, args.rounds, args.ticks
    );
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for round in 0..args.rounds {
        let mut board = random_board(&mut rng);
        check_round(round, &mut board, args.ticks)?;
    }

    println!("All {} rounds passed.", args.rounds);
    Ok(())
}
