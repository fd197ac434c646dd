use core::{Board, Direction, Grid, Pos, Team, Terrain, Unit, tick};
use proptest::{
    arbitrary::any,
    test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const DIRECTIONS: [Direction; 4] =
    [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_board(seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let width = 2 + (rng.next_u64() % 6) as usize;
    let height = 2 + (rng.next_u64() % 6) as usize;
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
                91..96 => Terrain::BouncePad { orientation: choose(&mut rng, &DIRECTIONS) },
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
                let facing = choose(&mut rng, &DIRECTIONS);
                let team =
                    if rng.next_u64() % 2 == 0 { Team::Home } else { Team::Rival };
                tile.unit = Some(Unit::new(facing, team));
            }
        }
    }

    Board::new(grid)
}

fn check_invariants(board: &Board) -> Result<(), String> {
    for pos in board.grid().positions() {
        let tile = board.grid().get(pos).expect("position in bounds");
        if tile.unit.is_some() && !tile.terrain.passable() {
            return Err(format!("unit on impassable terrain at ({}, {})", pos.y, pos.x));
        }
    }
    Ok(())
}

fn run_fuzz_simulation(seed: u64, max_ticks: u32) -> Result<(), String> {
    let mut board = random_board(seed);
    let starting: Vec<u32> = Team::ALL.iter().map(|&team| board.count_units(team)).collect();

    for _ in 0..max_ticks {
        let mut shadow = board.clone();

        let changed = tick(&mut board);
        let shadow_changed = tick(&mut shadow);

        if changed != shadow_changed || board.snapshot_hash() != shadow.snapshot_hash() {
            return Err(format!("seed {seed}: tick diverged between identical boards"));
        }
        check_invariants(&board)?;

        // Conservation holds per team: a lost unit of one side must not be
        // balanced by a phantom unit of the other.
        for (&team, &started) in Team::ALL.iter().zip(&starting) {
            let accounted = board.count_units(team)
                + board.units_killed.get(team)
                + board.finished_units.get(team);
            if accounted != started {
                return Err(format!(
                    "seed {seed}: {team:?} had {started} units at start but {accounted} accounted for"
                ));
            }
        }

        if !changed {
            break;
        }
    }
    Ok(())
}

#[test]
fn fuzz_fixed_seeds() {
    for seed in [0, 1, 7, 42, 1337, 0xDEAD_BEEF] {
        run_fuzz_simulation(seed, 64).expect("invariant violated");
    }
}

#[test]
fn fuzz_random_seeds() {
    let mut runner = TestRunner::new(ProptestConfig::with_cases(64));
    runner
        .run(&any::<u64>(), |seed| {
            run_fuzz_simulation(seed, 48).map_err(TestCaseError::fail)
        })
        .expect("fuzz property failed");
}
