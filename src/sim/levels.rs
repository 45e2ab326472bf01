//! Hand-authored level data for the three campaign levels
//!
//! Levels are plain data: a tile grid, entity placements, and a `WinRule`.
//! One generic runner (`tick` + `rules`) interprets all of them; nothing in
//! here carries behavior of its own.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::rules::WinRule;
use super::state::{
    Button, Crate, EnergyKind, EnergyNode, FadeWall, GamePhase, Gem, Generator, Hazard,
    LevelState, MovingPlatform, Player, Polarity, Tuning, Zone,
};

/// Build a campaign level by number. Returns `None` for unknown levels.
pub fn load(level: u32, seed: u64) -> Option<LevelState> {
    match level {
        1 => Some(level1(seed)),
        2 => Some(level2(seed)),
        3 => Some(level3(seed)),
        _ => None,
    }
}

fn empty_grid(rows: usize, cols: usize) -> Vec<Vec<u8>> {
    vec![vec![0; cols]; rows]
}

fn hline(tiles: &mut [Vec<u8>], row: usize, c0: usize, c1: usize) {
    for c in c0..=c1 {
        tiles[row][c] = 1;
    }
}

fn vline(tiles: &mut [Vec<u8>], col: usize, r0: usize, r1: usize) {
    for line in tiles.iter_mut().take(r1 + 1).skip(r0) {
        line[col] = 1;
    }
}

fn border(tiles: &mut [Vec<u8>], floor: bool) {
    let rows = tiles.len();
    let cols = tiles[0].len();
    hline(tiles, 0, 0, cols - 1);
    if floor {
        hline(tiles, rows - 1, 0, cols - 1);
    }
    vline(tiles, 0, 0, rows - 1);
    vline(tiles, cols - 1, 0, rows - 1);
}

fn base_state(
    level: u32,
    seed: u64,
    tile_size: f32,
    tiles: Vec<Vec<u8>>,
    players: [Player; 2],
    rule: WinRule,
    tuning: Tuning,
) -> LevelState {
    let rows = tiles.len();
    let cols = tiles[0].len();
    let spawns = [players[0].body.pos, players[1].body.pos];
    let progress = rule.initial_progress();
    let mut state = LevelState {
        level,
        seed,
        tile_size,
        cols,
        rows,
        tiles,
        solids: Vec::new(),
        players,
        spawns,
        crates: Vec::new(),
        crate_spawns: Vec::new(),
        buttons: Vec::new(),
        wall: None,
        platforms: Vec::new(),
        generators: Vec::new(),
        energy_nodes: Vec::new(),
        gems: Vec::new(),
        hazards: Vec::new(),
        goal: None,
        hub: None,
        exit: None,
        charge_zones: None,
        rule,
        progress,
        tuning,
        phase: GamePhase::Playing,
        game_over_reason: None,
        time: 0.0,
    };
    if let Some(max) = state.rule.max_oxygen() {
        state.players[0].oxygen = max;
        state.players[1].oxygen = max;
    }
    state.rebuild_solids();
    state
}

fn add_crate(state: &mut LevelState, x: f32, y: f32, polarity: Polarity) {
    state.crates.push(Crate::new(x, y, polarity));
    state.crate_spawns.push(Vec2::new(x, y));
}

/// Level 1: push both crates to their buttons to release the fade wall,
/// then meet in the goal alcove behind it.
///
/// The load-bearing geometry is authored; a handful of decorative platforms
/// are scattered from the run seed, away from the reserved play cells.
pub fn level1(seed: u64) -> LevelState {
    const TS: f32 = 40.0;
    let (rows, cols) = (18, 30);
    let mut tiles = empty_grid(rows, cols);
    border(&mut tiles, true);

    // Crate shelves either side of center
    hline(&mut tiles, 13, 10, 12);
    hline(&mut tiles, 13, 17, 19);
    // Steps down to the button pits
    tiles[15][7] = 1;
    tiles[14][8] = 1;
    tiles[15][22] = 1;
    tiles[14][21] = 1;

    // Decorative scatter, deterministic per run seed. Stays in the upper
    // half and off the goal corridor so it never blocks the puzzle.
    let mut rng = Pcg32::seed_from_u64(seed);
    for _ in 0..10 {
        let row = rng.random_range(3..10);
        let col = rng.random_range(2..24);
        let len = rng.random_range(2..5);
        for c in col..(col + len).min(cols - 2) {
            tiles[row][c] = 1;
        }
    }

    let players = [
        Player::new(TS * 2.0, TS * 15.0, Polarity::Blue),
        Player::new(TS * 4.0, TS * 15.0, Polarity::Red),
    ];

    let mut state = base_state(
        1,
        seed,
        TS,
        tiles,
        players,
        WinRule::BoxGate,
        Tuning {
            push_factor: 0.8,
            charge_factor: 0.6,
            button_proximity: 50.0,
        },
    );

    add_crate(&mut state, TS * 11.0, TS * 11.5, Polarity::Blue);
    add_crate(&mut state, TS * 18.0, TS * 11.5, Polarity::Red);

    // Buttons sit flush on the floor
    state.buttons.push(Button::new(TS * 5.0, TS * 17.0, Polarity::Blue));
    state.buttons.push(Button::new(TS * 24.0, TS * 17.0, Polarity::Red));

    // Fade wall seals the goal alcove on the right
    state.wall = Some(FadeWall::new(TS * 27.0, TS * 13.0, TS, TS * 4.0));
    state.goal = Some(Zone::new(TS * 28.0, TS * 15.0, TS * 1.5, TS * 2.0));

    state
}

/// Level 2: lava cavern. Buttons hold a portal open while both players drain
/// their oxygen racing a global countdown; elevators bridge the routes.
pub fn level2(seed: u64) -> LevelState {
    const TS: f32 = 36.0;
    let (rows, cols) = (20, 30);
    let mut tiles = empty_grid(rows, cols);
    // Frame is open at the bottom: the lava pit below is the kill plane
    hline(&mut tiles, 0, 0, cols - 1);
    vline(&mut tiles, 0, 0, rows - 1);
    vline(&mut tiles, cols - 1, 0, rows - 1);

    // Central base
    hline(&mut tiles, 16, 10, 19);
    hline(&mut tiles, 9, 12, 17);

    // Left route: crate perch up top, a two-tile floater to catch the
    // dropped crate (wide enough to stand beside it), button ledge below
    hline(&mut tiles, 13, 3, 4);
    tiles[14][4] = 1;
    hline(&mut tiles, 16, 1, 3);
    hline(&mut tiles, 6, 1, 2);

    // Right route, mirrored
    hline(&mut tiles, 13, 25, 26);
    tiles[14][25] = 1;
    hline(&mut tiles, 16, 26, 28);
    hline(&mut tiles, 6, 27, 28);

    let players = [
        Player::new(TS * 13.0, TS * 14.0, Polarity::Blue),
        Player::new(TS * 16.0, TS * 14.0, Polarity::Red),
    ];

    let mut state = base_state(
        2,
        seed,
        TS,
        tiles,
        players,
        WinRule::PortalExit {
            time_limit: 60.0,
            required_exit_time: 1.0,
            max_oxygen: 15.0,
            oxygen_drain: 1.0,
            oxygen_regen: 5.0,
            respawn_penalty: 5.0,
        },
        Tuning {
            push_factor: 0.8,
            charge_factor: 0.6,
            button_proximity: 50.0,
        },
    );

    add_crate(&mut state, TS * 2.0, TS * 5.0, Polarity::Blue);
    add_crate(&mut state, TS * 27.0, TS * 5.0, Polarity::Red);

    state.buttons.push(Button::new(TS * 2.0, TS * 16.0, Polarity::Blue));
    state.buttons.push(Button::new(TS * 27.0, TS * 16.0, Polarity::Red));

    // Elevators between the crate perches and the button ledges, running in
    // antiphase
    state
        .platforms
        .push(MovingPlatform::new(TS * 7.0, TS * 10.0, TS * 2.0, TS, 150.0));
    let mut right = MovingPlatform::new(TS * 22.0, TS * 10.0, TS * 2.0, TS, 150.0);
    right.time = std::f32::consts::PI;
    state.platforms.push(right);

    // Breathable hub around the central base
    state.hub = Some(Zone::new(TS * 10.0, TS * 10.0, TS * 10.0, TS * 8.0));
    // Exit zone reaches slightly above its tile bounds so a jump inside the
    // portal still counts
    state.exit = Some(Zone::new(TS * 13.0, TS * 12.0 - 20.0, TS * 4.0, TS * 4.0 + 20.0));

    state
}

/// Level 3: power both generators through their button dependency sets, then
/// hold the color-matched charge zones until both countdowns empty.
///
/// Crates only move sideways and down, so the layout is a cascade: shelves
/// on top hold the crates, button decks sit below the shelf edges, and the
/// last two buttons are on the floor below the deck edges.
pub fn level3(seed: u64) -> LevelState {
    const TS: f32 = 40.0;
    let (rows, cols) = (18, 30);
    let mut tiles = empty_grid(rows, cols);
    border(&mut tiles, true);

    // Crate shelves
    hline(&mut tiles, 4, 3, 9);
    hline(&mut tiles, 4, 20, 26);

    // Button decks below the shelves. The decks stop two columns short of
    // the walls, leaving floor slots where a player can get behind a
    // dropped crate.
    hline(&mut tiles, 9, 3, 12);
    hline(&mut tiles, 9, 17, 26);

    // Central tower, floor to deck height
    hline(&mut tiles, 15, 14, 15);
    hline(&mut tiles, 13, 15, 16);
    hline(&mut tiles, 11, 13, 14);

    // Deck-to-shelf steps, approaching each shelf from its open end
    tiles[8][11] = 1;
    tiles[6][10] = 1;
    tiles[8][18] = 1;
    tiles[6][19] = 1;

    let players = [
        Player::new(TS * 3.0, TS * 15.0, Polarity::Blue),
        Player::new(TS * 26.0, TS * 15.0, Polarity::Red),
    ];

    let mut state = base_state(
        3,
        seed,
        TS,
        tiles,
        players,
        WinRule::PoweredCharge { drain_time: 45.0 },
        // The lighter push here is deliberate: crates must be dropped onto
        // narrow button decks
        Tuning {
            push_factor: 0.6,
            charge_factor: 0.6,
            button_proximity: 50.0,
        },
    );

    // Three crates of each color start on the shelves
    add_crate(&mut state, TS * 4.0, TS * 3.0, Polarity::Blue);
    add_crate(&mut state, TS * 6.0, TS * 3.0, Polarity::Blue);
    add_crate(&mut state, TS * 8.0, TS * 3.0, Polarity::Red);
    add_crate(&mut state, TS * 21.0, TS * 3.0, Polarity::Red);
    add_crate(&mut state, TS * 23.0, TS * 3.0, Polarity::Red);
    add_crate(&mut state, TS * 25.0, TS * 3.0, Polarity::Blue);

    // Deck buttons 0..5, floor buttons 6..7. Buttons 2 and 3 feed neither
    // generator.
    let button_spots: [(f32, f32, Polarity); 8] = [
        (4.0, 9.0, Polarity::Blue),
        (7.0, 9.0, Polarity::Red),
        (10.0, 9.0, Polarity::Blue),
        (19.0, 9.0, Polarity::Red),
        (22.0, 9.0, Polarity::Blue),
        (25.0, 9.0, Polarity::Red),
        (9.0, 17.0, Polarity::Blue),
        (20.0, 17.0, Polarity::Red),
    ];
    for (x, y, polarity) in button_spots {
        state.buttons.push(Button::new(TS * x, TS * y, polarity));
    }

    state
        .generators
        .push(Generator::new(TS * 5.0, TS * 3.0, vec![0, 1, 6]));
    state
        .generators
        .push(Generator::new(TS * 24.0, TS * 3.0, vec![4, 5, 7]));

    // Drain zones in the floor corners
    state.charge_zones = Some([
        Zone::new(TS * 1.5, TS * 17.0 - 48.0, 48.0, 48.0),
        Zone::new(TS * 27.0, TS * 17.0 - 48.0, 48.0, 48.0),
    ]);

    // Lava pools under the central tower, with a narrow safe island
    // between them
    state.hazards.push(Hazard {
        zone: Zone::new(TS * 13.0, TS * 16.5, TS * 1.5, TS * 1.5),
    });
    state.hazards.push(Hazard {
        zone: Zone::new(TS * 15.5, TS * 16.5, TS * 1.5, TS * 1.5),
    });

    for (x, y) in [(4.0, 2.0), (24.0, 2.0), (14.0, 13.0), (14.0, 10.0), (15.0, 7.0)] {
        state.gems.push(Gem {
            pos: Vec2::new(TS * x, TS * y),
            collected: false,
        });
    }

    // Optional energy run: battery on the floor strip between the lava
    // pools, delivery point beside the left generator
    state
        .energy_nodes
        .push(EnergyNode::new(TS * 14.5, TS * 16.0, EnergyKind::Source));
    state
        .energy_nodes
        .push(EnergyNode::new(TS * 4.0, TS * 3.0, EnergyKind::Sink));

    state
}
