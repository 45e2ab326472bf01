//! Shared fixtures for simulation tests

use crate::consts::SIM_DT;

use super::rules::WinRule;
use super::state::{GamePhase, LevelState, Player, Polarity, Tuning};
use super::tick::{tick, PlayerInput, TickInput};

/// A 12x8 room with a solid floor and both players standing on it.
pub fn room(rule: WinRule) -> LevelState {
    let (rows, cols) = (8, 12);
    let mut tiles = vec![vec![0u8; cols]; rows];
    for c in 0..cols {
        tiles[rows - 1][c] = 1;
    }
    // Floor top is at y=280; a 32px player rests at y=248
    let players = [
        Player::new(80.0, 248.0, Polarity::Blue),
        Player::new(160.0, 248.0, Polarity::Red),
    ];
    let spawns = [players[0].body.pos, players[1].body.pos];
    let progress = rule.initial_progress();
    let mut state = LevelState {
        level: 0,
        seed: 0,
        tile_size: 40.0,
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
        tuning: Tuning::default(),
        phase: GamePhase::Playing,
        game_over_reason: None,
        time: 0.0,
    };
    if let Some(max) = state.rule.max_oxygen() {
        for p in &mut state.players {
            p.oxygen = max;
        }
    }
    state.rebuild_solids();
    state
}

/// Run the sim with no input for roughly the given wall-clock duration.
pub fn settle(state: &mut LevelState, seconds: f32) {
    let input = TickInput::default();
    for _ in 0..(seconds / SIM_DT).round() as u32 {
        tick(state, &input, SIM_DT);
    }
}

/// An input snapshot with one player's controls set.
pub fn input_for(idx: usize, pin: PlayerInput) -> TickInput {
    let mut input = TickInput::default();
    input.players[idx] = pin;
    input
}
