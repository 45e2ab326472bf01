//! Per-level win-condition state machines
//!
//! Each level is the same physics world interpreted under a different
//! `WinRule`. The rule is plain data; `evaluate` advances its progress once
//! per tick after all entities have moved.

use crate::consts::PORTAL_FADE_RATE;

use super::state::{GamePhase, LevelState, Polarity};

/// Which completion logic a level runs under.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WinRule {
    /// Crates near their buttons release the fade wall; then both players
    /// must stand in the goal zone.
    BoxGate,
    /// All buttons pressed keeps a portal open; both players must hold the
    /// exit zone while racing a global timer and per-player oxygen.
    PortalExit {
        time_limit: f32,
        required_exit_time: f32,
        max_oxygen: f32,
        oxygen_drain: f32,
        oxygen_regen: f32,
        respawn_penalty: f32,
    },
    /// Generators powered by button subsets enable color-matched drain
    /// zones; both countdowns must reach zero.
    PoweredCharge { drain_time: f32 },
}

impl WinRule {
    pub fn initial_progress(&self) -> WinProgress {
        match *self {
            WinRule::BoxGate => WinProgress::BoxGate {
                wall_released: false,
            },
            WinRule::PortalExit { time_limit, .. } => WinProgress::PortalExit {
                portal_active: false,
                portal_alpha: 0.0,
                exit_timer: 0.0,
                global_timer: time_limit,
            },
            WinRule::PoweredCharge { drain_time } => WinProgress::PoweredCharge {
                all_powered: false,
                remaining: [drain_time; 2],
                draining: [false; 2],
            },
        }
    }

    /// Oxygen capacity, when this rule tracks oxygen at all.
    pub fn max_oxygen(&self) -> Option<f32> {
        match *self {
            WinRule::PortalExit { max_oxygen, .. } => Some(max_oxygen),
            _ => None,
        }
    }

    pub fn respawn_penalty(&self) -> f32 {
        match *self {
            WinRule::PortalExit { respawn_penalty, .. } => respawn_penalty,
            _ => 0.0,
        }
    }
}

/// Mutable side of a `WinRule`, advanced every tick.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum WinProgress {
    BoxGate {
        wall_released: bool,
    },
    PortalExit {
        portal_active: bool,
        portal_alpha: f32,
        exit_timer: f32,
        global_timer: f32,
    },
    PoweredCharge {
        all_powered: bool,
        /// Seconds left per drain zone, indexed by polarity
        remaining: [f32; 2],
        draining: [bool; 2],
    },
}

/// Advance the level's win condition by one tick. Entities have already
/// moved; this only reads their state and mutates progress/phase.
pub fn evaluate(state: &mut LevelState, dt: f32) {
    let rule = state.rule;
    match rule {
        WinRule::BoxGate => evaluate_box_gate(state, dt),
        WinRule::PortalExit {
            required_exit_time,
            max_oxygen,
            oxygen_drain,
            oxygen_regen,
            ..
        } => evaluate_portal_exit(
            state,
            dt,
            required_exit_time,
            max_oxygen,
            oxygen_drain,
            oxygen_regen,
        ),
        WinRule::PoweredCharge { drain_time } => evaluate_powered_charge(state, dt, drain_time),
    }
}

fn evaluate_box_gate(state: &mut LevelState, dt: f32) {
    // Every button needs a same-color crate resting within the proximity
    // threshold of its center.
    let threshold = state.tuning.button_proximity;
    let all_near = !state.buttons.is_empty()
        && state.buttons.iter().all(|btn| {
            state.crates.iter().any(|c| {
                c.polarity == btn.polarity
                    && c.body.center().distance(btn.zone.center()) < threshold
            })
        });

    let WinProgress::BoxGate { ref mut wall_released } = state.progress else {
        return;
    };

    if all_near && !*wall_released {
        *wall_released = true;
        if let Some(ref mut wall) = state.wall {
            wall.deactivate();
            log::info!("gate wall released");
        }
    }

    if let Some(ref mut wall) = state.wall {
        wall.update(dt);
    }

    let wall_gone = state.wall.as_ref().is_none_or(|w| !w.is_active);
    if *wall_released && wall_gone {
        if let Some(goal) = state.goal {
            let both_in = state.players.iter().all(|p| goal.intersects(&p.body));
            if both_in {
                state.phase = GamePhase::Complete;
                log::info!("level {} complete", state.level);
            }
        }
    }
}

fn evaluate_portal_exit(
    state: &mut LevelState,
    dt: f32,
    required_exit_time: f32,
    max_oxygen: f32,
    oxygen_drain: f32,
    oxygen_regen: f32,
) {
    // Oxygen: regenerate inside the hub, drain outside, respawn at zero.
    if let Some(hub) = state.hub {
        for polarity in [Polarity::Blue, Polarity::Red] {
            let in_hub = hub.intersects(&state.player(polarity).body);
            let player = state.player_mut(polarity);
            if in_hub {
                player.oxygen = (player.oxygen + oxygen_regen * dt).min(max_oxygen);
            } else {
                player.oxygen -= oxygen_drain * dt;
                if player.oxygen <= 0.0 {
                    player.oxygen = 0.0;
                    state.respawn_with_penalty(polarity);
                }
            }
        }
    }

    let all_pressed =
        !state.buttons.is_empty() && state.buttons.iter().all(|b| b.is_pressed);

    let exit = state.exit;
    let both_in_exit = exit
        .map(|z| state.players.iter().all(|p| z.intersects(&p.body)))
        .unwrap_or(false);

    let WinProgress::PortalExit {
        ref mut portal_active,
        ref mut portal_alpha,
        ref mut exit_timer,
        ref mut global_timer,
    } = state.progress
    else {
        return;
    };

    // Global countdown is a parallel fail condition.
    *global_timer -= dt;
    if *global_timer <= 0.0 {
        *global_timer = 0.0;
        state.phase = GamePhase::GameOver;
        state.game_over_reason = Some("Time ran out".to_string());
        return;
    }

    if all_pressed {
        *portal_active = true;
        *portal_alpha = (*portal_alpha + dt * PORTAL_FADE_RATE).min(1.0);
    } else {
        *portal_active = false;
        *portal_alpha = (*portal_alpha - dt * PORTAL_FADE_RATE).max(0.0);
    }

    // Holding the exit zone must be continuous; interrupted progress decays.
    if both_in_exit && *portal_active {
        *exit_timer += dt;
        let fade = (1.0 - *exit_timer).max(0.0);
        for p in &mut state.players {
            p.alpha = fade;
        }
        if *exit_timer >= required_exit_time {
            state.phase = GamePhase::Complete;
            log::info!("level {} complete", state.level);
        }
    } else {
        *exit_timer = (*exit_timer - dt).max(0.0);
        for p in &mut state.players {
            p.alpha = 1.0;
        }
    }
}

fn evaluate_powered_charge(state: &mut LevelState, dt: f32, drain_time: f32) {
    let powered = !state.generators.is_empty() && state.generators.iter().all(|g| g.powered);

    let in_zone: [bool; 2] = match state.charge_zones {
        Some(zones) => [
            zones[0].intersects(&state.players[0].body),
            zones[1].intersects(&state.players[1].body),
        ],
        None => [false; 2],
    };

    let WinProgress::PoweredCharge {
        ref mut all_powered,
        ref mut remaining,
        ref mut draining,
    } = state.progress
    else {
        return;
    };

    *all_powered = powered;
    for i in 0..2 {
        if powered && in_zone[i] {
            remaining[i] = (remaining[i] - dt).max(0.0);
            draining[i] = true;
        } else {
            // Losing generator power resets the countdown entirely.
            if !powered {
                remaining[i] = drain_time;
            }
            draining[i] = false;
        }
    }

    if remaining[0] <= 0.0 && remaining[1] <= 0.0 {
        state.phase = GamePhase::Complete;
        log::info!("level {} complete", state.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Button, Crate, FadeWall, Generator, Zone};
    use crate::sim::testutil::room;
    use glam::Vec2;

    fn portal_rule() -> WinRule {
        WinRule::PortalExit {
            time_limit: 60.0,
            required_exit_time: 1.0,
            max_oxygen: 15.0,
            oxygen_drain: 1.0,
            oxygen_regen: 5.0,
            respawn_penalty: 5.0,
        }
    }

    fn run(state: &mut LevelState, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).round() as u32 {
            evaluate(state, SIM_DT);
        }
    }

    #[test]
    fn box_gate_releases_wall_then_completes_in_goal() {
        let mut state = room(WinRule::BoxGate);
        state.buttons.push(Button::new(100.0, 280.0, Polarity::Blue));
        state.buttons.push(Button::new(300.0, 280.0, Polarity::Red));
        state.wall = Some(FadeWall::new(440.0, 200.0, 40.0, 80.0));
        state.goal = Some(Zone::new(60.0, 200.0, 160.0, 80.0));

        // Crates resting close enough to their button centers
        let mut blue = Crate::new(102.0, 245.0, Polarity::Blue);
        blue.on_ground = true;
        let mut red = Crate::new(302.0, 245.0, Polarity::Red);
        red.on_ground = true;
        state.crates.push(blue);
        state.crates.push(red);

        evaluate(&mut state, SIM_DT);
        assert!(matches!(state.progress, WinProgress::BoxGate { wall_released: true }));
        assert!(state.wall.as_ref().unwrap().deactivating);

        // Wall fades at 0.5 alpha per second
        run(&mut state, 2.1);
        assert!(!state.wall.as_ref().unwrap().is_active);

        // Players already stand inside the goal zone
        evaluate(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn box_gate_ignores_wrong_color_crates() {
        let mut state = room(WinRule::BoxGate);
        state.buttons.push(Button::new(100.0, 280.0, Polarity::Blue));
        state.wall = Some(FadeWall::new(440.0, 200.0, 40.0, 80.0));
        let mut red = Crate::new(102.0, 245.0, Polarity::Red);
        red.on_ground = true;
        state.crates.push(red);

        run(&mut state, 1.0);
        assert!(matches!(state.progress, WinProgress::BoxGate { wall_released: false }));
        assert!(state.wall.as_ref().unwrap().is_active);
    }

    #[test]
    fn portal_fades_with_button_state() {
        let mut state = room(portal_rule());
        state.buttons.push(Button::new(100.0, 280.0, Polarity::Blue));
        state.buttons[0].is_pressed = true;

        run(&mut state, 0.25);
        let WinProgress::PortalExit { portal_active, portal_alpha, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!(portal_active);
        assert!((portal_alpha - 0.5).abs() < 0.05);

        state.buttons[0].is_pressed = false;
        run(&mut state, 0.25);
        let WinProgress::PortalExit { portal_active, portal_alpha, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!(!portal_active);
        assert!(portal_alpha < 0.05);
    }

    #[test]
    fn holding_exit_completes_and_interruption_decays() {
        let mut state = room(portal_rule());
        state.buttons.push(Button::new(100.0, 280.0, Polarity::Blue));
        state.buttons[0].is_pressed = true;
        state.exit = Some(Zone::new(0.0, 200.0, 480.0, 120.0));

        run(&mut state, 0.5);
        let WinProgress::PortalExit { exit_timer, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!((exit_timer - 0.5).abs() < 0.05);
        assert!(state.players[0].alpha < 1.0);

        // Moving a player out interrupts the hold and restores the fade
        let saved = state.players[0].body.pos;
        state.players[0].body.pos = Vec2::new(-200.0, 200.0);
        run(&mut state, 0.3);
        let WinProgress::PortalExit { exit_timer, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!(exit_timer < 0.3);
        assert_eq!(state.players[0].alpha, 1.0);

        state.players[0].body.pos = saved;
        run(&mut state, 1.1);
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn global_timer_expiry_is_game_over() {
        let mut state = room(portal_rule());
        if let WinProgress::PortalExit { ref mut global_timer, .. } = state.progress {
            *global_timer = 0.05;
        }
        run(&mut state, 0.2);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.game_over_reason.as_deref(), Some("Time ran out"));
    }

    #[test]
    fn oxygen_drains_outside_hub_and_respawn_costs_time() {
        let mut state = room(portal_rule());
        // Hub is far away from both players
        state.hub = Some(Zone::new(440.0, 0.0, 40.0, 40.0));

        run(&mut state, 1.0);
        assert!((state.players[0].oxygen - 14.0).abs() < 0.05);

        state.players[0].oxygen = 0.001;
        let spawn = state.spawns[0];
        state.players[0].body.pos = Vec2::new(300.0, 100.0);
        evaluate(&mut state, SIM_DT);

        assert_eq!(state.players[0].body.pos, spawn);
        assert_eq!(state.players[0].oxygen, 15.0);
        let WinProgress::PortalExit { global_timer, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!(global_timer < 55.0);
    }

    #[test]
    fn oxygen_regenerates_in_hub_up_to_max() {
        let mut state = room(portal_rule());
        state.hub = Some(Zone::new(0.0, 0.0, 480.0, 320.0));
        state.players[0].oxygen = 5.0;

        run(&mut state, 1.0);
        assert!((state.players[0].oxygen - 10.0).abs() < 0.1);
        run(&mut state, 5.0);
        assert_eq!(state.players[0].oxygen, 15.0);
    }

    #[test]
    fn powered_charge_drains_both_zones_to_complete() {
        let mut state = room(WinRule::PoweredCharge { drain_time: 2.0 });
        state.generators.push(Generator::new(200.0, 100.0, vec![0]));
        state.generators[0].powered = true;
        // Zones sit over each player's spawn
        state.charge_zones = Some([
            Zone::new(60.0, 220.0, 80.0, 80.0),
            Zone::new(140.0, 220.0, 80.0, 80.0),
        ]);

        run(&mut state, 1.0);
        let WinProgress::PoweredCharge { remaining, draining, .. } = state.progress else {
            panic!("wrong progress variant");
        };
        assert!(draining[0] && draining[1]);
        assert!((remaining[0] - 1.0).abs() < 0.05);

        run(&mut state, 1.1);
        assert_eq!(state.phase, GamePhase::Complete);
    }

    #[test]
    fn losing_generator_power_resets_countdowns() {
        let mut state = room(WinRule::PoweredCharge { drain_time: 2.0 });
        state.generators.push(Generator::new(200.0, 100.0, vec![0]));
        state.generators[0].powered = true;
        state.charge_zones = Some([
            Zone::new(60.0, 220.0, 80.0, 80.0),
            Zone::new(140.0, 220.0, 80.0, 80.0),
        ]);

        run(&mut state, 1.0);
        state.generators[0].powered = false;
        evaluate(&mut state, SIM_DT);

        let WinProgress::PoweredCharge { remaining, draining, all_powered } = state.progress
        else {
            panic!("wrong progress variant");
        };
        assert!(!all_powered);
        assert!(!draining[0]);
        assert_eq!(remaining, [2.0; 2]);
    }
}
