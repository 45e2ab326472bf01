//! Fixed timestep simulation tick
//!
//! Advances one level deterministically: platforms, players, crates,
//! buttons, generators, energy nodes, then the win rules. Input arrives as
//! an immutable per-frame snapshot; nothing here touches the platform layer.

use super::physics::{
    Axis, apply_air_drag, apply_friction, apply_gravity, integrate, overlaps, resolve_collision,
};
use super::rules;
use super::state::{Anim, Charge, EnergyKind, GamePhase, LevelState};
use crate::consts::*;

/// One player's controls for a single tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// -1, 0, or +1
    pub move_dir: f32,
    /// Held to fast-fall and to let go of a wall slide
    pub down: bool,
    pub jump: bool,
    pub dash: bool,
    /// Held to maintain a crate charge lock
    pub charge: bool,
}

/// Input commands for a single tick (deterministic).
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Indexed by polarity: blue, red
    pub players: [PlayerInput; 2],
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Full level reset (one-shot)
    pub reset: bool,
}

/// Advance the level by one fixed timestep.
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if input.reset {
        state.reset();
        return;
    }

    match state.phase {
        GamePhase::Paused | GamePhase::Complete | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    state.time += dt;

    for platform in &mut state.platforms {
        platform.update(dt);
    }

    for i in 0..2 {
        update_player_movement(state, i, input.players[i], dt);
    }

    for i in 0..state.crates.len() {
        update_crate(state, i, dt);
    }

    for i in 0..2 {
        update_charge(state, i, input.players[i], dt);
    }

    check_pushes(state);

    for button in &mut state.buttons {
        button.check_activation(&state.crates);
    }

    for generator in &mut state.generators {
        generator.update(&state.buttons, dt);
    }

    update_energy_nodes(state, dt);
    collect_gems(state);

    // Hazards and out-of-bounds falls both reset to spawn, with the level's
    // timer penalty if it has one.
    let fall_limit = state.fall_limit();
    let mut needs_respawn = [false; 2];
    for (i, player) in state.players.iter().enumerate() {
        if player.body.pos.y > fall_limit {
            needs_respawn[i] = true;
        }
        if state.hazards.iter().any(|h| h.zone.intersects(&player.body)) {
            needs_respawn[i] = true;
        }
    }
    for (i, respawn) in needs_respawn.into_iter().enumerate() {
        if respawn {
            let polarity = state.players[i].polarity;
            state.respawn_with_penalty(polarity);
        }
    }

    rules::evaluate(state, dt);
}

/// Movement, dash, wall slide, and solid collisions for one player.
fn update_player_movement(state: &mut LevelState, idx: usize, pin: PlayerInput, dt: f32) {
    let player = &mut state.players[idx];

    if player.dash_cooldown > 0.0 {
        player.dash_cooldown -= dt;
    }
    if player.energy_timer > 0.0 {
        player.energy_timer -= dt;
        if player.energy_timer <= 0.0 {
            player.has_energy = false;
            player.energy_timer = 0.0;
        }
    }

    if player.is_dashing {
        // Dash overrides both gravity and control for its duration
        player.dash_timer -= dt;
        player.body.vel.x = player.dash_dir * DASH_SPEED;
        player.body.vel.y = 0.0;
        if player.dash_timer <= 0.0 {
            player.is_dashing = false;
            player.dash_cooldown = DASH_COOLDOWN;
            // A finished dash re-arms itself; only the cooldown gates the
            // next one
            player.can_dash = true;
        }
    } else {
        apply_gravity(&mut player.body, dt);
        // Fast-fall doubles gravity while airborne
        if pin.down && !player.on_ground {
            apply_gravity(&mut player.body, dt);
        }

        if pin.move_dir != 0.0 {
            player.body.vel.x = pin.move_dir * PLAYER_SPEED;
            player.facing = pin.move_dir.signum();
        }

        if pin.jump {
            if player.on_ground {
                player.body.vel.y = JUMP_FORCE;
                player.on_ground = false;
            } else if player.wall_dir != 0 {
                // Wall jump kicks away from the wall and refreshes the dash
                player.body.vel.y = JUMP_FORCE;
                player.body.vel.x = -(player.wall_dir as f32) * WALL_JUMP_KICK;
                player.can_dash = true;
            }
        }

        if pin.dash && player.can_dash && player.dash_cooldown <= 0.0 {
            player.is_dashing = true;
            player.can_dash = false;
            player.dash_timer = DASH_DURATION;
            player.dash_dir = if pin.move_dir != 0.0 {
                pin.move_dir.signum()
            } else {
                player.facing
            };
            player.body.vel.x = player.dash_dir * DASH_SPEED;
            player.body.vel.y = 0.0;
        }
    }

    player.on_ground = false;
    player.wall_dir = 0;
    integrate(&mut player.body, dt);

    for solid in &state.solids {
        if let Some(axis) = resolve_collision(&mut player.body, solid) {
            match axis {
                Axis::Y => {
                    if player.body.pos.y < solid.pos.y {
                        player.on_ground = true;
                    }
                }
                Axis::X => {
                    player.wall_dir = if player.body.center().x < solid.center().x {
                        1
                    } else {
                        -1
                    };
                }
            }
        }
    }

    if let Some(wall) = state.wall.as_ref().filter(|w| w.is_active) {
        if let Some(Axis::Y) = resolve_collision(&mut player.body, &wall.body) {
            if player.body.pos.y < wall.body.pos.y {
                player.on_ground = true;
            }
        }
    }

    for platform in &state.platforms {
        if overlaps(&player.body, &platform.body) {
            resolve_collision(&mut player.body, &platform.body);
            // Stick riders to the top so a descending platform carries them
            if player.body.vel.y >= 0.0
                && player.body.bottom() <= platform.body.pos.y + CARRY_SNAP
            {
                player.body.pos.y = platform.body.pos.y - player.body.size.y;
                player.body.vel.y = 0.0;
                player.on_ground = true;
            }
        }
    }

    // Wall slide: clamp fall speed while pressed against a wall, and let it
    // re-arm the dash. Holding down lets go of the wall instead.
    if player.wall_dir != 0 && !player.on_ground && player.body.vel.y > 0.0 && !pin.down {
        player.body.vel.y = player.body.vel.y.min(WALL_SLIDE_SPEED);
        player.can_dash = true;
    }

    if player.on_ground && pin.move_dir == 0.0 && !player.is_dashing {
        apply_friction(&mut player.body);
    }

    player.anim = if player.is_dashing {
        Anim::Dash
    } else if player.wall_dir != 0 && !player.on_ground {
        Anim::Hang
    } else if !player.on_ground {
        Anim::Jump
    } else if pin.move_dir != 0.0 {
        Anim::Run
    } else {
        Anim::Idle
    };
}

/// Gravity, collisions, repulsion, and friction for one crate.
fn update_crate(state: &mut LevelState, idx: usize, dt: f32) {
    {
        let c = &mut state.crates[idx];
        apply_gravity(&mut c.body, dt);
        integrate(&mut c.body, dt);

        c.on_ground = false;
        c.is_being_pushed = false;
        c.is_being_charged = false;
        if c.push_timer > 0.0 {
            c.push_timer -= dt;
        }
    }

    {
        let c = &mut state.crates[idx];
        for solid in &state.solids {
            if let Some(Axis::Y) = resolve_collision(&mut c.body, solid) {
                if c.body.pos.y < solid.pos.y {
                    c.on_ground = true;
                }
            }
        }
        if let Some(wall) = state.wall.as_ref().filter(|w| w.is_active) {
            resolve_collision(&mut c.body, &wall.body);
        }
        for platform in &state.platforms {
            if overlaps(&c.body, &platform.body) {
                resolve_collision(&mut c.body, &platform.body);
                if c.body.bottom() <= platform.body.pos.y + CARRY_SNAP {
                    c.body.pos.y = platform.body.pos.y - c.body.size.y;
                    c.body.vel.y = 0.0;
                    c.on_ground = true;
                }
            }
        }
    }

    // Crate-on-crate: opposite polarities repel, same polarity stacks
    for other in 0..state.crates.len() {
        if other == idx {
            continue;
        }
        let (a, b) = if idx < other {
            let (left, right) = state.crates.split_at_mut(other);
            (&mut left[idx], &mut right[0])
        } else {
            let (left, right) = state.crates.split_at_mut(idx);
            (&mut right[0], &mut left[other])
        };
        if !overlaps(&a.body, &b.body) {
            continue;
        }
        if a.polarity == b.polarity.opposite() {
            let delta = a.body.center() - b.body.center();
            let dist = delta.length().max(1.0);
            let push = delta / dist * CRATE_REPULSION * dt;
            a.body.vel += push;
            b.body.vel -= push;
            // Repelling crates are exempt from the friction snap so the
            // force can accumulate
            a.is_being_pushed = true;
            b.is_being_pushed = true;
        } else {
            resolve_collision(&mut a.body, &b.body);
        }
    }

    // Crates shove players out of the way; a player landing on top is
    // grounded on the crate
    for player in &mut state.players {
        let c = &mut state.crates[idx];
        if !overlaps(&c.body, &player.body) {
            continue;
        }
        if let Some(axis) = resolve_collision(&mut player.body, &c.body) {
            if axis == Axis::Y && player.body.pos.y < c.body.pos.y {
                player.on_ground = true;
            }
        }
    }

    let c = &mut state.crates[idx];
    if c.on_ground && !c.is_being_pushed && !c.is_being_charged {
        c.body.vel.x *= CRATE_FRICTION;
        if c.body.vel.x.abs() < CRATE_STOP_SPEED {
            c.body.vel.x = 0.0;
        }
    }
}

/// Charge lock lifecycle for one player: acquire, carry, release, cooldown.
fn update_charge(state: &mut LevelState, idx: usize, pin: PlayerInput, dt: f32) {
    let polarity = state.players[idx].polarity;
    let charge_vel = PLAYER_SPEED * state.tuning.charge_factor;

    match state.players[idx].charge {
        Charge::Cooldown { timer } => {
            let timer = timer - dt;
            state.players[idx].charge = if timer <= 0.0 {
                Charge::Ready
            } else {
                Charge::Cooldown { timer }
            };
        }
        Charge::Ready => {
            if !pin.charge {
                return;
            }
            // Lock onto the nearest same-color crate within range
            let center = state.players[idx].body.center();
            let target = state
                .crates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.polarity == polarity)
                .map(|(i, c)| (i, c.body.center().distance(center)))
                .filter(|&(_, d)| d < CHARGE_LOCK_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((target, _)) = target {
                state.players[idx].charge = Charge::Active {
                    target,
                    timer: CHARGE_DURATION,
                };
                log::debug!("{} locked crate {}", polarity.as_str(), target);
            }
        }
        Charge::Active { target, timer } => {
            let timer = timer - dt;
            if !pin.charge || timer <= 0.0 || target >= state.crates.len() {
                state.players[idx].charge = Charge::Cooldown {
                    timer: CHARGE_COOLDOWN,
                };
                return;
            }
            state.players[idx].charge = Charge::Active { target, timer };
            let c = &mut state.crates[target];
            c.is_being_charged = true;
            if pin.move_dir != 0.0 {
                c.body.vel.x = pin.move_dir * charge_vel;
            }
            if !c.on_ground {
                apply_air_drag(&mut c.body);
            }
        }
    }
}

/// Contact pushes: a player walking into a same-color crate gives it a
/// single impulse, then the crate's push cooldown must elapse.
fn check_pushes(state: &mut LevelState) {
    let push_vel = PLAYER_SPEED * state.tuning.push_factor;
    for c in &mut state.crates {
        if c.push_timer > 0.0 {
            continue;
        }
        for player in &state.players {
            if player.polarity != c.polarity {
                continue;
            }
            let vertical_overlap = player.body.bottom() > c.body.pos.y + 5.0
                && player.body.pos.y < c.body.bottom() - 5.0;
            if !vertical_overlap {
                continue;
            }
            let touching_left = (player.body.right() - c.body.pos.x).abs() < PUSH_DISTANCE;
            let touching_right = (player.body.pos.x - c.body.right()).abs() < PUSH_DISTANCE;

            if touching_left && player.body.vel.x > 0.0 {
                c.body.vel.x = push_vel;
            } else if touching_right && player.body.vel.x < 0.0 {
                c.body.vel.x = -push_vel;
            } else {
                continue;
            }
            c.push_timer = PUSH_COOLDOWN;
            c.is_being_pushed = true;
            break;
        }
    }
}

/// Energy sources grant a timed carry to nearby players; sinks accept it.
fn update_energy_nodes(state: &mut LevelState, dt: f32) {
    for node in &mut state.energy_nodes {
        if !node.is_active {
            node.cooldown -= dt;
            if node.cooldown <= 0.0 {
                node.is_active = true;
            }
            continue;
        }
        let node_center = node.zone.center();
        for player in &mut state.players {
            let near = player.body.center().distance(node_center) < ENERGY_RANGE;
            if !near {
                continue;
            }
            match node.kind {
                EnergyKind::Source => {
                    if !player.has_energy {
                        player.has_energy = true;
                        player.energy_timer = ENERGY_DURATION;
                        node.is_active = false;
                        node.cooldown = ENERGY_SOURCE_COOLDOWN;
                        log::info!("{} picked up energy", player.polarity.as_str());
                    }
                }
                EnergyKind::Sink => {
                    if player.has_energy {
                        player.has_energy = false;
                        player.energy_timer = 0.0;
                        player.energy_delivered = true;
                        log::info!("{} delivered energy", player.polarity.as_str());
                    }
                }
            }
        }
    }
}

fn collect_gems(state: &mut LevelState) {
    for gem in &mut state.gems {
        if gem.collected {
            continue;
        }
        let gem_box = super::physics::Body::new(gem.pos.x, gem.pos.y, 16.0, 16.0);
        if state.players.iter().any(|p| overlaps(&p.body, &gem_box)) {
            gem.collected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::rules::{WinProgress, WinRule};
    use crate::sim::state::{Crate, MovingPlatform, Polarity};
    use crate::sim::testutil::{input_for, room, settle};

    #[test]
    fn player_settles_exactly_on_floor() {
        let mut state = room(WinRule::BoxGate);
        state.players[0].body.pos.y = 100.0;
        settle(&mut state, 2.0);
        let p = &state.players[0];
        assert!(p.on_ground);
        assert_eq!(p.body.bottom(), 280.0);
        assert_eq!(p.body.vel.y, 0.0);
    }

    #[test]
    fn dash_lifecycle() {
        let mut state = room(WinRule::BoxGate);
        settle(&mut state, 0.5);

        let dash = input_for(0, PlayerInput { dash: true, ..Default::default() });
        tick(&mut state, &dash, SIM_DT);
        let p = &state.players[0];
        assert!(p.is_dashing);
        assert!(!p.can_dash);
        assert_eq!(p.body.vel.x, DASH_SPEED);
        assert_eq!(p.body.vel.y, 0.0);

        settle(&mut state, DASH_DURATION + 0.05);
        let p = &state.players[0];
        assert!(!p.is_dashing);
        assert!(p.dash_cooldown > 0.0);

        // Cooldown blocks a restart
        tick(&mut state, &dash, SIM_DT);
        assert!(!state.players[0].is_dashing);

        settle(&mut state, DASH_COOLDOWN);
        tick(&mut state, &dash, SIM_DT);
        assert!(state.players[0].is_dashing);
    }

    #[test]
    fn dash_without_direction_uses_facing() {
        let mut state = room(WinRule::BoxGate);
        settle(&mut state, 0.5);
        let left = input_for(0, PlayerInput { move_dir: -1.0, ..Default::default() });
        tick(&mut state, &left, SIM_DT);
        assert_eq!(state.players[0].facing, -1.0);

        let dash = input_for(0, PlayerInput { dash: true, ..Default::default() });
        tick(&mut state, &dash, SIM_DT);
        assert_eq!(state.players[0].dash_dir, -1.0);
        assert!(state.players[0].body.vel.x < 0.0);
    }

    #[test]
    fn jump_only_works_grounded_or_on_wall() {
        let mut state = room(WinRule::BoxGate);
        settle(&mut state, 0.5);

        let jump = input_for(0, PlayerInput { jump: true, ..Default::default() });
        tick(&mut state, &jump, SIM_DT);
        assert!(state.players[0].body.vel.y < 0.0);
        assert!(!state.players[0].on_ground);

        // Airborne with no wall contact: a second jump does nothing
        let vy = state.players[0].body.vel.y;
        tick(&mut state, &jump, SIM_DT);
        assert!(state.players[0].body.vel.y > vy);
    }

    #[test]
    fn holding_down_fast_falls() {
        let mut state = room(WinRule::BoxGate);
        state.players[0].body.pos = Vec2::new(200.0, 60.0);
        state.players[1].body.pos = Vec2::new(300.0, 60.0);

        let down = input_for(0, PlayerInput { down: true, ..Default::default() });
        for _ in 0..30 {
            tick(&mut state, &down, SIM_DT);
        }
        // Both still airborne; the fast-faller has pulled ahead
        assert!(!state.players[0].on_ground);
        assert!(state.players[0].body.vel.y > state.players[1].body.vel.y);
        assert!(state.players[0].body.pos.y > state.players[1].body.pos.y);
    }

    #[test]
    fn holding_down_lets_go_of_a_wall_slide() {
        let mut state = room(WinRule::BoxGate);
        // Wall column at x=160..200, y=80..200
        state.tiles[2][4] = 1;
        state.tiles[3][4] = 1;
        state.tiles[4][4] = 1;
        state.rebuild_solids();

        let press = input_for(0, PlayerInput { move_dir: 1.0, ..Default::default() });
        state.players[0].body.pos = Vec2::new(126.0, 100.0);
        for _ in 0..30 {
            tick(&mut state, &press, SIM_DT);
        }
        assert_eq!(state.players[0].body.vel.y, WALL_SLIDE_SPEED);

        let let_go =
            input_for(0, PlayerInput { move_dir: 1.0, down: true, ..Default::default() });
        state.players[0].body.pos = Vec2::new(126.0, 100.0);
        state.players[0].body.vel = Vec2::ZERO;
        for _ in 0..30 {
            tick(&mut state, &let_go, SIM_DT);
        }
        assert!(state.players[0].body.vel.y > WALL_SLIDE_SPEED);
    }

    #[test]
    fn push_gives_one_impulse_then_cools_down() {
        let mut state = room(WinRule::BoxGate);
        // Crate rests on the floor, player flush against its left side
        state.crates.push(Crate::new(120.0, 245.0, Polarity::Blue));
        state.crate_spawns.push(Vec2::new(120.0, 245.0));
        state.players[0].body.pos = Vec2::new(84.0, 248.0);
        settle(&mut state, 0.2);

        let right = input_for(0, PlayerInput { move_dir: 1.0, ..Default::default() });
        tick(&mut state, &right, SIM_DT);
        let c = &state.crates[0];
        assert_eq!(c.body.vel.x, PLAYER_SPEED * state.tuning.push_factor);
        assert!(c.push_timer > 0.0);

        // Cooldown prevents an immediate second impulse; friction takes over
        let vel_after_push = state.crates[0].body.vel.x;
        tick(&mut state, &right, SIM_DT);
        assert!(state.crates[0].body.vel.x < vel_after_push);
    }

    #[test]
    fn opposite_crates_repel() {
        let mut state = room(WinRule::BoxGate);
        state.crates.push(Crate::new(100.0, 245.0, Polarity::Blue));
        state.crates.push(Crate::new(120.0, 245.0, Polarity::Red));
        state.crate_spawns.push(Vec2::new(100.0, 245.0));
        state.crate_spawns.push(Vec2::new(120.0, 245.0));

        settle(&mut state, 0.1);
        assert!(state.crates[0].body.vel.x < 0.0);
        assert!(state.crates[1].body.vel.x > 0.0);
    }

    #[test]
    fn moving_platform_carries_rider() {
        let mut state = room(WinRule::BoxGate);
        state.platforms.push(MovingPlatform::new(40.0, 160.0, 80.0, 40.0, 30.0));
        state.players[0].body.pos = Vec2::new(60.0, 128.0);

        settle(&mut state, 1.0);
        let platform_top = state.platforms[0].body.pos.y;
        let p = &state.players[0];
        assert!(p.on_ground);
        assert!((p.body.bottom() - platform_top).abs() < 1e-3);
        // The platform has actually moved from its origin
        assert!((platform_top - 160.0).abs() > 1.0);
    }

    #[test]
    fn respawn_on_fall_restores_spawn_exactly() {
        let mut state = room(WinRule::BoxGate);
        let spawn = state.spawns[0];
        state.players[0].body.pos = Vec2::new(80.0, state.fall_limit() + 1.0);
        state.players[0].body.vel = Vec2::new(50.0, 300.0);

        tick(&mut state, &TickInput::default(), SIM_DT);
        let p = &state.players[0];
        assert_eq!(p.body.pos, spawn);
        assert_eq!(p.body.vel, Vec2::ZERO);
    }

    #[test]
    fn hazard_contact_respawns() {
        use crate::sim::state::{Hazard, Zone};
        let mut state = room(WinRule::BoxGate);
        state.hazards.push(Hazard {
            zone: Zone::new(30.0, 240.0, 40.0, 40.0),
        });
        state.players[0].body.pos = Vec2::new(40.0, 248.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        // Player 0 is inside the hazard and resets to spawn; player 1 is not
        assert_eq!(state.players[0].body.pos, state.spawns[0]);
        assert_eq!(state.players[1].body.pos.x, 160.0);
    }

    #[test]
    fn pause_freezes_time_and_toggles_back() {
        let mut state = room(WinRule::BoxGate);
        settle(&mut state, 0.5);
        let t = state.time;

        let pause = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        settle(&mut state, 0.5);
        assert_eq!(state.time, t);

        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn reset_restores_everything() {
        let mut state = room(WinRule::BoxGate);
        state.crates.push(Crate::new(200.0, 245.0, Polarity::Blue));
        state.crate_spawns.push(Vec2::new(200.0, 245.0));
        settle(&mut state, 0.5);

        state.players[0].body.pos = Vec2::new(300.0, 100.0);
        state.crates[0].body.pos = Vec2::new(50.0, 50.0);
        state.progress = WinProgress::BoxGate { wall_released: true };

        let reset = TickInput { reset: true, ..Default::default() };
        tick(&mut state, &reset, SIM_DT);

        assert_eq!(state.players[0].body.pos, state.spawns[0]);
        assert_eq!(state.crates[0].body.pos, state.crate_spawns[0]);
        assert_eq!(state.progress, WinProgress::BoxGate { wall_released: false });
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn charge_locks_and_carries_nearest_same_color_crate() {
        let mut state = room(WinRule::BoxGate);
        state.crates.push(Crate::new(130.0, 245.0, Polarity::Blue));
        state.crate_spawns.push(Vec2::new(130.0, 245.0));
        settle(&mut state, 0.2);

        let charge = input_for(
            0,
            PlayerInput { charge: true, move_dir: 1.0, ..Default::default() },
        );
        tick(&mut state, &charge, SIM_DT);
        assert!(matches!(state.players[0].charge, Charge::Active { target: 0, .. }));
        assert!(state.crates[0].is_being_charged);
        assert_eq!(
            state.crates[0].body.vel.x,
            PLAYER_SPEED * state.tuning.charge_factor
        );

        // Releasing the key drops into cooldown
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(matches!(state.players[0].charge, Charge::Cooldown { .. }));
    }

    #[test]
    fn charge_ignores_out_of_range_and_wrong_color() {
        let mut state = room(WinRule::BoxGate);
        state.crates.push(Crate::new(400.0, 245.0, Polarity::Blue));
        state.crates.push(Crate::new(130.0, 245.0, Polarity::Red));
        state.crate_spawns.push(Vec2::new(400.0, 245.0));
        state.crate_spawns.push(Vec2::new(130.0, 245.0));
        settle(&mut state, 0.2);

        let charge = input_for(0, PlayerInput { charge: true, ..Default::default() });
        tick(&mut state, &charge, SIM_DT);
        assert_eq!(state.players[0].charge, Charge::Ready);
    }

    #[test]
    fn gems_are_collected_on_contact() {
        use crate::sim::state::Gem;
        let mut state = room(WinRule::BoxGate);
        state.gems.push(Gem { pos: Vec2::new(84.0, 250.0), collected: false });
        state.gems.push(Gem { pos: Vec2::new(400.0, 250.0), collected: false });
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.gems[0].collected);
        assert!(!state.gems[1].collected);
    }
}
