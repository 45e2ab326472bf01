//! Entity types and level state
//!
//! All state that must be persisted or reset lives here. Entities are plain
//! data structs dispatched on by free functions in `tick` - no trait objects,
//! no virtual dispatch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::rules::{WinProgress, WinRule};
use crate::consts::*;

/// Which of the two characters (and the matching crate/button color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Blue,
    Red,
}

impl Polarity {
    pub fn index(self) -> usize {
        match self {
            Polarity::Blue => 0,
            Polarity::Red => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Blue => "blue",
            Polarity::Red => "red",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Polarity::Blue => Polarity::Red,
            Polarity::Red => Polarity::Blue,
        }
    }
}

/// Axis-aligned static region (buttons, goals, hubs, hazards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Zone {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB intersection with a body (same rule as the physics).
    pub fn intersects(&self, body: &Body) -> bool {
        body.pos.x < self.pos.x + self.size.x
            && body.pos.x + body.size.x > self.pos.x
            && body.pos.y < self.pos.y + self.size.y
            && body.pos.y + body.size.y > self.pos.y
    }
}

/// Player animation state, driven by the movement state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anim {
    #[default]
    Idle,
    Run,
    Jump,
    Dash,
    /// Wall slide
    Hang,
}

/// Charge lock lifecycle. At most one crate is locked per player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Charge {
    #[default]
    Ready,
    /// Locked onto `crates[target]`, carrying it for up to CHARGE_DURATION
    Active { target: usize, timer: f32 },
    Cooldown { timer: f32 },
}

/// One of the two player characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub polarity: Polarity,
    pub anim: Anim,
    pub on_ground: bool,
    /// -1 = wall on the left, 1 = wall on the right, 0 = no contact
    pub wall_dir: i8,
    pub can_dash: bool,
    pub is_dashing: bool,
    pub dash_timer: f32,
    pub dash_cooldown: f32,
    pub dash_dir: f32,
    /// Last non-zero horizontal input direction; dashes use it when the
    /// dash key is pressed with no held direction
    pub facing: f32,
    pub charge: Charge,
    /// Energy carry (level 3 source/sink runs)
    pub has_energy: bool,
    pub energy_timer: f32,
    pub energy_delivered: bool,
    /// Depleting resource outside the hub zone (level 2)
    pub oxygen: f32,
    /// Render fade while dematerializing in an exit zone
    pub alpha: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, polarity: Polarity) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_SIZE, PLAYER_SIZE),
            polarity,
            anim: Anim::Idle,
            on_ground: false,
            wall_dir: 0,
            can_dash: true,
            is_dashing: false,
            dash_timer: 0.0,
            dash_cooldown: 0.0,
            dash_dir: 0.0,
            facing: 1.0,
            charge: Charge::Ready,
            has_energy: false,
            energy_timer: 0.0,
            energy_delivered: false,
            oxygen: 0.0,
            alpha: 1.0,
        }
    }

    /// Hard reset to a spawn point: position, velocity, and timers.
    pub fn respawn(&mut self, spawn: Vec2) {
        self.body.pos = spawn;
        self.body.vel = Vec2::ZERO;
        self.on_ground = false;
        self.wall_dir = 0;
        self.can_dash = true;
        self.is_dashing = false;
        self.dash_timer = 0.0;
        self.dash_cooldown = 0.0;
        self.charge = Charge::Ready;
        self.alpha = 1.0;
    }
}

/// A pushable color-matched crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crate {
    pub body: Body,
    pub polarity: Polarity,
    /// Recomputed from collisions every frame, never persisted across frames
    pub on_ground: bool,
    pub is_being_pushed: bool,
    pub is_being_charged: bool,
    /// Counts down after a push; the crate cannot be pushed again until zero
    pub push_timer: f32,
}

impl Crate {
    pub fn new(x: f32, y: f32, polarity: Polarity) -> Self {
        Self {
            body: Body::new(x, y, CRATE_SIZE, CRATE_SIZE),
            polarity,
            on_ground: false,
            is_being_pushed: false,
            is_being_charged: false,
            push_timer: 0.0,
        }
    }
}

/// A pressure plate activated by a resting same-color crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub zone: Zone,
    pub polarity: Polarity,
    pub is_pressed: bool,
}

impl Button {
    pub fn new(x: f32, y: f32, polarity: Polarity) -> Self {
        Self {
            zone: Zone::new(x, y, BUTTON_W, BUTTON_H),
            polarity,
            is_pressed: false,
        }
    }

    /// Pressed iff some same-color crate rests on the plate: horizontal
    /// overlap, bottom edge within BUTTON_TOLERANCE of the plate top, and
    /// grounded.
    pub fn check_activation(&mut self, crates: &[Crate]) {
        self.is_pressed = crates.iter().any(|c| {
            c.polarity == self.polarity
                && c.body.right() > self.zone.pos.x
                && c.body.pos.x < self.zone.pos.x + self.zone.size.x
                && (c.body.bottom() - self.zone.pos.y).abs() <= BUTTON_TOLERANCE
                && c.on_ground
        });
    }
}

/// A solid wall that fades out once released (level 1 gate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeWall {
    pub body: Body,
    pub is_active: bool,
    pub alpha: f32,
    pub deactivating: bool,
}

impl FadeWall {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            body: Body::new(x, y, w, h),
            is_active: true,
            alpha: 1.0,
            deactivating: false,
        }
    }

    pub fn deactivate(&mut self) {
        self.deactivating = true;
    }

    pub fn update(&mut self, dt: f32) {
        if self.deactivating && self.alpha > 0.0 {
            self.alpha -= dt * WALL_FADE_RATE;
            if self.alpha <= 0.0 {
                self.alpha = 0.0;
                self.is_active = false;
            }
        }
    }
}

/// Sinusoidally oscillating platform that carries riders on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub body: Body,
    pub origin_y: f32,
    pub range: f32,
    pub speed: f32,
    pub time: f32,
}

impl MovingPlatform {
    pub fn new(x: f32, y: f32, w: f32, h: f32, range: f32) -> Self {
        Self {
            body: Body::new(x, y, w, h),
            origin_y: y,
            range,
            speed: 1.5,
            time: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.body.pos.y = self.origin_y + (self.time * self.speed).sin() * self.range;
        // Analytic vy keeps rider physics consistent with the motion
        self.body.vel.y = (self.time * self.speed).cos() * self.range * self.speed;
    }
}

/// Powered once every button in its dependency set is pressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    pub zone: Zone,
    /// Indices into the level's button list
    pub deps: Vec<usize>,
    pub powered: bool,
    /// Glow pulse for rendering, spikes on power-up then settles
    pub alpha: f32,
}

impl Generator {
    pub fn new(x: f32, y: f32, deps: Vec<usize>) -> Self {
        Self {
            zone: Zone::new(x, y, 40.0, 40.0),
            deps,
            powered: false,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self, buttons: &[Button], dt: f32) {
        let was_powered = self.powered;
        self.powered = !self.deps.is_empty()
            && self.deps.iter().all(|&i| buttons.get(i).is_some_and(|b| b.is_pressed));
        if self.powered && !was_powered {
            self.alpha = 1.5;
        }
        self.alpha = (self.alpha - dt * 1.2).max(0.6);
    }
}

/// Energy node role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyKind {
    /// Grants energy to a nearby empty-handed player
    Source,
    /// Accepts a carried energy charge
    Sink,
}

/// Battery/generator pair for the energy delivery side quest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyNode {
    pub zone: Zone,
    pub kind: EnergyKind,
    pub is_active: bool,
    pub cooldown: f32,
}

impl EnergyNode {
    pub fn new(x: f32, y: f32, kind: EnergyKind) -> Self {
        Self {
            zone: Zone::new(x, y, 40.0, 40.0),
            kind,
            is_active: true,
            cooldown: 0.0,
        }
    }
}

/// Collectible gem (score candy, not required for completion).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gem {
    pub pos: Vec2,
    pub collected: bool,
}

/// Instant-respawn hazard region.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard {
    pub zone: Zone,
}

/// Current phase of a level run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    Complete,
    GameOver,
}

/// Per-level tuned multipliers. Kept level-local on purpose: the push and
/// carry factors were never unified across levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tuning {
    /// Push impulse as a fraction of player speed
    pub push_factor: f32,
    /// Charge carry velocity as a fraction of player speed
    pub charge_factor: f32,
    /// Center-distance threshold for crate-on-button proximity (level 1)
    pub button_proximity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            push_factor: 0.8,
            charge_factor: 0.6,
            button_proximity: 50.0,
        }
    }
}

/// Complete state of one level run. Owns every entity for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level number, for HUD and save slots
    pub level: u32,
    pub seed: u64,
    pub tile_size: f32,
    pub cols: usize,
    pub rows: usize,
    /// 0 = empty, 1 = solid; immutable after generation except on reset
    pub tiles: Vec<Vec<u8>>,
    /// Static colliders derived from the grid
    #[serde(skip)]
    pub solids: Vec<Body>,
    pub players: [Player; 2],
    pub spawns: [Vec2; 2],
    pub crates: Vec<Crate>,
    pub crate_spawns: Vec<Vec2>,
    pub buttons: Vec<Button>,
    pub wall: Option<FadeWall>,
    pub platforms: Vec<MovingPlatform>,
    pub generators: Vec<Generator>,
    pub energy_nodes: Vec<EnergyNode>,
    pub gems: Vec<Gem>,
    pub hazards: Vec<Hazard>,
    pub goal: Option<Zone>,
    pub hub: Option<Zone>,
    pub exit: Option<Zone>,
    /// Color-matched drain zones, indexed by polarity (level 3)
    pub charge_zones: Option<[Zone; 2]>,
    pub rule: WinRule,
    pub progress: WinProgress,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub game_over_reason: Option<String>,
    /// Elapsed sim time in seconds
    pub time: f32,
}

impl LevelState {
    /// Rebuild the static collider list from the tile grid.
    pub fn rebuild_solids(&mut self) {
        self.solids.clear();
        for (row, line) in self.tiles.iter().enumerate() {
            for (col, &t) in line.iter().enumerate() {
                if t == 1 {
                    self.solids.push(Body::new(
                        col as f32 * self.tile_size,
                        row as f32 * self.tile_size,
                        self.tile_size,
                        self.tile_size,
                    ));
                }
            }
        }
    }

    /// Y coordinate below which an actor has fallen out of the level.
    pub fn fall_limit(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn player(&self, polarity: Polarity) -> &Player {
        &self.players[polarity.index()]
    }

    pub fn player_mut(&mut self, polarity: Polarity) -> &mut Player {
        &mut self.players[polarity.index()]
    }

    /// Respawn one player at their spawn point. Restores dash and, when the
    /// level tracks oxygen, refills it (with the level-2 timer penalty
    /// applied by the rules).
    pub fn respawn_player(&mut self, polarity: Polarity) {
        let spawn = self.spawns[polarity.index()];
        let max_oxygen = self.rule.max_oxygen();
        let player = self.player_mut(polarity);
        player.respawn(spawn);
        if let Some(max) = max_oxygen {
            player.oxygen = max;
        }
        log::debug!("{} respawned", polarity.as_str());
    }

    /// Respawn plus the level's timer penalty, when its rule carries one.
    pub fn respawn_with_penalty(&mut self, polarity: Polarity) {
        self.respawn_player(polarity);
        let penalty = self.rule.respawn_penalty();
        if let WinProgress::PortalExit { ref mut global_timer, .. } = self.progress {
            *global_timer -= penalty;
        }
    }

    /// Restore the whole level to its initial run state: entity positions,
    /// velocities, timers, and every win-condition flag.
    pub fn reset(&mut self) {
        for polarity in [Polarity::Blue, Polarity::Red] {
            let spawn = self.spawns[polarity.index()];
            let player = self.player_mut(polarity);
            player.respawn(spawn);
            player.has_energy = false;
            player.energy_timer = 0.0;
            player.energy_delivered = false;
            player.anim = Anim::Idle;
        }
        if let Some(max) = self.rule.max_oxygen() {
            self.players[0].oxygen = max;
            self.players[1].oxygen = max;
        }
        for (i, c) in self.crates.iter_mut().enumerate() {
            if let Some(&spawn) = self.crate_spawns.get(i) {
                c.body.pos = spawn;
            }
            c.body.vel = Vec2::ZERO;
            c.on_ground = false;
            c.is_being_pushed = false;
            c.is_being_charged = false;
            c.push_timer = 0.0;
        }
        for b in &mut self.buttons {
            b.is_pressed = false;
        }
        if let Some(ref mut wall) = self.wall {
            wall.is_active = true;
            wall.alpha = 1.0;
            wall.deactivating = false;
        }
        for (i, p) in self.platforms.iter_mut().enumerate() {
            p.time = if i % 2 == 1 { std::f32::consts::PI } else { 0.0 };
            p.body.pos.y = p.origin_y + (p.time * p.speed).sin() * p.range;
        }
        for g in &mut self.generators {
            g.powered = false;
            g.alpha = 1.0;
        }
        for n in &mut self.energy_nodes {
            n.is_active = true;
            n.cooldown = 0.0;
        }
        for gem in &mut self.gems {
            gem.collected = false;
        }
        self.progress = self.rule.initial_progress();
        self.phase = GamePhase::Playing;
        self.game_over_reason = None;
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_pressed_by_resting_matching_crate() {
        let mut button = Button::new(100.0, 130.0, Polarity::Blue);
        let mut blue = Crate::new(100.0, 100.0, Polarity::Blue);
        blue.on_ground = true;

        button.check_activation(&[blue.clone()]);
        assert!(button.is_pressed);

        // Airborne crate does not press
        blue.on_ground = false;
        button.check_activation(&[blue.clone()]);
        assert!(!button.is_pressed);

        // Wrong color does not press
        blue.on_ground = true;
        blue.polarity = Polarity::Red;
        button.check_activation(&[blue]);
        assert!(!button.is_pressed);
    }

    #[test]
    fn button_vertical_gap_tolerance() {
        let mut button = Button::new(100.0, 130.0, Polarity::Blue);
        // Bottom at y=129, gap 1 < 5: pressed
        let mut near = Crate::new(100.0, 94.0, Polarity::Blue);
        near.on_ground = true;
        button.check_activation(&[near]);
        assert!(button.is_pressed);

        // Bottom at y=124, gap 6: not pressed
        let mut far = Crate::new(100.0, 89.0, Polarity::Blue);
        far.on_ground = true;
        button.check_activation(&[far]);
        assert!(!button.is_pressed);
    }

    #[test]
    fn fade_wall_goes_inactive_after_fade() {
        let mut wall = FadeWall::new(0.0, 0.0, 40.0, 80.0);
        wall.update(1.0);
        assert!(wall.is_active);
        assert_eq!(wall.alpha, 1.0);

        wall.deactivate();
        wall.update(1.0);
        assert!(wall.is_active);
        assert!((wall.alpha - 0.5).abs() < 1e-6);
        wall.update(1.0);
        assert!(!wall.is_active);
        assert_eq!(wall.alpha, 0.0);
    }

    #[test]
    fn moving_platform_is_periodic_and_bounded() {
        let mut p = MovingPlatform::new(100.0, 200.0, 80.0, 40.0, 150.0);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for _ in 0..10_000 {
            p.update(1.0 / 120.0);
            min_y = min_y.min(p.body.pos.y);
            max_y = max_y.max(p.body.pos.y);
        }
        assert!(min_y >= 200.0 - 150.0 - 1e-3);
        assert!(max_y <= 200.0 + 150.0 + 1e-3);
        assert!(max_y - min_y > 250.0);
    }

    #[test]
    fn generator_requires_all_dependencies() {
        let mut buttons = vec![
            Button::new(0.0, 0.0, Polarity::Blue),
            Button::new(50.0, 0.0, Polarity::Red),
            Button::new(100.0, 0.0, Polarity::Blue),
        ];
        let mut generator = Generator::new(0.0, 0.0, vec![0, 2]);

        buttons[0].is_pressed = true;
        generator.update(&buttons, 0.016);
        assert!(!generator.powered);

        // Dependency 1 is irrelevant to this generator
        buttons[1].is_pressed = true;
        generator.update(&buttons, 0.016);
        assert!(!generator.powered);

        buttons[2].is_pressed = true;
        generator.update(&buttons, 0.016);
        assert!(generator.powered);
        // Power-up makes the glow spike above its resting range
        assert!(generator.alpha > 1.0);

        buttons[0].is_pressed = false;
        generator.update(&buttons, 0.016);
        assert!(!generator.powered);
    }

    #[test]
    fn respawn_clears_motion_but_keeps_energy() {
        let mut player = Player::new(10.0, 20.0, Polarity::Blue);
        player.body.vel = glam::Vec2::new(100.0, -50.0);
        player.is_dashing = true;
        player.can_dash = false;
        player.dash_cooldown = 0.7;
        player.has_energy = true;
        player.alpha = 0.3;

        player.respawn(glam::Vec2::new(5.0, 6.0));
        assert_eq!(player.body.pos, glam::Vec2::new(5.0, 6.0));
        assert_eq!(player.body.vel, glam::Vec2::ZERO);
        assert!(!player.is_dashing);
        assert!(player.can_dash);
        // A stale cooldown must not gate the first dash of the fresh run
        assert_eq!(player.dash_cooldown, 0.0);
        assert_eq!(player.alpha, 1.0);
        // A carried energy charge survives a fall
        assert!(player.has_energy);
    }
}
