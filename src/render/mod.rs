//! Canvas 2D renderer
//!
//! Flat-color rectangles only; the art style is the palette. World space is
//! scaled uniformly to fit the canvas, letterboxed when the aspect ratios
//! differ.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::settings::Settings;
use crate::sim::rules::WinProgress;
use crate::sim::state::{Anim, EnergyKind, GamePhase, LevelState, Polarity};

const BG: &str = "#12121a";
const TILE: &str = "#3a3a4a";
const LAVA: &str = "#e84b20";
const BLUE: &str = "#4fa8f0";
const RED: &str = "#f05a5a";
const BLUE_DIM: &str = "#2a5a88";
const RED_DIM: &str = "#883636";
const GOAL: &str = "#58d68b";
const HUB: &str = "#1d3a33";
const PORTAL: &str = "#b070f0";
const GEM: &str = "#ffd75e";
const GENERATOR_ON: &str = "#7dffb0";
const GENERATOR_OFF: &str = "#556060";
const ENERGY: &str = "#ffe46a";
const TEXT: &str = "#e8e8f0";

fn polarity_color(polarity: Polarity, high_contrast: bool) -> &'static str {
    match (polarity, high_contrast) {
        (Polarity::Blue, false) => BLUE,
        (Polarity::Blue, true) => "#80ccff",
        (Polarity::Red, false) => RED,
        (Polarity::Red, true) => "#ff9090",
    }
}

fn polarity_dim(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Blue => BLUE_DIM,
        Polarity::Red => RED_DIM,
    }
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    pub fn render(&self, state: &LevelState, settings: &Settings) {
        let ctx = &self.ctx;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BG);
        ctx.fill_rect(0.0, 0.0, self.width as f64, self.height as f64);

        // Fit the level into the canvas, centered
        let world_w = state.cols as f32 * state.tile_size;
        let world_h = state.rows as f32 * state.tile_size;
        let scale = (self.width / world_w).min(self.height / world_h);
        let off_x = (self.width - world_w * scale) * 0.5;
        let off_y = (self.height - world_h * scale) * 0.5;

        ctx.save();
        let _ = ctx.translate(off_x as f64, off_y as f64);
        let _ = ctx.scale(scale as f64, scale as f64);

        self.draw_zones(state);
        self.draw_tiles(state);
        self.draw_entities(state, settings);
        self.draw_players(state, settings);

        ctx.restore();

        self.draw_overlay(state);
    }

    fn rect(&self, x: f32, y: f32, w: f32, h: f32, color: &str, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_zones(&self, state: &LevelState) {
        if let Some(hub) = &state.hub {
            self.rect(hub.pos.x, hub.pos.y, hub.size.x, hub.size.y, HUB, 0.6);
        }
        if let Some(goal) = &state.goal {
            self.rect(goal.pos.x, goal.pos.y, goal.size.x, goal.size.y, GOAL, 0.35);
        }
        if let Some(zones) = &state.charge_zones {
            for (zone, polarity) in zones.iter().zip([Polarity::Blue, Polarity::Red]) {
                self.rect(
                    zone.pos.x,
                    zone.pos.y,
                    zone.size.x,
                    zone.size.y,
                    polarity_dim(polarity),
                    0.5,
                );
            }
        }
        // Exit portal opacity tracks the button state
        if let (Some(exit), WinProgress::PortalExit { portal_alpha, .. }) =
            (&state.exit, &state.progress)
        {
            self.rect(
                exit.pos.x,
                exit.pos.y,
                exit.size.x,
                exit.size.y,
                PORTAL,
                0.15 + 0.6 * portal_alpha,
            );
        }
    }

    fn draw_tiles(&self, state: &LevelState) {
        let ts = state.tile_size;
        self.ctx.set_fill_style_str(TILE);
        for (row, line) in state.tiles.iter().enumerate() {
            for (col, &t) in line.iter().enumerate() {
                if t == 1 {
                    self.ctx.fill_rect(
                        (col as f32 * ts) as f64,
                        (row as f32 * ts) as f64,
                        ts as f64,
                        ts as f64,
                    );
                }
            }
        }
    }

    fn draw_entities(&self, state: &LevelState, settings: &Settings) {
        for hazard in &state.hazards {
            let z = &hazard.zone;
            self.rect(z.pos.x, z.pos.y, z.size.x, z.size.y, LAVA, 0.9);
        }

        for platform in &state.platforms {
            let b = &platform.body;
            self.rect(b.pos.x, b.pos.y, b.size.x, b.size.y, "#6a6a80", 1.0);
        }

        if let Some(wall) = &state.wall {
            if wall.is_active {
                self.rect(
                    wall.body.pos.x,
                    wall.body.pos.y,
                    wall.body.size.x,
                    wall.body.size.y,
                    "#c0c0d0",
                    wall.alpha,
                );
            }
        }

        for button in &state.buttons {
            let color = polarity_color(button.polarity, settings.high_contrast);
            let z = &button.zone;
            let alpha = if button.is_pressed { 1.0 } else { 0.45 };
            // Pressed buttons squash to half height
            let h = if button.is_pressed { z.size.y * 0.5 } else { z.size.y };
            self.rect(z.pos.x, z.pos.y + (z.size.y - h), z.size.x, h, color, alpha);
        }

        for generator in &state.generators {
            let z = &generator.zone;
            let color = if generator.powered { GENERATOR_ON } else { GENERATOR_OFF };
            let alpha = if settings.reduced_motion {
                1.0
            } else {
                generator.alpha.min(1.0)
            };
            self.rect(z.pos.x, z.pos.y, z.size.x, z.size.y, color, alpha);
        }

        for node in &state.energy_nodes {
            let z = &node.zone;
            let alpha = if node.is_active { 0.9 } else { 0.3 };
            let color = match node.kind {
                EnergyKind::Source => ENERGY,
                EnergyKind::Sink => "#a0e8ff",
            };
            self.rect(z.pos.x, z.pos.y, z.size.x, z.size.y, color, alpha);
        }

        for gem in state.gems.iter().filter(|g| !g.collected) {
            self.rect(gem.pos.x, gem.pos.y, 16.0, 16.0, GEM, 1.0);
        }

        for c in &state.crates {
            let color = polarity_color(c.polarity, settings.high_contrast);
            let b = &c.body;
            self.rect(b.pos.x, b.pos.y, b.size.x, b.size.y, color, 1.0);
            // Darker inset marks it as a crate rather than a player
            self.rect(
                b.pos.x + 6.0,
                b.pos.y + 6.0,
                b.size.x - 12.0,
                b.size.y - 12.0,
                polarity_dim(c.polarity),
                1.0,
            );
        }
    }

    fn draw_players(&self, state: &LevelState, settings: &Settings) {
        for player in &state.players {
            let color = polarity_color(player.polarity, settings.high_contrast);
            let b = &player.body;
            self.rect(b.pos.x, b.pos.y, b.size.x, b.size.y, color, player.alpha);
            if player.anim == Anim::Dash {
                // Short trail behind the dash direction
                let trail_x = b.pos.x - player.dash_dir * b.size.x * 0.6;
                self.rect(trail_x, b.pos.y, b.size.x, b.size.y, color, 0.3 * player.alpha);
            }
            if player.has_energy {
                self.rect(b.pos.x + 8.0, b.pos.y - 12.0, 16.0, 8.0, ENERGY, 1.0);
            }
        }
    }

    fn draw_overlay(&self, state: &LevelState) {
        let message = match state.phase {
            GamePhase::Paused => Some("PAUSED".to_string()),
            GamePhase::Complete => Some("LEVEL COMPLETE".to_string()),
            GamePhase::GameOver => Some(
                state
                    .game_over_reason
                    .clone()
                    .unwrap_or_else(|| "GAME OVER".to_string()),
            ),
            GamePhase::Playing => None,
        };
        let Some(message) = message else { return };

        self.rect(0.0, 0.0, self.width, self.height, "#000000", 0.5);
        self.ctx.set_fill_style_str(TEXT);
        self.ctx.set_font("bold 42px sans-serif");
        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text(
            &message,
            (self.width * 0.5) as f64,
            (self.height * 0.5) as f64,
        );
    }
}
