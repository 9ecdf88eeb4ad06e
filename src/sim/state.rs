//! Game state and core simulation types
//!
//! Everything the frame step mutates lives in `GameState`; hosts read it to
//! render and never write to it directly.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, FrameContacts};
use super::blocks::{BlockField, GridLayout};
use super::particles::ParticlePool;
use super::rect::Rect;
use crate::consts::*;

/// Playfield dimensions in pixels (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting at the serve position, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every block destroyed; waiting for the host to restart
    Cleared,
}

/// Paddle steering for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaddleCommand {
    /// Move at this horizontal velocity (pixels/s, keyboard style)
    Nudge(f32),
    /// Ease toward this fraction of the playfield width (pointer style)
    Track(f32),
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal speed limit (pixels/s)
    pub max_speed: f32,
}

impl Paddle {
    pub fn new(playfield: &Playfield) -> Self {
        let mut paddle = Self {
            rect: Rect::default(),
            max_speed: PADDLE_MAX_SPEED,
        };
        paddle.resize(playfield);
        paddle
    }

    /// Scale to the playfield and recenter
    pub fn resize(&mut self, playfield: &Playfield) {
        self.rect.width = playfield.width * PADDLE_WIDTH_SCALE;
        self.rect.height = playfield.height * PADDLE_HEIGHT_SCALE;
        self.reset(playfield);
    }

    /// Centered horizontally, a fixed distance above the bottom edge
    pub fn reset(&mut self, playfield: &Playfield) {
        self.rect.x = playfield.width / 2.0 - self.rect.width / 2.0;
        self.rect.y = playfield.height - PADDLE_BOTTOM_OFFSET;
    }

    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.width / 2.0
    }

    pub fn steer(&mut self, command: PaddleCommand, dt: f32, playfield: &Playfield) {
        match command {
            PaddleCommand::Nudge(velocity) => self.nudge(velocity, dt, playfield),
            PaddleCommand::Track(fraction) => self.track(fraction, dt, playfield),
        }
    }

    /// Move at `velocity`, limited to the paddle's max speed
    pub fn nudge(&mut self, velocity: f32, dt: f32, playfield: &Playfield) {
        if !velocity.is_finite() {
            return;
        }
        let velocity = velocity.clamp(-self.max_speed, self.max_speed);
        self.rect.x += velocity * dt;
        self.clamp_to(playfield);
    }

    /// Ease the paddle center toward `fraction` of the playfield width
    ///
    /// Covers a fixed share of the remaining distance each call, never more
    /// than the max speed allows in `dt`.
    pub fn track(&mut self, fraction: f32, dt: f32, playfield: &Playfield) {
        if !fraction.is_finite() {
            return;
        }
        let target = fraction.clamp(0.0, 1.0) * playfield.width;
        let limit = self.max_speed * dt;
        let step = ((target - self.center_x()) * PADDLE_FOLLOW).clamp(-limit, limit);
        self.rect.x += step;
        self.clamp_to(playfield);
    }

    fn clamp_to(&mut self, playfield: &Playfield) {
        self.rect.x = self.rect.x.min(playfield.width - self.rect.width).max(0.0);
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub playfield: Playfield,
    /// Current phase
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub ball: Ball,
    pub blocks: BlockField,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    /// Simulation clock in seconds
    pub time: f64,
    /// Frames stepped while not paused
    pub frame: u64,
    /// Per-frame contact buffer, reused to avoid allocation
    pub(crate) contacts: FrameContacts,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a new game with a freshly generated level
    pub fn new(seed: u64, playfield: Playfield, particle_capacity: usize) -> Self {
        let layout = GridLayout::default();
        let mut state = Self {
            seed,
            playfield,
            phase: GamePhase::Serve,
            paddle: Paddle::new(&playfield),
            ball: Ball::new(&playfield),
            blocks: BlockField::new(layout),
            particles: ParticlePool::new(particle_capacity),
            time: 0.0,
            frame: 0,
            contacts: FrameContacts::with_capacity(layout.cell_count()),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.blocks.generate(false, &playfield, &mut state.rng);
        state
    }

    /// New level, ball back on the serve spot
    pub fn restart(&mut self) {
        self.blocks.generate(false, &self.playfield, &mut self.rng);
        self.paddle.reset(&self.playfield);
        self.ball.reset(&self.playfield);
        self.phase = GamePhase::Serve;
        log::info!("Restarted (seed {})", self.seed);
    }

    /// Refit everything to a new playfield size
    ///
    /// Blocks keep their category and health. A ball in flight is put back on
    /// the serve spot and relaunched.
    pub fn resize(&mut self, playfield: Playfield) {
        self.playfield = playfield;
        self.blocks.generate(true, &playfield, &mut self.rng);
        self.paddle.resize(&playfield);
        self.ball.resize(&playfield);

        let in_flight = self.ball.is_launched();
        self.ball.reset(&playfield);
        if in_flight {
            self.ball.launch(&mut self.rng);
        }
        log::debug!("Resized playfield to {}x{}", playfield.width, playfield.height);
    }
}
