//! Neon Breakout - a ball-and-paddle arcade core
//!
//! Core modules:
//! - `sim`: Deterministic per-frame simulation (swept collision, ball physics,
//!   block field, particle pool)
//! - `session`: Frame driver that feeds the simulation and dispatches its events
//! - `score`: Score, lives and combo bookkeeping
//! - `audio`: Sound cue seam for the host
//! - `settings`: Quality presets and user preferences

pub mod audio;
pub mod score;
pub mod session;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, LogAudio, SoundEffect};
pub use score::Scoreboard;
pub use session::{FrameClock, Session};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Ball movement is integrated in this many equal slices per frame
    pub const FRAME_SUBSTEPS: u32 = 8;
    /// Largest frame delta the simulation will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default playfield size (also the smallest the host should use)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 450.0;

    /// Ball defaults
    pub const BALL_MIN_RADIUS: f32 = 12.0;
    /// Radius as a fraction of playfield height
    pub const BALL_RADIUS_SCALE: f32 = 0.015;
    pub const BALL_BASE_SPEED: f32 = 400.0;
    /// Hard cap for the ball's driver speed
    pub const BALL_MAX_SPEED: f32 = 800.0;
    /// Ball rests this far above the bottom edge while serving
    pub const BALL_SPAWN_OFFSET: f32 = 100.0;
    /// Ball is lost once its center is this far below the bottom edge
    pub const BALL_LOSS_MARGIN: f32 = 50.0;

    /// Speed growth per paddle hit (multiplicative)
    pub const PADDLE_SPEED_BOOST: f32 = 1.02;
    /// Speed growth per block hit (multiplicative)
    pub const BLOCK_SPEED_BOOST: f32 = 1.01;
    /// Deflection at the very edge of the paddle (radians, 60°)
    pub const MAX_DEFLECTION: f32 = std::f32::consts::FRAC_PI_3;
    /// Position push-out after a block bounce, as a fraction of the radius
    pub const COLLISION_NUDGE: f32 = 0.1;
    /// Seconds during which the paddle is not probed again after a hit
    pub const PADDLE_COOLDOWN: f64 = 0.1;

    /// Paddle defaults
    pub const PADDLE_WIDTH_SCALE: f32 = 0.15;
    pub const PADDLE_HEIGHT_SCALE: f32 = 0.025;
    pub const PADDLE_BOTTOM_OFFSET: f32 = 50.0;
    /// Horizontal speed limit (pixels/s)
    pub const PADDLE_MAX_SPEED: f32 = 1200.0;
    /// Fraction of the remaining distance covered per frame when tracking
    pub const PADDLE_FOLLOW: f32 = 0.15;

    /// Block grid defaults
    pub const GRID_COLUMNS: usize = 8;
    pub const GRID_ROWS: usize = 5;
    pub const GRID_PADDING: f32 = 20.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;

    /// Particle physics
    pub const PARTICLE_GRAVITY: f32 = 800.0;
    /// Radius multiplier applied on every advance
    pub const PARTICLE_SHRINK: f32 = 0.98;
    /// Particles are culled this far below the bottom edge
    pub const PARTICLE_CULL_MARGIN: f32 = 100.0;

    /// Scoring
    pub const BLOCK_POINTS: u64 = 100;
    pub const START_LIVES: u8 = 3;
}
