//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, injected into anything that rolls dice
//! - Stable iteration order (blocks keep grid order, contacts keep hit order)
//! - No rendering, audio or platform dependencies; outcomes leave as events

pub mod ball;
pub mod blocks;
pub mod collision;
pub mod events;
pub mod particles;
pub mod rect;
pub mod state;
pub mod tick;

pub use ball::{Ball, BallState, FrameContacts, WallContact};
pub use blocks::{Block, BlockField, BlockKind, GridLayout};
pub use collision::{
    CollisionResult, TargetKind, contact_normal, reflect_preserving_speed, reflect_velocity,
    sweep_circle_rect,
};
pub use events::{EventSink, GameEvent};
pub use particles::{EmitConfig, Particle, ParticleKind, ParticlePool};
pub use rect::Rect;
pub use state::{GamePhase, GameState, Paddle, PaddleCommand, Playfield};
pub use tick::{TickInput, tick};
