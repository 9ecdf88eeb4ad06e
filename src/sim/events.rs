//! Domain events raised by the simulation
//!
//! The core never calls audio or scoring code directly; it reports what
//! happened and the host decides what to do about it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::blocks::BlockKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a side or top wall
    WallBounce,
    /// Ball bounced off the paddle
    PaddleHit {
        /// Driver speed after the hit
        speed: f32,
        /// Normalized hit position across the paddle, in [-1, 1]
        offset: f32,
    },
    /// Block took damage but survived
    BlockHit { kind: BlockKind, remaining: u8 },
    /// Block ran out of hit points
    BlockDestroyed { kind: BlockKind, position: Vec2 },
    /// Ball left the serve position
    Launched { speed: f32 },
    /// Ball fell past the bottom edge
    LifeLost,
    /// Last block of a generated level was destroyed
    Victory,
}

/// Receiver for simulation events (fire-and-forget)
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
