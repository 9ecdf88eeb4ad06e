//! Score, lives and combo bookkeeping
//!
//! Driven purely by simulation events, so the core never knows about points.

use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_POINTS, START_LIVES};
use crate::sim::GameEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub lives: u8,
    /// Multiplier for the next destroyed block; resets when a life is lost
    pub combo: u32,
    /// Best score seen across restarts of this session
    pub best: u64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            combo: 1,
            best: 0,
        }
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event; returns the points it was worth
    pub fn record(&mut self, event: &GameEvent) -> u64 {
        match event {
            GameEvent::BlockDestroyed { .. } => {
                let points = BLOCK_POINTS * u64::from(self.combo);
                self.score += points;
                self.best = self.best.max(self.score);
                self.combo = self.combo.saturating_add(1);
                points
            }
            GameEvent::LifeLost => {
                self.lives = self.lives.saturating_sub(1);
                self.combo = 1;
                0
            }
            _ => 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Start a new run, keeping the best score
    pub fn reset(&mut self) {
        *self = Self {
            best: self.best,
            ..Self::default()
        };
    }
}
