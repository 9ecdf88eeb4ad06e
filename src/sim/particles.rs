//! Pooled particles for hit and break effects
//!
//! All slots are allocated up front. Emitting borrows free slots, advancing
//! hands dead ones back in the same sweep, so a warmed-up pool never touches
//! the allocator. `active_count() + free_count() == capacity()` always holds.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::blocks::BlockKind;
use super::state::Playfield;
use crate::consts::*;

/// Visual style of a particle (renderers pick a draw path from this)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleKind {
    #[default]
    Spark,
    PaddleHit,
    BlockFragment,
}

/// Parameters for one burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmitConfig {
    /// Particles requested (fewer are emitted when the pool runs dry)
    pub count: usize,
    /// Velocity spread; each axis is drawn from ±speed/2
    pub speed: f32,
    /// Nominal radius, jittered into [0.5, 1.0] × size
    pub size: f32,
    /// Seconds each particle lives
    pub lifetime: f32,
    pub color: u32,
    pub kind: ParticleKind,
}

impl EmitConfig {
    /// Cyan sparks where the ball meets the paddle
    pub fn paddle_hit() -> Self {
        Self {
            count: 20,
            speed: 150.0,
            size: 3.0,
            lifetime: 0.8,
            color: 0x00_f3_ff,
            kind: ParticleKind::PaddleHit,
        }
    }

    /// Fragments in the block's color
    pub fn block_fragment(kind: BlockKind) -> Self {
        Self {
            count: 15,
            speed: 400.0,
            size: 4.0,
            lifetime: 0.8,
            color: kind.color(),
            kind: ParticleKind::BlockFragment,
        }
    }
}

/// A particle slot. Identity is recycled across unrelated bursts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub color: u32,
    pub kind: ParticleKind,
    pub active: bool,
}

impl Particle {
    fn spawn<R: Rng>(&mut self, origin: Vec2, config: &EmitConfig, rng: &mut R) {
        self.pos = origin;
        self.vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * config.speed,
            (rng.random::<f32>() - 0.5) * config.speed,
        );
        self.radius = config.size * (0.5 + rng.random::<f32>() * 0.5);
        self.life = config.lifetime;
        self.max_life = config.lifetime;
        self.color = config.color;
        self.kind = config.kind;
        self.active = true;
    }

    /// Integrate one frame. Returns false once the particle should be recycled.
    fn advance(&mut self, dt: f32, cull_y: f32) -> bool {
        self.life -= dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.pos += self.vel * dt;
        self.radius *= PARTICLE_SHRINK;

        if self.life <= 0.0 || self.pos.y > cull_y {
            self.active = false;
        }
        self.active
    }

    /// Remaining life in [0, 1], for alpha fading
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Fixed-capacity particle pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    /// Indices of slots ready to be emitted
    free: Vec<usize>,
    /// Indices of live slots
    active: Vec<usize>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Emit up to `config.count` particles at `origin`
    ///
    /// Returns how many were actually emitted.
    pub fn emit<R: Rng>(&mut self, origin: Vec2, config: &EmitConfig, rng: &mut R) -> usize {
        let wanted = config.count.min(self.free.len());
        for _ in 0..wanted {
            let Some(slot) = self.free.pop() else {
                break;
            };
            self.slots[slot].spawn(origin, config, rng);
            self.active.push(slot);
        }
        wanted
    }

    /// Advance every live particle and recycle the ones that died
    pub fn advance(&mut self, dt: f32, playfield: &Playfield) {
        let cull_y = playfield.height + PARTICLE_CULL_MARGIN;
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let slot = self.active[i];
            if !self.slots[slot].advance(dt, cull_y) {
                // Tail was already visited, so swapping it in is safe
                self.active.swap_remove(i);
                self.free.push(slot);
            }
        }
    }

    /// Live particles, for rendering
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(|&slot| &self.slots[slot])
    }
}
