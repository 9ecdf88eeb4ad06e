//! Ball physics: sub-stepped motion, wall clamps and collision response
//!
//! `speed` is the driver speed. It is reconciled with the velocity only at
//! launch and on paddle hits; block bounces keep |vel| through reflection and
//! only grow `speed` for the next paddle hit.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::blocks::BlockField;
use super::collision::{CollisionResult, TargetKind, reflect_preserving_speed, sweep_circle_rect};
use super::events::{EventSink, GameEvent};
use super::state::{Paddle, Playfield};
use crate::consts::*;

/// Ball lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Waiting at the serve position
    Idle,
    /// Moving under its own velocity
    Launched,
}

/// Walls touched during one sub-step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    pub side: bool,
    pub top: bool,
}

/// Contacts gathered over one frame's sub-steps
#[derive(Debug, Clone, Default)]
pub struct FrameContacts {
    /// At most one paddle contact per frame
    pub paddle: Option<CollisionResult>,
    /// Block index (into `BlockField::blocks`) and contact, at most one per block
    pub blocks: Vec<(usize, CollisionResult)>,
}

impl FrameContacts {
    pub fn with_capacity(blocks: usize) -> Self {
        Self {
            paddle: None,
            blocks: Vec::with_capacity(blocks),
        }
    }

    pub fn clear(&mut self) {
        self.paddle = None;
        self.blocks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.paddle.is_none() && self.blocks.is_empty()
    }

    fn has_block(&self, index: usize) -> bool {
        self.blocks.iter().any(|&(i, _)| i == index)
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Position at the start of the current sub-step
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Driver speed used at launch and on paddle hits
    pub speed: f32,
    /// Simulation time before which the paddle is not probed
    pub paddle_cooldown_until: f64,
    pub state: BallState,
}

impl Ball {
    pub fn new(playfield: &Playfield) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            prev_pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: Self::radius_for(playfield),
            speed: BALL_BASE_SPEED,
            paddle_cooldown_until: 0.0,
            state: BallState::Idle,
        };
        ball.reset(playfield);
        ball
    }

    /// Radius scaled to the playfield height, never below the minimum
    pub fn radius_for(playfield: &Playfield) -> f32 {
        (playfield.height * BALL_RADIUS_SCALE).max(BALL_MIN_RADIUS)
    }

    /// Back to the serve position, stationary, at base speed
    pub fn reset(&mut self, playfield: &Playfield) {
        self.pos = Vec2::new(playfield.width / 2.0, playfield.height - BALL_SPAWN_OFFSET);
        self.prev_pos = self.pos;
        self.vel = Vec2::ZERO;
        self.speed = BALL_BASE_SPEED;
        self.paddle_cooldown_until = 0.0;
        self.state = BallState::Idle;
    }

    pub fn resize(&mut self, playfield: &Playfield) {
        self.radius = Self::radius_for(playfield);
    }

    pub fn is_launched(&self) -> bool {
        self.state == BallState::Launched
    }

    /// Launch up and to the right at 45° ± 11.25°
    ///
    /// Returns false if the ball is already in flight.
    pub fn launch<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.is_launched() {
            return false;
        }
        use std::f32::consts::{FRAC_PI_4, PI};
        let jitter = PI / 16.0;
        let angle = FRAC_PI_4 + rng.random_range(-jitter..jitter);
        self.vel = Vec2::new(angle.cos() * self.speed, -angle.sin() * self.speed);
        self.state = BallState::Launched;
        true
    }

    /// Grow the driver speed, capped at the maximum
    pub fn accelerate(&mut self, factor: f32) {
        self.speed = (self.speed * factor).min(BALL_MAX_SPEED);
    }

    /// Move one sub-step and bounce off the side and top walls
    ///
    /// The bottom is open; falling out is reported by `is_lost`.
    pub fn substep(&mut self, dt: f32, playfield: &Playfield) -> WallContact {
        self.prev_pos = self.pos;
        self.pos += self.vel * dt;

        let mut contact = WallContact::default();
        let min_x = self.radius;
        let max_x = playfield.width - self.radius;

        if (self.pos.x <= min_x && self.vel.x < 0.0) || (self.pos.x >= max_x && self.vel.x > 0.0) {
            self.vel.x = -self.vel.x;
            contact.side = true;
        }
        self.pos.x = self.pos.x.min(max_x).max(min_x);

        if self.pos.y <= self.radius && self.vel.y < 0.0 {
            self.vel.y = -self.vel.y;
            contact.top = true;
        }
        self.pos.y = self.pos.y.max(self.radius);

        contact
    }

    /// Integrate one frame in `FRAME_SUBSTEPS` slices, collecting contacts
    ///
    /// Each slice sweeps the paddle (unless cooling down or already hit this
    /// frame) and every live block not yet hit this frame. Contacts where the
    /// ball is already moving away from the face are ignored. Nothing is
    /// resolved here; see `bounce_off_block` and `bounce_off_paddle`.
    #[allow(clippy::too_many_arguments)]
    pub fn sweep_frame<S: EventSink>(
        &mut self,
        dt: f32,
        now: f64,
        playfield: &Playfield,
        paddle: &Paddle,
        blocks: &BlockField,
        contacts: &mut FrameContacts,
        events: &mut S,
    ) {
        contacts.clear();
        if !self.is_launched() || dt <= 0.0 {
            return;
        }

        let step_dt = dt / FRAME_SUBSTEPS as f32;
        for _ in 0..FRAME_SUBSTEPS {
            let walls = self.substep(step_dt, playfield);
            if walls.side {
                events.emit(GameEvent::WallBounce);
            }
            if walls.top {
                events.emit(GameEvent::WallBounce);
            }

            let displacement = self.pos - self.prev_pos;

            if contacts.paddle.is_none() && now >= self.paddle_cooldown_until {
                let hit = sweep_circle_rect(
                    self.prev_pos,
                    displacement,
                    self.radius,
                    &paddle.rect,
                    TargetKind::Paddle,
                );
                if hit.hit && displacement.dot(hit.normal) < 0.0 {
                    contacts.paddle = Some(hit);
                }
            }

            for (index, block) in blocks.live() {
                if contacts.has_block(index) {
                    continue;
                }
                let hit = sweep_circle_rect(
                    self.prev_pos,
                    displacement,
                    self.radius,
                    &block.rect,
                    TargetKind::Block,
                );
                if hit.hit && displacement.dot(hit.normal) < 0.0 {
                    contacts.blocks.push((index, hit));
                }
            }
        }
    }

    /// Reflect off a block face, keeping |vel| exactly
    ///
    /// Does nothing if the ball is no longer moving into that face (a second
    /// coplanar block hit in the same frame). Returns whether it reflected.
    pub fn bounce_off_block(&mut self, normal: Vec2) -> bool {
        if self.vel.dot(normal) >= 0.0 {
            return false;
        }
        self.vel = reflect_preserving_speed(self.vel, normal);
        self.pos += normal * self.radius * COLLISION_NUDGE;
        true
    }

    /// Replace the velocity from where the ball struck the paddle
    ///
    /// Center hits go straight up, edge hits leave at ±60°. Speed grows by the
    /// paddle boost. Returns the normalized hit offset in [-1, 1].
    pub fn bounce_off_paddle(&mut self, paddle: &Paddle, now: f64) -> f32 {
        let half_width = paddle.rect.width / 2.0;
        let offset = if half_width > 0.0 {
            ((self.pos.x - paddle.center_x()) / half_width).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let angle = offset * MAX_DEFLECTION;

        self.accelerate(PADDLE_SPEED_BOOST);
        self.vel = Vec2::new(angle.sin() * self.speed, -angle.cos() * self.speed);
        // Rest on top of the paddle so the next sweep starts clear of it
        self.pos.y = self.pos.y.min(paddle.rect.top() - self.radius);
        self.paddle_cooldown_until = now + PADDLE_COOLDOWN;
        offset
    }

    /// Ball has fallen out through the open bottom edge
    pub fn is_lost(&self, playfield: &Playfield) -> bool {
        self.pos.y > playfield.height + BALL_LOSS_MARGIN
    }
}
