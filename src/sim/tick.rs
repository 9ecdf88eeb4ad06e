//! Per-frame simulation step
//!
//! Advances paddle, ball, blocks and particles by one variable-length frame.
//! Contacts are gathered across all sub-steps first and resolved together at
//! the end of the frame: blocks in the order they were hit, then the paddle.

use super::events::{EventSink, GameEvent};
use super::particles::EmitConfig;
use super::state::{GamePhase, GameState, PaddleCommand};
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Paddle steering (keyboard velocity or pointer position)
    pub paddle: Option<PaddleCommand>,
    /// Launch ball (click/tap/space)
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the paddle plays itself
    pub idle_mode: bool,
}

/// Advance the game state by one frame of `dt` seconds
///
/// `dt` is clamped to `[0, MAX_FRAME_DT]`; a non-finite delta counts as zero.
pub fn tick<S: EventSink>(state: &mut GameState, input: &TickInput, dt: f32, events: &mut S) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing | GamePhase::Serve => {
                state.phase = GamePhase::Paused;
                log::debug!("Paused at frame {}", state.frame);
                return;
            }
            GamePhase::Paused => {
                state.phase = if state.ball.is_launched() {
                    GamePhase::Playing
                } else {
                    GamePhase::Serve
                };
            }
            GamePhase::Cleared => {}
        }
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };
    state.frame += 1;
    state.time += f64::from(dt);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if let Some(command) = input.paddle {
        state.paddle.steer(command, dt, &state.playfield);
    }

    match state.phase {
        GamePhase::Serve => {
            // An empty field has nothing to play for
            if input.launch && !state.blocks.is_empty() && state.ball.launch(&mut state.rng) {
                state.phase = GamePhase::Playing;
                log::debug!("Launched at {:.0} px/s", state.ball.speed);
                events.emit(GameEvent::Launched {
                    speed: state.ball.speed,
                });
            }
        }
        GamePhase::Playing => {
            let now = state.time;
            state.ball.sweep_frame(
                dt,
                now,
                &state.playfield,
                &state.paddle,
                &state.blocks,
                &mut state.contacts,
                events,
            );
            resolve_contacts(state, now, events);

            // Victory wins a tie with a lost ball so the latch can't be skipped
            if state.blocks.is_cleared() {
                log::info!("Level cleared at frame {}", state.frame);
                state.ball.reset(&state.playfield);
                state.phase = GamePhase::Cleared;
                events.emit(GameEvent::Victory);
            } else if state.ball.is_lost(&state.playfield) {
                log::info!("Ball lost at frame {}", state.frame);
                state.ball.reset(&state.playfield);
                state.phase = GamePhase::Serve;
                events.emit(GameEvent::LifeLost);
            }
        }
        GamePhase::Paused | GamePhase::Cleared => {}
    }

    state.particles.advance(dt, &state.playfield);
}

/// Apply the frame's contacts: block reflections first, then the paddle
fn resolve_contacts<S: EventSink>(state: &mut GameState, now: f64, events: &mut S) {
    let GameState {
        ball,
        paddle,
        blocks,
        particles,
        contacts,
        rng,
        ..
    } = state;

    for &(index, hit) in &contacts.blocks {
        let Some(block) = blocks.damage(index) else {
            continue;
        };
        ball.bounce_off_block(hit.normal);
        ball.accelerate(BLOCK_SPEED_BOOST);
        particles.emit(block.center(), &EmitConfig::block_fragment(block.kind), rng);

        if block.is_alive() {
            events.emit(GameEvent::BlockHit {
                kind: block.kind,
                remaining: block.hp,
            });
        } else {
            events.emit(GameEvent::BlockDestroyed {
                kind: block.kind,
                position: block.center(),
            });
        }
    }

    // Paddle last so it decides the outgoing direction
    if contacts.paddle.is_some() {
        let offset = ball.bounce_off_paddle(paddle, now);
        particles.emit(ball.pos, &EmitConfig::paddle_hit(), rng);
        events.emit(GameEvent::PaddleHit {
            speed: ball.speed,
            offset,
        });
    }

    let removed = blocks.remove_destroyed();
    if removed > 0 {
        log::trace!("{} blocks removed, {} left", removed, blocks.len());
    }
}

/// Demo mode: serve immediately and chase the ball
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.phase == GamePhase::Serve {
        input.launch = true;
    }

    // Lead the ball slightly, with a slow wobble so rallies don't loop forever
    let ball = &state.ball;
    let lead = ball.pos + ball.vel.normalize_or_zero() * 30.0;
    let time_factor = state.frame as f32 * 0.01;
    let wobble = (time_factor.sin() * 0.3 + (time_factor * 0.7).sin() * 0.15)
        * state.paddle.rect.width
        / 2.0;

    if state.playfield.width > 0.0 {
        input.paddle = Some(PaddleCommand::Track((lead.x + wobble) / state.playfield.width));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallState;
    use crate::sim::rect::Rect;
    use crate::sim::state::Playfield;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn new_state() -> GameState {
        GameState::new(12345, Playfield::new(800.0, 600.0), 256)
    }

    #[test]
    fn test_tick_serve_to_playing() {
        let mut state = new_state();
        let mut events: Vec<GameEvent> = Vec::new();
        assert_eq!(state.phase, GamePhase::Serve);

        // Tick without launch - should stay in Serve
        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.ball.state, BallState::Idle);

        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ball.state, BallState::Launched);
        assert_eq!(events, vec![GameEvent::Launched { speed: BALL_BASE_SPEED }]);
    }

    #[test]
    fn test_launch_refused_on_empty_field() {
        let mut state = new_state();
        for index in 0..state.blocks.len() {
            state.blocks.damage(index);
        }
        state.blocks.remove_destroyed();

        let mut events: Vec<GameEvent> = Vec::new();
        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(events.is_empty());
    }

    #[test]
    fn test_tick_pause() {
        let mut state = new_state();
        let mut events: Vec<GameEvent> = Vec::new();

        let launch = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &launch, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Paused);

        // Frozen while paused
        let pos = state.ball.pos;
        let frame = state.frame;
        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(state.ball.pos, pos);
        assert_eq!(state.frame, frame);

        // Unpause
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_block_break_resolves_in_one_frame() {
        let mut state = new_state();
        let target = state.blocks.blocks()[35];
        state.ball.pos = Vec2::new(target.center().x, target.rect.bottom() + 14.0);
        state.ball.vel = Vec2::new(0.0, -400.0);
        state.ball.state = BallState::Launched;
        state.phase = GamePhase::Playing;
        let mut events: Vec<GameEvent> = Vec::new();

        tick(&mut state, &TickInput::default(), DT, &mut events);

        assert_eq!(state.blocks.len(), 39);
        assert!(state.blocks.blocks().iter().all(|b| b.cell != 35));
        assert!(state.ball.vel.y > 0.0);
        assert!((state.ball.vel.length() - 400.0).abs() < 1e-2);
        assert!((state.ball.speed - BALL_BASE_SPEED * BLOCK_SPEED_BOOST).abs() < 1e-3);
        assert_eq!(
            events,
            vec![GameEvent::BlockDestroyed {
                kind: target.kind,
                position: target.center(),
            }]
        );
        assert_eq!(state.particles.active_count(), 15);
    }

    #[test]
    fn test_paddle_hit_sends_ball_up() {
        let mut state = new_state();
        state.paddle.rect = Rect::new(340.0, 550.0, 120.0, 20.0);
        state.ball.radius = 15.0;
        state.ball.pos = Vec2::new(430.0, 530.0);
        state.ball.vel = Vec2::new(0.0, 500.0);
        state.ball.state = BallState::Launched;
        state.phase = GamePhase::Playing;
        let mut events: Vec<GameEvent> = Vec::new();

        tick(&mut state, &TickInput::default(), DT, &mut events);

        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.vel.x > 0.0);
        assert!(state.ball.pos.y <= 535.0);
        assert_eq!(events.len(), 1);
        let GameEvent::PaddleHit { offset, .. } = events[0] else {
            panic!("expected paddle hit, got {:?}", events[0]);
        };
        assert!((offset - 0.5).abs() < 1e-3);
        assert!(state.ball.paddle_cooldown_until > state.time);
    }

    #[test]
    fn test_lost_ball_returns_to_serve() {
        let mut state = new_state();
        state.ball.pos = Vec2::new(20.0, 645.0);
        state.ball.vel = Vec2::new(0.0, 600.0);
        state.ball.state = BallState::Launched;
        state.phase = GamePhase::Playing;
        let mut events: Vec<GameEvent> = Vec::new();

        tick(&mut state, &TickInput::default(), DT, &mut events);

        assert_eq!(events, vec![GameEvent::LifeLost]);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.ball.state, BallState::Idle);
        assert_eq!(state.ball.pos, Vec2::new(400.0, 500.0));
    }

    #[test]
    fn test_victory_latches() {
        let mut state = new_state();
        for index in 1..state.blocks.len() {
            state.blocks.damage(index);
        }
        state.blocks.remove_destroyed();
        let last = state.blocks.blocks()[0];
        state.ball.pos = Vec2::new(last.center().x, last.rect.bottom() + 14.0);
        state.ball.vel = Vec2::new(0.0, -400.0);
        state.ball.state = BallState::Launched;
        state.phase = GamePhase::Playing;
        let mut events: Vec<GameEvent> = Vec::new();

        tick(&mut state, &TickInput::default(), DT, &mut events);
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(events.last(), Some(&GameEvent::Victory));

        // Nothing more happens until the host restarts
        events.clear();
        let input = TickInput {
            launch: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Cleared);
        assert!(events.is_empty());
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let mut state = new_state();
        let mut events: Vec<GameEvent> = Vec::new();
        tick(&mut state, &TickInput::default(), 5.0, &mut events);
        assert!((state.time - f64::from(MAX_FRAME_DT)).abs() < 1e-9);
        tick(&mut state, &TickInput::default(), f32::NAN, &mut events);
        assert!((state.time - f64::from(MAX_FRAME_DT)).abs() < 1e-9);
    }

    #[test]
    fn test_idle_mode_serves_and_steers() {
        let mut state = new_state();
        let mut events: Vec<GameEvent> = Vec::new();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);

        for _ in 0..600 {
            tick(&mut state, &input, DT, &mut events);
        }
        assert!(state.frame > 600);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::PaddleHit { .. } | GameEvent::WallBounce))
        );
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = new_state();
        let mut state2 = new_state();
        let mut events1: Vec<GameEvent> = Vec::new();
        let mut events2: Vec<GameEvent> = Vec::new();

        let mut inputs = vec![
            TickInput {
                paddle: Some(PaddleCommand::Track(0.3)),
                ..Default::default()
            },
            TickInput {
                launch: true,
                ..Default::default()
            },
        ];
        inputs.extend((0..300).map(|i| TickInput {
            paddle: Some(PaddleCommand::Nudge(if i % 40 < 20 { 900.0 } else { -900.0 })),
            ..Default::default()
        }));

        for input in &inputs {
            tick(&mut state1, input, DT, &mut events1);
            tick(&mut state2, input, DT, &mut events2);
        }

        assert_eq!(state1.frame, state2.frame);
        assert_eq!(events1, events2);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.blocks.blocks(), state2.blocks.blocks());
    }
}
