//! Frame driver between a host loop and the simulation
//!
//! The host calls `frame` once per display refresh with a millisecond
//! timestamp. The session turns timestamps into clamped deltas, steps the
//! simulation, then drains the frame's events into scoring and audio. Game
//! over and victory both start a fresh level once the frame's events have
//! been dispatched.

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::MAX_FRAME_DT;
use crate::score::Scoreboard;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, PaddleCommand, Playfield, TickInput, tick};

/// Converts host timestamps into frame deltas and tracks FPS
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Seconds since the previous timestamp, clamped to `[0, MAX_FRAME_DT]`
    ///
    /// The first call after creation or `suspend` reports zero.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if now_ms.is_finite() => ((now_ms - last) / 1000.0) as f32,
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_ms = Some(now_ms);
            self.track_fps(now_ms);
        }
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the last timestamp (host hidden or backgrounded)
    pub fn suspend(&mut self) {
        self.last_ms = None;
        self.frame_times = [0.0; 60];
        self.fps = 0;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the slot about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }
}

/// A running game: simulation, scoring and audio wired together
pub struct Session<A: AudioSink> {
    state: GameState,
    score: Scoreboard,
    audio: A,
    clock: FrameClock,
    input: TickInput,
    events: Vec<GameEvent>,
    suspended: bool,
}

impl<A: AudioSink> Session<A> {
    pub fn new(seed: u64, settings: &Settings, playfield: Playfield, audio: A) -> Self {
        log::info!(
            "New session: seed {}, {} quality, {} particles",
            seed,
            settings.quality.as_str(),
            settings.max_particles()
        );
        Self {
            state: GameState::new(seed, playfield, settings.max_particles()),
            score: Scoreboard::new(),
            audio,
            clock: FrameClock::new(),
            input: TickInput::default(),
            events: Vec::with_capacity(64),
            suspended: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tools and tests that stage a situation
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Steer the paddle on the next frame
    pub fn steer(&mut self, command: PaddleCommand) {
        self.input.paddle = Some(command);
    }

    /// Launch on the next frame (ignored unless serving)
    pub fn launch(&mut self) {
        self.input.launch = true;
    }

    /// Toggle pause on the next frame
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    /// Let the paddle play itself
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    /// Stop stepping until `resume`; the next frame after it has zero delta
    pub fn suspend(&mut self) {
        self.suspended = true;
        self.clock.suspend();
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Step one display frame at host time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        if self.suspended {
            return;
        }

        let dt = self.clock.delta(now_ms);
        tick(&mut self.state, &self.input, dt, &mut self.events);

        // Clear one-shot inputs after processing
        self.input.paddle = None;
        self.input.launch = false;
        self.input.pause = false;

        self.dispatch();
    }

    /// Fresh level and score
    pub fn restart(&mut self) {
        self.score.reset();
        self.state.restart();
        self.input = TickInput {
            idle_mode: self.input.idle_mode,
            ..TickInput::default()
        };
    }

    pub fn resize(&mut self, playfield: Playfield) {
        self.state.resize(playfield);
    }

    /// Feed this frame's events to scoring and audio
    fn dispatch(&mut self) {
        let mut restart = false;

        for event in self.events.drain(..) {
            let (effect, intensity) = SoundEffect::for_event(&event);
            self.audio.play(effect, intensity);
            self.score.record(&event);

            match event {
                GameEvent::LifeLost if self.score.is_game_over() => {
                    log::info!("Game over with {} points", self.score.score);
                    self.audio.play(SoundEffect::GameOver, 1.0);
                    restart = true;
                }
                GameEvent::Victory => {
                    log::info!("Victory with {} points", self.score.score);
                    restart = true;
                }
                _ => {}
            }
        }

        if restart {
            self.restart();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::START_LIVES;
    use crate::sim::GamePhase;

    #[derive(Default)]
    struct Recorder(Vec<SoundEffect>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, _intensity: f32) {
            self.0.push(effect);
        }
    }

    fn session() -> Session<Recorder> {
        Session::new(
            42,
            &Settings::default(),
            Playfield::new(800.0, 600.0),
            Recorder::default(),
        )
    }

    #[test]
    fn test_clock_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), 0.0);
        assert!((clock.delta(1016.0) - 0.016).abs() < 1e-6);
        // Long stall is clamped
        assert_eq!(clock.delta(5000.0), MAX_FRAME_DT);
        // Clock going backwards never yields a negative delta
        assert_eq!(clock.delta(4000.0), 0.0);

        clock.suspend();
        assert_eq!(clock.delta(9000.0), 0.0);
        assert!((clock.delta(9010.0) - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_clock_fps() {
        let mut clock = FrameClock::new();
        for i in 1..=120 {
            clock.delta(f64::from(i) * 1000.0 / 60.0);
        }
        assert_eq!(clock.fps(), 60);
    }

    #[test]
    fn test_launch_plays_cue() {
        let mut session = session();
        session.frame(0.0);
        session.launch();
        session.frame(16.0);
        assert_eq!(session.state().phase, GamePhase::Playing);
        assert_eq!(session.audio().0, vec![SoundEffect::Launch]);
    }

    #[test]
    fn test_suspended_session_does_not_step() {
        let mut session = session();
        session.frame(0.0);
        session.launch();
        session.frame(16.0);
        let pos = session.state().ball.pos;

        session.suspend();
        session.frame(32.0);
        assert_eq!(session.state().ball.pos, pos);

        // First frame back has zero delta
        session.resume();
        session.frame(10_000.0);
        assert_eq!(session.state().ball.pos, pos);
        session.frame(10_016.0);
        assert_ne!(session.state().ball.pos, pos);
    }

    #[test]
    fn test_pause_toggle() {
        let mut session = session();
        session.frame(0.0);
        session.toggle_pause();
        session.frame(16.0);
        assert_eq!(session.state().phase, GamePhase::Paused);
        session.toggle_pause();
        session.frame(32.0);
        assert_eq!(session.state().phase, GamePhase::Serve);
    }

    #[test]
    fn test_game_over_restarts() {
        let mut session = session();
        for _ in 0..START_LIVES {
            session.events.push(GameEvent::LifeLost);
            session.dispatch();
        }
        assert_eq!(session.score().lives, START_LIVES);
        assert_eq!(session.audio().0.last(), Some(&SoundEffect::GameOver));
        assert_eq!(session.state().phase, GamePhase::Serve);
    }

    #[test]
    fn test_resize_refits_state() {
        let mut session = session();
        session.resize(Playfield::new(1280.0, 720.0));
        assert_eq!(session.state().playfield, Playfield::new(1280.0, 720.0));
        assert_eq!(session.state().blocks.len(), 40);
    }
}
