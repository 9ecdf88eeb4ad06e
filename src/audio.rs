//! Sound cues
//!
//! The session turns simulation events into `SoundEffect`s and hands them to
//! an `AudioSink`. Hosts with a real audio backend implement the trait; the
//! bundled `LogAudio` applies the volume settings and logs each cue.

use crate::consts::BALL_MAX_SPEED;
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits wall
    WallHit,
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits block (doesn't break)
    BlockHit,
    /// Block breaks
    BlockBreak,
    /// Ball launched
    Launch,
    /// Ball fell out of the playfield
    LifeLost,
    /// Level cleared
    Victory,
    /// Last life lost
    GameOver,
}

/// Synth recipe for a cue: notes played in sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Note frequencies in Hz
    pub notes: &'static [f32],
    /// Peak gain before volume is applied
    pub gain: f32,
    /// Seconds per note
    pub duration: f32,
}

impl SoundEffect {
    /// Cue for a simulation event, with an intensity in [0, 1]
    pub fn for_event(event: &GameEvent) -> (Self, f32) {
        match event {
            GameEvent::WallBounce => (SoundEffect::WallHit, 1.0),
            GameEvent::PaddleHit { speed, .. } => {
                (SoundEffect::PaddleHit, (speed / BALL_MAX_SPEED).clamp(0.0, 1.0))
            }
            GameEvent::BlockHit { .. } => (SoundEffect::BlockHit, 1.0),
            GameEvent::BlockDestroyed { .. } => (SoundEffect::BlockBreak, 1.0),
            GameEvent::Launched { .. } => (SoundEffect::Launch, 1.0),
            GameEvent::LifeLost => (SoundEffect::LifeLost, 1.0),
            GameEvent::Victory => (SoundEffect::Victory, 1.0),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            // Solid thump
            SoundEffect::PaddleHit => Tone {
                notes: &[150.0],
                gain: 0.6,
                duration: 0.15,
            },
            // Higher ping
            SoundEffect::WallHit => Tone {
                notes: &[400.0],
                gain: 0.3,
                duration: 0.1,
            },
            SoundEffect::BlockHit => Tone {
                notes: &[300.0],
                gain: 0.25,
                duration: 0.08,
            },
            SoundEffect::BlockBreak => Tone {
                notes: &[880.0, 1320.0],
                gain: 0.4,
                duration: 0.12,
            },
            SoundEffect::Launch => Tone {
                notes: &[200.0, 600.0],
                gain: 0.3,
                duration: 0.125,
            },
            SoundEffect::LifeLost => Tone {
                notes: &[300.0, 150.0],
                gain: 0.4,
                duration: 0.25,
            },
            // Triumphant fanfare
            SoundEffect::Victory => Tone {
                notes: &[400.0, 500.0, 600.0, 800.0],
                gain: 0.3,
                duration: 0.5,
            },
            // Sad descending
            SoundEffect::GameOver => Tone {
                notes: &[400.0, 350.0, 300.0, 200.0],
                gain: 0.3,
                duration: 0.4,
            },
        }
    }
}

/// Receiver for sound cues (fire-and-forget)
pub trait AudioSink {
    /// `intensity` in [0, 1] scales the cue's loudness
    fn play(&mut self, effect: SoundEffect, intensity: f32);
}

/// Audio sink that applies volume settings and logs cues at debug level
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl LogAudio {
    pub fn new(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Cues that were audible
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, intensity: f32) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let tone = effect.tone();
        let gain = vol * tone.gain * intensity.clamp(0.0, 1.0);
        self.played += 1;
        log::debug!("sfx {:?} gain {:.2} notes {:?}", effect, gain, tone.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BlockKind;
    use glam::Vec2;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WallBounce),
            (SoundEffect::WallHit, 1.0)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BlockDestroyed {
                kind: BlockKind::Bonus,
                position: Vec2::ZERO,
            })
            .0,
            SoundEffect::BlockBreak
        );

        let (effect, intensity) = SoundEffect::for_event(&GameEvent::PaddleHit {
            speed: 400.0,
            offset: 0.0,
        });
        assert_eq!(effect, SoundEffect::PaddleHit);
        assert!((intensity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_muted_sink_stays_silent() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut audio = LogAudio::new(&settings);
        audio.play(SoundEffect::Victory, 1.0);
        assert_eq!(audio.played(), 0);

        audio.set_muted(false);
        audio.play(SoundEffect::Victory, 1.0);
        assert_eq!(audio.played(), 1);

        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Victory, 1.0);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_volume_clamped() {
        let mut audio = LogAudio::default();
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
