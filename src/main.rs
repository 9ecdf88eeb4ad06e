//! Neon Breakout headless runner
//!
//! Plays a session on autopilot at a fixed 60 Hz host clock and prints a
//! summary. Set `RUST_LOG=debug` to see every sound cue.
//!
//! Usage: `neon-breakout [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_breakout::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use neon_breakout::sim::Playfield;
    use neon_breakout::{LogAudio, Session, Settings};

    /// Two minutes of play
    const DEMO_FRAMES: u32 = 60 * 120;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            log::warn!("Seed {arg:?} is not a number, using default");
            0x5eed
        }),
        None => 0x5eed,
    };
    let settings = args.next().map(Settings::load_from).unwrap_or_default();

    log::info!("Neon Breakout starting...");

    let playfield = Playfield::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
    let mut session = Session::new(seed, &settings, playfield, LogAudio::new(&settings));
    session.set_idle_mode(true);

    for frame in 0..DEMO_FRAMES {
        session.frame(f64::from(frame) * FRAME_MS);
    }

    let score = session.score();
    let state = session.state();
    println!("seed:          {seed}");
    println!("frames:        {}", state.frame);
    println!("score:         {}", score.score);
    println!("best:          {}", score.best);
    println!("lives left:    {}", score.lives);
    println!("blocks left:   {}", state.blocks.len());
    println!("ball speed:    {:.0} px/s", state.ball.speed);
    println!("sound cues:    {}", session.audio().played());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts on the web drive `neon_breakout::Session` directly
}
