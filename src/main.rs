//! Chaos Dodge headless runner
//!
//! Builds a sandbox arena, plays a scripted session at a fixed 60 Hz and
//! prints the final frame as JSON.
//!
//! Usage: `chaos-dodge [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use chaos_dodge::Settings;
    use chaos_dodge::consts::SIM_DT;
    use chaos_dodge::platform::{InputState, MicInput};
    use chaos_dodge::sim::{DifficultyPhase, FrameOutput, Game, SandboxWorld, TickInput, tick};

    const DEFAULT_SECONDS: f32 = 150.0;

    /// Scripted controls: kick in short bursts, mash both legs now and then
    fn scripted_controls(frame: u64) -> InputState {
        let second = frame / 60;
        let sub = frame % 60;
        InputState {
            left_leg: second % 3 == 0 && sub < 20,
            right_leg: (second % 5 == 0 && sub < 20) || (second % 3 == 1 && sub < 10),
        }
    }

    /// Fake analyser frames: a shout every 7 seconds
    fn scripted_spectrum(frame: u64) -> [u8; 128] {
        let level = if (frame / 60) % 7 == 6 { 110 } else { 12 };
        [level; 128]
    }

    pub fn run() {
        env_logger::init();

        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        let seconds = args
            .next()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS);

        let mic_enabled = settings.mic_enabled;
        let mut game = Game::new(settings);
        let mut physics = SandboxWorld::new();
        game.build_world(&mut physics);

        let mut mic = MicInput::new();
        if mic_enabled {
            mic.request();
            mic.resolve(true);
        }

        log::info!("Chaos Dodge (native) running {:.0}s headless", seconds);
        game.start_game();

        let frames = (seconds / SIM_DT).ceil() as u64;
        let mut phase = DifficultyPhase::Warmup;
        let mut event: Option<&'static str> = None;
        let mut last: Option<FrameOutput> = None;

        for frame in 0..frames {
            mic.update_spectrum(&scripted_spectrum(frame));
            let input = TickInput {
                controls: scripted_controls(frame),
                mic_volume: mic.volume(),
            };

            let out = tick(&mut game, &mut physics, &input, SIM_DT);
            physics.step(out.physics.time_step);

            if out.phase != phase {
                phase = out.phase;
                log::info!("Phase {} at {:.1}s", phase.label(), out.elapsed);
            }
            if out.active_event != event {
                event = out.active_event;
                log::info!("Event: {}", event.unwrap_or("none"));
            }

            let over = out.is_game_over;
            last = Some(out);
            if over {
                mic.stop();
                break;
            }
        }

        match last {
            Some(out) => {
                log::info!(
                    "Session finished after {} frames: {:.1}s survived ({:?})",
                    out.frame,
                    out.elapsed,
                    out.game_over_cause
                );
                match serde_json::to_string_pretty(&out) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::error!("Failed to encode frame: {e}"),
                }
            }
            None => log::warn!("No frames simulated"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; the host drives `tick` directly
}
