//! Drop Charge headless runner
//!
//! Drives the simulation with a fixed-step accumulator and a simple autopilot,
//! logging what the presentation layer would be told.
//!
//! Usage: `drop-charge [seed] [seconds] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;

    use drop_charge::Tuning;
    use drop_charge::consts::*;
    use drop_charge::sim::{Cue, FlowState, GameEvent, GameState, TickInput, tick};

    /// Simulated display refresh, deliberately off the sim rate
    const FRAME_DT: f32 = 1.0 / 50.0;

    struct Runner {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        coins: u32,
        segments: u32,
        lava_hits: u32,
    }

    impl Runner {
        fn new(state: GameState) -> Self {
            Self {
                state,
                accumulator: 0.0,
                input: TickInput::default(),
                coins: 0,
                segments: 0,
                lava_hits: 0,
            }
        }

        /// Steer toward the nearest item above the player
        fn autopilot(&self) -> f32 {
            let player = self.state.session.player.pos;
            let target = self
                .state
                .items()
                .iter()
                .filter(|item| item.alive && item.pos.y > player.y)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
            match target {
                Some(item) => ((item.pos.x - player.x) / (SCENE_WIDTH / 2.0)).clamp(-1.0, 1.0),
                None => 0.0,
            }
        }

        /// Run simulation ticks for one display frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.input.tilt = Some(self.autopilot());

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot inputs
                self.input.taps = 0;
                self.input.viewport = None;
            }

            for event in self.state.drain_events() {
                self.observe(event);
            }
        }

        fn observe(&mut self, event: GameEvent) {
            match event {
                GameEvent::Cue(Cue::Coin) | GameEvent::Cue(Cue::Boost) => self.coins += 1,
                GameEvent::Cue(Cue::HitLava) => self.lava_hits += 1,
                GameEvent::BackgroundSegment { base_y } => {
                    self.segments += 1;
                    log::debug!("Background segment at y={base_y:.0}");
                }
                other => log::trace!("{other:?}"),
            }
        }
    }

    fn load_tuning(path: Option<&String>) -> Result<Tuning, drop_charge::TuningError> {
        match path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(json) => Tuning::from_json(&json),
                Err(err) => {
                    log::warn!("Could not read {path}: {err}, using defaults");
                    Ok(Tuning::default())
                }
            },
            None => Ok(Tuning::default()),
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let args: Vec<String> = std::env::args().collect();
        let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(12345u64);
        let seconds = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(60.0f32);

        let tuning = match load_tuning(args.get(3)) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Invalid tuning: {err}");
                return ExitCode::FAILURE;
            }
        };
        let state = match GameState::new(seed, tuning) {
            Ok(state) => state,
            Err(err) => {
                log::error!("Could not start session: {err}");
                return ExitCode::FAILURE;
            }
        };

        log::info!("Drop Charge (headless) seed={seed}, {seconds:.0}s");
        let mut runner = Runner::new(state);
        runner.input.taps = 1;

        let frames = (seconds / FRAME_DT) as u32;
        for _ in 0..frames {
            runner.update(FRAME_DT);
            if runner.state.flow_state() == FlowState::GameOver {
                break;
            }
        }

        let session = &runner.state.session;
        log::info!(
            "Finished in {:?}: height {:.0}, coins {}, lives {}, hazard hits {}, segments {}, clock {:.1}s",
            runner.state.flow_state(),
            session.player.pos.y,
            runner.coins,
            session.lives,
            runner.lava_hits,
            runner.segments,
            session.clock
        );
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by an embedding frontend on the web
}
