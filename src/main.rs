//! Flap Sim headless runner
//!
//! `flap-sim [config.json] [seconds]`
//!
//! Drives the simulation with a simple autopilot through the fixed-step
//! driver, logs the event stream and keeps the best score in
//! `flap_sim_best.json`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use flap_sim::GameConfig;
    use flap_sim::persistence::{BestScoreStore, JsonFileStore};
    use flap_sim::platform::init_logging;
    use flap_sim::sim::{FixedStep, GameEvent, GamePhase, GameState, TickInput, tick};

    /// Host frame rate the runner pretends to render at
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_SECONDS: f32 = 60.0;
    const BEST_SCORE_FILE: &str = "flap_sim_best.json";

    /// Flap when the bird sinks below the next gap, restart when allowed
    fn autopilot<S: BestScoreStore>(state: &GameState<S>) -> TickInput {
        let bird = &state.registry.bird;
        let activate = match state.phase {
            GamePhase::Ready => true,
            GamePhase::GameOver => bird.is_settled(),
            GamePhase::Restarting => false,
            GamePhase::Playing => {
                let target = state
                    .registry
                    .obstacles()
                    .iter()
                    .filter(|o| o.x + o.width / 2.0 + bird.radius >= bird.pos.x)
                    .min_by(|a, b| a.x.total_cmp(&b.x))
                    .map(|o| o.gap_center - o.gap_height / 4.0)
                    .unwrap_or(state.config.center_y());
                bird.pos.y < target && bird.vel.y <= 0.0
            }
        };
        TickInput { activate }
    }

    pub fn run() {
        init_logging();

        let mut args = std::env::args().skip(1);
        let config = match args.next() {
            Some(path) => match GameConfig::load(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Config {}: {}", path, e);
                    std::process::exit(2);
                }
            },
            None => GameConfig::default(),
        };
        let seconds = args
            .next()
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(DEFAULT_SECONDS);

        let store = JsonFileStore::new(BEST_SCORE_FILE);
        let mut state = match GameState::new(config, store) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Invalid config: {}", e);
                std::process::exit(2);
            }
        };

        let mut stepper = FixedStep::default();
        let frames = (seconds / FRAME_DT).round() as u64;
        let mut runs = 1u32;
        let mut best_run = 0u64;

        for _ in 0..frames {
            for _ in 0..stepper.advance(FRAME_DT) {
                let input = autopilot(&state);
                tick(&mut state, &input, stepper.step());
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::EntityMoved { .. } => log::trace!("{:?}", event),
                    GameEvent::ScoreChanged { score, .. } => {
                        best_run = best_run.max(score);
                        log::debug!("{:?}", event);
                    }
                    GameEvent::RunStateChanged(GamePhase::Restarting) => {
                        runs += 1;
                        log::info!("Run {}", runs);
                    }
                    _ if event.is_audio() => log::debug!("Audio: {:?}", event),
                    _ => log::debug!("{:?}", event),
                }
            }
        }

        println!(
            "simulated {:.0}s in {} run(s): best run {}, best ever {}, items this run {}",
            seconds,
            runs,
            best_run,
            state.scores.best_score(),
            state.scores.item_score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds start from `platform::wasm_start`
}
