//! Rank Bot entry point
//!
//! Natively this runs one round headless: synthetic 60 Hz frame timestamps
//! drive the clock, an autopilot moves the pointer, and the result lands in
//! the high score table. The browser build enters through `rank_bot::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use rank_bot::consts::*;
    use rank_bot::sim::{FrameClock, ItemCode, SimConfig, Simulation};
    use rank_bot::{ConfigError, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// When the fake stall happens and how long it lasts
    const STALL_AT_MS: f64 = 10_000.0;
    const STALL_MS: f64 = 2_000.0;

    /// Play one round headless and record the result
    #[derive(Debug, Parser)]
    #[command(name = "rank-bot", version, about, long_about = None)]
    pub struct Args {
        /// Settings JSON to load the agent shape from and save the high score to
        #[arg(value_name = "SETTINGS")]
        pub settings_path: Option<PathBuf>,
        /// Seed for spawn positions and item codes
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// Stop after this much synthetic frame time
        #[arg(long, value_name = "SECONDS", default_value_t = 300.0)]
        pub seconds: f64,
    }

    /// Chase the negative item closest to the bottom, otherwise drift back
    /// to the middle
    fn autopilot(sim: &Simulation) -> f32 {
        let lowest = sim
            .items
            .iter()
            .filter(|item| item.code == ItemCode::Negative)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        match lowest {
            Some(item) => {
                let width = sim.agent.width;
                (item.pos.x - width / 2.0) / (WORLD_SIZE - width)
            }
            None => 0.5,
        }
    }

    pub fn run(args: Args) -> Result<(), ConfigError> {
        let mut settings = match &args.settings_path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let config = SimConfig::from_settings(&settings, args.seed)?;
        let mut sim = Simulation::new(&config);
        let mut clock = FrameClock::new(0.0);

        let limit_ms = args.seconds * 1000.0;
        let mut now_ms = 0.0;
        let mut stalled = false;
        while !sim.is_over() && now_ms < limit_ms {
            now_ms += FRAME_MS;
            if !stalled && now_ms >= STALL_AT_MS {
                stalled = true;
                now_ms += STALL_MS;
                log::info!("Injecting a {STALL_MS} ms stall");
            }
            sim.set_pointer(autopilot(&sim));
            let steps = clock.advance(now_ms);
            sim.advance(steps);
        }

        let snapshot = sim.snapshot();
        if !sim.is_over() {
            log::info!("Time limit reached at step {}", snapshot.step);
        }
        println!(
            "score {} | ranking {:.1} | steps {} | best {}",
            snapshot.score,
            snapshot.ranking,
            snapshot.step,
            settings.high_scores.best(snapshot.score)
        );

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = settings
            .high_scores
            .add_score(snapshot.score, snapshot.step, timestamp)
        {
            println!("New high score, rank #{rank}");
        }
        if let Some(path) = &args.settings_path {
            settings.save(path)?;
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = headless::Args::parse();
    log::info!("Rank Bot (headless) starting...");

    if let Err(e) = headless::run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is rank_bot::web::init, this is just to satisfy the compiler
}
