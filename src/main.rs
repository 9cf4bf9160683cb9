//! Invaders headless runner
//!
//! Plays a session on the headless platform and prints the final counters.

use std::path::PathBuf;

use clap::Parser;

use invaders::Tuning;
use invaders::platform::{HeadlessPlatform, InputScript, RandomPilot};

#[derive(Parser, Debug)]
#[command(name = "invaders")]
#[command(about = "Run an invaders session headless and report the outcome")]
struct Cli {
    /// Gameplay RNG seed, decimal or 0x-prefixed hex (overrides the config)
    #[arg(long, value_parser = parse_seed)]
    seed: Option<i32>,
    /// Frames to simulate before stopping
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// JSON tuning file; unspecified fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drive the ship with a random pilot seeded with this value
    #[arg(long)]
    input_seed: Option<u64>,
    /// Print the summary as JSON
    #[arg(long)]
    summary_json: bool,
    /// Print the effective tuning as JSON and exit
    #[arg(long)]
    print_tuning: bool,
}

fn parse_seed(raw: &str) -> Result<i32, String> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16)
            .map(|v| v as i32)
            .map_err(|e| format!("invalid hex seed {raw:?}: {e}")),
        None => raw
            .parse::<i32>()
            .map_err(|e| format!("invalid seed {raw:?}: {e}")),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut tuning = match &cli.config {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(seed) = cli.seed {
        tuning.seed = seed;
    }

    if cli.print_tuning {
        println!("{}", tuning.to_json()?);
        return Ok(());
    }

    let script = match cli.input_seed {
        Some(seed) => InputScript::Random(RandomPilot::new(seed)),
        None => InputScript::Idle,
    };
    let mut platform = HeadlessPlatform::new().with_script(script);

    log::info!("Invaders (headless) starting, {} frames", cli.frames);
    let stats = invaders::run(&mut platform, &tuning, Some(cli.frames))?;

    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("frames:             {}", stats.frames);
        println!("shots fired:        {}", stats.shots_fired);
        println!("invaders destroyed: {}", stats.invaders_destroyed);
        if stats.dropped_events > 0 {
            println!("dropped events:     {}", stats.dropped_events);
        }
    }
    Ok(())
}
