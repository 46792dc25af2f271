//! Headless level runner: loads a level, steps the simulation and prints the
//! final frame snapshot as JSON.
//!
//! Usage: cargo run --release --bin simulate_level -- --level <FILE> [OPTIONS]
//!
//! Options:
//!   --level <FILE>      Level description file (required)
//!   --config <FILE>     Scene configuration JSON
//!   --seed <N>          Root random seed (overrides the config)
//!   --ticks <N>         Number of ticks to run (default: 600)
//!   --dt <SECONDS>      Tick length (default: 1/60)
//!   --no-asset-check    Accept asset names without checking the content tree

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use unbound::core::Camera;
use unbound::level::{AssetLoader, DirectoryAssets, MemoryAssets};
use unbound::scene::{Scene, SceneConfig};

fn main() -> ExitCode {
    unbound::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> unbound::core::Result<()> {
    let Some(level_path) = parse_str_arg(args, "--level").map(PathBuf::from) else {
        return Err(unbound::core::Error::InvalidConfig(
            "usage: simulate_level --level <FILE> [--config <FILE>] [--seed N] [--ticks N] [--dt S] [--no-asset-check]".into(),
        ));
    };

    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => SceneConfig::load(&PathBuf::from(path))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = parse_u64_arg(args, "--seed") {
        config.seed = Some(seed);
    }
    let ticks = parse_u64_arg(args, "--ticks").unwrap_or(600);
    let dt = parse_f32_arg(args, "--dt").unwrap_or(1.0 / 60.0);

    let mut assets: Box<dyn AssetLoader> = if args.iter().any(|a| a == "--no-asset-check") {
        Box::new(MemoryAssets::new())
    } else {
        Box::new(DirectoryAssets::new(config.content.clone()))
    };

    let start = Instant::now();
    let mut scene = Scene::load(&level_path, config, assets.as_mut())?;
    log::info!("Loaded {} in {:.1?}", level_path.display(), start.elapsed());

    let level = scene.level();
    let camera = Camera::new(
        level.camera_start_position,
        level.camera_start_direction,
    );

    let start = Instant::now();
    let report_every = (ticks / 10).max(1);
    for i in 0..ticks {
        for kind in scene.tick(&camera, dt) {
            log::info!("Collected {:?} orb", kind);
        }
        if (i + 1) % report_every == 0 {
            let env = scene.environment();
            log::info!(
                "tick {}/{}: {:?} f={:.2}, rain={}, drops={}",
                i + 1,
                ticks,
                env.phase(),
                env.fraction(),
                scene.weather().is_raining(),
                scene.weather().rain().active()
            );
        }
    }
    log::info!("Ran {} ticks in {:.1?}", ticks, start.elapsed());

    let json = serde_json::to_string_pretty(&scene.snapshot())?;
    println!("{}", json);
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
