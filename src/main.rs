//! Danmaku headless host
//!
//! Runs one pattern against a stationary player hitbox and reports hits.
//! Rendering hosts drive the same `PatternManager` API.

use anyhow::{Context, Result, bail};
use clap::Parser;
use danmaku::SimConfig;
use danmaku::sim::PatternManager;

/// Run a bullet pattern for a number of frames and report player hits.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct HostArgs {
    /// JSON configuration file; defaults are used when omitted or unreadable.
    #[arg(value_name = "CONFIG")]
    config_path: Option<String>,
    /// Pattern to run by name (static, spiral, ripple, saucer, rings, flower, mercury).
    #[arg(short, long, value_name = "NAME")]
    pattern: Option<String>,
    /// Frames to simulate; overrides `demo_ticks` from the configuration.
    #[arg(short, long, value_name = "FRAMES")]
    ticks: Option<u32>,
    /// RNG seed; overrides the configured seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Print the final frame as JSON.
    #[arg(long)]
    snapshot: bool,
}

impl HostArgs {
    fn load_config(&self) -> SimConfig {
        let mut config = match &self.config_path {
            Some(path) => SimConfig::load(path).unwrap_or_else(|e| {
                log::error!("{}; using defaults", e);
                SimConfig::default()
            }),
            None => SimConfig::default(),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Danmaku (headless) starting...");

    let args = HostArgs::parse();
    let config = args.load_config();

    let seed = config.resolve_seed();
    let mut manager = PatternManager::with_default_roster(&config, seed);
    match &args.pattern {
        Some(name) => {
            if manager.select_by_name(name).is_none() {
                bail!("unknown pattern {name:?}");
            }
        }
        None => {
            if !manager.select(config.active_pattern) {
                bail!("no pattern at index {}", config.active_pattern);
            }
        }
    }

    let ticks = args.ticks.unwrap_or(config.demo_ticks);
    let mut hit_frames = 0u32;
    let mut first_hit = None;
    let mut peak_bullets = 0usize;
    for frame in 0..ticks {
        manager.tick();
        if manager.query_collision(&config.player) {
            hit_frames += 1;
            first_hit.get_or_insert(frame);
        }
        peak_bullets = peak_bullets.max(manager.live_bullet_count());
        if frame % 60 == 59 {
            log::debug!(
                "Frame {}: {} bullets, {} hit frames so far",
                frame + 1,
                manager.live_bullet_count(),
                hit_frames
            );
        }
    }

    log::info!(
        "Ran {} ticks (seed {}): peak {} bullets, {} hit frames",
        ticks,
        manager.seed(),
        peak_bullets,
        hit_frames
    );
    match first_hit {
        Some(frame) => println!("Player hit on {hit_frames} of {ticks} frames, first at frame {frame}"),
        None => println!("Player untouched for {ticks} frames ({peak_bullets} bullets at peak)"),
    }

    if args.snapshot {
        let json = serde_json::to_string_pretty(&manager.snapshot()).context("serializing snapshot")?;
        println!("{json}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = HostArgs::try_parse_from([
            "danmaku", "cfg.json", "--pattern", "flower", "--ticks", "90", "--snapshot",
        ])
        .unwrap();
        assert_eq!(args.config_path.as_deref(), Some("cfg.json"));
        assert_eq!(args.pattern.as_deref(), Some("flower"));
        assert_eq!(args.ticks, Some(90));
        assert_eq!(args.seed, None);
        assert!(args.snapshot);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(HostArgs::try_parse_from(["danmaku", "--ticks", "many"]).is_err());
        assert!(HostArgs::try_parse_from(["danmaku", "--pattern"]).is_err());
        assert!(HostArgs::try_parse_from(["danmaku", "--fast"]).is_err());
    }

    #[test]
    fn test_seed_flag_overrides_config() {
        let args = HostArgs::try_parse_from(["danmaku", "-p", "rings", "--seed", "42"]).unwrap();
        let config = args.load_config();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.resolve_seed(), 42);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let args = HostArgs::try_parse_from(["danmaku", "/nonexistent/danmaku.json"]).unwrap();
        assert_eq!(args.load_config(), SimConfig::default());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        HostArgs::command().debug_assert();
    }
}
