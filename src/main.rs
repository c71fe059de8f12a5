use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use touch_boxes::config::Config;
use touch_boxes::interaction::StatusColor;
use touch_boxes::replay;
use touch_boxes::session::Session;

#[derive(Parser, Debug)]
#[command(name = "touch-boxes", about = "Replay sensor ticks through the box touching game")]
struct Cli {
    /// 設定ファイル
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON Lines のティック列（省略時は組み込みデモ）
    #[arg(long)]
    frames: Option<PathBuf>,

    /// 案内文の変化をログに出さない
    #[arg(long)]
    quiet_cues: bool,

    /// 組み込みデモを JSON Lines で書き出して終了
    #[arg(long)]
    dump_demo: Option<PathBuf>,

    #[arg(long)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("touch-boxes {}", env!("GIT_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touch_boxes=info".into()),
        )
        .init();

    if let Some(path) = &cli.dump_demo {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let ticks = replay::demo_script();
        replay::write_ticks(BufWriter::new(file), &ticks)?;
        println!("wrote {} ticks to {}", ticks.len(), path.display());
        return Ok(());
    }

    let config = Config::load_or_default(&cli.config);
    let ticks = replay::load_or_demo(cli.frames.as_deref())?;
    match &cli.frames {
        Some(path) => info!("replaying {} ticks from {}", ticks.len(), path.display()),
        None => info!("replaying built-in demo ({} ticks)", ticks.len()),
    }

    let mut session = Session::new(config);
    session.set_log_cues(!cli.quiet_cues);

    let tracked_ticks = ticks.iter().filter(|t| t.primary().is_some()).count();
    let mut green_ticks = 0u64;
    let mut toggles = 0u32;
    let mut first_goal_ms = None;
    for tick in &ticks {
        let output = session.process(tick);
        if output.status == Some(StatusColor::Green) {
            green_ticks += 1;
        }
        if output.outcome.is_some_and(|o| o.toggled) {
            toggles += 1;
        }
        if output.goal_reached && first_goal_ms.is_none() {
            first_goal_ms = Some(tick.timestamp_ms);
        }
    }

    let state = session.state();
    println!("=== Summary ===");
    println!("ticks:        {}", session.ticks());
    println!("tracked:      {}", tracked_ticks);
    println!("green ticks:  {}", green_ticks);
    println!("toggles:      {}", toggles);
    println!(
        "counter:      {} / {}",
        state.objective_counter,
        session.config().selector.goal
    );
    println!("selected:     {}", state.selected);
    match first_goal_ms {
        Some(ms) => println!("goal reached: yes (at {} ms)", ms),
        None => println!("goal reached: no"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_starts_with_package_version() {
        assert!(env!("GIT_VERSION").starts_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["touch-boxes"]);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert!(cli.frames.is_none());
        assert!(!cli.quiet_cues);
    }
}
