use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use touch_boxes::config::Config;
use touch_boxes::render::{Color, Key, MinifbRenderer};
use touch_boxes::replay;
use touch_boxes::session::Session;

/// 背景色（カラー映像の代わり）
const BACKGROUND: Color = Color::rgb(24, 24, 32);

#[derive(Parser, Debug)]
#[command(name = "touch-viewer", about = "Box touching game viewer")]
struct Cli {
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON Lines のティック列（省略時は組み込みデモ）
    #[arg(long)]
    frames: Option<PathBuf>,

    #[arg(long)]
    quiet_cues: bool,

    /// 最後まで再生したら先頭から繰り返す
    #[arg(long)]
    repeat: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touch_boxes=info,touch_viewer=info".into()),
        )
        .init();

    let config = Config::load_or_default(&cli.config);
    let ticks = replay::load_or_demo(cli.frames.as_deref())?;
    if ticks.is_empty() {
        info!("no ticks to replay");
        return Ok(());
    }

    let width = config.projection.width as usize;
    let height = config.projection.height as usize;
    let mut renderer = MinifbRenderer::new("Touch Boxes", width, height)?;
    let mut session = Session::new(config);
    session.set_log_cues(!cli.quiet_cues);

    info!("S: skeleton on/off, R: reset, C: capture reference, Esc: quit");

    let mut index = 0;
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while renderer.is_open() {
        if renderer.key_pressed(Key::S) {
            session.toggle_skeleton();
        }
        if renderer.key_pressed(Key::R) {
            session.reset();
        }
        if renderer.key_pressed(Key::C) && session.capture_reference() {
            debug!("reference score: {:.4}", session.reference_score());
        }

        if index < ticks.len() {
            let output = session.process(&ticks[index]);
            index += 1;

            renderer.clear(BACKGROUND);
            renderer.draw_directives(&output.directives);
        } else if cli.repeat {
            index = 0;
            session.reset();
        }
        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            debug!(
                "FPS: {:.1}, reference score: {:.4}",
                frame_count as f32 / elapsed,
                session.reference_score()
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    info!("shutting down");
    Ok(())
}
