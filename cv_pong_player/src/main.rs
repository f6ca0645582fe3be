// THEORY:
// The player binary is the visual harness around the `cv_pong` library. It owns
// everything the core deliberately knows nothing about: the command line, the
// webcam, the windows and the Ctrl-C handler.
//
// Startup mirrors the classic cvpong flow: pick a tracking token (or be asked
// for one), open the camera, optionally tune the color range with sliders, then
// play until somebody wins, Esc is pressed or the process is interrupted. The
// last frame stays on screen until a key is pressed.

mod camera;
mod configure;
mod display;

use anyhow::{Context, Result};
use camera::OpenCvCamera;
use clap::Parser;
use cv_pong::core_modules::paddle_detector::{COLOR_TOKEN, MOTION_TOKEN};
use cv_pong::{
    BoardConfig, ContourSelection, GameSession, GameState, HsvRange, PipelineConfig, TrackingMode,
};
use display::HighGuiDisplay;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cv_pong", about = "Two-player Pong driven by a webcam")]
struct Args {
    /// "color" to follow two colored objects, anything else (e.g. "move") to follow motion.
    tracking: Option<String>,
    #[arg(long, default_value_t = 0)]
    camera: i32,
    #[arg(long, default_value_t = 15.0)]
    fps: f64,
    /// Initial color range as low_h,high_h,low_s,high_s,low_v,high_v.
    #[arg(long, value_parser = parse_hsv)]
    hsv: Option<HsvRange>,
    /// Start a color game without showing the slider window.
    #[arg(long)]
    skip_configure: bool,
    /// In motion mode, follow the biggest moving region instead of the first one found.
    #[arg(long)]
    largest_contour: bool,
    #[arg(long, default_value_t = 30)]
    frame_delay_ms: u64,
}

fn parse_hsv(value: &str) -> std::result::Result<HsvRange, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<u8>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<std::result::Result<Vec<u8>, String>>()?;
    let bounds: [u8; 6] = parts
        .try_into()
        .map_err(|parts: Vec<u8>| format!("expected 6 values, got {}", parts.len()))?;
    HsvRange::from_array(bounds).map_err(|e| e.to_string())
}

fn prompt_for_tracking() -> Result<String> {
    println!("Pick your method for motion tracking. Enter \"{MOTION_TOKEN}\" or \"{COLOR_TOKEN}\" to play.");
    print!("tracking: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // --- 1. Argument Parsing ---
    let args = Args::parse();
    let token = match args.tracking {
        Some(token) => token,
        None => prompt_for_tracking()?,
    };
    let mode = TrackingMode::from_token(&token);
    info!(requested = %token, mode = mode.token(), "initializing game");

    // --- 2. Camera ---
    let mut camera = match OpenCvCamera::open(args.camera, args.fps) {
        Ok(camera) => camera,
        Err(err) => {
            error!(error = %err, "no camera has been detected, please connect one to play");
            return Err(err.into());
        }
    };

    // --- 3. Color Range ---
    let board = BoardConfig::default();
    let mut hsv = args.hsv.unwrap_or_default();
    if mode == TrackingMode::Color && !args.skip_configure {
        hsv = configure::tune_hsv(&mut camera, hsv, &board).context("color configuration failed")?;
    }

    // --- 4. Session ---
    let config = PipelineConfig {
        board,
        tracking_mode: mode,
        hsv,
        contour_selection: if args.largest_contour {
            ContourSelection::Largest
        } else {
            ContourSelection::LastReported
        },
        frame_delay: Duration::from_millis(args.frame_delay_ms),
    };
    let mut session = GameSession::new(config, &mut camera).context("could not start the game")?;
    let mut window = HighGuiDisplay::open()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            let _ = shutdown_tx.send(true);
        }
    });

    let summary = session.run(&mut camera, &mut window, shutdown_rx).await?;

    // --- 5. Wrap Up ---
    match summary.state {
        GameState::GameOver { winner } => {
            info!(player = winner.player_number(), ticks = summary.ticks, "winner decided");
            window.hold()?;
        }
        GameState::Playing => {
            info!(
                left = summary.score.left,
                right = summary.score.right,
                "game stopped before a winner"
            );
        }
    }
    window.close()?;
    Ok(())
}
