// THEORY:
// The `pipeline` module is the top-level API of the game. It wires the paddle
// detector to the physics engine and drives them from any frame source into any
// display, so the core never has to know about cameras or windows.
//
// Key architectural principles:
// 1.  **Seams as Traits**: frames come in through `FrameSource` and finished
//     boards go out through `DisplaySink`. The player binary implements both on
//     top of a camera and a window; tests implement them over plain vectors.
// 2.  **Synchronous Tick**: one tick is detection followed by physics, with no
//     awaiting in between. The async `run` loop only paces ticks and listens for
//     a shutdown request.
// 3.  **Skip, Don't Stop**: a bad frame (empty, or a motion pair of two sizes)
//     costs one tick and nothing else. Losing the source ends the session
//     cleanly; anything else is returned to the caller.

use crate::core_modules::color_tracker::HsvRange;
use crate::core_modules::frame::RgbFrame;
use crate::core_modules::game_board::{GameBoard, GameState, RenderedFrame, Score};
use crate::core_modules::motion_tracker::ContourSelection;
use crate::core_modules::paddle_detector::{PaddleDetector, TrackingMode, TrackingStrategy};
use crate::core_modules::preprocess;
use crate::core_modules::settings::BoardConfig;
use crate::error::{PongError, Result};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Default pause between ticks.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(30);

/// Anything that can hand out camera frames in RGB channel order.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<RgbFrame>;
}

/// What the display wants the session to do after a frame was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Quit,
}

/// Anything that can show a rendered board, caption included.
pub trait DisplaySink {
    fn present(&mut self, frame: &RenderedFrame) -> Result<SinkControl>;
}

/// Configuration for a `GameSession`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub board: BoardConfig,
    pub tracking_mode: TrackingMode,
    /// Only consulted in color mode.
    pub hsv: HsvRange,
    /// Only consulted in motion mode.
    pub contour_selection: ContourSelection,
    pub frame_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            tracking_mode: TrackingMode::default(),
            hsv: HsvRange::default(),
            contour_selection: ContourSelection::default(),
            frame_delay: DEFAULT_FRAME_DELAY,
        }
    }
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub ticks: u64,
    pub score: Score,
    pub state: GameState,
}

pub struct GameSession {
    detector: PaddleDetector,
    board: GameBoard,
    frame_delay: Duration,
    ticks: u64,
}

impl GameSession {
    /// Validates `config` and makes sure `source` can deliver a frame before any
    /// game state exists.
    pub fn new<S: FrameSource + ?Sized>(config: PipelineConfig, source: &mut S) -> Result<Self> {
        config.board.validate()?;
        if config.tracking_mode == TrackingMode::Color {
            config.hsv.validate()?;
        }

        let probe = source.next_frame()?;
        preprocess::validate(&probe)?;
        info!(
            mode = config.tracking_mode.token(),
            width = probe.width(),
            height = probe.height(),
            "frame source ready"
        );

        let strategy = TrackingStrategy::new(
            config.tracking_mode,
            config.hsv,
            config.contour_selection,
            &config.board,
        );
        Ok(Self {
            detector: PaddleDetector::new(strategy, config.board.clone()),
            board: GameBoard::new(config.board),
            frame_delay: config.frame_delay,
            ticks: 0,
        })
    }

    pub fn board(&self) -> &GameBoard {
        &self.board
    }

    pub fn detector(&self) -> &PaddleDetector {
        &self.detector
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            ticks: self.ticks,
            score: self.board.score(),
            state: self.board.state(),
        }
    }

    /// Runs one detection pass and one physics step.
    ///
    /// Returns `Ok(None)` when the frames of this tick were unusable; the paddles
    /// keep their previous targets and the ball does not move.
    pub fn tick<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<Option<RenderedFrame>> {
        let background = match self.detector.process_frame(source) {
            Ok(frame) => frame,
            Err(err) if err.is_skippable() => {
                warn!(error = %err, "skipping tick");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        self.ticks += 1;
        let rendered = self.board.play(
            background,
            self.detector.left_paddle(),
            self.detector.right_paddle(),
        );
        debug!(tick = self.ticks, caption = %rendered.caption.text, "tick rendered");
        Ok(Some(rendered))
    }

    /// Plays until the game is won, the sink asks to quit, `shutdown` turns
    /// true (or its sender is dropped), or the source runs dry.
    pub async fn run<S, D>(
        &mut self,
        source: &mut S,
        sink: &mut D,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary>
    where
        S: FrameSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        while self.board.is_playing() && !*shutdown.borrow() {
            match self.tick(source) {
                Ok(Some(frame)) => {
                    if sink.present(&frame)? == SinkControl::Quit {
                        info!("display asked to quit");
                        break;
                    }
                }
                Ok(None) => {}
                Err(PongError::Acquisition(reason)) => {
                    warn!(%reason, "frame source ended");
                    break;
                }
                Err(err) => return Err(err),
            }

            if !self.board.is_playing() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.frame_delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("shutdown requested");
                        break;
                    }
                }
            }
        }

        let summary = self.summary();
        info!(
            ticks = summary.ticks,
            left = summary.score.left,
            right = summary.score.right,
            state = ?summary.state,
            "session finished"
        );
        Ok(summary)
    }
}
