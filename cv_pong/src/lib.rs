// THEORY:
// This file is the main entry point for the `cv_pong` library crate.
// It exposes the `GameSession` and its seams (`FrameSource`, `DisplaySink`,
// `PipelineConfig`) as the high-level interface of the game. Everything that
// turns pixels into paddle positions and paddle positions into a bouncing ball
// lives in `core_modules` and is public for testing and tooling, but a player
// front end should only need the re-exports below.
//
// The crate never touches a camera or a window. Those belong to the
// `cv_pong_player` binary, which implements the two traits over OpenCV.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use crate::core_modules::color_tracker::HsvRange;
pub use crate::core_modules::frame::{Mask, RgbFrame, Side};
pub use crate::core_modules::game_board::{Caption, GameState, RenderedFrame, Score};
pub use crate::core_modules::motion_tracker::ContourSelection;
pub use crate::core_modules::paddle_detector::TrackingMode;
pub use crate::core_modules::settings::BoardConfig;
pub use crate::error::{PongError, Result};
pub use crate::pipeline::{
    DisplaySink, FrameSource, GameSession, PipelineConfig, SessionSummary, SinkControl,
};
