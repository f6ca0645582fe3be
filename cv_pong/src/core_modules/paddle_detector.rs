// THEORY:
// The Paddle Detector is the bridge between the trackers and the game. It owns
// the tracking strategy chosen at startup and the two paddle targets the
// strategy produces.
//
// Key architectural principles:
// 1.  **Closed Strategy**: color and motion tracking are the only two ways to
//     drive a paddle, so the strategy is an enum fixed for the whole session.
// 2.  **Split Frame**: the mask is cut into a left half `[0, w/2)` and a right
//     half `[w/2, w)`. Each half is searched independently and drives its own
//     paddle, so two players can stand side by side in front of one camera.
// 3.  **Hold on Miss**: a half with no trusted detection leaves its paddle where
//     it was. Losing the object for a frame must not snap the paddle away.
// 4.  **Operator Feedback**: each hit is marked with a crosshair on the frame
//     that becomes the game background. The annotated frame is handed back by
//     value and is owned by the caller from then on.

use crate::core_modules::color_tracker::{ColorTracker, HsvRange};
use crate::core_modules::draw;
use crate::core_modules::frame::{Centroid, Mask, RgbFrame, Side, side_color};
use crate::core_modules::motion_tracker::{ContourSelection, MotionTracker};
use crate::core_modules::preprocess;
use crate::core_modules::settings::BoardConfig;
use crate::error::Result;
use crate::pipeline::FrameSource;
use image::imageops;
use tracing::debug;

pub const COLOR_TOKEN: &str = "color";
pub const MOTION_TOKEN: &str = "move";
pub const DEFAULT_PADDLE_POSITION: i32 = 0;

/// The tracking strategy requested at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingMode {
    Color,
    #[default]
    Motion,
}

impl TrackingMode {
    /// `"color"` picks color tracking; any other token falls back to motion.
    pub fn from_token(token: &str) -> Self {
        if token.trim() == COLOR_TOKEN {
            TrackingMode::Color
        } else {
            TrackingMode::Motion
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            TrackingMode::Color => COLOR_TOKEN,
            TrackingMode::Motion => MOTION_TOKEN,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TrackingStrategy {
    Color(ColorTracker),
    Motion(MotionTracker),
}

impl TrackingStrategy {
    pub fn new(
        mode: TrackingMode,
        hsv: HsvRange,
        selection: ContourSelection,
        config: &BoardConfig,
    ) -> Self {
        match mode {
            TrackingMode::Color => {
                TrackingStrategy::Color(ColorTracker::new(hsv, config.color_area_threshold))
            }
            TrackingMode::Motion => TrackingStrategy::Motion(MotionTracker::new(
                config.motion_sensitivity,
                config.motion_blur_size,
                selection,
            )),
        }
    }

    /// Detection on one half-mask.
    pub fn locate(&self, mask: &Mask) -> Option<Centroid> {
        match self {
            TrackingStrategy::Color(tracker) => tracker.locate(mask),
            TrackingStrategy::Motion(tracker) => tracker.locate(mask),
        }
    }
}

/// Cuts a mask into its left `[0, w/2)` and right `[w/2, w)` halves.
pub fn split_halves(mask: &Mask) -> (Mask, Mask) {
    let (w, h) = mask.dimensions();
    let mid = w / 2;
    let left = imageops::crop_imm(mask, 0, 0, mid, h).to_image();
    let right = imageops::crop_imm(mask, mid, 0, w - mid, h).to_image();
    (left, right)
}

/// Pulls a frame from the source and normalizes it for tracking.
fn acquire<S: FrameSource + ?Sized>(source: &mut S) -> Result<RgbFrame> {
    let mut frame = source.next_frame()?;
    preprocess::validate(&frame)?;
    preprocess::mirror(&mut frame);
    Ok(frame)
}

pub struct PaddleDetector {
    strategy: TrackingStrategy,
    config: BoardConfig,
    left_paddle_pos: i32,
    right_paddle_pos: i32,
}

impl PaddleDetector {
    pub fn new(strategy: TrackingStrategy, config: BoardConfig) -> Self {
        Self {
            strategy,
            config,
            left_paddle_pos: DEFAULT_PADDLE_POSITION,
            right_paddle_pos: DEFAULT_PADDLE_POSITION,
        }
    }

    pub fn left_paddle(&self) -> i32 {
        self.left_paddle_pos
    }

    pub fn right_paddle(&self) -> i32 {
        self.right_paddle_pos
    }

    /// Reads one (color) or two (motion) frames, updates both paddle targets and
    /// returns the mirrored, annotated frame to be used as the game background.
    pub fn process_frame<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> Result<RgbFrame> {
        let (mut frame, mask) = match &self.strategy {
            TrackingStrategy::Color(tracker) => {
                let frame = acquire(source)?;
                let mask = tracker.build_mask(&frame);
                (frame, mask)
            }
            TrackingStrategy::Motion(tracker) => {
                // The first frame of the pair is the one shown to the players.
                let frame = acquire(source)?;
                let next = acquire(source)?;
                let mask = tracker.build_mask(
                    &preprocess::to_gray(&frame),
                    &preprocess::to_gray(&next),
                )?;
                (frame, mask)
            }
        };
        self.resolve(&mask, &mut frame);
        Ok(frame)
    }

    /// Converts a row of a frame `frame_height` pixels tall into a board row.
    fn to_board_row(&self, y: i32, frame_height: u32) -> i32 {
        let board_height = self.config.height;
        if frame_height == board_height || frame_height == 0 {
            return y;
        }
        (y as i64 * board_height as i64 / frame_height as i64) as i32
    }

    /// Runs detection on both halves of a full-width mask and marks every hit on `display`.
    ///
    /// Crosshairs are drawn in frame coordinates; paddle targets are stored in
    /// board rows, so both land on the same spot once the frame is fitted to the board.
    pub fn resolve(&mut self, mask: &Mask, display: &mut RgbFrame) {
        let offset = (mask.width() / 2) as i32;
        let (left, right) = split_halves(mask);

        for (side, half, dx) in [(Side::Left, left, 0), (Side::Right, right, offset)] {
            let Some(centroid) = self.strategy.locate(&half) else {
                continue;
            };
            let target = self.to_board_row(centroid.y, mask.height());
            debug!(?side, x = centroid.x, y = centroid.y, target, "paddle target detected");
            match side {
                Side::Left => self.left_paddle_pos = target,
                Side::Right => self.right_paddle_pos = target,
            }
            self.annotate(display, side, centroid.offset_x(dx));
        }
    }

    fn annotate(&self, display: &mut RgbFrame, side: Side, at: Centroid) {
        let color = side_color(
            side,
            self.config.left_paddle_color,
            self.config.right_paddle_color,
        );
        draw::crosshair(
            display,
            at.x,
            at.y,
            self.config.crosshair_radius,
            self.config.crosshair_arm,
            self.config.crosshair_thickness,
            color,
        );
    }
}
