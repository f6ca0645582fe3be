// THEORY:
// Every size, speed, color and threshold the game uses lives in one immutable
// `BoardConfig`. It is built once at startup and handed explicitly to the board,
// the detector and the drawing helpers, so nothing reads ambient constants.
//
// The defaults reproduce the classic 640x480 cvpong table: a 33 pixel ball, two
// 18x120 paddles inset from the border, a first-to-seven match and a ball that
// speeds up by 1.5 pixels per tick after every point.

use crate::error::{PongError, Result};
use image::Rgb;

pub const DEFAULT_BOARD_WIDTH: u32 = 640;
pub const DEFAULT_BOARD_HEIGHT: u32 = 480;
pub const WINNING_SCORE: u32 = 7;
pub const SPEED_INCREMENT: f64 = 1.5;

/// Pixel mass (in set pixels) a color mask half must exceed to count as a detection.
/// 39 pixels is the 8-bit moment threshold of 10000 divided by the mask value 255.
pub const COLOR_AREA_THRESHOLD: u64 = 39;
pub const MOTION_SENSITIVITY: u8 = 20;
pub const MOTION_BLUR_SIZE: u32 = 10;

/// Immutable table configuration shared by the trackers and the physics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub border_width: i32,
    pub ball_size: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    pub winning_score: u32,
    /// Added to the speed factor after every point.
    pub speed_increment: f64,
    /// Horizontal speed of a freshly served ball.
    pub base_speed: i32,
    /// Vertical speed added when the ball leaves a paddle from an outer third.
    pub angled_speed: i32,
    pub ball_color: Rgb<u8>,
    pub left_paddle_color: Rgb<u8>,
    pub right_paddle_color: Rgb<u8>,
    pub caption_color: Rgb<u8>,
    pub crosshair_radius: i32,
    pub crosshair_arm: i32,
    pub crosshair_thickness: i32,
    pub color_area_threshold: u64,
    pub motion_sensitivity: u8,
    pub motion_blur_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            border_width: 3,
            ball_size: 33,
            paddle_width: 18,
            paddle_height: 120,
            winning_score: WINNING_SCORE,
            speed_increment: SPEED_INCREMENT,
            base_speed: 11,
            angled_speed: 11,
            ball_color: Rgb([0, 204, 0]),
            left_paddle_color: Rgb([255, 0, 0]),
            right_paddle_color: Rgb([0, 0, 255]),
            caption_color: Rgb([255, 0, 255]),
            crosshair_radius: 10,
            crosshair_arm: 15,
            crosshair_thickness: 2,
            color_area_threshold: COLOR_AREA_THRESHOLD,
            motion_sensitivity: MOTION_SENSITIVITY,
            motion_blur_size: MOTION_BLUR_SIZE,
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height of one deflection zone on a paddle face.
    pub fn paddle_third(&self) -> i32 {
        self.paddle_height / 3
    }

    /// X of the left paddle's left edge.
    pub fn left_paddle_x(&self) -> i32 {
        self.border_width * 2
    }

    /// X of the right paddle's left edge.
    pub fn right_paddle_x(&self) -> i32 {
        self.width as i32 - self.paddle_width - self.border_width * 2 - 1
    }

    /// Top-left corner of a ball sitting in the middle of the table.
    pub fn ball_home(&self) -> (i32, i32) {
        (
            self.width as i32 / 2 - self.ball_size / 2,
            self.height as i32 / 2 - self.ball_size / 2,
        )
    }

    /// Vertical position that centers a paddle on the table.
    pub fn paddle_home(&self) -> i32 {
        self.height as i32 / 2 - self.paddle_height / 2
    }

    /// Keeps a paddle fully inside the play area, leaving a one pixel margin.
    pub fn clamp_paddle_y(&self, y: i32) -> i32 {
        let floor = self.height as i32 - self.paddle_height - 1;
        if y <= 1 {
            1
        } else if y + self.paddle_height >= self.height as i32 - 1 {
            floor
        } else {
            y
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PongError::InvalidConfig("board must have a non-zero size".into()));
        }
        if self.ball_size <= 0 || self.paddle_width <= 0 || self.paddle_height < 3 {
            return Err(PongError::InvalidConfig(
                "ball and paddles need positive sizes; paddles at least 3 pixels tall".into(),
            ));
        }
        if self.paddle_height + 2 >= self.height as i32 {
            return Err(PongError::InvalidConfig(format!(
                "paddle height {} does not fit a board {} pixels tall",
                self.paddle_height, self.height
            )));
        }
        if self.right_paddle_x() <= self.left_paddle_x() + self.paddle_width + self.ball_size {
            return Err(PongError::InvalidConfig(format!(
                "board width {} leaves no room between the paddles",
                self.width
            )));
        }
        if self.winning_score == 0 {
            return Err(PongError::InvalidConfig("winning score must be at least 1".into()));
        }
        if self.speed_increment < 0.0 {
            return Err(PongError::InvalidConfig("speed increment cannot be negative".into()));
        }
        if self.motion_blur_size == 0 {
            return Err(PongError::InvalidConfig("motion blur size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_classic_table() {
        let config = BoardConfig::new();
        assert_eq!(config.left_paddle_x(), 6);
        assert_eq!(config.right_paddle_x(), 615);
        assert_eq!(config.ball_home(), (304, 224));
        assert_eq!(config.paddle_home(), 180);
        assert_eq!(config.paddle_third(), 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn clamp_paddle_keeps_one_pixel_margin() {
        let config = BoardConfig::new();
        assert_eq!(config.clamp_paddle_y(-50), 1);
        assert_eq!(config.clamp_paddle_y(1), 1);
        assert_eq!(config.clamp_paddle_y(2), 2);
        assert_eq!(config.clamp_paddle_y(358), 358);
        assert_eq!(config.clamp_paddle_y(359), 359);
        assert_eq!(config.clamp_paddle_y(400), 359);
    }

    #[test]
    fn rejects_paddle_taller_than_board() {
        let config = BoardConfig {
            height: 100,
            ..BoardConfig::default()
        };
        assert!(matches!(config.validate(), Err(PongError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_winning_score() {
        let config = BoardConfig {
            winning_score: 0,
            ..BoardConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
