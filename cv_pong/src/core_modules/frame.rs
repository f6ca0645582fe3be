// THEORY:
// The `frame` module defines the small vocabulary every other stage speaks.
// Frames are plain `image` buffers: three-channel RGB for camera frames and the
// rendered board, single-channel luma for masks and grayscale. A `Centroid` is
// the one point a tracker hands back for a half-frame, and `Side` names the two
// halves of the table (and the two players) everywhere.

use image::{GrayImage, Rgb, RgbImage};

/// A color camera frame or rendered board, RGB channel order.
pub type RgbFrame = RgbImage;
/// A binary mask or grayscale frame. Mask pixels are either 0 or 255.
pub type Mask = GrayImage;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// The representative point of a detected region, in the coordinates of the
/// image it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centroid {
    pub x: i32,
    pub y: i32,
}

impl Centroid {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Moves the centroid horizontally, used to place a right-half detection
    /// back into full-frame coordinates.
    pub fn offset_x(self, dx: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

/// Left or right half of the frame, and the player that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 1-based player number as shown on screen.
    pub fn player_number(self) -> u8 {
        match self {
            Side::Left => 1,
            Side::Right => 2,
        }
    }
}

/// A crosshair color per side, matching the paddle it drives.
pub fn side_color(side: Side, left: Rgb<u8>, right: Rgb<u8>) -> Rgb<u8> {
    match side {
        Side::Left => left,
        Side::Right => right,
    }
}

/// Converts a 0/255 mask into a vector of booleans, row-major.
pub fn mask_to_bits(mask: &Mask) -> Vec<bool> {
    mask.as_raw().iter().map(|&v| v != MASK_OFF).collect()
}
