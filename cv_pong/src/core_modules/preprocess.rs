// THEORY:
// The Frame Preprocessor normalizes raw camera frames before either tracker sees
// them.
//
// 1.  **Mirror**: frames are flipped horizontally, in place, exactly once. A
//     player standing on the right of the camera then shows up on the right half
//     of the screen, which is the half that drives the right paddle.
// 2.  **Color path**: the mirrored frame is converted to 8-bit HSV (hue halved
//     into 0..=179 so it fits a byte) and smoothed twice with a 7x7 Gaussian of
//     sigma 2. Two passes knock sensor speckle down far enough that a plain
//     per-pixel range test produces a clean mask.
// 3.  **Motion path**: the mirrored frame is reduced to luma. Differencing and
//     smoothing happen in the motion tracker itself.

use crate::core_modules::frame::{Mask, RgbFrame};
use crate::error::{PongError, Result};
use image::{Luma, Rgb, RgbImage, imageops};

const GAUSSIAN_RADIUS: i32 = 3;
const GAUSSIAN_SIGMA: f32 = 2.0;
const SMOOTHING_PASSES: usize = 2;

const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// Rejects frames the trackers cannot split or scan.
pub fn validate(frame: &RgbFrame) -> Result<()> {
    if frame.width() == 0 || frame.height() == 0 {
        return Err(PongError::EmptyFrame);
    }
    Ok(())
}

/// Horizontal flip in place.
pub fn mirror(frame: &mut RgbFrame) {
    imageops::flip_horizontal_in_place(frame);
}

/// BT.601 luma (0.299 R + 0.587 G + 0.114 B) in 14-bit fixed point, rounded.
pub fn to_gray(frame: &RgbFrame) -> Mask {
    let mut gray = Mask::new(frame.width(), frame.height());
    for (src, dst) in frame.pixels().zip(gray.pixels_mut()) {
        let [r, g, b] = src.0.map(u32::from);
        let luma = (r * LUMA_R + g * LUMA_G + b * LUMA_B + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        *dst = Luma([luma as u8]);
    }
    gray
}

/// Converts one RGB pixel to 8-bit HSV: hue in 0..=179, saturation and value in 0..=255.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = max - min;

    let saturation = if max > 0.0 { 255.0 * chroma / max } else { 0.0 };

    let mut hue = if chroma == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / chroma
    } else if max == g {
        120.0 + 60.0 * (b - r) / chroma
    } else {
        240.0 + 60.0 * (r - g) / chroma
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let mut h = (hue / 2.0).round() as u32;
    if h >= 180 {
        h -= 180;
    }
    [h as u8, saturation.round() as u8, max as u8]
}

/// Per-pixel HSV conversion of a whole frame. The result reuses the three
/// channel layout of `RgbImage` with H, S, V in place of R, G, B.
pub fn to_hsv(frame: &RgbFrame) -> RgbImage {
    let mut hsv = RgbImage::new(frame.width(), frame.height());
    for (src, dst) in frame.pixels().zip(hsv.pixels_mut()) {
        *dst = Rgb(rgb_to_hsv(src.0));
    }
    hsv
}

/// Mirrors an out-of-range index back into `0..len` without repeating the edge
/// sample (`gfedcb|abcdefgh|gfedcba`).
pub fn reflect_101(index: i32, len: i32) -> usize {
    if len <= 1 {
        return 0;
    }
    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * len - 2 - i;
        }
    }
    i as usize
}

fn gaussian_kernel() -> Vec<f32> {
    let weights: Vec<f32> = (-GAUSSIAN_RADIUS..=GAUSSIAN_RADIUS)
        .map(|i| (-((i * i) as f32) / (2.0 * GAUSSIAN_SIGMA * GAUSSIAN_SIGMA)).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// One separable 7x7 Gaussian pass over all three channels.
pub fn smooth(image: &RgbImage) -> RgbImage {
    let (w, h) = (image.width() as i32, image.height() as i32);
    if w == 0 || h == 0 {
        return image.clone();
    }
    let kernel = gaussian_kernel();

    // --- Horizontal pass into a float buffer ---
    let mut horizontal = vec![[0.0f32; 3]; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x + k as i32 - GAUSSIAN_RADIUS, w);
                let px = image.get_pixel(sx as u32, y as u32).0;
                for c in 0..3 {
                    acc[c] += weight * px[c] as f32;
                }
            }
            horizontal[(y * w + x) as usize] = acc;
        }
    }

    // --- Vertical pass, rounding back to bytes ---
    let mut out = RgbImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y + k as i32 - GAUSSIAN_RADIUS, h);
                let px = horizontal[sy * w as usize + x as usize];
                for c in 0..3 {
                    acc[c] += weight * px[c];
                }
            }
            out.put_pixel(
                x as u32,
                y as u32,
                Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8)),
            );
        }
    }
    out
}

/// Full color-path normalization of an already mirrored frame.
pub fn prepare_color(frame: &RgbFrame) -> RgbImage {
    let mut hsv = to_hsv(frame);
    for _ in 0..SMOOTHING_PASSES {
        hsv = smooth(&hsv);
    }
    hsv
}
