// THEORY:
// Minimal raster primitives for the board and the operator overlay. Everything
// is clipped against the image, so callers can pass shapes that hang off an
// edge (a ball mid-bounce, a crosshair on the frame border) without checks.

use image::{Rgb, RgbImage};

/// Fills the rectangle with top-left `(x, y)` and the given size.
pub fn fill_rect(image: &mut RgbImage, x: i32, y: i32, width: i32, height: i32, color: Rgb<u8>) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + width).min(w);
    let y1 = (y + height).min(h);
    for py in y0..y1 {
        for px in x0..x1 {
            image.put_pixel(px as u32, py as u32, color);
        }
    }
}

/// Horizontal segment from `x0` to `x1` inclusive, `thickness` rows centered on `y`.
pub fn hline(image: &mut RgbImage, x0: i32, x1: i32, y: i32, thickness: i32, color: Rgb<u8>) {
    let (lo, hi) = (x0.min(x1), x0.max(x1));
    let t = thickness.max(1);
    fill_rect(image, lo, y - t / 2, hi - lo + 1, t, color);
}

/// Vertical segment from `y0` to `y1` inclusive, `thickness` columns centered on `x`.
pub fn vline(image: &mut RgbImage, x: i32, y0: i32, y1: i32, thickness: i32, color: Rgb<u8>) {
    let (lo, hi) = (y0.min(y1), y0.max(y1));
    let t = thickness.max(1);
    fill_rect(image, x - t / 2, lo, t, hi - lo + 1, color);
}

/// Ring of the given radius; pixels whose distance from the center lies within
/// half the thickness of the radius are painted.
pub fn circle(image: &mut RgbImage, cx: i32, cy: i32, radius: i32, thickness: i32, color: Rgb<u8>) {
    let (w, h) = (image.width() as i32, image.height() as i32);
    let half = thickness.max(1) as f64 / 2.0;
    let inner = (radius as f64 - half).max(0.0);
    let outer = radius as f64 + half;
    let reach = outer.ceil() as i32;

    for dy in -reach..=reach {
        let py = cy + dy;
        if py < 0 || py >= h {
            continue;
        }
        for dx in -reach..=reach {
            let px = cx + dx;
            if px < 0 || px >= w {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            if dist >= inner && dist <= outer {
                image.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

/// Circle plus a vertical and a horizontal arm through its center.
pub fn crosshair(
    image: &mut RgbImage,
    cx: i32,
    cy: i32,
    radius: i32,
    arm: i32,
    thickness: i32,
    color: Rgb<u8>,
) {
    circle(image, cx, cy, radius, thickness, color);
    vline(image, cx, cy - arm, cy + arm, thickness, color);
    hline(image, cx - arm, cx + arm, cy, thickness, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn fill_rect_clips_to_image() {
        let mut img = RgbImage::new(10, 10);
        fill_rect(&mut img, -5, 8, 8, 8, RED);
        let painted = img.pixels().filter(|p| **p == RED).count();
        // Columns 0..3, rows 8..10.
        assert_eq!(painted, 3 * 2);
        assert_eq!(*img.get_pixel(0, 9), RED);
        assert_eq!(*img.get_pixel(3, 9), BLACK);
    }

    #[test]
    fn crosshair_marks_center_arms_and_ring() {
        let mut img = RgbImage::new(64, 64);
        crosshair(&mut img, 32, 32, 10, 15, 2, RED);
        assert_eq!(*img.get_pixel(32, 32), RED);
        assert_eq!(*img.get_pixel(32, 17), RED);
        assert_eq!(*img.get_pixel(47, 32), RED);
        assert_eq!(*img.get_pixel(42, 32), RED);
        // Off-arm point inside the ring stays untouched.
        assert_eq!(*img.get_pixel(36, 36), BLACK);
        // Beyond the arms.
        assert_eq!(*img.get_pixel(32, 50), BLACK);
    }

    #[test]
    fn crosshair_off_the_edge_does_not_panic() {
        let mut img = RgbImage::new(8, 8);
        crosshair(&mut img, -3, 100, 10, 15, 2, RED);
        crosshair(&mut img, 0, 0, 10, 15, 2, RED);
        assert_eq!(*img.get_pixel(0, 0), RED);
    }
}
