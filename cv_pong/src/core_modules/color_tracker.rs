// THEORY:
// The Color Tracker finds a hand-held object by its color alone.
//
// 1.  **Range test**: after preprocessing, each pixel is an (H, S, V) triple. A
//     pixel belongs to the object when all three channels fall inside the
//     inclusive bounds of the configured `HsvRange`. This is a pure per-pixel
//     test, so it is fast and independent of scan order.
// 2.  **Mass gate**: the mask's zeroth moment must exceed a small area threshold
//     before the detection is trusted. Isolated speckle never gets that far.
// 3.  **Centroid**: the first moments divided by the zeroth give the center of
//     the matching color, truncated to whole pixels.

use crate::core_modules::frame::{Centroid, MASK_OFF, MASK_ON, Mask, RgbFrame};
use crate::core_modules::moment::ImageMoments;
use crate::core_modules::preprocess;
use crate::error::{PongError, Result};
use image::{Luma, RgbImage};

pub const HUE_MAX: u8 = 179;
pub const SATURATION_MAX: u8 = 255;
pub const VALUE_MAX: u8 = 255;

/// Inclusive HSV acceptance window for the color tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HsvRange {
    pub low_hue: u8,
    pub high_hue: u8,
    pub low_saturation: u8,
    pub high_saturation: u8,
    pub low_value: u8,
    pub high_value: u8,
}

impl HsvRange {
    pub fn new(
        (low_hue, high_hue): (u8, u8),
        (low_saturation, high_saturation): (u8, u8),
        (low_value, high_value): (u8, u8),
    ) -> Result<Self> {
        let range = Self {
            low_hue,
            high_hue,
            low_saturation,
            high_saturation,
            low_value,
            high_value,
        };
        range.validate()?;
        Ok(range)
    }

    /// Only the hue channel can exceed its byte range; saturation and value use all of it.
    pub fn validate(&self) -> Result<()> {
        if self.low_hue > HUE_MAX || self.high_hue > HUE_MAX {
            return Err(PongError::InvalidConfig(format!(
                "hue bounds must lie in 0..={HUE_MAX}, got {}..={}",
                self.low_hue, self.high_hue
            )));
        }
        Ok(())
    }

    pub fn contains(&self, [h, s, v]: [u8; 3]) -> bool {
        (self.low_hue..=self.high_hue).contains(&h)
            && (self.low_saturation..=self.high_saturation).contains(&s)
            && (self.low_value..=self.high_value).contains(&v)
    }

    /// The six bounds in slider order: low/high hue, saturation, value.
    pub fn to_array(&self) -> [u8; 6] {
        [
            self.low_hue,
            self.high_hue,
            self.low_saturation,
            self.high_saturation,
            self.low_value,
            self.high_value,
        ]
    }

    pub fn from_array(bounds: [u8; 6]) -> Result<Self> {
        Self::new((bounds[0], bounds[1]), (bounds[2], bounds[3]), (bounds[4], bounds[5]))
    }
}

/// Binary mask of every HSV pixel inside `range`.
pub fn threshold(hsv: &RgbImage, range: &HsvRange) -> Mask {
    let mut mask = Mask::new(hsv.width(), hsv.height());
    for (src, dst) in hsv.pixels().zip(mask.pixels_mut()) {
        *dst = Luma([if range.contains(src.0) { MASK_ON } else { MASK_OFF }]);
    }
    mask
}

#[derive(Debug, Clone)]
pub struct ColorTracker {
    range: HsvRange,
    area_threshold: u64,
}

impl ColorTracker {
    pub fn new(range: HsvRange, area_threshold: u64) -> Self {
        Self {
            range,
            area_threshold,
        }
    }

    /// Mirrored RGB frame in, binary color mask out.
    pub fn build_mask(&self, frame: &RgbFrame) -> Mask {
        threshold(&preprocess::prepare_color(frame), &self.range)
    }

    pub fn locate(&self, mask: &Mask) -> Option<Centroid> {
        let moments = ImageMoments::of(mask);
        if moments.m00 > self.area_threshold {
            moments.centroid()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::settings::COLOR_AREA_THRESHOLD;
    use image::Rgb;

    fn blob_mask(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> Mask {
        let mut mask = Mask::new(width, height);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
        mask
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = HsvRange::new((10, 20), (100, 200), (50, 60)).unwrap();
        assert!(range.contains([10, 100, 50]));
        assert!(range.contains([20, 200, 60]));
        assert!(!range.contains([9, 150, 55]));
        assert!(!range.contains([15, 201, 55]));
        assert!(!range.contains([15, 150, 61]));
    }

    #[test]
    fn hue_above_179_is_rejected() {
        assert!(matches!(
            HsvRange::new((0, 180), (0, 255), (0, 255)),
            Err(PongError::InvalidConfig(_))
        ));
        assert!(HsvRange::from_array([0, 179, 0, 255, 0, 255]).is_ok());
    }

    #[test]
    fn threshold_marks_only_matching_pixels() {
        let mut hsv = RgbImage::from_pixel(4, 4, Rgb([90, 10, 10]));
        hsv.put_pixel(1, 2, Rgb([60, 200, 200]));
        let range = HsvRange::new((50, 70), (150, 255), (150, 255)).unwrap();
        let mask = threshold(&hsv, &range);
        assert_eq!(mask.get_pixel(1, 2).0[0], MASK_ON);
        assert_eq!(mask.pixels().filter(|p| p.0[0] == MASK_ON).count(), 1);
    }

    #[test]
    fn centroid_of_a_single_blob() {
        let tracker = ColorTracker::new(HsvRange::default(), COLOR_AREA_THRESHOLD);
        let mask = blob_mask(320, 480, 100, 200, 20, 30);
        // x: 100..=119 -> 109.5, y: 200..=229 -> 214.5
        assert_eq!(tracker.locate(&mask), Some(Centroid::new(109, 214)));
    }

    #[test]
    fn small_blobs_are_ignored() {
        let tracker = ColorTracker::new(HsvRange::default(), COLOR_AREA_THRESHOLD);
        // 39 pixels is not above the threshold, 40 is.
        assert_eq!(tracker.locate(&blob_mask(50, 50, 0, 0, 13, 3)), None);
        assert!(tracker.locate(&blob_mask(50, 50, 0, 0, 10, 4)).is_some());
    }

    #[test]
    fn empty_mask_is_a_miss() {
        let tracker = ColorTracker::new(HsvRange::default(), COLOR_AREA_THRESHOLD);
        assert_eq!(tracker.locate(&Mask::new(320, 480)), None);
    }

    #[test]
    fn build_mask_finds_a_colored_patch() {
        // A saturated green square on a black frame.
        let mut frame = RgbFrame::new(80, 60);
        for y in 20..40 {
            for x in 30..50 {
                frame.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let range = HsvRange::new((50, 70), (100, 255), (100, 255)).unwrap();
        let tracker = ColorTracker::new(range, COLOR_AREA_THRESHOLD);
        let mask = tracker.build_mask(&frame);
        assert_eq!(mask.get_pixel(40, 30).0[0], MASK_ON);
        assert_eq!(mask.get_pixel(5, 5).0[0], MASK_OFF);
        let centroid = tracker.locate(&mask).unwrap();
        assert!((centroid.x - 39).abs() <= 1);
        assert!((centroid.y - 29).abs() <= 1);
    }
}
