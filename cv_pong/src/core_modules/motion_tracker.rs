// THEORY:
// The Motion Tracker finds whatever moved between two consecutive frames.
//
// 1.  **Difference**: the absolute per-pixel difference of two grayscale frames.
// 2.  **Threshold**: anything that changed by more than the sensitivity becomes
//     foreground. This isolates changed pixels but leaves a moving hand broken
//     into many fragments.
// 3.  **Box Blur**: a 10x10 mean filter smears the fragments into each other so
//     pieces of the same object form one continuous intensity region.
// 4.  **Threshold Again**: the blurred intensity is cut back to a hard binary
//     mask. Gaps are now filled and isolated single pixels have faded below the
//     cut.
// 5.  **Locate**: outer regions are extracted from the mask and one of them is
//     chosen. Its bounding box center is the detection.

use crate::core_modules::blob_detector::blob_detector;
use crate::core_modules::frame::{Centroid, MASK_OFF, MASK_ON, Mask};
use crate::core_modules::preprocess::reflect_101;
use crate::core_modules::smart_blob::SmartBlob;
use crate::error::{PongError, Result};
use image::Luma;

/// Which outer region drives the paddle when several moved at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContourSelection {
    /// The last region in reporting order, i.e. the first one met in a raster scan.
    #[default]
    LastReported,
    /// The region with the most foreground pixels. Ties go to the later one in
    /// reporting order.
    Largest,
}

impl ContourSelection {
    pub fn pick<'a>(&self, blobs: &'a [SmartBlob]) -> Option<&'a SmartBlob> {
        match self {
            ContourSelection::LastReported => blobs.last(),
            ContourSelection::Largest => blobs.iter().max_by_key(|b| b.size_in_pixels),
        }
    }
}

pub fn abs_diff(a: &Mask, b: &Mask) -> Result<Mask> {
    if a.dimensions() != b.dimensions() {
        return Err(PongError::FrameMismatch {
            expected: a.dimensions(),
            actual: b.dimensions(),
        });
    }
    let mut out = Mask::new(a.width(), a.height());
    for ((pa, pb), dst) in a.pixels().zip(b.pixels()).zip(out.pixels_mut()) {
        *dst = Luma([pa.0[0].abs_diff(pb.0[0])]);
    }
    Ok(out)
}

/// Strictly-greater-than threshold to a 0/255 mask.
pub fn binarize(image: &Mask, sensitivity: u8) -> Mask {
    let mut out = Mask::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(out.pixels_mut()) {
        *dst = Luma([if src.0[0] > sensitivity { MASK_ON } else { MASK_OFF }]);
    }
    out
}

/// Normalized `size` x `size` mean filter. The window is anchored at `size / 2`,
/// so an even size reaches one pixel further back than forward.
pub fn box_blur(image: &Mask, size: u32) -> Mask {
    let (w, h) = (image.width() as i32, image.height() as i32);
    if w == 0 || h == 0 || size <= 1 {
        return image.clone();
    }
    let size = size as i32;
    let anchor = size / 2;
    let area = (size * size) as u32;

    let mut horizontal = vec![0u32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for k in 0..size {
                let sx = reflect_101(x + k - anchor, w);
                sum += image.get_pixel(sx as u32, y as u32).0[0] as u32;
            }
            horizontal[(y * w + x) as usize] = sum;
        }
    }

    let mut out = Mask::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for k in 0..size {
                let sy = reflect_101(y + k - anchor, h);
                sum += horizontal[sy * w as usize + x as usize];
            }
            out.put_pixel(x as u32, y as u32, Luma([((sum + area / 2) / area) as u8]));
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct MotionTracker {
    sensitivity: u8,
    blur_size: u32,
    selection: ContourSelection,
}

impl MotionTracker {
    pub fn new(sensitivity: u8, blur_size: u32, selection: ContourSelection) -> Self {
        Self {
            sensitivity,
            blur_size,
            selection,
        }
    }

    /// Threshold, blur, threshold of the difference between two grayscale frames.
    pub fn build_mask(&self, previous: &Mask, next: &Mask) -> Result<Mask> {
        let diff = abs_diff(previous, next)?;
        let changed = binarize(&diff, self.sensitivity);
        let merged = box_blur(&changed, self.blur_size);
        Ok(binarize(&merged, self.sensitivity))
    }

    pub fn locate(&self, mask: &Mask) -> Option<Centroid> {
        let blobs = blob_detector::find_external_blobs(mask);
        self.selection.pick(&blobs).map(SmartBlob::bounding_center)
    }
}
