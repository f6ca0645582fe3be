// THEORY:
// A `SmartBlob` is one spatially connected region of foreground pixels in a
// binary motion mask, summarized into the few numbers the motion tracker needs.
//
// Key architectural principles:
// 1.  **Stateless Data Container**: a blob describes a region in a single frame.
//     It has no memory of previous frames; paddles hold their own history.
// 2.  **Bounding Box First**: the motion tracker follows the center of a blob's
//     bounding box rather than its center of mass. A waving hand produces a
//     ragged difference mask whose mass jumps around, while its extent is stable.
// 3.  **Discovery Order**: `id` records when the blob was found in a raster scan,
//     which is what the tracker's selection rule is defined against.

use crate::core_modules::frame::Centroid;

/// A pixel coordinate inside a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// One connected foreground region found in a single mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartBlob {
    /// Position of this blob in raster-scan discovery order, starting at 0.
    pub id: u64,
    /// Top-left and bottom-right corners, both inclusive.
    pub bounding_box: (Point, Point),
    /// Number of foreground pixels, the blob's area.
    pub size_in_pixels: usize,
}

impl SmartBlob {
    pub fn width(&self) -> u32 {
        self.bounding_box.1.x - self.bounding_box.0.x + 1
    }

    pub fn height(&self) -> u32 {
        self.bounding_box.1.y - self.bounding_box.0.y + 1
    }

    /// Center of the bounding box, rounded down.
    pub fn bounding_center(&self) -> Centroid {
        let top_left = self.bounding_box.0;
        Centroid::new(
            (top_left.x + self.width() / 2) as i32,
            (top_left.y + self.height() / 2) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_center_uses_inclusive_extent() {
        let blob = SmartBlob {
            id: 0,
            bounding_box: (Point { x: 10, y: 20 }, Point { x: 19, y: 24 }),
            size_in_pixels: 50,
        };
        assert_eq!(blob.width(), 10);
        assert_eq!(blob.height(), 5);
        assert_eq!(blob.bounding_center(), Centroid::new(15, 22));
    }
}
