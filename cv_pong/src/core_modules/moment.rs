// THEORY:
// Raw spatial moments of a binary mask. The zeroth moment is the pixel mass of
// the foreground and the two first moments are the x- and y-weighted sums of
// that mass. Their ratios are the centroid, which is all the color tracker
// needs: it never looks at shape, only at where the mass of matching color sits.

use crate::core_modules::frame::{Centroid, MASK_OFF, Mask};

/// Zeroth and first order moments of a mask. Every set pixel weighs 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageMoments {
    pub m00: u64,
    pub m10: u64,
    pub m01: u64,
}

impl ImageMoments {
    pub fn of(mask: &Mask) -> Self {
        let mut moments = Self::default();
        for (x, y, pixel) in mask.enumerate_pixels() {
            if pixel.0[0] != MASK_OFF {
                moments.m00 += 1;
                moments.m10 += x as u64;
                moments.m01 += y as u64;
            }
        }
        moments
    }

    /// Center of mass, truncated toward zero. `None` for an empty mask.
    pub fn centroid(&self) -> Option<Centroid> {
        if self.m00 == 0 {
            return None;
        }
        Some(Centroid::new(
            (self.m10 / self.m00) as i32,
            (self.m01 / self.m00) as i32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::frame::MASK_ON;
    use image::Luma;

    #[test]
    fn empty_mask_has_no_centroid() {
        let moments = ImageMoments::of(&Mask::new(20, 20));
        assert_eq!(moments, ImageMoments::default());
        assert_eq!(moments.centroid(), None);
    }

    #[test]
    fn moments_of_a_rectangle() {
        let mut mask = Mask::new(20, 20);
        for y in 4..8 {
            for x in 10..13 {
                mask.put_pixel(x, y, Luma([MASK_ON]));
            }
        }
        let moments = ImageMoments::of(&mask);
        assert_eq!(moments.m00, 12);
        assert_eq!(moments.m10, 4 * (10 + 11 + 12));
        assert_eq!(moments.m01, 3 * (4 + 5 + 6 + 7));
        assert_eq!(moments.centroid(), Some(Centroid::new(11, 5)));
    }
}
