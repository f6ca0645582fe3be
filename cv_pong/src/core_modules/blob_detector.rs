// THEORY:
// The `BlobDetector` turns a binary motion mask into the list of regions whose
// outer boundary is visible from outside every other region, the same set an
// outer-contours-only border follower reports.
//
// Algorithm steps:
// 1.  **Outside Flood**: background pixels are 4-connected. Every background
//     pixel reachable from the image edge is "outside". Background pockets that
//     cannot be reached are holes inside some region.
// 2.  **Region Growing**: foreground pixels are 8-connected. A raster scan seeds
//     a new region at every unvisited foreground pixel and grows it with an
//     explicit stack, collecting the bounding box and the pixel count.
// 3.  **Outer Test**: a region is reported only if one of its pixels lies on the
//     image edge or has an outside pixel among its 4 neighbors. A region sitting
//     in another region's hole never touches the outside and is dropped.
// 4.  **Ordering**: regions come back in reverse discovery order, so the last
//     element is the one whose first pixel appears earliest in the raster scan.
//
// Like the rest of the spatial layer it is a stateless utility: one mask in,
// one list of blobs out, no memory between frames.

use crate::core_modules::frame::{Mask, mask_to_bits};
use crate::core_modules::smart_blob::{Point, SmartBlob};

pub mod blob_detector {
    use super::*;

    const EIGHT_NEIGHBORS: [(i32, i32); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    const FOUR_NEIGHBORS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    /// Finds every region of `mask` that is not enclosed by another region.
    pub fn find_external_blobs(mask: &Mask) -> Vec<SmartBlob> {
        let width = mask.width() as i32;
        let height = mask.height() as i32;
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let foreground = mask_to_bits(mask);

        // --- 1. Outside Flood ---
        let outside = flood_outside(&foreground, width, height);

        // --- 2 & 3. Region Growing with the Outer Test ---
        let mut visited = vec![false; foreground.len()];
        let mut blobs: Vec<SmartBlob> = Vec::new();
        let mut discovered: u64 = 0;

        for y in 0..height {
            for x in 0..width {
                let index = (y * width + x) as usize;
                if !foreground[index] || visited[index] {
                    continue;
                }

                let (blob, is_outer) = grow_region(
                    Point {
                        x: x as u32,
                        y: y as u32,
                    },
                    &foreground,
                    &outside,
                    &mut visited,
                    width,
                    height,
                    discovered,
                );
                discovered += 1;
                if is_outer {
                    blobs.push(blob);
                }
            }
        }

        // --- 4. Ordering ---
        blobs.reverse();
        blobs
    }

    fn flood_outside(foreground: &[bool], width: i32, height: i32) -> Vec<bool> {
        let mut outside = vec![false; foreground.len()];
        let mut stack: Vec<(i32, i32)> = Vec::new();

        let seed = |x: i32, y: i32, outside: &mut Vec<bool>, stack: &mut Vec<(i32, i32)>| {
            let index = (y * width + x) as usize;
            if !foreground[index] && !outside[index] {
                outside[index] = true;
                stack.push((x, y));
            }
        };
        for x in 0..width {
            seed(x, 0, &mut outside, &mut stack);
            seed(x, height - 1, &mut outside, &mut stack);
        }
        for y in 0..height {
            seed(0, y, &mut outside, &mut stack);
            seed(width - 1, y, &mut outside, &mut stack);
        }

        while let Some((x, y)) = stack.pop() {
            for (dx, dy) in FOUR_NEIGHBORS {
                let nx = x + dx;
                let ny = y + dy;
                if nx >= 0 && nx < width && ny >= 0 && ny < height {
                    let index = (ny * width + nx) as usize;
                    if !foreground[index] && !outside[index] {
                        outside[index] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }
        outside
    }

    /// Depth-first growth of one 8-connected region from `seed`.
    fn grow_region(
        seed: Point,
        foreground: &[bool],
        outside: &[bool],
        visited: &mut [bool],
        width: i32,
        height: i32,
        id: u64,
    ) -> (SmartBlob, bool) {
        let mut stack: Vec<Point> = vec![seed];
        visited[(seed.y as i32 * width + seed.x as i32) as usize] = true;

        let mut min = seed;
        let mut max = seed;
        let mut size = 0usize;
        let mut is_outer = false;

        while let Some(current) = stack.pop() {
            size += 1;
            min.x = min.x.min(current.x);
            min.y = min.y.min(current.y);
            max.x = max.x.max(current.x);
            max.y = max.y.max(current.y);

            let cx = current.x as i32;
            let cy = current.y as i32;

            if !is_outer {
                is_outer = FOUR_NEIGHBORS.iter().any(|(dx, dy)| {
                    let nx = cx + dx;
                    let ny = cy + dy;
                    nx < 0
                        || nx >= width
                        || ny < 0
                        || ny >= height
                        || outside[(ny * width + nx) as usize]
                });
            }

            for (dx, dy) in EIGHT_NEIGHBORS {
                let nx = cx + dx;
                let ny = cy + dy;
                if nx >= 0 && nx < width && ny >= 0 && ny < height {
                    let index = (ny * width + nx) as usize;
                    if foreground[index] && !visited[index] {
                        visited[index] = true;
                        stack.push(Point {
                            x: nx as u32,
                            y: ny as u32,
                        });
                    }
                }
            }
        }

        (
            SmartBlob {
                id,
                bounding_box: (min, max),
                size_in_pixels: size,
            },
            is_outer,
        )
    }
}
