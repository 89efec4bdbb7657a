//! Symbol location: finder pattern search, corner ordering, dimension
//! estimation, and perspective sampling into a module matrix.

pub mod finder;

use log::debug;

use crate::error::DecodeError;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

use finder::{FinderDetector, FinderPattern};

/// A located symbol: its sampled module matrix and the finder pattern
/// centers in image coordinates, ordered bottom-left, top-left, top-right.
pub struct DetectorResult {
    pub bits: BitMatrix,
    pub points: Vec<Point>,
}

/// Finds a symbol in a binary image and samples its module grid
pub struct Detector<'a> {
    image: &'a BitMatrix,
}

impl<'a> Detector<'a> {
    pub fn new(image: &'a BitMatrix) -> Self {
        Self { image }
    }

    pub fn detect(&self) -> Result<DetectorResult, DecodeError> {
        let patterns = FinderDetector::detect(self.image);
        if patterns.len() < 3 {
            return Err(DecodeError::NotFound);
        }

        let (bottom_left, top_left, top_right) = order_patterns(&patterns[..3]);
        let module_size =
            (bottom_left.module_size + top_left.module_size + top_right.module_size) / 3.0;
        if module_size < 1.0 {
            return Err(DecodeError::NotFound);
        }

        let dimension = estimate_dimension(&top_left, &top_right, &bottom_left, module_size)
            .ok_or(DecodeError::NotFound)?;
        debug!("located symbol: dimension {dimension}, module size {module_size:.2}");

        let transform = build_transform(&top_left, &top_right, &bottom_left, dimension)
            .ok_or(DecodeError::NotFound)?;
        let bits = sample_grid(self.image, &transform, dimension)?;

        Ok(DetectorResult {
            bits,
            points: vec![bottom_left.center, top_left.center, top_right.center],
        })
    }
}

/// Order three finder patterns as (bottom-left, top-left, top-right).
///
/// The top-left pattern sits at the right angle; the remaining two are told
/// apart by the sign of the cross product around it.
fn order_patterns(patterns: &[FinderPattern]) -> (FinderPattern, FinderPattern, FinderPattern) {
    let mut best_idx = 0;
    let mut best_cos = f32::MAX;
    for i in 0..3 {
        let a = patterns[(i + 1) % 3].center;
        let b = patterns[i].center;
        let c = patterns[(i + 2) % 3].center;
        let v1 = (a.x - b.x, a.y - b.y);
        let v2 = (c.x - b.x, c.y - b.y);
        let dot = v1.0 * v2.0 + v1.1 * v2.1;
        let norm = (v1.0 * v1.0 + v1.1 * v1.1).sqrt() * (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
        let cos = if norm > 0.0 { (dot / norm).abs() } else { f32::MAX };
        if cos < best_cos {
            best_cos = cos;
            best_idx = i;
        }
    }

    let top_left = patterns[best_idx];
    let p1 = patterns[(best_idx + 1) % 3];
    let p2 = patterns[(best_idx + 2) % 3];

    // Positive cross product means p1 is clockwise from p2 around top-left,
    // with the y axis pointing down: p1 is the top-right corner.
    let cross = (p1.center.x - top_left.center.x) * (p2.center.y - top_left.center.y)
        - (p1.center.y - top_left.center.y) * (p2.center.x - top_left.center.x);
    if cross > 0.0 {
        (p2, top_left, p1)
    } else {
        (p1, top_left, p2)
    }
}

/// Dimension from the distance between finder centers: centers sit 7 modules
/// inside the symbol, so dimension = distance / module + 7. Must come out at
/// a valid 21 + 4k value.
fn estimate_dimension(
    top_left: &FinderPattern,
    top_right: &FinderPattern,
    bottom_left: &FinderPattern,
    module_size: f32,
) -> Option<usize> {
    let w = top_left.center.distance(&top_right.center) / module_size;
    let h = top_left.center.distance(&bottom_left.center) / module_size;
    let mut dimension = ((w + h) / 2.0).round() as i64 + 7;

    // Nudge onto the 4k + 1 grid; an off-by-two estimate is hopeless
    match dimension % 4 {
        0 => dimension += 1,
        2 => dimension -= 1,
        3 => return None,
        _ => {}
    }

    if (21..=177).contains(&dimension) {
        Some(dimension as usize)
    } else {
        None
    }
}

/// Map module coordinates to image coordinates using the three finder
/// centers and the inferred fourth corner.
fn build_transform(
    top_left: &FinderPattern,
    top_right: &FinderPattern,
    bottom_left: &FinderPattern,
    dimension: usize,
) -> Option<PerspectiveTransform> {
    let dim = dimension as f32;
    // Finder centers are 3.5 modules in from their corners
    let src = [
        Point::new(3.5, 3.5),
        Point::new(dim - 3.5, 3.5),
        Point::new(3.5, dim - 3.5),
        Point::new(dim - 3.5, dim - 3.5),
    ];
    // No alignment pattern is used; infer the fourth corner from the other
    // three under an affine assumption
    let br = Point::new(
        top_right.center.x + bottom_left.center.x - top_left.center.x,
        top_right.center.y + bottom_left.center.y - top_left.center.y,
    );
    let dst = [top_left.center, top_right.center, bottom_left.center, br];
    PerspectiveTransform::from_points(&src, &dst)
}

/// Sample one pixel per module at module centers
fn sample_grid(
    image: &BitMatrix,
    transform: &PerspectiveTransform,
    dimension: usize,
) -> Result<BitMatrix, DecodeError> {
    let mut bits = BitMatrix::square(dimension);
    let width = image.width() as f32;
    let height = image.height() as f32;

    for y in 0..dimension {
        for x in 0..dimension {
            let mapped = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if mapped.x < 0.0 || mapped.x >= width || mapped.y < 0.0 || mapped.y >= height {
                return Err(DecodeError::NotFound);
            }
            bits.set(x, y, image.get(mapped.x as usize, mapped.y as usize));
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(x: f32, y: f32) -> FinderPattern {
        FinderPattern {
            center: Point::new(x, y),
            module_size: 4.0,
        }
    }

    #[test]
    fn orders_upright_patterns() {
        // Upright layout: top-left (20,20), top-right (80,20), bottom-left (20,80)
        let patterns = [pattern(80.0, 20.0), pattern(20.0, 80.0), pattern(20.0, 20.0)];
        let (bl, tl, tr) = order_patterns(&patterns);
        assert_eq!((tl.center.x, tl.center.y), (20.0, 20.0));
        assert_eq!((tr.center.x, tr.center.y), (80.0, 20.0));
        assert_eq!((bl.center.x, bl.center.y), (20.0, 80.0));
    }

    #[test]
    fn orders_rotated_patterns() {
        // Same symbol rotated 90 degrees clockwise: image top-left corner now
        // holds the original bottom-left pattern
        let patterns = [pattern(80.0, 20.0), pattern(80.0, 80.0), pattern(20.0, 20.0)];
        let (bl, tl, tr) = order_patterns(&patterns);
        assert_eq!((tl.center.x, tl.center.y), (80.0, 20.0));
        assert_eq!((tr.center.x, tr.center.y), (80.0, 80.0));
        assert_eq!((bl.center.x, bl.center.y), (20.0, 20.0));
    }

    #[test]
    fn dimension_snaps_to_symbol_grid() {
        let tl = pattern(10.0, 10.0);
        let tr = pattern(66.0, 10.0);
        let bl = pattern(10.0, 66.0);
        // 56 px / 4 px per module = 14 modules between centers -> dimension 21
        assert_eq!(estimate_dimension(&tl, &tr, &bl, 4.0), Some(21));
        // Wildly inconsistent module size yields an out-of-range dimension
        assert_eq!(estimate_dimension(&tl, &tr, &bl, 0.1), None);
    }

    #[test]
    fn dimension_off_by_two_is_rejected() {
        // 64 px / 4 px per module = 16 modules between centers -> 23, which
        // sits two off the 4k + 1 grid and cannot be nudged onto it
        let tl = pattern(10.0, 10.0);
        let tr = pattern(74.0, 10.0);
        let bl = pattern(10.0, 74.0);
        assert_eq!(estimate_dimension(&tl, &tr, &bl, 4.0), None);
    }
}
