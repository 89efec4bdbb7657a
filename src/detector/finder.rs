use log::trace;

use crate::models::{BitMatrix, Point};

/// A located finder pattern candidate
#[derive(Debug, Clone, Copy)]
pub struct FinderPattern {
    pub center: Point,
    pub module_size: f32,
}

impl FinderPattern {
    fn new(x: f32, y: f32, module_size: f32) -> Self {
        Self {
            center: Point::new(x, y),
            module_size,
        }
    }
}

/// Candidate with the number of scan rows that confirmed it
#[derive(Debug, Clone, Copy)]
struct Candidate {
    pattern: FinderPattern,
    count: usize,
}

/// Locates the three 1:1:3:1:1 finder patterns in a binary image.
pub struct FinderDetector;

impl FinderDetector {
    /// Scan the image and return confirmed finder patterns, strongest first
    pub fn detect(matrix: &BitMatrix) -> Vec<FinderPattern> {
        let width = matrix.width();
        let height = matrix.height();
        let mut candidates: Vec<Candidate> = Vec::new();

        for y in 0..height {
            let runs = scan_runs(matrix, y, width);
            for window in runs.windows(5) {
                if !window[0].dark {
                    continue;
                }
                let lengths = [
                    window[0].len,
                    window[1].len,
                    window[2].len,
                    window[3].len,
                    window[4].len,
                ];
                if let Some(unit) = check_ratios(&lengths) {
                    let center_x = window[2].start as f32 + window[2].len as f32 / 2.0 - 0.5;
                    if let Some(pattern) = Self::cross_check(matrix, center_x, y, unit) {
                        Self::merge(&mut candidates, pattern);
                    }
                }
            }
        }

        trace!("{} finder pattern candidates", candidates.len());
        candidates.sort_by(|a, b| b.count.cmp(&a.count));
        Self::select_best(candidates)
    }

    /// Confirm a horizontal hit by walking the same ratio vertically, then
    /// re-derive the horizontal center along the confirmed row.
    fn cross_check(matrix: &BitMatrix, center_x: f32, y: usize, unit: f32) -> Option<FinderPattern> {
        let cx = center_x.round() as i64;
        if cx < 0 || cx as usize >= matrix.width() {
            return None;
        }

        let (center_y, v_unit) = cross_check_line(
            |i| matrix.get(cx as usize, i),
            matrix.height(),
            y,
            unit,
        )?;

        let cy = center_y.round() as usize;
        let (refined_x, h_unit) = cross_check_line(
            |i| matrix.get(i, cy),
            matrix.width(),
            cx as usize,
            unit,
        )?;

        let module_size = (v_unit + h_unit) / 2.0;
        Some(FinderPattern::new(refined_x, center_y, module_size))
    }

    /// Fold a confirmed pattern into an existing nearby candidate, or record
    /// it as a new one. Positions are averaged weighted by confirmations.
    fn merge(candidates: &mut Vec<Candidate>, pattern: FinderPattern) {
        for candidate in candidates.iter_mut() {
            let existing = &candidate.pattern;
            let limit = 2.0 * existing.module_size.max(pattern.module_size);
            if (pattern.center.x - existing.center.x).abs() <= limit
                && (pattern.center.y - existing.center.y).abs() <= limit
            {
                let n = candidate.count as f32;
                candidate.pattern = FinderPattern::new(
                    (existing.center.x * n + pattern.center.x) / (n + 1.0),
                    (existing.center.y * n + pattern.center.y) / (n + 1.0),
                    (existing.module_size * n + pattern.module_size) / (n + 1.0),
                );
                candidate.count += 1;
                return;
            }
        }
        candidates.push(Candidate { pattern, count: 1 });
    }

    /// Keep the three candidates whose module sizes agree best
    fn select_best(candidates: Vec<Candidate>) -> Vec<FinderPattern> {
        let mut patterns: Vec<FinderPattern> =
            candidates.into_iter().map(|c| c.pattern).collect();
        if patterns.len() <= 3 {
            return patterns;
        }

        let mean: f32 =
            patterns.iter().map(|p| p.module_size).sum::<f32>() / patterns.len() as f32;
        patterns.sort_by(|a, b| {
            let da = (a.module_size - mean).abs();
            let db = (b.module_size - mean).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        patterns.truncate(3);
        patterns
    }
}

/// One same-color run of pixels within a scan row
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    len: usize,
    dark: bool,
}

/// Split a row into alternating runs of dark and light pixels
fn scan_runs(matrix: &BitMatrix, y: usize, width: usize) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut dark = matrix.get(0, y);
    for x in 1..width {
        let color = matrix.get(x, y);
        if color != dark {
            runs.push(Run {
                start,
                len: x - start,
                dark,
            });
            start = x;
            dark = color;
        }
    }
    runs.push(Run {
        start,
        len: width - start,
        dark,
    });
    runs
}

/// Validate five run lengths against the 1:1:3:1:1 ratio.
/// Returns the estimated module size when they match.
fn check_ratios(lengths: &[usize; 5]) -> Option<f32> {
    let total: usize = lengths.iter().sum();
    if total < 7 {
        return None;
    }
    let unit = total as f32 / 7.0;
    const EXPECTED: [f32; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];
    for (&len, &expected) in lengths.iter().zip(EXPECTED.iter()) {
        if (len as f32 / unit - expected).abs() > 0.5 {
            return None;
        }
    }
    Some(unit)
}

/// Walk a 1:1:3:1:1 ratio along one axis from a point inside the middle run.
///
/// `get` reads the pixel at an index along the axis, `len` is the axis
/// length, `start` must be a dark pixel. Returns the refined center
/// coordinate and module size when the ratio holds.
fn cross_check_line(
    get: impl Fn(usize) -> bool,
    len: usize,
    start: usize,
    unit: f32,
) -> Option<(f32, f32)> {
    if !get(start) {
        return None;
    }
    let cap = (unit * 3.0).ceil() as usize + 1;
    let mut counts = [0usize; 5];

    // Upward: middle black run, then white, then outer black
    let mut i = start as i64;
    while i >= 0 && get(i as usize) {
        counts[2] += 1;
        i -= 1;
    }
    if i < 0 {
        return None;
    }
    let middle_first = (i + 1) as usize;
    while i >= 0 && !get(i as usize) && counts[1] <= cap {
        counts[1] += 1;
        i -= 1;
    }
    if i < 0 || counts[1] > cap {
        return None;
    }
    while i >= 0 && get(i as usize) && counts[0] <= cap {
        counts[0] += 1;
        i -= 1;
    }
    if counts[0] > cap {
        return None;
    }

    // Downward: rest of the middle run, white, outer black
    let mut i = start + 1;
    while i < len && get(i) {
        counts[2] += 1;
        i += 1;
    }
    if i == len {
        return None;
    }
    let middle_last = i - 1;
    while i < len && !get(i) && counts[3] <= cap {
        counts[3] += 1;
        i += 1;
    }
    if i == len || counts[3] > cap {
        return None;
    }
    while i < len && get(i) && counts[4] <= cap {
        counts[4] += 1;
        i += 1;
    }
    if counts[4] > cap {
        return None;
    }

    check_ratios(&counts)?;
    let center = (middle_first + middle_last + 1) as f32 / 2.0 - 0.5;
    let new_unit = counts.iter().sum::<usize>() as f32 / 7.0;
    Some((center, new_unit))
}
