//! Grayscale to black/white conversion and the binarized-image container.

use crate::models::BitMatrix;
use crate::utils::grayscale;

/// Binarize a grayscale buffer using Otsu's global threshold.
/// Returns a matrix where true = dark.
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    threshold_binarize(gray, width, height, otsu_threshold(gray))
}

/// Binarize a grayscale buffer with a fixed threshold (dark = below threshold)
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if gray[y * width + x] < threshold {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

/// Otsu's optimal global threshold over an intensity histogram
fn otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u32; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let mut best_variance = 0.0;
    let mut best_threshold = 128u8;

    for threshold in 0..=255u16 {
        let mut dark_pixels = 0u64;
        let mut dark_sum = 0u64;
        let mut light_pixels = 0u64;
        let mut light_sum = 0u64;

        for (intensity, &count) in histogram.iter().enumerate() {
            if (intensity as u16) < threshold {
                dark_pixels += count as u64;
                dark_sum += count as u64 * intensity as u64;
            } else {
                light_pixels += count as u64;
                light_sum += count as u64 * intensity as u64;
            }
        }

        if dark_pixels == 0 || light_pixels == 0 {
            continue;
        }

        let dark_mean = dark_sum as f64 / dark_pixels as f64;
        let light_mean = light_sum as f64 / light_pixels as f64;
        let weight_dark = dark_pixels as f64 / total;
        let weight_light = light_pixels as f64 / total;
        let variance = weight_dark * weight_light * (dark_mean - light_mean).powi(2);

        if variance > best_variance {
            best_variance = variance;
            best_threshold = threshold as u8;
        }
    }

    best_threshold
}

/// A binarized image: the narrow interface the reader consumes.
///
/// Owns one black/white module grid; `black_matrix` hands it out read-only.
#[derive(Debug, Clone)]
pub struct BinaryImage {
    matrix: BitMatrix,
}

impl BinaryImage {
    /// Wrap an already-binarized matrix
    pub fn from_matrix(matrix: BitMatrix) -> Self {
        Self { matrix }
    }

    /// Binarize a grayscale buffer (Otsu)
    pub fn from_luma(gray: &[u8], width: usize, height: usize) -> Self {
        Self {
            matrix: otsu_binarize(gray, width, height),
        }
    }

    /// Convert packed RGB bytes to luminance and binarize (Otsu)
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize) -> Self {
        let gray = grayscale::rgb_to_luma(rgb, width, height);
        Self::from_luma(&gray, width, height)
    }

    /// The black/white pixel grid (true = dark)
    pub fn black_matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.matrix.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.matrix.height()
    }
}
