//! RGB/RGBA to luminance conversion.
//!
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8.
//! Large frames are converted row-parallel with rayon.

use rayon::prelude::*;

const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Pixel count above which row-parallel conversion pays off
const PARALLEL_THRESHOLD: usize = 256 * 256;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

/// Convert packed RGB bytes (3 per pixel) to a luminance buffer
pub fn rgb_to_luma(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, width, height, 3)
}

/// Convert packed RGBA bytes (4 per pixel) to a luminance buffer, ignoring alpha
pub fn rgba_to_luma(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, width, height, 4)
}

fn convert(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return gray;
    }

    // Only rows the input fully covers get converted; a short buffer leaves
    // the remainder black instead of reading past the end.
    let full_rows = (pixels.len() / (width * channels)).min(height);
    let filled = &mut gray[..full_rows * width];

    let convert_row = |y: usize, row: &mut [u8]| {
        let src_row = &pixels[y * width * channels..];
        for (x, out) in row.iter_mut().enumerate() {
            let p = x * channels;
            *out = luma(src_row[p], src_row[p + 1], src_row[p + 2]);
        }
    };

    if filled.len() >= PARALLEL_THRESHOLD {
        filled
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| convert_row(y, row));
    } else {
        for (y, row) in filled.chunks_mut(width).enumerate() {
            convert_row(y, row);
        }
    }

    gray
}
