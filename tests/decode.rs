//! End-to-end decode tests over a known version 1 symbol.

use qrdec::{
    BinaryImage, BitMatrix, DecodeError, DecodeHints, QrReader, Reader,
};

/// Version 1 symbol, EC level M, mask 7, encoding "4376471154038"
const GOLDEN_TEXT: &str = "4376471154038";
const GOLDEN: [&str; 21] = [
    "#######.....#.#######",
    "#.....#..#....#.....#",
    "#.###.#...##..#.###.#",
    "#.###.#...#...#.###.#",
    "#.###.#..####.#.###.#",
    "#.....#.#.#...#.....#",
    "#######.#.#.#.#######",
    ".........#...........",
    "#..#.##.######.#.....",
    "###.#..##..#.#.#.##..",
    "#..#.####.##..###...#",
    "..#.#..#....#####....",
    "..#...##.#.#.###.##..",
    "........#.#..####.##.",
    "#######...###.#.####.",
    "#.....#.#.....##....#",
    "#.###.#..##.###..#.##",
    "#.###.#.#.#..####..##",
    "#.###.#..###.###.#..#",
    "#.....#..####..##..#.",
    "#######.###..#.###...",
];

fn golden_matrix() -> BitMatrix {
    let mut matrix = BitMatrix::square(21);
    for (y, row) in GOLDEN.iter().enumerate() {
        for (x, c) in row.bytes().enumerate() {
            matrix.set(x, y, c == b'#');
        }
    }
    matrix
}

/// Render a module matrix at `scale` px per module with a quiet border
fn render(modules: &BitMatrix, scale: usize, border: usize) -> BitMatrix {
    let dim = modules.width();
    let size = dim * scale + 2 * border;
    let mut image = BitMatrix::square(size);
    for y in 0..dim {
        for x in 0..dim {
            if modules.get(x, y) {
                for py in 0..scale {
                    for px in 0..scale {
                        image.set(border + x * scale + px, border + y * scale + py, true);
                    }
                }
            }
        }
    }
    image
}

fn rotate_cw(src: &BitMatrix) -> BitMatrix {
    let (w, h) = (src.width(), src.height());
    let mut dst = BitMatrix::new(h, w);
    for y in 0..w {
        for x in 0..h {
            dst.set(x, y, src.get(y, h - 1 - x));
        }
    }
    dst
}

#[test]
fn pure_path_decodes_golden_symbol() {
    let image = BinaryImage::from_matrix(render(&golden_matrix(), 4, 8));
    let hints = DecodeHints::new().pure_barcode();

    let result = QrReader::new().decode_with_hints(&image, &hints).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
    assert!(result.points.is_empty());
    assert_eq!(result.ec_level(), Some("M"));
    assert!(result.byte_segments().is_none());
    // Version 1 at level M carries 16 data codewords; the first holds the
    // numeric mode indicator and the top of the count field
    assert_eq!(result.raw_bytes.len(), 16);
    assert_eq!(result.raw_bytes[0], 0x10);
}

#[test]
fn pure_path_at_one_pixel_per_module() {
    let image = BinaryImage::from_matrix(render(&golden_matrix(), 1, 4));
    let hints = DecodeHints::new().pure_barcode();
    let result = QrReader::new().decode_with_hints(&image, &hints).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
}

#[test]
fn general_path_reports_locator_points() {
    let image = BinaryImage::from_matrix(render(&golden_matrix(), 4, 8));

    let result = QrReader::new().decode(&image).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
    assert_eq!(result.points.len(), 3);

    // Points come back bottom-left, top-left, top-right; finder centers sit
    // 3.5 modules in from the corners: 8 + 3.5 * 4 - 0.5 = 21.5
    let (bl, tl, tr) = (result.points[0], result.points[1], result.points[2]);
    assert!((tl.x - 21.5).abs() < 1.0 && (tl.y - 21.5).abs() < 1.0);
    assert!((tr.x - 77.5).abs() < 1.0 && (tr.y - 21.5).abs() < 1.0);
    assert!((bl.x - 21.5).abs() < 1.0 && (bl.y - 77.5).abs() < 1.0);
}

#[test]
fn general_path_decodes_rotated_symbol() {
    let upright = render(&golden_matrix(), 4, 8);
    let rotated = rotate_cw(&upright);
    let image = BinaryImage::from_matrix(rotated);

    let result = QrReader::new().decode(&image).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
}

#[test]
fn reader_is_reusable_and_reset_is_harmless() {
    let image = BinaryImage::from_matrix(render(&golden_matrix(), 4, 8));
    let mut reader = QrReader::new();

    let first = reader.decode(&image).unwrap();
    reader.reset();
    let second = reader.decode(&image).unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.raw_bytes, second.raw_bytes);
}

#[test]
fn error_correction_repairs_damaged_modules() {
    let mut modules = golden_matrix();
    // Flip one data module; well within level M's correction capacity
    modules.toggle(12, 12);
    let image = BinaryImage::from_matrix(render(&modules, 4, 8));
    let hints = DecodeHints::new().pure_barcode();

    let result = QrReader::new().decode_with_hints(&image, &hints).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
}

#[test]
fn heavy_damage_fails_checksum() {
    let mut modules = golden_matrix();
    // A 5x5 hole in the data region corrupts more codewords than level M
    // can repair
    for y in 9..14 {
        for x in 9..14 {
            modules.toggle(x, y);
        }
    }
    let image = BinaryImage::from_matrix(render(&modules, 4, 8));
    let hints = DecodeHints::new().pure_barcode();

    let err = QrReader::new()
        .decode_with_hints(&image, &hints)
        .unwrap_err();
    assert!(
        matches!(err, DecodeError::ChecksumFailed | DecodeError::FormatInvalid),
        "unexpected error: {err:?}"
    );
}

#[test]
fn blank_image_is_not_found() {
    let image = BinaryImage::from_matrix(BitMatrix::square(100));
    let mut reader = QrReader::new();
    assert_eq!(reader.decode(&image), Err(DecodeError::NotFound));

    let hints = DecodeHints::new().pure_barcode();
    assert_eq!(
        reader.decode_with_hints(&image, &hints),
        Err(DecodeError::NotFound)
    );
}

#[test]
fn zero_sized_rgb_image_is_not_found() {
    assert_eq!(qrdec::decode_rgb(&[], 0, 0), Err(DecodeError::NotFound));
    assert_eq!(qrdec::decode_rgb(&[], 10, 0), Err(DecodeError::NotFound));
    assert_eq!(qrdec::decode_rgb(&[], 0, 10), Err(DecodeError::NotFound));
}

#[test]
fn format_gate_rejects_excluded_symbologies() {
    let image = BinaryImage::from_matrix(render(&golden_matrix(), 4, 8));
    let hints = DecodeHints::new().formats(Vec::new());
    assert_eq!(
        QrReader::new().decode_with_hints(&image, &hints),
        Err(DecodeError::NotFound)
    );
}

#[test]
fn decode_rgb_entry_point() {
    let rendered = render(&golden_matrix(), 4, 8);
    let size = rendered.width();
    let mut rgb = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let v = if rendered.get(x, y) { 0u8 } else { 255u8 };
            rgb.extend_from_slice(&[v, v, v]);
        }
    }
    let result = qrdec::decode_rgb(&rgb, size, size).unwrap();
    assert_eq!(result.text, GOLDEN_TEXT);
}
