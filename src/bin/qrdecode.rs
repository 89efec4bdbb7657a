//! Command-line decoder: reads an image file and prints the QR payload.

use std::process::ExitCode;

use qrdec::{BinaryImage, DecodeHints, QrReader, Reader};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: qrdecode [--pure] <image>");
        return ExitCode::from(2);
    };

    let (pure, path) = if path == "--pure" {
        match args.next() {
            Some(p) => (true, p),
            None => {
                eprintln!("usage: qrdecode [--pure] <image>");
                return ExitCode::from(2);
            }
        }
    } else {
        (false, path)
    };

    let img = match image::open(&path) {
        Ok(img) => img.to_rgb8(),
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let (width, height) = img.dimensions();
    let binary = BinaryImage::from_rgb(img.as_raw(), width as usize, height as usize);

    let hints = if pure {
        DecodeHints::new().pure_barcode()
    } else {
        DecodeHints::new()
    };

    match QrReader::new().decode_with_hints(&binary, &hints) {
        Ok(result) => {
            println!("{}", result.text);
            if let Some(level) = result.ec_level() {
                eprintln!("error correction level: {level}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{path}: {err}");
            ExitCode::FAILURE
        }
    }
}
