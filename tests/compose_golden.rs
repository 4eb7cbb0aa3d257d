//! Composition determinism: identical input bytes must produce identical
//! card bytes, so the same listing always renders the same photo.

use std::io::Cursor;

use image::{DynamicImage, Rgba, RgbaImage};
use playcard::compose::compose;
use playcard::Canvas;
use sha2::{Digest, Sha256};

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 7 % 256) as u8,
            (y * 13 % 256) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode fixture");
    bytes
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[test]
fn compose_is_deterministic() {
    let source = png_fixture(512, 512);
    let canvas = Canvas::default();

    let first = compose(&source, canvas, 95).expect("first compose");
    let second = compose(&source, canvas, 95).expect("second compose");

    assert_eq!(digest(&first), digest(&second));
    assert_eq!(first, second);
}

#[test]
fn compose_varies_with_source() {
    let canvas = Canvas::default();
    let a = compose(&png_fixture(512, 512), canvas, 95).unwrap();
    let b = compose(&png_fixture(512, 256), canvas, 95).unwrap();
    assert_ne!(digest(&a), digest(&b));
}
