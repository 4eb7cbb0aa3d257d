//! Thumbnail composition: rounded corners on a fixed landscape canvas.
//!
//! A single-pass, deterministic transform over encoded image bytes: decode,
//! resize to half the canvas width, mask the corners, center on an opaque
//! white canvas and re-encode as JPEG. Identical input bytes always produce
//! identical output bytes.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

use crate::{Canvas, Error, Result};

/// Corner radius as a fraction of the thumbnail's short edge.
const CORNER_RADIUS_RATIO: f32 = 0.2;

/// Compose the downloaded thumbnail onto an opaque card.
///
/// The thumbnail is scaled to exactly half the canvas width with its aspect
/// ratio preserved; there is no height cap, so an extremely tall source
/// overflows the canvas vertically and is cropped by the centered paste.
pub fn compose(bytes: &[u8], canvas: Canvas, jpeg_quality: u8) -> Result<Vec<u8>> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| Error::ImageDecodeFailed(e.to_string()))?;
    let source = decoded.to_rgba8();

    let (thumb_w, thumb_h) = thumb_dimensions(source.width(), source.height(), canvas.width);
    let resized = DynamicImage::ImageRgba8(source)
        .resize_exact(thumb_w, thumb_h, FilterType::Lanczos3)
        .to_rgba8();

    // Rounded-corner cutout: keep the source pixel (including its own
    // alpha) inside the mask, fully transparent outside.
    let mask = rounded_mask(thumb_w, thumb_h, corner_radius(thumb_w, thumb_h));
    let mut rounded = RgbaImage::new(thumb_w, thumb_h);
    for (x, y, pixel) in resized.enumerate_pixels() {
        if mask.get_pixel(x, y)[0] == 255 {
            rounded.put_pixel(x, y, *pixel);
        }
    }

    let mut card = RgbaImage::from_pixel(canvas.width, canvas.height, Rgba([255, 255, 255, 255]));
    let x = (i64::from(canvas.width) - i64::from(thumb_w)).div_euclid(2);
    let y = (i64::from(canvas.height) - i64::from(thumb_h)).div_euclid(2);
    imageops::overlay(&mut card, &rounded, x, y);

    // The canvas is already opaque, so flattening is just dropping alpha.
    let flat = DynamicImage::ImageRgba8(card).to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality);
    encoder
        .encode_image(&flat)
        .map_err(|e| Error::Unexpected(format!("Failed to encode card: {}", e)))?;
    Ok(out)
}

/// Target thumbnail size: half the canvas width, aspect ratio preserved.
///
/// Degenerate sources are clamped to one pixel per side rather than
/// rejected.
fn thumb_dimensions(src_w: u32, src_h: u32, canvas_w: u32) -> (u32, u32) {
    let width = (canvas_w / 2).max(1);
    let height = (f64::from(width) * f64::from(src_h) / f64::from(src_w)).round() as u32;
    (width, height.max(1))
}

/// Corner radius for a thumbnail of the given size.
fn corner_radius(w: u32, h: u32) -> u32 {
    (CORNER_RADIUS_RATIO * w.min(h) as f32).round() as u32
}

/// Single-channel mask covering the full bounds: 255 inside the rounded
/// rectangle, 0 outside.
fn rounded_mask(w: u32, h: u32, radius: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        if in_rounded_rect(x, y, w, h, radius) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Sample a pixel center against a rounded rectangle over the full bounds.
fn in_rounded_rect(x: u32, y: u32, w: u32, h: u32, radius: u32) -> bool {
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let r = radius as f32;
    // Nearest point of the radius-inset inner rectangle; anything within
    // `r` of it lies inside the rounded outline.
    let nx = px.clamp(r, w as f32 - r);
    let ny = py.clamp(r, h as f32 - r);
    let (dx, dy) = (px - nx, py - ny);
    dx * dx + dy * dy <= r * r
}
