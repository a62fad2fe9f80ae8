//! Image loading and crop-to-fill resizing.
//!
//! Dish illustrations are square while the image band of a slot is usually wide, so images are
//! cropped from their center along the axis with surplus content and then scaled to the exact
//! target size.  The result always covers the whole band: no letterboxing, no distortion.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::error::{Context as _, Error};
use crate::style::Color;

/// Decodes the image at `path`.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, Error> {
    let path = path.as_ref();
    image::open(path).with_context(|| format!("Could not read image {}", path.display()))
}

/// Returns the crop window `(x, y, width, height)` that gives a `src_w × src_h` image the aspect
/// ratio of `dst_w × dst_h`.
///
/// Only one axis is cropped: the horizontal one if the source is relatively wider than the
/// target, the vertical one otherwise.  The window is centered on the source.
pub fn crop_rect(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    let target_ratio = f64::from(dst_w.max(1)) / f64::from(dst_h.max(1));
    let image_ratio = f64::from(src_w) / f64::from(src_h.max(1));

    if image_ratio > target_ratio {
        let new_w = ((f64::from(src_h) * target_ratio).round() as u32).clamp(1, src_w.max(1));
        let left = (src_w - new_w.min(src_w)) / 2;
        (left, 0, new_w, src_h)
    } else {
        let new_h = ((f64::from(src_w) / target_ratio).round() as u32).clamp(1, src_h.max(1));
        let top = (src_h - new_h.min(src_h)) / 2;
        (0, top, src_w, new_h)
    }
}

/// Crops `image` from its center to the aspect ratio of `width × height` and scales it to
/// exactly that many pixels with a Lanczos filter.
pub fn crop_fill(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let width = width.max(1);
    let height = height.max(1);
    let (x, y, w, h) = crop_rect(image.width(), image.height(), width, height);
    image
        .crop_imm(x, y, w, h)
        .resize_exact(width, height, FilterType::Lanczos3)
}

/// Returns an opaque RGB copy of `image`.
///
/// Transparent pixels are composited over `background`, so the result renders the same in
/// viewers without alpha support.
pub fn flatten(image: &DynamicImage, background: Color) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let [br, bg, bb] = background.to_rgb();
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut rgb = RgbImage::new(w, h);

    for (x, y, px) in rgba.enumerate_pixels() {
        let image::Rgba([sr, sg, sb, sa]) = *px;
        let af = sa as f32 / 255.0;
        let r = (sr as f32 * af + br as f32 * (1.0 - af)).round() as u8;
        let g = (sg as f32 * af + bg as f32 * (1.0 - af)).round() as u8;
        let b = (sb as f32 * af + bb as f32 * (1.0 - af)).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([r, g, b]));
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn test_crop_fill_exact_size() {
        let cases = [
            (512, 512, 300, 200),
            (512, 512, 200, 300),
            (1024, 200, 200, 200),
            (37, 91, 640, 480),
            (300, 200, 150, 100),
        ];
        for (sw, sh, tw, th) in cases {
            let src = DynamicImage::ImageRgb8(RgbImage::from_pixel(sw, sh, Rgb([200, 10, 10])));
            let out = crop_fill(&src, tw, th);
            assert_eq!((out.width(), out.height()), (tw, th), "source {}x{}", sw, sh);
        }
    }

    #[test]
    fn test_crop_rect_crops_one_axis_only() {
        // Square into a wide band: keep full width, trim top and bottom
        let (x, y, w, h) = crop_rect(512, 512, 400, 200);
        assert_eq!((x, w), (0, 512));
        assert_eq!(h, 256);
        assert_eq!(y, 128);

        // Panorama into a square: keep full height, trim the sides
        let (x, y, w, h) = crop_rect(1000, 250, 300, 300);
        assert_eq!((y, h), (0, 250));
        assert_eq!(w, 250);
        assert_eq!(x, 375);

        // Same ratio: nothing is cropped
        assert_eq!(crop_rect(300, 200, 150, 100), (0, 0, 300, 200));
    }

    #[test]
    fn test_crop_keeps_the_center() {
        // Left half red, right half blue, a green stripe in the middle
        let mut img = RgbImage::from_pixel(300, 100, Rgb([255, 0, 0]));
        for x in 150..300 {
            for y in 0..100 {
                img.put_pixel(x, y, Rgb([0, 0, 255]));
            }
        }
        for x in 140..160 {
            for y in 0..100 {
                img.put_pixel(x, y, Rgb([0, 255, 0]));
            }
        }
        let out = crop_fill(&DynamicImage::ImageRgb8(img), 20, 100).to_rgb8();
        let px = out.get_pixel(10, 50);
        assert!(px[1] > 200, "center of the crop should be green, got {:?}", px);
    }

    #[test]
    fn test_flatten_composites_over_background() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        let flat = flatten(&DynamicImage::ImageRgba8(img), Color::Rgb(255, 255, 255));
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_load_image_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").expect("write");
        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
    }
}
