use image::{Rgb, RgbImage};

use crate::vision::Vision;

#[test]
fn test_resize_exact_to_square() {
    let image = RgbImage::from_pixel(300, 200, Rgb([200, 10, 10]));
    let resized = Vision::resize_exact(&image, 128, 128);
    assert_eq!(resized.dimensions(), (128, 128));
    // 纯色图缩放后仍为纯色（允许插值的舍入误差）
    let pixel = resized.get_pixel(64, 64);
    for (got, expected) in pixel.0.iter().zip([200u8, 10, 10]) {
        assert!(got.abs_diff(expected) <= 1, "{:?}", pixel);
    }
}

#[test]
fn test_resize_exact_upscale() {
    let image = RgbImage::from_pixel(5, 9, Rgb([0, 0, 0]));
    let resized = Vision::resize_exact(&image, 128, 128);
    assert_eq!(resized.dimensions(), (128, 128));
}

#[test]
fn test_resize_exact_same_size_is_identity() {
    let image = RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8, y as u8, 0]));
    assert_eq!(Vision::resize_exact(&image, 8, 8), image);
}
