use super::*;
use std::io::Cursor;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, image::Rgb(rgb)))
}

#[test]
fn same_size_passes_through() {
    let out = fit_letterbox(&solid(4, 2, [9, 8, 7]), Resolution::new(4, 2).unwrap()).unwrap();
    assert_eq!((out.width, out.height), (4, 2));
    assert!(out.data.chunks(3).all(|px| px == [9, 8, 7]));
}

#[test]
fn matching_aspect_is_stretched() {
    let out = fit_letterbox(&solid(8, 4, [200, 0, 0]), Resolution::new(4, 2).unwrap()).unwrap();
    assert_eq!(out.pixel(0, 0), [200, 0, 0]);
    assert_eq!(out.pixel(3, 1), [200, 0, 0]);
}

#[test]
fn wide_source_is_letterboxed() {
    // 4:1 into 16x16 -> 16x4 band centered vertically.
    let out = fit_letterbox(&solid(16, 4, [255, 255, 255]), Resolution::new(16, 16).unwrap())
        .unwrap();
    assert_eq!(out.pixel(8, 0), [0, 0, 0]);
    assert_eq!(out.pixel(8, 15), [0, 0, 0]);
    assert_eq!(out.pixel(8, 7), [255, 255, 255]);
}

#[test]
fn tall_source_is_pillarboxed() {
    let out = fit_letterbox(&solid(4, 16, [0, 255, 0]), Resolution::new(16, 16).unwrap())
        .unwrap();
    assert_eq!(out.pixel(0, 8), [0, 0, 0]);
    assert_eq!(out.pixel(15, 8), [0, 0, 0]);
    assert_eq!(out.pixel(7, 8), [0, 255, 0]);
}

#[test]
fn decodes_png_bytes() {
    let mut buf = Vec::new();
    solid(2, 2, [10, 20, 30])
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let out = decode_image(&buf, Resolution::new(2, 2).unwrap()).unwrap();
    assert_eq!(out.pixel(1, 1), [10, 20, 30]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image", Resolution::new(2, 2).unwrap()).is_err());
    assert!(load_image("/nonexistent/origami.png", Resolution::new(2, 2).unwrap()).is_err());
}
