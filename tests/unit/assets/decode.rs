use std::io::Cursor;

use super::*;

fn encode(img: image::DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();
    let buf = encode(
        image::DynamicImage::ImageRgba8(img),
        image::ImageFormat::Png,
    );

    let prepared = decode_image(&buf, ArtFormat::Png).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_jpeg_is_opaque() {
    let img = image::RgbImage::from_pixel(8, 6, image::Rgb([20, 40, 60]));
    let buf = encode(image::DynamicImage::ImageRgb8(img), image::ImageFormat::Jpeg);

    let prepared = decode_image(&buf, ArtFormat::Jpeg).unwrap();
    assert_eq!((prepared.width, prepared.height), (8, 6));
    assert!(prepared.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn format_comes_from_extension() {
    assert_eq!(
        ArtFormat::from_path(Path::new("clock/hour.png")).unwrap(),
        ArtFormat::Png
    );
    assert_eq!(
        ArtFormat::from_path(Path::new("clock/left.jpg")).unwrap(),
        ArtFormat::Jpeg
    );
    assert_eq!(
        ArtFormat::from_path(Path::new("clock/LEFT.JPEG")).unwrap(),
        ArtFormat::Jpeg
    );
    assert!(matches!(
        ArtFormat::from_path(Path::new("clock/hour.gif")),
        Err(ClockError::Asset(_))
    ));
    assert!(ArtFormat::from_path(Path::new("clock/hour")).is_err());
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not a png", ArtFormat::Png).is_err());
}

#[test]
fn missing_file_is_an_asset_error() {
    let err = load_image(Path::new("/nonexistent/steamclock/hour.png")).unwrap_err();
    assert!(matches!(err, ClockError::Asset(_)));
}

#[test]
fn transparent_pixels_premultiply_to_zero() {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([250, 120, 30, 0]));
    let buf = encode(image::DynamicImage::ImageRgba8(img), image::ImageFormat::Png);

    let prepared = decode_image(&buf, ArtFormat::Png).unwrap();
    assert!(prepared.rgba8_premul.iter().all(|&b| b == 0));
}
