//! # Imaging Tests
//!
//! Integration tests for fitting, orientation flattening and the grayscale
//! filter as seen through the public API.


use experience_capture::imaging::{
    fit_size, flatten, load_image_from_memory, to_grayscale, BoundingBox, FitMode, ImageScaler,
    ImagingError, Orientation, RawImage, ResampleFilter, MAX_TARGET_DIMENSION,
};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::borrow::Cow;
use std::io::Cursor;
use test_helpers::{marker_image, solid_image};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_photo_into_portrait_box() {
        let scaler = ImageScaler::new();
        let img = solid_image(3000, 2000, [10, 20, 30]);

        let scaled = scaler.fit(&img, BoundingBox::new(300.0, 400.0)).unwrap();
        assert_eq!(scaled.original_dimensions, (3000, 2000));
        assert_eq!(scaled.new_dimensions, (300, 267));
        assert_eq!(scaled.image.dimensions(), (300, 267));
        assert_eq!(scaled.fit_mode, FitMode::CornerFit);
    }

    #[test]
    fn test_portrait_photo_is_pinned_to_box_height() {
        let (w, h) =
            fit_size((1000, 2000), BoundingBox::new(400.0, 400.0), FitMode::CornerFit).unwrap();
        assert_eq!(w, 200.0);
        assert_eq!(h, 400.0);
    }

    #[test]
    fn test_square_photo_fills_box() {
        let (w, h) =
            fit_size((500, 500), BoundingBox::new(320.0, 240.0), FitMode::CornerFit).unwrap();
        assert_eq!((w, h), (320.0, 240.0));
    }

    #[test]
    fn test_aspect_ratio_preserved_in_square_boxes() {
        for &(width, height) in &[(3000u32, 2000u32), (1200, 1600), (640, 480), (999, 333)] {
            let (w, h) =
                fit_size((width, height), BoundingBox::new(500.0, 500.0), FitMode::CornerFit)
                    .unwrap();
            let original = width as f64 / height as f64;
            assert!(((w / h) - original).abs() < 1e-9, "{}x{}", width, height);
            assert!(w <= 500.0 && h <= 500.0);
        }
    }

    #[test]
    fn test_contain_stays_inside_any_box() {
        let boxes = [(300.0, 400.0), (400.0, 300.0), (50.0, 1000.0), (1000.0, 50.0)];
        for &(bw, bh) in &boxes {
            for &dims in &[(3000u32, 2000u32), (2000, 3000), (100, 100)] {
                let (w, h) = fit_size(dims, BoundingBox::new(bw, bh), FitMode::Contain).unwrap();
                assert!(w <= bw + 1e-9 && h <= bh + 1e-9);
                let original = dims.0 as f64 / dims.1 as f64;
                assert!(((w / h) - original).abs() / original < 1e-6);
            }
        }
    }

    #[test]
    fn test_invalid_targets_rejected() {
        let scaler = ImageScaler::with_options(FitMode::Contain, ResampleFilter::Nearest);
        let img = solid_image(10, 10, [0, 0, 0]);

        for &(w, h) in &[(0.0, 100.0), (100.0, 0.0), (-5.0, 10.0), (f64::NAN, 10.0)] {
            let result = scaler.fit(&img, BoundingBox::new(w, h));
            assert!(
                matches!(result, Err(ImagingError::InvalidTarget { .. })),
                "box {}x{} should be rejected",
                w,
                h
            );
        }
    }

    #[test]
    fn test_fractional_boxes_never_overflow() {
        let viewports = [(187.25, 200.0), (200.0, 187.25), (100.3, 100.3), (333.7, 91.1)];
        let images = [(3000u32, 2000u32), (2000, 3000), (500, 500)];

        for mode in [FitMode::CornerFit, FitMode::Contain] {
            let scaler = ImageScaler::with_options(mode, ResampleFilter::Nearest);
            for &(vw, vh) in &viewports {
                let bbox = BoundingBox::from_viewport(vw, vh, 2.0);
                for &(w, h) in &images {
                    let img = solid_image(w, h, [0, 0, 0]);
                    let (nw, nh) = scaler.fit(&img, bbox).unwrap().new_dimensions;
                    assert!(
                        nw as f64 <= bbox.width && nh as f64 <= bbox.height,
                        "{:?} {}x{} in {:?} -> {}x{}",
                        mode,
                        w,
                        h,
                        bbox,
                        nw,
                        nh
                    );
                }
            }
        }
    }

    #[test]
    fn test_landscape_in_fractional_box_is_clamped() {
        let scaler = ImageScaler::new();
        let img = solid_image(3000, 2000, [0, 0, 0]);
        let bbox = BoundingBox::from_viewport(187.25, 200.0, 2.0);

        let scaled = scaler.fit(&img, bbox).unwrap();
        assert_eq!(scaled.new_dimensions, (374, 267));
    }

    #[test]
    fn test_oversized_box_rejected() {
        let scaler = ImageScaler::new();
        let img = solid_image(10, 10, [0, 0, 0]);

        let result = scaler.fit(&img, BoundingBox::new(1e9, 1e9));
        assert!(matches!(result, Err(ImagingError::InvalidTarget { .. })));

        let result = scaler.fit(&img, BoundingBox::new(MAX_TARGET_DIMENSION + 1.0, 100.0));
        assert!(matches!(result, Err(ImagingError::InvalidTarget { .. })));
    }

    #[test]
    fn test_tiny_targets_round_to_one_pixel() {
        let scaler = ImageScaler::new();
        let img = solid_image(4000, 10, [0, 0, 0]);
        let scaled = scaler.fit(&img, BoundingBox::new(10.0, 10.0)).unwrap();
        assert_eq!(scaled.new_dimensions, (10, 1));
    }

    #[test]
    fn test_flatten_every_orientation_is_idempotent() {
        let all = [
            Orientation::Up,
            Orientation::UpMirrored,
            Orientation::Down,
            Orientation::DownMirrored,
            Orientation::LeftMirrored,
            Orientation::Right,
            Orientation::RightMirrored,
            Orientation::Left,
        ];

        for orientation in all {
            let raw = RawImage::with_orientation(marker_image(6, 4), orientation);
            let once = flatten(&raw).into_owned();
            assert_eq!(once.orientation, Orientation::Up);

            let expected = if orientation.swaps_dimensions() {
                (4, 6)
            } else {
                (6, 4)
            };
            assert_eq!(once.image.dimensions(), expected, "{:?}", orientation);

            let twice = flatten(&once);
            assert!(matches!(twice, Cow::Borrowed(_)));
            assert_eq!(&*twice, &once);
        }
    }

    #[test]
    fn test_right_orientation_moves_marker_to_top_right() {
        let raw = RawImage::with_orientation(marker_image(6, 4), Orientation::Right);
        let upright = flatten(&raw).into_owned();
        let rgb = upright.image.to_rgb8();
        assert_eq!(rgb.get_pixel(3, 0).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_grayscale_output_has_equal_channels() {
        let img = solid_image(5, 5, [200, 100, 50]);
        let gray = to_grayscale(&img).unwrap();
        assert_eq!(gray.dimensions(), (5, 5));

        for (_, _, pixel) in gray.pixels() {
            let [r, g, b, _] = pixel.0;
            assert_eq!(r, g);
            assert_eq!(g, b);
        }
    }

    #[test]
    fn test_grayscale_of_empty_image_is_none() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(0, 0));
        assert!(to_grayscale(&img).is_none());
    }

    #[test]
    fn test_decoded_png_is_upright() {
        let mut bytes = Vec::new();
        solid_image(8, 3, [1, 2, 3])
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let raw = load_image_from_memory(&bytes).unwrap();
        assert_eq!(raw.orientation, Orientation::Up);
        assert_eq!(raw.dimensions(), (8, 3));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = load_image_from_memory(b"definitely not an image");
        assert!(result.is_err());
    }
}
