//! # Orientation Normalization
//!
//! Re-renders pixel data so that it displays upright without consulting the
//! orientation tag, e.g. for photos taken with a rotated camera.

use std::borrow::Cow;

use image::DynamicImage;

use super::types::{Orientation, RawImage};

/// Renders `raw` upright.
///
/// Images already tagged `Up` are returned borrowed; anything else is re-rendered
/// into a new image tagged `Up`, so flattening twice is the same as flattening once.
///
/// # Examples
///
/// ```
/// use experience_capture::imaging::{flatten, Orientation, RawImage};
/// use image::{DynamicImage, GenericImageView, RgbImage};
/// use std::borrow::Cow;
///
/// let raw = RawImage::with_orientation(
///     DynamicImage::ImageRgb8(RgbImage::new(4, 2)),
///     Orientation::Right,
/// );
/// let upright = flatten(&raw);
/// assert_eq!(upright.orientation, Orientation::Up);
/// assert_eq!(upright.image.dimensions(), (2, 4));
/// assert!(matches!(flatten(&upright), Cow::Borrowed(_)));
/// ```
pub fn flatten(raw: &RawImage) -> Cow<'_, RawImage> {
    if raw.orientation == Orientation::Up {
        return Cow::Borrowed(raw);
    }

    let image = render_upright(&raw.image, raw.orientation);

    tracing::debug!(
        target: "imaging",
        orientation = ?raw.orientation,
        "Flattened image orientation"
    );

    Cow::Owned(RawImage::upright(image))
}

/// Applies the transform that makes pixels stored with `orientation` display upright.
pub fn render_upright(image: &DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Up => image.clone(),
        Orientation::UpMirrored => image.fliph(),
        Orientation::Down => image.rotate180(),
        Orientation::DownMirrored => image.flipv(),
        Orientation::LeftMirrored => image.rotate90().fliph(),
        Orientation::Right => image.rotate90(),
        Orientation::RightMirrored => image.rotate270().fliph(),
        Orientation::Left => image.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    /// 3x2 image with a single red pixel at the top-left corner.
    fn marked_image() -> DynamicImage {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, RED);
        DynamicImage::ImageRgb8(img)
    }

    fn red_position(image: &DynamicImage) -> (u32, u32) {
        let rgb = image.to_rgb8();
        rgb.enumerate_pixels()
            .find(|(_, _, p)| **p == RED)
            .map(|(x, y, _)| (x, y))
            .unwrap()
    }

    #[test]
    fn test_up_is_borrowed() {
        let raw = RawImage::upright(marked_image());
        assert!(matches!(flatten(&raw), Cow::Borrowed(_)));
    }

    #[test]
    fn test_marker_positions_for_each_tag() {
        let cases = [
            (Orientation::UpMirrored, (3, 2), (2, 0)),
            (Orientation::Down, (3, 2), (2, 1)),
            (Orientation::DownMirrored, (3, 2), (0, 1)),
            (Orientation::LeftMirrored, (2, 3), (0, 0)),
            (Orientation::Right, (2, 3), (1, 0)),
            (Orientation::RightMirrored, (2, 3), (1, 2)),
            (Orientation::Left, (2, 3), (0, 2)),
        ];

        for (orientation, dims, marker) in cases {
            let raw = RawImage::with_orientation(marked_image(), orientation);
            let flat = flatten(&raw);
            assert_eq!(flat.orientation, Orientation::Up, "{:?}", orientation);
            assert_eq!(flat.image.dimensions(), dims, "{:?}", orientation);
            assert_eq!(red_position(&flat.image), marker, "{:?}", orientation);
            assert_eq!(
                orientation.swaps_dimensions(),
                dims.0 != 3,
                "{:?}",
                orientation
            );
        }
    }

    #[test]
    fn test_flatten_is_idempotent() {
        for value in 1..=8u8 {
            let orientation = Orientation::from_exif(value).unwrap();
            let raw = RawImage::with_orientation(marked_image(), orientation);
            let once = flatten(&raw).into_owned();
            let twice = flatten(&once).into_owned();
            assert_eq!(once, twice);
        }
    }
}
