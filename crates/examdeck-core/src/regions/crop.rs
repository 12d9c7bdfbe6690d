use image::DynamicImage;
use serde::Serialize;

use crate::regions::Region;

/// Crop rectangle in original-image pixel space (right/bottom exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceBounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SourceBounds {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Scale that fits a `width` x `height` image inside `max_width` x
/// `max_height` with its aspect ratio kept. Images that already fit keep
/// scale 1.0; they are never enlarged.
pub fn fit_scale(width: u32, height: u32, max_width: u32, max_height: u32) -> f64 {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return 1.0;
    }
    let sx = max_width as f64 / width as f64;
    let sy = max_height as f64 / height as f64;
    sx.min(sy)
}

/// Map a display-space region back to original pixels:
/// every edge is divided by `scale_factor` and floored.
pub fn source_bounds(region: &Region, scale_factor: f64) -> SourceBounds {
    let map = |v: u32| (v as f64 / scale_factor).floor().max(0.0) as u32;
    let rect = &region.rect;
    SourceBounds {
        left: map(rect.x),
        top: map(rect.y),
        right: map(rect.right()),
        bottom: map(rect.bottom()),
    }
}

/// Cut a region out of the full-resolution image.
///
/// Bounds reaching past the image edge are clipped to it.
pub fn crop(original: &DynamicImage, region: &Region, scale_factor: f64) -> DynamicImage {
    let bounds = source_bounds(region, scale_factor);
    let right = bounds.right.min(original.width());
    let bottom = bounds.bottom.min(original.height());
    let left = bounds.left.min(right);
    let top = bounds.top.min(bottom);

    if (right, bottom) != (bounds.right, bounds.bottom) {
        tracing::warn!(
            question = region.question_number,
            ?bounds,
            "region extends past the image, clipped"
        );
    }
    tracing::debug!(question = region.question_number, ?bounds, "cropping region");

    original.crop_imm(left, top, right - left, bottom - top)
}

/// Crop every region, in ascending question-number order.
pub fn crop_all(
    original: &DynamicImage,
    regions: &[Region],
    scale_factor: f64,
) -> Vec<(u32, DynamicImage)> {
    let mut sorted: Vec<&Region> = regions.iter().collect();
    sorted.sort_by_key(|r| r.question_number);
    sorted
        .into_iter()
        .map(|r| (r.question_number, crop(original, r, scale_factor)))
        .collect()
}
