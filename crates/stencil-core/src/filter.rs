//! Visual transforms applied to the source image

use image::{DynamicImage, GrayImage, RgbImage, imageops};

use crate::types::FilterKind;

/// 3×3 Laplacian edge kernel
const FIND_EDGES_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Apply a filter, always returning a 3-channel image
pub fn apply_filter(image: RgbImage, kind: FilterKind) -> RgbImage {
    match kind {
        FilterKind::None => image,
        FilterKind::Grayscale => expand_luma(imageops::grayscale(&image)),
        FilterKind::Outline => expand_luma(outline(&image)),
    }
}

/// Dark edges on a light background
fn outline(image: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(image);
    let mut edges = imageops::filter3x3(&gray, &FIND_EDGES_KERNEL);
    imageops::invert(&mut edges);
    edges
}

fn expand_luma(luma: GrayImage) -> RgbImage {
    DynamicImage::ImageLuma8(luma).to_rgb8()
}
