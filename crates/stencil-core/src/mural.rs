//! Mural composition
//!
//! Builds the single full-resolution raster that the page tiles are cut from.

use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::constants::{BACKGROUND, BORDER_COLOR};
use crate::layout::{LayoutPlan, PixelRect};
use crate::options::RenderProfile;

/// Resize the image into the planned content area of a blank canvas.
///
/// Without margins the image is stretched to the whole canvas (aspect ratio is
/// not preserved). With margins it fills the inner area, and both the canvas
/// edge and the content edge get a black stroke of `profile.border_width_px`.
pub fn compose_mural(image: &RgbImage, plan: &LayoutPlan, profile: &RenderProfile) -> RgbImage {
    let (canvas_w, canvas_h) = plan.canvas_px;
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, Rgb(BACKGROUND));

    let content = plan.content_rect();
    let resized = imageops::resize(
        image,
        content.width,
        content.height,
        imageops::FilterType::Lanczos3,
    );
    imageops::replace(&mut canvas, &resized, content.x as i64, content.y as i64);

    if plan.margins.is_some() {
        let border = Rgb(BORDER_COLOR);
        let full = PixelRect::new(0, 0, canvas_w, canvas_h);
        stroke_rect(&mut canvas, full, profile.border_width_px, border);
        stroke_rect(&mut canvas, content, profile.border_width_px, border);
    }

    canvas
}

/// Draw a rectangle outline of `width` pixels, inside the rectangle bounds
pub(crate) fn stroke_rect(canvas: &mut RgbImage, rect: PixelRect, width: u32, color: Rgb<u8>) {
    if rect.is_empty() || width == 0 {
        return;
    }
    let w = width.min(rect.width).min(rect.height);

    // Top, bottom, left, right
    fill_rect(canvas, PixelRect::new(rect.x, rect.y, rect.width, w), color);
    fill_rect(canvas, PixelRect::new(rect.x, rect.bottom() - w, rect.width, w), color);
    fill_rect(canvas, PixelRect::new(rect.x, rect.y, w, rect.height), color);
    fill_rect(canvas, PixelRect::new(rect.right() - w, rect.y, w, rect.height), color);
}

/// Fill a rectangle, clipped to the canvas
pub(crate) fn fill_rect(canvas: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
    let right = rect.right().min(canvas.width());
    let bottom = rect.bottom().min(canvas.height());
    if rect.x >= right || rect.y >= bottom {
        return;
    }
    let area = Rect::at(rect.x as i32, rect.y as i32).of_size(right - rect.x, bottom - rect.y);
    draw_filled_rect_mut(canvas, area, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::plan_layout;
    use crate::options::{RenderLimits, StencilOptions};
    use crate::types::MarginSpec;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn assert_green(pixel: &Rgb<u8>) {
        assert_eq!(pixel[0], 0);
        assert!(pixel[1].abs_diff(200) <= 1, "expected green, got {:?}", pixel);
    }

    fn plan(width_cm: f64, height_cm: f64, margins: Option<MarginSpec>) -> LayoutPlan {
        let options = StencilOptions {
            target_width_cm: width_cm,
            target_height_cm: height_cm,
            margins,
            ..Default::default()
        };
        plan_layout(&options, 50, &RenderLimits::default()).unwrap()
    }

    #[test]
    fn test_image_stretched_to_canvas_without_margins() {
        let plan = plan(20.0, 10.0, None);
        let green = RgbImage::from_pixel(10, 10, Rgb([0, 200, 0]));
        let mural = compose_mural(&green, &plan, &RenderProfile::FINAL);

        assert_eq!(mural.dimensions(), plan.canvas_px);
        assert_green(mural.get_pixel(0, 0));
        let (w, h) = plan.canvas_px;
        assert_green(mural.get_pixel(w - 1, h - 1));
    }

    #[test]
    fn test_margins_draw_both_borders() {
        let plan = plan(30.0, 30.0, Some(MarginSpec::uniform(2.0)));
        let margins = plan.margins.unwrap();
        let green = RgbImage::from_pixel(8, 8, Rgb([0, 200, 0]));
        let mural = compose_mural(&green, &plan, &RenderProfile::FINAL);

        let (ox, oy) = margins.offset_px;
        let (iw, ih) = margins.inner_px;

        // Outer border
        assert_eq!(*mural.get_pixel(0, 0), BLACK);
        assert_eq!(*mural.get_pixel(1, 10), BLACK);
        // Margin area stays white
        assert_eq!(*mural.get_pixel(ox / 2, oy / 2), WHITE);
        // Inner border
        assert_eq!(*mural.get_pixel(ox, oy + ih / 2), BLACK);
        assert_eq!(*mural.get_pixel(ox + iw - 1, oy + ih / 2), BLACK);
        // Content
        assert_green(mural.get_pixel(ox + iw / 2, oy + ih / 2));
    }

    #[test]
    fn test_stroke_clipped_to_canvas() {
        let mut canvas = RgbImage::from_pixel(4, 4, WHITE);
        stroke_rect(&mut canvas, PixelRect::new(2, 2, 10, 10), 1, BLACK);
        assert_eq!(*canvas.get_pixel(2, 3), BLACK);
        assert_eq!(*canvas.get_pixel(3, 2), BLACK);
        assert_eq!(*canvas.get_pixel(1, 1), WHITE);
    }

    #[test]
    fn test_composition_is_deterministic() {
        let plan = plan(25.0, 12.0, Some(MarginSpec::new(1.0, 0.5)));
        let image = RgbImage::from_fn(31, 17, |x, y| Rgb([(x * 8) as u8, (y * 15) as u8, 90]));

        let first = compose_mural(&image, &plan, &RenderProfile::PREVIEW);
        let second = compose_mural(&image, &plan, &RenderProfile::PREVIEW);
        assert_eq!(first, second);
    }
}
