use image::{Rgb, RgbImage, imageops};
use stencil_core::*;

fn options(width_cm: f64, height_cm: f64) -> StencilOptions {
    StencilOptions {
        target_width_cm: width_cm,
        target_height_cm: height_cm,
        ..Default::default()
    }
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

#[test]
fn test_grid_counts_cover_target() {
    let cases = [
        (21.0, 29.7, Orientation::Portrait, 1, 1),
        (50.0, 50.0, Orientation::Portrait, 3, 2),
        (50.0, 50.0, Orientation::Landscape, 2, 3),
        (42.0, 59.4, Orientation::Portrait, 2, 2),
        (21.5, 10.0, Orientation::Portrait, 2, 1),
        (100.0, 250.0, Orientation::Portrait, 5, 9),
    ];

    for (width, height, orientation, cols, rows) in cases {
        let mut opts = options(width, height);
        opts.orientation = orientation;
        let plan = plan_layout(&opts, 10, &RenderLimits::default()).unwrap();

        let (page_w, page_h) = orientation.page_size_cm();
        assert_eq!(plan.cols, (width / page_w).ceil() as usize, "{width}×{height}");
        assert_eq!(plan.rows, (height / page_h).ceil() as usize, "{width}×{height}");
        assert_eq!((plan.cols, plan.rows), (cols, rows));
        assert_eq!(plan.page_count(), cols * rows);
    }
}

#[test]
fn test_single_page_scenario_pixel_sizes() {
    let plan = plan_layout(&options(21.0, 29.7), 300, &RenderLimits::default()).unwrap();
    assert_eq!(plan.page_count(), 1);
    assert_eq!(plan.page_px, (2480, 3507));
}

#[test]
fn test_preview_and_final_share_conversion() {
    let opts = options(50.0, 50.0);
    let final_plan = plan_layout(&opts, 300, &RenderLimits::default()).unwrap();
    let preview_plan = plan_layout(&opts, 150, &RenderLimits::default()).unwrap();

    assert_eq!((final_plan.cols, final_plan.rows), (preview_plan.cols, preview_plan.rows));
    assert_eq!(final_plan.canvas_px, (5905, 5905));
    assert_eq!(preview_plan.canvas_px, (2952, 2952));
    assert_eq!(preview_plan.page_px, (1240, 1753));
}

#[test]
fn test_margin_invariant_holds() {
    let cases = [
        (30.0, 30.0, 2.0, 2.0),
        (30.0, 30.0, 0.0, 0.0),
        (12.3, 45.6, 3.3, 7.7),
        (10.0, 10.0, 4.99, 4.99),
        (10.0, 10.0, 5.0, 20.0),
        (84.0, 59.4, 10.5, 0.25),
    ];

    for dpi in [150, 300] {
        for (width, height, mx, my) in cases {
            let mut opts = options(width, height);
            opts.margins = Some(MarginSpec::new(mx, my));
            let plan = plan_layout(&opts, dpi, &RenderLimits::default()).unwrap();
            let margins = plan.margins.unwrap();

            let (canvas_w, canvas_h) = plan.canvas_px;
            assert!(margins.inner_px.0 + 2 * margins.offset_px.0 <= canvas_w);
            assert!(margins.inner_px.1 + 2 * margins.offset_px.1 <= canvas_h);
            assert!(margins.inner_px.0 >= 1 && margins.inner_px.1 >= 1);

            let content = plan.content_rect();
            assert!(content.right() <= canvas_w && content.bottom() <= canvas_h);
        }
    }
}

#[test]
fn test_clamp_floor_is_flagged() {
    let mut opts = options(30.0, 30.0);
    opts.margins = Some(MarginSpec::uniform(2.0));
    let plan = plan_layout(&opts, 300, &RenderLimits::default()).unwrap();
    assert!(!plan.margins.unwrap().inner_clamped);

    opts.margins = Some(MarginSpec::uniform(15.0));
    let plan = plan_layout(&opts, 300, &RenderLimits::default()).unwrap();
    assert!(plan.margins.unwrap().inner_clamped);
}

#[test]
fn test_every_page_has_page_size() {
    let plan = plan_layout(&options(47.0, 33.0), 20, &RenderLimits::default()).unwrap();
    let mural = compose_mural(&gradient(64, 48), &plan, &RenderProfile::FINAL);

    let mut collector = TileCollector::new();
    let count = emit_tiles(&mural, &plan, &mut collector).unwrap();

    assert_eq!(count, plan.page_count());
    assert_eq!(collector.pages.len(), plan.rows * plan.cols);
    for (_, page) in &collector.pages {
        assert_eq!(page.dimensions(), plan.page_px);
    }
}

#[test]
fn test_tiles_reassemble_into_mural() {
    let mut opts = options(50.0, 50.0);
    opts.margins = Some(MarginSpec::new(3.0, 1.5));
    let plan = plan_layout(&opts, 40, &RenderLimits::default()).unwrap();
    let mural = compose_mural(&gradient(120, 90), &plan, &RenderProfile::FINAL);

    let mut collector = TileCollector::new();
    emit_tiles(&mural, &plan, &mut collector).unwrap();

    let (page_w, page_h) = plan.page_px;
    let mut sheet = RgbImage::new(page_w * plan.cols as u32, page_h * plan.rows as u32);
    for (pos, page) in &collector.pages {
        imageops::replace(
            &mut sheet,
            page,
            (pos.col as u32 * page_w) as i64,
            (pos.row as u32 * page_h) as i64,
        );
    }

    let (canvas_w, canvas_h) = plan.canvas_px;
    let restored = imageops::crop_imm(&sheet, 0, 0, canvas_w, canvas_h).to_image();
    assert_eq!(restored, mural);

    // Everything past the mural edge is blank paper
    for (x, y, pixel) in sheet.enumerate_pixels() {
        if x >= canvas_w || y >= canvas_h {
            assert_eq!(*pixel, Rgb([255, 255, 255]), "({x}, {y})");
        }
    }
}

#[test]
fn test_bottom_border_survives_tiling_at_page_multiples() {
    // At 40 DPI 59.4 cm truncates one pixel past two 29.7 cm pages
    let mut opts = options(42.0, 59.4);
    opts.margins = Some(MarginSpec::uniform(2.0));
    let plan = plan_layout(&opts, 40, &RenderLimits::default()).unwrap();
    assert_eq!(plan.page_px, (330, 467));
    assert_eq!(plan.canvas_px, (660, 934));

    let mural = compose_mural(&gradient(80, 110), &plan, &RenderProfile::FINAL);
    let mut collector = TileCollector::new();
    emit_tiles(&mural, &plan, &mut collector).unwrap();

    let covered: u64 = plan.tiles().map(|pos| plan.tile_bounds(pos).area()).sum();
    assert_eq!(covered, mural.width() as u64 * mural.height() as u64);

    // Last mural row is the canvas border, found on the final row of every bottom tile
    let (page_w, page_h) = plan.page_px;
    for (pos, page) in collector.pages.iter().filter(|(pos, _)| pos.row == plan.rows - 1) {
        for x in 0..page_w {
            assert_eq!(*page.get_pixel(x, page_h - 1), Rgb([0, 0, 0]), "{:?} x={x}", pos);
        }
    }
}

#[test]
fn test_mural_is_deterministic() {
    let mut opts = options(33.0, 21.0);
    opts.margins = Some(MarginSpec::uniform(1.0));
    let plan = plan_layout(&opts, 60, &RenderLimits::default()).unwrap();
    let source = apply_filter(gradient(90, 70), FilterKind::Outline);

    let first = compose_mural(&source, &plan, &RenderProfile::FINAL);
    let second = compose_mural(&source, &plan, &RenderProfile::FINAL);
    assert_eq!(first, second);
}
