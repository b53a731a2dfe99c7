#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tipwire_core::{Placement, PlacementConfig, PlacementEngine, PlacementRequest, Rect, Size};

#[derive(Debug, Arbitrary)]
struct Input {
    anchor: (i16, i16, u16, u16),
    tooltip: (u16, u16),
    viewport: (u16, u16),
    preferred: u8,
    gap: u8,
    padding: u8,
}

fuzz_target!(|input: Input| {
    let preferred = match input.preferred % 4 {
        0 => Placement::Top,
        1 => Placement::Right,
        2 => Placement::Bottom,
        _ => Placement::Left,
    };
    let (ax, ay, aw, ah) = input.anchor;
    let request = PlacementRequest {
        anchor: Rect::new(f64::from(ax), f64::from(ay), f64::from(aw), f64::from(ah)),
        tooltip: Size::new(f64::from(input.tooltip.0), f64::from(input.tooltip.1)),
        viewport: Size::new(f64::from(input.viewport.0), f64::from(input.viewport.1)),
        preferred,
    };
    let engine = PlacementEngine::new(PlacementConfig {
        gap: f64::from(input.gap),
        edge_padding: f64::from(input.padding),
    });

    let outcome = engine.resolve(&request);

    // Clamping never resizes and never produces NaN.
    assert_eq!(outcome.rect.width, request.tooltip.width);
    assert_eq!(outcome.rect.height, request.tooltip.height);
    assert!(outcome.rect.x.is_finite() && outcome.rect.y.is_finite());

    // A fitting outcome is the first fitting candidate in search order.
    let first_fit = engine
        .candidates(&request)
        .into_iter()
        .find(|c| c.rect.fits_within(request.viewport));
    assert_eq!(outcome.fits, first_fit.is_some());
    if let Some(candidate) = first_fit {
        assert_eq!(outcome.placement, candidate.placement);
        assert_eq!(outcome.candidate, candidate.rect);
    }

    // When the padded viewport has room, the result stays inside it.
    let pad = f64::from(input.padding);
    if request.tooltip.width + 2.0 * pad <= request.viewport.width {
        assert!(outcome.rect.x >= pad);
        assert!(outcome.rect.right() <= request.viewport.width - pad);
    }
    if request.tooltip.height + 2.0 * pad <= request.viewport.height {
        assert!(outcome.rect.y >= pad);
        assert!(outcome.rect.bottom() <= request.viewport.height - pad);
    }
});
