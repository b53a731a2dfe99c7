//! Property-based invariant tests for the placement engine.
//!
//! 1. If any side fits, the chosen candidate is fully inside the viewport.
//! 2. If one fits, it is the first fitting side in candidate order.
//! 3. If none fits, the chosen candidate has maximal visible area and is the
//!    first candidate reaching it.
//! 4. Clamping keeps the padding whenever the padded viewport is large enough.
//! 5. Resolution is deterministic.
//! 6. Clamping never moves a fitting candidate that already respects padding.

use proptest::prelude::*;
use tipwire_core::geometry::{Rect, Size};
use tipwire_core::placement::{Placement, PlacementEngine, PlacementRequest, candidate_order};

// ── Strategies ──────────────────────────────────────────────────────────

fn placement_strategy() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::Top),
        Just(Placement::Right),
        Just(Placement::Bottom),
        Just(Placement::Left),
    ]
}

fn request_strategy() -> impl Strategy<Value = PlacementRequest> {
    (
        100.0f64..2000.0,
        100.0f64..1500.0,
        -200.0f64..2200.0,
        -200.0f64..1700.0,
        0.0f64..300.0,
        0.0f64..200.0,
        1.0f64..400.0,
        1.0f64..200.0,
        placement_strategy(),
    )
        .prop_map(|(vw, vh, ax, ay, aw, ah, tw, th, preferred)| PlacementRequest {
            anchor: Rect::new(ax, ay, aw, ah),
            tooltip: Size::new(tw, th),
            viewport: Size::new(vw, vh),
            preferred,
        })
}

proptest! {
    #[test]
    fn fitting_choice_is_contained(req in request_strategy()) {
        let engine = PlacementEngine::default();
        let candidates = engine.candidates(&req);
        let outcome = engine.resolve(&req);

        let any_fits = candidates.iter().any(|c| c.rect.fits_within(req.viewport));
        prop_assert_eq!(outcome.fits, any_fits);
        if any_fits {
            prop_assert!(outcome.candidate.fits_within(req.viewport));
            let first = candidates
                .iter()
                .find(|c| c.rect.fits_within(req.viewport))
                .map(|c| c.placement);
            prop_assert_eq!(Some(outcome.placement), first);
        }
    }

    #[test]
    fn fallback_maximizes_visible_area(req in request_strategy()) {
        let engine = PlacementEngine::default();
        let candidates = engine.candidates(&req);
        prop_assume!(!candidates.iter().any(|c| c.rect.fits_within(req.viewport)));

        let outcome = engine.resolve(&req);
        let areas: Vec<f64> = candidates
            .iter()
            .map(|c| c.rect.visible_area(req.viewport))
            .collect();
        let best = areas.iter().copied().fold(f64::MIN, f64::max);
        let first_best = candidates[areas.iter().position(|a| *a == best).unwrap()].placement;

        prop_assert_eq!(outcome.candidate.visible_area(req.viewport), best);
        prop_assert_eq!(outcome.placement, first_best);
    }

    #[test]
    fn clamp_respects_padding_when_room(req in request_strategy()) {
        let engine = PlacementEngine::default();
        let pad = engine.config().edge_padding;
        let outcome = engine.resolve(&req);

        if req.tooltip.width + 2.0 * pad <= req.viewport.width {
            prop_assert!(outcome.rect.x >= pad);
            prop_assert!(outcome.rect.right() <= req.viewport.width - pad + 1e-9);
        }
        if req.tooltip.height + 2.0 * pad <= req.viewport.height {
            prop_assert!(outcome.rect.y >= pad);
            prop_assert!(outcome.rect.bottom() <= req.viewport.height - pad + 1e-9);
        }
        prop_assert_eq!(outcome.rect.size(), req.tooltip);
    }

    #[test]
    fn resolution_is_deterministic(req in request_strategy()) {
        let engine = PlacementEngine::default();
        prop_assert_eq!(engine.resolve(&req), engine.resolve(&req));
    }

    #[test]
    fn candidate_order_is_a_permutation(preferred in placement_strategy()) {
        let order = candidate_order(preferred);
        prop_assert_eq!(order[0], preferred);
        for side in Placement::FALLBACK_ORDER {
            prop_assert_eq!(order.iter().filter(|p| **p == side).count(), 1);
        }
    }
}

#[test]
fn padded_fit_is_not_moved_by_clamp() {
    let engine = PlacementEngine::default();
    let req = PlacementRequest {
        anchor: Rect::new(400.0, 300.0, 80.0, 24.0),
        tooltip: Size::new(120.0, 28.0),
        viewport: Size::new(1024.0, 768.0),
        preferred: Placement::Top,
    };
    let outcome = engine.resolve(&req);
    assert!(outcome.fits);
    assert_eq!(outcome.rect, outcome.candidate);
}
