//! Teardown, frame scheduling failures and log output.

use tipwire::{TooltipController, TooltipEvent, Transition};
use tipwire_harness::{Harness, MemoryDom, demo_page, dynamic_span};
use tracing_test::traced_test;

#[test]
fn unload_stops_observing_exactly_once() {
    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");

    assert_eq!(h.unload(), Transition::TornDown);
    assert_eq!(h.dom().stop_calls(), 1);
    assert_eq!(h.dom().observed_root(), None);
    assert!(h.controller().is_torn_down());

    assert_eq!(h.unload(), Transition::Ignored);
    assert!(!h.controller_mut().teardown());
    assert_eq!(h.dom().stop_calls(), 1);

    // Insertions after teardown are no longer reported or normalised.
    let span = dynamic_span(h.dom_mut());
    assert_eq!(h.append_child(page.container, span), Transition::Ignored);
    assert_eq!(h.dom().attr(span, "tabindex"), None);
}

#[test]
fn events_after_teardown_are_ignored() {
    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");
    h.controller_mut().teardown();

    assert_eq!(h.pointer_enter(page.save), Transition::Ignored);
    assert_eq!(h.focus_in(page.corner), Transition::Ignored);
    assert_eq!(h.key("Escape"), Transition::Ignored);
    assert_eq!(
        h.dispatch(TooltipEvent::NodesInserted(vec![page.plain])),
        Transition::Ignored
    );
    assert!(!h.controller().is_visible());
}

#[test]
fn teardown_hides_a_visible_tooltip() {
    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");
    h.pointer_enter(page.save);

    assert!(h.controller_mut().teardown());
    assert!(!h.controller().is_visible());
    assert_eq!(h.dom().attr(page.save, "aria-describedby"), None);
    assert_eq!(h.surface_attr("aria-hidden"), Some("true"));

    // The frame requested by the show still fires, harmlessly.
    assert_eq!(h.run_frame(), None);
}

#[test]
fn drop_tears_down_once() {
    let (mut dom, page) = demo_page();
    {
        let mut controller =
            TooltipController::install_with_seed(&mut dom, Default::default(), 1)
                .expect("install");
        controller.handle(TooltipEvent::PointerEnter { target: page.save });
        assert!(controller.is_visible());
    }
    assert_eq!(dom.stop_calls(), 1);
    assert_eq!(dom.attr(page.save, "aria-describedby"), None);

    {
        let mut controller =
            TooltipController::install_with_seed(&mut dom, Default::default(), 2)
                .expect("install");
        assert!(controller.teardown());
    }
    assert_eq!(dom.stop_calls(), 2);
    assert_eq!(dom.observe_calls(), 2);
}

#[test]
fn install_uses_distinct_ids_for_distinct_seeds() {
    let a = TooltipController::install_with_seed(MemoryDom::new(), Default::default(), 1)
        .expect("install");
    let b = TooltipController::install_with_seed(MemoryDom::new(), Default::default(), 2)
        .expect("install");
    assert_ne!(a.surface().id(), b.surface().id());

    let c = TooltipController::install(MemoryDom::new(), Default::default()).expect("install");
    assert!(c.surface().id().starts_with("tooltip-"));
}

#[traced_test]
#[test]
fn failed_frame_request_positions_synchronously() {
    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");
    h.dom_mut().fail_frame_requests(true);

    assert_eq!(h.pointer_enter(page.save), Transition::Shown);
    assert!(!h.controller().frame_pending());
    assert_eq!(h.dom().pending_frames(), 0);
    assert_eq!(h.dom().style_of(h.surface(), "left"), Some("481px"));
    assert_eq!(h.dom().style_of(h.surface(), "top"), Some("328px"));
    assert!(logs_contain("frame request failed"));

    // Recovery: once frames work again, scheduling goes back to normal.
    h.dom_mut().fail_frame_requests(false);
    assert_eq!(h.scroll_to(0.0, 10.0), Transition::Scheduled);
    assert!(h.controller().frame_pending());
    assert_eq!(h.run_frames(), 1);
    assert_eq!(h.dom().style_of(h.surface(), "top"), Some("338px"));
}

#[traced_test]
#[test]
fn lifecycle_is_logged() {
    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");
    h.pointer_enter(page.save);
    h.run_frame();
    h.key("Escape");
    h.unload();

    assert!(logs_contain("tooltip controller installed"));
    assert!(logs_contain("tooltip shown"));
    assert!(logs_contain("tooltip positioned"));
    assert!(logs_contain("tooltip hidden"));
    assert!(logs_contain("tooltip controller torn down"));
}
