//! Structured placement events, captured with a registry layer.

use std::sync::{Arc, Mutex};

use tipwire_core::logging::TARGET_PLACEMENT;
use tipwire_harness::{Harness, demo_page};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Default, Clone, PartialEq)]
struct PlacementRecord {
    message: String,
    chosen: Option<String>,
    fits: Option<bool>,
}

struct PlacementCapture {
    records: Arc<Mutex<Vec<PlacementRecord>>>,
}

impl<S> Layer<S> for PlacementCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != TARGET_PLACEMENT {
            return;
        }

        struct Visitor(PlacementRecord);

        impl tracing::field::Visit for Visitor {
            fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
                if field.name() == "fits" {
                    self.0.fits = Some(value);
                }
            }

            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "chosen" {
                    self.0.chosen = Some(value.to_owned());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                match field.name() {
                    "message" => self.0.message = format!("{value:?}"),
                    "chosen" => self.0.chosen = Some(format!("{value:?}")),
                    _ => {}
                }
            }
        }

        let mut visitor = Visitor(PlacementRecord::default());
        event.record(&mut visitor);
        self.records.lock().expect("capture lock").push(visitor.0);
    }
}

#[test]
fn each_frame_logs_one_positioning_decision() {
    let records = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(PlacementCapture {
        records: Arc::clone(&records),
    });
    let _guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();

    let (dom, page) = demo_page();
    let mut h = Harness::new(dom).expect("install");
    h.pointer_enter(page.corner);
    h.scroll_to(0.0, 5.0);
    h.scroll_to(0.0, 10.0);
    assert_eq!(h.run_frames(), 1);
    h.key("Escape");
    h.scroll_to(0.0, 15.0);
    assert_eq!(h.run_frames(), 0);

    let snapshot = records.lock().expect("capture lock").clone();
    let positioned: Vec<_> = snapshot
        .iter()
        .filter(|r| r.message == "tooltip positioned")
        .collect();
    assert_eq!(positioned.len(), 1, "{snapshot:?}");
    assert_eq!(positioned[0].chosen.as_deref(), Some("right"));
    assert_eq!(positioned[0].fits, Some(true));
}
