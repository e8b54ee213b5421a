use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("twinchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("twinchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("twinchat.client.request_duration_seconds");

pub(crate) static WIDGET_TURNS: Counter = Counter::new("twinchat.widget.turns");
pub(crate) static WIDGET_TURN_FAILURES: Counter = Counter::new("twinchat.widget.turn_failures");
pub(crate) static WIDGET_TURNS_IGNORED: Counter = Counter::new("twinchat.widget.turns_ignored");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&WIDGET_TURNS);
    collector.register_counter(&WIDGET_TURN_FAILURES);
    collector.register_counter(&WIDGET_TURNS_IGNORED);
}
