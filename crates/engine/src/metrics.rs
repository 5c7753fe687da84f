//! Conversation counters.
//!
//! Thin wrappers over the `metrics` facade so call sites stay one line
//! and the counter names live in one place. The exporter is installed by
//! the server binary; without one these are no-ops.

pub(crate) fn record_message_received() {
    metrics::counter!("balcao_messages_received_total").increment(1);
}

pub(crate) fn record_message_dropped(reason: &'static str) {
    metrics::counter!("balcao_messages_dropped_total", "reason" => reason).increment(1);
}

pub(crate) fn record_session_created() {
    metrics::counter!("balcao_sessions_created_total").increment(1);
}

pub(crate) fn record_session_closed() {
    metrics::counter!("balcao_sessions_closed_total").increment(1);
}

pub(crate) fn record_handoff() {
    metrics::counter!("balcao_handoffs_total").increment(1);
}

pub(crate) fn record_ticket_created() {
    metrics::counter!("balcao_tickets_created_total").increment(1);
}

pub(crate) fn record_rating_recorded() {
    metrics::counter!("balcao_ratings_recorded_total").increment(1);
}

pub(crate) fn record_catalog_search(found: bool) {
    let result = if found { "hit" } else { "miss" };
    metrics::counter!("balcao_catalog_searches_total", "result" => result).increment(1);
}

pub(crate) fn record_stage_recovery() {
    metrics::counter!("balcao_stage_recoveries_total").increment(1);
}
