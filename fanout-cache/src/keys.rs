//! Key namespace shared with the delivery workers.

pub const SUBSCRIBE_FORM_PREFIX: &str = "subscribeform:";
pub const DIST_ID_PREFIX: &str = "dist:id:";
pub const DIST_QUEUE_PREFIX: &str = "dist:queue:";
pub const DIST_DONE_PREFIX: &str = "dist:done:";
pub const DIST_CALLBACK_COUNT_PREFIX: &str = "dist:callback-count:";

/// Broadcast channel carrying `"<kind><json>"` change notifications.
pub const PROCESS_CHANNEL: &str = "event:process";

pub const COUNT_TOTAL_FIELD: &str = "total";
// Misspelled on the worker side, kept as is.
pub const COUNT_FAILURE_FIELD: &str = "failue";

pub fn subscribe_form(event_type: &str) -> String {
    format!("{SUBSCRIBE_FORM_PREFIX}{event_type}")
}

pub fn callback_count(subscription_id: i64) -> String {
    format!("{DIST_CALLBACK_COUNT_PREFIX}{subscription_id}")
}

/// Queue, in-flight and done markers a worker keeps for one subscriber.
pub fn delivery_state(subscription_id: i64) -> Vec<String> {
    [DIST_ID_PREFIX, DIST_QUEUE_PREFIX, DIST_DONE_PREFIX]
        .iter()
        .map(|prefix| format!("{prefix}{subscription_id}"))
        .collect()
}
