//! Extraction metrics
//!
//! Counters are emitted through the `metrics` facade. Nothing is recorded
//! unless the host installs a recorder.

use metrics::counter;

/// Records extracted and forwarded to a sink, labelled by `kind`
pub const RECORDS_EXTRACTED: &str = "line_artifacts_records_extracted_total";
/// Extraction passes that ended early, labelled by `kind` and `class`
pub const PASS_FAILURES: &str = "line_artifacts_pass_failures_total";
/// Notifications that failed for stored records, labelled by `kind`
pub const NOTIFICATION_FAILURES: &str = "line_artifacts_notification_failures_total";
/// Databases discovered, labelled by `kind`
pub const DATABASES: &str = "line_artifacts_databases_total";

/// Count one record forwarded to the sink
pub fn record_extracted(kind: &'static str) {
    counter!(RECORDS_EXTRACTED, "kind" => kind).increment(1);
}

/// Count a pass that was aborted
pub fn record_pass_failure(kind: &'static str, class: &'static str) {
    counter!(PASS_FAILURES, "kind" => kind, "class" => class).increment(1);
}

/// Count a non-fatal notification failure
pub fn record_notification_failure(kind: &'static str) {
    counter!(NOTIFICATION_FAILURES, "kind" => kind).increment(1);
}

/// Count discovered databases of one kind
pub fn record_databases(kind: &'static str, count: usize) {
    counter!(DATABASES, "kind" => kind).increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        for name in [RECORDS_EXTRACTED, PASS_FAILURES, NOTIFICATION_FAILURES, DATABASES] {
            assert!(name.starts_with("line_artifacts_"));
            assert!(name.ends_with("_total"));
        }
    }

    #[test]
    fn test_recording_without_recorder_is_a_noop() {
        record_extracted("contact");
        record_pass_failure("message", "query");
        record_databases("call_log", 2);
    }
}
