//! Optional metrics instrumentation for logmerge.
//!
//! When the `observe` feature is enabled, ingestion and replay emit counters
//! and histograms via the [`metrics`] crate. A downstream application must
//! install a metrics recorder to collect the data.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

/// Record an add against the store.
///
/// - `logmerge.store.adds_total` – counter with `outcome` label (`inserted` / `duplicate`)
#[inline]
pub fn record_add(duplicate: bool) {
    #[cfg(feature = "observe")]
    {
        let outcome = if duplicate { "duplicate" } else { "inserted" };
        metrics::counter!("logmerge.store.adds_total", "outcome" => outcome).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = duplicate;
    }
}

/// Record an input line that is not a record.
///
/// - `logmerge.ingest.unformatted_total` – counter
#[inline]
pub fn record_unformatted() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("logmerge.ingest.unformatted_total").increment(1);
    }
}

/// Record a finished replay scan.
///
/// - `logmerge.replay.records_total` – counter
/// - `logmerge.replay.duration_seconds` – histogram
#[inline]
pub fn record_replay(duration: std::time::Duration, records: u64) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("logmerge.replay.records_total").increment(records);
        metrics::histogram!("logmerge.replay.duration_seconds").record(duration.as_secs_f64());
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, records);
    }
}
