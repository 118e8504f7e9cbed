//! Monotonic timestamps used for node ids and stored upload names.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Nanoseconds since the Unix epoch, strictly greater than every value
/// previously returned by this process.
pub fn next_stamp() -> i64 {
    let now = Utc::now().timestamp_nanos_opt().unwrap_or(0);
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// `<prefix>-<stamp>`, e.g. `folder-1718000000000000000`.
pub fn node_id(prefix: &str) -> String {
    format!("{}-{}", prefix, next_stamp())
}
