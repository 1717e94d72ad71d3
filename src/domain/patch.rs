//! Partial updates.
//!
//! Every mutable entity has an explicit patch type whose fields are all
//! optional. Applying a patch copies only the present fields and stamps
//! `updated_at`.

use chrono::{DateTime, Duration, Utc};

/// A set of optional field changes for `T`.
pub trait Patch<T>: Sized {
    /// Apply the present fields to `target`, stamping `updated_at` from `now`.
    fn apply_at(self, target: T, now: DateTime<Utc>) -> T;

    /// Apply using the current wall clock.
    fn apply(self, target: T) -> T {
        self.apply_at(target, Utc::now())
    }
}

/// Next `updated_at` value: `now`, or one microsecond past `previous` when the
/// clock has not advanced (timestamps are persisted with microsecond precision).
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
