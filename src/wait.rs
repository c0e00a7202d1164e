// ── Wait results and timeouts ─────────────────────────────────────────────────
//
// Pure decoding of the `WaitForSingleObject` / `WaitForMultipleObjects`
// return value.  The calls themselves are in `platform::win32::sync`.

use std::time::Duration;

use crate::consts::{INFINITE, WAIT_ABANDONED, WAIT_OBJECT_0, WAIT_TIMEOUT};

/// Outcome of a wait that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    /// The object at this index (0 for single waits) is signalled.
    Signaled(usize),
    /// The mutex at this index was abandoned by its owning thread; the caller
    /// now owns it.
    Abandoned(usize),
    /// The timeout elapsed.
    Timeout,
}

impl WaitResult {
    /// Decode a raw wait code for a wait on `count` handles.
    ///
    /// Returns `None` for `WAIT_FAILED` and for any code outside the ranges
    /// the OS documents for `count` handles.
    pub fn from_code(code: u32, count: usize) -> Option<Self> {
        let count = u32::try_from(count).ok()?;
        if code == WAIT_TIMEOUT {
            Some(Self::Timeout)
        } else if (WAIT_OBJECT_0..WAIT_OBJECT_0 + count).contains(&code) {
            Some(Self::Signaled((code - WAIT_OBJECT_0) as usize))
        } else if (WAIT_ABANDONED..WAIT_ABANDONED + count).contains(&code) {
            Some(Self::Abandoned((code - WAIT_ABANDONED) as usize))
        } else {
            None
        }
    }
}

/// Encode a timeout for the wait entry points.
///
/// `None` waits forever (`INFINITE`).  Finite durations are rounded down to
/// whole milliseconds and clamped just below the sentinel so that a long
/// finite wait never turns into an infinite one.
pub fn timeout_millis(timeout: Option<Duration>) -> u32 {
    match timeout {
        None => INFINITE,
        Some(d) => u32::try_from(d.as_millis()).map_or(INFINITE - 1, |ms| ms.min(INFINITE - 1)),
    }
}
