// ── Handle ownership ──────────────────────────────────────────────────────────
//
// Three kinds of kernel32 handle reach Rust code:
//   • owning handles        – `Scoped<R>`; the matching release entry point
//                             (`R::release`) fires exactly once, on `close()`
//                             or on drop, never for a failed acquire.
//   • pseudo-handles        – `PseudoHandle`; names the calling process or
//                             thread and has no release at all.
//   • borrowed raw handles  – anything implementing `AsRawHandle`.
//
// No `unsafe` here: the release entry points themselves are called from the
// `Release` impls in `platform::win32`.

use std::{ffi::c_void, fmt, marker::PhantomData, mem::ManuallyDrop};

use crate::consts::INVALID_HANDLE_VALUE;

/// The native `HANDLE` representation.
pub type RawHandle = *mut c_void;

/// `true` for the two values kernel32 uses to signal a failed acquire.
pub fn is_invalid(raw: RawHandle) -> bool {
    raw.is_null() || raw as isize == INVALID_HANDLE_VALUE
}

/// Borrow the raw handle of an owning or pseudo handle.
pub trait AsRawHandle {
    fn as_raw_handle(&self) -> RawHandle;
}

// ── Release ───────────────────────────────────────────────────────────────────

/// The release entry point paired with an acquire entry point
/// (`FindClose` for `FindFirstFileW`, `CloseHandle` for `CreateFileW`, …).
pub trait Release {
    /// Entry point name, used when a release failure is logged.
    const NAME: &'static str;

    /// Release `raw`.  Returns `false` if the OS reported a failure.
    fn release(raw: RawHandle) -> bool;
}

// ── Scoped ────────────────────────────────────────────────────────────────────

/// An exclusively owned kernel32 handle.
///
/// Built only from a successful acquire; dropping it (including abandoning it
/// on an early return or a panic unwind) releases it once.
pub struct Scoped<R: Release> {
    raw: RawHandle,
    _release: PhantomData<R>,
}

impl<R: Release> Scoped<R> {
    /// Take ownership of the value returned by an acquire entry point.
    ///
    /// Returns `None` for null and `INVALID_HANDLE_VALUE`; no release is ever
    /// issued for those.  The caller transfers ownership: nothing else may
    /// release `raw` afterwards.
    pub(crate) fn from_raw(raw: RawHandle) -> Option<Self> {
        if is_invalid(raw) {
            None
        } else {
            Some(Self { raw, _release: PhantomData })
        }
    }

    /// The raw handle, still owned by `self`.
    pub fn as_raw(&self) -> RawHandle {
        self.raw
    }

    /// Give up ownership without releasing.
    pub fn into_raw(self) -> RawHandle {
        ManuallyDrop::new(self).raw
    }

    /// Release now and report whether the OS accepted it.
    pub fn close(self) -> bool {
        R::release(self.into_raw())
    }
}

impl<R: Release> Drop for Scoped<R> {
    fn drop(&mut self) {
        if !R::release(self.raw) {
            log::warn!("{} failed for handle {:p}", R::NAME, self.raw);
        }
    }
}

impl<R: Release> AsRawHandle for Scoped<R> {
    fn as_raw_handle(&self) -> RawHandle {
        self.raw
    }
}

impl<R: Release> fmt::Debug for Scoped<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(R::NAME).field(&self.raw).finish()
    }
}

// ── PseudoHandle ──────────────────────────────────────────────────────────────

/// A handle value meaning "the calling process" or "the calling thread".
///
/// Never closed.  It is `!Send` because the thread variant always names
/// whichever thread uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoHandle(RawHandle);

impl PseudoHandle {
    pub(crate) fn new(raw: RawHandle) -> Self {
        Self(raw)
    }
}

impl AsRawHandle for PseudoHandle {
    fn as_raw_handle(&self) -> RawHandle {
        self.0
    }
}
