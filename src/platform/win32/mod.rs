// ── Win32 platform implementation ─────────────────────────────────────────────
//
// This is the only module in the crate where `unsafe` code is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Layout: `ffi` holds the raw declarations; each subsystem module wraps them
// into calls that return `crate::Result` with the last-error code captured
// immediately after the failing call.

#![allow(unsafe_code)]

use windows::Win32::Foundation::{GetLastError, SetLastError, BOOL, HANDLE, WIN32_ERROR};

use crate::{
    consts::{ERROR_ALREADY_EXISTS, ERROR_INSUFFICIENT_BUFFER, ERROR_SUCCESS, MAX_PATH},
    error::{Error, Result},
    handle::{AsRawHandle, Release, Scoped},
    RawHandle,
};

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub(crate) mod ffi;

pub mod fs; // files, directories, search cursors, mappings, locks, disks
pub mod process; // processes, threads, modules, libraries, console, messages
pub mod sync; // mutexes, semaphores, events, waits
pub mod sysinfo; // memory, system and version queries; helper utilities

pub use ffi::HandlerRoutine;

// ── Last error ────────────────────────────────────────────────────────────────

/// Capture the calling thread's last-error code for `function`.
///
/// MUST be the first thing evaluated after the failing call: any other
/// kernel32 call in between may overwrite the slot.
pub(crate) fn last_error(function: &'static str) -> Error {
    // SAFETY: GetLastError only reads the calling thread's error slot.
    let code = unsafe { GetLastError().0 };
    Error::win32(function, code)
}

/// Raw last-error code; `ERROR_SUCCESS` if the previous call cleared it.
pub(crate) fn last_error_code() -> u32 {
    // SAFETY: as in `last_error`.
    unsafe { GetLastError().0 }
}

/// Reset the last-error slot before a call whose failure sentinel is also a
/// legal success value.
pub(crate) fn clear_last_error() {
    // SAFETY: SetLastError only writes the calling thread's error slot.
    unsafe { SetLastError(WIN32_ERROR(ERROR_SUCCESS)) }
}

/// Map a `BOOL` result to `Result<()>`.
pub(crate) fn check(ok: BOOL, function: &'static str) -> Result<()> {
    if ok.as_bool() {
        Ok(())
    } else {
        Err(last_error(function))
    }
}

/// Adopt a handle returned by an acquire call, or capture the failure.
pub(crate) fn adopt<R: Release>(raw: HANDLE, function: &'static str) -> Result<Scoped<R>> {
    Scoped::from_raw(raw.0).ok_or_else(|| last_error(function))
}

/// Adopt a handle returned by a create-or-open call on a named object.
///
/// The caller must have called `clear_last_error` right before the create
/// call, so that `ERROR_ALREADY_EXISTS` is not a stale value.
pub(crate) fn adopt_named<R: Release>(raw: HANDLE, function: &'static str) -> Result<(Scoped<R>, bool)> {
    match Scoped::from_raw(raw.0) {
        Some(owned) => Ok((owned, last_error_code() == ERROR_ALREADY_EXISTS)),
        None => Err(last_error(function)),
    }
}

/// A freshly created or opened named kernel object.
#[derive(Debug)]
pub struct Created<T> {
    pub object: T,
    /// `true` if a named object with this name already existed and was opened
    /// instead of created.
    pub already_existed: bool,
}

/// Run a query that fills a UTF-16 buffer and, when the buffer is too small,
/// returns the length it needs (terminator included) instead.
///
/// Zero with a clear last-error slot is an empty success.  The buffer is
/// resized at most once to the length the OS asked for.
pub(crate) fn query_wide(
    function: &'static str,
    mut call: impl FnMut(&mut [u16]) -> u32,
) -> Result<Vec<u16>> {
    let mut buf = vec![0u16; MAX_PATH];
    for _ in 0..2 {
        clear_last_error();
        let n = call(&mut buf) as usize;
        if n == 0 {
            let code = last_error_code();
            if code != ERROR_SUCCESS {
                return Err(Error::win32(function, code));
            }
            buf.clear();
            return Ok(buf);
        }
        if n < buf.len() {
            buf.truncate(n);
            return Ok(buf);
        }
        log::debug!("{function} needs {n} UTF-16 units, growing buffer");
        buf.resize(n, 0);
    }
    Err(Error::win32(function, ERROR_INSUFFICIENT_BUFFER))
}

/// Borrow any owning or pseudo handle as the ABI type.
pub(crate) fn raw<H: AsRawHandle + ?Sized>(h: &H) -> HANDLE {
    HANDLE(h.as_raw_handle())
}

// ── CloseHandle ───────────────────────────────────────────────────────────────

/// Release via `CloseHandle`.
pub struct HandleCloser;

impl Release for HandleCloser {
    const NAME: &'static str = "CloseHandle";

    fn release(raw: RawHandle) -> bool {
        // SAFETY: `raw` came from a successful acquire and is owned by the
        // `Scoped` being released; it is never used again afterwards.
        unsafe { ffi::CloseHandle(HANDLE(raw)) }.as_bool()
    }
}

/// An exclusively owned kernel object handle (file, mapping, mutex,
/// semaphore, event, process, thread).
pub type OwnedHandle = Scoped<HandleCloser>;
