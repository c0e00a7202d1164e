// ── Synchronization primitives ────────────────────────────────────────────────
//
// Named or anonymous mutexes, semaphores and events, plus the two wait entry
// points.  Each object owns its handle; `CloseHandle` runs once on drop.

#![allow(unsafe_code)]

use std::{ptr, time::Duration};

use windows::{
    core::PCWSTR,
    Win32::Foundation::{BOOL, HANDLE},
};

use crate::{
    consts::{MAXIMUM_WAIT_OBJECTS, WAIT_FAILED},
    error::{Error, Result},
    handle::AsRawHandle,
    wait::{timeout_millis, WaitResult},
    wide, RawHandle,
};

use super::{adopt, adopt_named, check, clear_last_error, ffi, last_error, raw, Created, OwnedHandle};

fn name_ptr(w: &Option<Vec<u16>>) -> PCWSTR {
    w.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()))
}

macro_rules! kernel_object {
    ($ty:ident) => {
        impl AsRawHandle for $ty {
            fn as_raw_handle(&self) -> RawHandle {
                self.handle.as_raw()
            }
        }

        // SAFETY: kernel synchronization objects are designed to be signalled
        // and waited on from any thread; the handle value is just an index
        // into the process handle table.
        unsafe impl Send for $ty {}
        // SAFETY: every operation takes `&self` and is a single kernel call
        // that the OS serializes.
        unsafe impl Sync for $ty {}
    };
}

// ── Mutex ─────────────────────────────────────────────────────────────────────

/// A kernel mutex.  Recursive for the owning thread; abandoned (not released)
/// if the owner exits while holding it.
#[derive(Debug)]
pub struct KernelMutex {
    handle: OwnedHandle,
}

impl KernelMutex {
    /// Create a mutex, or open the existing one called `name`.
    ///
    /// `initial_owner` is ignored by the OS when the named mutex already
    /// existed; check `Created::already_existed`.
    pub fn create(name: Option<&str>, initial_owner: bool) -> Result<Created<Self>> {
        let name = wide::encode_opt(name)?;
        clear_last_error();
        // SAFETY: name is null or NUL-terminated and outlives the call; null
        // security attributes are allowed.
        let h = unsafe { ffi::CreateMutexW(ptr::null(), BOOL::from(initial_owner), name_ptr(&name)) };
        let (handle, already_existed) = adopt_named(h, "CreateMutexW")?;
        Ok(Created { object: Self { handle }, already_existed })
    }

    /// Give up one level of ownership.  Fails with `ERROR_NOT_OWNER` when the
    /// calling thread does not own the mutex.
    pub fn release(&self) -> Result<()> {
        // SAFETY: the handle is live for the borrow.
        let ok = unsafe { ffi::ReleaseMutex(raw(self)) };
        check(ok, "ReleaseMutex")
    }

    pub fn wait(&self, timeout: Option<Duration>) -> Result<WaitResult> {
        wait_single(self, timeout)
    }
}

kernel_object!(KernelMutex);

// ── Semaphore ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Semaphore {
    handle: OwnedHandle,
}

impl Semaphore {
    /// Create a counting semaphore with `0 <= initial <= maximum`, `maximum > 0`.
    pub fn create(initial: i32, maximum: i32, name: Option<&str>) -> Result<Created<Self>> {
        let name = wide::encode_opt(name)?;
        clear_last_error();
        // SAFETY: name is null or NUL-terminated and outlives the call; the OS
        // validates the counts.
        let h = unsafe { ffi::CreateSemaphoreW(ptr::null(), initial, maximum, name_ptr(&name)) };
        let (handle, already_existed) = adopt_named(h, "CreateSemaphoreW")?;
        Ok(Created { object: Self { handle }, already_existed })
    }

    pub fn open(access: u32, inherit: bool, name: &str) -> Result<Self> {
        let name = wide::encode(name)?;
        // SAFETY: name is NUL-terminated and outlives the call.
        let h = unsafe { ffi::OpenSemaphoreW(access, BOOL::from(inherit), PCWSTR(name.as_ptr())) };
        Ok(Self { handle: adopt(h, "OpenSemaphoreW")? })
    }

    /// Add `count` to the semaphore; returns the count before the release.
    /// Fails without changing the count if it would exceed the maximum.
    pub fn release(&self, count: i32) -> Result<i32> {
        let mut previous = 0i32;
        // SAFETY: the handle is live; `previous` is a valid out-pointer.
        let ok = unsafe { ffi::ReleaseSemaphore(raw(self), count, &mut previous) };
        check(ok, "ReleaseSemaphore")?;
        Ok(previous)
    }

    pub fn wait(&self, timeout: Option<Duration>) -> Result<WaitResult> {
        wait_single(self, timeout)
    }
}

kernel_object!(Semaphore);

// ── Event ─────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Event {
    handle: OwnedHandle,
}

impl Event {
    /// Create an event.  A manual-reset event stays signalled until `reset`;
    /// an auto-reset event releases one waiter and clears itself.
    pub fn create(manual_reset: bool, initial_state: bool, name: Option<&str>) -> Result<Created<Self>> {
        let name = wide::encode_opt(name)?;
        clear_last_error();
        // SAFETY: name is null or NUL-terminated and outlives the call.
        let h = unsafe {
            ffi::CreateEventW(ptr::null(), BOOL::from(manual_reset), BOOL::from(initial_state), name_ptr(&name))
        };
        let (handle, already_existed) = adopt_named(h, "CreateEventW")?;
        Ok(Created { object: Self { handle }, already_existed })
    }

    pub fn open(access: u32, inherit: bool, name: &str) -> Result<Self> {
        let name = wide::encode(name)?;
        // SAFETY: name is NUL-terminated and outlives the call.
        let h = unsafe { ffi::OpenEventW(access, BOOL::from(inherit), PCWSTR(name.as_ptr())) };
        Ok(Self { handle: adopt(h, "OpenEventW")? })
    }

    pub fn set(&self) -> Result<()> {
        // SAFETY: the handle is live for the borrow.
        check(unsafe { ffi::SetEvent(raw(self)) }, "SetEvent")
    }

    pub fn reset(&self) -> Result<()> {
        // SAFETY: the handle is live for the borrow.
        check(unsafe { ffi::ResetEvent(raw(self)) }, "ResetEvent")
    }

    /// Signal, release current waiters, then reset.  Waiters that are not
    /// blocked at the instant of the pulse miss it entirely.
    pub fn pulse(&self) -> Result<()> {
        // SAFETY: the handle is live for the borrow.
        check(unsafe { ffi::PulseEvent(raw(self)) }, "PulseEvent")
    }

    pub fn wait(&self, timeout: Option<Duration>) -> Result<WaitResult> {
        wait_single(self, timeout)
    }

    /// The raw handle, for `Overlapped::with_event`.
    pub fn as_raw(&self) -> RawHandle {
        self.handle.as_raw()
    }
}

kernel_object!(Event);

// ── Waits ─────────────────────────────────────────────────────────────────────

/// Block until `object` is signalled or `timeout` elapses (`None`: forever).
pub fn wait_single<H: AsRawHandle + ?Sized>(object: &H, timeout: Option<Duration>) -> Result<WaitResult> {
    // SAFETY: the handle is live for the borrow.
    let code = unsafe { ffi::WaitForSingleObject(raw(object), timeout_millis(timeout)) };
    decode(code, 1, "WaitForSingleObject")
}

/// Wait for any (or, with `wait_all`, every) object in `objects`.
///
/// At most `MAXIMUM_WAIT_OBJECTS` handles; an empty or oversized list is
/// rejected by the OS with `ERROR_INVALID_PARAMETER`.
pub fn wait_multiple(objects: &[&dyn AsRawHandle], wait_all: bool, timeout: Option<Duration>) -> Result<WaitResult> {
    let handles: Vec<HANDLE> = objects.iter().map(|o| raw(*o)).collect();
    if handles.len() > MAXIMUM_WAIT_OBJECTS {
        log::warn!("waiting on {} handles; the OS accepts at most {MAXIMUM_WAIT_OBJECTS}", handles.len());
    }
    // SAFETY: `handles` holds `len` live handles borrowed from `objects` for
    // the duration of the call.
    let code = unsafe {
        ffi::WaitForMultipleObjects(
            handles.len() as u32,
            handles.as_ptr(),
            BOOL::from(wait_all),
            timeout_millis(timeout),
        )
    };
    decode(code, handles.len(), "WaitForMultipleObjects")
}

fn decode(code: u32, count: usize, function: &'static str) -> Result<WaitResult> {
    if code == WAIT_FAILED {
        return Err(last_error(function));
    }
    WaitResult::from_code(code, count).ok_or_else(|| {
        log::warn!("{function} returned undocumented code {code:#x}");
        Error::win32(function, code)
    })
}
