// ── Processes, threads, modules ───────────────────────────────────────────────
//
// Current process/thread identity, termination, handle duplication, module
// and DLL loading, system messages, raw memory moves and the console.

#![allow(unsafe_code)]

use std::{
    ffi::{c_void, CString},
    path::{Path, PathBuf},
    ptr,
};

use windows::{
    core::{PCSTR, PCWSTR, PWSTR},
    Win32::Foundation::{BOOL, HANDLE, HMODULE},
};

use crate::{
    consts::{ERROR_INSUFFICIENT_BUFFER, MAX_LONG_PATH, MAX_PATH},
    error::{Error, Result},
    flags::{DuplicateOptions, FormatMessageFlags},
    handle::{AsRawHandle, PseudoHandle, Release, Scoped},
    wide, RawHandle,
};

use super::{adopt, check, ffi, last_error, query_wide, raw, HandlerRoutine, OwnedHandle};

// ── Current process and thread ────────────────────────────────────────────────

/// Pseudo-handle for the calling process.  Never closed.
pub fn current_process() -> PseudoHandle {
    // SAFETY: no arguments; always succeeds.
    PseudoHandle::new(unsafe { ffi::GetCurrentProcess() }.0)
}

/// Pseudo-handle for the calling thread.  Never closed; means "whichever
/// thread uses it", so it must not be handed to another thread.
pub fn current_thread() -> PseudoHandle {
    // SAFETY: no arguments; always succeeds.
    PseudoHandle::new(unsafe { ffi::GetCurrentThread() }.0)
}

pub fn current_process_id() -> u32 {
    // SAFETY: no arguments; always succeeds.
    unsafe { ffi::GetCurrentProcessId() }
}

pub fn current_thread_id() -> u32 {
    // SAFETY: no arguments; always succeeds.
    unsafe { ffi::GetCurrentThreadId() }
}

/// Exit code of a thread; `STILL_ACTIVE` while it runs.
pub fn exit_code_thread(thread: &impl AsRawHandle) -> Result<u32> {
    let mut code = 0u32;
    // SAFETY: the handle is live for the borrow; `code` is a valid out-pointer.
    let ok = unsafe { ffi::GetExitCodeThread(raw(thread), &mut code) };
    check(ok, "GetExitCodeThread")?;
    Ok(code)
}

/// Kill a thread without running its cleanup.
///
/// # Safety
///
/// The target may be holding locks (including the process heap lock) or be
/// halfway through mutating shared state; the caller accepts that the rest of
/// the process may deadlock or observe torn data afterwards.
pub unsafe fn terminate_thread(thread: &impl AsRawHandle, exit_code: u32) -> Result<()> {
    // SAFETY: the handle is live; the consequences are the caller's contract.
    let ok = unsafe { ffi::TerminateThread(raw(thread), exit_code) };
    check(ok, "TerminateThread")
}

/// End the calling process.  Destructors on the stack do not run.
pub fn exit_process(exit_code: u32) -> ! {
    log::debug!("ExitProcess({exit_code})");
    // SAFETY: ExitProcess never returns; Rust state is abandoned, not freed.
    unsafe { ffi::ExitProcess(exit_code) }
}

pub fn terminate_process(process: &impl AsRawHandle, exit_code: u32) -> Result<()> {
    // SAFETY: the handle is live for the borrow.
    let ok = unsafe { ffi::TerminateProcess(raw(process), exit_code) };
    check(ok, "TerminateProcess")
}

// ── Handle duplication ────────────────────────────────────────────────────────

/// Duplicate `source` (valid in `source_process`) into `target_process`.
///
/// The result is a raw handle value in the target's handle table; it is only
/// owned by this process when `target_process` is `current_process()`, which
/// is what `try_clone` handles.
pub fn duplicate_handle(
    source_process: &impl AsRawHandle,
    source: &impl AsRawHandle,
    target_process: &impl AsRawHandle,
    access: u32,
    inherit: bool,
    options: DuplicateOptions,
) -> Result<RawHandle> {
    let mut target = HANDLE::default();
    // SAFETY: all three handles are live for the borrow; `target` is a valid
    // out-pointer.
    let ok = unsafe {
        ffi::DuplicateHandle(
            raw(source_process),
            raw(source),
            raw(target_process),
            &mut target,
            access,
            BOOL::from(inherit),
            options.bits(),
        )
    };
    check(ok, "DuplicateHandle")?;
    Ok(target.0)
}

/// A second owning handle to the same kernel object, with the same access.
pub fn try_clone(handle: &impl AsRawHandle) -> Result<OwnedHandle> {
    let me = current_process();
    let dup = duplicate_handle(&me, handle, &me, 0, false, DuplicateOptions::SAME_ACCESS)?;
    adopt(HANDLE(dup), "DuplicateHandle")
}

pub fn is_debugger_present() -> bool {
    // SAFETY: no arguments; reads the PEB of the calling process.
    unsafe { ffi::IsDebuggerPresent() }.as_bool()
}

// ── Modules ───────────────────────────────────────────────────────────────────

/// A loaded module, not owned: no reference count is taken, so nothing is
/// released on drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHandle(RawHandle);

impl ModuleHandle {
    fn hmodule(self) -> HMODULE {
        HMODULE(self.0)
    }
}

impl AsRawHandle for ModuleHandle {
    fn as_raw_handle(&self) -> RawHandle {
        self.0
    }
}

/// Look up an already-loaded module by name, or the running executable when
/// `name` is `None`.
pub fn module_handle(name: Option<&str>) -> Result<ModuleHandle> {
    let name = wide::encode_opt(name)?;
    let ptr = name.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));
    // SAFETY: `ptr` is null or NUL-terminated and outlives the call.
    let h = unsafe { ffi::GetModuleHandleW(ptr) };
    if h.0.is_null() {
        return Err(last_error("GetModuleHandleW"));
    }
    Ok(ModuleHandle(h.0))
}

/// An exported function with the erased signature `GetProcAddress` returns.
/// Transmute it to the real signature before calling.
pub type Proc = unsafe extern "system" fn() -> isize;

/// Find an export by name.  `name` must be ASCII: there is no wide variant.
pub fn proc_address(module: ModuleHandle, name: &str) -> Result<Proc> {
    if !name.is_ascii() {
        return Err(Error::InvalidProcName(name.to_owned()));
    }
    let name = CString::new(name).map_err(|_| Error::InteriorNul)?;
    // SAFETY: the module stays loaded for as long as its owner keeps it; the
    // name is NUL-terminated ASCII.
    let proc = unsafe { ffi::GetProcAddress(module.hmodule(), PCSTR(name.as_ptr().cast())) };
    proc.ok_or_else(|| last_error("GetProcAddress"))
}

/// Full path of `module`, or of the running executable when `None`.
///
/// Starts with a `MAX_PATH` buffer and retries once with room for a long path
/// if the name was truncated.
pub fn module_file_name(module: Option<ModuleHandle>) -> Result<PathBuf> {
    let module = module.map_or(HMODULE::default(), ModuleHandle::hmodule);
    for size in [MAX_PATH, MAX_LONG_PATH] {
        let mut buf = vec![0u16; size];
        // SAFETY: buf is writable for `size` units.
        let n = unsafe { ffi::GetModuleFileNameW(module, PWSTR(buf.as_mut_ptr()), size as u32) } as usize;
        if n == 0 {
            return Err(last_error("GetModuleFileNameW"));
        }
        if n < size {
            buf.truncate(n);
            return Ok(PathBuf::from(wide::decode_os(&buf)));
        }
        log::debug!("module file name truncated at {size} units");
    }
    Err(Error::win32("GetModuleFileNameW", ERROR_INSUFFICIENT_BUFFER))
}

// ── Libraries ─────────────────────────────────────────────────────────────────

/// Release via `FreeLibrary`.
pub struct LibraryFreer;

impl Release for LibraryFreer {
    const NAME: &'static str = "FreeLibrary";

    fn release(raw: RawHandle) -> bool {
        // SAFETY: `raw` came from LoadLibraryW; its reference is dropped once.
        unsafe { ffi::FreeLibrary(HMODULE(raw)) }.as_bool()
    }
}

/// A module reference taken by `load_library`; `FreeLibrary` runs on drop.
pub type Library = Scoped<LibraryFreer>;

impl Scoped<LibraryFreer> {
    /// Non-owning view, valid while `self` lives.
    pub fn module(&self) -> ModuleHandle {
        ModuleHandle(self.as_raw())
    }
}

/// Load a DLL (running its `DllMain`) and take a reference on it.
pub fn load_library(path: impl AsRef<Path>) -> Result<Library> {
    let path = wide::encode_os(path.as_ref().as_os_str())?;
    // SAFETY: path is NUL-terminated; the loaded module's initialisers run
    // under the loader lock as for any DLL load.
    let h = unsafe { ffi::LoadLibraryW(PCWSTR(path.as_ptr())) };
    adopt(HANDLE(h.0), "LoadLibraryW")
}

pub fn system_directory() -> Result<PathBuf> {
    let buf = query_wide("GetSystemDirectoryW", |buf| {
        // SAFETY: buf is writable for buf.len() units.
        unsafe { ffi::GetSystemDirectoryW(PWSTR(buf.as_mut_ptr()), buf.len() as u32) }
    })?;
    Ok(PathBuf::from(wide::decode_os(&buf)))
}

/// The extra DLL search directory set by `set_dll_directory`, if any.
pub fn dll_directory() -> Result<Option<PathBuf>> {
    let buf = query_wide("GetDllDirectoryW", |buf| {
        // SAFETY: buf is writable for buf.len() units.
        unsafe { ffi::GetDllDirectoryW(buf.len() as u32, PWSTR(buf.as_mut_ptr())) }
    })?;
    Ok((!buf.is_empty()).then(|| PathBuf::from(wide::decode_os(&buf))))
}

/// Add `dir` to the DLL search path; `None` restores the default order.
pub fn set_dll_directory(dir: Option<&Path>) -> Result<()> {
    let dir = dir.map(|d| wide::encode_os(d.as_os_str())).transpose()?;
    let ptr = dir.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()));
    // SAFETY: `ptr` is null or NUL-terminated and outlives the call.
    let ok = unsafe { ffi::SetDllDirectoryW(ptr) };
    check(ok, "SetDllDirectoryW")
}

// ── System messages ───────────────────────────────────────────────────────────

/// The system's text for an error code, without the trailing line break.
pub fn format_message(code: u32) -> Result<String> {
    let flags = FormatMessageFlags::FROM_SYSTEM | FormatMessageFlags::IGNORE_INSERTS;
    // Messages are capped at 64 KiB.
    for size in [512usize, 32 * 1024] {
        let mut buf = vec![0u16; size];
        // SAFETY: buf is writable for `size` units; IGNORE_INSERTS means the
        // argument array is never read.
        let n = unsafe {
            ffi::FormatMessageW(
                flags.bits(),
                ptr::null(),
                code,
                0,
                PWSTR(buf.as_mut_ptr()),
                size as u32,
                ptr::null(),
            )
        };
        if n != 0 {
            buf.truncate(n as usize);
            let text = String::from_utf16_lossy(&buf);
            return Ok(text.trim_end_matches(['\r', '\n', ' ']).to_owned());
        }
        let err = last_error("FormatMessageW");
        if err.code() != Some(ERROR_INSUFFICIENT_BUFFER) {
            return Err(err);
        }
    }
    Err(Error::win32("FormatMessageW", ERROR_INSUFFICIENT_BUFFER))
}

impl Error {
    /// System text for an OS failure; `None` for input errors or unknown
    /// codes.
    pub fn system_message(&self) -> Option<String> {
        format_message(self.code()?).ok()
    }
}

// ── Raw memory ────────────────────────────────────────────────────────────────

/// `RtlMoveMemory`: copy `len` bytes; the ranges may overlap.
///
/// # Safety
///
/// `src` must be readable and `dst` writable for `len` bytes.
pub unsafe fn copy_memory(dst: *mut u8, src: *const u8, len: usize) {
    // SAFETY: forwarded to the caller.
    unsafe { ffi::RtlMoveMemory(dst.cast::<c_void>(), src.cast::<c_void>(), len) }
}

/// `RtlFillMemory`: set `len` bytes at `dst` to `fill`.
///
/// # Safety
///
/// `dst` must be writable for `len` bytes.
pub unsafe fn fill_memory(dst: *mut u8, len: usize, fill: u8) {
    // SAFETY: forwarded to the caller.
    unsafe { ffi::RtlFillMemory(dst.cast::<c_void>(), len, fill) }
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Give the process a new console.  Fails if it already has one.
pub fn alloc_console() -> Result<()> {
    // SAFETY: no arguments.
    check(unsafe { ffi::AllocConsole() }, "AllocConsole")
}

/// Attach to the console of `process_id`, or of the parent with
/// `ATTACH_PARENT_PROCESS`.
pub fn attach_console(process_id: u32) -> Result<()> {
    // SAFETY: plain integer argument.
    check(unsafe { ffi::AttachConsole(process_id) }, "AttachConsole")
}

/// Window of the attached console, if there is one.
pub fn console_window() -> Option<RawHandle> {
    // SAFETY: no arguments.
    let hwnd = unsafe { ffi::GetConsoleWindow() };
    (!hwnd.0.is_null()).then_some(hwnd.0)
}

/// Add (or with `add == false`, remove) a console control handler.  A `None`
/// handler toggles whether the process ignores Ctrl+C.
///
/// The handler runs on a thread the system creates for each signal.
pub fn set_ctrl_handler(handler: HandlerRoutine, add: bool) -> Result<()> {
    // SAFETY: the handler, if any, is a `'static` function pointer.
    let ok = unsafe { ffi::SetConsoleCtrlHandler(handler, BOOL::from(add)) };
    check(ok, "SetConsoleCtrlHandler")
}
