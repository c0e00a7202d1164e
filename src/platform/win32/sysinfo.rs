// ── Memory, system and version queries ────────────────────────────────────────
//
// Fixed-size status records filled in place, locale enumeration, and the
// string helpers built on top of them (`memory_info`, `module_directory`,
// `application_file_name`).

#![allow(unsafe_code)]

use std::path::PathBuf;

use windows::{core::PWSTR, Win32::Foundation::BOOL};

use crate::{
    error::Result,
    locale::{self, LocaleSet},
    records::{MemoryStatus, MemoryStatusEx, OsVersionInfoEx, SystemInfo},
    report, wide,
};

use super::{
    check, ffi,
    process::{module_file_name, ModuleHandle},
};

// ── Status records ────────────────────────────────────────────────────────────

pub fn system_info() -> SystemInfo {
    let mut info = SystemInfo::default();
    // SAFETY: `info` is a correctly sized, writable SYSTEM_INFO.
    unsafe { ffi::GetSystemInfo(&mut info) };
    info
}

/// Legacy memory status.  Figures above 4 GiB saturate on 32-bit targets;
/// prefer `global_memory_status_ex`.
pub fn global_memory_status() -> MemoryStatus {
    let mut ms = MemoryStatus {
        length: std::mem::size_of::<MemoryStatus>() as u32,
        ..MemoryStatus::default()
    };
    // SAFETY: `ms` is a correctly sized, writable MEMORYSTATUS.
    unsafe { ffi::GlobalMemoryStatus(&mut ms) };
    ms
}

pub fn global_memory_status_ex() -> Result<MemoryStatusEx> {
    let mut ms = MemoryStatusEx::new();
    // SAFETY: `ms` is writable and its length field is pre-set.
    let ok = unsafe { ffi::GlobalMemoryStatusEx(&mut ms) };
    check(ok, "GlobalMemoryStatusEx")?;
    Ok(ms)
}

/// OS version as reported to this executable.  Without a compatibility
/// manifest, Windows 8.1 and later report 6.2.
pub fn version_ex() -> Result<OsVersionInfoEx> {
    let mut info = OsVersionInfoEx::new();
    // SAFETY: `info` is writable and its size field is pre-set to the EX
    // variant, which the OS accepts in place of OSVERSIONINFOW.
    let ok = unsafe { ffi::GetVersionExW(&mut info) };
    check(ok, "GetVersionExW")?;
    Ok(info)
}

// ── Locales ───────────────────────────────────────────────────────────────────

unsafe extern "system" fn on_locale(id: PWSTR) -> BOOL {
    if id.is_null() {
        return BOOL::from(true);
    }
    // SAFETY: the OS passes a NUL-terminated string that is valid for the
    // duration of the callback.
    let id = unsafe { id.as_wide() };
    BOOL::from(locale::push(wide::decode(id)))
}

/// Locale identifiers (hex LCID strings such as `"00000409"`) in the order the
/// OS reports them.  `flag` must be `LCID_INSTALLED` or `LCID_SUPPORTED`.
pub fn enum_locales(flag: u32) -> Result<Vec<String>> {
    locale::collect_locales(flag, |set: LocaleSet| {
        // SAFETY: the callback only touches the calling thread's collector,
        // which `collect_locales` keeps armed until this call returns; the OS
        // invokes it synchronously on this thread.
        let ok = unsafe { ffi::EnumSystemLocalesW(Some(on_locale), set as u32) };
        check(ok, "EnumSystemLocalesW")
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Full path of the running executable.
pub fn try_application_file_name() -> Result<PathBuf> {
    module_file_name(None)
}

/// Full path of the running executable, or `""` if the query fails.
pub fn application_file_name() -> String {
    match try_application_file_name() {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(e) => {
            log::debug!("application_file_name: {e}");
            String::new()
        }
    }
}

/// `GlobalMemoryStatus` rendered as `"Memory Load: … Avail Virtual: … "`.
pub fn memory_info() -> String {
    report::memory_report(&global_memory_status())
}

/// Directory part of `module`'s file name (the executable when `None`), or
/// `""` if the name cannot be read or holds no `\`.
pub fn module_directory(module: Option<ModuleHandle>) -> String {
    match module_file_name(module) {
        Ok(path) => report::directory_of(&path.to_string_lossy()),
        Err(e) => {
            log::debug!("module_directory: {e}");
            String::new()
        }
    }
}
