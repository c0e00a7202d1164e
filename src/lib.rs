// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32` – kernel32 FFI declarations and their safe wrappers
//   • `records` tests   – byte-level copies of the fixed-layout records
// Each unsafe block MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

//! Typed bindings for `kernel32.dll`.
//!
//! The portable modules (`consts`, `flags`, `records`, `handle`, `wait`,
//! `locale`, `report`, `wide`, `error`) build on every host.  The entry points
//! themselves live in [`platform::win32`] and exist only on Windows.

pub mod consts;
pub mod error;
pub mod flags;
pub mod handle;
pub mod locale;
pub mod platform;
pub mod records;
pub mod report;
pub mod wait;
pub mod wide;

pub use error::{Error, Result};
pub use handle::{AsRawHandle, PseudoHandle, RawHandle, Release, Scoped};
pub use records::{
    DiskGeometry, DiskSpace, FileTime, MemoryStatus, MemoryStatusEx, OsVersionInfoEx, Overlapped,
    SystemInfo, Win32FindData,
};
pub use wait::WaitResult;
