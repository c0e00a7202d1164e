// ── Platform layer ────────────────────────────────────────────────────────────
//
// All kernel32 calls live under `win32`, which only exists on Windows.  The
// portable modules at the crate root never reach into it.

#[cfg(windows)]
pub mod win32;
