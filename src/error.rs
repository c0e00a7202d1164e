// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in k32 return `error::Result<T>`.  Two families:
//   • `Win32`  – the OS returned its failure sentinel; `code` is the
//                thread-local last-error value captured right after the call
//                (see `platform::win32::last_error`).
//   • the rest – input rejected by this crate before any OS call was made.
//
// No error is interpreted or retried here; that is the caller's business.

use crate::consts::{ERROR_ALREADY_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_IO_PENDING, ERROR_PATH_NOT_FOUND};

/// Every error that k32 can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A kernel32 entry point returned its failure sentinel.
    #[error("{function} failed (error {code:#010x})")]
    Win32 {
        /// The name of the failing entry point, for display purposes.
        function: &'static str,
        /// The raw `GetLastError()` value.
        code: u32,
    },

    /// `enum_locales` was given a selector other than `LCID_INSTALLED` or
    /// `LCID_SUPPORTED`.
    #[error("invalid locale enumeration flag ({0})")]
    InvalidLocaleFlag(u32),

    /// A locale enumeration was started from inside another one on the same
    /// thread.
    #[error("a locale enumeration is already running on this thread")]
    EnumerationInProgress,

    /// A string argument contains an embedded NUL and cannot be marshalled.
    #[error("string argument contains an interior NUL")]
    InteriorNul,

    /// A procedure name is not plain ASCII and cannot be passed to the
    /// ANSI-only `GetProcAddress`.
    #[error("procedure name {0:?} is not representable as an ANSI string")]
    InvalidProcName(String),
}

impl Error {
    /// Build an OS failure from an already-captured last-error code.
    pub fn win32(function: &'static str, code: u32) -> Self {
        Self::Win32 { function, code }
    }

    /// The last-error code, for OS failures.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Win32 { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// `true` for "file not found" and "path not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self.code(), Some(ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND))
    }

    /// `true` when an overlapped request was queued rather than completed.
    pub fn is_io_pending(&self) -> bool {
        self.code() == Some(ERROR_IO_PENDING)
    }

    /// `true` when a create call failed because the object already exists.
    pub fn is_already_exists(&self) -> bool {
        self.code() == Some(ERROR_ALREADY_EXISTS)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ERROR_ACCESS_DENIED;

    #[test]
    fn win32_display_names_function_and_hex_code() {
        let e = Error::win32("CreateFileW", ERROR_ACCESS_DENIED);
        assert_eq!(e.to_string(), "CreateFileW failed (error 0x00000005)");
    }

    #[test]
    fn validation_errors_carry_no_code() {
        assert_eq!(Error::InvalidLocaleFlag(7).code(), None);
        assert_eq!(Error::InteriorNul.code(), None);
        assert_eq!(
            Error::InvalidLocaleFlag(7).to_string(),
            "invalid locale enumeration flag (7)"
        );
    }

    #[test]
    fn classifiers_follow_the_code() {
        assert!(Error::win32("FindFirstFileW", ERROR_PATH_NOT_FOUND).is_not_found());
        assert!(Error::win32("ReadFile", ERROR_IO_PENDING).is_io_pending());
        assert!(Error::win32("CreateDirectoryW", ERROR_ALREADY_EXISTS).is_already_exists());
        assert!(!Error::win32("DeleteFileW", ERROR_ACCESS_DENIED).is_not_found());
    }
}
