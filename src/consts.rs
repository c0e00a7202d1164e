// ── kernel32 numeric constants ────────────────────────────────────────────────
//
// Source of truth: the Windows SDK headers (winbase.h, winnt.h, winerror.h).
// Callers and the OS compare against these values directly; never renumber.
// Typed flag sets built on top of these live in `crate::flags`.

// ── Path and name limits ──────────────────────────────────────────────────────

/// Classic maximum path length in UTF-16 units, including the terminator.
pub const MAX_PATH: usize = 260;
/// Approximate maximum length of a `\\?\`-prefixed path.
pub const MAX_LONG_PATH: usize = 32_000;
/// Maximum drive component length (`"C:"` plus terminator).
pub const MAX_DRIVE: usize = 3;
/// Maximum directory component length.
pub const MAX_DIR: usize = 256;
/// Maximum file-name component length.
pub const MAX_FNAME: usize = 256;
/// Maximum extension component length.
pub const MAX_EXT: usize = 256;
/// Length of the inline 8.3 name buffer in `Win32FindData`.
pub const MAX_ALTERNATE: usize = 14;
/// Length of the inline service-pack buffer in `OsVersionInfoEx`.
pub const CSD_VERSION_LEN: usize = 128;

// ── LockFileEx flags ──────────────────────────────────────────────────────────

/// Return immediately instead of waiting for the lock.
pub const LOCKFILE_FAIL_IMMEDIATELY: u32 = 0x0000_0001;
/// Request an exclusive lock; shared otherwise.
pub const LOCKFILE_EXCLUSIVE_LOCK: u32 = 0x0000_0002;

// ── Failure sentinels ─────────────────────────────────────────────────────────

/// Returned by `GetFileAttributesW` on failure.
pub const INVALID_FILE_ATTRIBUTES: u32 = 0xFFFF_FFFF;
/// Returned by `CreateFileW` / `FindFirstFileW` on failure; also the value of
/// the current-process pseudo-handle.
pub const INVALID_HANDLE_VALUE: isize = -1;
/// Low-order return of `GetFileSize` that may signal failure.
pub const INVALID_FILE_SIZE: u32 = 0xFFFF_FFFF;

// ── Error codes (GetLastError) ────────────────────────────────────────────────

pub const ERROR_SUCCESS: u32 = 0x0;
pub const ERROR_FILE_NOT_FOUND: u32 = 0x2;
pub const ERROR_PATH_NOT_FOUND: u32 = 0x3;
pub const ERROR_ACCESS_DENIED: u32 = 0x5;
pub const ERROR_INVALID_HANDLE: u32 = 0x6;
pub const ERROR_INVALID_DRIVE: u32 = 0xF;
pub const ERROR_NO_MORE_FILES: u32 = 0x12;
pub const ERROR_INVALID_PARAMETER: u32 = 0x57;
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 0x7A;
pub const ERROR_INVALID_NAME: u32 = 0x7B;
pub const ERROR_ALREADY_EXISTS: u32 = 0xB7;
pub const ERROR_FILENAME_EXCED_RANGE: u32 = 0xCE;
pub const ERROR_NOT_OWNER: u32 = 0x120;
pub const ERROR_DIRECTORY: u32 = 0x10B;
pub const ERROR_OPERATION_ABORTED: u32 = 0x3E3;
pub const ERROR_IO_PENDING: u32 = 0x3E5;

// ── MapViewOfFile desired access ──────────────────────────────────────────────

pub const FILE_MAP_COPY: u32 = 0x0001;
pub const FILE_MAP_WRITE: u32 = 0x0002;
pub const FILE_MAP_READ: u32 = 0x0004;
pub const FILE_MAP_EXECUTE: u32 = 0x0020;
pub const FILE_MAP_ALL_ACCESS: u32 = 0x000F_001F;

// ── EnumSystemLocales selectors ───────────────────────────────────────────────

/// Enumerate only installed locale identifiers.
pub const LCID_INSTALLED: u32 = 1;
/// Enumerate all supported locale identifiers.
pub const LCID_SUPPORTED: u32 = 2;

// ── Waits ─────────────────────────────────────────────────────────────────────

/// Timeout sentinel meaning "wait forever".
pub const INFINITE: u32 = 0xFFFF_FFFF;
/// First signalled object; `WAIT_OBJECT_0 + n` for the n-th handle.
pub const WAIT_OBJECT_0: u32 = 0x0000_0000;
/// First abandoned mutex; `WAIT_ABANDONED + n` for the n-th handle.
pub const WAIT_ABANDONED: u32 = 0x0000_0080;
pub const WAIT_TIMEOUT: u32 = 0x0000_0102;
pub const WAIT_FAILED: u32 = 0xFFFF_FFFF;
/// Upper bound on the handle count accepted by `WaitForMultipleObjects`.
pub const MAXIMUM_WAIT_OBJECTS: usize = 64;

// ── Standard access rights ────────────────────────────────────────────────────

pub const DELETE: u32 = 0x0001_0000;
pub const READ_CONTROL: u32 = 0x0002_0000;
pub const WRITE_DAC: u32 = 0x0004_0000;
pub const WRITE_OWNER: u32 = 0x0008_0000;
pub const SYNCHRONIZE: u32 = 0x0010_0000;
pub const STANDARD_RIGHTS_REQUIRED: u32 = 0x000F_0000;

// ── Object-specific access rights ─────────────────────────────────────────────

pub const EVENT_MODIFY_STATE: u32 = 0x0002;
pub const EVENT_ALL_ACCESS: u32 = STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | 0x3;
pub const SEMAPHORE_MODIFY_STATE: u32 = 0x0002;
pub const SEMAPHORE_ALL_ACCESS: u32 = STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | 0x3;
pub const MUTEX_ALL_ACCESS: u32 = STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | 0x1;

// ── Processes and consoles ────────────────────────────────────────────────────

/// `AttachConsole` argument: attach to the parent process's console.
pub const ATTACH_PARENT_PROCESS: u32 = 0xFFFF_FFFF;
/// Exit code reported for a thread or process that has not terminated.
pub const STILL_ACTIVE: u32 = 259;
