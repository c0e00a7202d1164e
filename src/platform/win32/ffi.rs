// ── Raw kernel32 entry points ─────────────────────────────────────────────────
//
// One declaration per entry point, native parameter order and direction.
// These are pure conduits: no argument checking, no error capture.  Callers
// must read the last-error slot (`super::last_error`) immediately after a
// failing call.  Safe wrappers live in the sibling subsystem modules.
//
// Security-attribute arguments are always passed as null by the wrappers and
// are typed `*const c_void`.

#![allow(non_snake_case)]

use std::ffi::c_void;

use windows::{
    core::{PCSTR, PCWSTR, PWSTR},
    Win32::Foundation::{BOOL, FARPROC, HANDLE, HMODULE, HWND},
};

use crate::records::{
    MemoryStatus, MemoryStatusEx, OsVersionInfoEx, Overlapped, SystemInfo, Win32FindData,
};

/// `LOCALE_ENUMPROCW`: return non-zero to continue, zero to stop.
pub(crate) type LocaleEnumProc = Option<unsafe extern "system" fn(PWSTR) -> BOOL>;

/// `PHANDLER_ROUTINE`: return non-zero if the signal was handled.
pub type HandlerRoutine = Option<unsafe extern "system" fn(u32) -> BOOL>;

#[link(name = "kernel32")]
extern "system" {
    // ── File system ──────────────────────────────────────────────────────────

    pub(crate) fn GetFullPathNameW(
        lpFileName: PCWSTR,
        nBufferLength: u32,
        lpBuffer: PWSTR,
        lpFilePart: *mut PWSTR,
    ) -> u32;
    pub(crate) fn CopyFileW(lpExistingFileName: PCWSTR, lpNewFileName: PCWSTR, bFailIfExists: BOOL) -> BOOL;
    pub(crate) fn MoveFileW(lpExistingFileName: PCWSTR, lpNewFileName: PCWSTR) -> BOOL;
    pub(crate) fn DeleteFileW(lpFileName: PCWSTR) -> BOOL;
    pub(crate) fn FindFirstFileW(lpFileName: PCWSTR, lpFindFileData: *mut Win32FindData) -> HANDLE;
    pub(crate) fn FindNextFileW(hFindFile: HANDLE, lpFindFileData: *mut Win32FindData) -> BOOL;
    pub(crate) fn FindClose(hFindFile: HANDLE) -> BOOL;
    pub(crate) fn CreateFileW(
        lpFileName: PCWSTR,
        dwDesiredAccess: u32,
        dwShareMode: u32,
        lpSecurityAttributes: *const c_void,
        dwCreationDisposition: u32,
        dwFlagsAndAttributes: u32,
        hTemplateFile: HANDLE,
    ) -> HANDLE;
    pub(crate) fn CreateDirectoryW(lpPathName: PCWSTR, lpSecurityAttributes: *const c_void) -> BOOL;
    pub(crate) fn RemoveDirectoryW(lpPathName: PCWSTR) -> BOOL;
    pub(crate) fn GetFileSize(hFile: HANDLE, lpFileSizeHigh: *mut u32) -> u32;
    pub(crate) fn GetFileAttributesW(lpFileName: PCWSTR) -> u32;
    pub(crate) fn SetFileAttributesW(lpFileName: PCWSTR, dwFileAttributes: u32) -> BOOL;
    pub(crate) fn CreateFileMappingW(
        hFile: HANDLE,
        lpFileMappingAttributes: *const c_void,
        flProtect: u32,
        dwMaximumSizeHigh: u32,
        dwMaximumSizeLow: u32,
        lpName: PCWSTR,
    ) -> HANDLE;
    pub(crate) fn OpenFileMappingW(dwDesiredAccess: u32, bInheritHandle: BOOL, lpName: PCWSTR) -> HANDLE;
    pub(crate) fn MapViewOfFile(
        hFileMappingObject: HANDLE,
        dwDesiredAccess: u32,
        dwFileOffsetHigh: u32,
        dwFileOffsetLow: u32,
        dwNumberOfBytesToMap: usize,
    ) -> *mut c_void;
    pub(crate) fn UnmapViewOfFile(lpBaseAddress: *const c_void) -> BOOL;
    pub(crate) fn ReadFile(
        hFile: HANDLE,
        lpBuffer: *mut c_void,
        nNumberOfBytesToRead: u32,
        lpNumberOfBytesRead: *mut u32,
        lpOverlapped: *mut Overlapped,
    ) -> BOOL;
    pub(crate) fn LockFile(
        hFile: HANDLE,
        dwFileOffsetLow: u32,
        dwFileOffsetHigh: u32,
        nNumberOfBytesToLockLow: u32,
        nNumberOfBytesToLockHigh: u32,
    ) -> BOOL;
    pub(crate) fn LockFileEx(
        hFile: HANDLE,
        dwFlags: u32,
        dwReserved: u32,
        nNumberOfBytesToLockLow: u32,
        nNumberOfBytesToLockHigh: u32,
        lpOverlapped: *mut Overlapped,
    ) -> BOOL;
    pub(crate) fn UnlockFile(
        hFile: HANDLE,
        dwFileOffsetLow: u32,
        dwFileOffsetHigh: u32,
        nNumberOfBytesToUnlockLow: u32,
        nNumberOfBytesToUnlockHigh: u32,
    ) -> BOOL;
    pub(crate) fn DeviceIoControl(
        hDevice: HANDLE,
        dwIoControlCode: u32,
        lpInBuffer: *const c_void,
        nInBufferSize: u32,
        lpOutBuffer: *mut c_void,
        nOutBufferSize: u32,
        lpBytesReturned: *mut u32,
        lpOverlapped: *mut Overlapped,
    ) -> BOOL;
    pub(crate) fn GetDiskFreeSpaceW(
        lpRootPathName: PCWSTR,
        lpSectorsPerCluster: *mut u32,
        lpBytesPerSector: *mut u32,
        lpNumberOfFreeClusters: *mut u32,
        lpTotalNumberOfClusters: *mut u32,
    ) -> BOOL;
    pub(crate) fn GetDiskFreeSpaceExW(
        lpDirectoryName: PCWSTR,
        lpFreeBytesAvailableToCaller: *mut u64,
        lpTotalNumberOfBytes: *mut u64,
        lpTotalNumberOfFreeBytes: *mut u64,
    ) -> BOOL;

    // ── Synchronization ──────────────────────────────────────────────────────

    pub(crate) fn CreateMutexW(lpMutexAttributes: *const c_void, bInitialOwner: BOOL, lpName: PCWSTR) -> HANDLE;
    pub(crate) fn ReleaseMutex(hMutex: HANDLE) -> BOOL;
    pub(crate) fn CreateSemaphoreW(
        lpSemaphoreAttributes: *const c_void,
        lInitialCount: i32,
        lMaximumCount: i32,
        lpName: PCWSTR,
    ) -> HANDLE;
    pub(crate) fn OpenSemaphoreW(dwDesiredAccess: u32, bInheritHandle: BOOL, lpName: PCWSTR) -> HANDLE;
    pub(crate) fn ReleaseSemaphore(hSemaphore: HANDLE, lReleaseCount: i32, lpPreviousCount: *mut i32) -> BOOL;
    pub(crate) fn CreateEventW(
        lpEventAttributes: *const c_void,
        bManualReset: BOOL,
        bInitialState: BOOL,
        lpName: PCWSTR,
    ) -> HANDLE;
    pub(crate) fn OpenEventW(dwDesiredAccess: u32, bInheritHandle: BOOL, lpName: PCWSTR) -> HANDLE;
    pub(crate) fn SetEvent(hEvent: HANDLE) -> BOOL;
    pub(crate) fn ResetEvent(hEvent: HANDLE) -> BOOL;
    pub(crate) fn PulseEvent(hEvent: HANDLE) -> BOOL;
    pub(crate) fn WaitForSingleObject(hHandle: HANDLE, dwMilliseconds: u32) -> u32;
    pub(crate) fn WaitForMultipleObjects(
        nCount: u32,
        lpHandles: *const HANDLE,
        bWaitAll: BOOL,
        dwMilliseconds: u32,
    ) -> u32;

    // ── Processes, threads, handles ──────────────────────────────────────────

    pub(crate) fn GetCurrentProcess() -> HANDLE;
    pub(crate) fn GetCurrentProcessId() -> u32;
    pub(crate) fn GetCurrentThread() -> HANDLE;
    pub(crate) fn GetCurrentThreadId() -> u32;
    pub(crate) fn GetExitCodeThread(hThread: HANDLE, lpExitCode: *mut u32) -> BOOL;
    pub(crate) fn TerminateThread(hThread: HANDLE, dwExitCode: u32) -> BOOL;
    pub(crate) fn ExitProcess(uExitCode: u32) -> !;
    pub(crate) fn TerminateProcess(hProcess: HANDLE, uExitCode: u32) -> BOOL;
    pub(crate) fn CloseHandle(hObject: HANDLE) -> BOOL;
    pub(crate) fn DuplicateHandle(
        hSourceProcessHandle: HANDLE,
        hSourceHandle: HANDLE,
        hTargetProcessHandle: HANDLE,
        lpTargetHandle: *mut HANDLE,
        dwDesiredAccess: u32,
        bInheritHandle: BOOL,
        dwOptions: u32,
    ) -> BOOL;
    pub(crate) fn IsDebuggerPresent() -> BOOL;

    // ── Modules and libraries ────────────────────────────────────────────────

    pub(crate) fn GetModuleHandleW(lpModuleName: PCWSTR) -> HMODULE;
    /// ANSI only: there is no `GetProcAddressW`.
    pub(crate) fn GetProcAddress(hModule: HMODULE, lpProcName: PCSTR) -> FARPROC;
    pub(crate) fn GetModuleFileNameW(hModule: HMODULE, lpFilename: PWSTR, nSize: u32) -> u32;
    pub(crate) fn GetSystemDirectoryW(lpBuffer: PWSTR, uSize: u32) -> u32;
    pub(crate) fn GetDllDirectoryW(nBufferLength: u32, lpBuffer: PWSTR) -> u32;
    pub(crate) fn SetDllDirectoryW(lpPathName: PCWSTR) -> BOOL;
    pub(crate) fn LoadLibraryW(lpLibFileName: PCWSTR) -> HMODULE;
    pub(crate) fn FreeLibrary(hLibModule: HMODULE) -> BOOL;

    // ── Messages and raw memory ──────────────────────────────────────────────

    pub(crate) fn FormatMessageW(
        dwFlags: u32,
        lpSource: *const c_void,
        dwMessageId: u32,
        dwLanguageId: u32,
        lpBuffer: PWSTR,
        nSize: u32,
        Arguments: *const *const i8,
    ) -> u32;
    pub(crate) fn RtlMoveMemory(Destination: *mut c_void, Source: *const c_void, Length: usize);
    pub(crate) fn RtlFillMemory(Destination: *mut c_void, Length: usize, Fill: u8);

    // ── Console ──────────────────────────────────────────────────────────────

    pub(crate) fn AllocConsole() -> BOOL;
    pub(crate) fn AttachConsole(dwProcessId: u32) -> BOOL;
    pub(crate) fn GetConsoleWindow() -> HWND;
    pub(crate) fn SetConsoleCtrlHandler(HandlerRoutine: HandlerRoutine, Add: BOOL) -> BOOL;

    // ── Memory and system status ─────────────────────────────────────────────

    pub(crate) fn GetSystemInfo(lpSystemInfo: *mut SystemInfo);
    pub(crate) fn GlobalMemoryStatus(lpBuffer: *mut MemoryStatus);
    pub(crate) fn GlobalMemoryStatusEx(lpBuffer: *mut MemoryStatusEx) -> BOOL;
    pub(crate) fn GetVersionExW(lpVersionInformation: *mut OsVersionInfoEx) -> BOOL;
    pub(crate) fn EnumSystemLocalesW(lpLocaleEnumProc: LocaleEnumProc, dwFlags: u32) -> BOOL;
}
