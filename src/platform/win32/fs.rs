// ── File-system primitives ────────────────────────────────────────────────────
//
// Files, directories, directory-search cursors, file mappings, byte-range
// locks, device control and disk free space.  Every path goes through
// `wide::encode_os`; every failure carries the last-error code captured right
// after the call.

#![allow(unsafe_code)]

use std::{ffi::c_void, path::{Path, PathBuf}, ptr};

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::Foundation::{BOOL, HANDLE},
};

use crate::{
    consts::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, ERROR_SUCCESS, INVALID_FILE_ATTRIBUTES, INVALID_FILE_SIZE, INVALID_HANDLE_VALUE},
    error::Result,
    flags::{CreateFileFlags, CreationDisposition, FileAccess, FileAttributes, FileMapAccess, LockFlags, PageAccess, ShareMode},
    handle::{AsRawHandle, Release, Scoped},
    records::{DiskGeometry, DiskSpace, Overlapped, Win32FindData},
    wide, RawHandle,
};

use super::{
    adopt, adopt_named, check, clear_last_error, ffi, last_error, last_error_code, query_wide, raw,
    Created, OwnedHandle,
};

fn encode_path(path: &Path) -> Result<Vec<u16>> {
    wide::encode_os(path.as_os_str())
}

fn optional_wide(w: &Option<Vec<u16>>) -> PCWSTR {
    w.as_ref().map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()))
}

// ── Paths and directories ─────────────────────────────────────────────────────

/// Resolve `path` against the current directory (`GetFullPathNameW`).
pub fn full_path_name(path: impl AsRef<Path>) -> Result<PathBuf> {
    let wide_path = encode_path(path.as_ref())?;
    let buf = query_wide("GetFullPathNameW", |buf| {
        // SAFETY: wide_path is NUL-terminated; buf is writable for buf.len()
        // units; the file-part out-pointer is optional and passed as null.
        unsafe {
            ffi::GetFullPathNameW(
                PCWSTR(wide_path.as_ptr()),
                buf.len() as u32,
                PWSTR(buf.as_mut_ptr()),
                ptr::null_mut(),
            )
        }
    })?;
    Ok(PathBuf::from(wide::decode_os(&buf)))
}

pub fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>, fail_if_exists: bool) -> Result<()> {
    let from = encode_path(from.as_ref())?;
    let to = encode_path(to.as_ref())?;
    // SAFETY: both paths are NUL-terminated and outlive the call.
    let ok = unsafe { ffi::CopyFileW(PCWSTR(from.as_ptr()), PCWSTR(to.as_ptr()), BOOL::from(fail_if_exists)) };
    check(ok, "CopyFileW")
}

pub fn move_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let from = encode_path(from.as_ref())?;
    let to = encode_path(to.as_ref())?;
    // SAFETY: both paths are NUL-terminated and outlive the call.
    let ok = unsafe { ffi::MoveFileW(PCWSTR(from.as_ptr()), PCWSTR(to.as_ptr())) };
    check(ok, "MoveFileW")
}

pub fn delete_file(path: impl AsRef<Path>) -> Result<()> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated and outlives the call.
    let ok = unsafe { ffi::DeleteFileW(PCWSTR(path.as_ptr())) };
    check(ok, "DeleteFileW")
}

/// Create one directory with default security.
pub fn create_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated; null security attributes are allowed.
    let ok = unsafe { ffi::CreateDirectoryW(PCWSTR(path.as_ptr()), ptr::null()) };
    check(ok, "CreateDirectoryW")
}

/// Remove an empty directory.
pub fn remove_directory(path: impl AsRef<Path>) -> Result<()> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated and outlives the call.
    let ok = unsafe { ffi::RemoveDirectoryW(PCWSTR(path.as_ptr())) };
    check(ok, "RemoveDirectoryW")
}

pub fn file_attributes(path: impl AsRef<Path>) -> Result<FileAttributes> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated and outlives the call.
    let attrs = unsafe { ffi::GetFileAttributesW(PCWSTR(path.as_ptr())) };
    if attrs == INVALID_FILE_ATTRIBUTES {
        return Err(last_error("GetFileAttributesW"));
    }
    Ok(FileAttributes::from_bits_retain(attrs))
}

pub fn set_file_attributes(path: impl AsRef<Path>, attributes: FileAttributes) -> Result<()> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated and outlives the call.
    let ok = unsafe { ffi::SetFileAttributesW(PCWSTR(path.as_ptr()), attributes.bits()) };
    check(ok, "SetFileAttributesW")
}

// ── Files ─────────────────────────────────────────────────────────────────────

/// Open or create a file or device (`CreateFileW`) with default security and
/// no template.
pub fn create_file(
    path: impl AsRef<Path>,
    access: FileAccess,
    share: ShareMode,
    disposition: CreationDisposition,
    flags: CreateFileFlags,
    attributes: FileAttributes,
) -> Result<OwnedHandle> {
    let path = encode_path(path.as_ref())?;
    // SAFETY: path is NUL-terminated; security attributes and template are
    // optional and passed as null.
    let h = unsafe {
        ffi::CreateFileW(
            PCWSTR(path.as_ptr()),
            access.bits(),
            share.bits(),
            ptr::null(),
            disposition as u32,
            flags.bits() | attributes.bits(),
            HANDLE::default(),
        )
    };
    adopt(h, "CreateFileW")
}

/// Size of an open file in bytes (`GetFileSize`).
pub fn file_size(file: &impl AsRawHandle) -> Result<u64> {
    let mut high = 0u32;
    clear_last_error();
    // SAFETY: `high` is a valid out-pointer for the duration of the call.
    let low = unsafe { ffi::GetFileSize(raw(file), &mut high) };
    // INVALID_FILE_SIZE is also a legal low half; only a set last error
    // distinguishes failure.
    if low == INVALID_FILE_SIZE {
        let code = last_error_code();
        if code != ERROR_SUCCESS {
            return Err(crate::Error::win32("GetFileSize", code));
        }
    }
    Ok(u64::from(high) << 32 | u64::from(low))
}

/// Synchronous read into `buf`; returns the number of bytes read (0 at EOF).
///
/// `file` must not have been opened with `CreateFileFlags::OVERLAPPED`.
pub fn read_file(file: &impl AsRawHandle, buf: &mut [u8]) -> Result<usize> {
    let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
    let mut read = 0u32;
    // SAFETY: buf is writable for `len` bytes; `read` is a valid out-pointer;
    // a null OVERLAPPED makes the call complete before returning.
    let ok = unsafe { ffi::ReadFile(raw(file), buf.as_mut_ptr().cast(), len, &mut read, ptr::null_mut()) };
    check(ok, "ReadFile")?;
    Ok(read as usize)
}

/// Read at `overlapped.position()`.
///
/// A queued request is reported as an error with `is_io_pending()`; its
/// completion is signalled through `overlapped.event`.
///
/// # Safety
///
/// If the read is queued, `buf` and `overlapped` must stay alive and unmoved
/// until it completes.
pub unsafe fn read_file_overlapped(
    file: &impl AsRawHandle,
    buf: &mut [u8],
    overlapped: &mut Overlapped,
) -> Result<usize> {
    let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
    let mut read = 0u32;
    // SAFETY: buffers are valid now; the caller guarantees they outlive a
    // queued request.
    let ok = unsafe { ffi::ReadFile(raw(file), buf.as_mut_ptr().cast(), len, &mut read, overlapped) };
    check(ok, "ReadFile")?;
    Ok(read as usize)
}

fn halves(v: u64) -> (u32, u32) {
    (v as u32, (v >> 32) as u32)
}

/// Exclusively lock `len` bytes at `offset`; fails at once if any part is
/// already locked.
pub fn lock_file(file: &impl AsRawHandle, offset: u64, len: u64) -> Result<()> {
    let (off_lo, off_hi) = halves(offset);
    let (len_lo, len_hi) = halves(len);
    // SAFETY: plain integer arguments on a caller-owned handle.
    let ok = unsafe { ffi::LockFile(raw(file), off_lo, off_hi, len_lo, len_hi) };
    check(ok, "LockFile")
}

pub fn unlock_file(file: &impl AsRawHandle, offset: u64, len: u64) -> Result<()> {
    let (off_lo, off_hi) = halves(offset);
    let (len_lo, len_hi) = halves(len);
    // SAFETY: plain integer arguments on a caller-owned handle.
    let ok = unsafe { ffi::UnlockFile(raw(file), off_lo, off_hi, len_lo, len_hi) };
    check(ok, "UnlockFile")
}

/// Lock `len` bytes starting at `overlapped.position()`.
///
/// Without `LockFlags::FAIL_IMMEDIATELY` the call blocks (or, on an
/// overlapped handle, queues) until the range is free.
///
/// # Safety
///
/// If `file` was opened for overlapped I/O, `overlapped` must stay alive and
/// unmoved until the lock request completes.
pub unsafe fn lock_file_ex(
    file: &impl AsRawHandle,
    flags: LockFlags,
    len: u64,
    overlapped: &mut Overlapped,
) -> Result<()> {
    let (len_lo, len_hi) = halves(len);
    // SAFETY: overlapped is valid now; the caller guarantees its lifetime for
    // a queued request.  dwReserved must be zero.
    let ok = unsafe { ffi::LockFileEx(raw(file), flags.bits(), 0, len_lo, len_hi, overlapped) };
    check(ok, "LockFileEx")
}

/// Send a control code to a device, synchronously.  Returns the number of
/// bytes written to `output`.
///
/// # Safety
///
/// Some control codes interpret the buffers as something other than plain
/// bytes (embedded pointers, `METHOD_NEITHER`); the caller vouches that
/// `input` and `output` have the layout `code` expects.
pub unsafe fn device_io_control(
    device: &impl AsRawHandle,
    code: u32,
    input: Option<&[u8]>,
    output: &mut [u8],
) -> Result<usize> {
    let (in_ptr, in_len) = input.map_or((ptr::null(), 0), |i| (i.as_ptr().cast::<c_void>(), i.len() as u32));
    let mut returned = 0u32;
    // SAFETY: buffer pointers and lengths describe live slices; a null
    // OVERLAPPED makes the call synchronous.
    let ok = unsafe {
        ffi::DeviceIoControl(
            raw(device),
            code,
            in_ptr,
            in_len,
            output.as_mut_ptr().cast(),
            output.len() as u32,
            &mut returned,
            ptr::null_mut(),
        )
    };
    check(ok, "DeviceIoControl")?;
    Ok(returned as usize)
}

// ── Directory search ──────────────────────────────────────────────────────────

/// Release via `FindClose`.
pub struct FindCloser;

impl Release for FindCloser {
    const NAME: &'static str = "FindClose";

    fn release(raw: RawHandle) -> bool {
        // SAFETY: `raw` came from a successful FindFirstFileW and is released
        // exactly once by the owning `Scoped`.
        unsafe { ffi::FindClose(HANDLE(raw)) }.as_bool()
    }
}

/// A directory-search cursor.  `FindClose` runs exactly once when it is
/// closed or dropped.
pub type FindHandle = Scoped<FindCloser>;

/// Start a search (`FindFirstFileW`).  `pattern` may contain `*` and `?`.
pub fn find_first_file(pattern: impl AsRef<Path>) -> Result<(FindHandle, Win32FindData)> {
    let pattern = encode_path(pattern.as_ref())?;
    let mut data = Win32FindData::default();
    // SAFETY: pattern is NUL-terminated; data is a correctly sized out-record.
    let h = unsafe { ffi::FindFirstFileW(PCWSTR(pattern.as_ptr()), &mut data) };
    let cursor = adopt(h, "FindFirstFileW")?;
    Ok((cursor, data))
}

/// Advance a search.  `Ok(false)` once the directory is exhausted.
pub fn find_next_file(cursor: &FindHandle, data: &mut Win32FindData) -> Result<bool> {
    // SAFETY: the cursor is live for the borrow; data is a valid out-record.
    let ok = unsafe { ffi::FindNextFileW(HANDLE(cursor.as_raw()), data) };
    if ok.as_bool() {
        return Ok(true);
    }
    let err = last_error("FindNextFileW");
    if err.code() == Some(ERROR_NO_MORE_FILES) {
        Ok(false)
    } else {
        Err(err)
    }
}

/// Iterator over the entries matching a search pattern.
///
/// The cursor is released as soon as the search is exhausted, fails, or the
/// iterator is dropped.
pub struct FindFiles {
    cursor: Option<FindHandle>,
    pending: Option<Win32FindData>,
}

/// Enumerate entries matching `pattern`.  A pattern that matches nothing
/// yields an empty iterator rather than `ERROR_FILE_NOT_FOUND`.
pub fn find_files(pattern: impl AsRef<Path>) -> Result<FindFiles> {
    match find_first_file(pattern) {
        Ok((cursor, first)) => Ok(FindFiles { cursor: Some(cursor), pending: Some(first) }),
        Err(e) if e.code() == Some(ERROR_FILE_NOT_FOUND) => Ok(FindFiles { cursor: None, pending: None }),
        Err(e) => Err(e),
    }
}

impl Iterator for FindFiles {
    type Item = Result<Win32FindData>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(first) = self.pending.take() {
            return Some(Ok(first));
        }
        let cursor = self.cursor.as_ref()?;
        let mut data = Win32FindData::default();
        match find_next_file(cursor, &mut data) {
            Ok(true) => Some(Ok(data)),
            Ok(false) => {
                self.cursor = None;
                None
            }
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

// ── File mappings ─────────────────────────────────────────────────────────────

/// A file-mapping object.
#[derive(Debug)]
pub struct FileMapping {
    handle: OwnedHandle,
}

impl FileMapping {
    /// Create (or open, if `name` exists) a mapping of `file`, or of the
    /// paging file when `file` is `None`.  `max_size` 0 means "the file's
    /// current size" and is invalid for paging-file mappings.
    pub fn create(
        file: Option<&dyn AsRawHandle>,
        protect: PageAccess,
        max_size: u64,
        name: Option<&str>,
    ) -> Result<Created<Self>> {
        let file = file.map_or(HANDLE(INVALID_HANDLE_VALUE as RawHandle), |f| raw(f));
        let name = wide::encode_opt(name)?;
        let (size_lo, size_hi) = halves(max_size);
        clear_last_error();
        // SAFETY: `name` is null or NUL-terminated and outlives the call;
        // null security attributes are allowed.
        let h = unsafe {
            ffi::CreateFileMappingW(file, ptr::null(), protect.bits(), size_hi, size_lo, optional_wide(&name))
        };
        let (handle, already_existed) = adopt_named(h, "CreateFileMappingW")?;
        Ok(Created { object: Self { handle }, already_existed })
    }

    /// Open an existing named mapping.
    pub fn open(access: FileMapAccess, inherit: bool, name: &str) -> Result<Self> {
        let name = wide::encode(name)?;
        // SAFETY: name is NUL-terminated and outlives the call.
        let h = unsafe { ffi::OpenFileMappingW(access.bits(), BOOL::from(inherit), PCWSTR(name.as_ptr())) };
        Ok(Self { handle: adopt(h, "OpenFileMappingW")? })
    }

    /// Map `len` bytes starting at `offset` (a multiple of the allocation
    /// granularity).  `len` 0 maps to the end of the mapping.
    pub fn map_view(&self, access: FileMapAccess, offset: u64, len: usize) -> Result<MappedView> {
        let (off_lo, off_hi) = halves(offset);
        // SAFETY: the mapping handle is live for the borrow.  The returned view
        // stays valid after the mapping handle is closed.
        let base = unsafe { ffi::MapViewOfFile(raw(&self.handle), access.bits(), off_hi, off_lo, len) };
        let view = Scoped::from_raw(base).ok_or_else(|| last_error("MapViewOfFile"))?;
        Ok(MappedView { view, len })
    }
}

impl AsRawHandle for FileMapping {
    fn as_raw_handle(&self) -> RawHandle {
        self.handle.as_raw()
    }
}

/// Release via `UnmapViewOfFile`.
pub struct ViewUnmapper;

impl Release for ViewUnmapper {
    const NAME: &'static str = "UnmapViewOfFile";

    fn release(raw: RawHandle) -> bool {
        // SAFETY: `raw` is a base address returned by MapViewOfFile and is
        // unmapped exactly once by the owning `Scoped`.
        unsafe { ffi::UnmapViewOfFile(raw) }.as_bool()
    }
}

/// A mapped view; unmapped on drop.
#[derive(Debug)]
pub struct MappedView {
    view: Scoped<ViewUnmapper>,
    len: usize,
}

impl MappedView {
    pub fn as_ptr(&self) -> *mut u8 {
        self.view.as_raw().cast()
    }

    /// Requested length; 0 if the view was mapped to the end of the mapping.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// # Safety
    ///
    /// The view must have been mapped with a non-zero length, and no other
    /// thread or process may write the mapped range while the slice lives.
    pub unsafe fn as_slice(&self) -> &[u8] {
        // SAFETY: base is valid for `len` bytes while `self` is alive; the
        // caller rules out concurrent writers.
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// # Safety
    ///
    /// As for `as_slice`, the view must also have been mapped with write access,
    /// and no one else may access the range while the slice lives.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn as_mut_slice(&self) -> &mut [u8] {
        // SAFETY: base is valid and writable for `len` bytes; the caller
        // guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.as_ptr(), self.len) }
    }
}

// ── Disk free space ───────────────────────────────────────────────────────────

/// Cluster geometry of the volume at `root` (`"C:\\"`), or of the current
/// directory's volume when `None`.
pub fn disk_free_space(root: Option<&Path>) -> Result<DiskGeometry> {
    let root = root.map(encode_path).transpose()?;
    let mut g = DiskGeometry::default();
    // SAFETY: `root` is null or NUL-terminated; every out-pointer refers to a
    // field of `g`.
    let ok = unsafe {
        ffi::GetDiskFreeSpaceW(
            optional_wide(&root),
            &mut g.sectors_per_cluster,
            &mut g.bytes_per_sector,
            &mut g.number_of_free_clusters,
            &mut g.total_number_of_clusters,
        )
    };
    check(ok, "GetDiskFreeSpaceW")?;
    Ok(g)
}

/// Byte totals for the volume containing `dir`, honouring per-user quotas.
pub fn disk_free_space_ex(dir: Option<&Path>) -> Result<DiskSpace> {
    let dir = dir.map(encode_path).transpose()?;
    let mut s = DiskSpace::default();
    // SAFETY: `dir` is null or NUL-terminated; every out-pointer refers to a
    // field of `s`.
    let ok = unsafe {
        ffi::GetDiskFreeSpaceExW(
            optional_wide(&dir),
            &mut s.free_bytes_available,
            &mut s.total_number_of_bytes,
            &mut s.total_number_of_free_bytes,
        )
    };
    check(ok, "GetDiskFreeSpaceExW")?;
    Ok(s)
}
