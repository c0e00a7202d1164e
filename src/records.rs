// ── Fixed-layout ABI records ──────────────────────────────────────────────────
//
// Field-for-field reproductions of the kernel32 structures, `#[repr(C)]`,
// sequential, no reordering.  Inline text is a fixed `[u16; N]` buffer, as in
// the native headers.  Each record is filled in place by one OS call and has
// no lifecycle beyond it.
//
// Field names are the native names without their Hungarian prefix.

use std::ffi::c_void;

use serde::Serialize;

use crate::{
    consts::{CSD_VERSION_LEN, MAX_ALTERNATE, MAX_PATH},
    flags::FileAttributes,
    handle::RawHandle,
    wide,
};

// ── FILETIME ──────────────────────────────────────────────────────────────────

/// 100-nanosecond intervals since 1601-01-01 UTC, split in two halves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(C)]
pub struct FileTime {
    pub low_date_time: u32,
    pub high_date_time: u32,
}

impl FileTime {
    pub fn from_u64(ticks: u64) -> Self {
        Self {
            low_date_time: ticks as u32,
            high_date_time: (ticks >> 32) as u32,
        }
    }

    pub fn as_u64(self) -> u64 {
        u64::from(self.high_date_time) << 32 | u64::from(self.low_date_time)
    }
}

// ── OVERLAPPED ────────────────────────────────────────────────────────────────

/// Descriptor for overlapped (asynchronous) I/O and for `LockFileEx`.
///
/// The caller owns it and must keep it alive, unmoved, until the operation it
/// was passed to has completed.  The `Pointer` arm of the native offset union
/// is not exposed; use `offset` / `offset_high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Overlapped {
    /// `Internal`: status code of the request.
    pub internal: usize,
    /// `InternalHigh`: bytes transferred.
    pub internal_high: usize,
    pub offset: u32,
    pub offset_high: u32,
    /// `hEvent`: signalled on completion, or null.
    pub event: RawHandle,
}

impl Default for Overlapped {
    fn default() -> Self {
        Self {
            internal: 0,
            internal_high: 0,
            offset: 0,
            offset_high: 0,
            event: std::ptr::null_mut(),
        }
    }
}

impl Overlapped {
    /// A descriptor positioned at `offset` with no completion event.
    pub fn at_offset(offset: u64) -> Self {
        Self {
            offset: offset as u32,
            offset_high: (offset >> 32) as u32,
            ..Self::default()
        }
    }

    /// Attach a completion event.
    pub fn with_event(mut self, event: RawHandle) -> Self {
        self.event = event;
        self
    }

    /// The 64-bit file offset.
    pub fn position(&self) -> u64 {
        u64::from(self.offset_high) << 32 | u64::from(self.offset)
    }
}

// ── SYSTEM_INFO ───────────────────────────────────────────────────────────────

/// Filled by `GetSystemInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct SystemInfo {
    pub processor_architecture: u16,
    pub reserved: u16,
    pub page_size: u32,
    pub minimum_application_address: *mut c_void,
    pub maximum_application_address: *mut c_void,
    pub active_processor_mask: usize,
    pub number_of_processors: u32,
    pub processor_type: u32,
    pub allocation_granularity: u32,
    pub processor_level: u16,
    pub processor_revision: u16,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            processor_architecture: 0,
            reserved: 0,
            page_size: 0,
            minimum_application_address: std::ptr::null_mut(),
            maximum_application_address: std::ptr::null_mut(),
            active_processor_mask: 0,
            number_of_processors: 0,
            processor_type: 0,
            allocation_granularity: 0,
            processor_level: 0,
            processor_revision: 0,
        }
    }
}

/// Serializable copy of a `SystemInfo`, with addresses as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemSummary {
    pub processor_architecture: u16,
    pub page_size: u32,
    pub minimum_application_address: usize,
    pub maximum_application_address: usize,
    pub active_processor_mask: usize,
    pub number_of_processors: u32,
    pub processor_type: u32,
    pub allocation_granularity: u32,
    pub processor_level: u16,
    pub processor_revision: u16,
}

impl SystemInfo {
    pub fn summary(&self) -> SystemSummary {
        SystemSummary {
            processor_architecture: self.processor_architecture,
            page_size: self.page_size,
            minimum_application_address: self.minimum_application_address as usize,
            maximum_application_address: self.maximum_application_address as usize,
            active_processor_mask: self.active_processor_mask,
            number_of_processors: self.number_of_processors,
            processor_type: self.processor_type,
            allocation_granularity: self.allocation_granularity,
            processor_level: self.processor_level,
            processor_revision: self.processor_revision,
        }
    }
}

// ── MEMORYSTATUS ──────────────────────────────────────────────────────────────

/// Filled by `GlobalMemoryStatus`.  The OS sets `length` itself.
///
/// The byte counts are `SIZE_T`; on machines with more than 4 GB the 32-bit
/// variant saturates, which is why `MemoryStatusEx` exists.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(C)]
pub struct MemoryStatus {
    pub length: u32,
    /// Approximate percentage of physical memory in use (0..=100).
    pub memory_load: u32,
    pub total_phys: usize,
    pub avail_phys: usize,
    pub total_page_file: usize,
    pub avail_page_file: usize,
    pub total_virtual: usize,
    pub avail_virtual: usize,
}

// ── MEMORYSTATUSEX ────────────────────────────────────────────────────────────

/// Filled by `GlobalMemoryStatusEx`.  Self-describing size: `length` must be
/// set before the call, which `new()` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(C)]
pub struct MemoryStatusEx {
    pub length: u32,
    pub memory_load: u32,
    pub total_phys: u64,
    pub avail_phys: u64,
    pub total_page_file: u64,
    pub avail_page_file: u64,
    pub total_virtual: u64,
    pub avail_virtual: u64,
    /// Always zero on current Windows versions.
    pub avail_extended_virtual: u64,
}

impl MemoryStatusEx {
    pub fn new() -> Self {
        Self {
            length: std::mem::size_of::<Self>() as u32,
            memory_load: 0,
            total_phys: 0,
            avail_phys: 0,
            total_page_file: 0,
            avail_page_file: 0,
            total_virtual: 0,
            avail_virtual: 0,
            avail_extended_virtual: 0,
        }
    }

    pub fn total_phys_kb(&self) -> u64 {
        self.total_phys / 1024
    }

    /// Physical memory in use, in bytes.
    pub fn occupied(&self) -> u64 {
        self.total_phys.saturating_sub(self.avail_phys)
    }

    pub fn occupied_kb(&self) -> u64 {
        self.occupied() / 1024
    }

    pub fn available(&self) -> u64 {
        self.avail_phys
    }

    pub fn available_kb(&self) -> u64 {
        self.available() / 1024
    }
}

impl Default for MemoryStatusEx {
    fn default() -> Self {
        Self::new()
    }
}

// ── OSVERSIONINFOEXW ──────────────────────────────────────────────────────────

/// Filled by `GetVersionExW`.  Self-describing size, set by `new()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct OsVersionInfoEx {
    pub os_version_info_size: u32,
    pub major_version: u32,
    pub minor_version: u32,
    pub build_number: u32,
    pub platform_id: u32,
    /// Latest service pack, e.g. `"Service Pack 3"`; empty if none.
    pub csd_version: [u16; CSD_VERSION_LEN],
    pub service_pack_major: u16,
    pub service_pack_minor: u16,
    pub suite_mask: u16,
    pub product_type: u8,
    pub reserved: u8,
}

/// Serializable copy of an `OsVersionInfoEx`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub platform_id: u32,
    pub service_pack: String,
    pub service_pack_major: u16,
    pub service_pack_minor: u16,
    pub suite_mask: u16,
    pub product_type: u8,
}

impl OsVersionInfoEx {
    pub fn new() -> Self {
        Self {
            os_version_info_size: std::mem::size_of::<Self>() as u32,
            major_version: 0,
            minor_version: 0,
            build_number: 0,
            platform_id: 0,
            csd_version: [0; CSD_VERSION_LEN],
            service_pack_major: 0,
            service_pack_minor: 0,
            suite_mask: 0,
            product_type: 0,
            reserved: 0,
        }
    }

    pub fn csd_version(&self) -> String {
        wide::decode(&self.csd_version)
    }

    pub fn summary(&self) -> OsVersion {
        OsVersion {
            major: self.major_version,
            minor: self.minor_version,
            build: self.build_number,
            platform_id: self.platform_id,
            service_pack: self.csd_version(),
            service_pack_major: self.service_pack_major,
            service_pack_minor: self.service_pack_minor,
            suite_mask: self.suite_mask,
            product_type: self.product_type,
        }
    }
}

impl Default for OsVersionInfoEx {
    fn default() -> Self {
        Self::new()
    }
}

// ── WIN32_FIND_DATAW ──────────────────────────────────────────────────────────

/// One directory entry, filled by `FindFirstFileW` / `FindNextFileW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Win32FindData {
    pub file_attributes: u32,
    pub creation_time: FileTime,
    pub last_access_time: FileTime,
    pub last_write_time: FileTime,
    pub file_size_high: u32,
    pub file_size_low: u32,
    /// Reparse tag when `REPARSE_POINT` is set.
    pub reserved0: u32,
    pub reserved1: u32,
    pub file_name: [u16; MAX_PATH],
    /// Classic 8.3 name; empty when the long name already fits.
    pub alternate_file_name: [u16; MAX_ALTERNATE],
}

/// Serializable copy of a `Win32FindData`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindEntry {
    pub name: String,
    pub alternate_name: String,
    pub attributes: u32,
    pub size: u64,
    pub creation_time: u64,
    pub last_access_time: u64,
    pub last_write_time: u64,
}

impl Default for Win32FindData {
    fn default() -> Self {
        Self {
            file_attributes: 0,
            creation_time: FileTime::default(),
            last_access_time: FileTime::default(),
            last_write_time: FileTime::default(),
            file_size_high: 0,
            file_size_low: 0,
            reserved0: 0,
            reserved1: 0,
            file_name: [0; MAX_PATH],
            alternate_file_name: [0; MAX_ALTERNATE],
        }
    }
}

impl Win32FindData {
    pub fn file_name(&self) -> String {
        wide::decode(&self.file_name)
    }

    pub fn alternate_file_name(&self) -> String {
        wide::decode(&self.alternate_file_name)
    }

    pub fn file_size(&self) -> u64 {
        u64::from(self.file_size_high) << 32 | u64::from(self.file_size_low)
    }

    pub fn attributes(&self) -> FileAttributes {
        FileAttributes::from_bits_retain(self.file_attributes)
    }

    pub fn is_directory(&self) -> bool {
        self.attributes().contains(FileAttributes::DIRECTORY)
    }

    /// `"."` and `".."`, which every non-root directory listing contains.
    pub fn is_dot_entry(&self) -> bool {
        matches!(self.file_name().as_str(), "." | "..")
    }

    pub fn entry(&self) -> FindEntry {
        FindEntry {
            name: self.file_name(),
            alternate_name: self.alternate_file_name(),
            attributes: self.file_attributes,
            size: self.file_size(),
            creation_time: self.creation_time.as_u64(),
            last_access_time: self.last_access_time.as_u64(),
            last_write_time: self.last_write_time.as_u64(),
        }
    }
}

// ── Disk free space ───────────────────────────────────────────────────────────

/// Out-parameters of `GetDiskFreeSpaceW`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskGeometry {
    pub sectors_per_cluster: u32,
    pub bytes_per_sector: u32,
    pub number_of_free_clusters: u32,
    pub total_number_of_clusters: u32,
}

impl DiskGeometry {
    pub fn bytes_per_cluster(&self) -> u64 {
        u64::from(self.sectors_per_cluster) * u64::from(self.bytes_per_sector)
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_per_cluster() * u64::from(self.total_number_of_clusters)
    }

    pub fn free_bytes(&self) -> u64 {
        self.bytes_per_cluster() * u64::from(self.number_of_free_clusters)
    }
}

/// Out-parameters of `GetDiskFreeSpaceExW`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiskSpace {
    /// Free bytes available to the calling user (quota-aware).
    pub free_bytes_available: u64,
    pub total_number_of_bytes: u64,
    pub total_number_of_free_bytes: u64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
