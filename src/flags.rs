// ── Typed flag sets and closed enumerations ───────────────────────────────────
//
// Each set mirrors one kernel32 argument.  Values are bit-exact with the SDK
// headers; combinations are not validated here (the OS rejects bad ones).

use bitflags::bitflags;

use crate::consts;

bitflags! {
    /// Generic access rights for `CreateFileW`, `DuplicateHandle`, …
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileAccess: u32 {
        const GENERIC_READ    = 0x8000_0000;
        const GENERIC_WRITE   = 0x4000_0000;
        const GENERIC_EXECUTE = 0x2000_0000;
        const GENERIC_ALL     = 0x1000_0000;
    }

    /// `dwShareMode` for `CreateFileW`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShareMode: u32 {
        const READ   = 0x0000_0001;
        const WRITE  = 0x0000_0002;
        const DELETE = 0x0000_0004;
    }

    /// The flag half of `dwFlagsAndAttributes` for `CreateFileW`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CreateFileFlags: u32 {
        const BACKUP_SEMANTICS    = 0x0200_0000;
        const DELETE_ON_CLOSE     = 0x0400_0000;
        const FIRST_PIPE_INSTANCE = 0x0008_0000;
        const NO_BUFFERING        = 0x2000_0000;
        const OPEN_NO_RECALL      = 0x0010_0000;
        /// Cannot be combined with `CreationDisposition::CreateAlways`.
        const OPEN_REPARSE_POINT  = 0x0020_0000;
        const OVERLAPPED          = 0x4000_0000;
        const POSIX_SEMANTICS     = 0x0100_0000;
        const RANDOM_ACCESS       = 0x1000_0000;
        const SEQUENTIAL_SCAN     = 0x0800_0000;
        /// Server editions only.
        const SESSION_AWARE       = 0x0080_0000;
        const WRITE_THROUGH       = 0x8000_0000;
    }

    /// File attribute bits (`FILE_ATTRIBUTE_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileAttributes: u32 {
        const READONLY            = 0x0000_0001;
        const HIDDEN              = 0x0000_0002;
        const SYSTEM              = 0x0000_0004;
        const DIRECTORY           = 0x0000_0010;
        const ARCHIVE             = 0x0000_0020;
        const DEVICE              = 0x0000_0040;
        const NORMAL              = 0x0000_0080;
        const TEMPORARY           = 0x0000_0100;
        const SPARSE_FILE         = 0x0000_0200;
        const REPARSE_POINT       = 0x0000_0400;
        const COMPRESSED          = 0x0000_0800;
        const OFFLINE             = 0x0000_1000;
        const NOT_CONTENT_INDEXED = 0x0000_2000;
        const ENCRYPTED           = 0x0000_4000;

        // Unknown bits reported by newer file systems are kept, not dropped.
        const _ = !0;
    }

    /// Memory-protection options (`PAGE_*`) for `CreateFileMappingW`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PageAccess: u32 {
        const NOACCESS          = 0x01;
        const READONLY          = 0x02;
        const READWRITE         = 0x04;
        const WRITECOPY         = 0x08;
        const EXECUTE           = 0x10;
        const EXECUTE_READ      = 0x20;
        const EXECUTE_READWRITE = 0x40;
        const EXECUTE_WRITECOPY = 0x80;
    }

    /// Desired access for `MapViewOfFile` / `OpenFileMappingW`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileMapAccess: u32 {
        const COPY       = consts::FILE_MAP_COPY;
        const WRITE      = consts::FILE_MAP_WRITE;
        const READ       = consts::FILE_MAP_READ;
        const EXECUTE    = consts::FILE_MAP_EXECUTE;
        const ALL_ACCESS = consts::FILE_MAP_ALL_ACCESS;
    }

    /// `dwFlags` for `FormatMessageW`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatMessageFlags: u32 {
        const ALLOCATE_BUFFER = 0x0000_0100;
        const IGNORE_INSERTS  = 0x0000_0200;
        const FROM_STRING     = 0x0000_0400;
        const FROM_HMODULE    = 0x0000_0800;
        const FROM_SYSTEM     = 0x0000_1000;
        const ARGUMENT_ARRAY  = 0x0000_2000;
    }

    /// `dwFlags` for `LockFileEx`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LockFlags: u32 {
        const FAIL_IMMEDIATELY = consts::LOCKFILE_FAIL_IMMEDIATELY;
        const EXCLUSIVE        = consts::LOCKFILE_EXCLUSIVE_LOCK;
    }

    /// `dwOptions` for `DuplicateHandle`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DuplicateOptions: u32 {
        const CLOSE_SOURCE = 0x0000_0001;
        const SAME_ACCESS  = 0x0000_0002;
    }
}

// ── CreationDisposition ───────────────────────────────────────────────────────

/// `dwCreationDisposition` for `CreateFileW`.  Exactly one value per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CreationDisposition {
    CreateNew = 1,
    CreateAlways = 2,
    OpenExisting = 3,
    OpenAlways = 4,
    TruncateExisting = 5,
}

// ── Console control events ────────────────────────────────────────────────────

/// Signals delivered to a console control handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CtrlType {
    CtrlC = 0,
    CtrlBreak = 1,
    Close = 2,
    Logoff = 5,
    Shutdown = 6,
}

impl TryFrom<u32> for CtrlType {
    type Error = u32;

    fn try_from(raw: u32) -> std::result::Result<Self, u32> {
        match raw {
            0 => Ok(Self::CtrlC),
            1 => Ok(Self::CtrlBreak),
            2 => Ok(Self::Close),
            5 => Ok(Self::Logoff),
            6 => Ok(Self::Shutdown),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_discriminants_match_winbase() {
        assert_eq!(CreationDisposition::CreateNew as u32, 1);
        assert_eq!(CreationDisposition::OpenExisting as u32, 3);
        assert_eq!(CreationDisposition::TruncateExisting as u32, 5);
    }

    #[test]
    fn ctrl_type_round_trips_known_values_only() {
        for t in [
            CtrlType::CtrlC,
            CtrlType::CtrlBreak,
            CtrlType::Close,
            CtrlType::Logoff,
            CtrlType::Shutdown,
        ] {
            assert_eq!(CtrlType::try_from(t as u32), Ok(t));
        }
        assert_eq!(CtrlType::try_from(3), Err(3));
        assert_eq!(CtrlType::try_from(4), Err(4));
    }

    #[test]
    fn file_attributes_keep_unknown_bits() {
        let raw = 0x0008_0000 | FileAttributes::DIRECTORY.bits();
        let attrs = FileAttributes::from_bits_retain(raw);
        assert!(attrs.contains(FileAttributes::DIRECTORY));
        assert_eq!(attrs.bits(), raw);
    }

    #[test]
    fn read_write_access_combines_high_bits() {
        let rw = FileAccess::GENERIC_READ | FileAccess::GENERIC_WRITE;
        assert_eq!(rw.bits(), 0xC000_0000);
    }

    #[test]
    fn map_and_lock_flags_alias_the_raw_constants() {
        assert_eq!(FileMapAccess::ALL_ACCESS.bits(), 0x000F_001F);
        assert_eq!((LockFlags::EXCLUSIVE | LockFlags::FAIL_IMMEDIATELY).bits(), 3);
        assert_eq!(CreateFileFlags::WRITE_THROUGH.bits(), 0x8000_0000);
    }
}
