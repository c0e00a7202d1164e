// ── Presentation helpers ──────────────────────────────────────────────────────
//
// Pure string work behind `platform::win32::sysinfo::{memory_info,
// module_directory}`.  No OS calls.

use std::fmt::Write as _;

use crate::records::MemoryStatus;

/// Native path separator in module file names.
pub const PATH_SEPARATOR: char = '\\';

/// Render every `MemoryStatus` field except `length`, in declaration order,
/// as `"<Label>: <value> "`.
pub fn memory_report(ms: &MemoryStatus) -> String {
    let fields: [(&str, u64); 7] = [
        ("Memory Load", u64::from(ms.memory_load)),
        ("Total Physical", ms.total_phys as u64),
        ("Avail Physical", ms.avail_phys as u64),
        ("Total Page File", ms.total_page_file as u64),
        ("Avail Page File", ms.avail_page_file as u64),
        ("Total Virtual", ms.total_virtual as u64),
        ("Avail Virtual", ms.avail_virtual as u64),
    ];

    let mut out = String::new();
    for (label, value) in fields {
        // Writing to a String cannot fail.
        let _ = write!(out, "{label}: {value} ");
    }
    out
}

/// Everything before the last `\` in `path`, or `""` if there is none.
pub fn directory_of(path: &str) -> String {
    match path.rfind(PATH_SEPARATOR) {
        Some(idx) => path[..idx].to_owned(),
        None => String::new(),
    }
}
