// ── UTF-16 marshalling ────────────────────────────────────────────────────────
//
// Every `W` entry point takes NUL-terminated UTF-16.  Strings with an
// interior NUL would be silently truncated by the OS, so they are rejected
// before the call instead.

use crate::error::{Error, Result};

/// Encode `s` as NUL-terminated UTF-16.
pub fn encode(s: &str) -> Result<Vec<u16>> {
    if s.contains('\0') {
        return Err(Error::InteriorNul);
    }
    Ok(s.encode_utf16().chain(std::iter::once(0)).collect())
}

/// Encode an optional name; `None` stays `None` so the caller can pass null.
pub fn encode_opt(s: Option<&str>) -> Result<Option<Vec<u16>>> {
    s.map(encode).transpose()
}

/// Encode an OS path as NUL-terminated UTF-16, keeping unpaired surrogates.
#[cfg(windows)]
pub fn encode_os(s: &std::ffi::OsStr) -> Result<Vec<u16>> {
    use std::os::windows::ffi::OsStrExt;

    let mut wide: Vec<u16> = s.encode_wide().collect();
    if wide.contains(&0) {
        return Err(Error::InteriorNul);
    }
    wide.push(0);
    Ok(wide)
}

/// Length of a NUL-terminated UTF-16 buffer (the whole slice if no NUL).
pub fn nul_len(buf: &[u16]) -> usize {
    buf.iter().position(|&c| c == 0).unwrap_or(buf.len())
}

/// Decode a NUL-terminated UTF-16 buffer, replacing invalid sequences.
pub fn decode(buf: &[u16]) -> String {
    String::from_utf16_lossy(&buf[..nul_len(buf)])
}

/// Decode a NUL-terminated UTF-16 buffer into an OS string without loss.
#[cfg(windows)]
pub fn decode_os(buf: &[u16]) -> std::ffi::OsString {
    use std::os::windows::ffi::OsStringExt;

    std::ffi::OsString::from_wide(&buf[..nul_len(buf)])
}

/// Copy `s` into a fixed inline buffer, truncating so a terminator always fits.
pub fn fill_inline<const N: usize>(s: &str) -> [u16; N] {
    let mut out = [0u16; N];
    for (slot, unit) in out.iter_mut().take(N.saturating_sub(1)).zip(s.encode_utf16()) {
        *slot = unit;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_appends_terminator() {
        assert_eq!(encode("ab").unwrap(), vec![0x61, 0x62, 0]);
        assert_eq!(encode("").unwrap(), vec![0]);
    }

    #[test]
    fn encode_rejects_interior_nul() {
        assert_eq!(encode("a\0b"), Err(Error::InteriorNul));
        assert_eq!(encode_opt(Some("x\0")), Err(Error::InteriorNul));
        assert_eq!(encode_opt(None), Ok(None));
    }

    #[test]
    fn encode_uses_surrogate_pairs() {
        assert_eq!(encode("\u{1F600}").unwrap(), vec![0xD83D, 0xDE00, 0]);
    }

    #[test]
    fn decode_stops_at_first_nul() {
        let buf = [0x43, 0x3A, 0x5C, 0, 0x78, 0x79];
        assert_eq!(decode(&buf), "C:\\");
        assert_eq!(decode(&[0x61, 0x62]), "ab");
        assert_eq!(decode(&[]), "");
    }

    #[test]
    fn fill_inline_truncates_and_terminates() {
        let buf: [u16; 4] = fill_inline("abcdef");
        assert_eq!(buf, [0x61, 0x62, 0x63, 0]);
        let buf: [u16; 4] = fill_inline("a");
        assert_eq!(buf, [0x61, 0, 0, 0]);
    }
}
