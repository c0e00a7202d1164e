// ── Locale enumeration ────────────────────────────────────────────────────────
//
// `EnumSystemLocalesW` calls a per-item callback synchronously on the calling
// thread and gives it no user-data pointer.  The callback therefore pushes
// into a thread-local collector that is armed only while an enumeration is
// running.  The OS call lives in `platform::win32::sysinfo::enum_locales`.

use std::cell::RefCell;

use crate::{
    consts::{LCID_INSTALLED, LCID_SUPPORTED},
    error::{Error, Result},
};

/// Which locale identifiers to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum LocaleSet {
    Installed = LCID_INSTALLED,
    Supported = LCID_SUPPORTED,
}

impl TryFrom<u32> for LocaleSet {
    type Error = Error;

    fn try_from(flag: u32) -> Result<Self> {
        match flag {
            LCID_INSTALLED => Ok(Self::Installed),
            LCID_SUPPORTED => Ok(Self::Supported),
            other => Err(Error::InvalidLocaleFlag(other)),
        }
    }
}

// ── Collector ─────────────────────────────────────────────────────────────────

thread_local! {
    static SINK: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// Armed collector; disarmed on drop even if the enumeration unwinds.
struct Armed;

impl Armed {
    fn arm() -> Result<Self> {
        SINK.with(|sink| {
            let mut sink = sink.borrow_mut();
            if sink.is_some() {
                return Err(Error::EnumerationInProgress);
            }
            *sink = Some(Vec::new());
            Ok(Self)
        })
    }

    fn take(self) -> Vec<String> {
        SINK.with(|sink| sink.borrow_mut().take()).unwrap_or_default()
    }
}

impl Drop for Armed {
    fn drop(&mut self) {
        SINK.with(|sink| sink.borrow_mut().take());
    }
}

/// Append one enumerated value.  Always asks the enumeration to continue.
pub(crate) fn push(item: String) -> bool {
    SINK.with(|sink| {
        if let Some(items) = sink.borrow_mut().as_mut() {
            items.push(item);
        }
    });
    true
}

/// Validate `flag`, then run `enumerate` with the collector armed and return
/// everything pushed during it, in push order.
///
/// An invalid `flag` is rejected before `enumerate` runs.
pub fn collect_locales<F>(flag: u32, enumerate: F) -> Result<Vec<String>>
where
    F: FnOnce(LocaleSet) -> Result<()>,
{
    let set = LocaleSet::try_from(flag)?;
    let armed = Armed::arm()?;
    enumerate(set)?;
    let items = armed.take();
    log::debug!("enumerated {} {:?} locales", items.len(), set);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_come_back_in_callback_order() {
        let got = collect_locales(LCID_INSTALLED, |set| {
            assert_eq!(set, LocaleSet::Installed);
            for id in ["00000409", "00000407", "00000409", "0000040C"] {
                assert!(push(id.to_owned()));
            }
            Ok(())
        })
        .expect("installed is a valid selector");
        assert_eq!(got, ["00000409", "00000407", "00000409", "0000040C"]);
    }

    #[test]
    fn supported_selector_is_accepted() {
        let got = collect_locales(LCID_SUPPORTED, |set| {
            assert_eq!(set, LocaleSet::Supported);
            push("00000411".to_owned());
            Ok(())
        })
        .expect("supported is a valid selector");
        assert_eq!(got, ["00000411"]);
    }

    #[test]
    fn invalid_selector_is_rejected_before_enumeration() {
        for flag in [0, 3, 4, u32::MAX] {
            let mut called = false;
            let got = collect_locales(flag, |_| {
                called = true;
                Ok(())
            });
            assert_eq!(got, Err(Error::InvalidLocaleFlag(flag)));
            assert!(!called, "enumeration ran for flag {flag}");
        }
    }

    #[test]
    fn enumeration_failure_discards_partial_results() {
        let got = collect_locales(LCID_INSTALLED, |_| {
            push("00000409".to_owned());
            Err(Error::win32("EnumSystemLocalesW", 0x57))
        });
        assert_eq!(got, Err(Error::win32("EnumSystemLocalesW", 0x57)));
        // The collector is disarmed again: a fresh run starts empty.
        let again = collect_locales(LCID_INSTALLED, |_| Ok(())).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn nested_enumeration_is_rejected() {
        let got = collect_locales(LCID_INSTALLED, |_| {
            let inner = collect_locales(LCID_SUPPORTED, |_| Ok(()));
            assert_eq!(inner, Err(Error::EnumerationInProgress));
            push("outer".to_owned());
            Ok(())
        });
        assert_eq!(got.unwrap(), ["outer"]);
    }

    #[test]
    fn push_outside_enumeration_is_dropped() {
        assert!(push("stray".to_owned()));
        let got = collect_locales(LCID_INSTALLED, |_| Ok(())).unwrap();
        assert!(got.is_empty());
    }
}
