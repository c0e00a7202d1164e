#![cfg(windows)]

use std::{
    io::Write as _,
    path::Path,
    sync::Arc,
    thread,
    time::Duration,
};

use k32::{
    consts::{
        ERROR_ALREADY_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_NOT_OWNER, LCID_INSTALLED, LCID_SUPPORTED, MAX_PATH,
        STILL_ACTIVE,
    },
    flags::{CreateFileFlags, CreationDisposition, FileAccess, FileAttributes, FileMapAccess, LockFlags, PageAccess, ShareMode},
    platform::win32::{
        fs, process,
        sync::{self, Event, KernelMutex, Semaphore},
        sysinfo,
    },
    AsRawHandle, Error, Overlapped, WaitResult,
};
use tempfile::TempDir;

fn scratch() -> TempDir {
    tempfile::tempdir().expect("create scratch dir")
}

fn write(path: &Path, bytes: &[u8]) {
    let mut f = std::fs::File::create(path).expect("create file");
    f.write_all(bytes).expect("write file");
}

fn open_read(path: &Path) -> k32::platform::win32::OwnedHandle {
    fs::create_file(
        path,
        FileAccess::GENERIC_READ,
        ShareMode::READ | ShareMode::WRITE,
        CreationDisposition::OpenExisting,
        CreateFileFlags::empty(),
        FileAttributes::NORMAL,
    )
    .expect("open file")
}

fn unique(tag: &str) -> String {
    format!("k32-test-{tag}-{}-{:?}", process::current_process_id(), thread::current().id())
}

// ── File system ───────────────────────────────────────────────────────────────

#[test]
fn read_back_through_create_file() {
    let dir = scratch();
    let path = dir.path().join("data.bin");
    write(&path, b"kernel32");

    let file = open_read(&path);
    assert_eq!(fs::file_size(&file).unwrap(), 8);

    let mut buf = [0u8; 16];
    let n = fs::read_file(&file, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"kernel32");
    assert_eq!(fs::read_file(&file, &mut buf).unwrap(), 0);
    assert!(file.close());
}

#[test]
fn missing_file_reports_not_found() {
    let dir = scratch();
    let err = fs::create_file(
        dir.path().join("absent.txt"),
        FileAccess::GENERIC_READ,
        ShareMode::READ,
        CreationDisposition::OpenExisting,
        CreateFileFlags::empty(),
        FileAttributes::NORMAL,
    )
    .unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert!(fs::file_attributes(dir.path().join("absent.txt")).unwrap_err().is_not_found());
}

#[test]
fn copy_move_delete() {
    let dir = scratch();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let c = dir.path().join("c.txt");
    write(&a, b"abc");

    fs::copy_file(&a, &b, true).unwrap();
    let err = fs::copy_file(&a, &b, true).unwrap_err();
    assert!(matches!(err.code(), Some(80) | Some(ERROR_ALREADY_EXISTS)), "{err}");

    fs::move_file(&b, &c).unwrap();
    assert!(!b.exists());
    assert_eq!(std::fs::read(&c).unwrap(), b"abc");

    fs::delete_file(&c).unwrap();
    assert!(fs::delete_file(&c).unwrap_err().is_not_found());
}

#[test]
fn directories_and_attributes() {
    let dir = scratch();
    let sub = dir.path().join("sub");
    fs::create_directory(&sub).unwrap();
    assert!(fs::file_attributes(&sub).unwrap().contains(FileAttributes::DIRECTORY));
    assert_eq!(fs::create_directory(&sub).unwrap_err().code(), Some(ERROR_ALREADY_EXISTS));

    let file = sub.join("f.txt");
    write(&file, b"x");
    fs::set_file_attributes(&file, FileAttributes::READONLY).unwrap();
    assert!(fs::file_attributes(&file).unwrap().contains(FileAttributes::READONLY));
    fs::set_file_attributes(&file, FileAttributes::NORMAL).unwrap();

    std::fs::remove_file(&file).unwrap();
    fs::remove_directory(&sub).unwrap();
    assert!(!sub.exists());
}

#[test]
fn full_path_resolves_relative_names() {
    let full = fs::full_path_name("some-file.txt").unwrap();
    assert!(full.is_absolute());
    assert!(full.ends_with("some-file.txt"));
}

#[test]
fn full_path_grows_past_max_path() {
    let dir = scratch();
    let long = dir.path().join("x".repeat(MAX_PATH + 40));
    let full = fs::full_path_name(&long).unwrap();
    assert!(full.as_os_str().len() > MAX_PATH);
}

#[test]
fn find_files_lists_every_entry_once() {
    let dir = scratch();
    for name in ["one.txt", "two.txt", "three.log"] {
        write(&dir.path().join(name), b"1234");
    }

    let mut names: Vec<String> = fs::find_files(dir.path().join("*.txt"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(names, ["one.txt", "two.txt"]);

    let all: Vec<_> = fs::find_files(dir.path().join("*"))
        .unwrap()
        .map(Result::unwrap)
        .filter(|e| !e.is_dot_entry())
        .collect();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|e| e.file_size() == 4 && !e.is_directory()));
}

#[test]
fn find_with_no_match_is_empty() {
    let dir = scratch();
    assert_eq!(fs::find_files(dir.path().join("*.none")).unwrap().count(), 0);
    let err = fs::find_first_file(dir.path().join("*.none")).unwrap_err();
    assert_eq!(err.code(), Some(ERROR_FILE_NOT_FOUND));
}

#[test]
fn find_cursor_walks_to_the_end() {
    let dir = scratch();
    write(&dir.path().join("only.txt"), b"");
    let (cursor, first) = fs::find_first_file(dir.path().join("*.txt")).unwrap();
    assert_eq!(first.file_name(), "only.txt");

    let mut next = k32::Win32FindData::default();
    assert!(!fs::find_next_file(&cursor, &mut next).unwrap());
    assert!(cursor.close());
}

#[test]
fn byte_range_locks_conflict_across_handles() {
    let dir = scratch();
    let path = dir.path().join("locked.bin");
    write(&path, &[0u8; 64]);

    let a = open_read(&path);
    let b = open_read(&path);
    fs::lock_file(&a, 0, 16).unwrap();
    assert!(fs::lock_file(&b, 8, 8).is_err());
    fs::lock_file(&b, 16, 16).unwrap();

    let mut ov = Overlapped::at_offset(0);
    // SAFETY: `b` is a synchronous handle, so the call completes before
    // returning and `ov` is not retained.
    let contended = unsafe { fs::lock_file_ex(&b, LockFlags::EXCLUSIVE | LockFlags::FAIL_IMMEDIATELY, 4, &mut ov) };
    assert!(contended.is_err());

    fs::unlock_file(&a, 0, 16).unwrap();
    // SAFETY: as above.
    unsafe { fs::lock_file_ex(&b, LockFlags::EXCLUSIVE | LockFlags::FAIL_IMMEDIATELY, 4, &mut ov) }.unwrap();
}

#[test]
fn file_mapping_view_sees_file_contents() {
    let dir = scratch();
    let path = dir.path().join("mapped.bin");
    write(&path, b"mapped bytes");
    let file = open_read(&path);

    let mapping = fs::FileMapping::create(Some(&file), PageAccess::READONLY, 0, None).unwrap();
    assert!(!mapping.already_existed);
    let view = mapping.object.map_view(FileMapAccess::READ, 0, 6).unwrap();
    assert_eq!(view.len(), 6);
    // SAFETY: read-only view of a file nobody writes during the test.
    assert_eq!(unsafe { view.as_slice() }, b"mapped");
}

#[test]
fn named_paging_file_mapping_is_shared() {
    let name = unique("map");
    let first = fs::FileMapping::create(None, PageAccess::READWRITE, 4096, Some(&name)).unwrap();
    assert!(!first.already_existed);
    let second = fs::FileMapping::create(None, PageAccess::READWRITE, 4096, Some(&name)).unwrap();
    assert!(second.already_existed);

    let writer = first.object.map_view(FileMapAccess::WRITE, 0, 8).unwrap();
    // SAFETY: this test is the only user of the freshly created mapping.
    unsafe { writer.as_mut_slice() }.copy_from_slice(b"shared!!");

    let opened = fs::FileMapping::open(FileMapAccess::READ, false, &name).unwrap();
    let reader = opened.map_view(FileMapAccess::READ, 0, 8).unwrap();
    // SAFETY: the writer is done; nothing else touches the mapping.
    assert_eq!(unsafe { reader.as_slice() }, b"shared!!");
}

#[test]
fn disk_figures_are_consistent() {
    let dir = scratch();
    let space = fs::disk_free_space_ex(Some(dir.path())).unwrap();
    assert!(space.total_number_of_bytes > 0);
    assert!(space.total_number_of_free_bytes <= space.total_number_of_bytes);

    let geometry = fs::disk_free_space(None).unwrap();
    assert!(geometry.bytes_per_cluster() > 0);
    assert!(geometry.free_bytes() <= geometry.total_bytes());
}

// ── Synchronization ───────────────────────────────────────────────────────────

#[test]
fn named_mutex_reports_existing_object() {
    let name = unique("mutex");
    let first = KernelMutex::create(Some(&name), false).unwrap();
    assert!(!first.already_existed);
    let second = KernelMutex::create(Some(&name), false).unwrap();
    assert!(second.already_existed);
}

#[test]
fn mutex_release_requires_ownership() {
    let m = KernelMutex::create(None, false).unwrap().object;
    assert_eq!(m.release().unwrap_err().code(), Some(ERROR_NOT_OWNER));
    assert_eq!(m.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
    m.release().unwrap();
}

#[test]
fn abandoned_mutex_is_reported() {
    let m = Arc::new(KernelMutex::create(None, false).unwrap().object);
    let owner = Arc::clone(&m);
    thread::spawn(move || {
        owner.wait(None).unwrap();
    })
    .join()
    .unwrap();
    assert_eq!(m.wait(Some(Duration::from_secs(5))).unwrap(), WaitResult::Abandoned(0));
    m.release().unwrap();
}

#[test]
fn semaphore_counts() {
    let s = Semaphore::create(1, 2, None).unwrap().object;
    assert_eq!(s.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
    assert_eq!(s.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Timeout);
    assert_eq!(s.release(2).unwrap(), 0);
    assert!(s.release(1).is_err());
}

#[test]
fn events_signal_waiters() {
    let manual = Event::create(true, false, None).unwrap().object;
    assert_eq!(manual.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Timeout);
    manual.set().unwrap();
    assert_eq!(manual.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
    assert_eq!(manual.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
    manual.reset().unwrap();
    assert_eq!(manual.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Timeout);

    let auto = Event::create(false, true, None).unwrap().object;
    assert_eq!(auto.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
    assert_eq!(auto.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Timeout);
}

#[test]
fn event_opened_by_name() {
    let name = unique("event");
    let ev = Event::create(true, false, Some(&name)).unwrap().object;
    let other = Event::open(k32::consts::EVENT_ALL_ACCESS, false, &name).unwrap();
    other.set().unwrap();
    assert_eq!(ev.wait(Some(Duration::ZERO)).unwrap(), WaitResult::Signaled(0));
}

#[test]
fn wait_multiple_reports_the_signalled_index() {
    let a = Event::create(true, false, None).unwrap().object;
    let b = Arc::new(Event::create(true, false, None).unwrap().object);
    let setter = thread::spawn({
        let b = Arc::clone(&b);
        move || {
            thread::sleep(Duration::from_millis(20));
            b.set().unwrap();
        }
    });
    let objects: [&dyn AsRawHandle; 2] = [&a, &*b];
    let got = sync::wait_multiple(&objects, false, Some(Duration::from_secs(5))).unwrap();
    setter.join().unwrap();
    assert_eq!(got, WaitResult::Signaled(1));

    let all = sync::wait_multiple(&objects, true, Some(Duration::from_millis(10))).unwrap();
    assert_eq!(all, WaitResult::Timeout);
}

#[test]
fn overlapped_read_completes_through_event() {
    let dir = scratch();
    let path = dir.path().join("async.bin");
    write(&path, b"0123456789");
    let file = fs::create_file(
        &path,
        FileAccess::GENERIC_READ,
        ShareMode::READ,
        CreationDisposition::OpenExisting,
        CreateFileFlags::OVERLAPPED,
        FileAttributes::NORMAL,
    )
    .unwrap();

    let done = Event::create(true, false, None).unwrap().object;
    let mut ov = Overlapped::at_offset(4).with_event(done.as_raw());
    let mut buf = [0u8; 4];
    // SAFETY: `buf` and `ov` outlive the wait below, which covers completion.
    match unsafe { fs::read_file_overlapped(&file, &mut buf, &mut ov) } {
        Ok(_) => {}
        Err(e) if e.is_io_pending() => {
            assert_eq!(done.wait(Some(Duration::from_secs(5))).unwrap(), WaitResult::Signaled(0));
        }
        Err(e) => panic!("{e}"),
    }
    assert_eq!(&buf, b"4567");
}

// ── Processes and modules ─────────────────────────────────────────────────────

#[test]
fn identity_and_pseudo_handles() {
    assert_eq!(process::current_process_id(), std::process::id());
    assert_ne!(process::current_thread_id(), 0);
    assert!(!process::current_process().as_raw_handle().is_null());
    assert_eq!(process::exit_code_thread(&process::current_thread()).unwrap(), STILL_ACTIVE);
}

#[test]
fn cloned_handle_outlives_the_original() {
    let dir = scratch();
    let path = dir.path().join("dup.bin");
    write(&path, b"dup");
    let original = open_read(&path);
    let clone = process::try_clone(&original).unwrap();
    assert_ne!(clone.as_raw(), original.as_raw());
    drop(original);
    assert_eq!(fs::file_size(&clone).unwrap(), 3);
}

#[test]
fn kernel32_exports_resolve() {
    let kernel32 = process::module_handle(Some("kernel32.dll")).unwrap();
    assert!(process::proc_address(kernel32, "GetCurrentProcessId").is_ok());
    assert!(process::proc_address(kernel32, "NoSuchExport").is_err());
    assert!(matches!(
        process::proc_address(kernel32, "Gét"),
        Err(Error::InvalidProcName(_))
    ));
    assert_eq!(process::proc_address(kernel32, "a\0b").unwrap_err(), Error::InteriorNul);
}

#[test]
fn loaded_library_resolves_exports() {
    let system = process::system_directory().unwrap();
    assert!(system.is_absolute());
    let lib = process::load_library(system.join("version.dll")).unwrap();
    assert!(process::proc_address(lib.module(), "GetFileVersionInfoSizeW").is_ok());
    assert!(lib.close());
}

#[test]
fn module_paths_agree_with_std() {
    let exe = std::env::current_exe().unwrap();
    assert_eq!(sysinfo::try_application_file_name().unwrap(), exe);
    assert_eq!(sysinfo::application_file_name(), exe.to_string_lossy());
    assert_eq!(
        sysinfo::module_directory(None),
        exe.parent().unwrap().to_string_lossy()
    );
    let me = process::module_handle(None).unwrap();
    assert_eq!(process::module_file_name(Some(me)).unwrap(), exe);
}

#[test]
fn dll_directory_round_trip() {
    let dir = scratch();
    process::set_dll_directory(Some(dir.path())).unwrap();
    assert_eq!(process::dll_directory().unwrap().as_deref(), Some(dir.path()));
    process::set_dll_directory(None).unwrap();
    assert_eq!(process::dll_directory().unwrap(), None);
}

#[test]
fn system_messages() {
    let text = process::format_message(ERROR_FILE_NOT_FOUND).unwrap();
    assert!(!text.is_empty());
    assert!(!text.ends_with('\n'));
    assert_eq!(Error::win32("X", ERROR_FILE_NOT_FOUND).system_message(), Some(text));
    assert_eq!(Error::InteriorNul.system_message(), None);
}

#[test]
fn memory_copy_and_fill() {
    let src = *b"abcdef";
    let mut dst = [0u8; 6];
    // SAFETY: both buffers are 6 bytes.
    unsafe { process::copy_memory(dst.as_mut_ptr(), src.as_ptr(), 6) };
    assert_eq!(dst, src);
    // SAFETY: `dst` is writable for 3 bytes.
    unsafe { process::fill_memory(dst.as_mut_ptr(), 3, b'z') };
    assert_eq!(&dst, b"zzzdef");
}

// ── System status ─────────────────────────────────────────────────────────────

#[test]
fn memory_status_is_plausible() {
    let ms = sysinfo::global_memory_status_ex().unwrap();
    assert_eq!(ms.length as usize, std::mem::size_of::<k32::MemoryStatusEx>());
    assert!(ms.total_phys > 0 && ms.avail_phys <= ms.total_phys);
    assert!(ms.memory_load <= 100);
    assert_eq!(ms.occupied() + ms.available(), ms.total_phys);

    let legacy = sysinfo::global_memory_status();
    assert!(legacy.total_phys > 0);
}

#[test]
fn memory_info_lists_every_field() {
    let report = sysinfo::memory_info();
    for label in ["Memory Load: ", "Total Physical: ", "Avail Virtual: "] {
        assert!(report.contains(label), "{report}");
    }
    assert!(report.ends_with(' '));
}

#[test]
fn system_and_version_info() {
    let info = sysinfo::system_info();
    assert!(info.number_of_processors >= 1);
    assert!(info.page_size.is_power_of_two());

    let version = sysinfo::version_ex().unwrap();
    assert!(version.major_version >= 6);
}

#[test]
fn locales_enumerate_in_full() {
    let installed = sysinfo::enum_locales(LCID_INSTALLED).unwrap();
    let supported = sysinfo::enum_locales(LCID_SUPPORTED).unwrap();
    assert!(!installed.is_empty());
    assert!(supported.len() >= installed.len());
    assert!(installed.iter().all(|id| id.len() == 8 && id.chars().all(|c| c.is_ascii_hexdigit())));
    assert_eq!(sysinfo::enum_locales(3).unwrap_err(), Error::InvalidLocaleFlag(3));
}
