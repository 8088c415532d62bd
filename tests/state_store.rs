use circular_watch::contract::StateStore;
use circular_watch::state::FileStateStore;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_read_missing_file_is_absent() {
    let tmp = tempdir().unwrap();
    let store = FileStateStore::new(tmp.path().join("last_circular.txt"));
    assert_eq!(store.read().expect("read should succeed"), None);
}

#[test]
fn test_read_empty_file_is_absent() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("last_circular.txt");
    fs::write(&path, "  \n").unwrap();
    let store = FileStateStore::new(path);
    assert_eq!(store.read().expect("read should succeed"), None);
}

#[test]
fn test_write_then_read_round_trips_the_id() {
    let tmp = tempdir().unwrap();
    let store = FileStateStore::new(tmp.path().join("last_circular.txt"));
    store.write("12345").expect("write should succeed");
    assert_eq!(store.read().unwrap().as_deref(), Some("12345"));
}

#[test]
fn test_write_replaces_previous_value() {
    let tmp = tempdir().unwrap();
    let store = FileStateStore::new(tmp.path().join("last_circular.txt"));
    store.write("100").unwrap();
    store.write("101").unwrap();
    assert_eq!(store.read().unwrap().as_deref(), Some("101"));
}

#[test]
fn test_write_creates_missing_parent_directory() {
    let tmp = tempdir().unwrap();
    let store = FileStateStore::new(tmp.path().join("state/nested/last_circular.txt"));
    store.write("777").unwrap();
    assert_eq!(store.read().unwrap().as_deref(), Some("777"));
}

#[test]
fn test_persisted_layout_is_one_human_inspectable_line() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("last_circular.txt");
    let store = FileStateStore::new(path.clone());
    store.write("12345").unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "12345\n");
}

#[test]
fn test_write_leaves_no_temp_files_behind() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("last_circular.txt");
    let store = FileStateStore::new(path);
    store.write("12345").unwrap();
    let names: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1, "Only the watermark file itself remains: {names:?}");
}
