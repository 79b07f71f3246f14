use super::*;

fn temp_token_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("newsdesk-storage-test-{}-{name}", std::process::id()))
        .join("auth_token")
}

// =============================================================
// normalize_token
// =============================================================

#[test]
fn normalize_token_trims_whitespace() {
    assert_eq!(normalize_token("  abc123\n"), Some("abc123".to_owned()));
}

#[test]
fn normalize_token_blank_is_none() {
    assert_eq!(normalize_token(""), None);
    assert_eq!(normalize_token(" \n\t"), None);
}

// =============================================================
// MemoryTokenStore
// =============================================================

#[test]
fn memory_store_starts_empty() {
    assert_eq!(MemoryTokenStore::new().load().unwrap(), None);
}

#[test]
fn memory_store_save_then_clear() {
    let store = MemoryTokenStore::new();
    store.save("abc123").unwrap();
    assert_eq!(store.load().unwrap(), Some("abc123".to_owned()));
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn memory_store_with_token_is_seeded() {
    let store = MemoryTokenStore::with_token("seed");
    assert_eq!(store.load().unwrap(), Some("seed".to_owned()));
}

// =============================================================
// FileTokenStore
// =============================================================

#[test]
fn file_store_missing_file_loads_none() {
    let store = FileTokenStore::new(temp_token_path("missing"));
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn file_store_save_creates_parent_dirs() {
    let path = temp_token_path("save");
    let store = FileTokenStore::new(&path);
    store.save("abc123").unwrap();
    assert!(path.exists());
    assert_eq!(store.load().unwrap(), Some("abc123".to_owned()));
    store.clear().unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_store_save_overwrites_previous_token() {
    let path = temp_token_path("overwrite");
    let store = FileTokenStore::new(&path);
    store.save("a-much-longer-first-token").unwrap();
    store.save("short").unwrap();
    assert_eq!(store.load().unwrap(), Some("short".to_owned()));
    store.clear().unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn file_store_clear_is_idempotent() {
    let path = temp_token_path("clear");
    let store = FileTokenStore::new(&path);
    store.save("abc123").unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[cfg(unix)]
#[test]
fn file_store_writes_owner_only_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_token_path("perms");
    let store = FileTokenStore::new(&path);
    store.save("abc123").unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    store.clear().unwrap();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
