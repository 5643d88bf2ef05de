use clinic_assist::session::{
    DurableStorage, FilesystemStorage, MemoryStorage, ROLE_KEY, SESSION_FILE_NAME, TOKEN_KEY,
    USER_NAME_KEY,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_filesystem_storage_round_trips_slots() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FilesystemStorage::new(temp_dir.path().join("nested"));

    assert_eq!(storage.get(TOKEN_KEY), None);

    storage.set(TOKEN_KEY, "tok-1").unwrap();
    storage.set(ROLE_KEY, "PATIENT").unwrap();
    storage.set(USER_NAME_KEY, "Jane Doe").unwrap();

    let reopened = FilesystemStorage::new(temp_dir.path().join("nested"));
    assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("tok-1"));
    assert_eq!(reopened.get(ROLE_KEY).as_deref(), Some("PATIENT"));
    assert_eq!(reopened.get(USER_NAME_KEY).as_deref(), Some("Jane Doe"));
}

#[test]
fn test_filesystem_storage_writes_plain_json_object() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FilesystemStorage::new(temp_dir.path());
    storage.set(TOKEN_KEY, "tok-1").unwrap();

    let content = fs::read_to_string(temp_dir.path().join(SESSION_FILE_NAME)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["token"], "tok-1");
}

#[test]
fn test_filesystem_storage_remove() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FilesystemStorage::new(temp_dir.path());

    // Nothing written yet.
    storage.remove(TOKEN_KEY).unwrap();
    assert!(!storage.path().exists());

    storage.set(TOKEN_KEY, "tok-1").unwrap();
    storage.set(ROLE_KEY, "DOCTOR").unwrap();
    storage.remove(TOKEN_KEY).unwrap();

    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(ROLE_KEY).as_deref(), Some("DOCTOR"));
}

#[test]
fn test_filesystem_storage_tolerates_corrupt_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(SESSION_FILE_NAME), "not json").unwrap();
    let storage = FilesystemStorage::new(temp_dir.path());

    assert_eq!(storage.get(TOKEN_KEY), None);
    storage.set(TOKEN_KEY, "tok-1").unwrap();
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-1"));
}

#[test]
fn test_memory_storage() {
    let storage = MemoryStorage::with_slots([(ROLE_KEY, "ADMIN")]);
    assert_eq!(storage.get(ROLE_KEY).as_deref(), Some("ADMIN"));

    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.remove(ROLE_KEY).unwrap();

    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert_eq!(storage.get(ROLE_KEY), None);
}
