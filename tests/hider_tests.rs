// tests/hider_tests.rs
mod common;

use common::TestEnv;
use file_cloak::crypto::is_envelope;
use file_cloak::{CloakError, FileHider};
use std::fs;
use std::path::Path;

#[test]
fn hide_then_unhide_restores_name_and_content() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("report.txt", b"hello");
    let storage_id = hider.hide(&source).unwrap();

    // Source is gone, exactly one record with the original display name
    assert!(!source.exists());
    let records = hider.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original_filename, "report.txt");
    assert_eq!(records[0].storage_id, storage_id);

    // The blob sits under its storage id and is an opaque envelope
    let blob_path = env.concealed_root.join(&storage_id);
    assert!(blob_path.exists());
    let blob = fs::read(&blob_path).unwrap();
    assert!(is_envelope(&blob));
    assert!(!blob.windows(5).any(|w| w == b"hello"));

    let restored = hider.unhide(records[0].id).unwrap();
    assert_eq!(restored, env.open_root.join("report.txt"));
    assert_eq!(fs::read(&restored).unwrap(), b"hello");

    // Record and blob retired together
    assert!(hider.list().unwrap().is_empty());
    assert!(!blob_path.exists());
}

#[test]
fn empty_file_roundtrips() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("empty.bin", b"");
    hider.hide(&source).unwrap();

    let records = hider.list().unwrap();
    let restored = hider.unhide(records[0].id).unwrap();
    assert_eq!(fs::read(restored).unwrap(), b"");
}

#[test]
fn storage_ids_are_unguessable_hex_and_unique() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let a = hider.hide(&env.write_source("a.txt", b"a")).unwrap();
    let b = hider.hide(&env.write_source("b.txt", b"b")).unwrap();

    assert_ne!(a, b);
    for id in [&a, &b] {
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

#[test]
fn hide_missing_source_is_not_found() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let result = hider.hide(Path::new("/nonexistent/nowhere.txt"));
    assert!(matches!(result, Err(CloakError::SourceNotFound(_))));
    assert!(hider.list().unwrap().is_empty());
}

#[test]
fn hide_directory_is_not_found() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let result = hider.hide(env.dir.path());
    assert!(matches!(result, Err(CloakError::SourceNotFound(_))));
}

#[test]
fn unhide_foreign_record_reads_as_not_found() {
    let env = TestEnv::new();
    let alice = env.user("alice");
    let mallory = env.user("mallory");

    let source = env.write_source("diary.txt", b"dear diary");
    env.hider_for(&alice).hide(&source).unwrap();
    let record_id = env.hider_for(&alice).list().unwrap()[0].id;

    let as_mallory = env.hider_for(&mallory).unhide(record_id);
    let nonexistent = env.hider_for(&mallory).unhide(9_999);

    // A foreign record and a nonexistent one are the same error
    assert!(matches!(as_mallory, Err(CloakError::RecordNotFound)));
    assert!(matches!(nonexistent, Err(CloakError::RecordNotFound)));

    // Alice's record is untouched
    assert_eq!(env.hider_for(&alice).list().unwrap().len(), 1);
}

#[test]
fn second_unhide_of_same_record_is_not_found() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("once.txt", b"only once");
    hider.hide(&source).unwrap();
    let record_id = hider.list().unwrap()[0].id;

    hider.unhide(record_id).unwrap();
    assert!(matches!(hider.unhide(record_id), Err(CloakError::RecordNotFound)));
}

#[test]
fn failed_blob_write_leaves_no_record_and_source_intact() {
    let env = TestEnv::new();
    let user = env.user("alice");

    // A concealed "root" that is a regular file: every blob write must fail
    let bogus_root = env.dir.path().join("not-a-dir");
    fs::write(&bogus_root, b"").unwrap();
    let hider = FileHider::new(user.id, &env.open_root, &bogus_root, &env.store, &env.cipher);

    let source = env.write_source("survivor.txt", b"still here");
    assert!(hider.hide(&source).is_err());

    assert!(source.exists(), "source must survive a failed hide");
    assert_eq!(fs::read(&source).unwrap(), b"still here");
    assert!(hider.list().unwrap().is_empty(), "no dangling metadata");
}

#[test]
fn restore_never_overwrites_existing_file() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("notes.txt", b"hidden version");
    hider.hide(&source).unwrap();
    let record_id = hider.list().unwrap()[0].id;

    // Someone puts an unrelated notes.txt where the restore would land
    fs::write(env.open_root.join("notes.txt"), b"unrelated").unwrap();

    let restored = hider.unhide(record_id).unwrap();
    assert_eq!(restored, env.open_root.join("notes (1).txt"));
    assert_eq!(fs::read(&restored).unwrap(), b"hidden version");
    assert_eq!(
        fs::read(env.open_root.join("notes.txt")).unwrap(),
        b"unrelated"
    );
}

#[test]
fn corrupted_blob_fails_and_leaves_state_untouched() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("precious.txt", b"precious bytes");
    let storage_id = hider.hide(&source).unwrap();
    let record_id = hider.list().unwrap()[0].id;

    let blob_path = env.concealed_root.join(&storage_id);
    let mut blob = fs::read(&blob_path).unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0xFF;
    fs::write(&blob_path, &blob).unwrap();

    assert!(matches!(hider.unhide(record_id), Err(CloakError::Integrity)));

    // No partial unhide: record and blob stay, nothing restored
    assert_eq!(hider.list().unwrap().len(), 1);
    assert!(blob_path.exists());
    assert!(!env.open_root.join("precious.txt").exists());
}

#[test]
fn missing_blob_is_reported_as_corruption() {
    let env = TestEnv::new();
    let user = env.user("alice");
    let hider = env.hider_for(&user);

    let source = env.write_source("gone.txt", b"payload");
    let storage_id = hider.hide(&source).unwrap();
    let record_id = hider.list().unwrap()[0].id;

    fs::remove_file(env.concealed_root.join(&storage_id)).unwrap();

    assert!(matches!(hider.unhide(record_id), Err(CloakError::BlobMissing(id)) if id == record_id));
}

#[test]
fn list_is_scoped_to_owner_in_insertion_order() {
    let env = TestEnv::new();
    let alice = env.user("alice");
    let bob = env.user("bob");

    let alice_hider = env.hider_for(&alice);
    let bob_hider = env.hider_for(&bob);

    alice_hider.hide(&env.write_source("one.txt", b"1")).unwrap();
    bob_hider.hide(&env.write_source("theirs.txt", b"x")).unwrap();
    alice_hider.hide(&env.write_source("two.txt", b"2")).unwrap();

    let names: Vec<_> = alice_hider
        .list()
        .unwrap()
        .into_iter()
        .map(|r| r.original_filename)
        .collect();
    assert_eq!(names, ["one.txt", "two.txt"]);

    let ids: Vec<_> = alice_hider.list().unwrap().iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}
