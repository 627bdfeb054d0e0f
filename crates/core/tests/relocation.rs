//! Batch relocation engine scenarios against an in-memory store

mod common;

use common::MemoryStore;
use pail_core::{
    copy_batch, execute_batch, move_batch, rename, validate_pairs, validate_sources,
    RelocationMode, RelocationPair, ValidationError, MAX_BATCH_BYTES,
};

fn keys(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn move_dir_relocates_contained_object() {
    let store = MemoryStore::new([("dir/x.txt", 10)]);

    let pairs = validate_pairs(&store, &keys(&["dir/"]), &keys(&["other/"]), false)
        .await
        .unwrap();
    assert_eq!(
        pairs,
        vec![RelocationPair {
            source: "dir/x.txt".into(),
            target: "other/x.txt".into(),
        }]
    );

    let outcome = execute_batch(&store, pairs, RelocationMode::Move).await;
    assert!(outcome.ok());
    assert!(outcome.failed.is_empty());

    assert_eq!(
        store.copies.lock().unwrap().as_slice(),
        &[("dir/x.txt".to_string(), "other/x.txt".to_string())]
    );
    assert_eq!(store.deletes.lock().unwrap().as_slice(), &["dir/x.txt".to_string()]);
    assert!(store.contains("other/x.txt"));
    assert!(!store.contains("dir/x.txt"));
}

#[tokio::test]
async fn expansion_preserves_relative_structure() {
    let store = MemoryStore::new([
        ("a/", 0),
        ("a/1.txt", 5),
        ("a/sub/2.txt", 7),
        ("a/sub/deep/3.txt", 9),
    ]);

    let pairs = validate_pairs(&store, &keys(&["a/"]), &keys(&["b/c/"]), false)
        .await
        .unwrap();
    assert_eq!(pairs.len(), 4);
    for pair in &pairs {
        let source_suffix = pair.source.strip_prefix("a/").unwrap();
        let target_suffix = pair.target.strip_prefix("b/c/").unwrap();
        assert_eq!(source_suffix, target_suffix);
    }
}

#[tokio::test]
async fn move_batch_nests_directory_under_target() {
    let store = MemoryStore::new([("dir/x.txt", 10)]);

    let outcome = move_batch(&store, &keys(&["dir/"]), "other/", "", false)
        .await
        .unwrap();
    assert!(outcome.ok());
    // the directory keeps its basename under the target directory
    assert!(store.contains("other/dir/x.txt"));
    assert!(!store.contains("dir/x.txt"));
}

#[tokio::test]
async fn copy_batch_with_rename() {
    let store = MemoryStore::new([("a/report.pdf", 100)]);

    let outcome = copy_batch(&store, &keys(&["a/report.pdf"]), "b/", "final.pdf", false)
        .await
        .unwrap();
    assert!(outcome.ok());
    assert!(store.contains("b/final.pdf"));
    assert!(store.contains("a/report.pdf"));
}

#[tokio::test]
async fn noop_pair_is_dropped_not_executed() {
    let store = MemoryStore::new([("a/b.txt", 3)]);

    // copying a file into its own parent resolves to source == target
    let outcome = copy_batch(&store, &keys(&["a/b.txt"]), "a/", "", false)
        .await
        .unwrap();
    assert!(outcome.ok());
    assert!(outcome.failed.is_empty());
    assert_eq!(store.copy_count(), 0);
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn duplicate_targets_reject_batch() {
    let store = MemoryStore::new([("a/f.txt", 1), ("b/f.txt", 2)]);

    let err = copy_batch(&store, &keys(&["a/f.txt", "b/f.txt"]), "c/", "", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::DuplicatedTarget));
    assert_eq!(err.to_string(), "duplicated target key");
    assert_eq!(store.copy_count(), 0);
}

#[tokio::test]
async fn source_and_target_sets_must_be_disjoint() {
    let store = MemoryStore::new([("a.txt", 1), ("b.txt", 1)]);

    let err = validate_pairs(
        &store,
        &keys(&["a.txt", "b.txt"]),
        &keys(&["b.txt", "c.txt"]),
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ValidationError::SourceOverlapsTarget));
    assert_eq!(store.copy_count(), 0);
}

#[tokio::test]
async fn target_dir_inside_source_is_overlap() {
    let store = MemoryStore::new([("a/x.txt", 1)]);

    let err = validate_pairs(&store, &keys(&["a/"]), &keys(&["a/sub/"]), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::SourceOverlapsTarget));

    // the ".."-looking variant is just another key under a/ and must also fail
    let err = copy_batch(&store, &keys(&["a/"]), "a/../", "", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ValidationError::SourceOverlapsTarget));
    assert_eq!(store.copy_count(), 0);
}

#[tokio::test]
async fn overwrite_guard_rejects_whole_batch() {
    let store = MemoryStore::new([("a.txt", 1), ("dst/a.txt", 9)]);

    let err = copy_batch(&store, &keys(&["a.txt"]), "dst/", "", false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "will overwrite dst/a.txt");
    assert_eq!(store.copy_count(), 0);
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn overwrite_allowed_when_requested() {
    let store = MemoryStore::new([("a.txt", 1), ("dst/a.txt", 9)]);

    let outcome = copy_batch(&store, &keys(&["a.txt"]), "dst/", "", true)
        .await
        .unwrap();
    assert!(outcome.ok());
    assert_eq!(store.copy_count(), 1);
}

#[tokio::test]
async fn batch_over_key_cap_rejected_with_no_side_effects() {
    let store = MemoryStore::new((0..1001).map(|i| (format!("big/{i:04}.bin"), 1)));

    let err = move_batch(&store, &keys(&["big/"]), "other/", "", false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "too many file");
    assert_eq!(store.copy_count(), 0);
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn batch_over_size_cap_rejected() {
    let store = MemoryStore::new([
        ("huge/a.bin", MAX_BATCH_BYTES / 2 + 1),
        ("huge/b.bin", MAX_BATCH_BYTES / 2 + 1),
    ]);

    let err = copy_batch(&store, &keys(&["huge/"]), "backup/", "", false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "files too large");
    assert_eq!(store.copy_count(), 0);
}

#[tokio::test]
async fn missing_plain_source_rejects_batch() {
    let store = MemoryStore::new([("present.txt", 1)]);

    let err = copy_batch(&store, &keys(&["missing.txt"]), "dst/", "", false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "source not exist: missing.txt");
}

#[tokio::test]
async fn shape_mismatches_are_rejected() {
    let store = MemoryStore::new([("a/x.txt", 1), ("f.txt", 1)]);

    let err = validate_pairs(&store, &keys(&["a/"]), &keys(&["b"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "try to copy dir to file");

    let err = validate_pairs(&store, &keys(&["f.txt"]), &keys(&["b/"]), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "source is file but target is dir");

    let err = validate_pairs(&store, &keys(&["f.txt"]), &keys(&[]), false)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "not equal length");
}

#[tokio::test]
async fn validation_is_idempotent() {
    let store = MemoryStore::new([("a/", 0), ("a/1.txt", 5), ("a/2.txt", 6)]);

    let first = validate_pairs(&store, &keys(&["a/"]), &keys(&["b/"]), false)
        .await
        .unwrap();
    let second = validate_pairs(&store, &keys(&["a/"]), &keys(&["b/"]), false)
        .await
        .unwrap();
    assert_eq!(first, second);
    // validation alone mutates nothing
    assert_eq!(store.copy_count(), 0);
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn failed_pair_does_not_abort_siblings() {
    let store = MemoryStore::new([("a.txt", 1), ("b.txt", 1), ("c.txt", 1)]);

    let pairs = validate_pairs(
        &store,
        &keys(&["a.txt", "b.txt", "c.txt"]),
        &keys(&["moved/a.txt", "moved/b.txt", "moved/c.txt"]),
        false,
    )
    .await
    .unwrap();

    // vanish two sources between validation and execution
    store.remove("a.txt");
    store.remove("c.txt");

    let outcome = execute_batch(&store, pairs, RelocationMode::Move).await;
    assert_eq!(outcome.failed.len(), 2);
    // failures come back in submission order
    assert_eq!(outcome.failed[0].src, "a.txt");
    assert_eq!(outcome.failed[1].src, "c.txt");
    assert!(outcome.failed[0].err.starts_with("move failed"));
    // the healthy sibling still moved
    assert!(store.contains("moved/b.txt"));
    assert!(!store.contains("b.txt"));
}

#[tokio::test]
async fn move_verifies_target_after_copy() {
    let mut store = MemoryStore::new([("a.txt", 1)]);
    store.drop_copies = true;

    let outcome = move_batch(&store, &keys(&["a.txt"]), "dst/", "", false)
        .await
        .unwrap();
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].err, "copy succeeded but target missing");
    // the source must not be deleted when the copy did not land
    assert!(store.contains("a.txt"));
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn move_verifies_source_after_delete() {
    let mut store = MemoryStore::new([("a.txt", 1)]);
    store.ignore_deletes = true;

    let outcome = move_batch(&store, &keys(&["a.txt"]), "dst/", "", false)
        .await
        .unwrap();
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].err, "delete failed");
}

#[tokio::test]
async fn rename_file_in_place() {
    let store = MemoryStore::new([("docs/old.txt", 5)]);

    let outcome = rename(&store, "docs/old.txt", "new.txt").await.unwrap();
    assert!(outcome.ok());
    assert!(store.contains("docs/new.txt"));
    assert!(!store.contains("docs/old.txt"));
}

#[tokio::test]
async fn rename_to_same_name_is_noop() {
    let store = MemoryStore::new([("docs/old.txt", 5)]);

    let outcome = rename(&store, "docs/old.txt", "old.txt").await.unwrap();
    assert!(outcome.ok());
    assert_eq!(store.copy_count(), 0);
    assert_eq!(store.delete_count(), 0);
}

#[tokio::test]
async fn rename_directory_moves_marker_and_children() {
    let store = MemoryStore::new([("a/b/", 0), ("a/b/x.txt", 3)]);

    let outcome = rename(&store, "a/b/", "c").await.unwrap();
    assert!(outcome.ok());
    assert!(store.contains("a/c/"));
    assert!(store.contains("a/c/x.txt"));
    assert!(!store.contains("a/b/"));
    assert!(!store.contains("a/b/x.txt"));
}

#[tokio::test]
async fn delete_preflight_expands_and_checks_existence() {
    let store = MemoryStore::new([("docs/a.txt", 1), ("docs/b.txt", 2), ("top.txt", 3)]);

    let resolved = validate_sources(&store, &keys(&["docs/", "top.txt"]))
        .await
        .unwrap();
    assert_eq!(resolved, keys(&["docs/a.txt", "docs/b.txt", "top.txt"]));

    let err = validate_sources(&store, &keys(&["gone.txt"])).await.unwrap_err();
    assert_eq!(err.to_string(), "source not exist: gone.txt");
}

#[tokio::test]
async fn expansion_pages_through_continuation_tokens() {
    let mut store = MemoryStore::new((0..5).map(|i| (format!("p/{i}.txt"), 1)));
    store.page_size = 2;

    let resolved = validate_sources(&store, &keys(&["p/"])).await.unwrap();
    assert_eq!(resolved.len(), 5);
}
