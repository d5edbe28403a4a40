//! Integration tests for the dataset store

use bankers_errors::{Error, StorageError};
use bankers_store::*;
use bankers_types::Dataset;
use tempfile::tempdir;

fn small() -> Dataset {
    Dataset {
        num_processes: 2,
        num_resources: 1,
        allocation: vec![vec![1], vec![0]],
        maximum: vec![vec![2], vec![1]],
        available: vec![1],
    }
}

#[tokio::test]
async fn test_legacy_file_is_upgraded_on_save() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("banker_data.json");
    let legacy = serde_json::json!({ "classroom": Dataset::textbook() });
    tokio::fs::write(&path, serde_json::to_string_pretty(&legacy).unwrap())
        .await
        .unwrap();

    let mut store = DatasetStore::open(&path).await.unwrap();
    assert_eq!(store.list(), vec!["classroom"]);

    store.save("small", small()).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
    assert_eq!(raw["version"], 1);
    assert!(raw["datasets"]["classroom"].is_object());
    assert!(raw["datasets"]["small"].is_object());
}

#[tokio::test]
async fn test_list_is_sorted() {
    let temp = tempdir().unwrap();
    let mut store = DatasetStore::open(temp.path().join("sets.json"))
        .await
        .unwrap();
    for name in ["zeta", "alpha", "mid"] {
        store.save(name, small()).await.unwrap();
    }
    assert_eq!(store.list(), vec!["alpha", "mid", "zeta"]);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_missing_dataset() {
    let temp = tempdir().unwrap();
    let mut store = DatasetStore::open(temp.path().join("sets.json"))
        .await
        .unwrap();

    assert!(matches!(
        store.get("nope").unwrap_err(),
        Error::Storage(StorageError::DatasetNotFound { .. })
    ));
    assert!(matches!(
        store.remove("nope").await.unwrap_err(),
        Error::Storage(StorageError::DatasetNotFound { .. })
    ));
}

#[tokio::test]
async fn test_import_from_file() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("textbook.json");
    tokio::fs::write(&source, serde_json::to_string(&Dataset::textbook()).unwrap())
        .await
        .unwrap();

    let mut store = DatasetStore::open(temp.path().join("sets.json"))
        .await
        .unwrap();
    let (imported, replaced) = store.import("textbook", &source).await.unwrap();
    assert_eq!(imported, Dataset::textbook());
    assert!(!replaced);

    let (_, replaced) = store.import(" textbook ", &source).await.unwrap();
    assert!(replaced);
    assert_eq!(store.len(), 1);

    let state = store.load_state("textbook").unwrap();
    assert_eq!(state.num_processes(), 5);
    assert_eq!(state.available(), &[3, 3, 2]);
}

#[tokio::test]
async fn test_import_rejects_garbage() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("garbage.json");
    tokio::fs::write(&source, "[1, 2, 3]").await.unwrap();

    let mut store = DatasetStore::open(temp.path().join("sets.json"))
        .await
        .unwrap();
    assert!(matches!(
        store.import("garbage", &source).await.unwrap_err(),
        Error::Storage(StorageError::CorruptedData { .. })
    ));
    assert!(matches!(
        store
            .import("absent", temp.path().join("absent.json"))
            .await
            .unwrap_err(),
        Error::Storage(StorageError::PathNotFound { .. })
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_corrupted_store_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("sets.json");
    tokio::fs::write(&path, "{\"version\": 1, \"datasets\": 5}")
        .await
        .unwrap();

    assert!(matches!(
        DatasetStore::open(&path).await.unwrap_err(),
        Error::Storage(StorageError::CorruptedData { .. })
    ));
}
