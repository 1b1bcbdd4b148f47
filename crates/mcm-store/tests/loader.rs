//! Tests for background loading into a shared store.

use std::fs;
use std::pin::pin;
use std::task::{Context, Waker};

use mcm_store::{CollectionStore, StoreError, load_path_async};
use tempfile::tempdir;
use tokio::sync::Mutex;

const TEXT: &str = "active,date,day,title,new_file_name,original_file_name,original_file_path,file_extension,artist,album,album_artist,track_number,track_total,duration\n\
    1,2020-06-01,Mon,One,one.mp3,o,p,mp3,a,al,aa,1,1,10\n";

#[tokio::test]
async fn loads_file_in_background() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("music.csv");
    fs::write(&path, TEXT).unwrap();

    let store = Mutex::new(CollectionStore::default());
    let count = load_path_async(&store, &path).await.unwrap();

    assert_eq!(count, 1);
    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.source(), Some(path.as_path()));
    assert_eq!(guard.songs()[0].identity(), "one.mp3");
}

#[tokio::test]
async fn overlapping_load_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("music.csv");
    fs::write(&path, TEXT).unwrap();

    let store = Mutex::new(CollectionStore::default());
    let ticket = store.lock().await.begin_load(&path).unwrap();

    let err = load_path_async(&store, &path).await.unwrap_err();
    assert!(matches!(err, StoreError::LoadInProgress));

    store.lock().await.cancel_load(ticket);
    assert_eq!(load_path_async(&store, &path).await.unwrap(), 1);
}

#[tokio::test]
async fn failed_background_load_keeps_contents() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.csv");
    fs::write(&good, TEXT).unwrap();

    let store = Mutex::new(CollectionStore::default());
    load_path_async(&store, &good).await.unwrap();

    let err = load_path_async(&store, dir.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Ingest(_)));

    let guard = store.lock().await;
    assert!(!guard.is_loading());
    assert_eq!(guard.source(), Some(good.as_path()));
    assert_eq!(guard.songs().len(), 1);
}

#[tokio::test]
async fn abandoned_load_leaves_store_idle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("music.csv");
    fs::write(&path, TEXT).unwrap();

    let store = Mutex::new(CollectionStore::default());
    {
        let mut load = pin!(load_path_async(&store, &path));
        let mut cx = Context::from_waker(Waker::noop());
        let _ = load.as_mut().poll(&mut cx);
    }

    assert!(!store.lock().await.is_loading());
    assert_eq!(load_path_async(&store, &path).await.unwrap(), 1);
}
