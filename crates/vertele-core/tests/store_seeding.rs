use std::collections::HashSet;

use vertele_core::store::{ChannelStore, StoreLocation};
use vertele_core::{error::StoreError, seed};

#[test]
fn file_store_seeds_once_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("channels.db");
    let seeded = seed::builtin_channels().unwrap().len();

    let mut store = ChannelStore::open(StoreLocation::File(path.clone())).unwrap();
    assert_eq!(store.count().unwrap(), seeded);
    store.close().unwrap();

    for _ in 0..3 {
        let mut reopened = ChannelStore::open(StoreLocation::File(path.clone())).unwrap();
        assert_eq!(reopened.count().unwrap(), seeded);
        reopened.close().unwrap();
    }
}

#[test]
fn every_listed_channel_round_trips_by_instance() {
    let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
    let all = store.list_all().unwrap();
    assert!(!all.is_empty());

    let mut seen = HashSet::new();
    for channel in &all {
        assert!(!channel.stream_url.is_empty(), "{} has no stream", channel.title);
        assert!(seen.insert(channel.instance.clone()));
        let found = store.find_by_instance(&channel.instance).unwrap();
        assert_eq!(found.as_ref(), Some(channel));
    }
}

#[test]
fn categories_cover_every_row() {
    let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
    let total: usize = store
        .categories()
        .unwrap()
        .iter()
        .map(|c| store.list_by_category(c).unwrap().len())
        .sum();
    assert_eq!(total, store.count().unwrap());
}

#[test]
fn unwritable_location_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let err = ChannelStore::open(StoreLocation::File(blocker.join("channels.db"))).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Directory { .. } | StoreError::Open { .. }
    ));
}
