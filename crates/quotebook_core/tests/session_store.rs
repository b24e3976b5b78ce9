use quotebook_core::{
    DirBlobStore, FolderId, MemoryBlobStore, QuoteDraft, QuoteStore, Session, SessionError,
    StoreError,
};

fn folder() -> FolderId {
    FolderId::new("shelf")
}

#[test]
fn create_list_and_delete_collections_in_directory_store() {
    let root = tempfile::tempdir().unwrap();
    let store = QuoteStore::new(DirBlobStore::new(root.path()));

    let default = store.create(&folder(), "").unwrap();
    assert_eq!(default.name, "new_database.db");
    let named = store.create(&folder(), "sayings").unwrap();
    assert_eq!(named.name, "sayings.db");
    std::fs::write(root.path().join("shelf").join("notes.txt"), b"ignored").unwrap();

    let names = store
        .list(&folder())
        .unwrap()
        .into_iter()
        .map(|file| file.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["new_database.db", "sayings.db"]);

    assert!(matches!(
        store.create(&folder(), "sayings.db"),
        Err(StoreError::CollectionExists(_))
    ));
    assert!(store.delete(&folder(), "sayings.db").unwrap());
    assert!(!store.delete(&folder(), "sayings.db").unwrap());
    assert!(store.load(&default).unwrap().is_empty());
}

#[test]
fn session_edits_persist_only_on_save() {
    let root = tempfile::tempdir().unwrap();
    let store = QuoteStore::new(DirBlobStore::new(root.path()));
    let file = store.create(&folder(), "main.db").unwrap();

    let mut session = Session::open(store, folder(), "main.db").unwrap();
    let added = session
        .insert(QuoteDraft::new("Stay hungry").with_tag("work  life"))
        .unwrap();
    assert_eq!(added.id, 1);
    assert!(session.is_dirty());
    assert!(session.store().load(&file).unwrap().is_empty());

    session.save().unwrap();
    assert!(!session.is_dirty());
    let stored = session.store().load(&file).unwrap();
    assert_eq!(stored.rows(), &[added]);
}

#[test]
fn switching_with_unsaved_changes_is_refused_until_reload() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    store.create(&folder(), "a.db").unwrap();
    store.create(&folder(), "b.db").unwrap();
    let mut session = Session::open(store, folder(), "a.db").unwrap();

    session.insert(QuoteDraft::new("draft")).unwrap();
    assert!(matches!(
        session.switch_to("b.db"),
        Err(SessionError::UnsavedChanges(_))
    ));

    session.reload().unwrap();
    assert!(session.table().is_empty());
    session.switch_to("b.db").unwrap();
    assert_eq!(session.file().name, "b.db");
}

#[test]
fn failed_load_keeps_session_state() {
    let blobs = std::sync::Arc::new(MemoryBlobStore::new());
    let store = QuoteStore::new(std::sync::Arc::clone(&blobs));
    store.create(&folder(), "a.db").unwrap();
    store.create(&folder(), "b.db").unwrap();
    let mut session = Session::open(store, folder(), "a.db").unwrap();

    blobs.go_offline();
    assert!(matches!(
        session.switch_to("b.db"),
        Err(SessionError::Store(StoreError::Blob(_)))
    ));
    assert_eq!(session.file().name, "a.db");
}

#[test]
fn open_unknown_collection_is_not_found() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    assert!(matches!(
        Session::open(store, folder(), "missing.db"),
        Err(SessionError::Store(StoreError::CollectionNotFound(_)))
    ));
}

#[test]
fn renumber_is_explicit_and_survives_save() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    let file = store.create(&folder(), "a.db").unwrap();
    let mut session = Session::open(store, folder(), "a.db").unwrap();
    for content in ["a", "b", "c"] {
        session.insert(QuoteDraft::new(content)).unwrap();
    }
    session.delete(&[1]).unwrap();
    session.save().unwrap();

    assert_eq!(session.renumber(), vec![(2, 1), (3, 2)]);
    session.save().unwrap();
    let ids = session
        .store()
        .load(&file)
        .unwrap()
        .iter()
        .map(|quote| quote.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn bulk_edits_through_table_mut_mark_session_dirty() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    let file = store.create(&folder(), "a.db").unwrap();
    let mut session = Session::open(store, folder(), "a.db").unwrap();

    let next = session.table().next_id().unwrap();
    session
        .table_mut()
        .push(QuoteDraft::new("imported").into_new_quote(next));
    assert!(session.is_dirty());

    session.save().unwrap();
    assert_eq!(session.store().load(&file).unwrap().len(), 1);
}
