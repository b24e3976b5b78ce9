use quotebook_core::storage::BlobResult;
use quotebook_core::{
    BlobError, BlobStore, EditError, FileRef, FolderId, MemoryBlobStore, Quote, QuoteStore,
    QuoteTable, Session, SessionError, TransferError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn folder() -> FolderId {
    FolderId::new("shelf")
}

fn quote(id: i64, content: &str) -> Quote {
    Quote {
        id,
        content: content.to_string(),
        speaker: String::new(),
        note: String::new(),
        date: String::new(),
        tag: String::new(),
        link: None,
    }
}

fn seed<B: BlobStore>(store: &QuoteStore<B>, name: &str, rows: Vec<Quote>) -> FileRef {
    let file = store.create(&folder(), name).unwrap();
    store.save(&file, &QuoteTable::from_rows(rows)).unwrap();
    file
}

#[test]
fn copy_renumbers_into_empty_destination_and_keeps_source() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    seed(&store, "src.db", vec![quote(1, "A")]);
    let dest = seed(&store, "dest.db", vec![]);

    let session = Session::open(store, folder(), "src.db").unwrap();
    let outcome = session.copy_to("dest.db", &[1]).unwrap();

    assert_eq!(outcome.source_ids, vec![1]);
    let dest_table = session.store().load(&dest).unwrap();
    assert_eq!(dest_table.rows(), &[quote(1, "A")]);
    assert_eq!(session.table().rows(), &[quote(1, "A")]);
    assert!(!session.is_dirty());
}

#[test]
fn copy_appends_after_destination_max_id() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    seed(&store, "src.db", vec![quote(1, "A"), quote(2, "B")]);
    let dest = seed(&store, "dest.db", vec![quote(7, "X")]);

    let session = Session::open(store, folder(), "src.db").unwrap();
    let outcome = session.copy_to("dest.db", &[2, 1]).unwrap();

    let new_ids = outcome.copied.iter().map(|q| q.id).collect::<Vec<_>>();
    assert_eq!(new_ids, vec![8, 9]);
    let dest_table = session.store().load(&dest).unwrap();
    assert_eq!(
        dest_table.iter().map(|q| q.content.as_str()).collect::<Vec<_>>(),
        vec!["X", "A", "B"]
    );
}

#[test]
fn transfer_into_full_id_space_writes_nothing() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let store = QuoteStore::new(Arc::clone(&blobs));
    seed(&store, "src.db", vec![quote(1, "A")]);
    seed(&store, "dest.db", vec![quote(i64::MAX, "Z")]);
    let mut session = Session::open(store, folder(), "src.db").unwrap();
    let dest_before = blobs.bytes_of(&folder(), "dest.db");

    for result in [
        session.copy_to("dest.db", &[1]),
        session.move_to("dest.db", &[1]),
    ] {
        assert!(matches!(
            result,
            Err(SessionError::Transfer(TransferError::Edit(
                EditError::IdSpaceExhausted
            )))
        ));
    }
    assert_eq!(session.table().rows(), &[quote(1, "A")]);
    assert_eq!(blobs.bytes_of(&folder(), "dest.db"), dest_before);
}

#[test]
fn move_persists_both_collections() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    let src = seed(&store, "src.db", vec![quote(1, "A")]);
    let dest = seed(&store, "dest.db", vec![]);

    let mut session = Session::open(store, folder(), "src.db").unwrap();
    session.move_to("dest.db", &[1]).unwrap();

    assert!(session.table().is_empty());
    assert!(session.store().load(&src).unwrap().is_empty());
    assert_eq!(session.store().load(&dest).unwrap().rows(), &[quote(1, "A")]);
}

#[test]
fn transfer_rejects_unknown_ids_and_same_collection() {
    let store = QuoteStore::new(MemoryBlobStore::new());
    seed(&store, "src.db", vec![quote(1, "A")]);
    seed(&store, "dest.db", vec![]);
    let mut session = Session::open(store, folder(), "src.db").unwrap();

    assert!(matches!(
        session.move_to("dest.db", &[1, 2]),
        Err(SessionError::Transfer(TransferError::Edit(_)))
    ));
    assert!(matches!(
        session.copy_to("src.db", &[1]),
        Err(SessionError::Transfer(TransferError::SameCollection(_)))
    ));
    assert_eq!(session.table().len(), 1);
}

#[test]
fn move_rolls_destination_back_when_source_save_fails() {
    let blobs = Arc::new(MemoryBlobStore::new());
    let store = QuoteStore::new(Arc::clone(&blobs));
    seed(&store, "src.db", vec![quote(1, "A"), quote(2, "B")]);
    let dest = seed(&store, "dest.db", vec![quote(1, "Z")]);
    let mut session = Session::open(store, folder(), "src.db").unwrap();

    blobs.fail_replace_of("src.db");
    let err = session.move_to("dest.db", &[2]).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Transfer(TransferError::SourceSaveFailed { .. })
    ));

    assert_eq!(session.table().len(), 2);
    assert_eq!(session.store().load(&dest).unwrap().rows(), &[quote(1, "Z")]);

    blobs.clear_failures();
    session.move_to("dest.db", &[2]).unwrap();
    assert_eq!(session.table().rows(), &[quote(1, "A")]);
}

/// Lets a fixed number of replaces through, then fails every write.
struct FlakyStore {
    inner: MemoryBlobStore,
    replaces_left: AtomicUsize,
}

impl BlobStore for FlakyStore {
    fn list(&self, folder: &FolderId) -> BlobResult<Vec<FileRef>> {
        self.inner.list(folder)
    }

    fn fetch(&self, file: &FileRef) -> BlobResult<Vec<u8>> {
        self.inner.fetch(file)
    }

    fn replace(&self, file: &FileRef, bytes: &[u8]) -> BlobResult<FileRef> {
        let allowed = self
            .replaces_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(BlobError::Unavailable("connection dropped".to_string()));
        }
        self.inner.replace(file, bytes)
    }

    fn create_file(&self, folder: &FolderId, name: &str, bytes: &[u8]) -> BlobResult<FileRef> {
        self.inner.create_file(folder, name, bytes)
    }

    fn delete_file(&self, file: &FileRef) -> BlobResult<bool> {
        self.inner.delete_file(file)
    }
}

#[test]
fn move_reports_partial_failure_when_rollback_also_fails() {
    let blobs = Arc::new(FlakyStore {
        inner: MemoryBlobStore::new(),
        replaces_left: AtomicUsize::new(usize::MAX),
    });
    let store = QuoteStore::new(Arc::clone(&blobs));
    seed(&store, "src.db", vec![quote(1, "A")]);
    let dest = seed(&store, "dest.db", vec![]);
    let mut session = Session::open(store, folder(), "src.db").unwrap();

    // Destination save succeeds; source save and destination restore fail.
    blobs.replaces_left.store(1, Ordering::SeqCst);
    let err = session.move_to("dest.db", &[1]).unwrap_err();
    match err {
        SessionError::Transfer(TransferError::PartialFailure {
            save_error,
            rollback_error,
        }) => {
            assert!(save_error.to_string().contains("connection dropped"));
            assert!(rollback_error.to_string().contains("connection dropped"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(session.table().rows(), &[quote(1, "A")]);
    assert_eq!(session.store().load(&dest).unwrap().len(), 1);
}
