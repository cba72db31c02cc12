use ferrous_wire::{Container, DiError};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Reader {
    id: u32,
}

#[derive(Debug)]
struct Writer {
    id: u32,
}

#[derive(Debug)]
struct Settings {
    base: u32,
}

#[test]
fn test_multi_output_seeds_siblings() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut container = Container::new();
    container
        .provide_many(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            (Reader { id: 1 }, Writer { id: 2 })
        })
        .unwrap();

    let reader = container.resolve::<Reader>().unwrap();
    assert!(container.is_cached::<Writer>());

    let writer = container.resolve::<Writer>().unwrap();
    assert_eq!((reader.id, writer.id), (1, 2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_multi_output_with_dependencies() {
    let mut container = Container::new();
    container.provide(|| Settings { base: 10 }).unwrap();
    container
        .provide_many(|s: Arc<Settings>| (Reader { id: s.base + 1 }, Writer { id: s.base + 2 }))
        .unwrap();

    let ids = container
        .invoke(|w: Arc<Writer>, r: Arc<Reader>| (r.id, w.id))
        .unwrap();
    assert_eq!(ids, (11, 12));
}

#[test]
fn test_multi_output_claims_every_type() {
    let mut container = Container::new();
    container.provide(|| Writer { id: 0 }).unwrap();

    let err = container
        .provide_many(|| (Reader { id: 1 }, Writer { id: 2 }))
        .unwrap_err();

    assert!(matches!(err, DiError::DuplicateProvider(name) if name.ends_with("Writer")));
    // Nothing from the rejected constructor was registered
    assert!(!container.contains::<Reader>());
    assert_eq!(container.provider_count(), 1);
}

#[test]
fn test_multi_output_repeated_type_rejected() {
    let mut container = Container::new();
    let err = container
        .provide_many(|| (Reader { id: 1 }, Reader { id: 2 }))
        .unwrap_err();

    assert!(matches!(err, DiError::DuplicateProvider(_)));
    assert_eq!(container.provider_count(), 0);
}

#[derive(Debug)]
struct HandshakeFailed;

impl fmt::Display for HandshakeFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("handshake failed")
    }
}

impl std::error::Error for HandshakeFailed {}

#[test]
fn test_fallible_multi_output() {
    let mut container = Container::new();
    container
        .try_provide_many(|| -> Result<(Reader, Writer), HandshakeFailed> { Err(HandshakeFailed) })
        .unwrap();

    match container.resolve::<Writer>() {
        Err(DiError::Constructor { type_name, cause }) => {
            assert!(type_name.ends_with("Writer"));
            assert!(cause.downcast_ref::<HandshakeFailed>().is_some());
        }
        other => panic!("expected constructor failure, got {:?}", other.err()),
    }
    assert!(!container.is_cached::<Reader>());
    assert!(!container.is_cached::<Writer>());
}

#[test]
fn test_fallible_multi_output_success() {
    let mut container = Container::new();
    container
        .try_provide_many(|| Ok::<_, HandshakeFailed>((Reader { id: 3 }, Writer { id: 4 }, 5u8)))
        .unwrap();

    let total = container
        .invoke(|r: Arc<Reader>, w: Arc<Writer>, n: Arc<u8>| r.id + w.id + *n as u32)
        .unwrap();
    assert_eq!(total, 12);
}

#[test]
fn test_error_type_is_not_providable() {
    let mut container = Container::new();
    container
        .try_provide(|| Ok::<_, HandshakeFailed>(Settings { base: 1 }))
        .unwrap();

    assert!(container.contains::<Settings>());
    assert!(!container.contains::<HandshakeFailed>());
}

#[test]
fn test_result_element_rejects_whole_tuple() {
    let mut container = Container::new();
    let err = container
        .provide_many(|| (Reader { id: 1 }, Ok::<_, HandshakeFailed>(Writer { id: 2 })))
        .unwrap_err();

    assert!(matches!(err, DiError::ResultOutput(name) if name.contains("Writer")));
    assert!(!container.contains::<Reader>());
    assert_eq!(container.provider_count(), 0);
}
