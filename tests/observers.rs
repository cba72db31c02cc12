use ferrous_wire::{AnyArc, Container, DiError, DiObserver, DynConstructor, Key, LoggingObserver};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl DiObserver for Recorder {
    fn resolving(&self, key: &Key) {
        self.events.lock().unwrap().push(format!("resolving {}", key.short_name()));
    }

    fn resolved(&self, key: &Key, _duration: Duration) {
        self.events.lock().unwrap().push(format!("resolved {}", key.short_name()));
    }

    fn constructor_failed(&self, key: &Key, error: &(dyn Error + 'static)) {
        self.events
            .lock()
            .unwrap()
            .push(format!("failed {}: {}", key.short_name(), error));
    }
}

struct Config;
struct Database;
struct Service;

#[test]
fn test_events_follow_construction_order() {
    let recorder = Arc::new(Recorder::default());

    let mut container = Container::new();
    container.add_observer(recorder.clone());
    container
        .provide(|_: Arc<Database>| Service)
        .unwrap()
        .provide(|_: Arc<Config>| Database)
        .unwrap()
        .provide(|| Config)
        .unwrap();

    container.resolve::<Service>().unwrap();
    // Cache hits are not reported
    container.resolve::<Service>().unwrap();
    container.resolve::<Config>().unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            "resolving Config",
            "resolved Config",
            "resolving Database",
            "resolved Database",
            "resolving Service",
            "resolved Service",
        ]
    );
}

#[test]
fn test_failure_is_reported_to_observers() {
    let recorder = Arc::new(Recorder::default());

    let mut container = Container::new();
    container.add_observer(recorder.clone());
    container
        .try_provide(|| Err::<Database, _>("connection refused"))
        .unwrap();

    assert!(container.resolve::<Database>().is_err());
    assert_eq!(
        recorder.events(),
        vec!["resolving Database", "failed Database: connection refused"]
    );
}

#[test]
fn test_logging_observer_alongside_custom_observer() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ferrous_wire=trace")
        .with_test_writer()
        .try_init();

    let recorder = Arc::new(Recorder::default());

    let mut container = Container::new();
    container
        .add_observer(Arc::new(LoggingObserver::with_prefix("observers-test")))
        .add_observer(recorder.clone());
    container.provide(|| Config).unwrap();

    container.resolve::<Config>().unwrap();
    assert_eq!(recorder.events().len(), 2);
}

#[test]
fn test_mismatched_outputs_are_reported_to_observers() {
    let recorder = Arc::new(Recorder::default());

    let mut container = Container::new();
    container.add_observer(recorder.clone());
    container
        .register_dynamic(
            DynConstructor::named("wrong_type")
                .output::<Database>()
                .call(|_| Ok(vec![Arc::new(Config) as AnyArc])),
        )
        .unwrap();

    assert!(matches!(
        container.resolve::<Database>(),
        Err(DiError::TypeMismatch(_))
    ));

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], "resolving Database");
    assert!(events[1].starts_with("failed Database: Type mismatch for: "));
}
