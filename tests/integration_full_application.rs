/// Full application wiring test
///
/// Models a small user-management service: App -> Controller -> Service ->
/// Repository -> Database, plus a Logger. The database sits behind a trait
/// object so tests can swap in a mock without touching the other layers.

use ferrous_wire::{Container, ContainerConfig, DiError, DiResult, ProviderModule};
use std::sync::{Arc, Mutex};

// ===== Domain =====

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, PartialEq)]
pub struct StorageError(String);

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "storage error: {}", self.0)
    }
}

impl std::error::Error for StorageError {}

pub trait Database: Send + Sync {
    fn find_user(&self, id: u32) -> Result<User, StorageError>;
    fn save_user(&self, user: &User) -> Result<(), StorageError>;
}

pub type DynDatabase = Box<dyn Database>;

// ===== Production implementations =====

pub struct SqlDatabase {
    pub host: String,
    pub port: u16,
    saved: Mutex<Vec<User>>,
}

impl Database for SqlDatabase {
    fn find_user(&self, id: u32) -> Result<User, StorageError> {
        Ok(User {
            id,
            name: format!("user{}", id),
            email: format!("user{}@example.com", id),
        })
    }

    fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.saved.lock().unwrap().push(user.clone());
        Ok(())
    }
}

pub fn new_sql_database() -> DynDatabase {
    Box::new(SqlDatabase {
        host: "localhost".to_string(),
        port: 3306,
        saved: Mutex::new(Vec::new()),
    })
}

pub struct UserRepository {
    db: Arc<DynDatabase>,
}

pub fn new_user_repository(db: Arc<DynDatabase>) -> UserRepository {
    UserRepository { db }
}

impl UserRepository {
    pub fn get(&self, id: u32) -> Result<User, StorageError> {
        self.db.find_user(id)
    }

    pub fn create(&self, user: &User) -> Result<(), StorageError> {
        self.db.save_user(user)
    }
}

pub struct UserService {
    repo: Arc<UserRepository>,
}

pub fn new_user_service(repo: Arc<UserRepository>) -> UserService {
    UserService { repo }
}

impl UserService {
    pub fn profile(&self, id: u32) -> Result<User, StorageError> {
        self.repo.get(id)
    }

    pub fn register(&self, name: &str, email: &str) -> Result<User, StorageError> {
        let user = User {
            id: 100,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.repo.create(&user)?;
        Ok(user)
    }
}

pub struct UserController {
    service: Arc<UserService>,
}

pub fn new_user_controller(service: Arc<UserService>) -> UserController {
    UserController { service }
}

impl UserController {
    pub fn get_user(&self, id: u32) -> String {
        match self.service.profile(id) {
            Ok(user) => format!("200 {}", user.name),
            Err(e) => format!("500 {}", e),
        }
    }

    pub fn create_user(&self, name: &str, email: &str) -> String {
        match self.service.register(name, email) {
            Ok(user) => format!("201 {}", user.id),
            Err(e) => format!("500 {}", e),
        }
    }
}

pub struct Logger {
    pub level: String,
    lines: Mutex<Vec<String>>,
}

pub fn new_logger() -> Logger {
    Logger {
        level: "INFO".to_string(),
        lines: Mutex::new(Vec::new()),
    }
}

impl Logger {
    pub fn info(&self, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("[{}] {}", self.level, message));
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

pub struct App {
    controller: Arc<UserController>,
    logger: Arc<Logger>,
}

pub fn new_app(controller: Arc<UserController>, logger: Arc<Logger>) -> App {
    App { controller, logger }
}

impl App {
    pub fn start(&self) -> Vec<String> {
        self.logger.info("application starting");
        let responses = vec![
            self.controller.get_user(1),
            self.controller.create_user("alice", "alice@example.com"),
        ];
        self.logger.info("application running");
        responses
    }
}

// ===== Composition =====

/// Everything except the database.
struct ApplicationModule;

impl ProviderModule for ApplicationModule {
    fn register(self, container: &mut Container) -> DiResult<()> {
        container
            .provide(new_app)?
            .provide(new_user_controller)?
            .provide(new_user_service)?
            .provide(new_user_repository)?
            .provide(new_logger)?;
        Ok(())
    }
}

// ===== Mock =====

#[derive(Default)]
struct MockDatabase {
    users: Mutex<Vec<User>>,
    fail_saves: bool,
}

impl Database for MockDatabase {
    fn find_user(&self, id: u32) -> Result<User, StorageError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| StorageError(format!("user {} not found", id)))
    }

    fn save_user(&self, user: &User) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError("read-only".to_string()));
        }
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }
}

// ===== Tests =====

#[test]
fn test_full_application_with_real_database() {
    let mut container = Container::new();
    container.provide(new_sql_database).unwrap();
    container.install(ApplicationModule).unwrap();

    assert!(container.validate().is_valid());

    let responses = container.invoke(|app: Arc<App>| app.start()).unwrap();
    assert_eq!(responses, vec!["200 user1".to_string(), "201 100".to_string()]);

    let log = container.invoke(|logger: Arc<Logger>| logger.lines()).unwrap();
    assert_eq!(
        log,
        vec![
            "[INFO] application starting".to_string(),
            "[INFO] application running".to_string()
        ]
    );
}

#[test]
fn test_full_application_with_mock_database() {
    let mut container = Container::new();
    container.install(ApplicationModule).unwrap();
    container
        .provide(|| -> DynDatabase {
            Box::new(MockDatabase {
                users: Mutex::new(vec![User {
                    id: 1,
                    name: "mocked".to_string(),
                    email: "mock@example.com".to_string(),
                }]),
                fail_saves: true,
            })
        })
        .unwrap();

    let responses = container.invoke(|app: Arc<App>| app.start()).unwrap();
    assert_eq!(responses[0], "200 mocked");
    assert_eq!(responses[1], "500 storage error: read-only");
}

#[test]
fn test_mock_sees_writes_from_service_layer() {
    let mut container = Container::new();
    container.install(ApplicationModule).unwrap();
    container
        .provide(|| Box::new(MockDatabase::default()) as DynDatabase)
        .unwrap();

    container
        .invoke(|service: Arc<UserService>| {
            service.register("bob", "bob@example.com").unwrap();
        })
        .unwrap();

    // The repository and the controller share the one database instance
    let found = container
        .invoke(|controller: Arc<UserController>| controller.get_user(100))
        .unwrap();
    assert_eq!(found, "200 bob");
}

#[test]
fn test_layers_share_singletons() {
    let mut container = Container::new();
    container.provide(new_sql_database).unwrap();
    container.install(ApplicationModule).unwrap();

    let (app, controller, service, repo) = container
        .invoke(
            |app: Arc<App>,
             controller: Arc<UserController>,
             service: Arc<UserService>,
             repo: Arc<UserRepository>| (app, controller, service, repo),
        )
        .unwrap();

    assert!(Arc::ptr_eq(&app.controller, &controller));
    assert!(Arc::ptr_eq(&controller.service, &service));
    assert!(Arc::ptr_eq(&service.repo, &repo));
    assert_eq!(container.cached_count(), 6);
}

#[test]
fn test_missing_database_reported_up_front() {
    let mut container = Container::new();
    container.install(ApplicationModule).unwrap();

    let report = container.validate();
    assert_eq!(report.missing().count(), 1);

    let err = container.invoke(|app: Arc<App>| app.start()).unwrap_err();
    assert!(matches!(err, DiError::ProviderNotFound(name) if name.contains("Database")));
}

#[test]
fn test_graph_export_of_application() {
    let mut container = Container::new();
    container.provide(new_sql_database).unwrap();
    container.install(ApplicationModule).unwrap();
    container.resolve::<Logger>().unwrap();

    let graph = container.dependency_graph();
    assert_eq!(graph.nodes.len(), 6);
    // App has two parameters, Controller/Service/Repository one each
    assert_eq!(graph.edges.len(), 5);
    assert_eq!(graph.nodes.iter().filter(|n| n.cached).count(), 1);

    let mermaid = graph.to_mermaid();
    assert!(mermaid.contains("class "));
}

#[test]
fn test_traced_container_runs_application() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("ferrous_wire=debug")
        .with_test_writer()
        .try_init();

    let mut container = Container::with_config(ContainerConfig::default().trace_resolution(true));
    container.provide(new_sql_database).unwrap();
    container.install(ApplicationModule).unwrap();

    let responses = container.invoke(|app: Arc<App>| app.start()).unwrap();
    assert_eq!(responses.len(), 2);
}
