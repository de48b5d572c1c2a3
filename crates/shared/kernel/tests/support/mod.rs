#![allow(dead_code, unreachable_pub)]

use canopy_kernel::prelude::*;
use parking_lot::Mutex;
use std::fmt::{self, Debug};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub type TestFactory = ShellContextFactory<Arc<RecordingComposition>, Arc<StubScopes>>;

pub fn acme() -> TenantSettings {
    TenantSettings::new("acme", TenantState::Uninitialized)
}

pub fn factory(composition: RecordingComposition, scopes: StubScopes) -> (TestFactory, Arc<RecordingComposition>, Arc<StubScopes>) {
    let composition = Arc::new(composition);
    let scopes = Arc::new(scopes);
    let factory = ShellContextFactory::with_default_baseline(composition.clone(), scopes.clone());
    (factory, composition, scopes)
}

// --- Composition ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlueprint {
    pub tenant: String,
    pub features: Vec<String>,
    /// Counts compose calls, so two blueprints of the same inputs are told apart.
    pub generation: usize,
}

#[derive(Debug, Default)]
pub struct RecordingComposition {
    pub calls: Mutex<Vec<ShellDescriptor>>,
    pub failure: Option<&'static str>,
}

impl RecordingComposition {
    pub fn failing(message: &'static str) -> Self {
        Self { failure: Some(message), ..Self::default() }
    }

    pub fn descriptors(&self) -> Vec<ShellDescriptor> {
        self.calls.lock().clone()
    }
}

#[derive(Debug)]
pub struct ConflictingFeatures(pub &'static str);

impl fmt::Display for ConflictingFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conflicting features: {}", self.0)
    }
}

impl std::error::Error for ConflictingFeatures {}

impl CompositionStrategy for RecordingComposition {
    type Blueprint = TestBlueprint;

    fn compose(
        &self,
        settings: &TenantSettings,
        descriptor: &ShellDescriptor,
    ) -> Result<TestBlueprint, BoxError> {
        let mut calls = self.calls.lock();
        calls.push(descriptor.clone());

        if let Some(message) = self.failure {
            return Err(Box::new(ConflictingFeatures(message)));
        }

        Ok(TestBlueprint {
            tenant: settings.name.clone(),
            features: descriptor.feature_names().map(str::to_owned).collect(),
            generation: calls.len(),
        })
    }
}

// --- Scopes ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeBehavior {
    /// Scope provides a shell.
    WithShell,
    /// Scope provides nothing at all.
    Empty,
    /// Scope knows the shell but fails to construct it.
    BrokenShell,
    /// Scope creation itself fails with `disk full`.
    DiskFull,
}

#[derive(Debug)]
pub struct StubScopes {
    pub behavior: ScopeBehavior,
    pub calls: Mutex<Vec<TestBlueprint>>,
    pub released: Arc<AtomicUsize>,
}

impl StubScopes {
    pub fn new(behavior: ScopeBehavior) -> Self {
        Self { behavior, calls: Mutex::new(Vec::new()), released: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn blueprints(&self) -> Vec<TestBlueprint> {
        self.calls.lock().clone()
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ScopeFactory<TestBlueprint> for StubScopes {
    type Scope = TestScope;

    fn create_scope(
        &self,
        settings: &TenantSettings,
        blueprint: &TestBlueprint,
    ) -> Result<TestScope, BoxError> {
        self.calls.lock().push(blueprint.clone());

        let services = match self.behavior {
            ScopeBehavior::DiskFull => return Err(Box::new(io::Error::other("disk full"))),
            ScopeBehavior::WithShell => ServiceScope::builder()
                .register(ShellHandle::new(TestShell::new(&settings.name)))
                .build(),
            ScopeBehavior::Empty | ScopeBehavior::BrokenShell => ServiceScope::default(),
        };

        Ok(TestScope {
            services,
            broken: self.behavior == ScopeBehavior::BrokenShell,
            released: Arc::clone(&self.released),
        })
    }
}

#[derive(Debug)]
pub struct TestScope {
    pub services: ServiceScope,
    broken: bool,
    released: Arc<AtomicUsize>,
}

impl ResolutionScope for TestScope {
    fn resolve(&self, kind: ServiceKind) -> Result<Option<ServiceInstance>, ResolveError> {
        if self.broken {
            return Err(ResolveError::Construction {
                source: Box::new(io::Error::other("shell constructor panicked")),
                context: Some(kind.name().into()),
            });
        }
        self.services.resolve(kind)
    }
}

impl Drop for TestScope {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct TestShell {
    pub tenant: String,
    pub active: AtomicBool,
}

impl TestShell {
    pub fn new(tenant: &str) -> Self {
        Self { tenant: tenant.to_owned(), active: AtomicBool::new(false) }
    }
}

impl Shell for TestShell {
    fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn terminate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

// --- Log capture ---

#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Whether the message or any field value mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.fields.iter().any(|(_, value)| value.contains(needle))
    }
}

#[derive(Debug, Clone, Default)]
pub struct CapturedLogs {
    records: Arc<Mutex<Vec<Record>>>,
}

impl CapturedLogs {
    pub fn at(&self, level: Level) -> Vec<Record> {
        self.records.lock().iter().filter(|record| record.level == level).cloned().collect()
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.push(field, format!("{value:?}"));
    }
}

impl RecordVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        self.records.lock().push(Record {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Runs `f` with a subscriber that captures every event emitted on this thread.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = Registry::default().with(logs.clone());
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, logs)
}
