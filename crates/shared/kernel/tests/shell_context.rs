mod support;

use canopy_kernel::domain::constants::{HOSTING, LOGGING_CONSOLE, SETTINGS, SETUP, TRANSIENT_SERIAL};
use canopy_kernel::prelude::*;
use serial_test::serial;
use std::error::Error as _;
use std::io;
use std::sync::Arc;
use support::{RecordingComposition, ScopeBehavior, StubScopes, acme, capture, factory};
use tracing::Level;

#[test]
fn composes_the_baseline_once_and_scopes_that_blueprint_once() {
    let (factory, composition, scopes) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));

    let context = factory.create_shell_context(&acme()).expect("shell context");

    let descriptors = composition.descriptors();
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].serial_number, TRANSIENT_SERIAL);
    assert_eq!(
        descriptors[0].feature_names().collect::<Vec<_>>(),
        [LOGGING_CONSOLE, HOSTING, SETTINGS]
    );
    assert!(descriptors[0].parameters.is_empty());
    assert!(!descriptors[0].contains(SETUP));

    assert_eq!(scopes.blueprints(), [context.blueprint.clone()]);
    assert_eq!(context.tenant(), "acme");
    assert_eq!(context.settings, acme());
}

#[test]
fn resolved_shell_comes_from_the_context_scope() {
    let (factory, _, _) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));

    let context = factory.create_shell_context(&acme()).expect("shell context");
    let registered = context.lifetime_scope.get_required_service::<ShellHandle>().unwrap();

    assert!(context.shell.ptr_eq(&registered));
}

#[test]
#[serial]
fn logs_tenant_on_entry() {
    let (factory, _, _) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));

    let (result, logs) = capture(|| factory.create_shell_context(&acme()));

    assert!(result.is_ok());
    let info = logs.at(Level::INFO);
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].field("tenant"), Some("acme"));
    assert!(logs.at(Level::ERROR).is_empty());
}

#[test]
#[serial]
fn scope_creation_failure_propagates_the_io_error() {
    let (factory, _, _) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::DiskFull));

    let (result, logs) = capture(|| factory.create_shell_context(&acme()));

    let err = result.expect_err("scope creation must fail");
    assert!(matches!(err, ShellError::ScopeCreation { .. }));
    let io = err.source().and_then(|source| source.downcast_ref::<io::Error>());
    assert_eq!(io.map(ToString::to_string).as_deref(), Some("disk full"));

    let errors = logs.at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].mentions("acme"));
    assert!(errors[0].mentions("disk full"));
}

#[test]
#[serial]
fn composition_failure_is_logged_once_with_descriptor_context() {
    let (factory, _, scopes) = factory(
        RecordingComposition::failing("hosting vs setup"),
        StubScopes::new(ScopeBehavior::WithShell),
    );

    let (result, logs) = capture(|| factory.create_shell_context(&acme()));

    let err = result.expect_err("composition must fail");
    assert!(matches!(err, ShellError::Composition { .. }));
    assert!(err.source().is_some_and(|source| source.is::<support::ConflictingFeatures>()));
    assert!(scopes.blueprints().is_empty(), "no scope is created without a blueprint");

    let errors = logs.at(Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("tenant"), Some("acme"));
    assert_eq!(errors[0].field("serial"), Some("-1"));
    assert!(errors[0].field("features").is_some_and(|features| features.contains(HOSTING)));
}

#[test]
#[serial]
fn missing_shell_is_fatal_and_releases_the_scope() {
    let (factory, _, scopes) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::Empty));

    let (result, logs) = capture(|| factory.create_shell_context(&acme()));

    let err = result.expect_err("shell is mandatory");
    assert!(matches!(err, ShellError::MandatoryServiceMissing { cause: None, .. }));
    assert_eq!(scopes.blueprints().len(), 1);
    assert_eq!(scopes.released(), 1, "partially built scope must be released");
    assert_eq!(logs.at(Level::ERROR).len(), 1);
}

#[test]
fn broken_shell_is_reported_as_missing_with_its_cause() {
    let (factory, _, scopes) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::BrokenShell));

    let err = factory.create_shell_context(&acme()).expect_err("shell cannot be constructed");

    let ShellError::MandatoryServiceMissing { cause: Some(cause), service, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(matches!(cause, ResolveError::Construction { .. }));
    assert!(service.ends_with("ShellHandle"));
    assert_eq!(scopes.released(), 1);
}

#[test]
fn dropping_the_context_releases_its_scope() {
    let (factory, _, scopes) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));

    let context = factory.create_shell_context(&acme()).expect("shell context");
    assert_eq!(scopes.released(), 0);

    drop(context);
    assert_eq!(scopes.released(), 1);
}

#[test]
fn repeated_calls_build_independent_but_equivalent_contexts() {
    let (factory, composition, _) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));

    let first = factory.create_shell_context(&acme()).expect("first context");
    let second = factory.create_shell_context(&acme()).expect("second context");

    assert_ne!(first.id, second.id);
    assert_ne!(first.blueprint.generation, second.blueprint.generation);
    assert_eq!(first.blueprint.features, second.blueprint.features);
    assert!(!first.shell.ptr_eq(&second.shell));
    assert_eq!(composition.descriptors()[0], composition.descriptors()[1]);

    first.shell.activate();
    let shell = second.lifetime_scope.get_required_service::<ShellHandle>().unwrap();
    assert!(shell.ptr_eq(&second.shell));
}

#[test]
fn contexts_for_distinct_tenants_can_be_built_concurrently() {
    let (factory, composition, _) =
        factory(RecordingComposition::default(), StubScopes::new(ScopeBehavior::WithShell));
    let factory = Arc::new(factory);

    let tenants = ["acme", "globex", "initech", "umbrella"];
    let contexts: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = tenants
            .iter()
            .map(|name| {
                let factory = Arc::clone(&factory);
                s.spawn(move || {
                    factory.create_shell_context(&TenantSettings::new(*name, TenantState::Running))
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap().unwrap()).collect()
    });

    for (context, name) in contexts.iter().zip(tenants) {
        assert_eq!(context.tenant(), name);
        assert_eq!(context.blueprint.tenant, name);
    }
    assert_eq!(composition.descriptors().len(), tenants.len());
}

#[test]
fn custom_baseline_is_used_for_the_shell() {
    let baseline = ConfiguredBaseline::new(&canopy_kernel::domain::config::BaselineConfig {
        shared: vec!["log".to_owned()],
        operational: vec!["hosting".to_owned(), "demo.blog".to_owned()],
        setup: vec!["setup".to_owned()],
    })
    .unwrap();
    let composition = Arc::new(RecordingComposition::default());
    let factory = ShellContextFactory::new(
        Arc::clone(&composition),
        StubScopes::new(ScopeBehavior::WithShell),
        baseline,
    );

    let context = factory.create_shell_context(&acme()).expect("shell context");

    assert_eq!(context.blueprint.features, ["log", "hosting", "demo.blog"]);
}
