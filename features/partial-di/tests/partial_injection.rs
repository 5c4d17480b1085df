use std::{collections::BTreeSet, sync::Arc, thread};

use partial_di::{
    extract, Arguments, DynPartialFactory, InvokeError, MethodCall, Parameter, PartialFactory,
    ServiceBlueprint, ServiceDescriptor, Value,
};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Collaborator;

#[derive(Debug)]
struct PartialService {
    value: String,
    counter: u32,
    wrong: Option<Arc<Collaborator>>,
    optional: Option<Arc<Collaborator>>,
}

impl PartialService {
    fn inc(&mut self, name: &str) {
        if name == "inc" {
            self.counter += 1;
        }
    }

    fn double(&mut self, name: &str) {
        if name == "dble" {
            self.counter *= 2;
        }
    }

    fn descriptor() -> ServiceDescriptor<PartialService> {
        ServiceDescriptor::new(|args| {
            Ok(PartialService {
                value: args.required(0)?,
                counter: 1,
                wrong: args.nullable(1)?,
                optional: args.optional(2)?,
            })
        })
        .parameter(Parameter::new("value"))
        .parameter(Parameter::new("wrong"))
        .parameter(Parameter::new("optional").optional())
        .method("inc", 1, |service: &mut PartialService, args| {
            service.inc(&args.get::<String>(0)?);
            Ok(())
        })
        .method("double", 1, |service: &mut PartialService, args| {
            service.double(&args.get::<String>(0)?);
            Ok(())
        })
    }
}

fn blueprint(deferred: &[&str], calls: &[(&str, Option<&str>)]) -> ServiceBlueprint<PartialService> {
    let mut blueprint = ServiceBlueprint::new("partial_service")
        .descriptor(PartialService::descriptor())
        .defer_all(deferred.iter().copied())
        .argument_value(1, Value::none());
    for (method, arg) in calls {
        blueprint = blueprint.call(
            *method,
            arg.iter().map(|a| Value::new(a.to_string())).collect(),
        );
    }
    blueprint
}

fn factory(calls: &[(&str, Option<&str>)]) -> PartialFactory<PartialService> {
    extract(blueprint(&["value"], calls)).unwrap()
}

fn some_value() -> Arguments {
    Arguments::new().with("value", "some value".to_string())
}

#[test]
fn each_invocation_builds_a_new_instance() {
    let factory = factory(&[]);

    let mut first = factory.invoke(some_value()).unwrap();
    let second = factory.invoke(some_value()).unwrap();

    assert_eq!(first.value, "some value");
    assert_eq!(second.value, "some value");
    assert_eq!(first.counter, 1);
    assert_eq!(second.counter, 1);
    assert!(first.wrong.is_none());
    assert!(first.optional.is_none());

    first.inc("inc");
    assert_eq!(second.counter, 1);

    let first = factory.invoke_dyn(some_value()).unwrap();
    let second = factory.invoke_dyn(some_value()).unwrap();
    assert!(!Arc::ptr_eq(&first.instance, &second.instance));
    assert_eq!(second.downcast::<PartialService>().unwrap().value, "some value");
}

#[test]
fn explicit_null_reaches_optional_deferred_parameter() {
    let factory = extract(blueprint(&["value", "optional"], &[])).unwrap();

    let service = factory
        .invoke(some_value().with("optional", Value::none()))
        .unwrap();
    assert!(service.optional.is_none());

    let service = factory
        .invoke(some_value().with("optional", Arc::new(Collaborator)))
        .unwrap();
    assert_eq!(service.optional.as_deref(), Some(&Collaborator));
}

#[test]
fn optional_eager_argument_is_passed_through() {
    let factory = extract(
        blueprint(&["value"], &[]).argument(2, Arc::new(Collaborator)),
    )
    .unwrap();

    let service = factory.invoke(some_value()).unwrap();
    assert_eq!(service.optional.as_deref(), Some(&Collaborator));
}

#[test]
fn deferring_another_parameter_rejects_value() {
    let factory = extract(blueprint(&["wrong"], &[])).unwrap();
    assert!(!factory.eager_arguments().contains_key("wrong"));

    let error = factory.invoke(some_value()).unwrap_err();
    assert!(matches!(error, InvokeError::UnexpectedArguments(names) if names == vec!["value"]));
}

#[test]
fn positional_value_cannot_shadow_deferred_value() {
    let factory = extract(
        blueprint(&["value"], &[]).argument(0, "setup value".to_string()),
    )
    .unwrap();
    assert!(!factory.eager_arguments().contains_key("value"));

    let service = factory.invoke(some_value()).unwrap();
    assert_eq!(service.value, "some value");
}

#[test]
fn one_method_call() {
    let service = factory(&[("inc", Some("inc"))]).invoke(some_value()).unwrap();
    assert_eq!(service.counter, 2);
}

#[test]
fn method_calls_apply_in_declared_order() {
    let factory = factory(&[("inc", Some("inc")), ("double", Some("dble"))]);
    assert_eq!(factory.invoke(some_value()).unwrap().counter, 4);
    assert_eq!(factory.invoke(some_value()).unwrap().counter, 4);

    let factory = self::factory(&[("double", Some("dble")), ("inc", Some("inc"))]);
    assert_eq!(factory.invoke(some_value()).unwrap().counter, 3);
}

#[test]
fn missing_method_fails_at_invocation_not_setup() {
    let factory = factory(&[("missing", None)]);

    let error = factory.invoke(some_value()).unwrap_err();
    assert!(matches!(error, InvokeError::UnknownMethod { method, .. } if method == "missing"));
}

#[test]
fn too_few_method_arguments() {
    let factory = factory(&[("inc", None)]);

    let error = factory.invoke(some_value()).unwrap_err();
    assert!(matches!(
        error,
        InvokeError::ArgumentCount { method, required: 1, supplied: 0, .. } if method == "inc"
    ));
}

#[test]
fn method_table_is_checked_after_earlier_calls_ran() {
    let factory = factory(&[("inc", Some("inc")), ("missing", None)]);
    assert_eq!(factory.method_calls().len(), 2);
    assert!(matches!(
        factory.invoke(some_value()),
        Err(InvokeError::UnknownMethod { .. })
    ));
}

#[test]
fn concurrent_invocations_are_independent() {
    let factory = factory(&[("inc", Some("inc"))]);

    let values: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let factory = factory.clone();
                scope.spawn(move || {
                    let service = factory
                        .invoke(Arguments::new().with("value", format!("value {i}")))
                        .unwrap();
                    assert_eq!(service.counter, 2);
                    service.value
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let expected: Vec<String> = (0..8).map(|i| format!("value {i}")).collect();
    assert_eq!(values, expected);
}

#[test]
fn queued_calls_are_recorded_verbatim() {
    let factory = factory(&[("double", Some("dble"))]);
    let calls: Vec<&MethodCall> = factory.method_calls().iter().collect();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "double");
    assert_eq!(calls[0].arguments[0].get::<String>().unwrap(), "dble");
}

fn multi_factory() -> PartialFactory<Vec<String>> {
    let names = ["a", "b", "c", "d"];
    let mut descriptor = ServiceDescriptor::new(move |args| {
        let mut out = Vec::new();
        for position in 0..names.len() {
            if let Some(value) = args.optional::<String>(position)? {
                out.push(value);
            }
        }
        Ok(out)
    });
    for name in names {
        descriptor = descriptor.parameter(Parameter::new(name).optional());
    }
    extract(
        ServiceBlueprint::new("multi")
            .descriptor(descriptor)
            .defer_all(["a", "c"])
            .argument(1, "eager".to_string()),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn supersets_report_exactly_the_extra_names(extra in proptest::collection::btree_set("[e-z]{1,6}", 1..4)) {
        let mut args = Arguments::new().with("a", "1".to_string()).with("c", "2".to_string());
        for name in &extra {
            args = args.with(name.clone(), 0_u8);
        }

        match multi_factory().invoke(args) {
            Err(InvokeError::UnexpectedArguments(names)) => {
                let names: BTreeSet<String> = names.into_iter().collect();
                prop_assert_eq!(names, extra);
            }
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn subsets_report_exactly_the_missing_names(keep_a in any::<bool>(), keep_c in any::<bool>()) {
        prop_assume!(!(keep_a && keep_c));
        let mut args = Arguments::new();
        let mut missing = Vec::new();
        if keep_a { args = args.with("a", "1".to_string()) } else { missing.push("a".to_string()) }
        if keep_c { args = args.with("c", "2".to_string()) } else { missing.push("c".to_string()) }

        match multi_factory().invoke(args) {
            Err(InvokeError::MissingArguments(names)) => prop_assert_eq!(names, missing),
            other => prop_assert!(false, "unexpected result {:?}", other),
        }
    }

    #[test]
    fn exact_set_merges_eager_and_call_time(a in "[a-z]{0,8}", c in "[a-z]{0,8}") {
        let built = multi_factory()
            .invoke(Arguments::new().with("a", a.clone()).with("c", c.clone()))
            .unwrap();
        prop_assert_eq!(built, vec![a, "eager".to_string(), c]);
    }
}
