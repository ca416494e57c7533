//! Type hierarchy, trait inheritance and opacity properties

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use faultline::{
    decorate, register_trait, register_type_subscriber, ErrorType, Namespace, Trait,
    TypeSubscriber,
};
use proptest::prelude::*;

/// Build a random forest of types: `parents[i]` picks the parent of type
/// `i + 1` among the types created before it, or none.
fn build_forest(parents: &[Option<usize>]) -> Vec<ErrorType> {
    let ns = Namespace::new("forest", &[]);
    let mut types = vec![ns.new_type("t0", &[])];
    for (i, parent) in parents.iter().enumerate() {
        let label = format!("t{}", i + 1);
        let created = match parent {
            Some(p) => types[p % types.len()].new_subtype(label, &[]),
            None => ns.new_type(label, &[]),
        };
        types.push(created);
    }
    types
}

fn is_ancestor(candidate: &ErrorType, of: &ErrorType) -> bool {
    std::iter::successors(Some(of), |t| t.supertype()).any(|t| t == candidate)
}

proptest! {
    #[test]
    fn is_of_type_matches_ancestry(parents in prop::collection::vec(prop::option::of(0usize..16), 0..12)) {
        let types = build_forest(&parents);
        for a in &types {
            let err = a.new("x");
            for b in &types {
                prop_assert_eq!(err.is_of_type(b), is_ancestor(b, a));
            }
        }
    }

    #[test]
    fn traits_are_closed_under_inheritance(depth in 1usize..8, tagged_at in 0usize..8) {
        let tag = register_trait("tag");
        let ns = Namespace::new("chain", &[]);
        let mut types: Vec<ErrorType> = Vec::new();
        for level in 0..depth {
            let traits: Vec<&Trait> = if level == tagged_at { vec![&tag] } else { vec![] };
            let next = match types.last() {
                Some(parent) => parent.new_subtype(format!("l{}", level), &traits),
                None => ns.new_type("l0", &traits),
            };
            types.push(next);
        }
        for (level, t) in types.iter().enumerate() {
            prop_assert_eq!(t.has_trait(&tag), level >= tagged_at);
        }
    }
}

#[test]
fn test_sibling_types_are_unrelated() {
    init_test_logging();

    let err = TEST_TYPE_BAR1.new("x");
    assert!(!err.is_of_type(&TEST_TYPE_BAR2));
    assert!(!err.is_of_type(&TEST_TYPE));
    assert!(TEST_SUBTYPE1.new("x").is_of_type(&TEST_TYPE));
}

#[test]
fn test_namespace_traits_reach_types() {
    let tag = register_trait("namespace_tag");
    let ns = Namespace::new("tagged", &[&tag]);
    let child_ns = ns.new_sub_namespace("child", &[]);
    let err = child_ns.new_type("kind", &[]).new("x");

    assert!(err.has_trait(&tag));
    assert!(decorate(err.clone(), "d").has_trait(&tag));
    assert!(!TEST_TYPE.wrap(err, "opaque").has_trait(&tag));
}

#[test]
fn test_namespace_lineage() {
    let ns = Namespace::new("lineage", &[]);
    let sub = ns.new_sub_namespace("sub", &[]);
    let kind = sub.new_type("kind", &[]);

    assert_eq!(kind.full_name(), "lineage.sub.kind");
    assert_eq!(kind.namespace(), &sub);
    assert_eq!(kind.root_namespace(), &ns);
    assert!(ns.is_namespace_of(&kind));
    assert!(!TEST_NAMESPACE.is_namespace_of(&kind));
}

#[derive(Default)]
struct NameRecorder {
    names: Mutex<Vec<String>>,
}

impl TypeSubscriber for NameRecorder {
    fn on_namespace_created(&self, namespace: &Namespace) {
        self.names.lock().unwrap().push(format!("ns:{}", namespace.full_name()));
    }

    fn on_type_created(&self, error_type: &ErrorType) {
        self.names.lock().unwrap().push(error_type.full_name().to_string());
    }
}

#[test]
fn test_subscriber_sees_common_and_new_types() {
    let recorder = Arc::new(NameRecorder::default());
    register_type_subscriber(recorder.clone());

    let ns = Namespace::new("observed", &[]);
    ns.new_type("kind", &[]);

    let names = recorder.names.lock().unwrap();
    assert!(names.contains(&"common.illegal_argument".to_string()));
    assert!(names.contains(&"common.unsupported_operation.not_implemented".to_string()));
    assert!(names.contains(&"ns:observed".to_string()));
    assert!(names.contains(&"observed.kind".to_string()));
}
