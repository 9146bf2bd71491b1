//! Registry contract: id assignment, lookups, one-time links, role views.

use quantaflow_core::error::PlanError;
use quantaflow_core::id::OperatorId;
use quantaflow_core::operator::{Operator, OperatorKind};
use quantaflow_core::registry::PlanRegistry;
use quantaflow_core::udf::UdfRef;

fn linear_chain(registry: &mut PlanRegistry, input: &str, output: &str) -> (OperatorId, OperatorId) {
    let src = registry.register(Operator::source(input).unwrap()).unwrap();
    let sink = registry
        .register(Operator::sink(output, "\n", src).unwrap())
        .unwrap();
    registry.link(src, sink).unwrap();
    (src, sink)
}

#[test]
fn test_ids_never_repeat() {
    let mut registry = PlanRegistry::new();
    let (a_src, a_sink) = linear_chain(&mut registry, "a.txt", "a_out.txt");
    let (b_src, b_sink) = linear_chain(&mut registry, "b.txt", "b_out.txt");

    let ids = [a_src, a_sink, b_src, b_sink];
    for (i, left) in ids.iter().enumerate() {
        for right in &ids[i + 1..] {
            assert_ne!(left, right);
        }
    }
    assert_eq!(ids.map(OperatorId::get), [0, 1, 2, 3]);
}

#[test]
fn test_role_views_preserve_registration_order() {
    let mut registry = PlanRegistry::new();
    linear_chain(&mut registry, "first.txt", "first_out.txt");
    linear_chain(&mut registry, "second.txt", "second_out.txt");

    let source_ids: Vec<u64> = registry
        .sources()
        .iter()
        .map(|op| op.id().unwrap().get())
        .collect();
    let sink_ids: Vec<u64> = registry
        .sinks()
        .iter()
        .map(|op| op.id().unwrap().get())
        .collect();
    assert_eq!(source_ids, vec![0, 2]);
    assert_eq!(sink_ids, vec![1, 3]);

    for op in registry.sources() {
        assert_eq!(op.kind(), OperatorKind::Source);
    }
    for op in registry.sinks() {
        assert_eq!(op.kind(), OperatorKind::Sink);
    }
}

#[test]
fn test_register_rejects_operator_with_id() {
    let mut registry = PlanRegistry::new();
    let id = registry.register(Operator::source("a.txt").unwrap()).unwrap();

    let clone_with_id = registry.get(id).unwrap().clone();
    let err = registry.register(clone_with_id).unwrap_err();
    assert!(matches!(err, PlanError::Validation(_)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_link_refuses_second_successor() {
    let mut registry = PlanRegistry::new();
    let src = registry.register(Operator::source("a.txt").unwrap()).unwrap();
    let sort = registry
        .register(Operator::transform(OperatorKind::Sort, UdfRef::symbolic("by_len"), src).unwrap())
        .unwrap();
    registry.link(src, sort).unwrap();

    let other = registry
        .register(Operator::transform(OperatorKind::Map, UdfRef::symbolic("trim"), src).unwrap())
        .unwrap();
    let err = registry.link(src, other).unwrap_err();
    assert!(matches!(err, PlanError::State(_)));

    // The first link must survive the refused second one.
    assert_eq!(registry.get(src).unwrap().successor(), Some(sort));
}

#[test]
fn test_link_from_sink_refused() {
    let mut registry = PlanRegistry::new();
    let (_, sink) = linear_chain(&mut registry, "a.txt", "a_out.txt");
    let trailing = registry
        .register(Operator::transform(OperatorKind::Filter, UdfRef::symbolic("f"), sink).unwrap())
        .unwrap();

    let err = registry.link(sink, trailing).unwrap_err();
    assert!(matches!(err, PlanError::State(_)));
}

#[test]
fn test_link_unknown_ids() {
    let mut registry = PlanRegistry::new();
    let src = registry.register(Operator::source("a.txt").unwrap()).unwrap();

    let err = registry.link(src, OperatorId::new(42)).unwrap_err();
    assert!(matches!(err, PlanError::NotFound(_)));

    let sink = registry
        .register(Operator::sink("out.txt", "\n", OperatorId::new(42)).unwrap())
        .unwrap();
    let err = registry.link(OperatorId::new(42), sink).unwrap_err();
    assert!(matches!(err, PlanError::NotFound(_)));
}
