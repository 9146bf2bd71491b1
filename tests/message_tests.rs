//! Wire serialization: layout, determinism, round-trips, and structural
//! validation.

use quantaflow_builder::{DataQuantaBuilder, SinkOptions};
use quantaflow_core::error::PlanError;
use quantaflow_core::id::OperatorId;
use quantaflow_core::operator::{Operator, OperatorConfig, OperatorKind};
use quantaflow_core::registry::PlanRegistry;
use quantaflow_core::udf::{UdfCatalog, UdfRef};
use quantaflow_message::{
    write_plan, CatalogUdfEncoder, EncodedUdf, PlanMessage, SymbolicUdfEncoder,
    WIRE_FORMAT_VERSION,
};

fn demo_builder() -> DataQuantaBuilder {
    let builder = DataQuantaBuilder::new();
    builder
        .source("numbers.txt")
        .unwrap()
        .filter(UdfRef::symbolic("odd_only"))
        .unwrap()
        .sink("out.txt", SinkOptions::with_terminator(""))
        .unwrap();
    builder
}

#[test]
fn test_message_layout() {
    let builder = demo_builder();
    let encoder = SymbolicUdfEncoder::default();
    let message = write_plan(&builder.registry().borrow(), &encoder).unwrap();

    assert_eq!(message.version, WIRE_FORMAT_VERSION);
    assert_eq!(message.sources, vec![OperatorId::new(0)]);
    assert_eq!(message.sinks, vec![OperatorId::new(2)]);
    assert_eq!(message.operators.len(), 3);

    let kinds: Vec<OperatorKind> = message.operators.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![OperatorKind::Source, OperatorKind::Filter, OperatorKind::Sink]
    );

    let filter = message.record(OperatorId::new(1)).unwrap();
    assert_eq!(filter.predecessor, Some(OperatorId::new(0)));
    assert_eq!(filter.successor, Some(OperatorId::new(2)));
    assert_eq!(filter.config, OperatorConfig::Transform);
    assert_eq!(
        filter.udf,
        Some(EncodedUdf::Symbolic {
            name: "odd_only".into()
        })
    );

    let sink = message.record(OperatorId::new(2)).unwrap();
    assert_eq!(
        sink.config,
        OperatorConfig::Sink {
            path: "out.txt".into(),
            line_terminator: "".into(),
        }
    );
    assert_eq!(sink.successor, None);
}

#[test]
fn test_serialization_is_deterministic() {
    let encoder = SymbolicUdfEncoder::default();

    let builder = demo_builder();
    let registry = builder.registry();
    let first = write_plan(&registry.borrow(), &encoder).unwrap();
    let second = write_plan(&registry.borrow(), &encoder).unwrap();
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());

    // An independently built but identical registry serializes identically.
    let other = demo_builder();
    let third = write_plan(&other.registry().borrow(), &encoder).unwrap();
    assert_eq!(first.to_bytes().unwrap(), third.to_bytes().unwrap());
    assert_eq!(
        first.plan_hash().unwrap(),
        third.plan_hash().unwrap()
    );
}

#[test]
fn test_round_trip_reproduces_topology() {
    let builder = DataQuantaBuilder::new();
    builder
        .source("words.txt")
        .unwrap()
        .sort(UdfRef::symbolic("lowercase"))
        .unwrap()
        .map(UdfRef::symbolic("trim"))
        .unwrap()
        .sink("sorted.txt", SinkOptions::default())
        .unwrap();

    let encoder = SymbolicUdfEncoder::default();
    let message = write_plan(&builder.registry().borrow(), &encoder).unwrap();
    let decoded = PlanMessage::from_bytes(&message.to_bytes().unwrap()).unwrap();
    assert_eq!(decoded, message);

    // Rebuild each chain by following successor ids; the walk must visit the
    // records in exactly the order the writer emitted them.
    let mut walked = Vec::new();
    for &source in &decoded.sources {
        let mut cursor = Some(source);
        while let Some(id) = cursor {
            let record = decoded.record(id).expect("link target present");
            walked.push(id);
            if let Some(pred) = record.predecessor {
                let pred_record = decoded.record(pred).expect("predecessor present");
                assert_eq!(pred_record.successor, Some(id));
            }
            cursor = record.successor;
        }
    }
    let emitted: Vec<OperatorId> = decoded.operators.iter().map(|r| r.id).collect();
    assert_eq!(walked, emitted);
}

#[test]
fn test_two_chains_serialize_in_creation_order() {
    let builder = DataQuantaBuilder::new();
    builder
        .source("a.txt")
        .unwrap()
        .sink("a_out.txt", SinkOptions::default())
        .unwrap();
    builder
        .source("b.txt")
        .unwrap()
        .filter(UdfRef::symbolic("nonempty"))
        .unwrap()
        .sink("b_out.txt", SinkOptions::default())
        .unwrap();

    let encoder = SymbolicUdfEncoder::default();
    let message = write_plan(&builder.registry().borrow(), &encoder).unwrap();

    assert_eq!(
        message.sources,
        vec![OperatorId::new(0), OperatorId::new(2)]
    );
    assert_eq!(message.sinks, vec![OperatorId::new(1), OperatorId::new(4)]);

    let emitted: Vec<u64> = message.operators.iter().map(|r| r.id.get()).collect();
    assert_eq!(emitted, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_source_without_sink_is_structural() {
    let builder = DataQuantaBuilder::new();
    builder.source("a.txt").unwrap();

    let encoder = SymbolicUdfEncoder::default();
    let err = write_plan(&builder.registry().borrow(), &encoder).unwrap_err();
    assert!(matches!(err, PlanError::Structural(_)));
}

#[test]
fn test_orphaned_operator_is_structural() {
    let mut registry = PlanRegistry::new();
    let src = registry.register(Operator::source("a.txt").unwrap()).unwrap();
    let sink = registry
        .register(Operator::sink("out.txt", "\n", src).unwrap())
        .unwrap();
    registry.link(src, sink).unwrap();

    // Registered but never linked into any chain.
    registry
        .register(
            Operator::transform(OperatorKind::Filter, UdfRef::symbolic("stray"), sink).unwrap(),
        )
        .unwrap();

    let encoder = SymbolicUdfEncoder::default();
    let err = write_plan(&registry, &encoder).unwrap_err();
    assert!(matches!(err, PlanError::Structural(_)));
}

#[test]
fn test_unserializable_udf_aborts_whole_plan() {
    let builder = DataQuantaBuilder::new();
    builder
        .source("numbers.txt")
        .unwrap()
        .filter(UdfRef::symbolic("registered"))
        .unwrap()
        .map(UdfRef::symbolic("unregistered"))
        .unwrap()
        .sink("out.txt", SinkOptions::default())
        .unwrap();

    let mut catalog = UdfCatalog::new();
    catalog.register("registered");
    let encoder = CatalogUdfEncoder::new(catalog, 1024);

    let err = write_plan(&builder.registry().borrow(), &encoder).unwrap_err();
    assert!(matches!(err, PlanError::UnserializableUdf(_)));
}

#[test]
fn test_bytecode_udf_round_trips() {
    let builder = DataQuantaBuilder::new();
    builder
        .source("events.log")
        .unwrap()
        .map(UdfRef::bytecode(vec![0x01, 0x02, 0x7f]))
        .unwrap()
        .sink("mapped.log", SinkOptions::default())
        .unwrap();

    let encoder = SymbolicUdfEncoder::default();
    let message = write_plan(&builder.registry().borrow(), &encoder).unwrap();
    let decoded = PlanMessage::from_bytes(&message.to_bytes().unwrap()).unwrap();

    let map = decoded.record(OperatorId::new(1)).unwrap();
    assert_eq!(
        map.udf,
        Some(EncodedUdf::Bytecode {
            payload: vec![0x01, 0x02, 0x7f]
        })
    );
}

#[test]
fn test_plan_hash_differs_for_different_plans() {
    let encoder = SymbolicUdfEncoder::default();

    let first = demo_builder();
    let first_hash = write_plan(&first.registry().borrow(), &encoder)
        .unwrap()
        .plan_hash()
        .unwrap();

    let builder = DataQuantaBuilder::new();
    builder
        .source("numbers.txt")
        .unwrap()
        .filter(UdfRef::symbolic("even_only"))
        .unwrap()
        .sink("out.txt", SinkOptions::with_terminator(""))
        .unwrap();
    let second_hash = write_plan(&builder.registry().borrow(), &encoder)
        .unwrap()
        .plan_hash()
        .unwrap();

    assert_ne!(first_hash, second_hash);
}
