//! Value buffer materialization tests

mod common;

use proven_orm_sqlite::{
    Converter, DataType, EnumType, Error, Shape, TypeMaterializationInfo, Value,
    ValueBufferFactoryCache,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn order_status() -> EnumType {
    EnumType::new("OrderStatus", DataType::I32)
        .variant("Pending", 0)
        .variant("Shipped", 1)
        .variant("Delivered", 2)
}

fn cents_converter(calls: Arc<AtomicUsize>) -> Converter {
    Converter::from_fns(
        "CentsToDecimal",
        DataType::Decimal,
        DataType::I64,
        move |value| {
            calls.fetch_add(1, Ordering::SeqCst);
            match value {
                Value::I64(cents) => Ok(Value::Decimal(rust_decimal::Decimal::new(cents, 2))),
                other => Err(Error::TypeMismatch {
                    expected: "INTEGER".into(),
                    found: other.type_name().into(),
                }),
            }
        },
        Ok,
    )
}

fn order_shape(converter: Converter) -> Shape {
    Shape::new(vec![
        TypeMaterializationInfo::new(DataType::I64),
        TypeMaterializationInfo::new(DataType::Enum(order_status())),
        TypeMaterializationInfo::new(DataType::Decimal.nullable()).with_converter(converter),
    ])
}

#[test]
fn test_structurally_equal_shapes_give_identical_output() {
    let cache = ValueBufferFactoryCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let first = order_shape(cents_converter(calls.clone()));
    let second = order_shape(cents_converter(calls.clone()));

    let row = vec![Value::I64(10), Value::I64(1), Value::I64(1999)];
    let a = cache.create(&first).create(&row).unwrap();
    let b = cache.create(&second).create(&row).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        a,
        vec![
            Value::I64(10),
            Value::enumeration("OrderStatus", 1),
            Value::Decimal(rust_decimal::Decimal::new(1999, 2)),
        ]
    );
    assert_eq!(cache.len(), 1);

    let projector_a = cache.get_projector(&first).unwrap();
    let projector_b = cache.get_projector(&second).unwrap();
    assert!(projector_a.ptr_eq(&projector_b));
}

#[test]
fn test_plain_shape_is_pass_through() {
    let cache = ValueBufferFactoryCache::new();
    let shape = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::I64),
        TypeMaterializationInfo::new(DataType::Text.nullable()),
        TypeMaterializationInfo::new(DataType::Timestamp),
    ]);
    assert!(cache.get_projector(&shape).is_none());

    let row = vec![Value::I64(1), Value::Null, Value::string("2021-01-01 00:00:00")];
    assert_eq!(cache.create(&shape).create(&row).unwrap(), row);
}

#[test]
fn test_null_never_reaches_converter() {
    let cache = ValueBufferFactoryCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let shape = order_shape(cents_converter(calls.clone()));

    let values = cache
        .create(&shape)
        .create(&[Value::I64(1), Value::Null, Value::Null])
        .unwrap();
    assert_eq!(values, vec![Value::I64(1), Value::Null, Value::Null]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    cache
        .create(&shape)
        .create(&[Value::I64(1), Value::I64(0), Value::I64(5)])
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_null_skips_converter_with_nullable_store_type() {
    let cache = ValueBufferFactoryCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let converter = Converter::from_fns(
        "NullableCentsToDecimal",
        DataType::Decimal.nullable(),
        DataType::I64.nullable(),
        move |value| {
            counted.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        },
        Ok,
    );
    let shape = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::Decimal.nullable()).with_converter(converter),
    ]);

    let values = cache.create(&shape).create(&[Value::Null]).unwrap();
    assert_eq!(values, vec![Value::Null]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_enum_values_map_to_variants() {
    let cache = ValueBufferFactoryCache::new();
    let status = order_status();
    let shape = Shape::new(vec![TypeMaterializationInfo::new(DataType::Enum(status.clone()))]);
    let factory = cache.create(&shape);

    for (name, value) in &status.variants {
        // SQLite returns INTEGER columns as 64-bit values
        let projected = factory.create(&[Value::I64(*value)]).unwrap();
        assert_eq!(projected, vec![Value::enumeration("OrderStatus", *value)]);
        assert_eq!(status.variant_name(*value), Some(name.as_str()));
    }

    // Out of range for the underlying i32
    assert!(matches!(
        factory.create(&[Value::I64(i64::MAX)]),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_enum_stored_as_text() {
    let cache = ValueBufferFactoryCache::new();
    let shape = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::Enum(order_status()))
            .with_converter(Converter::enum_to_string(order_status())),
    ]);
    assert_eq!(
        cache.create(&shape).create(&[Value::string("Delivered")]).unwrap(),
        vec![Value::enumeration("OrderStatus", 2)]
    );
    assert!(matches!(
        cache.create(&shape).create(&[Value::string("Lost")]),
        Err(Error::Conversion { converter, .. }) if converter == "EnumToString<OrderStatus>"
    ));
}

#[test]
fn test_remapping_reads_declared_indices_in_shape_order() {
    let cache = ValueBufferFactoryCache::new();
    let shape = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::Enum(order_status())).with_index(3),
        TypeMaterializationInfo::new(DataType::Text).with_index(0),
        TypeMaterializationInfo::new(DataType::I64).with_index(2),
    ]);
    let factory = cache.create(&shape);
    assert!(factory.is_remapping());

    let row = vec![
        Value::string("ALFKI"),
        Value::string("ignored"),
        Value::I64(10248),
        Value::I64(2),
    ];
    assert_eq!(
        factory.create(&row).unwrap(),
        vec![
            Value::enumeration("OrderStatus", 2),
            Value::string("ALFKI"),
            Value::I64(10248),
        ]
    );
}

#[test]
fn test_shapes_differing_only_in_index_are_distinct() {
    let cache = ValueBufferFactoryCache::new();
    let natural = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::I64),
        TypeMaterializationInfo::new(DataType::I64),
    ]);
    let swapped = Shape::new(vec![
        TypeMaterializationInfo::new(DataType::I64).with_index(1),
        TypeMaterializationInfo::new(DataType::I64).with_index(0),
    ]);

    let row = [Value::I64(1), Value::I64(2)];
    assert_eq!(cache.create(&natural).create(&row).unwrap(), row.to_vec());
    assert_eq!(
        cache.create(&swapped).create(&row).unwrap(),
        vec![Value::I64(2), Value::I64(1)]
    );
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_compiler_materializes_rows() {
    let compiler = common::setup_test();
    let shape = Shape::new(vec![TypeMaterializationInfo::new(DataType::Enum(order_status()))]);
    let rows = vec![vec![Value::I64(0)], vec![Value::Null]];
    assert_eq!(
        compiler.materialize(&shape, &rows).unwrap(),
        vec![vec![Value::enumeration("OrderStatus", 0)], vec![Value::Null]]
    );
}
