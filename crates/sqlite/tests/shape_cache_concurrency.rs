//! Concurrent access to the value buffer factory cache

use proven_orm_sqlite::{
    Converter, DataType, EnumType, MaterializationConfig, Shape, TypeMaterializationInfo, Value,
    ValueBufferFactoryCache,
};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

fn shape() -> Shape {
    let priority = EnumType::new("Priority", DataType::I16)
        .variant("Low", 0)
        .variant("High", 1);
    Shape::new(vec![
        TypeMaterializationInfo::new(DataType::Enum(priority.clone())).with_index(1),
        TypeMaterializationInfo::new(DataType::Enum(priority.clone()))
            .with_converter(Converter::enum_to_string(priority))
            .with_index(0),
    ])
}

#[test]
fn test_concurrent_misses_converge_on_one_entry() {
    let cache = ValueBufferFactoryCache::new();
    let barrier = Barrier::new(THREADS);
    let row = vec![Value::string("High"), Value::I64(0)];

    let factories: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    // Each thread builds its own, structurally equal shape
                    let shape = shape();
                    barrier.wait();
                    let factory = cache.create(&shape);
                    let values = factory.create(&row).unwrap();
                    (factory, values)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(cache.len(), 1);
    let (first, first_values) = &factories[0];
    assert_eq!(
        first_values,
        &vec![
            Value::enumeration("Priority", 0),
            Value::enumeration("Priority", 1),
        ]
    );
    for (factory, values) in &factories {
        assert!(Arc::ptr_eq(first, factory));
        assert_eq!(values, first_values);
    }
}

#[test]
fn test_distinct_shapes_from_many_threads() {
    let cache = ValueBufferFactoryCache::new();

    thread::scope(|s| {
        for width in 1..=THREADS {
            let cache = &cache;
            s.spawn(move || {
                let shape = Shape::new(vec![TypeMaterializationInfo::new(DataType::I64); width]);
                for _ in 0..100 {
                    cache.create(&shape);
                }
            });
        }
    });

    assert_eq!(cache.len(), THREADS);
}

#[test]
fn test_threshold_flag_survives_concurrent_inserts() {
    let cache = ValueBufferFactoryCache::with_config(MaterializationConfig {
        shape_warning_threshold: 4,
    });
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for width in 1..=THREADS {
            let cache = &cache;
            let barrier = &barrier;
            s.spawn(move || {
                let shape = Shape::new(vec![TypeMaterializationInfo::new(DataType::I64); width]);
                barrier.wait();
                cache.create(&shape);
            });
        }
    });

    assert_eq!(cache.len(), THREADS);
    assert!(cache.threshold_reached());
}
