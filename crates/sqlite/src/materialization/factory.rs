//! Value buffer factories and the shape-keyed cache that owns them

use super::projector::Projector;
use super::shape::Shape;
use crate::config::MaterializationConfig;
use crate::error::{Error, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use proven_orm_value::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

/// Builds the value buffer for one raw row
#[derive(Debug)]
pub enum ValueBufferFactory {
    /// Columns are read in their natural order
    Direct {
        width: usize,
        projector: Option<Projector>,
    },
    /// Columns are gathered from declared source positions first
    Remapping {
        indices: Vec<usize>,
        projector: Option<Projector>,
    },
}

impl ValueBufferFactory {
    pub fn compile(shape: &Shape) -> Self {
        let projector = Projector::compile(shape);
        if shape.requires_remapping() {
            ValueBufferFactory::Remapping {
                indices: shape.source_indices(),
                projector,
            }
        } else {
            ValueBufferFactory::Direct {
                width: shape.len(),
                projector,
            }
        }
    }

    /// The compiled projector, `None` for the pass-through
    pub fn projector(&self) -> Option<&Projector> {
        match self {
            ValueBufferFactory::Direct { projector, .. }
            | ValueBufferFactory::Remapping { projector, .. } => projector.as_ref(),
        }
    }

    pub fn is_remapping(&self) -> bool {
        matches!(self, ValueBufferFactory::Remapping { .. })
    }

    /// Create a materialized value buffer from a raw row
    pub fn create(&self, row: &[Value]) -> Result<Vec<Value>> {
        let mut buffer = match self {
            ValueBufferFactory::Direct { width, .. } => {
                if row.len() < *width {
                    return Err(Error::InvalidShape(format!(
                        "expected {} columns, row has {}",
                        width,
                        row.len()
                    )));
                }
                row[..*width].to_vec()
            }
            ValueBufferFactory::Remapping { indices, .. } => indices
                .iter()
                .map(|&index| {
                    row.get(index).cloned().ok_or_else(|| {
                        Error::InvalidShape(format!(
                            "source index {} is outside a row of {} columns",
                            index,
                            row.len()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };

        if let Some(projector) = self.projector() {
            projector.apply(&mut buffer)?;
        }
        Ok(buffer)
    }
}

static SHARED: LazyLock<ValueBufferFactoryCache> = LazyLock::new(ValueBufferFactoryCache::new);

/// Shape-keyed cache of compiled value buffer factories.
///
/// Safe to share across threads. Concurrent misses on the same shape may
/// each compile, but only the first insert is kept and every caller gets
/// that instance. Entries are never evicted.
#[derive(Debug)]
pub struct ValueBufferFactoryCache {
    cache: DashMap<Shape, Arc<ValueBufferFactory>>,
    config: MaterializationConfig,
    threshold_warned: AtomicBool,
}

impl ValueBufferFactoryCache {
    pub fn new() -> Self {
        Self::with_config(MaterializationConfig::default())
    }

    pub fn with_config(config: MaterializationConfig) -> Self {
        Self {
            cache: DashMap::new(),
            config,
            threshold_warned: AtomicBool::new(false),
        }
    }

    /// Process-wide cache
    pub fn global() -> &'static ValueBufferFactoryCache {
        &SHARED
    }

    /// Get the factory for a shape, compiling it on first use
    pub fn create(&self, shape: &Shape) -> Arc<ValueBufferFactory> {
        if let Some(factory) = self.cache.get(shape) {
            return Arc::clone(factory.value());
        }

        // Compile outside any shard lock
        let compiled = Arc::new(ValueBufferFactory::compile(shape));

        let (factory, inserted) = match self.cache.entry(shape.clone()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&compiled));
                (compiled, true)
            }
        };

        if inserted {
            let shapes = self.cache.len();
            tracing::debug!(
                columns = shape.len(),
                remapping = factory.is_remapping(),
                converted = factory.projector().map_or(0, Projector::len),
                shapes,
                "Compiled value buffer factory"
            );
            // Concurrent inserts may skip past the exact count; warn once.
            if shapes >= self.config.shape_warning_threshold
                && !self.threshold_warned.swap(true, Ordering::Relaxed)
            {
                tracing::warn!(
                    shapes,
                    "Value buffer factory cache reached its warning threshold"
                );
            }
        }

        factory
    }

    /// The projector for a shape, `None` for the pass-through
    pub fn get_projector(&self, shape: &Shape) -> Option<Projector> {
        self.create(shape).projector().cloned()
    }

    /// Whether the shape count has reached the warning threshold
    pub fn threshold_reached(&self) -> bool {
        self.threshold_warned.load(Ordering::Relaxed)
    }

    pub fn contains(&self, shape: &Shape) -> bool {
        self.cache.contains_key(shape)
    }

    /// Number of distinct shapes compiled
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for ValueBufferFactoryCache {
    fn default() -> Self {
        Self::new()
    }
}
