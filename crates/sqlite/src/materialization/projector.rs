//! Compiled per-row conversions

use super::converter::Converter;
use super::shape::Shape;
use crate::coercion::{coerce_value, to_enum};
use crate::error::{Error, Result};
use crate::types::EnumType;
use proven_orm_value::Value;
use std::mem;
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Conversion {
    ToEnum(EnumType),
    ViaConverter(Converter),
}

impl Conversion {
    /// Null stays null: neither path sees the sentinel.
    fn apply(&self, raw: Value) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }

        match self {
            Conversion::ToEnum(enum_type) => to_enum(raw, enum_type),
            Conversion::ViaConverter(converter) => {
                let stored = coerce_value(raw, converter.store_type())?;
                converter
                    .from_store(stored)
                    .map_err(|e| Error::Conversion {
                        converter: converter.name().to_string(),
                        message: e.to_string(),
                    })
            }
        }
    }
}

#[derive(Clone, Debug)]
struct ConversionStep {
    position: usize,
    conversion: Conversion,
}

/// Rewrites a value buffer in place, one step per converted position.
/// Positions without a step pass through untouched.
#[derive(Clone, Debug)]
pub struct Projector {
    steps: Arc<[ConversionStep]>,
}

impl Projector {
    /// Compile the projector for a shape, or `None` when no position needs
    /// conversion
    pub fn compile(shape: &Shape) -> Option<Projector> {
        let steps: Vec<ConversionStep> = shape
            .iter()
            .enumerate()
            .filter_map(|(position, info)| {
                let conversion = match (&info.converter, info.model_type.as_enum()) {
                    (Some(converter), _) => Conversion::ViaConverter(converter.clone()),
                    (None, Some(enum_type)) => Conversion::ToEnum(enum_type.clone()),
                    (None, None) => return None,
                };
                Some(ConversionStep {
                    position,
                    conversion,
                })
            })
            .collect();

        if steps.is_empty() {
            None
        } else {
            Some(Projector {
                steps: steps.into(),
            })
        }
    }

    /// Apply every step to the buffer
    pub fn apply(&self, buffer: &mut [Value]) -> Result<()> {
        let width = buffer.len();
        for step in self.steps.iter() {
            let slot = buffer.get_mut(step.position).ok_or_else(|| {
                Error::InvalidShape(format!(
                    "position {} is outside a buffer of {} values",
                    step.position, width
                ))
            })?;
            let raw = mem::take(slot);
            *slot = step.conversion.apply(raw)?;
        }
        Ok(())
    }

    /// Number of converted positions
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether both handles refer to the same compiled projector
    pub fn ptr_eq(&self, other: &Projector) -> bool {
        Arc::ptr_eq(&self.steps, &other.steps)
    }
}
