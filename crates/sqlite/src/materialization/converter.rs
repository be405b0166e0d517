//! Custom value conversions between store and model representations

use crate::error::{Error, Result};
use crate::types::{DataType, EnumType};
use proven_orm_value::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// A bidirectional conversion between a model type and the type stored in
/// the database. Converters never see the null sentinel.
pub trait ValueConverter: Send + Sync {
    /// Identifies the conversion; converters with equal names and types are
    /// interchangeable.
    fn name(&self) -> &str;

    fn model_type(&self) -> &DataType;

    /// Store-side representation; nullable if the store column is
    fn store_type(&self) -> &DataType;

    fn from_store(&self, value: Value) -> Result<Value>;

    fn to_store(&self, value: Value) -> Result<Value>;
}

/// Shared handle to a converter, compared by name and declared types
#[derive(Clone)]
pub struct Converter(Arc<dyn ValueConverter>);

impl Converter {
    pub fn new(converter: impl ValueConverter + 'static) -> Self {
        Self(Arc::new(converter))
    }

    /// Build a converter from a pair of closures
    pub fn from_fns<F, T>(
        name: impl Into<String>,
        model_type: DataType,
        store_type: DataType,
        from_store: F,
        to_store: T,
    ) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
        T: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new(FnConverter {
            name: name.into(),
            model_type,
            store_type,
            from_store: Box::new(from_store),
            to_store: Box::new(to_store),
        })
    }

    /// Stores an enum by variant name
    pub fn enum_to_string(enum_type: EnumType) -> Self {
        Self::new(EnumToStringConverter::new(enum_type))
    }
}

impl Deref for Converter {
    type Target = dyn ValueConverter;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.name() == other.name()
                && self.model_type() == other.model_type()
                && self.store_type() == other.store_type())
    }
}

impl Eq for Converter {}

impl Hash for Converter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.model_type().hash(state);
        self.store_type().hash(state);
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converter({}: {} <-> {})",
            self.name(),
            self.model_type(),
            self.store_type()
        )
    }
}

type ConvertFn = Box<dyn Fn(Value) -> Result<Value> + Send + Sync>;

struct FnConverter {
    name: String,
    model_type: DataType,
    store_type: DataType,
    from_store: ConvertFn,
    to_store: ConvertFn,
}

impl ValueConverter for FnConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_type(&self) -> &DataType {
        &self.model_type
    }

    fn store_type(&self) -> &DataType {
        &self.store_type
    }

    fn from_store(&self, value: Value) -> Result<Value> {
        (self.from_store)(value)
    }

    fn to_store(&self, value: Value) -> Result<Value> {
        (self.to_store)(value)
    }
}

/// Stores enum values as their variant names
pub struct EnumToStringConverter {
    name: String,
    enum_type: EnumType,
    model_type: DataType,
}

impl EnumToStringConverter {
    pub fn new(enum_type: EnumType) -> Self {
        Self {
            name: format!("EnumToString<{}>", enum_type.name),
            model_type: DataType::Enum(enum_type.clone()),
            enum_type,
        }
    }
}

impl ValueConverter for EnumToStringConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn model_type(&self) -> &DataType {
        &self.model_type
    }

    fn store_type(&self) -> &DataType {
        &DataType::Text
    }

    fn from_store(&self, value: Value) -> Result<Value> {
        let name = value.as_str().ok_or_else(|| Error::TypeMismatch {
            expected: "TEXT".into(),
            found: value.type_name().into(),
        })?;
        self.enum_type
            .variant_value(name)
            .map(|v| Value::enumeration(self.enum_type.name.clone(), v))
            .ok_or_else(|| {
                Error::InvalidValue(format!("'{}' is not a {} variant", name, self.enum_type.name))
            })
    }

    fn to_store(&self, value: Value) -> Result<Value> {
        match &value {
            Value::Enum(e) if e.type_name == self.enum_type.name => self
                .enum_type
                .variant_name(e.value)
                .map(Value::string)
                .ok_or_else(|| {
                    Error::InvalidValue(format!("{} has no variant {}", e.type_name, e.value))
                }),
            _ => Err(Error::TypeMismatch {
                expected: self.enum_type.name.clone(),
                found: value.type_name().into(),
            }),
        }
    }
}
