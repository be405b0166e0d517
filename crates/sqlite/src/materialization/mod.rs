//! Row materialization: shapes, compiled projectors and their cache

pub mod converter;
pub mod factory;
pub mod projector;
pub mod shape;

pub use converter::{Converter, EnumToStringConverter, ValueConverter};
pub use factory::{ValueBufferFactory, ValueBufferFactoryCache};
pub use projector::Projector;
pub use shape::{Shape, TypeMaterializationInfo};
