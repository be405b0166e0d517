//! Result shapes: ordered per-column materialization descriptors

use super::converter::Converter;
use crate::types::DataType;
use std::sync::Arc;

/// How one result column is materialized
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeMaterializationInfo {
    /// Destination model type
    pub model_type: DataType,
    /// Optional custom conversion from the store representation
    pub converter: Option<Converter>,
    /// Position in the raw row to read from; `None` reads the column's own
    /// position
    pub index: Option<usize>,
}

impl TypeMaterializationInfo {
    pub fn new(model_type: DataType) -> Self {
        Self {
            model_type,
            converter: None,
            index: None,
        }
    }

    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Ordered descriptors of one result row. Equal shapes share one compiled
/// value buffer factory, whoever builds them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shape(Arc<[TypeMaterializationInfo]>);

impl Shape {
    pub fn new(columns: Vec<TypeMaterializationInfo>) -> Self {
        Self(columns.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeMaterializationInfo> {
        self.0.iter()
    }

    /// Whether any column reads from a position other than its own
    pub fn requires_remapping(&self) -> bool {
        self.0
            .iter()
            .enumerate()
            .any(|(position, info)| info.index.is_some_and(|index| index != position))
    }

    /// Raw row position each column reads from
    pub fn source_indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .map(|(position, info)| info.index.unwrap_or(position))
            .collect()
    }
}

impl FromIterator<TypeMaterializationInfo> for Shape {
    fn from_iter<I: IntoIterator<Item = TypeMaterializationInfo>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_indices_do_not_require_remapping() {
        let shape = Shape::new(vec![
            TypeMaterializationInfo::new(DataType::I32).with_index(0),
            TypeMaterializationInfo::new(DataType::Text),
        ]);
        assert!(!shape.requires_remapping());
        assert_eq!(shape.source_indices(), vec![0, 1]);
    }

    #[test]
    fn test_reordered_indices_require_remapping() {
        let shape: Shape = [
            TypeMaterializationInfo::new(DataType::I32).with_index(2),
            TypeMaterializationInfo::new(DataType::Text),
        ]
        .into_iter()
        .collect();
        assert!(shape.requires_remapping());
        assert_eq!(shape.source_indices(), vec![2, 1]);
    }
}
