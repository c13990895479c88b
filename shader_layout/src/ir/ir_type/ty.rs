use crate::common::pool::Key;

use super::{CompositeType, Len, ResourceType, ScalarType};

/// handle to a type known to a [`crate::TypeCatalog`].
///
/// a small `Copy` value that never owns anything. Composites and resources
/// live in the catalog's arenas and are referred to by key, so two
/// `DataType`s are the same type exactly if they compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// `Scalar(kind, vector_width, matrix_rows)`
    ///
    /// `Scalar(kind, X1, X1)` is a plain scalar. Wider values describe a
    /// vector (`matrix_rows == X1`) or a matrix with `matrix_rows` rows of
    /// `vector_width` components, they are canonicalized to the builtin
    /// vector/matrix composites by [`crate::TypeCatalog::canonicalize`].
    Scalar(ScalarType, Len, Len),
    /// a struct, builtin vector or builtin matrix
    Composite(Key<CompositeType>),
    /// a texture, buffer, constant buffer or sampler
    Resource(Key<ResourceType>),
    /// the sentinel returned by constructions that failed and reported an error
    #[default]
    Invalid,
}

impl DataType {
    /// a single component scalar of kind `kind`
    pub const fn scalar(kind: ScalarType) -> Self { DataType::Scalar(kind, Len::X1, Len::X1) }

    pub fn is_scalar(&self) -> bool { matches!(self, DataType::Scalar(..)) }

    pub fn is_composite(&self) -> bool { matches!(self, DataType::Composite(_)) }

    pub fn is_resource(&self) -> bool { matches!(self, DataType::Resource(_)) }

    pub fn is_valid(&self) -> bool { !matches!(self, DataType::Invalid) }

    pub fn as_composite(&self) -> Option<Key<CompositeType>> {
        match self {
            DataType::Composite(key) => Some(*key),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<Key<ResourceType>> {
        match self {
            DataType::Resource(key) => Some(*key),
            _ => None,
        }
    }
}
