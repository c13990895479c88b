mod common;

use pretty_assertions::assert_eq;
use static_assertions::{assert_impl_all, const_assert};

use common::*;
use shader_layout::{
    catalog::{matrix_name, vector_name},
    DataType, Key, Len, ScalarType, TypeCatalog, TypeHint,
};

assert_impl_all!(DataType: Copy, Eq, std::hash::Hash, Send, Sync);
assert_impl_all!(Key<shader_layout::CompositeType>: Copy, Eq, std::hash::Hash);
assert_impl_all!(TypeCatalog: Send, Sync);
const_assert!(std::mem::size_of::<DataType>() <= 16);

#[test]
fn vector_and_matrix_layouts() {
    init_logging();
    let catalog = TypeCatalog::default();
    let size_align = |name: &str| {
        let c = catalog.composite(catalog.find_type(name).unwrap()).unwrap();
        (c.linear_size().unwrap(), c.linear_alignment().unwrap())
    };

    assert_eq!(size_align("float2"), (8, 8));
    assert_eq!(size_align("float3"), (12, 16));
    assert_eq!(size_align("float4"), (16, 16));
    assert_eq!(size_align("int3"), (12, 16));
    assert_eq!(size_align("float4x4"), (64, 16));
    // 3 columns of `float3`
    assert_eq!(size_align("float3x3"), (48, 16));
    // 4 columns of `float2`
    assert_eq!(size_align("float2x4"), (32, 16));
}

#[test]
fn matrix_columns_are_vectors() {
    let catalog = TypeCatalog::default();
    let mat = catalog.find_type("float4x4").unwrap();
    assert_eq!(member_layouts(&catalog, mat), vec![
        (0, 16, 16),
        (16, 16, 16),
        (32, 16, 16),
        (48, 16, 16)
    ]);
    let mat = catalog.composite(mat).unwrap();
    assert_eq!(mat.type_hint(), TypeHint::MatrixType);
    assert_eq!(mat.member_type(0), catalog.find_type("float4"));
}

#[test]
fn every_shape_is_registered() {
    let catalog = TypeCatalog::default();
    let mut count = 0;
    for scalar in ScalarType::ALL {
        for len in [Len::X2, Len::X3, Len::X4] {
            assert!(catalog.find_composite(&vector_name(scalar, len)).is_some());
            for columns in [Len::X2, Len::X3, Len::X4] {
                assert!(catalog.find_composite(&matrix_name(scalar, len, columns)).is_some());
                count += 1;
            }
            count += 1;
        }
    }
    assert_eq!(count, 48);
    assert_eq!(catalog.composites().count(), 48);
    assert_eq!(catalog.user_composites().count(), 0);
    assert!(catalog.composites().all(|(_, c)| c.is_laid_out()));
}

#[test]
fn scalar_shapes_resolve_to_builtins() {
    let catalog = TypeCatalog::default();
    assert_eq!(
        catalog.canonicalize(DataType::Scalar(ScalarType::Float, Len::X4, Len::X1)),
        catalog.find_type("float4").unwrap()
    );
    assert_eq!(&*catalog.type_name(DataType::Scalar(ScalarType::Float, Len::X2, Len::X3)), "float3x2");
    assert_eq!(&*catalog.type_name(DataType::scalar(ScalarType::Bool)), "bool");
    assert_eq!(catalog.scalar_component_count(catalog.find_type("uint3x2").unwrap()), 6);
}
