use crate::{
    ir::{CompositeType, DataType, Len, MemberDecl, PackingRule, ScalarType, TypeHint},
    Diagnostics, ErrorReporter,
};

use super::TypeCatalog;

/// `float3`, `int2`, ...
pub fn vector_name(scalar: ScalarType, len: Len) -> String { format!("{scalar}{len}") }

/// `float4x4`, `uint2x3`, ... for a matrix of `columns` columns of `rows` components each
pub fn matrix_name(scalar: ScalarType, rows: Len, columns: Len) -> String { format!("{scalar}{rows}x{columns}") }

const VECTOR_LENS: [Len; 3] = [Len::X2, Len::X3, Len::X4];

impl TypeCatalog {
    /// registers the vectors `{scalar}{2..4}` and matrices `{scalar}{2..4}x{2..4}`
    /// of every scalar type and packs them like any other composite.
    pub(super) fn register_builtins(&mut self) {
        for scalar in ScalarType::ALL {
            for len in VECTOR_LENS {
                let vector = CompositeType::new(vector_name(scalar, len), PackingRule::Std140, TypeHint::VectorType);
                self.insert_builtin(vector, len.component_names(), DataType::scalar(scalar));
            }
        }
        for scalar in ScalarType::ALL {
            for rows in VECTOR_LENS {
                for columns in VECTOR_LENS {
                    let Some(column) = self.find_composite(&vector_name(scalar, rows)) else {
                        log::error!("builtin vector `{}` is missing", vector_name(scalar, rows));
                        continue;
                    };
                    let matrix = CompositeType::new(
                        matrix_name(scalar, rows, columns),
                        PackingRule::Std140,
                        TypeHint::MatrixType,
                    );
                    self.insert_builtin(matrix, columns.component_names(), column);
                }
            }
        }

        let mut diagnostics = Diagnostics::new();
        match self.compute_all_layouts(&mut diagnostics) {
            Ok(passes) => log::debug!(
                "laid out {} builtin composites in {} pass(es)",
                passes.packed,
                passes.passes
            ),
            Err(e) => log::error!("builtin composites could not be laid out: {e}"),
        }
        debug_assert!(!diagnostics.has_errors(), "{:?}", diagnostics.errors());
    }

    fn insert_builtin(&mut self, composite: CompositeType, member_names: &'static [&'static str], member_ty: DataType) {
        let result = self.register_composite(composite).and_then(|ty| {
            member_names
                .iter()
                .try_for_each(|name| self.add_member(ty, MemberDecl::new(*name, member_ty)))
        });
        if let Err(e) = result {
            log::error!("failed to register builtin type: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Settings;

    #[test]
    fn builtin_names() {
        assert_eq!(vector_name(ScalarType::Float, Len::X3), "float3");
        assert_eq!(matrix_name(ScalarType::Uint, Len::X2, Len::X4), "uint2x4");
    }

    #[test]
    fn every_builtin_is_laid_out() {
        let catalog = TypeCatalog::new(Settings::default());
        let builtins: Vec<_> = catalog
            .composites()
            .filter(|(_, c)| c.type_hint() != TypeHint::User)
            .collect();
        // 4 scalar types, 3 vectors and 9 matrices each
        assert_eq!(builtins.len(), 4 * (3 + 9));
        for (_, composite) in builtins {
            assert!(composite.is_laid_out(), "{}", composite.name());
        }
    }
}
