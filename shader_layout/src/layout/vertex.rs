use crate::{
    ir::{CompositeLayout, DataFormat, DataType, Len, MemberDecl, MemberLayout, TypeHint},
    resource::ResourceTypeError,
};

use super::*;

impl Packer<'_> {
    /// every member is a 4 byte aligned vertex attribute whose size is
    /// given by its format.
    pub(super) fn pack_vertex(mut self) -> PackOutcome {
        let composite = self.composite;
        let mut calc = LayoutCalculator::new(self.catalog.settings.max_custom_offset);
        let mut members = Vec::with_capacity(composite.member_count());

        for member in composite.members() {
            self.reject_conflicting_attributes(member);
            if member.array_len.is_some() {
                self.error(
                    LayoutError::ArrayNotAllowedInVertexLayout {
                        composite: self.name(),
                        member: member.name.clone(),
                    },
                    member.location,
                );
                continue;
            }
            let Some(format) = self.vertex_format(member) else {
                continue;
            };

            let size = format.byte_size();
            let Some(offset) = self.place(&mut calc, member, size, VERTEX_ALIGN) else {
                continue;
            };
            log::trace!(
                "{}.{}: offset {offset}, format {format}",
                composite.name(),
                member.name
            );
            members.push(MemberLayout {
                offset,
                size,
                alignment: VERTEX_ALIGN,
                format: Some(format),
                array_count: 0,
                array_stride: 0,
            });
        }

        let Some(linear_size) = round_up(VERTEX_ALIGN, calc.end()) else {
            if let Some(last) = composite.members().last() {
                self.too_large(last);
            }
            return PackOutcome::Failed;
        };
        self.finish(CompositeLayout {
            linear_size,
            linear_alignment: VERTEX_ALIGN,
            members,
        })
    }

    /// the format inferred from the member type, or the one named by `format=`
    fn vertex_format(&mut self, member: &MemberDecl) -> Option<DataFormat> {
        let inferred = match member.ty {
            DataType::Scalar(scalar, _, _) => DataFormat::for_vector(scalar, Len::X1),
            DataType::Composite(_) => {
                let nested = self.nested(member.ty, member.location)?;
                match nested.type_hint() {
                    TypeHint::VectorType => vector_format(nested),
                    TypeHint::MatrixType | TypeHint::User => return self.unpackable(member),
                }
            }
            DataType::Resource(_) => {
                self.error(
                    LayoutError::ResourceMemberNotAllowedInComposite {
                        composite: self.name(),
                        member: member.name.clone(),
                    },
                    member.location,
                );
                return None;
            }
            DataType::Invalid => {
                self.error(CatalogError::UnknownType(member.ty), member.location);
                return None;
            }
        };

        let Some(attribute) = member.attributes.get("format") else {
            return inferred.or_else(|| self.unpackable(member));
        };
        let name = attribute.value.clone().unwrap_or_default();
        let Some(format) = DataFormat::from_name(&name) else {
            self.error(ResourceTypeError::UnknownFormat(name), member.location);
            return None;
        };
        if !format.is_buffer_legal() {
            self.error(
                LayoutError::FormatNotUsableAsVertexAttribute {
                    composite: self.name(),
                    member: member.name.clone(),
                    format,
                },
                member.location,
            );
            return None;
        }
        Some(format)
    }

    fn unpackable(&mut self, member: &MemberDecl) -> Option<DataFormat> {
        self.error(
            LayoutError::UnpackableMemberType {
                composite: self.name(),
                member: member.name.clone(),
                ty: self.catalog.type_name(member.ty),
                rule: self.composite.packing_rule(),
            },
            member.location,
        );
        None
    }
}
