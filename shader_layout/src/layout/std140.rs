use crate::{
    error::TypeWarning,
    ir::{CompositeLayout, DataFormat, DataType, Len, MemberDecl, MemberLayout, TypeHint},
};

use super::*;

/// size, alignment and format of one member (or array element)
struct Element {
    size: u64,
    align: u64,
    format: Option<DataFormat>,
}

impl Packer<'_> {
    /// std140, or std430 with `relaxed` rounding of arrays and nested structs.
    pub(super) fn pack_std(mut self, relaxed: bool) -> PackOutcome {
        let composite = self.composite;
        let mut calc = LayoutCalculator::new(self.catalog.settings.max_custom_offset);
        let mut members = Vec::with_capacity(composite.member_count());

        for member in composite.members() {
            self.reject_conflicting_attributes(member);
            self.ignore_format_attributes(member);
            let Some(element) = self.std_element(member, relaxed) else {
                continue;
            };

            let (size, align, array_count, array_stride) = match member.array_len {
                None => (element.size, element.align, 0, 0),
                Some(len) => {
                    let (align, stride) = match relaxed {
                        true => (element.align, stride_of_array(element.align, element.size)),
                        false => (
                            element.align.max(VEC4_ALIGN),
                            stride_of_array(VEC4_ALIGN, element.size),
                        ),
                    };
                    let size = stride.and_then(|stride| stride.checked_mul(len.get() as u64));
                    let (Some(stride), Some(size)) = (stride, size) else {
                        self.too_large(member);
                        continue;
                    };
                    (size, align, len.get(), stride)
                }
            };

            let Some(offset) = self.place(&mut calc, member, size, align) else {
                continue;
            };
            log::trace!(
                "{}.{}: offset {offset}, size {size}, align {align}",
                composite.name(),
                member.name
            );
            members.push(MemberLayout {
                offset,
                size,
                alignment: align,
                format: element.format,
                array_count,
                array_stride,
            });
        }

        let rounded_end = round_up(calc.max_align(), calc.end());
        let (linear_size, linear_alignment) = match (composite.type_hint(), rounded_end) {
            (TypeHint::VectorType, _) => (calc.end(), vector_align(calc.end())),
            (TypeHint::MatrixType, Some(size)) => (size, vector_align(size)),
            (TypeHint::User, Some(size)) => (size, calc.max_align()),
            (_, None) => {
                if let Some(last) = composite.members().last() {
                    self.too_large(last);
                }
                return PackOutcome::Failed;
            }
        };
        self.finish(CompositeLayout {
            linear_size,
            linear_alignment,
            members,
        })
    }

    /// std140 and std430 member formats are always inferred
    fn ignore_format_attributes(&mut self, member: &MemberDecl) {
        for attribute in member.attributes.iter() {
            if matches!(&*attribute.key, "format" | "layout") {
                self.warning(
                    TypeWarning::IgnoredMemberAttribute {
                        composite: self.name(),
                        member: member.name.clone(),
                        attribute: attribute.key.clone(),
                        rule: self.composite.packing_rule(),
                    },
                    member.location,
                );
            }
        }
    }

    fn std_element(&mut self, member: &MemberDecl, relaxed: bool) -> Option<Element> {
        match member.ty {
            DataType::Scalar(scalar, _, _) => Some(Element {
                size: scalar.byte_size(),
                align: scalar.byte_size(),
                format: DataFormat::for_vector(scalar, Len::X1),
            }),
            DataType::Composite(_) => {
                let nested = self.nested(member.ty, member.location)?;
                let Some(layout) = nested.layout() else {
                    // only reachable if the dependency check was skipped
                    self.error(
                        LayoutError::UnresolvedDependency {
                            composite: self.name(),
                            dependency: nested.name().clone(),
                        },
                        member.location,
                    );
                    return None;
                };
                Some(match nested.type_hint() {
                    TypeHint::VectorType | TypeHint::MatrixType => Element {
                        size: layout.linear_size,
                        align: vector_align(layout.linear_size),
                        format: vector_format(nested),
                    },
                    TypeHint::User => {
                        let align = match relaxed {
                            true => layout.linear_alignment,
                            false => layout.linear_alignment.max(VEC4_ALIGN),
                        };
                        let Some(size) = round_up(align, layout.linear_size) else {
                            self.too_large(member);
                            return None;
                        };
                        Element {
                            size,
                            align,
                            format: None,
                        }
                    }
                })
            }
            DataType::Resource(_) => {
                self.error(
                    LayoutError::ResourceMemberNotAllowedInComposite {
                        composite: self.name(),
                        member: member.name.clone(),
                    },
                    member.location,
                );
                None
            }
            DataType::Invalid => {
                self.error(CatalogError::UnknownType(member.ty), member.location);
                None
            }
        }
    }

    /// places a member at its `offset=` or the next aligned offset, reporting
    /// invalid explicit offsets and falling back to the aligned offset.
    ///
    /// `None` if the member would end past `u64::MAX`, which is reported too.
    pub(super) fn place(
        &mut self,
        calc: &mut LayoutCalculator,
        member: &MemberDecl,
        size: u64,
        align: u64,
    ) -> Option<u64> {
        let placed = match member.attributes.get("offset") {
            None => calc.extend(size, align),
            Some(attribute) => {
                let value = attribute.value.clone().unwrap_or_default();
                match calc.extend_at(size, align, &value) {
                    Err(PlacementError::InvalidOffset(reason)) => {
                        self.error(
                            LayoutError::InvalidCustomOffset {
                                composite: self.name(),
                                member: member.name.clone(),
                                value,
                                reason,
                            },
                            member.location,
                        );
                        calc.extend(size, align)
                    }
                    placed => placed,
                }
            }
        };
        match placed {
            Ok(offset) => Some(offset),
            Err(_) => {
                self.too_large(member);
                None
            }
        }
    }
}
