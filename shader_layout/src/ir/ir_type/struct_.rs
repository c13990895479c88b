use std::{fmt::Display, num::NonZeroU32, str::FromStr};

use crate::{
    catalog::CatalogError,
    common::{crc64::Crc64, prettify::UnwrapOrStr},
    ir::{AttributeList, SourceLocation},
};

use super::{CanonName, DataFormat, DataType};

/// the memory layout rules a composite is packed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackingRule {
    /// vertex attribute structs: every member is a 4 byte aligned attribute
    Vertex,
    /// OpenGL std140 (uniform blocks)
    Std140,
    /// OpenGL std430 (storage blocks)
    Std430,
}

impl PackingRule {
    pub const fn name(self) -> &'static str {
        match self {
            PackingRule::Vertex => "vertex",
            PackingRule::Std140 => "std140",
            PackingRule::Std430 => "std430",
        }
    }
}

impl Display for PackingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}

impl FromStr for PackingRule {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [PackingRule::Vertex, PackingRule::Std140, PackingRule::Std430]
            .into_iter()
            .find(|rule| rule.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownPackingRule(s.to_string()))
    }
}

/// what a composite was declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    /// a struct written by the user
    User,
    /// a builtin vector, synthesized as a struct of `x, y, z, w` scalars
    VectorType,
    /// a builtin matrix, synthesized as a struct of column vectors
    MatrixType,
}

/// a member declaration as produced by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: CanonName,
    pub ty: DataType,
    /// `Some(n)` for `ty name[n]`
    pub array_len: Option<NonZeroU32>,
    pub attributes: AttributeList,
    pub location: Option<SourceLocation>,
    /// initializer tokens, carried along for the code generator, never examined here
    pub initializer_tokens: Vec<CanonName>,
}

impl MemberDecl {
    pub fn new(name: impl Into<CanonName>, ty: DataType) -> Self {
        Self {
            name: name.into(),
            ty,
            array_len: None,
            attributes: AttributeList::new(),
            location: None,
            initializer_tokens: Vec::new(),
        }
    }

    /// makes this member an array of `len` elements of its type
    pub fn array(mut self, len: NonZeroU32) -> Self {
        self.array_len = Some(len);
        self
    }

    pub fn attribute(mut self, attribute: crate::ir::Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// where the packer put a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberLayout {
    /// byte offset from the start of the owning composite
    pub offset: u64,
    /// byte size, for arrays the size of all elements including their padding
    pub size: u64,
    pub alignment: u64,
    /// the format of a scalar or vector member (or of one array element)
    pub format: Option<DataFormat>,
    /// number of array elements, `0` if the member is not an array
    pub array_count: u32,
    /// distance between array elements, `0` if the member is not an array
    pub array_stride: u64,
}

/// the packed representation of a composite
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeLayout {
    pub linear_size: u64,
    pub linear_alignment: u64,
    /// one entry per member, in declaration order
    pub members: Vec<MemberLayout>,
}

/// a struct, builtin vector or builtin matrix.
///
/// the declaration (name, packing rule, hint) is fixed at creation, members
/// are appended through [`crate::TypeCatalog::add_member`] until the layout
/// is computed, after which the composite is frozen.
#[derive(Debug, Clone)]
pub struct CompositeType {
    name: CanonName,
    packing_rule: PackingRule,
    hint: TypeHint,
    location: Option<SourceLocation>,
    members: Vec<MemberDecl>,
    hash: Crc64,
    scalar_component_count: u32,
    layout: Option<CompositeLayout>,
}

impl CompositeType {
    pub fn new(name: impl Into<CanonName>, packing_rule: PackingRule, hint: TypeHint) -> Self {
        let name = name.into();
        let mut hash = Crc64::new();
        hash.write_str(&name);
        Self {
            name,
            packing_rule,
            hint,
            location: None,
            members: Vec::new(),
            hash,
            scalar_component_count: 0,
            layout: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn name(&self) -> &CanonName { &self.name }

    pub fn packing_rule(&self) -> PackingRule { self.packing_rule }

    pub fn type_hint(&self) -> TypeHint { self.hint }

    pub fn location(&self) -> Option<SourceLocation> { self.location }

    pub fn members(&self) -> &[MemberDecl] { &self.members }

    pub fn member_count(&self) -> usize { self.members.len() }

    pub fn member_name(&self, i: usize) -> Option<&CanonName> { self.members.get(i).map(|m| &m.name) }

    pub fn member_type(&self, i: usize) -> Option<DataType> { self.members.get(i).map(|m| m.ty) }

    pub fn member_index(&self, name: &str) -> Option<usize> { self.members.iter().position(|m| &*m.name == name) }

    /// `None` until the layout was computed
    pub fn member_layout(&self, i: usize) -> Option<&MemberLayout> { self.layout.as_ref()?.members.get(i) }

    pub fn layout(&self) -> Option<&CompositeLayout> { self.layout.as_ref() }

    pub fn is_laid_out(&self) -> bool { self.layout.is_some() }

    pub fn linear_size(&self) -> Option<u64> { self.layout.as_ref().map(|l| l.linear_size) }

    pub fn linear_alignment(&self) -> Option<u64> { self.layout.as_ref().map(|l| l.linear_alignment) }

    /// running CRC-64 over the name and every member's name and type hash so far
    pub fn structural_hash(&self) -> u64 { self.hash.finish() }

    pub fn scalar_component_count(&self) -> u32 { self.scalar_component_count }

    /// appends a member.
    ///
    /// `type_hash` and `scalar_count` describe the member's type (for one
    /// array element), the catalog computes them since only it can look
    /// into nested composites and resources.
    pub(crate) fn push_member(&mut self, decl: MemberDecl, type_hash: u64, scalar_count: u32) -> Result<(), CatalogError> {
        if self.layout.is_some() {
            return Err(CatalogError::LayoutAlreadyComputed {
                composite: self.name.clone(),
                member: decl.name,
            });
        }
        // Brute force search > HashMap for the amount of members
        // we'd usually deal with.
        if self.members.iter().any(|m| m.name == decl.name) {
            return Err(CatalogError::DuplicateMemberName {
                composite: self.name.clone(),
                member: decl.name,
            });
        }
        self.hash.write_str(&decl.name);
        self.hash.write_u64(type_hash);
        self.hash.write_u64(decl.array_len.map(|n| n.get() as u64).unwrap_or(0));

        let elements = decl.array_len.map(NonZeroU32::get).unwrap_or(1);
        self.scalar_component_count = self
            .scalar_component_count
            .saturating_add(scalar_count.saturating_mul(elements));
        self.members.push(decl);
        Ok(())
    }

    pub(crate) fn set_layout(&mut self, layout: CompositeLayout) {
        debug_assert_eq!(layout.members.len(), self.members.len());
        self.layout = Some(layout);
    }
}

impl Display for CompositeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.members.iter().map(|m| m.name.len()).max().unwrap_or(0);
        write!(f, "{} {} {{", self.packing_rule, self.name)?;
        match &self.layout {
            Some(l) => writeln!(f, " // size {}, align {}", l.linear_size, l.linear_alignment)?,
            None => writeln!(f, " // not laid out")?,
        }
        for (i, member) in self.members.iter().enumerate() {
            write!(f, "  {:width$}", member.name)?;
            if let Some(n) = member.array_len {
                write!(f, "[{n}]")?;
            }
            if let Some(l) = self.member_layout(i) {
                write!(
                    f,
                    "  offset {:>4}  size {:>4}  align {:>2}  format {}",
                    l.offset,
                    l.size,
                    l.alignment,
                    UnwrapOrStr(l.format, "-")
                )?;
                if l.array_count > 0 {
                    write!(f, "  stride {}", l.array_stride)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
