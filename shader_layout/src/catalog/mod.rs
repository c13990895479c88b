//! the registry of every type a compilation unit knows about

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{
    common::{
        crc64::Crc64,
        pool::{fresh_generation, Key, Pool},
    },
    ir::{CanonName, CompositeType, DataType, Len, MemberDecl, PackingRule, ResourceType, ScalarType, SourceLocation, TypeHint},
    resource::tables::NamedTables,
    Diagnostic, Settings,
};

pub mod builtin;

pub use builtin::{matrix_name, vector_name};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("a type named `{0}` already exists")]
    DuplicateTypeName(CanonName),
    #[error("`{composite}` already has a member named `{member}`")]
    DuplicateMemberName { composite: CanonName, member: CanonName },
    #[error("cannot add member `{member}` to `{composite}`, its layout was already computed")]
    LayoutAlreadyComputed { composite: CanonName, member: CanonName },
    #[error("`{0:?}` is not a type of this catalog")]
    UnknownType(DataType),
    #[error("a {kind} named `{name}` already exists")]
    DuplicateTableName { kind: &'static str, name: CanonName },
    #[error("`{value}` is not a valid value for attribute `{key}`, expected {expected}")]
    InvalidAttributeValue {
        key: CanonName,
        value: CanonName,
        expected: &'static str,
    },
    #[error("`{0}` is not a packing rule, expected one of `vertex`, `std140` or `std430`")]
    UnknownPackingRule(String),
}

/// owns every composite and resource type of one compilation session.
///
/// types are handed out as [`DataType`] handles which are only meaningful
/// to the catalog that created them. The builtin vectors and matrices are
/// registered and laid out by [`TypeCatalog::new`].
pub struct TypeCatalog {
    pub(crate) settings: Settings,
    pub(crate) composites: Pool<CompositeType>,
    composite_names: HashMap<CanonName, Key<CompositeType>>,
    pub(crate) resources: Pool<ResourceType>,
    /// resolved resources by structural hash, collisions are told apart by declaration
    pub(crate) resource_cache: HashMap<u64, SmallVec<[Key<ResourceType>; 1]>>,
    pub(crate) tables: NamedTables,
}

impl Default for TypeCatalog {
    fn default() -> Self { Self::new(Settings::default()) }
}

impl TypeCatalog {
    pub fn new(settings: Settings) -> Self {
        let generation = fresh_generation();
        let mut catalog = Self {
            settings,
            composites: Pool::new(generation),
            composite_names: HashMap::new(),
            resources: Pool::new(generation),
            resource_cache: HashMap::new(),
            tables: NamedTables::new(generation),
        };
        catalog.register_builtins();
        catalog
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    /// stores `composite` and returns its handle.
    ///
    /// fails if a composite or scalar of the same name already exists.
    pub fn register_composite(&mut self, composite: CompositeType) -> Result<DataType, Diagnostic> {
        let name = composite.name();
        if self.composite_names.contains_key(name) || ScalarType::from_name(name).is_some() {
            return Err(Diagnostic::error(
                CatalogError::DuplicateTypeName(name.clone()),
                composite.location(),
            ));
        }
        let name = name.clone();
        let key = self.composites.push(composite);
        self.composite_names.insert(name, key);
        Ok(DataType::Composite(key))
    }

    /// [`TypeCatalog::register_composite`] for a packing rule that is still text,
    /// as it appears in a declaration like `struct(std140) Light { ... }`
    pub fn declare_composite(
        &mut self,
        name: impl Into<CanonName>,
        packing_rule: &str,
        hint: TypeHint,
        location: Option<SourceLocation>,
    ) -> Result<DataType, Diagnostic> {
        let rule = packing_rule
            .parse::<PackingRule>()
            .map_err(|e| Diagnostic::error(e, location))?;
        let mut composite = CompositeType::new(name, rule, hint);
        if let Some(location) = location {
            composite = composite.at(location);
        }
        self.register_composite(composite)
    }

    /// appends `member` to the composite `composite`.
    ///
    /// vector and matrix shaped [`DataType::Scalar`]s are replaced by the
    /// builtin composite of the same shape.
    pub fn add_member(&mut self, composite: DataType, mut member: MemberDecl) -> Result<(), Diagnostic> {
        let location = member.location;
        let unknown = |ty| Diagnostic::error(CatalogError::UnknownType(ty), location);

        member.ty = self.canonicalize(member.ty);
        let (type_hash, scalar_count) = match member.ty {
            DataType::Scalar(scalar, _, _) => {
                let mut hash = Crc64::new();
                hash.write_str(scalar.name());
                (hash.finish(), 1)
            }
            DataType::Composite(key) => {
                let c = self.composites.get(key).ok_or_else(|| unknown(member.ty))?;
                (c.structural_hash(), c.scalar_component_count())
            }
            DataType::Resource(key) => {
                let r = self.resources.get(key).ok_or_else(|| unknown(member.ty))?;
                (r.structural_hash(), 0)
            }
            DataType::Invalid => return Err(unknown(member.ty)),
        };

        let key = composite.as_composite().ok_or_else(|| unknown(composite))?;
        let target = self.composites.get_mut(key).ok_or_else(|| unknown(composite))?;
        target
            .push_member(member, type_hash, scalar_count)
            .map_err(|e| Diagnostic::error(e, location))
    }

    pub fn find_composite(&self, name: &str) -> Option<DataType> {
        self.composite_names.get(name).map(|key| DataType::Composite(*key))
    }

    /// looks up scalars and composites by name
    pub fn find_type(&self, name: &str) -> Option<DataType> {
        ScalarType::from_name(name)
            .map(DataType::scalar)
            .or_else(|| self.find_composite(name))
    }

    pub fn composite(&self, ty: DataType) -> Option<&CompositeType> { self.composites.get(ty.as_composite()?) }

    pub fn resource(&self, ty: DataType) -> Option<&ResourceType> { self.resources.get(ty.as_resource()?) }

    /// all composites in registration order, builtins first
    pub fn composites(&self) -> impl DoubleEndedIterator<Item = (DataType, &CompositeType)> {
        self.composites
            .enumerate()
            .map(|(key, c)| (DataType::Composite(key), c))
    }

    /// the composites that were not synthesized by the catalog itself
    pub fn user_composites(&self) -> impl Iterator<Item = (DataType, &CompositeType)> {
        self.composites().filter(|(_, c)| c.type_hint() == TypeHint::User)
    }

    /// number of scalars a value of type `ty` consists of, `0` for resources
    /// and types of other catalogs
    pub fn scalar_component_count(&self, ty: DataType) -> u32 {
        match self.canonicalize(ty) {
            DataType::Scalar(..) => 1,
            ty @ DataType::Composite(_) => self.composite(ty).map(CompositeType::scalar_component_count).unwrap_or(0),
            DataType::Resource(_) | DataType::Invalid => 0,
        }
    }

    /// maps vector and matrix shaped [`DataType::Scalar`]s to their builtin composite.
    ///
    /// `Scalar(kind, width, rows)` with `rows > 1` is the matrix of `width` columns
    /// of `rows` components each, a single column is the vector of `rows` components.
    pub fn canonicalize(&self, ty: DataType) -> DataType {
        match ty {
            DataType::Scalar(scalar, Len::X1, Len::X1) => DataType::scalar(scalar),
            DataType::Scalar(scalar, width, Len::X1) | DataType::Scalar(scalar, Len::X1, width) => self
                .find_composite(&vector_name(scalar, width))
                .unwrap_or(DataType::Invalid),
            DataType::Scalar(scalar, columns, rows) => self
                .find_composite(&matrix_name(scalar, rows, columns))
                .unwrap_or(DataType::Invalid),
            ty => ty,
        }
    }

    /// the name `ty` is spelled as in shader code
    pub fn type_name(&self, ty: DataType) -> CanonName {
        match ty {
            DataType::Scalar(..) => match self.canonicalize(ty) {
                DataType::Scalar(scalar, _, _) => scalar.name().into(),
                canonical => self.type_name(canonical),
            },
            DataType::Composite(_) => self
                .composite(ty)
                .map(|c| c.name().clone())
                .unwrap_or("<unknown composite>".into()),
            DataType::Resource(_) => self
                .resource(ty)
                .map(|r| r.type_name().clone())
                .unwrap_or("<unknown resource>".into()),
            DataType::Invalid => "<invalid>".into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ir::ScalarType as ST;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut catalog = TypeCatalog::default();
        catalog.declare_composite("Light", "std140", TypeHint::User, None).unwrap();
        for name in ["Light", "float3", "uint"] {
            let e = catalog.declare_composite(name, "std140", TypeHint::User, None).unwrap_err();
            assert!(matches!(
                e.kind,
                crate::TypeErrorKind::Catalog(CatalogError::DuplicateTypeName(_))
            ));
        }
    }

    #[test]
    fn unknown_packing_rule() {
        let mut catalog = TypeCatalog::default();
        let e = catalog
            .declare_composite("S", "std999", TypeHint::User, Some(SourceLocation::new(3, 1)))
            .unwrap_err();
        assert_eq!(e.location, Some(SourceLocation::new(3, 1)));
        assert!(matches!(
            e.kind,
            crate::TypeErrorKind::Catalog(CatalogError::UnknownPackingRule(_))
        ));
    }

    #[test]
    fn scalars_canonicalize_to_builtins() {
        let catalog = TypeCatalog::default();
        let float3 = catalog.find_composite("float3").unwrap();
        assert_eq!(catalog.canonicalize(DataType::Scalar(ST::Float, Len::X3, Len::X1)), float3);
        assert_eq!(catalog.canonicalize(DataType::Scalar(ST::Float, Len::X1, Len::X3)), float3);
        assert_eq!(
            catalog.canonicalize(DataType::Scalar(ST::Int, Len::X2, Len::X4)),
            catalog.find_composite("int4x2").unwrap()
        );
        assert_eq!(&*catalog.type_name(DataType::Scalar(ST::Uint, Len::X4, Len::X4)), "uint4x4");
        assert_eq!(catalog.scalar_component_count(catalog.find_type("float4x4").unwrap()), 16);
    }

    #[test]
    fn handles_of_other_catalogs_are_unknown() {
        let a = TypeCatalog::default();
        let mut b = TypeCatalog::default();
        let foreign = a.find_composite("float2").unwrap();
        assert!(b.composite(foreign).is_none());
        let s = b.declare_composite("S", "std140", TypeHint::User, None).unwrap();
        let e = b.add_member(s, MemberDecl::new("v", foreign)).unwrap_err();
        assert!(matches!(
            e.kind,
            crate::TypeErrorKind::Catalog(CatalogError::UnknownType(_))
        ));
    }
}
