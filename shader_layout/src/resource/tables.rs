//! flat registries of named resource tables, static samplers and render state blocks

use std::{collections::HashMap, num::NonZeroU32};

use crate::{
    catalog::{CatalogError, TypeCatalog},
    common::{
        integer::parse_attribute_int,
        pool::{Key, Pool},
    },
    ir::{Attribute, AttributeList, CanonName, DataType, SourceLocation},
    Diagnostic,
};

/// something stored in a [`NamedRegistry`]
pub trait Named {
    /// what the thing is called in error messages
    const KIND: &'static str;
    fn name(&self) -> &CanonName;
    fn location(&self) -> Option<SourceLocation>;
}

/// a group of resources bound together, e.g. `ResourceTable Material { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTable {
    pub name: CanonName,
    pub entries: Vec<(CanonName, DataType)>,
    pub location: Option<SourceLocation>,
}

impl ResourceTable {
    pub fn entry(&self, name: &str) -> Option<DataType> {
        self.entries.iter().find(|(n, _)| &**n == name).map(|(_, ty)| *ty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    Point,
    #[default]
    Linear,
    Anisotropic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    #[default]
    Wrap,
    Clamp,
    Mirror,
    Border,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// the fixed state of a sampler that is baked into the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerState {
    pub filter: Filter,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    /// `1..=16`
    pub max_anisotropy: u8,
    /// `Some` for comparison samplers
    pub comparison: Option<CompareFunction>,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            filter: Filter::default(),
            address_u: AddressMode::default(),
            address_v: AddressMode::default(),
            address_w: AddressMode::default(),
            max_anisotropy: 1,
            comparison: None,
        }
    }
}

/// the value of `attribute`, which must be one of the `options`
fn choose<T: Copy>(attribute: &Attribute, options: &[(&str, T)], expected: &'static str) -> Result<T, CatalogError> {
    let value = attribute.value.as_deref().unwrap_or_default();
    options
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, t)| *t)
        .ok_or_else(|| CatalogError::InvalidAttributeValue {
            key: attribute.key.clone(),
            value: value.to_string().into(),
            expected,
        })
}

impl SamplerState {
    /// reads `filter=`, `address=`, `address_u/v/w=`, `max_anisotropy=` and
    /// `comparison=` in order. Later attributes override earlier ones, other
    /// attributes are ignored.
    pub fn from_attributes(attributes: &AttributeList) -> Result<Self, CatalogError> {
        use AddressMode as A;
        use CompareFunction as C;
        let address = [("wrap", A::Wrap), ("clamp", A::Clamp), ("mirror", A::Mirror), ("border", A::Border)];
        let address_expected = "one of `wrap`, `clamp`, `mirror` or `border`";

        let mut state = SamplerState::default();
        for attribute in attributes {
            match &*attribute.key {
                "filter" => {
                    state.filter = choose(
                        attribute,
                        &[("point", Filter::Point), ("linear", Filter::Linear), ("aniso", Filter::Anisotropic)],
                        "one of `point`, `linear` or `aniso`",
                    )?
                }
                "address" => {
                    let mode = choose(attribute, &address, address_expected)?;
                    state.address_u = mode;
                    state.address_v = mode;
                    state.address_w = mode;
                }
                "address_u" => state.address_u = choose(attribute, &address, address_expected)?,
                "address_v" => state.address_v = choose(attribute, &address, address_expected)?,
                "address_w" => state.address_w = choose(attribute, &address, address_expected)?,
                "max_anisotropy" => {
                    let value = attribute.value.as_deref().unwrap_or_default();
                    state.max_anisotropy = parse_attribute_int(value)
                        .filter(|n| (1..=16).contains(n))
                        .map(|n| n as u8)
                        .ok_or_else(|| CatalogError::InvalidAttributeValue {
                            key: attribute.key.clone(),
                            value: value.to_string().into(),
                            expected: "an integer in `1..=16`",
                        })?
                }
                "comparison" => {
                    state.comparison = Some(choose(
                        attribute,
                        &[
                            ("never", C::Never),
                            ("less", C::Less),
                            ("equal", C::Equal),
                            ("lequal", C::LessEqual),
                            ("greater", C::Greater),
                            ("notequal", C::NotEqual),
                            ("gequal", C::GreaterEqual),
                            ("always", C::Always),
                        ],
                        "one of `never`, `less`, `equal`, `lequal`, `greater`, `notequal`, `gequal` or `always`",
                    )?)
                }
                key => log::debug!("sampler attribute `{key}` ignored"),
            }
        }
        Ok(state)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSampler {
    pub name: CanonName,
    pub state: SamplerState,
    pub location: Option<SourceLocation>,
}

/// a named block of render states, passed through to the pipeline unexamined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRenderStates {
    pub name: CanonName,
    pub states: AttributeList,
    pub location: Option<SourceLocation>,
}

macro_rules! impl_named {
    ($($t: ty => $kind: literal),* $(,)?) => {$(
        impl Named for $t {
            const KIND: &'static str = $kind;
            fn name(&self) -> &CanonName { &self.name }
            fn location(&self) -> Option<SourceLocation> { self.location }
        }
    )*};
}

impl_named! {
    ResourceTable => "resource table",
    StaticSampler => "static sampler",
    StaticRenderStates => "static render state block",
}

/// name keyed store where every name may be registered once
pub struct NamedRegistry<T> {
    pool: Pool<T>,
    by_name: HashMap<CanonName, Key<T>>,
}

impl<T: Named> NamedRegistry<T> {
    pub fn new(generation: NonZeroU32) -> Self {
        Self {
            pool: Pool::new(generation),
            by_name: HashMap::new(),
        }
    }

    pub fn register(&mut self, t: T) -> Result<Key<T>, Diagnostic> {
        if self.by_name.contains_key(t.name()) {
            return Err(Diagnostic::error(
                CatalogError::DuplicateTableName {
                    kind: T::KIND,
                    name: t.name().clone(),
                },
                t.location(),
            ));
        }
        let name = t.name().clone();
        let key = self.pool.push(t);
        self.by_name.insert(name, key);
        Ok(key)
    }

    pub fn find(&self, name: &str) -> Option<Key<T>> { self.by_name.get(name).copied() }

    pub fn get(&self, key: Key<T>) -> Option<&T> { self.pool.get(key) }

    pub fn len(&self) -> usize { self.pool.len() }

    pub fn is_empty(&self) -> bool { self.pool.is_empty() }
}

pub(crate) struct NamedTables {
    resource_tables: NamedRegistry<ResourceTable>,
    static_samplers: NamedRegistry<StaticSampler>,
    render_states: NamedRegistry<StaticRenderStates>,
}

impl NamedTables {
    pub fn new(generation: NonZeroU32) -> Self {
        Self {
            resource_tables: NamedRegistry::new(generation),
            static_samplers: NamedRegistry::new(generation),
            render_states: NamedRegistry::new(generation),
        }
    }
}

impl TypeCatalog {
    pub fn register_resource_table(&mut self, table: ResourceTable) -> Result<Key<ResourceTable>, Diagnostic> {
        self.tables.resource_tables.register(table)
    }

    pub fn find_resource_table(&self, name: &str) -> Option<Key<ResourceTable>> {
        self.tables.resource_tables.find(name)
    }

    pub fn resource_table(&self, key: Key<ResourceTable>) -> Option<&ResourceTable> {
        self.tables.resource_tables.get(key)
    }

    pub fn register_static_sampler(&mut self, sampler: StaticSampler) -> Result<Key<StaticSampler>, Diagnostic> {
        self.tables.static_samplers.register(sampler)
    }

    /// parses the sampler state from `attributes` and registers the sampler
    pub fn declare_static_sampler(
        &mut self,
        name: impl Into<CanonName>,
        attributes: &AttributeList,
        location: Option<SourceLocation>,
    ) -> Result<Key<StaticSampler>, Diagnostic> {
        let state = SamplerState::from_attributes(attributes).map_err(|e| Diagnostic::error(e, location))?;
        self.register_static_sampler(StaticSampler {
            name: name.into(),
            state,
            location,
        })
    }

    pub fn find_static_sampler(&self, name: &str) -> Option<Key<StaticSampler>> {
        self.tables.static_samplers.find(name)
    }

    pub fn static_sampler(&self, key: Key<StaticSampler>) -> Option<&StaticSampler> {
        self.tables.static_samplers.get(key)
    }

    pub fn register_static_render_states(
        &mut self,
        states: StaticRenderStates,
    ) -> Result<Key<StaticRenderStates>, Diagnostic> {
        self.tables.render_states.register(states)
    }

    pub fn find_static_render_states(&self, name: &str) -> Option<Key<StaticRenderStates>> {
        self.tables.render_states.find(name)
    }

    pub fn static_render_states(&self, key: Key<StaticRenderStates>) -> Option<&StaticRenderStates> {
        self.tables.render_states.get(key)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sampler_state_from_attributes() {
        let attributes = AttributeList::from([
            Attribute::with_value("filter", "aniso"),
            Attribute::with_value("address", "clamp"),
            Attribute::with_value("address_v", "mirror"),
            Attribute::with_value("max_anisotropy", "8"),
            Attribute::with_value("comparison", "LEQUAL"),
        ]);
        assert_eq!(SamplerState::from_attributes(&attributes).unwrap(), SamplerState {
            filter: Filter::Anisotropic,
            address_u: AddressMode::Clamp,
            address_v: AddressMode::Mirror,
            address_w: AddressMode::Clamp,
            max_anisotropy: 8,
            comparison: Some(CompareFunction::LessEqual),
        });
    }

    #[test]
    fn invalid_sampler_values() {
        for (key, value) in [("filter", "cubic"), ("max_anisotropy", "32"), ("max_anisotropy", "0"), ("address_w", "")] {
            let attributes = AttributeList::from([Attribute::with_value(key, value)]);
            assert!(matches!(
                SamplerState::from_attributes(&attributes),
                Err(CatalogError::InvalidAttributeValue { .. })
            ));
        }
    }

    #[test]
    fn names_are_unique_per_table_kind() {
        let mut catalog = TypeCatalog::default();
        let key = catalog
            .declare_static_sampler("linear_clamp", &AttributeList::from([Attribute::with_value("address", "clamp")]), None)
            .unwrap();
        assert_eq!(catalog.find_static_sampler("linear_clamp"), Some(key));
        let e = catalog
            .declare_static_sampler("linear_clamp", &AttributeList::new(), Some(SourceLocation::new(9, 1)))
            .unwrap_err();
        assert_eq!(e.location, Some(SourceLocation::new(9, 1)));
        assert!(matches!(
            e.kind,
            crate::TypeErrorKind::Catalog(CatalogError::DuplicateTableName { kind: "static sampler", .. })
        ));

        // same name, different table kind
        catalog
            .register_static_render_states(StaticRenderStates {
                name: "linear_clamp".into(),
                states: AttributeList::from([Attribute::with_value("cull", "back")]),
                location: None,
            })
            .unwrap();
        assert!(catalog.find_resource_table("linear_clamp").is_none());
    }
}
