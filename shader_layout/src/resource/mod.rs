//! resolution of resource declarations such as `Texture2D<uav, format=rgba8>`

use crate::{
    catalog::TypeCatalog,
    common::{crc64::Crc64, pool::Key},
    ir::{
        Attribute, AttributeList, CanonName, CompositeType, DataFormat, DataType, ResourceKind, ResourceType,
        SampledImageFlavor, SourceLocation, ViewDimension,
    },
    Diagnostic,
};

pub mod tables;
mod texture;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceTypeError {
    #[error(
        "`{0}` is not a resource type. Expected `Texture1D`, `Texture2D`, `Texture3D` or `TextureCube` (each optionally followed by `Array`), `Texture`, `Buffer`, `ConstantBuffer` or `Sampler`."
    )]
    UnrecognizedResourceTypeName(CanonName),
    #[error("`{type_name}` cannot be declared with both `{first}` and `{second}`")]
    ConflictingResourceAttributes {
        type_name: CanonName,
        first: &'static str,
        second: &'static str,
    },
    #[error("`{type_name}` with access mode `{access}` requires a `format=` attribute")]
    MissingRequiredFormatAttribute { type_name: CanonName, access: &'static str },
    #[error("format `{format}` cannot be used by `{type_name}` with access mode `{access}`")]
    InvalidFormatForAccessMode {
        type_name: CanonName,
        format: DataFormat,
        access: &'static str,
    },
    #[error("`{0}` is a 3D texture declared as `array`. 3D textures cannot be arrayed.")]
    InvalidArrayedThreeDimensionalTexture(CanonName),
    #[error("`layout={0}` does not name a composite type")]
    UnknownStructuredBufferLayout(CanonName),
    #[error("unknown format `{0}`")]
    UnknownFormat(CanonName),
    #[error("`{0}` has no dimension. Add one of `dim1D`, `dim2D`, `dim3D` or `dimCube`.")]
    MissingTextureDimension(CanonName),
    #[error("`{0}` has no access mode. Add one of `uav`, `nosampler` or `sampler`.")]
    MissingResourceAccessMode(CanonName),
    #[error("`{type_name}` is a {dimension} texture, only 2D textures can be multisampled")]
    MultisampledRequiresTwoDimensions {
        type_name: CanonName,
        dimension: ViewDimension,
    },
    #[error("the layout of a constant buffer must be a composite type, found `{0}`")]
    ConstantBufferLayoutNotComposite(CanonName),
    #[error("`{type_name}` declares attribute `{key}` twice, as `{first}` and as `{second}`")]
    DuplicateAttribute {
        type_name: CanonName,
        key: CanonName,
        first: CanonName,
        second: CanonName,
    },
}

/// everything a declaration resolves to
#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolution {
    kind: ResourceKind,
    format: Option<DataFormat>,
    view_dimension: Option<ViewDimension>,
    multisampled: bool,
    sampled_image_flavor: Option<SampledImageFlavor>,
    layout: Option<Key<CompositeType>>,
}

impl Resolution {
    fn of_kind(kind: ResourceKind) -> Self {
        Self {
            kind,
            format: None,
            view_dimension: None,
            multisampled: false,
            sampled_image_flavor: None,
            layout: None,
        }
    }
}

/// CRC-64 of the type name and the canonical attribute list
fn declaration_hash(type_name: &str, canonical_attributes: &AttributeList) -> u64 {
    let mut hash = Crc64::new();
    hash.write_str(type_name);
    for attribute in canonical_attributes {
        hash.write_str(&attribute.key);
        match &attribute.value {
            Some(value) => {
                hash.write_u8(1);
                hash.write_str(value);
            }
            None => hash.write_u8(0),
        }
    }
    hash.finish()
}

/// the format named by a `format=` attribute
fn parse_format(attribute: &Attribute) -> Result<DataFormat, ResourceTypeError> {
    let name = attribute.value.as_deref().unwrap_or_default();
    DataFormat::from_name(name).ok_or_else(|| ResourceTypeError::UnknownFormat(name.to_string().into()))
}

impl TypeCatalog {
    /// the resource an identical declaration was already resolved to.
    ///
    /// declarations are identical if their type names are equal and their
    /// attributes are equal in any order.
    pub fn find_resource(&self, type_name: &str, attributes: &AttributeList) -> Option<DataType> {
        let canonical = attributes.canonical();
        self.cached_resource(type_name, &canonical, declaration_hash(type_name, &canonical))
    }

    fn cached_resource(&self, type_name: &str, canonical: &AttributeList, hash: u64) -> Option<DataType> {
        self.resource_cache
            .get(&hash)?
            .iter()
            .copied()
            .find(|key| {
                self.resources
                    .get(*key)
                    .is_some_and(|r| r.is_declared_as(type_name, canonical))
            })
            .map(DataType::Resource)
    }

    /// resolves a resource declaration, or returns the resource an identical
    /// declaration was resolved to before.
    pub fn resolve_resource(
        &mut self,
        type_name: &str,
        attributes: &AttributeList,
        location: Option<SourceLocation>,
    ) -> Result<DataType, Diagnostic> {
        if let Some((first, second)) = attributes.first_conflict() {
            let e = ResourceTypeError::DuplicateAttribute {
                type_name: type_name.to_string().into(),
                key: first.key.clone(),
                first: first.to_string().into(),
                second: second.to_string().into(),
            };
            return Err(Diagnostic::error(e, location));
        }
        let canonical = attributes.canonical();
        let hash = declaration_hash(type_name, &canonical);
        if let Some(ty) = self.cached_resource(type_name, &canonical, hash) {
            log::debug!("resource `{type_name}{canonical}` resolved from cache");
            return Ok(ty);
        }
        log::debug!("resolving resource `{type_name}{canonical}`");

        let resolution = self
            .resolve_declaration(type_name, &canonical)
            .map_err(|e| Diagnostic::error(e, location))?;
        let key = self.resources.push(ResourceType {
            type_name: type_name.to_string().into(),
            attributes: canonical,
            hash,
            kind: resolution.kind,
            format: resolution.format,
            view_dimension: resolution.view_dimension,
            multisampled: resolution.multisampled,
            sampled_image_flavor: resolution.sampled_image_flavor,
            layout: resolution.layout,
        });
        self.resource_cache.entry(hash).or_default().push(key);
        Ok(DataType::Resource(key))
    }

    /// a constant buffer whose fields were declared inline as the composite `layout`.
    ///
    /// resolves to the same resource as `ConstantBuffer<layout=Name>`.
    pub fn resolve_constant_buffer(
        &mut self,
        layout: DataType,
        location: Option<SourceLocation>,
    ) -> Result<DataType, Diagnostic> {
        let Some(composite) = self.composite(layout) else {
            return Err(Diagnostic::error(
                ResourceTypeError::ConstantBufferLayoutNotComposite(self.type_name(layout)),
                location,
            ));
        };
        let attributes = AttributeList::from([Attribute::with_value("layout", composite.name().clone())]);
        self.resolve_resource("ConstantBuffer", &attributes, location)
    }

    fn resolve_declaration(&self, type_name: &str, attributes: &AttributeList) -> Result<Resolution, ResourceTypeError> {
        match type_name {
            "ConstantBuffer" => Ok(Resolution {
                layout: attributes
                    .get("layout")
                    .map(|a| self.layout_by_name(a.value.as_deref().unwrap_or_default()))
                    .transpose()?,
                ..Resolution::of_kind(ResourceKind::ConstantBuffer)
            }),
            "Sampler" => Ok(Resolution::of_kind(ResourceKind::Sampler)),
            "Buffer" => self.resolve_buffer(attributes),
            name if name.starts_with("Texture") => texture::resolve_texture(name, attributes),
            name => Err(ResourceTypeError::UnrecognizedResourceTypeName(name.to_string().into())),
        }
    }

    fn layout_by_name(&self, name: &str) -> Result<Key<CompositeType>, ResourceTypeError> {
        self.find_composite(name)
            .and_then(|ty| ty.as_composite())
            .ok_or_else(|| ResourceTypeError::UnknownStructuredBufferLayout(name.to_string().into()))
    }

    fn resolve_buffer(&self, attributes: &AttributeList) -> Result<Resolution, ResourceTypeError> {
        let uav = attributes.has("uav");
        if let Some(layout) = attributes.get("layout") {
            if attributes.has("format") {
                return Err(ResourceTypeError::ConflictingResourceAttributes {
                    type_name: "Buffer".into(),
                    first: "layout",
                    second: "format",
                });
            }
            let key = self.layout_by_name(layout.value.as_deref().unwrap_or_default())?;
            return Ok(Resolution {
                layout: Some(key),
                ..Resolution::of_kind(match uav {
                    true => ResourceKind::BufferStructuredWritable,
                    false => ResourceKind::BufferStructured,
                })
            });
        }

        let format = match attributes.get("format") {
            Some(attribute) => parse_format(attribute)?,
            None => DataFormat::R32Float,
        };
        let (kind, legal, access) = match uav {
            true => (ResourceKind::BufferWritable, format.is_storage_legal(), "uav"),
            false => (ResourceKind::Buffer, format.is_buffer_legal(), "read only"),
        };
        if !legal {
            return Err(ResourceTypeError::InvalidFormatForAccessMode {
                type_name: "Buffer".into(),
                format,
                access,
            });
        }
        Ok(Resolution {
            format: Some(format),
            ..Resolution::of_kind(kind)
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ir::TypeHint, TypeErrorKind};

    fn attributes(list: &[(&'static str, Option<&'static str>)]) -> AttributeList {
        list.iter()
            .map(|(key, value)| match value {
                Some(value) => Attribute::with_value(*key, *value),
                None => Attribute::flag(*key),
            })
            .collect()
    }

    fn resource_error(e: Diagnostic) -> ResourceTypeError {
        match e.kind {
            TypeErrorKind::ResourceType(e) => e,
            kind => panic!("not a resource error: {kind}"),
        }
    }

    #[test]
    fn cache_is_order_insensitive() {
        let mut catalog = TypeCatalog::default();
        let a = catalog
            .resolve_resource("Buffer", &attributes(&[("uav", None), ("format", Some("r32_uint"))]), None)
            .unwrap();
        let reordered = attributes(&[("format", Some("r32_uint")), ("uav", None)]);
        assert_eq!(catalog.find_resource("Buffer", &reordered), Some(a));
        assert_eq!(catalog.resolve_resource("Buffer", &reordered, None).unwrap(), a);
        assert_eq!(catalog.find_resource("Buffer", &AttributeList::new()), None);
    }

    #[test]
    fn buffers() {
        let mut catalog = TypeCatalog::default();
        let typed = catalog.resolve_resource("Buffer", &AttributeList::new(), None).unwrap();
        let typed = catalog.resource(typed).unwrap();
        assert_eq!(typed.kind(), ResourceKind::Buffer);
        assert_eq!(typed.format(), Some(DataFormat::R32Float));

        let particle = catalog.declare_composite("Particle", "std430", TypeHint::User, None).unwrap();
        let structured = catalog
            .resolve_resource("Buffer", &attributes(&[("layout", Some("Particle")), ("uav", None)]), None)
            .unwrap();
        let structured = catalog.resource(structured).unwrap();
        assert_eq!(structured.kind(), ResourceKind::BufferStructuredWritable);
        assert_eq!(structured.referenced_layout(), particle.as_composite());

        let e = catalog
            .resolve_resource("Buffer", &attributes(&[("layout", Some("Nope"))]), None)
            .unwrap_err();
        assert_eq!(
            resource_error(e),
            ResourceTypeError::UnknownStructuredBufferLayout("Nope".into())
        );
        let e = catalog
            .resolve_resource(
                "Buffer",
                &attributes(&[("layout", Some("Particle")), ("format", Some("r32f"))]),
                None,
            )
            .unwrap_err();
        assert!(matches!(
            resource_error(e),
            ResourceTypeError::ConflictingResourceAttributes { .. }
        ));
        let e = catalog
            .resolve_resource("Buffer", &attributes(&[("uav", None), ("format", Some("srgb8_a8"))]), None)
            .unwrap_err();
        assert!(matches!(
            resource_error(e),
            ResourceTypeError::InvalidFormatForAccessMode { access: "uav", .. }
        ));
    }

    #[test]
    fn constant_buffers_share_their_layout() {
        let mut catalog = TypeCatalog::default();
        let camera = catalog.declare_composite("Camera", "std140", TypeHint::User, None).unwrap();
        let inline = catalog.resolve_constant_buffer(camera, None).unwrap();
        let by_name = catalog
            .resolve_resource("ConstantBuffer", &attributes(&[("layout", Some("Camera"))]), None)
            .unwrap();
        assert_eq!(inline, by_name);
        let cb = catalog.resource(inline).unwrap();
        assert_eq!(cb.kind(), ResourceKind::ConstantBuffer);
        assert_eq!(cb.referenced_layout(), camera.as_composite());

        let float = catalog.find_type("float").unwrap();
        let e = catalog.resolve_constant_buffer(float, None).unwrap_err();
        assert_eq!(
            resource_error(e),
            ResourceTypeError::ConstantBufferLayoutNotComposite("float".into())
        );
    }

    #[test]
    fn unknown_names() {
        let mut catalog = TypeCatalog::default();
        for name in ["StructuredBuffer", "Texture4D", "TextureArray", "texture2D"] {
            let e = catalog
                .resolve_resource(name, &attributes(&[("sampler", None)]), Some(SourceLocation::new(1, 1)))
                .unwrap_err();
            assert_eq!(e.location, Some(SourceLocation::new(1, 1)));
            assert_eq!(
                resource_error(e),
                ResourceTypeError::UnrecognizedResourceTypeName(name.into())
            );
        }
        let sampler = catalog.resolve_resource("Sampler", &AttributeList::new(), None).unwrap();
        assert_eq!(catalog.resource(sampler).unwrap().kind(), ResourceKind::Sampler);
    }
}
