use std::fmt::Display;

use crate::{common::pool::Key, ir::AttributeList};

use super::{CanonName, CompositeType, DataFormat};

/// what kind of gpu descriptor a resource declaration resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ConstantBuffer,
    /// typed buffer, read only
    Buffer,
    /// typed buffer, read/write (`uav`)
    BufferWritable,
    /// buffer of composite elements, read only
    BufferStructured,
    /// buffer of composite elements, read/write (`uav`)
    BufferStructuredWritable,
    /// texture read without sampler (`nosampler`)
    Image,
    /// texture read/write (`uav`)
    ImageWritable,
    /// texture read through a sampler
    SampledImage,
    Sampler,
}

impl ResourceKind {
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            ResourceKind::BufferWritable | ResourceKind::BufferStructuredWritable | ResourceKind::ImageWritable
        )
    }

    pub fn is_texture(self) -> bool {
        matches!(self, ResourceKind::Image | ResourceKind::ImageWritable | ResourceKind::SampledImage)
    }
}

/// dimensionality of a texture view.
///
/// 3D textures cannot be arrayed, so there is no `D3Array`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewDimension {
    D1,
    D1Array,
    D2,
    D2Array,
    D3,
    Cube,
    CubeArray,
}

impl ViewDimension {
    pub fn is_arrayed(self) -> bool {
        matches!(self, ViewDimension::D1Array | ViewDimension::D2Array | ViewDimension::CubeArray)
    }

    pub fn is_2d(self) -> bool { matches!(self, ViewDimension::D2 | ViewDimension::D2Array) }
}

impl Display for ViewDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ViewDimension::D1 => "1D",
            ViewDimension::D1Array => "1D array",
            ViewDimension::D2 => "2D",
            ViewDimension::D2Array => "2D array",
            ViewDimension::D3 => "3D",
            ViewDimension::Cube => "cube",
            ViewDimension::CubeArray => "cube array",
        })
    }
}

/// the component type sampling a [`ResourceKind::SampledImage`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampledImageFlavor {
    #[default]
    Float,
    /// `signed`
    Int,
    /// `unsigned`
    Uint,
}

/// a resolved resource declaration.
///
/// instances are shared: resolving a declaration with the same type name
/// and attribute set again yields the same handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    pub(crate) type_name: CanonName,
    /// the declaration's attributes in canonical order
    pub(crate) attributes: AttributeList,
    pub(crate) hash: u64,
    pub(crate) kind: ResourceKind,
    pub(crate) format: Option<DataFormat>,
    pub(crate) view_dimension: Option<ViewDimension>,
    pub(crate) multisampled: bool,
    pub(crate) sampled_image_flavor: Option<SampledImageFlavor>,
    pub(crate) layout: Option<Key<CompositeType>>,
}

impl ResourceType {
    /// the type name as declared, e.g. `Texture2DArray`
    pub fn type_name(&self) -> &CanonName { &self.type_name }

    pub fn attributes(&self) -> &AttributeList { &self.attributes }

    /// structural hash of type name and attribute set, the deduplication key
    pub fn structural_hash(&self) -> u64 { self.hash }

    pub fn kind(&self) -> ResourceKind { self.kind }

    pub fn format(&self) -> Option<DataFormat> { self.format }

    pub fn view_dimension(&self) -> Option<ViewDimension> { self.view_dimension }

    pub fn multisampled(&self) -> bool { self.multisampled }

    pub fn sampled_image_flavor(&self) -> Option<SampledImageFlavor> { self.sampled_image_flavor }

    /// the element layout of structured buffers and the field layout of constant buffers
    pub fn referenced_layout(&self) -> Option<Key<CompositeType>> { self.layout }

    /// whether `self` was resolved from exactly this declaration
    pub(crate) fn is_declared_as(&self, type_name: &str, canonical_attributes: &AttributeList) -> bool {
        &*self.type_name == type_name && &self.attributes == canonical_attributes
    }
}
