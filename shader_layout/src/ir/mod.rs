pub(crate) mod attribute;
pub(crate) mod ir_type;

pub use attribute::Attribute;
pub use attribute::AttributeList;
pub use attribute::SourceLocation;

pub use ir_type::CanonName;
pub use ir_type::DataType;
pub use ir_type::Len;
pub use ir_type::ScalarType;

pub use ir_type::CompositeLayout;
pub use ir_type::CompositeType;
pub use ir_type::MemberDecl;
pub use ir_type::MemberLayout;
pub use ir_type::PackingRule;
pub use ir_type::TypeHint;

pub use ir_type::ChannelKind;
pub use ir_type::DataFormat;
pub use ir_type::FormatFeatures;

pub use ir_type::ResourceKind;
pub use ir_type::ResourceType;
pub use ir_type::SampledImageFlavor;
pub use ir_type::ViewDimension;
