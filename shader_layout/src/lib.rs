//#![deny(missing_docs)] //TODO: reenable once the table types are documented
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
#![allow(clippy::match_like_matches_macro)]

//! `shader_layout` - the type system of a shader compiler
//!
//! a [`TypeCatalog`] owns every composite and resource type a compilation
//! unit declares. Once all declarations are in, [`TypeCatalog::compute_all_layouts`]
//! assigns byte offsets, sizes and alignments to every composite according
//! to its [`PackingRule`].
//!
//! ```text
//! let mut catalog = TypeCatalog::default();
//! let light = catalog.declare_composite("Light", "std140", TypeHint::User, None)?;
//! catalog.add_member(light, MemberDecl::new("color", catalog.find_type("float3")?))?;
//! catalog.compute_all_layouts(&mut diagnostics)?;
//! ```

mod common;

pub mod catalog;
pub mod error;
pub mod ir;
pub mod layout;
pub mod resource;
pub mod settings;

pub use common::pool::Key;

pub use catalog::CatalogError;
pub use catalog::TypeCatalog;

pub use error::CompileErrors;
pub use error::Diagnostic;
pub use error::Diagnostics;
pub use error::ErrorReporter;
pub use error::ReportExt;
pub use error::Severity;
pub use error::TypeErrorKind;
pub use error::TypeWarning;

pub use layout::InvalidOffsetReason;
pub use layout::LayoutCalculator;
pub use layout::LayoutError;
pub use layout::LayoutFailed;
pub use layout::LayoutPasses;
pub use layout::PlacementError;

pub use resource::tables::{
    AddressMode, CompareFunction, Filter, ResourceTable, SamplerState, StaticRenderStates, StaticSampler,
};
pub use resource::ResourceTypeError;

pub use settings::Settings;
pub use settings::Std430Rules;

pub use ir::*;
