#![allow(unused)]
use std::num::NonZeroU32;

use shader_layout::{
    Attribute, AttributeList, DataType, Diagnostic, Diagnostics, LayoutError, MemberDecl, ResourceTypeError,
    TypeCatalog, TypeErrorKind, TypeHint,
};

/// routes `log` output of the crate to the test harness, `RUST_LOG=debug` to see it
pub fn init_logging() { let _ = env_logger::builder().is_test(true).try_init(); }

/// declares a user composite with `rule` and the given `(name, type)` members
#[track_caller]
pub fn declare(catalog: &mut TypeCatalog, name: &str, rule: &str, members: &[(&str, &str)]) -> DataType {
    let composite = catalog
        .declare_composite(name.to_string(), rule, TypeHint::User, None)
        .unwrap();
    for (member, ty) in members {
        let ty = catalog
            .find_type(ty)
            .unwrap_or_else(|| panic!("no type named `{ty}`"));
        catalog.add_member(composite, MemberDecl::new(member.to_string(), ty)).unwrap();
    }
    composite
}

pub fn array(len: u32) -> NonZeroU32 { NonZeroU32::new(len).unwrap() }

/// `("uav", None)` is the flag `uav`, `("format", Some("rgba8"))` is `format=rgba8`
pub fn attributes(list: &[(&str, Option<&str>)]) -> AttributeList {
    list.iter()
        .map(|(key, value)| match value {
            Some(value) => Attribute::with_value(key.to_string(), value.to_string()),
            None => Attribute::flag(key.to_string()),
        })
        .collect()
}

/// `(offset, size, alignment)` of every member of `composite`
#[track_caller]
pub fn member_layouts(catalog: &TypeCatalog, composite: DataType) -> Vec<(u64, u64, u64)> {
    let composite = catalog.composite(composite).unwrap();
    (0..composite.member_count())
        .map(|i| composite.member_layout(i).unwrap())
        .map(|l| (l.offset, l.size, l.alignment))
        .collect()
}

pub fn layout_errors(sink: &Diagnostics) -> Vec<LayoutError> {
    sink.errors()
        .iter()
        .filter_map(|d| match &d.kind {
            TypeErrorKind::Layout(e) => Some(e.clone()),
            _ => None,
        })
        .collect()
}

#[track_caller]
pub fn resource_error(e: Diagnostic) -> ResourceTypeError {
    match e.kind {
        TypeErrorKind::ResourceType(e) => e,
        kind => panic!("expected a resource error, got: {kind}"),
    }
}
