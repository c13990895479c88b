mod common;

use pretty_assertions::assert_eq;

use common::*;
use shader_layout::{
    AddressMode, AttributeList, CatalogError, Filter, ResourceTable, SamplerState, StaticRenderStates, TypeCatalog,
    TypeErrorKind,
};

#[test]
fn resource_tables() {
    let mut catalog = TypeCatalog::default();
    let albedo = catalog
        .resolve_resource("Texture2D", &attributes(&[("sampler", None)]), None)
        .unwrap();
    let sampler = catalog.resolve_resource("Sampler", &AttributeList::new(), None).unwrap();

    let key = catalog
        .register_resource_table(ResourceTable {
            name: "Material".into(),
            entries: vec![("albedo".into(), albedo), ("albedo_sampler".into(), sampler)],
            location: None,
        })
        .unwrap();
    assert_eq!(catalog.find_resource_table("Material"), Some(key));
    let table = catalog.resource_table(key).unwrap();
    assert_eq!(table.entry("albedo"), Some(albedo));
    assert_eq!(table.entry("normal"), None);

    let e = catalog
        .register_resource_table(ResourceTable {
            name: "Material".into(),
            entries: vec![],
            location: None,
        })
        .unwrap_err();
    assert!(matches!(
        e.kind,
        TypeErrorKind::Catalog(CatalogError::DuplicateTableName { kind: "resource table", .. })
    ));
}

#[test]
fn static_samplers() {
    let mut catalog = TypeCatalog::default();
    let point = catalog
        .declare_static_sampler(
            "point_clamp",
            &attributes(&[("filter", Some("point")), ("address", Some("clamp"))]),
            None,
        )
        .unwrap();
    let state = catalog.static_sampler(point).unwrap().state;
    assert_eq!(state, SamplerState {
        filter: Filter::Point,
        address_u: AddressMode::Clamp,
        address_v: AddressMode::Clamp,
        address_w: AddressMode::Clamp,
        ..SamplerState::default()
    });

    let e = catalog
        .declare_static_sampler("bad", &attributes(&[("filter", Some("cubic"))]), None)
        .unwrap_err();
    assert!(matches!(
        e.kind,
        TypeErrorKind::Catalog(CatalogError::InvalidAttributeValue { .. })
    ));
    assert_eq!(catalog.find_static_sampler("bad"), None);
}

#[test]
fn render_states_are_kept_verbatim() {
    let mut catalog = TypeCatalog::default();
    let states = attributes(&[("cull", Some("none")), ("depth_write", None)]);
    let key = catalog
        .register_static_render_states(StaticRenderStates {
            name: "Overlay".into(),
            states: states.clone(),
            location: None,
        })
        .unwrap();
    assert_eq!(catalog.find_static_render_states("Overlay"), Some(key));
    assert_eq!(catalog.static_render_states(key).unwrap().states, states);
}
