use smallvec::SmallVec;

use crate::ir::{AttributeList, CanonName, ResourceKind, SampledImageFlavor, ViewDimension};

use super::{parse_format, Resolution, ResourceTypeError};

const DIMENSION_ATTRIBUTES: [&str; 4] = ["dim1D", "dim2D", "dim3D", "dimCube"];
const ACCESS_MODES: [&str; 3] = ["uav", "nosampler", "sampler"];

/// the dimension attribute and `array`ness a texture type name stands for.
///
/// `Texture2DArray` is `Texture` with `dim2D` and `array`, the canonical
/// `Texture` implies nothing.
fn implied_by_name(type_name: &str) -> Result<Option<(&'static str, bool)>, ResourceTypeError> {
    let unrecognized = || ResourceTypeError::UnrecognizedResourceTypeName(type_name.to_string().into());
    let suffix = type_name.strip_prefix("Texture").ok_or_else(unrecognized)?;
    if suffix.is_empty() {
        return Ok(None);
    }
    let (dimension, arrayed) = match suffix.strip_suffix("Array") {
        Some(dimension) => (dimension, true),
        None => (suffix, false),
    };
    let attribute = match dimension {
        "1D" => "dim1D",
        "2D" => "dim2D",
        "3D" => "dim3D",
        "Cube" => "dimCube",
        _ => return Err(unrecognized()),
    };
    Ok(Some((attribute, arrayed)))
}

/// exactly one of `candidates` that is present in `attributes`
fn exactly_one(
    type_name: &CanonName,
    candidates: &[&'static str],
    present: impl Fn(&str) -> bool,
) -> Result<Option<&'static str>, ResourceTypeError> {
    let found: SmallVec<[&'static str; 2]> = candidates.iter().copied().filter(|c| present(c)).collect();
    match found.as_slice() {
        [] => Ok(None),
        [one] => Ok(Some(*one)),
        [first, second, ..] => Err(ResourceTypeError::ConflictingResourceAttributes {
            type_name: type_name.clone(),
            first: *first,
            second: *second,
        }),
    }
}

pub(super) fn resolve_texture(type_name: &str, attributes: &AttributeList) -> Result<Resolution, ResourceTypeError> {
    let implied = implied_by_name(type_name)?;
    let name = CanonName::from(type_name.to_string());

    let dimension = exactly_one(&name, &DIMENSION_ATTRIBUTES, |d| {
        attributes.has(d) || implied.is_some_and(|(implied, _)| implied == d)
    })?
    .ok_or_else(|| ResourceTypeError::MissingTextureDimension(name.clone()))?;
    let arrayed = attributes.has("array") || implied.is_some_and(|(_, arrayed)| arrayed);

    use ViewDimension as VD;
    let view_dimension = match (dimension, arrayed) {
        ("dim1D", false) => VD::D1,
        ("dim1D", true) => VD::D1Array,
        ("dim2D", false) => VD::D2,
        ("dim2D", true) => VD::D2Array,
        ("dim3D", false) => VD::D3,
        ("dim3D", true) => return Err(ResourceTypeError::InvalidArrayedThreeDimensionalTexture(name)),
        ("dimCube", false) => VD::Cube,
        _ => VD::CubeArray,
    };

    let access = exactly_one(&name, &ACCESS_MODES, |mode| attributes.has(mode))?
        .ok_or_else(|| ResourceTypeError::MissingResourceAccessMode(name.clone()))?;

    let multisampled = attributes.has("multisampled");
    if multisampled {
        if !view_dimension.is_2d() {
            return Err(ResourceTypeError::MultisampledRequiresTwoDimensions {
                type_name: name,
                dimension: view_dimension,
            });
        }
        if access == "uav" {
            return Err(ResourceTypeError::ConflictingResourceAttributes {
                type_name: name,
                first: "uav",
                second: "multisampled",
            });
        }
    }

    let resolution = Resolution {
        view_dimension: Some(view_dimension),
        multisampled,
        ..Resolution::of_kind(ResourceKind::SampledImage)
    };

    if access == "sampler" {
        if attributes.has("format") {
            return Err(ResourceTypeError::ConflictingResourceAttributes {
                type_name: name,
                first: "sampler",
                second: "format",
            });
        }
        let flavor = match exactly_one(&name, &["signed", "unsigned"], |f| attributes.has(f))? {
            Some("signed") => SampledImageFlavor::Int,
            Some(_) => SampledImageFlavor::Uint,
            None => SampledImageFlavor::Float,
        };
        return Ok(Resolution {
            sampled_image_flavor: Some(flavor),
            ..resolution
        });
    }

    let Some(format) = attributes.get("format") else {
        return Err(ResourceTypeError::MissingRequiredFormatAttribute {
            type_name: name,
            access,
        });
    };
    let format = parse_format(format)?;
    let (kind, legal) = match access {
        "uav" => (ResourceKind::ImageWritable, format.is_storage_legal()),
        _ => (ResourceKind::Image, format.is_shader_image_legal()),
    };
    if !legal {
        return Err(ResourceTypeError::InvalidFormatForAccessMode {
            type_name: name,
            format,
            access,
        });
    }
    Ok(Resolution {
        kind,
        format: Some(format),
        ..resolution
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ir::{Attribute, DataFormat};

    fn resolve(type_name: &str, flags: &[&'static str], format: Option<&'static str>) -> Result<Resolution, ResourceTypeError> {
        let mut attributes: AttributeList = flags.iter().map(|f| Attribute::flag(*f)).collect();
        if let Some(format) = format {
            attributes.push(Attribute::with_value("format", format));
        }
        resolve_texture(type_name, &attributes)
    }

    #[test]
    fn names_are_normalized() {
        let cube_array = resolve("TextureCubeArray", &["sampler"], None).unwrap();
        assert_eq!(cube_array.view_dimension, Some(ViewDimension::CubeArray));
        let canonical = resolve("Texture", &["dimCube", "array", "sampler"], None).unwrap();
        assert_eq!(canonical.view_dimension, Some(ViewDimension::CubeArray));
        assert_eq!(
            resolve("Texture1D", &["nosampler"], Some("r16f")).unwrap().view_dimension,
            Some(ViewDimension::D1)
        );
    }

    #[test]
    fn dimensions() {
        assert_eq!(
            resolve("Texture", &["sampler"], None).unwrap_err(),
            ResourceTypeError::MissingTextureDimension("Texture".into())
        );
        assert!(matches!(
            resolve("Texture2D", &["dim3D", "sampler"], None).unwrap_err(),
            ResourceTypeError::ConflictingResourceAttributes {
                first: "dim2D",
                second: "dim3D",
                ..
            }
        ));
        // redundant but consistent
        assert!(resolve("Texture2D", &["dim2D", "sampler"], None).is_ok());
        assert_eq!(
            resolve("Texture3D", &["array", "sampler"], None).unwrap_err(),
            ResourceTypeError::InvalidArrayedThreeDimensionalTexture("Texture3D".into())
        );
    }

    #[test]
    fn access_modes() {
        assert_eq!(
            resolve("Texture2D", &[], None).unwrap_err(),
            ResourceTypeError::MissingResourceAccessMode("Texture2D".into())
        );
        assert!(matches!(
            resolve("Texture2D", &["uav", "sampler"], None).unwrap_err(),
            ResourceTypeError::ConflictingResourceAttributes {
                first: "uav",
                second: "sampler",
                ..
            }
        ));
        assert!(matches!(
            resolve("Texture2D", &["uav"], None).unwrap_err(),
            ResourceTypeError::MissingRequiredFormatAttribute { access: "uav", .. }
        ));
        assert!(matches!(
            resolve("Texture2D", &["nosampler"], Some("d24s8")).unwrap_err(),
            ResourceTypeError::InvalidFormatForAccessMode { .. }
        ));
        assert!(matches!(
            resolve("Texture2D", &["sampler"], Some("rgba8")).unwrap_err(),
            ResourceTypeError::ConflictingResourceAttributes { second: "format", .. }
        ));

        let image = resolve("Texture2D", &["nosampler"], Some("bc7")).unwrap();
        assert_eq!(image.kind, ResourceKind::Image);
        assert_eq!(image.format, Some(DataFormat::Bc7Unorm));
        let writable = resolve("Texture2DArray", &["uav"], Some("rgba16f")).unwrap();
        assert_eq!(writable.kind, ResourceKind::ImageWritable);
    }

    #[test]
    fn sampled_flavors() {
        let flavor = |flags: &[&'static str]| resolve("Texture2D", flags, None).map(|r| r.sampled_image_flavor);
        assert_eq!(flavor(&["sampler"]), Ok(Some(SampledImageFlavor::Float)));
        assert_eq!(flavor(&["sampler", "signed"]), Ok(Some(SampledImageFlavor::Int)));
        assert_eq!(flavor(&["sampler", "unsigned"]), Ok(Some(SampledImageFlavor::Uint)));
        assert!(flavor(&["sampler", "signed", "unsigned"]).is_err());
    }

    #[test]
    fn multisampling() {
        let ms = resolve("Texture2DArray", &["sampler", "multisampled"], None).unwrap();
        assert!(ms.multisampled);
        assert!(matches!(
            resolve("TextureCube", &["sampler", "multisampled"], None).unwrap_err(),
            ResourceTypeError::MultisampledRequiresTwoDimensions { .. }
        ));
        assert!(matches!(
            resolve("Texture2D", &["uav", "multisampled"], Some("rgba8")).unwrap_err(),
            ResourceTypeError::ConflictingResourceAttributes { second: "multisampled", .. }
        ));
    }
}
