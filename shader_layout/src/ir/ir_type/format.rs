//! pixel/vertex data formats that `format=` attributes name and that members
//! of vertex layouts are stored as.

use std::fmt::Display;

use super::{Len, ScalarType};

/// how the channels of a format are interpreted when read in a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Unorm,
    Snorm,
    Uint,
    Sint,
    Float,
    /// unorm with srgb -> linear conversion on load
    Srgb,
    Depth,
    DepthStencil,
    /// block compressed, `bits_per_pixel` is the average over a block
    Compressed,
}

/// the ways a format may be bound, similar to `wgpu`'s `TextureFormatFeatures`
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct FormatFeatures(u8);

impl FormatFeatures {
    pub const NONE: FormatFeatures = FormatFeatures(0);
    /// usable as a writable image or writable typed buffer (`uav`)
    pub const STORAGE: FormatFeatures = FormatFeatures(1 << 0);
    /// usable as an image that is read without a sampler (`nosampler`)
    pub const SHADER_IMAGE: FormatFeatures = FormatFeatures(1 << 1);
    /// usable as element format of a typed buffer and as vertex attribute format
    pub const BUFFER: FormatFeatures = FormatFeatures(1 << 2);

    pub const fn union(self, other: FormatFeatures) -> FormatFeatures { FormatFeatures(self.0 | other.0) }

    pub const fn contains(self, other: FormatFeatures) -> bool { self.0 & other.0 == other.0 }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum DataFormat {
    // 8 bit per channel
    R8Unorm,
    R8Snorm,
    R8Uint,
    R8Sint,
    Rg8Unorm,
    Rg8Snorm,
    Rg8Uint,
    Rg8Sint,
    Rgba8Unorm,
    Rgba8Srgb,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,

    // 16 bit per channel
    R16Unorm,
    R16Snorm,
    R16Uint,
    R16Sint,
    R16Float,
    Rg16Unorm,
    Rg16Snorm,
    Rg16Uint,
    Rg16Sint,
    Rg16Float,
    Rgba16Unorm,
    Rgba16Snorm,
    Rgba16Uint,
    Rgba16Sint,
    Rgba16Float,

    // 32 bit per channel
    R32Uint,
    R32Sint,
    R32Float,
    Rg32Uint,
    Rg32Sint,
    Rg32Float,
    Rgb32Uint,
    Rgb32Sint,
    Rgb32Float,
    Rgba32Uint,
    Rgba32Sint,
    Rgba32Float,

    // packed
    Rgb10a2Unorm,
    Rg11b10Float,

    // depth and stencil
    Depth16Unorm,
    Depth32Float,
    Depth24UnormStencil8,

    // block compressed
    Bc1Unorm,
    Bc2Unorm,
    Bc3Unorm,
    Bc4Unorm,
    Bc5Unorm,
    Bc6hFloat,
    Bc7Unorm,
}

/// static properties of a [`DataFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: DataFormat,
    /// the canonical attribute spelling, e.g. `rgba8`
    pub name: &'static str,
    pub bits_per_pixel: u32,
    pub channels: u8,
    pub channel_kind: ChannelKind,
    pub features: FormatFeatures,
}

const S: FormatFeatures = FormatFeatures::STORAGE;
const I: FormatFeatures = FormatFeatures::SHADER_IMAGE;
const B: FormatFeatures = FormatFeatures::BUFFER;
const SIB: FormatFeatures = S.union(I).union(B);
const IB: FormatFeatures = I.union(B);
const SI: FormatFeatures = S.union(I);
const NONE: FormatFeatures = FormatFeatures::NONE;

#[rustfmt::skip]
const fn info(format: DataFormat, name: &'static str, bits_per_pixel: u32, channels: u8, channel_kind: ChannelKind, features: FormatFeatures) -> FormatInfo {
    FormatInfo { format, name, bits_per_pixel, channels, channel_kind, features }
}

#[rustfmt::skip]
const FORMATS: &[FormatInfo] = &[
    info(DataFormat::R8Unorm,              "r8",          8,   1, ChannelKind::Unorm,        SIB),
    info(DataFormat::R8Snorm,              "r8_snorm",    8,   1, ChannelKind::Snorm,        SIB),
    info(DataFormat::R8Uint,               "r8_uint",     8,   1, ChannelKind::Uint,         SIB),
    info(DataFormat::R8Sint,               "r8_int",      8,   1, ChannelKind::Sint,         SIB),
    info(DataFormat::Rg8Unorm,             "rg8",         16,  2, ChannelKind::Unorm,        SIB),
    info(DataFormat::Rg8Snorm,             "rg8_snorm",   16,  2, ChannelKind::Snorm,        SIB),
    info(DataFormat::Rg8Uint,              "rg8_uint",    16,  2, ChannelKind::Uint,         SIB),
    info(DataFormat::Rg8Sint,              "rg8_int",     16,  2, ChannelKind::Sint,         SIB),
    info(DataFormat::Rgba8Unorm,           "rgba8",       32,  4, ChannelKind::Unorm,        SIB),
    info(DataFormat::Rgba8Srgb,            "srgb8_a8",    32,  4, ChannelKind::Srgb,         I  ),
    info(DataFormat::Rgba8Snorm,           "rgba8_snorm", 32,  4, ChannelKind::Snorm,        SIB),
    info(DataFormat::Rgba8Uint,            "rgba8_uint",  32,  4, ChannelKind::Uint,         SIB),
    info(DataFormat::Rgba8Sint,            "rgba8_int",   32,  4, ChannelKind::Sint,         SIB),

    info(DataFormat::R16Unorm,             "r16",         16,  1, ChannelKind::Unorm,        SIB),
    info(DataFormat::R16Snorm,             "r16_snorm",   16,  1, ChannelKind::Snorm,        SIB),
    info(DataFormat::R16Uint,              "r16_uint",    16,  1, ChannelKind::Uint,         SIB),
    info(DataFormat::R16Sint,              "r16_int",     16,  1, ChannelKind::Sint,         SIB),
    info(DataFormat::R16Float,             "r16f",        16,  1, ChannelKind::Float,        SIB),
    info(DataFormat::Rg16Unorm,            "rg16",        32,  2, ChannelKind::Unorm,        SIB),
    info(DataFormat::Rg16Snorm,            "rg16_snorm",  32,  2, ChannelKind::Snorm,        SIB),
    info(DataFormat::Rg16Uint,             "rg16_uint",   32,  2, ChannelKind::Uint,         SIB),
    info(DataFormat::Rg16Sint,             "rg16_int",    32,  2, ChannelKind::Sint,         SIB),
    info(DataFormat::Rg16Float,            "rg16f",       32,  2, ChannelKind::Float,        SIB),
    info(DataFormat::Rgba16Unorm,          "rgba16",      64,  4, ChannelKind::Unorm,        SIB),
    info(DataFormat::Rgba16Snorm,          "rgba16_snorm",64,  4, ChannelKind::Snorm,        SIB),
    info(DataFormat::Rgba16Uint,           "rgba16_uint", 64,  4, ChannelKind::Uint,         SIB),
    info(DataFormat::Rgba16Sint,           "rgba16_int",  64,  4, ChannelKind::Sint,         SIB),
    info(DataFormat::Rgba16Float,          "rgba16f",     64,  4, ChannelKind::Float,        SIB),

    info(DataFormat::R32Uint,              "r32_uint",    32,  1, ChannelKind::Uint,         SIB),
    info(DataFormat::R32Sint,              "r32_int",     32,  1, ChannelKind::Sint,         SIB),
    info(DataFormat::R32Float,             "r32f",        32,  1, ChannelKind::Float,        SIB),
    info(DataFormat::Rg32Uint,             "rg32_uint",   64,  2, ChannelKind::Uint,         SIB),
    info(DataFormat::Rg32Sint,             "rg32_int",    64,  2, ChannelKind::Sint,         SIB),
    info(DataFormat::Rg32Float,            "rg32f",       64,  2, ChannelKind::Float,        SIB),
    info(DataFormat::Rgb32Uint,            "rgb32_uint",  96,  3, ChannelKind::Uint,         IB ),
    info(DataFormat::Rgb32Sint,            "rgb32_int",   96,  3, ChannelKind::Sint,         IB ),
    info(DataFormat::Rgb32Float,           "rgb32f",      96,  3, ChannelKind::Float,        IB ),
    info(DataFormat::Rgba32Uint,           "rgba32_uint", 128, 4, ChannelKind::Uint,         SIB),
    info(DataFormat::Rgba32Sint,           "rgba32_int",  128, 4, ChannelKind::Sint,         SIB),
    info(DataFormat::Rgba32Float,          "rgba32f",     128, 4, ChannelKind::Float,        SIB),

    info(DataFormat::Rgb10a2Unorm,         "rgb10a2",     32,  4, ChannelKind::Unorm,        SIB),
    info(DataFormat::Rg11b10Float,         "r11g11b10f",  32,  3, ChannelKind::Float,        SI ),

    info(DataFormat::Depth16Unorm,         "d16",         16,  1, ChannelKind::Depth,        I  ),
    info(DataFormat::Depth32Float,         "d32f",        32,  1, ChannelKind::Depth,        I  ),
    info(DataFormat::Depth24UnormStencil8, "d24s8",       32,  2, ChannelKind::DepthStencil, NONE),

    info(DataFormat::Bc1Unorm,             "bc1",         4,   4, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc2Unorm,             "bc2",         8,   4, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc3Unorm,             "bc3",         8,   4, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc4Unorm,             "bc4",         4,   1, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc5Unorm,             "bc5",         8,   2, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc6hFloat,            "bc6h",        8,   3, ChannelKind::Compressed,   I  ),
    info(DataFormat::Bc7Unorm,             "bc7",         8,   4, ChannelKind::Compressed,   I  ),
];

/// alternative spellings accepted by [`DataFormat::from_name`]
const ALIASES: &[(&str, DataFormat)] = &[
    ("rgba8_unorm", DataFormat::Rgba8Unorm),
    ("rgba8_srgb", DataFormat::Rgba8Srgb),
    ("srgb8_alpha8", DataFormat::Rgba8Srgb),
    ("r32_float", DataFormat::R32Float),
    ("rg32_float", DataFormat::Rg32Float),
    ("rgb32_float", DataFormat::Rgb32Float),
    ("rgba32_float", DataFormat::Rgba32Float),
    ("r11g11b10_float", DataFormat::Rg11b10Float),
];

impl DataFormat {
    /// the static properties of `self`
    pub fn info(self) -> &'static FormatInfo {
        FORMATS
            .iter()
            .find(|info| info.format == self)
            .unwrap_or_else(|| unreachable!("every `DataFormat` has an entry in `FORMATS`"))
    }

    /// resolves the value of a `format=` attribute, case-insensitively
    pub fn from_name(name: &str) -> Option<DataFormat> {
        let name = name.trim();
        FORMATS
            .iter()
            .find(|info| info.name.eq_ignore_ascii_case(name))
            .map(|info| info.format)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                    .map(|(_, format)| *format)
            })
    }

    pub fn name(self) -> &'static str { self.info().name }

    pub fn bits_per_pixel(self) -> u32 { self.info().bits_per_pixel }

    pub fn byte_size(self) -> u64 { (self.bits_per_pixel() / 8) as u64 }

    pub fn channel_kind(self) -> ChannelKind { self.info().channel_kind }

    /// whether `self` may be the format of a `uav` image or writable buffer
    pub fn is_storage_legal(self) -> bool { self.info().features.contains(FormatFeatures::STORAGE) }

    /// whether `self` may be the format of a `nosampler` image
    pub fn is_shader_image_legal(self) -> bool { self.info().features.contains(FormatFeatures::SHADER_IMAGE) }

    /// whether `self` may be the element format of a typed buffer or a vertex attribute
    pub fn is_buffer_legal(self) -> bool { self.info().features.contains(FormatFeatures::BUFFER) }

    /// the 32 bit per channel format a scalar or vector of `len` components
    /// of `scalar` is stored as. `bool` has no gpu format.
    pub fn for_vector(scalar: ScalarType, len: Len) -> Option<DataFormat> {
        use DataFormat as F;
        use Len::*;
        use ScalarType as ST;
        Some(match (scalar, len) {
            (ST::Float, X1) => F::R32Float,
            (ST::Float, X2) => F::Rg32Float,
            (ST::Float, X3) => F::Rgb32Float,
            (ST::Float, X4) => F::Rgba32Float,
            (ST::Int, X1) => F::R32Sint,
            (ST::Int, X2) => F::Rg32Sint,
            (ST::Int, X3) => F::Rgb32Sint,
            (ST::Int, X4) => F::Rgba32Sint,
            (ST::Uint, X1) => F::R32Uint,
            (ST::Uint, X2) => F::Rg32Uint,
            (ST::Uint, X3) => F::Rgb32Uint,
            (ST::Uint, X4) => F::Rgba32Uint,
            (ST::Bool, _) => return None,
        })
    }
}

impl Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}
