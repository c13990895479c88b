use std::{fmt::Display, num::NonZeroU32};

/// number of components of a vector, or number of rows of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Len {
    X1,
    X2,
    X3,
    X4,
}

impl Len {
    pub const ALL: [Len; 4] = [Len::X1, Len::X2, Len::X3, Len::X4];

    /// the names members of builtin vectors (and columns of builtin matrices) get
    pub const COMPONENT_NAMES: [&'static str; 4] = ["x", "y", "z", "w"];

    pub const fn as_u32(self) -> u32 {
        match self {
            Len::X1 => 1,
            Len::X2 => 2,
            Len::X3 => 3,
            Len::X4 => 4,
        }
    }

    pub const fn from_u32(n: u32) -> Option<Len> {
        Some(match n {
            1 => Len::X1,
            2 => Len::X2,
            3 => Len::X3,
            4 => Len::X4,
            _ => return None,
        })
    }

    /// the component names of a vector of length `self`
    pub fn component_names(self) -> &'static [&'static str] { &Self::COMPONENT_NAMES[..self.as_u32() as usize] }
}

impl From<Len> for u32 {
    fn from(value: Len) -> Self { value.as_u32() }
}

impl From<Len> for u64 {
    fn from(value: Len) -> Self { value.as_u32() as u64 }
}

impl From<Len> for NonZeroU32 {
    fn from(value: Len) -> Self { NonZeroU32::new(value.as_u32()).unwrap_or(NonZeroU32::MIN) }
}

impl Display for Len {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.as_u32()) }
}

/// the scalar kinds of the shading language. all of them are 32 bit wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarType {
    Bool,
    Int,
    Uint,
    Float,
}

impl ScalarType {
    pub const ALL: [ScalarType; 4] = [ScalarType::Bool, ScalarType::Int, ScalarType::Uint, ScalarType::Float];

    pub const fn name(self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Uint => "uint",
            ScalarType::Float => "float",
        }
    }

    pub fn from_name(name: &str) -> Option<ScalarType> { Self::ALL.into_iter().find(|s| s.name() == name) }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.name()) }
}
