use std::{borrow::Cow, fmt::Display};

/// canonical name of something, as the front end spelled it.
///
/// used for type names, member names, attribute keys and attribute values.
/// Compares and hashes like the `str` it contains, so name keyed maps can be
/// queried with a plain `&str`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonName(pub Cow<'static, str>);

impl std::ops::Deref for CanonName {
    type Target = str;

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl std::borrow::Borrow<str> for CanonName {
    fn borrow(&self) -> &str { &self.0 }
}

impl From<&'static str> for CanonName {
    fn from(x: &'static str) -> Self { CanonName(x.into()) }
}

impl From<String> for CanonName {
    fn from(x: String) -> Self { CanonName(x.into()) }
}

impl Display for CanonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.pad(&self.0) }
}
