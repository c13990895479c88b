use std::fmt::Display;

use smallvec::SmallVec;

use super::CanonName;

/// where in the shader source a declaration was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub const fn new(line: u32, column: u32) -> Self { Self { line, column } }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.line, self.column) }
}

/// a `key` or `key=value` attribute, already tokenized by the front end
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attribute {
    pub key: CanonName,
    pub value: Option<CanonName>,
}

impl Attribute {
    /// an attribute without value, e.g. `uav`
    pub fn flag(key: impl Into<CanonName>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// an attribute with value, e.g. `format=rgba8`
    pub fn with_value(key: impl Into<CanonName>, value: impl Into<CanonName>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// the attributes of a declaration in source order.
///
/// equality is order sensitive, use [`AttributeList::canonical`] to compare
/// attribute *sets*.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributeList(SmallVec<[Attribute; 4]>);

impl AttributeList {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, attribute: Attribute) { self.0.push(attribute) }

    /// builder style [`AttributeList::push`]
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.push(attribute);
        self
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> + Clone { self.0.iter() }

    /// the first attribute with key `key`
    pub fn get(&self, key: &str) -> Option<&Attribute> { self.0.iter().find(|a| &*a.key == key) }

    pub fn has(&self, key: &str) -> bool { self.get(key).is_some() }

    /// the value of the first attribute with key `key`.
    ///
    /// `None` if the attribute is missing or was written without value
    pub fn value(&self, key: &str) -> Option<&str> { self.get(key).and_then(|a| a.value.as_deref()) }

    /// the first key that is written twice with different values, together
    /// with both spellings in source order
    pub fn first_conflict(&self) -> Option<(&Attribute, &Attribute)> {
        self.0.iter().enumerate().find_map(|(i, a)| {
            self.0[i + 1..]
                .iter()
                .find(|b| b.key == a.key && b.value != a.value)
                .map(|b| (a, b))
        })
    }

    /// the attributes sorted by key and value with exact duplicates removed.
    ///
    /// two declarations whose canonical attribute lists are equal mean the same thing.
    pub fn canonical(&self) -> AttributeList {
        let mut sorted = self.0.clone();
        sorted.sort();
        sorted.dedup();
        AttributeList(sorted)
    }
}

impl FromIterator<Attribute> for AttributeList {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self { AttributeList(iter.into_iter().collect()) }
}

impl<const N: usize> From<[Attribute; N]> for AttributeList {
    fn from(attributes: [Attribute; N]) -> Self { attributes.into_iter().collect() }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl Display for AttributeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, attribute) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{attribute}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup() {
        let list = AttributeList::from([Attribute::flag("uav"), Attribute::with_value("format", "rgba8")]);
        assert!(list.has("uav"));
        assert!(!list.has("sampler"));
        assert_eq!(list.value("format"), Some("rgba8"));
        assert_eq!(list.value("uav"), None);
        assert_eq!(list.to_string(), "[uav, format=rgba8]");
    }

    #[test]
    fn canonical_ignores_order_and_duplicates() {
        let a = AttributeList::from([Attribute::flag("uav"), Attribute::with_value("format", "rgba8")]);
        let b = AttributeList::from([
            Attribute::with_value("format", "rgba8"),
            Attribute::flag("uav"),
            Attribute::flag("uav"),
        ]);
        assert_ne!(a, b);
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn conflicts_keep_source_order() {
        let list = AttributeList::from([
            Attribute::with_value("format", "rgba8"),
            Attribute::flag("uav"),
            Attribute::flag("uav"),
            Attribute::with_value("format", "r32f"),
        ]);
        let (first, second) = list.first_conflict().unwrap();
        assert_eq!((first.to_string(), second.to_string()), ("format=rgba8".into(), "format=r32f".into()));
        assert_eq!(list.canonical().first_conflict().map(|(a, _)| a.to_string()), Some("format=r32f".into()));
        // exact repetitions are not conflicts
        assert!(AttributeList::from([Attribute::flag("uav"), Attribute::flag("uav")]).first_conflict().is_none());
    }
}
