use std::str::FromStr;

use indexmap::IndexMap;
use read_fonts::types::Tag;

use crate::Error;

/// A requested default value for one axis, written `TAG=VALUE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisOverride {
    pub tag: Tag,
    pub value: f64,
}

impl AxisOverride {
    pub fn new(tag: Tag, value: f64) -> Self {
        Self { tag, value }
    }
}

impl FromStr for AxisOverride {
    type Err = Error;

    /// Tags shorter than four characters are padded with spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidOverride(s.to_owned());

        let (tag, value) = s.split_once('=').ok_or_else(invalid)?;
        let tag = Tag::new_checked(tag.trim().as_bytes()).map_err(|_| invalid())?;
        let value: f64 = value.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }

        Ok(Self { tag, value })
    }
}

/// Axis defaults to apply, in the order given; a repeated tag keeps its first
/// position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisOverrides(IndexMap<Tag, f64>);

impl AxisOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: Tag, value: f64) -> Option<f64> {
        self.0.insert(tag, value)
    }

    pub fn get(&self, tag: Tag) -> Option<f64> {
        self.0.get(&tag).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, f64)> + '_ {
        self.0.iter().map(|(tag, value)| (*tag, *value))
    }

    /// Parse every `TAG=VALUE` argument, failing on the first invalid one.
    pub fn parse_all<I, S>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        args.into_iter().map(|arg| arg.as_ref().parse::<AxisOverride>()).collect()
    }
}

impl FromIterator<AxisOverride> for AxisOverrides {
    fn from_iter<T: IntoIterator<Item = AxisOverride>>(iter: T) -> Self {
        Self(iter.into_iter().map(|o| (o.tag, o.value)).collect())
    }
}

impl<const N: usize> From<[(&[u8; 4], f64); N]> for AxisOverrides {
    fn from(pairs: [(&[u8; 4], f64); N]) -> Self {
        Self(pairs.into_iter().map(|(tag, value)| (Tag::new(tag), value)).collect())
    }
}
