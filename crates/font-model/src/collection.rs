//! Font collections and the single-or-collection file wrapper.

use std::rc::Rc;

use crate::{Error, Result, font::Font};

/// The fonts of a TrueType/OpenType collection, in file order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    members: Vec<Font>,
}

impl Collection {
    pub fn new(members: Vec<Font>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Font] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Font] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Font> {
        self.members.get(index)
    }

    /// Whether members `a` and `b` reference one axis table.
    pub fn axes_shared(&self, a: usize, b: usize) -> bool {
        match (self.members.get(a), self.members.get(b)) {
            (Some(first), Some(second)) => first.shares_axes_with(second),
            _ => false,
        }
    }

    /// Member indices grouped by the axis table they reference.
    ///
    /// Only groups of two or more members are returned, each in ascending
    /// order, ordered by their first member.
    pub fn shared_axis_groups(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (index, font) in self.members.iter().enumerate() {
            let Some(axes) = font.variation_axes() else {
                continue;
            };
            match groups.iter_mut().find(|group| {
                self.members[group[0]].variation_axes().is_some_and(|other| Rc::ptr_eq(axes, other))
            }) {
                Some(group) => group.push(index),
                None => groups.push(vec![index]),
            }
        }
        groups.retain(|group| group.len() > 1);
        groups
    }
}

impl FromIterator<Font> for Collection {
    fn from_iter<T: IntoIterator<Item = Font>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The content of a font file.
#[derive(Debug, Clone)]
pub enum FontFile {
    Single(Font),
    Collection(Collection),
}

impl FontFile {
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// All fonts in the file.
    pub fn fonts(&self) -> &[Font] {
        match self {
            Self::Single(font) => std::slice::from_ref(font),
            Self::Collection(collection) => collection.members(),
        }
    }

    /// The font of a single-font file.
    pub fn into_single(self) -> Result<Font> {
        match self {
            Self::Single(font) => Ok(font),
            Self::Collection(collection) => Err(Error::ExpectedSingleFont(collection.len())),
        }
    }
}

impl From<Font> for FontFile {
    fn from(font: Font) -> Self {
        Self::Single(font)
    }
}

impl From<Collection> for FontFile {
    fn from(collection: Collection) -> Self {
        Self::Collection(collection)
    }
}
