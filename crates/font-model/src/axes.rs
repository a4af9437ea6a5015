//! Variation axes (`fvar`).

use std::{cell::RefCell, rc::Rc};

use read_fonts::types::{Fixed, Tag};
use write_fonts::tables::fvar::{Fvar, VariationAxisRecord};

/// An axis table that may be referenced by several fonts of a collection.
///
/// Two fonts share an axis table exactly when their handles point to the same
/// allocation (`Rc::ptr_eq`). Edits through one handle are visible through
/// every other handle.
pub type SharedAxisTable = Rc<RefCell<VariationAxisTable>>;

/// Design-space description of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationAxis {
    pub tag: Tag,
    pub min_value: f64,
    pub default_value: f64,
    pub max_value: f64,
}

impl VariationAxis {
    pub fn new(tag: Tag, min_value: f64, default_value: f64, max_value: f64) -> Self {
        Self { tag, min_value, default_value, max_value }
    }

    /// Whether `value` lies inside the axis range.
    pub fn contains(&self, value: f64) -> bool {
        (self.min_value..=self.max_value).contains(&value)
    }
}

impl From<&VariationAxisRecord> for VariationAxis {
    fn from(record: &VariationAxisRecord) -> Self {
        Self {
            tag: record.axis_tag,
            min_value: record.min_value.to_f64(),
            default_value: record.default_value.to_f64(),
            max_value: record.max_value.to_f64(),
        }
    }
}

/// The axes of a variable font plus its named instances.
///
/// Only axis default values are editable; everything else in `fvar`
/// (flags, name ids, instances) is carried through as read.
#[derive(Debug, Clone)]
pub struct VariationAxisTable {
    fvar: Fvar,
    modified: bool,
}

impl VariationAxisTable {
    /// A table with the given axes and no named instances.
    pub fn new(axes: impl IntoIterator<Item = VariationAxis>) -> Self {
        let mut fvar = Fvar::default();
        fvar.axis_instance_arrays.axes.extend(axes.into_iter().map(|axis| VariationAxisRecord {
            axis_tag: axis.tag,
            min_value: Fixed::from_f64(axis.min_value),
            default_value: Fixed::from_f64(axis.default_value),
            max_value: Fixed::from_f64(axis.max_value),
            ..Default::default()
        }));
        Self { fvar, modified: false }
    }

    pub(crate) fn from_fvar(fvar: Fvar) -> Self {
        Self { fvar, modified: false }
    }

    /// Wrap this table in a handle that can be shared between fonts.
    pub fn into_shared(self) -> SharedAxisTable {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.fvar.axis_instance_arrays.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn axes(&self) -> impl Iterator<Item = VariationAxis> + '_ {
        self.fvar.axis_instance_arrays.axes.iter().map(VariationAxis::from)
    }

    pub fn axis(&self, tag: Tag) -> Option<VariationAxis> {
        self.record(tag).map(VariationAxis::from)
    }

    pub fn default_value(&self, tag: Tag) -> Option<f64> {
        self.record(tag).map(|record| record.default_value.to_f64())
    }

    /// Set the default of axis `tag`. Returns `false` if there is no such axis.
    pub fn set_default_value(&mut self, tag: Tag, value: f64) -> bool {
        let Some(record) =
            self.fvar.axis_instance_arrays.axes.iter_mut().find(|record| record.axis_tag == tag)
        else {
            return false;
        };
        record.default_value = Fixed::from_f64(value);
        self.modified = true;
        true
    }

    /// Whether any default value was set since the table was loaded.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn fvar(&self) -> &Fvar {
        &self.fvar
    }

    fn record(&self, tag: Tag) -> Option<&VariationAxisRecord> {
        self.fvar.axis_instance_arrays.axes.iter().find(|record| record.axis_tag == tag)
    }
}
