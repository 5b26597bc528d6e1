//! In-memory gridded dataset: named dimensions, coordinate variables, data variables and
//! attribute metadata. Everything is eagerly materialized; there is no lazy backing store.

mod cf;

pub use cf::decode_cf;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// A single attribute value. Numeric attributes of every storage width are widened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Ints(Vec<i64>),
    Float(f64),
    Floats(Vec<f64>),
}

impl AttrValue {
    /// First numeric value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Int(v) => Some(*v as f64),
            Self::Ints(v) => v.first().map(|x| *x as f64),
            Self::Float(v) => Some(*v),
            Self::Floats(v) => v.first().copied(),
        }
    }

    /// All numeric values.
    pub fn as_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Int(v) => vec![*v as f64],
            Self::Ints(v) => v.iter().map(|x| *x as f64).collect(),
            Self::Float(v) => vec![*v],
            Self::Floats(v) => v.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Insertion-ordered attribute list; setting an existing name replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes(Vec<(String, AttrValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

/// A named-axis array with metadata. `dims` has one entry per array axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub dims: Vec<String>,
    pub data: ArrayD<f64>,
    #[serde(default)]
    pub attrs: Attributes,
}

impl Field {
    pub fn new(dims: Vec<String>, data: ArrayD<f64>) -> Self {
        Self {
            dims,
            data,
            attrs: Attributes::new(),
        }
    }

    /// New field over the same axes with different values and no attributes.
    pub fn with_data(&self, data: ArrayD<f64>) -> Self {
        Self::new(self.dims.clone(), data)
    }

    pub fn non_finite_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dims: Vec<Dimension>,
    pub coords: Vec<(String, Field)>,
    pub vars: Vec<(String, Field)>,
    #[serde(default)]
    pub attrs: Attributes,
}

impl Dataset {
    /// Empty dataset sharing `other`'s dimensions and coordinate variables.
    pub fn with_coords_of(other: &Dataset) -> Self {
        Self {
            dims: other.dims.clone(),
            coords: other.coords.clone(),
            vars: Vec::new(),
            attrs: Attributes::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Field> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn coord(&self, name: &str) -> Option<&Field> {
        self.coords.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.vars.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn insert_variable(&mut self, name: impl Into<String>, field: Field) {
        let name = name.into();
        match self.vars.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = field,
            None => self.vars.push((name, field)),
        }
    }

    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dims.iter().find(|d| d.name == name).map(|d| d.len)
    }
}
