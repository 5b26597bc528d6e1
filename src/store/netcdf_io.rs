//! NetCDF-4 backend. Values are read and written as f64; the C library converts from the
//! on-disk storage type on read.

use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use netcdf::types::{IntType, NcVariableType};
use netcdf::AttributeValue;
use tracing::debug;

use super::GridStore;
use crate::dataset::{decode_cf, AttrValue, Attributes, Dataset, Dimension, Field};
use crate::error::{Error, Result};

const COORDINATES_ATTR: &str = "coordinates";
const FILL_VALUE_ATTR: &str = "_FillValue";

#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfStore;

impl NetcdfStore {
    pub fn new() -> Self {
        Self
    }
}

fn nc_err(path: &Path) -> impl Fn(netcdf::Error) -> Error + Copy + '_ {
    move |source| Error::Netcdf {
        path: path.to_path_buf(),
        source,
    }
}

fn from_nc(value: AttributeValue) -> Option<AttrValue> {
    let converted = match value {
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Schar(v) => AttrValue::Int(v.into()),
        AttributeValue::Uchar(v) => AttrValue::Int(v.into()),
        AttributeValue::Short(v) => AttrValue::Int(v.into()),
        AttributeValue::Ushort(v) => AttrValue::Int(v.into()),
        AttributeValue::Int(v) => AttrValue::Int(v.into()),
        AttributeValue::Uint(v) => AttrValue::Int(v.into()),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Schars(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Uchars(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Shorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ushorts(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Ints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Uints(v) => AttrValue::Ints(v.into_iter().map(i64::from).collect()),
        AttributeValue::Longlongs(v) => AttrValue::Ints(v),
        AttributeValue::Float(v) => AttrValue::Float(v.into()),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Floats(v) => AttrValue::Floats(v.into_iter().map(f64::from).collect()),
        AttributeValue::Doubles(v) => AttrValue::Floats(v),
        // unsigned 64-bit and string-array attributes have no lossless mapping
        _ => return None,
    };
    Some(converted)
}

fn to_nc(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Text(s) => AttributeValue::Str(s.clone()),
        AttrValue::Int(v) => AttributeValue::Longlong(*v),
        AttrValue::Ints(v) => AttributeValue::Longlongs(v.clone()),
        AttrValue::Float(v) => AttributeValue::Double(*v),
        AttrValue::Floats(v) => AttributeValue::Doubles(v.clone()),
    }
}

fn read_attributes<'a>(
    path: &Path,
    owner: &str,
    attrs: impl Iterator<Item = netcdf::Attribute<'a>>,
) -> Result<Attributes> {
    let mut out = Attributes::new();
    for attr in attrs {
        let value = attr.value().map_err(nc_err(path))?;
        match from_nc(value) {
            Some(value) => out.set(attr.name(), value),
            None => debug!(owner, attribute = attr.name(), "skipping unsupported attribute type"),
        }
    }
    Ok(out)
}

/// Width of the on-disk integer type; `None` for floating-point and non-numeric variables.
fn integer_bits(var: &netcdf::Variable<'_>) -> Option<u32> {
    match var.vartype() {
        NcVariableType::Int(IntType::I8 | IntType::U8) => Some(8),
        NcVariableType::Int(IntType::I16 | IntType::U16) => Some(16),
        NcVariableType::Int(IntType::I32 | IntType::U32) => Some(32),
        NcVariableType::Int(IntType::I64 | IntType::U64) => Some(64),
        _ => None,
    }
}

fn is_numeric(var: &netcdf::Variable<'_>) -> bool {
    matches!(
        var.vartype(),
        NcVariableType::Int(_) | NcVariableType::Float(_)
    )
}

fn read_field(path: &Path, var: &netcdf::Variable<'_>) -> Result<Field> {
    let name = var.name();
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let values: Vec<f64> = var.get_values::<f64, _>(..).map_err(nc_err(path))?;

    let expected: usize = shape.iter().product();
    let actual = values.len();
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| Error::Shape {
        name: name.clone(),
        shape: shape.clone(),
        expected,
        actual,
    })?;

    let mut field = Field::new(dims, data);
    field.attrs = read_attributes(path, &name, var.attributes())?;
    Ok(field)
}

fn write_field(
    file: &mut netcdf::FileMut,
    path: &Path,
    name: &str,
    field: &Field,
    default_fill: Option<f64>,
) -> Result<()> {
    let dims: Vec<&str> = field.dims.iter().map(String::as_str).collect();
    let mut var = file.add_variable::<f64>(name, &dims).map_err(nc_err(path))?;

    let mut fill = default_fill;
    for (attr, value) in field.attrs.iter() {
        if attr == FILL_VALUE_ATTR {
            // stored as f64, so the sentinel must be too
            fill = value.as_f64();
            continue;
        }
        var.put_attribute(attr, to_nc(value)).map_err(nc_err(path))?;
    }
    if let Some(fill) = fill {
        var.set_fill_value(fill).map_err(nc_err(path))?;
    }

    if field.data.is_empty() {
        return Ok(());
    }
    match field.data.as_slice() {
        Some(values) => var.put_values(values, ..),
        None => {
            let values: Vec<f64> = field.data.iter().copied().collect();
            var.put_values(&values, ..)
        }
    }
    .map_err(nc_err(path))?;
    Ok(())
}

impl GridStore for NetcdfStore {
    fn load(&self, path: &Path, variable: &str) -> Result<Dataset> {
        let file = netcdf::open(path).map_err(nc_err(path))?;
        let var = file
            .variable(variable)
            .ok_or_else(|| Error::MissingVariable {
                path: path.to_path_buf(),
                variable: variable.to_string(),
            })?;

        let mut field = read_field(path, &var)?;
        decode_cf(&mut field, integer_bits(&var));

        // Dimension coordinates for every file dimension, then auxiliary coordinates the
        // variable names in its `coordinates` attribute.
        let mut coord_names: Vec<String> = file
            .dimensions()
            .map(|d| d.name())
            .filter(|d| file.variable(d).is_some())
            .collect();
        if let Some(aux) = field.attrs.get(COORDINATES_ATTR).and_then(AttrValue::as_str) {
            for name in aux.split_whitespace() {
                if name != variable && !coord_names.iter().any(|c| c == name) {
                    coord_names.push(name.to_string());
                }
            }
        }

        let mut coords = Vec::with_capacity(coord_names.len());
        for name in coord_names {
            let Some(coord_var) = file.variable(&name) else {
                debug!(path = %path.display(), coordinate = %name, "listed coordinate not present");
                continue;
            };
            if !is_numeric(&coord_var) {
                debug!(path = %path.display(), coordinate = %name, "skipping non-numeric coordinate");
                continue;
            }
            coords.push((name, read_field(path, &coord_var)?));
        }

        let used: Vec<&str> = coords
            .iter()
            .flat_map(|(_, f)| f.dims.iter())
            .chain(field.dims.iter())
            .map(String::as_str)
            .collect();
        let dims: Vec<Dimension> = file
            .dimensions()
            .filter(|d| used.contains(&d.name().as_str()))
            .map(|d| Dimension {
                name: d.name(),
                len: d.len(),
            })
            .collect();

        debug!(
            path = %path.display(),
            variable,
            shape = ?field.data.shape(),
            coordinates = coords.len(),
            "loaded"
        );

        Ok(Dataset {
            dims,
            coords,
            vars: vec![(variable.to_string(), field)],
            attrs: read_attributes(path, "<global>", file.attributes())?,
        })
    }

    fn save(&self, path: &Path, dataset: &Dataset) -> Result<()> {
        let mut file = netcdf::create(path).map_err(nc_err(path))?;

        for dim in &dataset.dims {
            file.add_dimension(&dim.name, dim.len)
                .map_err(nc_err(path))?;
        }
        for (name, value) in dataset.attrs.iter() {
            file.add_attribute(name, to_nc(value))
                .map_err(nc_err(path))?;
        }
        for (name, field) in &dataset.coords {
            write_field(&mut file, path, name, field, None)?;
        }
        for (name, field) in &dataset.vars {
            write_field(&mut file, path, name, field, Some(f64::NAN))?;
        }
        Ok(())
    }
}
