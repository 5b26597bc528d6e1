//! Shared fixtures: a JSON-file [GridStore] so pipeline tests run without libnetcdf.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use productivity_loss::dataset::{Dataset, Dimension, Field};
use productivity_loss::store::GridStore;
use productivity_loss::{Error, Result};

pub struct JsonStore;

fn invalid(path: &Path, err: serde_json::Error) -> Error {
    Error::Io {
        action: "failed to decode dataset",
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, err),
    }
}

impl GridStore for JsonStore {
    fn load(&self, path: &Path, variable: &str) -> Result<Dataset> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            action: "failed to open",
            path: path.to_path_buf(),
            source,
        })?;
        let mut ds: Dataset = serde_json::from_str(&raw).map_err(|e| invalid(path, e))?;
        if ds.variable(variable).is_none() {
            return Err(Error::MissingVariable {
                path: path.to_path_buf(),
                variable: variable.to_string(),
            });
        }
        ds.vars.retain(|(name, _)| name == variable);
        Ok(ds)
    }

    fn save(&self, path: &Path, dataset: &Dataset) -> Result<()> {
        let raw = serde_json::to_string_pretty(dataset).map_err(|e| invalid(path, e))?;
        fs::write(path, raw).map_err(|source| Error::Io {
            action: "failed to write",
            path: path.to_path_buf(),
            source,
        })
    }
}

/// time x lat x lon grid of WBGT values spanning the heat-stress range.
pub fn wbgt_dataset(year: u32) -> Dataset {
    let (nt, ny, nx) = (4, 2, 3);
    let mut ds = Dataset::default();
    ds.dims = vec![
        Dimension {
            name: "time".into(),
            len: nt,
        },
        Dimension {
            name: "lat".into(),
            len: ny,
        },
        Dimension {
            name: "lon".into(),
            len: nx,
        },
    ];

    let mut time = Field::new(
        vec!["time".into()],
        ArrayD::from_shape_vec(IxDyn(&[nt]), (0..nt).map(|h| h as f64).collect()).unwrap(),
    );
    time.attrs
        .set("units", format!("hours since {year}-01-01 00:00:00"));
    time.attrs.set("calendar", "proleptic_gregorian");
    let mut lat = Field::new(
        vec!["lat".into()],
        ArrayD::from_shape_vec(IxDyn(&[ny]), vec![-33.9, -12.4]).unwrap(),
    );
    lat.attrs.set("units", "degrees_north");
    let mut lon = Field::new(
        vec!["lon".into()],
        ArrayD::from_shape_vec(IxDyn(&[nx]), vec![115.9, 130.8, 151.2]).unwrap(),
    );
    lon.attrs.set("units", "degrees_east");
    ds.coords = vec![("time".into(), time), ("lat".into(), lat), ("lon".into(), lon)];

    let values: Vec<f64> = (0..nt * ny * nx)
        .map(|i| 20.0 + i as f64 + (year % 10) as f64 * 0.1)
        .collect();
    let mut wbgt = Field::new(
        vec!["time".into(), "lat".into(), "lon".into()],
        ArrayD::from_shape_vec(IxDyn(&[nt, ny, nx]), values).unwrap(),
    );
    wbgt.attrs.set("units", "degC");
    wbgt.attrs.set("long_name", "Adjusted wet bulb globe temperature");
    ds.vars = vec![("wbgtAdjust".into(), wbgt)];
    ds.attrs.set("title", "bias-adjusted WBGT");
    ds
}

pub fn write_input(store: &impl GridStore, dir: &Path, name: &str, year: u32) {
    store
        .save(&dir.join(name), &wbgt_dataset(year))
        .expect("fixture should be written");
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("directory should be readable")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
