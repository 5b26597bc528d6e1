//! Gridded-dataset persistence.
//!
//! The batch pipeline only talks to [GridStore]; the NetCDF-4 backend lives behind the
//! `netcdf` cargo feature because it links the system libnetcdf.

#[cfg(feature = "netcdf")]
mod netcdf_io;

#[cfg(feature = "netcdf")]
pub use netcdf_io::NetcdfStore;

use std::path::Path;

use crate::dataset::Dataset;
use crate::error::Result;

pub trait GridStore {
    /// Load `variable` (CF-decoded) together with the coordinate system it lives on.
    /// A file without `variable` is an [Error::MissingVariable](crate::Error::MissingVariable).
    fn load(&self, path: &Path, variable: &str) -> Result<Dataset>;

    /// Write a fully materialized dataset, replacing any existing file at `path`.
    fn save(&self, path: &Path, dataset: &Dataset) -> Result<()>;
}
