//! Crate-wide error type. Every failure aborts the batch run; nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("variable '{variable}' not found in {}", path.display())]
    MissingVariable { path: PathBuf, variable: String },

    #[error("field '{name}' has {expected} cells for shape {shape:?} but {actual} values were read")]
    Shape {
        name: String,
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("file name is not valid UTF-8: {}", path.display())]
    InvalidFileName { path: PathBuf },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unresolved placeholder '{{{placeholder}}}' in config value '{template}'")]
    ConfigTemplate { template: String, placeholder: String },

    #[cfg(feature = "netcdf")]
    #[error("netcdf error on {}: {source}", path.display())]
    Netcdf {
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },
}

impl Error {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
