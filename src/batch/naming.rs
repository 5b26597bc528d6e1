//! Input discovery and output naming for `wbgtAdjust_*.nc` batches.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Variable read from each input file; also the file-name token that identifies inputs.
pub const INPUT_VARIABLE: &str = "wbgtAdjust";
/// Token that replaces [INPUT_VARIABLE] in output file names.
pub const OUTPUT_TOKEN: &str = "productivityLoss";
pub const FILE_EXTENSION: &str = ".nc";

/// True for names of the form `wbgtAdjust_<anything>.nc`.
pub fn is_input_file_name(name: &str) -> bool {
    name.strip_prefix(INPUT_VARIABLE)
        .and_then(|rest| rest.strip_prefix('_'))
        .is_some_and(|rest| rest.ends_with(FILE_EXTENSION))
}

/// `wbgtAdjust_2020.nc` -> `productivityLoss_2020.nc`. Every occurrence of the token is replaced.
pub fn output_file_name(input_name: &str) -> String {
    input_name.replace(INPUT_VARIABLE, OUTPUT_TOKEN)
}

/// Regular files in `dir` matching [is_input_file_name], sorted by file name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("failed to list input directory", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("failed to list input directory", dir, e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if !is_input_file_name(name) {
            debug!(file = name, "ignoring non-matching entry");
            continue;
        }
        if !path.is_file() {
            debug!(file = name, "ignoring matching entry that is not a regular file");
            continue;
        }
        files.push(path);
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = files.len(), "discovered input files");
    Ok(files)
}

/// Output path in `output_dir` for `input`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidFileName {
            path: input.to_path_buf(),
        })?;
    Ok(output_dir.join(output_file_name(name)))
}
