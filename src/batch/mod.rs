//! Batch pipeline: every `wbgtAdjust_*.nc` in an input directory becomes a
//! `productivityLoss_*.nc` in the output directory with one loss layer per exertion class.
//!
//! Files are processed one at a time in file-name order. The first failure aborts the run;
//! outputs already written are left in place.

pub mod naming;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::damage::{damage_field, ExertionClass};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::store::GridStore;

pub use naming::{
    discover_inputs, is_input_file_name, output_file_name, output_path_for, INPUT_VARIABLE,
    OUTPUT_TOKEN,
};

pub const TITLE: &str = "Hourly labour productivity damage due to humid heat stress";
pub const SOURCE: &str = "WBGT bias-adjusted input, IGR damage function";
pub const UNITS: &str = "change in labour productivity";
pub const REFERENCES: &str =
    "Roson & Sartori (2016); ILO (2019); Kjellstrom et al. (2009); Kompas et al (2018)";
/// Units of each loss layer: a dimensionless fraction.
pub const LOSS_UNITS: &str = "1";

/// One input/output directory pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
}

/// Build the three-layer loss dataset from a loaded input. `source` only labels errors.
pub fn compute_productivity_loss(input: &Dataset, source: &Path) -> Result<Dataset> {
    let wbgt = input
        .variable(INPUT_VARIABLE)
        .ok_or_else(|| Error::MissingVariable {
            path: source.to_path_buf(),
            variable: INPUT_VARIABLE.to_string(),
        })?;

    let non_finite = wbgt.non_finite_count();
    if non_finite > 0 {
        debug!(file = %source.display(), cells = non_finite, "non-finite WBGT cells propagate as NaN");
    }

    let mut out = Dataset::with_coords_of(input);
    for class in ExertionClass::ALL {
        let mut field = wbgt.with_data(damage_field(&wbgt.data, class.params()));
        field.attrs.set("long_name", class.long_name());
        field.attrs.set("units", LOSS_UNITS);
        if let Some(aux) = wbgt.attrs.get("coordinates") {
            field.attrs.set("coordinates", aux.clone());
        }
        out.insert_variable(class.variable_name(), field);
    }

    out.attrs.set("title", TITLE);
    out.attrs.set("source", SOURCE);
    out.attrs.set("units", UNITS);
    out.attrs.set("references", REFERENCES);
    Ok(out)
}

/// Load, transform and write a single file.
pub fn process_file<S: GridStore>(store: &S, input: &Path, output: &Path) -> Result<()> {
    let display_name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.display().to_string())
    };
    info!("Processing {}", display_name(input));

    let dataset = store.load(input, INPUT_VARIABLE)?;
    let loss = compute_productivity_loss(&dataset, input)?;
    drop(dataset);
    store.save(output, &loss)?;

    info!("Written {}", display_name(output));
    Ok(())
}

/// Run the pipeline over one directory pair. An empty match list is a silent no-op.
pub fn run_batch<S: GridStore>(store: &S, config: &BatchConfig) -> Result<BatchReport> {
    fs::create_dir_all(&config.output_dir)
        .map_err(|e| Error::io("failed to create output directory", &config.output_dir, e))?;

    let mut report = BatchReport::default();
    for input in discover_inputs(&config.input_dir)? {
        let output = output_path_for(&input, &config.output_dir)?;
        process_file(store, &input, &output)?;
        report.processed.push(ProcessedFile { input, output });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use ndarray::{ArrayD, IxDyn};

    use super::*;
    use crate::dataset::{AttrValue, Dimension, Field};

    fn input_dataset() -> Dataset {
        let mut ds = Dataset::default();
        ds.dims = vec![Dimension {
            name: "time".into(),
            len: 3,
        }];
        let time = Field::new(
            vec!["time".into()],
            ArrayD::from_shape_vec(IxDyn(&[3]), vec![0.0, 1.0, 2.0]).unwrap(),
        );
        ds.coords.push(("time".into(), time.clone()));
        let mut wbgt = time.with_data(
            ArrayD::from_shape_vec(IxDyn(&[3]), vec![32.5, 33.5, 35.5]).unwrap(),
        );
        wbgt.attrs.set("units", "degC");
        ds.insert_variable(INPUT_VARIABLE, wbgt);
        ds
    }

    #[test]
    fn output_has_three_annotated_layers_on_input_coordinates() {
        let input = input_dataset();
        let out = compute_productivity_loss(&input, Path::new("wbgtAdjust_2020.nc")).unwrap();

        assert_eq!(
            out.variable_names(),
            vec![
                "productivity_loss_low",
                "productivity_loss_medium",
                "productivity_loss_high"
            ]
        );
        assert_eq!(out.dims, input.dims);
        assert_eq!(out.coords, input.coords);
        for (name, field) in &out.vars {
            assert_eq!(field.dims, vec!["time".to_string()], "{name}");
            assert_eq!(field.attrs.get("units").and_then(AttrValue::as_str), Some("1"));
            assert_eq!(field.attrs.len(), 2, "{name} carries only long_name and units");
        }
        assert_eq!(out.attrs.get("title").and_then(AttrValue::as_str), Some(TITLE));
        assert_eq!(out.attrs.get("units").and_then(AttrValue::as_str), Some(UNITS));
        assert!(out
            .attrs
            .get("references")
            .and_then(AttrValue::as_str)
            .is_some_and(|r| r.contains("Kjellstrom")));
    }

    #[test]
    fn each_layer_is_half_at_its_own_omega() {
        let out =
            compute_productivity_loss(&input_dataset(), Path::new("wbgtAdjust_2020.nc")).unwrap();
        let at = |name: &str, i: usize| out.variable(name).unwrap().data[[i]];
        assert!((at("productivity_loss_high", 0) - 0.5).abs() < 1e-12);
        assert!((at("productivity_loss_medium", 1) - 0.5).abs() < 1e-12);
        assert!((at("productivity_loss_low", 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn auxiliary_coordinates_are_carried_to_every_layer() {
        let mut input = input_dataset();
        let height = Field::new(
            Vec::new(),
            ArrayD::from_shape_vec(IxDyn(&[]), vec![2.0]).unwrap(),
        );
        input.coords.push(("height".into(), height));
        input.vars[0].1.attrs.set("coordinates", "height");

        let out = compute_productivity_loss(&input, Path::new("wbgtAdjust_2020.nc")).unwrap();
        assert_eq!(out.coords, input.coords);
        for (name, field) in &out.vars {
            assert_eq!(
                field.attrs.get("coordinates").and_then(AttrValue::as_str),
                Some("height"),
                "{name}"
            );
        }
    }

    #[test]
    fn missing_input_variable_is_a_data_error() {
        let mut ds = input_dataset();
        ds.vars.clear();
        let err = compute_productivity_loss(&ds, Path::new("wbgtAdjust_2020.nc")).unwrap_err();
        assert!(matches!(err, Error::MissingVariable { ref variable, .. } if variable == INPUT_VARIABLE));
    }
}
