//! End-to-end runs against real NetCDF-4 files. Needs `--features netcdf`.

#![cfg(feature = "netcdf")]

mod common;

use std::fs;
use std::process::Command;

use productivity_loss::batch::{run_batch, BatchConfig};
use productivity_loss::damage::{labour_productivity_damage, ExertionClass};
use productivity_loss::dataset::AttrValue;
use productivity_loss::store::{GridStore, NetcdfStore};

use common::{file_names, wbgt_dataset, write_input};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_productivity-loss")
}

#[test]
fn netcdf_batch_writes_annotated_outputs() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_input(&NetcdfStore, input.path(), "wbgtAdjust_2020.nc", 2020);
    write_input(&NetcdfStore, input.path(), "wbgtAdjust_2021.nc", 2021);
    fs::write(input.path().join("notes.txt"), "ignored").unwrap();

    run_batch(&NetcdfStore, &BatchConfig::new(input.path(), output.path())).unwrap();
    assert_eq!(
        file_names(output.path()),
        vec!["productivityLoss_2020.nc", "productivityLoss_2021.nc"]
    );

    let source = wbgt_dataset(2021);
    let out = NetcdfStore
        .load(
            &output.path().join("productivityLoss_2021.nc"),
            "productivity_loss_high",
        )
        .unwrap();
    assert_eq!(out.dims, source.dims);
    assert_eq!(out.coords, source.coords);
    assert_eq!(
        out.attrs.get("title").and_then(AttrValue::as_str),
        Some("Hourly labour productivity damage due to humid heat stress")
    );

    let high = out.variable("productivity_loss_high").unwrap();
    assert_eq!(high.attrs.get("units").and_then(AttrValue::as_str), Some("1"));
    let wbgt = &source.variable("wbgtAdjust").unwrap().data;
    for (loss, t) in high.data.iter().zip(wbgt.iter()) {
        assert_eq!(*loss, labour_productivity_damage(*t, ExertionClass::High.params()));
    }

    for class in ExertionClass::ALL {
        assert!(NetcdfStore
            .load(
                &output.path().join("productivityLoss_2020.nc"),
                &class.variable_name()
            )
            .is_ok());
    }
}

#[test]
fn binary_runs_config_from_env() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    fs::create_dir_all(&input).unwrap();
    write_input(&NetcdfStore, &input, "wbgtAdjust_2020.nc", 2020);
    let config_path = root.path().join("run.yaml");
    fs::write(
        &config_path,
        format!(
            "input_dir: {}\noutput_dir: {}\n",
            input.display(),
            root.path().join("out").display()
        ),
    )
    .unwrap();

    let output = Command::new(bin())
        .env("PRODUCTIVITY_LOSS_CONFIG", &config_path)
        .env("RUST_LOG", "info")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Processing wbgtAdjust_2020.nc"));
    assert!(stdout.contains("Written productivityLoss_2020.nc"));
    assert_eq!(
        file_names(&root.path().join("out")),
        vec!["productivityLoss_2020.nc"]
    );
}

#[test]
fn binary_exits_non_zero_on_missing_config() {
    let root = tempfile::tempdir().unwrap();
    let output = Command::new(bin())
        .env("PRODUCTIVITY_LOSS_CONFIG", root.path().join("absent.yaml"))
        .output()
        .expect("binary should run");
    assert_eq!(output.status.code(), Some(1));
}
