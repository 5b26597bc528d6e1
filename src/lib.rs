//! Gridded labour productivity loss from hourly WBGT.
//!
//! [damage] holds the per-exertion-class damage curve, [batch] applies it to every
//! `wbgtAdjust_*.nc` in a directory, and [store] persists the resulting datasets.

pub mod batch;
pub mod cli;
pub mod config;
pub mod damage;
pub mod dataset;
pub mod error;
pub mod store;

pub use error::{Error, Result};
