//! Run configuration loaded from YAML.
//!
//! ```yaml
//! input_dir: /data/{institution}/{model}/{scenario}/wbgt/{version}
//! output_dir: /scratch/productivityLoss/{institution}/{model}/{scenario}/{version}
//! scenarios: [historical, ssp126, ssp370]
//! params:
//!   institution: BOM
//!   model: ACCESS-ESM1-5
//!   version: v20250901
//! ```
//!
//! Each scenario yields one [BatchJob]; `{scenario}` and every `params` key are substituted
//! into both directory templates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/productivity_loss.yaml";
pub const CONFIG_PATH_ENV: &str = "PRODUCTIVITY_LOSS_CONFIG";
const SCENARIO_KEY: &str = "scenario";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub input_dir: String,
    pub output_dir: String,
    #[serde(default)]
    pub scenarios: Vec<String>,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// A resolved directory pair, tagged with the scenario it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub scenario: Option<String>,
    pub batch: BatchConfig,
}

impl RunConfig {
    /// Single input/output pair with no scenario loop.
    pub fn single(input_dir: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            scenarios: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| Error::io("failed to read config", path, e))?;
        serde_yaml::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Expand the scenario loop into concrete jobs, in listed order. Fails on the first
    /// placeholder that no scenario or param resolves.
    pub fn jobs(&self) -> Result<Vec<BatchJob>> {
        if self.scenarios.is_empty() {
            let vars = self.params.clone();
            return Ok(vec![BatchJob {
                scenario: None,
                batch: self.resolve(&vars)?,
            }]);
        }

        self.scenarios
            .iter()
            .map(|scenario| {
                let mut vars = self.params.clone();
                vars.insert(SCENARIO_KEY.to_string(), scenario.clone());
                Ok(BatchJob {
                    scenario: Some(scenario.clone()),
                    batch: self.resolve(&vars)?,
                })
            })
            .collect()
    }

    fn resolve(&self, vars: &BTreeMap<String, String>) -> Result<BatchConfig> {
        Ok(BatchConfig {
            input_dir: PathBuf::from(render_template(&self.input_dir, vars)?),
            output_dir: PathBuf::from(render_template(&self.output_dir, vars)?),
        })
    }
}

/// Replace `{key}` with `vars[key]`. Braces without a closing `}` are kept literally.
pub fn render_template(template: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return Ok(out);
        };
        let key = &after[..close];
        let value = vars.get(key).ok_or_else(|| Error::ConfigTemplate {
            template: template.to_string(),
            placeholder: key.to_string(),
        })?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
