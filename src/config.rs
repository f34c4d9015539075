use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::header::HeaderOptions;
use crate::error::{ParamError, Result};

/// Everything a generation run needs besides the parameter description.
/// Loadable from JSON; command-line flags are applied on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    // Outputs
    pub js_out: PathBuf,
    pub header_out: PathBuf,

    // Native header
    pub header: HeaderOptions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            js_out: PathBuf::from("sliders.js"),
            header_out: PathBuf::from("parameters.hpp"),
            header: HeaderOptions::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ParamError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}
