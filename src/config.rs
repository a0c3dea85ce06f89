// Copyright 2026 Tree xie.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::Error;
use crate::helpers::codec::{DecompressMode, MAX_DECOMPRESS_BYTES};
use crate::proto::MAX_PARSE_DEPTH;
use home::home_dir;
use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::str::FromStr;

type Result<T, E = Error> = std::result::Result<T, E>;

/// How a decoded message is written out
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented display tree
    #[default]
    Tree,
    /// Display tree as pretty JSON
    Json,
    /// Brace-delimited field dump
    Debug,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "json" => Ok(OutputFormat::Json),
            "debug" => Ok(OutputFormat::Debug),
            _ => Err(Error::Invalid {
                message: format!("Unknown output format: {s}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProtolensConfig {
    pub max_depth: usize,
    pub output: OutputFormat,
    pub decompress: DecompressMode,
    pub max_decompress_bytes: usize,
}

impl Default for ProtolensConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_PARSE_DEPTH,
            output: OutputFormat::default(),
            decompress: DecompressMode::default(),
            max_decompress_bytes: MAX_DECOMPRESS_BYTES,
        }
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let Some(home) = home_dir() else {
        return Err(Error::Invalid {
            message: "Home directory not found".to_string(),
        });
    };
    Ok(home.join(".protolens"))
}

/// Default config location: `~/.protolens/protolens.toml`
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("protolens.toml"))
}

/// Load the config file, falling back to defaults when it does not exist
pub fn load_config(path: Option<&Path>) -> Result<ProtolensConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => get_config_path()?,
    };
    if !path.exists() {
        return Ok(ProtolensConfig::default());
    }
    let value = read_to_string(path)?;
    let config: ProtolensConfig = toml::from_str(&value)?;
    Ok(config)
}
