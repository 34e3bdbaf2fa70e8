//! Policy configuration.
//!
//! The configuration is supplied once, when the policy is instantiated, as a JSON
//! document with a single `limit` field expressed in bytes:
//!
//! ```json
//! { "limit": 1000 }
//! ```

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable configuration of the content limit policy.
///
/// A missing `limit` field deserializes to `0`, which rejects every non empty body.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentLimitConfig {
    limit: u64,
}

impl ContentLimitConfig {
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit }
    }

    /// The maximum number of body bytes a request may carry.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_slice(json: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(json)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ConfigError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads the configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref()).map_err(|source| ConfigError::io(path.as_ref(), source))?;
        Self::from_reader(BufReader::new(file))
    }
}
