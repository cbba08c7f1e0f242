//! Sample Magento backends bundled with the CLI.
//!
//! A storefront needs a running Magento instance behind it. For users who do
//! not have one yet, the CLI ships a list of public demo instances and
//! defaults the backend URL to the first of them.

use anyhow::{Context, Result};
use serde::Deserialize;

const SAMPLE_BACKENDS: &str = include_str!("../resources/sample-backends.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SampleBackend {
    pub name: String,
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleBackends {
    pub environments: Vec<SampleBackend>,
}

/// Demo instances shipped with the CLI.
pub fn sample_backends() -> Result<SampleBackends> {
    serde_json::from_str(SAMPLE_BACKENDS).context("bundled sample-backends.json is malformed")
}

/// Backend used when the caller supplies no `--backend-url`.
pub fn default_backend() -> Result<SampleBackend> {
    sample_backends()?
        .environments
        .into_iter()
        .next()
        .context("no sample backends bundled")
}
