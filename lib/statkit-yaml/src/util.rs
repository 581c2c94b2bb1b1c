/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

/// Parse a string holding exactly one yaml document.
pub fn load_str(content: &str) -> anyhow::Result<Yaml> {
    let mut docs = YamlLoader::load_from_str(content).map_err(|e| anyhow!("invalid yaml: {e}"))?;
    match docs.len() {
        0 => Err(anyhow!("no yaml document found")),
        1 => Ok(docs.remove(0)),
        n => Err(anyhow!("expected a single yaml document, found {n}")),
    }
}

pub fn load_doc(path: &Path) -> anyhow::Result<Yaml> {
    let content =
        fs::read_to_string(path).context(format!("failed to read file {}", path.display()))?;
    load_str(&content).context(format!("failed to load yaml file {}", path.display()))
}
