// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Document I/O: loading and writing of JSON and XML documents, kept
//! separate from the mapper itself.
//!
//! JSON load/save goes through `serde_json` directly. Matter XML load uses
//! `roxmltree`; Matter XML write is a small hand-rolled writer (see
//! DESIGN.md).

mod xml_read;
mod xml_write;

pub use xml_read::{load_cluster_xml, load_device_xml};
pub use xml_write::{write_cluster_xml, write_device_xml};

use crate::sdf::{SdfMapping, SdfModel};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn load_sdf_model(path: impl AsRef<Path>) -> Result<SdfModel> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading SDF model {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing SDF model {}", path.display()))
}

pub fn load_sdf_mapping(path: impl AsRef<Path>) -> Result<SdfMapping> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading SDF mapping {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing SDF mapping {}", path.display()))
}

pub fn save_sdf_model(path: impl AsRef<Path>, model: &SdfModel) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(model).context("serializing SDF model")?;
    fs::write(path, text).with_context(|| format!("writing SDF model {}", path.display()))
}

pub fn save_sdf_mapping(path: impl AsRef<Path>, mapping: &SdfMapping) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(mapping).context("serializing SDF mapping")?;
    fs::write(path, text).with_context(|| format!("writing SDF mapping {}", path.display()))
}
