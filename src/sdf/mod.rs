// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! The SDF (OneDM Semantic Definition Format) side of the domain model.
//!
//! `SdfModel` and `SdfMapping` are plain data - no behaviour lives here beyond
//! small accessors. The mapping pipelines own all translation logic.

mod data_quality;

pub use data_quality::{f64_to_number, i128_to_number, number_to_i128, DataQuality, JsoItem, SdfType};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoBlock {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub modified: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub copyright: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "$comment")]
    pub comment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceBlock {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namespace: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "defaultNamespace")]
    pub default_namespace: Option<String>,
}

/// Qualities shared by every SDF node kind (thing, object, property, action, event, data).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonQualities {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty", rename = "$comment")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfRef")]
    pub sdf_ref: Option<String>,
    /// List of JSON Pointers (relative to the enclosing node) required to be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "sdfRequired")]
    pub sdf_required: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfProperty {
    #[serde(flatten)]
    pub common: CommonQualities,
    #[serde(flatten)]
    pub data_quality: DataQuality,
    #[serde(default)]
    pub readable: bool,
    #[serde(default)]
    pub writable: bool,
    #[serde(default)]
    pub observable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfAction {
    #[serde(flatten)]
    pub common: CommonQualities,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfInputData")]
    pub sdf_input_data: Option<DataQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfOutputData")]
    pub sdf_output_data: Option<DataQuality>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfData")]
    pub sdf_data: BTreeMap<String, DataQuality>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfEvent {
    #[serde(flatten)]
    pub common: CommonQualities,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfOutputData")]
    pub sdf_output_data: Option<DataQuality>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfData")]
    pub sdf_data: BTreeMap<String, DataQuality>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfObject {
    #[serde(flatten)]
    pub common: CommonQualities,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfProperty")]
    pub sdf_property: BTreeMap<String, SdfProperty>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfAction")]
    pub sdf_action: BTreeMap<String, SdfAction>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfEvent")]
    pub sdf_event: BTreeMap<String, SdfEvent>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfData")]
    pub sdf_data: BTreeMap<String, DataQuality>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "sdfRequired")]
    pub sdf_required: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfThing {
    #[serde(flatten)]
    pub common: CommonQualities,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfObject")]
    pub sdf_object: BTreeMap<String, SdfObject>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfProperty")]
    pub sdf_property: BTreeMap<String, SdfProperty>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfAction")]
    pub sdf_action: BTreeMap<String, SdfAction>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfEvent")]
    pub sdf_event: BTreeMap<String, SdfEvent>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfData")]
    pub sdf_data: BTreeMap<String, DataQuality>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "sdfRequired")]
    pub sdf_required: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfModel {
    #[serde(default, rename = "info")]
    pub info_block: InfoBlock,
    #[serde(default, rename = "namespace")]
    pub namespace_block: NamespaceBlock,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfThing")]
    pub sdf_thing: BTreeMap<String, SdfThing>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfObject")]
    pub sdf_object: BTreeMap<String, SdfObject>,
}

/// Side-car mapping document: `json-pointer -> { key -> value }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdfMapping {
    #[serde(default, rename = "info")]
    pub info_block: InfoBlock,
    #[serde(default, rename = "namespace")]
    pub namespace_block: NamespaceBlock,
    #[serde(default)]
    pub map: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl SdfMapping {
    #[must_use]
    pub fn get(&self, pointer: &str, field: &str) -> Option<&serde_json::Value> {
        self.map.get(pointer).and_then(|fields| fields.get(field))
    }
}
