// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! `DataQuality`: the JSON-schema-flavored type carried by sdfProperty,
//! sdfAction's input/output, sdfEvent's output and sdfData.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `sdf_type` extension values recognised by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SdfType {
    ByteString,
    UnixTime,
}

/// The schema carried by `items` on an array-typed `DataQuality`.
///
/// Transparent newtype so it serializes as a plain nested object, matching
/// the OneDM `items` keyword shape (a schema, not a wrapper).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsoItem(pub Box<DataQuality>);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataQuality {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfRef")]
    pub sdf_ref: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty", rename = "sdfChoice")]
    pub sdf_choice: BTreeMap<String, DataQuality>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "enum")]
    pub r#enum: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "const")]
    pub r#const: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "exclusiveMinimum")]
    pub exclusive_minimum: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "exclusiveMaximum")]
    pub exclusive_maximum: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "multipleOf")]
    pub multiple_of: Option<serde_json::Number>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "uniqueItems")]
    pub unique_items: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<JsoItem>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, DataQuality>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "sdfType")]
    pub sdf_type: Option<SdfType>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "contentFormat")]
    pub content_format: Option<String>,
    // Common qualities duplicated here because sdfData/choice entries carry them
    // directly alongside the data-quality fields (no separate wrapper struct).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

impl DataQuality {
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Lossless-as-possible conversion between JSON numbers and `i128`, used by
/// the integer type fitter so `uint64`'s native maximum (`2^64 - 1`) survives
/// exactly instead of rounding through `f64`.
#[must_use]
pub fn number_to_i128(n: &serde_json::Number) -> Option<i128> {
    if let Some(v) = n.as_i64() {
        return Some(i128::from(v));
    }
    if let Some(v) = n.as_u64() {
        return Some(i128::from(v));
    }
    n.as_f64().map(|v| v as i128)
}

#[must_use]
pub fn i128_to_number(v: i128) -> serde_json::Number {
    if let Ok(v) = u64::try_from(v) {
        return serde_json::Number::from(v);
    }
    if let Ok(v) = i64::try_from(v) {
        return serde_json::Number::from(v);
    }
    serde_json::Number::from_f64(v as f64).unwrap_or_else(|| serde_json::Number::from(0))
}

#[must_use]
pub fn f64_to_number(v: f64) -> serde_json::Number {
    serde_json::Number::from_f64(v).unwrap_or_else(|| serde_json::Number::from(0))
}
