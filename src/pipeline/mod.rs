// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! The two translation pipelines. Each walks one domain model depth-first,
//! consulting (sdf→matter) or producing (matter→sdf) the side-car mapping
//! through a shared [`crate::context::TranslationContext`].

pub mod matter_to_sdf;
pub mod sdf_to_matter;

use crate::matter::Conformance;
use crate::reftree::MappingLookup;
use crate::sdf::SdfMapping;
use serde_json::Value;

/// The closed set of conformance keys the side-car carries, in the order
/// they're tried when synthesizing a `Conformance` from the mapping.
const CONFORM_KEYS: [&str; 6] = [
    "mandatoryConform",
    "optionalConform",
    "provisionalConform",
    "deprecateConform",
    "disallowConform",
    "otherwiseConform",
];

/// Build a `Conformance` for the element at `pointer`: if the mapping carries
/// one of the closed conformance keys, use it verbatim as `condition`;
/// otherwise fall back to mandatory/optional based on `required`.
#[must_use]
pub fn synth_conformance(mapping: &SdfMapping, pointer: &str, required: bool) -> Conformance {
    let lookup = MappingLookup::new(&mapping.map);
    for key in CONFORM_KEYS {
        if let Some(value) = lookup.import(pointer, key) {
            return conformance_from_value(key, value);
        }
    }
    if required {
        Conformance::mandatory()
    } else {
        Conformance::optional()
    }
}

fn conformance_from_value(key: &str, value: &Value) -> Conformance {
    let condition = crate::conformance::ConformanceExpr::from_json(value);
    let mut conformance = Conformance {
        condition,
        ..Default::default()
    };
    match key {
        "mandatoryConform" => conformance.mandatory = true,
        "optionalConform" => {
            conformance.optional = true;
            if let Some(choice) = value.get("choice").and_then(Value::as_str) {
                conformance.choice = Some(choice.to_string());
            }
            if let Some(more) = value.get("more").and_then(Value::as_bool) {
                conformance.choice_more = Some(more);
            }
        }
        "provisionalConform" => conformance.provisional = true,
        "deprecateConform" => conformance.deprecated = true,
        "disallowConform" => conformance.disallowed = true,
        "otherwiseConform" => {
            if let Some(entries) = value.as_array() {
                conformance.otherwise = entries
                    .iter()
                    .flat_map(Value::as_object)
                    .flat_map(|obj| obj.iter())
                    .map(|(k, v)| conformance_from_value(k, v))
                    .collect();
            }
        }
        _ => {}
    }
    conformance
}

/// Serialize a `Conformance` back to the closed side-car key set.
#[must_use]
pub fn conformance_to_value(conformance: &Conformance) -> (&'static str, Value) {
    if !conformance.otherwise.is_empty() {
        let entries: Vec<Value> = conformance
            .otherwise
            .iter()
            .map(|alt| {
                let (key, value) = conformance_to_value(alt);
                serde_json::json!({ key: value })
            })
            .collect();
        return ("otherwiseConform", Value::Array(entries));
    }
    let mut value = conformance.condition.to_json();
    if conformance.mandatory {
        return ("mandatoryConform", value);
    }
    if conformance.optional {
        if let Value::Object(map) = &mut value {
            if let Some(choice) = &conformance.choice {
                map.insert("choice".into(), Value::String(choice.clone()));
            }
            if let Some(more) = conformance.choice_more {
                map.insert("more".into(), Value::Bool(more));
            }
        }
        return ("optionalConform", value);
    }
    if conformance.provisional {
        return ("provisionalConform", value);
    }
    if conformance.deprecated {
        return ("deprecateConform", value);
    }
    if conformance.disallowed {
        return ("disallowConform", value);
    }
    ("optionalConform", value)
}

/// Split a cluster-bearing SDF key like `OnOff_Client` into `(name, side)`.
#[must_use]
pub fn split_cluster_side(key: &str) -> (String, crate::matter::ClusterSide) {
    if let Some(stripped) = key.strip_suffix("_Client") {
        (stripped.to_string(), crate::matter::ClusterSide::Client)
    } else if let Some(stripped) = key.strip_suffix("_Server") {
        (stripped.to_string(), crate::matter::ClusterSide::Server)
    } else {
        (key.to_string(), crate::matter::ClusterSide::Unspecified)
    }
}

/// Join a cluster name and side back into an SDF object key.
#[must_use]
pub fn join_cluster_side(name: &str, side: crate::matter::ClusterSide) -> String {
    format!("{name}{}", side.suffix())
}

/// Last `/`-separated segment of a JSON Pointer or dotted reference, used to
/// name a materialized struct after its `sdf_ref` when one is present.
#[must_use]
pub fn last_segment(pointer: &str) -> &str {
    pointer.rsplit('/').next().unwrap_or(pointer)
}
