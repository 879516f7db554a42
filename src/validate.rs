// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Structural pre/post checks invoked by `--validate`.
//!
//! This is not a JSON-Schema/XSD engine - full schema validation against the
//! published SDF/Matter schemas is handled elsewhere. These checks collect
//! every violation, tagged `Critical`/`Minor`, rather than stopping at the
//! first.

use crate::matter::{MatterCluster, MatterDevice};
use crate::sdf::SdfModel;
use std::fmt;

#[derive(Debug, Clone)]
pub enum ValidationError {
    Critical { field: String, message: String },
    Minor { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Critical { field, message } => write!(f, "CRITICAL [{field}]: {message}"),
            ValidationError::Minor { field, message } => write!(f, "MINOR [{field}]: {message}"),
        }
    }
}

impl ValidationError {
    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(self, ValidationError::Critical { .. })
    }
}

/// Check an `SdfModel` has at least one thing or object, and that every
/// `sdfRequired` entry actually names a member present in its scope.
#[must_use]
pub fn check_sdf_model(model: &SdfModel) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if model.sdf_thing.is_empty() && model.sdf_object.is_empty() {
        errors.push(ValidationError::Critical {
            field: "sdfThing/sdfObject".to_string(),
            message: "model carries neither a thing nor a bare object".to_string(),
        });
    }

    for (name, thing) in &model.sdf_thing {
        for required in &thing.sdf_required {
            if !thing.sdf_object.contains_key(required) {
                errors.push(ValidationError::Critical {
                    field: format!("sdfThing.{name}.sdfRequired"),
                    message: format!("required member '{required}' not present in sdfObject"),
                });
            }
        }
        for (object_name, object) in &thing.sdf_object {
            errors.extend(check_sdf_object(&format!("sdfThing.{name}.sdfObject.{object_name}"), object));
        }
    }
    for (name, object) in &model.sdf_object {
        errors.extend(check_sdf_object(&format!("sdfObject.{name}"), object));
    }

    errors
}

fn check_sdf_object(prefix: &str, object: &crate::sdf::SdfObject) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for required in &object.sdf_required {
        let present = object.sdf_property.contains_key(required)
            || object.sdf_action.contains_key(required)
            || object.sdf_event.contains_key(required);
        if !present {
            errors.push(ValidationError::Critical {
                field: format!("{prefix}.sdfRequired"),
                message: format!("required member '{required}' not present in this object"),
            });
        }
    }
    if object.sdf_property.is_empty() && object.sdf_action.is_empty() && object.sdf_event.is_empty() {
        errors.push(ValidationError::Minor {
            field: prefix.to_string(),
            message: "object carries no properties, actions or events".to_string(),
        });
    }
    errors
}

/// Check a (device, cluster list) pair: every cluster the device references
/// must actually be present in `cluster_list`, and every cluster's command
/// responses must name either `N`, `Y`, or a known server command.
#[must_use]
pub fn check_matter_xml(device: Option<&MatterDevice>, cluster_list: &[MatterCluster]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(device) = device {
        for cluster in &device.clusters {
            if !cluster_list.iter().any(|c| c.id == cluster.id) {
                errors.push(ValidationError::Critical {
                    field: format!("deviceType.{}.clusters", device.name),
                    message: format!("cluster id {} ('{}') has no definition in the cluster XML", cluster.id, cluster.name),
                });
            }
        }
    }

    for cluster in cluster_list {
        for command in &cluster.client_commands {
            if command.response != "N" && command.response != "Y" && !cluster.server_commands.contains_key(&command.response) {
                errors.push(ValidationError::Critical {
                    field: format!("cluster.{}.command.{}.response", cluster.name, command.name),
                    message: format!("response '{}' names no server command in this cluster", command.response),
                });
            }
        }
        if cluster.attributes.is_empty() && cluster.client_commands.is_empty() && cluster.events.is_empty() {
            errors.push(ValidationError::Minor {
                field: format!("cluster.{}", cluster.name),
                message: "cluster carries no attributes, commands or events".to_string(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::{CommonQualities, SdfObject};

    #[test]
    fn empty_model_is_critical() {
        let model = SdfModel::default();
        let errors = check_sdf_model(&model);
        assert!(errors.iter().any(ValidationError::is_critical));
    }

    #[test]
    fn missing_required_member_is_critical() {
        let mut model = SdfModel::default();
        model.sdf_object.insert(
            "Switch".to_string(),
            SdfObject {
                common: CommonQualities::default(),
                sdf_required: vec!["OnOff".to_string()],
                ..Default::default()
            },
        );
        let errors = check_sdf_model(&model);
        assert!(errors.iter().any(ValidationError::is_critical));
    }

    #[test]
    fn unreferenced_device_cluster_is_critical() {
        let device = MatterDevice {
            name: "Bulb".to_string(),
            clusters: vec![MatterCluster::new("OnOff")],
            ..Default::default()
        };
        let errors = check_matter_xml(Some(&device), &[]);
        assert!(errors.iter().any(ValidationError::is_critical));
    }
}
