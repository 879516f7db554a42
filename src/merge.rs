// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Merge helpers: folding a derived cluster's base-cluster members in, and
//! applying a device type's per-cluster overrides onto the full cluster
//! definitions it references.
//!
//! Grounded field-by-field in `original_source/lib/converter/src/
//! matter_to_sdf.cpp`'s `MergeDerivedCluster`/`MergeDeviceCluster`: unknown
//! names are appended, matching names overwrite only where the override
//! carries a value. Neither helper ever drops entries.

use crate::matter::{MatterCluster, MatterDevice};

/// Fold `base`'s members into `derived` wherever `derived.classification`
/// names `base` (by cluster alias) as its base cluster.
pub fn merge_derived_cluster(derived: &mut MatterCluster, cluster_list: &[MatterCluster]) {
    let Some(classification) = &derived.classification else {
        return;
    };
    let base_name = classification.base_cluster.clone();
    if base_name.is_empty() {
        return;
    }

    for candidate in cluster_list {
        let is_base = candidate.cluster_aliases.iter().any(|(_, alias)| *alias == base_name);
        if !is_base {
            continue;
        }

        derived.feature_map.extend(candidate.feature_map.iter().cloned());
        derived.attributes.extend(candidate.attributes.iter().cloned());
        derived.client_commands.extend(candidate.client_commands.iter().cloned());
        for (name, cmd) in &candidate.server_commands {
            derived.server_commands.entry(name.clone()).or_insert_with(|| cmd.clone());
        }
        derived.events.extend(candidate.events.iter().cloned());
        for (name, items) in &candidate.enums {
            derived.enums.entry(name.clone()).or_insert_with(|| items.clone());
        }
        for (name, bits) in &candidate.bitmaps {
            derived.bitmaps.entry(name.clone()).or_insert_with(|| bits.clone());
        }
        for (name, fields) in &candidate.structs {
            derived.structs.entry(name.clone()).or_insert_with(|| fields.clone());
        }
    }
}

#[must_use]
pub fn is_derived(cluster: &MatterCluster) -> bool {
    cluster
        .classification
        .as_ref()
        .is_some_and(|c| c.hierarchy == "derived")
}

/// Replace each cluster the device references with its full definition from
/// `cluster_list`, then apply the device type's per-cluster overrides.
pub fn merge_device_cluster(device: &mut MatterDevice, cluster_list: &[MatterCluster]) {
    for device_cluster in &mut device.clusters {
        let Some(full) = cluster_list.iter().find(|c| c.id == device_cluster.id) else {
            continue;
        };
        let mut merged = full.clone();

        merged.conformance = device_cluster.conformance.clone();
        merged.side = device_cluster.side;

        for device_feature in &device_cluster.feature_map {
            if let Some(target) = merged.feature_map.iter_mut().find(|f| f.name == device_feature.name) {
                target.conformance = device_feature.conformance.clone();
            }
        }

        for device_attr in &device_cluster.attributes {
            if let Some(target) = merged.attributes.iter_mut().find(|a| a.name == device_attr.name) {
                if device_attr.access.is_some() {
                    target.access = device_attr.access.clone();
                }
                if device_attr.constraint.is_some() {
                    target.constraint = device_attr.constraint.clone();
                }
                if device_attr.conformance.is_some() {
                    target.conformance = device_attr.conformance.clone();
                }
                if device_attr.quality.is_some() {
                    target.quality = device_attr.quality.clone();
                }
                if device_attr.default.is_some() {
                    target.default = device_attr.default.clone();
                }
                if !device_attr.r#type.is_empty() {
                    target.r#type = device_attr.r#type.clone();
                }
            }
        }

        for (_, device_cmd) in &device_cluster.server_commands {
            if let Some(target) = merged.client_commands.iter_mut().find(|c| c.name == device_cmd.name) {
                apply_command_override(target, device_cmd);
            }
            for (_, target) in merged.server_commands.iter_mut() {
                if target.name == device_cmd.name {
                    apply_command_override(target, device_cmd);
                }
            }
        }

        for device_event in &device_cluster.events {
            if let Some(target) = merged.events.iter_mut().find(|e| e.name == device_event.name) {
                if device_event.access.is_some() {
                    target.access = device_event.access.clone();
                }
                if device_event.conformance.is_some() {
                    target.conformance = device_event.conformance.clone();
                }
                if device_event.quality.is_some() {
                    target.quality = device_event.quality.clone();
                }
                if device_event.priority.is_some() {
                    target.priority = device_event.priority.clone();
                }
            }
        }

        if is_derived(&merged) {
            let merge_source: Vec<MatterCluster> = cluster_list.to_vec();
            merge_derived_cluster(&mut merged, &merge_source);
        }

        *device_cluster = merged;
    }
}

fn apply_command_override(target: &mut crate::matter::Command, device_cmd: &crate::matter::Command) {
    if device_cmd.access.is_some() {
        target.access = device_cmd.access.clone();
    }
    if device_cmd.conformance.is_some() {
        target.conformance = device_cmd.conformance.clone();
    }
    if !device_cmd.response.is_empty() {
        target.response = device_cmd.response.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::{Attribute, ClusterClassification};

    #[test]
    fn derived_cluster_inherits_base_attributes() {
        let mut base = MatterCluster::new("OnOff");
        base.cluster_aliases.push((6, "OnOff".to_string()));
        base.attributes.push(Attribute {
            name: "OnOff".into(),
            ..Default::default()
        });

        let mut derived = MatterCluster::new("OnOffLight");
        derived.classification = Some(ClusterClassification {
            hierarchy: "derived".into(),
            base_cluster: "OnOff".into(),
            ..Default::default()
        });

        merge_derived_cluster(&mut derived, &[base]);
        assert_eq!(derived.attributes.len(), 1);
        assert_eq!(derived.attributes[0].name, "OnOff");
    }

    #[test]
    fn device_override_replaces_only_set_fields() {
        let mut cluster = MatterCluster::new("OnOff");
        cluster.id = 6;
        cluster.attributes.push(Attribute {
            name: "OnOff".into(),
            r#type: "bool".into(),
            ..Default::default()
        });

        let mut device_cluster = MatterCluster::new("OnOff");
        device_cluster.id = 6;
        device_cluster.attributes.push(Attribute {
            name: "OnOff".into(),
            access: Some(crate::matter::Access {
                read: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });

        let mut device = MatterDevice {
            clusters: vec![device_cluster],
            ..Default::default()
        };

        merge_device_cluster(&mut device, &[cluster]);
        let merged_attr = &device.clusters[0].attributes[0];
        assert_eq!(merged_attr.r#type, "bool");
        assert_eq!(merged_attr.access.as_ref().unwrap().read, Some(true));
    }
}
