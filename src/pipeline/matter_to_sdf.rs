// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! `Option<MatterDevice>` + `[MatterCluster]` → `(SdfModel, SdfMapping)`.
//!
//! Derived clusters are resolved against their base first
//! ([`crate::merge::merge_derived_cluster`]); when a device type is supplied,
//! its per-cluster overrides are folded in next
//! ([`crate::merge::merge_device_cluster`]) before any SDF structure is built.

use super::{conformance_to_value, join_cluster_side};
use crate::context::TranslationContext;
use crate::error::Result;
use crate::matter::{Attribute, Command, Conformance, DataField, Event, MatterCluster, MatterDevice};
use crate::merge::{is_derived, merge_derived_cluster, merge_device_cluster};
use crate::reftree::NodeId;
use crate::sdf::{
    CommonQualities, DataQuality, InfoBlock, JsoItem, SdfAction, SdfEvent, SdfMapping, SdfModel, SdfObject,
    SdfProperty, SdfThing,
};
use crate::typemap;
use std::collections::BTreeMap;

/// Run the `matter → sdf` pipeline.
pub fn convert(device: Option<&MatterDevice>, cluster_list: &[MatterCluster]) -> Result<(SdfModel, SdfMapping)> {
    let mut ctx = TranslationContext::new();
    let resolved: Vec<MatterCluster> = cluster_list
        .iter()
        .map(|c| {
            let mut c = c.clone();
            if is_derived(&c) {
                merge_derived_cluster(&mut c, cluster_list);
            }
            c
        })
        .collect();

    let mut model = SdfModel::default();

    match device {
        Some(device) => {
            let mut device = device.clone();
            merge_device_cluster(&mut device, &resolved);

            let sdf_node = ctx.tree.add_child(ctx.tree.root(), "sdfThing");
            let thing_node = ctx.tree.add_child(sdf_node, device.name.clone());
            ctx.tree.set_attribute(thing_node, "id", serde_json::json!(device.id));
            ctx.tree.set_attribute(thing_node, "revision", serde_json::json!(device.revision));
            if !device.revision_history.is_empty() {
                ctx.tree
                    .set_attribute(thing_node, "revisionHistory", serde_json::json!(device.revision_history));
            }
            if !device.conditions.is_empty() {
                ctx.tree
                    .set_attribute(thing_node, "conditions", serde_json::json!(device.conditions));
            }
            if let Some(classification) = &device.classification {
                ctx.tree.set_attribute(
                    thing_node,
                    "classification",
                    serde_json::to_value(classification).unwrap_or_default(),
                );
            }
            if let Some(conformance) = &device.conformance {
                let (key, value) = conformance_to_value(conformance);
                ctx.tree.set_attribute(thing_node, key, value);
            }

            let mut sdf_object = BTreeMap::new();
            let mut sdf_required = Vec::new();
            for cluster in &device.clusters {
                let (key, object, required) = build_object(&mut ctx, thing_node, cluster);
                if required {
                    sdf_required.push(key.clone());
                }
                sdf_object.insert(key, object);
            }

            let thing = SdfThing {
                common: CommonQualities {
                    description: device.summary.clone(),
                    ..Default::default()
                },
                sdf_object,
                sdf_required,
                ..Default::default()
            };
            model.info_block = info_block_from(&device.name, &device.summary, device.revision);
            model.sdf_thing.insert(device.name.clone(), thing);
        }
        None => {
            for cluster in &resolved {
                let root = ctx.tree.root();
                let (key, object, _required) = build_object(&mut ctx, root, cluster);
                if model.info_block.title.is_empty() {
                    model.info_block = info_block_from(&cluster.name, &cluster.summary, cluster.revision);
                }
                model.sdf_object.insert(key, object);
            }
        }
    }

    let mapping = SdfMapping {
        info_block: model.info_block.clone(),
        namespace_block: model.namespace_block.clone(),
        map: ctx.tree.generate_mapping(),
    };

    Ok((model, mapping))
}

fn info_block_from(name: &str, summary: &str, revision: u8) -> InfoBlock {
    InfoBlock {
        title: name.to_string(),
        description: summary.to_string(),
        version: revision.to_string(),
        ..Default::default()
    }
}

/// Build the `SdfObject` for one (already-merged) cluster, returning its
/// `sdfObject` key (`<Name>` or `<Name>_Client`/`<Name>_Server`) and whether
/// the whole object should be marked required at the enclosing scope.
fn build_object(ctx: &mut TranslationContext, parent: NodeId, cluster: &MatterCluster) -> (String, SdfObject, bool) {
    let key = join_cluster_side(&cluster.name, cluster.side);
    let object_node = ctx.tree.add_child(parent, key.clone());
    let pointer = ctx.tree.generate_pointer(object_node);
    ctx.reset_cluster_scope(format!("{pointer}/sdfData"));

    ctx.tree.set_attribute(object_node, "id", serde_json::json!(cluster.id));
    ctx.tree.set_attribute(object_node, "revision", serde_json::json!(cluster.revision));
    if !cluster.revision_history.is_empty() {
        ctx.tree
            .set_attribute(object_node, "revisionHistory", serde_json::json!(cluster.revision_history));
    }
    if !cluster.cluster_aliases.is_empty() {
        ctx.tree
            .set_attribute(object_node, "clusterAliases", serde_json::json!(cluster.cluster_aliases));
    }
    if let Some(classification) = &cluster.classification {
        ctx.tree
            .set_attribute(object_node, "classification", serde_json::to_value(classification).unwrap_or_default());
    }

    // Features populate supported_features (mandatory + evaluable-true) before
    // anything downstream consults conformance, and are always exported.
    let mut features_json = serde_json::Map::new();
    for feature in &cluster.feature_map {
        let mandatory = feature.conformance.as_ref().is_some_and(|c| c.mandatory);
        let holds = feature.conformance.as_ref().is_some_and(|c| c.condition.evaluate(&ctx.eval_context()));
        if mandatory && holds {
            ctx.supported_features.insert(feature.code.clone());
        }
        features_json.insert(
            feature.name.clone(),
            serde_json::json!({"code": feature.code, "mandatory": mandatory, "summary": feature.summary}),
        );
    }
    if !features_json.is_empty() {
        ctx.tree.set_attribute(object_node, "features", serde_json::Value::Object(features_json));
    }

    let object_mandatory = cluster
        .conformance
        .as_ref()
        .is_some_and(|c| c.mandatory && c.condition.evaluate(&ctx.eval_context()));
    if let Some(conformance) = &cluster.conformance {
        let (k, v) = conformance_to_value(conformance);
        ctx.tree.set_attribute(object_node, k, v);
    }

    let mut sdf_required = Vec::new();

    let sdf_property = build_properties(ctx, object_node, &cluster.attributes, &mut sdf_required);
    let sdf_action = build_actions(ctx, object_node, cluster, &mut sdf_required);
    let sdf_event = build_events(ctx, object_node, &cluster.events, &mut sdf_required);
    let sdf_data = build_sdf_data(ctx, cluster);

    let object = SdfObject {
        common: CommonQualities {
            description: cluster.summary.clone(),
            ..Default::default()
        },
        sdf_property,
        sdf_action,
        sdf_event,
        sdf_data,
        sdf_required,
    };

    (key, object, object_mandatory)
}

fn allowed(ctx: &TranslationContext, conformance: &Option<Conformance>) -> bool {
    conformance.as_ref().is_none_or(|c| c.allowed_for_mapping(&ctx.eval_context()))
}

fn is_mandatory(ctx: &TranslationContext, conformance: &Option<Conformance>) -> bool {
    conformance
        .as_ref()
        .is_some_and(|c| c.mandatory && c.condition.evaluate(&ctx.eval_context()))
}

fn build_properties(
    ctx: &mut TranslationContext,
    object_node: NodeId,
    attributes: &[Attribute],
    sdf_required: &mut Vec<String>,
) -> BTreeMap<String, SdfProperty> {
    let mut properties = BTreeMap::new();
    let kind_node = ctx.tree.add_child(object_node, "sdfProperty");

    // Group attributes sharing a non-empty choice label: they collapse back
    // into a single sdfProperty whose data quality carries an sdfChoice map.
    let mut choice_groups: BTreeMap<(String, String), Vec<&Attribute>> = BTreeMap::new();
    let mut singles: Vec<&Attribute> = Vec::new();
    for attr in attributes {
        if !allowed(ctx, &attr.conformance) {
            continue;
        }
        match attr.conformance.as_ref().and_then(|c| c.choice.clone()) {
            Some(choice) => choice_groups.entry((attr.name.clone(), choice)).or_default().push(attr),
            None => singles.push(attr),
        }
    }

    for attr in singles {
        let node = ctx.tree.add_child(kind_node, attr.name.clone());
        let mut dq = typemap::matter_type_to_data_quality(&attr.r#type, &ctx.sdf_data_location);
        if let Some(constraint) = &attr.constraint {
            typemap::apply_constraint_to_data_quality(constraint, &mut dq);
        }
        if let Some(quality) = &attr.quality {
            dq.nullable = quality.nullable;
        }
        let mandatory = is_mandatory(ctx, &attr.conformance);
        if mandatory {
            sdf_required.push(attr.name.clone());
        }
        if let Some(conformance) = &attr.conformance {
            let (k, v) = conformance_to_value(conformance);
            ctx.tree.set_attribute(node, k, v);
        }
        ctx.tree.set_attribute(node, "id", serde_json::json!(attr.id));
        if let Some(default) = &attr.default {
            ctx.tree.set_attribute(node, "default", serde_json::to_value(default).unwrap_or_default());
        }

        let read = attr.access.as_ref().and_then(|a| a.read).unwrap_or(true);
        let write = attr.access.as_ref().and_then(|a| a.write).unwrap_or(false);
        let observable = attr.quality.as_ref().and_then(|q| q.reportable).unwrap_or(false);

        properties.insert(
            attr.name.clone(),
            SdfProperty {
                common: CommonQualities {
                    description: attr.summary.clone(),
                    ..Default::default()
                },
                data_quality: dq,
                readable: read,
                writable: write,
                observable,
            },
        );
    }

    for ((name, _choice), members) in choice_groups {
        let node = ctx.tree.add_child(kind_node, name.clone());
        let mut sdf_choice = BTreeMap::new();
        let mut any_mandatory = false;
        let mut read = true;
        let mut write = false;
        for (idx, attr) in members.iter().enumerate() {
            let mut dq = typemap::matter_type_to_data_quality(&attr.r#type, &ctx.sdf_data_location);
            if let Some(constraint) = &attr.constraint {
                typemap::apply_constraint_to_data_quality(constraint, &mut dq);
            }
            let choice_key = if attr.summary.is_empty() {
                format!("choice{idx}")
            } else {
                attr.summary.clone()
            };
            any_mandatory |= is_mandatory(ctx, &attr.conformance);
            read = attr.access.as_ref().and_then(|a| a.read).unwrap_or(read);
            write = attr.access.as_ref().and_then(|a| a.write).unwrap_or(write);
            sdf_choice.insert(choice_key, dq);
        }
        if any_mandatory {
            sdf_required.push(name.clone());
        }
        ctx.tree.set_attribute(node, "choiceMemberCount", serde_json::json!(members.len()));
        properties.insert(
            name,
            SdfProperty {
                common: CommonQualities::default(),
                data_quality: DataQuality {
                    sdf_choice,
                    ..Default::default()
                },
                readable: read,
                writable: write,
                observable: false,
            },
        );
    }

    properties
}

fn build_actions(
    ctx: &mut TranslationContext,
    object_node: NodeId,
    cluster: &MatterCluster,
    sdf_required: &mut Vec<String>,
) -> BTreeMap<String, SdfAction> {
    let mut actions = BTreeMap::new();
    let kind_node = ctx.tree.add_child(object_node, "sdfAction");
    for cmd in &cluster.client_commands {
        if !allowed(ctx, &cmd.conformance) {
            continue;
        }
        let node = ctx.tree.add_child(kind_node, cmd.name.clone());
        if is_mandatory(ctx, &cmd.conformance) {
            sdf_required.push(cmd.name.clone());
        }
        if let Some(conformance) = &cmd.conformance {
            let (k, v) = conformance_to_value(conformance);
            ctx.tree.set_attribute(node, k, v);
        }
        ctx.tree.set_attribute(node, "id", serde_json::json!(cmd.id));

        let sdf_input_data = data_fields_to_quality(ctx, &cmd.command_fields);
        let sdf_output_data = match cmd.response.as_str() {
            "N" => None,
            "Y" => Some(DataQuality {
                r#type: Some("integer".into()),
                minimum: Some(serde_json::Number::from(0)),
                maximum: Some(serde_json::Number::from(u16::MAX)),
                ..Default::default()
            }),
            name => cluster
                .server_commands
                .get(name)
                .and_then(|server_cmd| data_fields_to_quality(ctx, &server_cmd.command_fields)),
        };

        actions.insert(
            cmd.name.clone(),
            SdfAction {
                common: CommonQualities {
                    description: cmd.summary.clone(),
                    ..Default::default()
                },
                sdf_input_data,
                sdf_output_data,
                sdf_data: BTreeMap::new(),
            },
        );
    }
    actions
}

fn build_events(
    ctx: &mut TranslationContext,
    object_node: NodeId,
    events: &[Event],
    sdf_required: &mut Vec<String>,
) -> BTreeMap<String, SdfEvent> {
    let mut out = BTreeMap::new();
    let kind_node = ctx.tree.add_child(object_node, "sdfEvent");
    for event in events {
        if !allowed(ctx, &event.conformance) {
            continue;
        }
        let node = ctx.tree.add_child(kind_node, event.name.clone());
        if is_mandatory(ctx, &event.conformance) {
            sdf_required.push(event.name.clone());
        }
        if let Some(conformance) = &event.conformance {
            let (k, v) = conformance_to_value(conformance);
            ctx.tree.set_attribute(node, k, v);
        }
        ctx.tree.set_attribute(node, "id", serde_json::json!(event.id));
        if let Some(priority) = &event.priority {
            ctx.tree.set_attribute(node, "priority", serde_json::json!(priority));
        }
        if let Some(quality) = &event.quality {
            ctx.tree.set_attribute(node, "quality", serde_json::to_value(quality).unwrap_or_default());
        }

        out.insert(
            event.name.clone(),
            SdfEvent {
                common: CommonQualities {
                    description: event.summary.clone(),
                    ..Default::default()
                },
                sdf_output_data: data_fields_to_quality(ctx, &event.data),
                sdf_data: BTreeMap::new(),
            },
        );
    }
    out
}

/// Inverse of `sdf_to_matter::data_fields_from`: a single field named
/// `Payload` collapses back to a bare data quality, otherwise each field
/// becomes an object property.
fn data_fields_to_quality(ctx: &TranslationContext, fields: &[DataField]) -> Option<DataQuality> {
    if fields.is_empty() {
        return None;
    }
    if fields.len() == 1 && fields[0].name == "Payload" {
        return Some(field_to_quality(ctx, &fields[0]));
    }
    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    for field in fields {
        if is_mandatory(ctx, &field.conformance) {
            required.push(field.name.clone());
        }
        properties.insert(field.name.clone(), field_to_quality(ctx, field));
    }
    Some(DataQuality {
        r#type: Some("object".into()),
        properties,
        required,
        ..Default::default()
    })
}

fn field_to_quality(ctx: &TranslationContext, field: &DataField) -> DataQuality {
    let mut dq = typemap::matter_type_to_data_quality(&field.r#type, &ctx.sdf_data_location);
    if let Some(constraint) = &field.constraint {
        typemap::apply_constraint_to_data_quality(constraint, &mut dq);
    }
    dq.description = field.summary.clone();
    dq
}

fn build_sdf_data(ctx: &TranslationContext, cluster: &MatterCluster) -> BTreeMap<String, DataQuality> {
    let mut out = BTreeMap::new();

    for (name, items) in &cluster.enums {
        let mut sdf_choice = BTreeMap::new();
        for item in items {
            if !allowed(ctx, &item.conformance) {
                continue;
            }
            sdf_choice.insert(
                item.name.clone(),
                DataQuality {
                    r#const: Some(serde_json::json!(item.value)),
                    description: item.summary.clone(),
                    ..Default::default()
                },
            );
        }
        out.insert(
            name.clone(),
            DataQuality {
                r#type: Some("integer".into()),
                sdf_choice,
                ..Default::default()
            },
        );
    }

    for (name, bits) in &cluster.bitmaps {
        let mut sdf_choice = BTreeMap::new();
        for bit in bits {
            if !allowed(ctx, &bit.conformance) {
                continue;
            }
            sdf_choice.insert(
                bit.name.clone(),
                DataQuality {
                    r#const: Some(serde_json::json!(bit.bit)),
                    description: bit.summary.clone(),
                    ..Default::default()
                },
            );
        }
        out.insert(
            name.clone(),
            DataQuality {
                r#type: Some("array".into()),
                unique_items: Some(true),
                items: Some(JsoItem(Box::new(DataQuality {
                    sdf_choice,
                    ..Default::default()
                }))),
                ..Default::default()
            },
        );
    }

    for (name, fields) in &cluster.structs {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for field in fields {
            if !allowed(ctx, &field.conformance) {
                continue;
            }
            if is_mandatory(ctx, &field.conformance) {
                required.push(field.name.clone());
            }
            properties.insert(field.name.clone(), field_to_quality(ctx, field));
        }
        out.insert(
            name.clone(),
            DataQuality {
                r#type: Some("object".into()),
                properties,
                required,
                ..Default::default()
            },
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matter::{Access, ClusterSide};

    fn on_off_cluster() -> MatterCluster {
        let mut cluster = MatterCluster::new("OnOff");
        cluster.id = 6;
        cluster.attributes.push(Attribute {
            id: 0,
            name: "OnOff".into(),
            conformance: Some(Conformance::mandatory()),
            access: Some(Access {
                read: Some(true),
                write: Some(false),
                ..Default::default()
            }),
            r#type: "bool".into(),
            ..Default::default()
        });
        cluster
    }

    #[test]
    fn bool_attribute_maps_to_boolean_property() {
        let (_, clusters) = (Option::<&MatterDevice>::None, vec![on_off_cluster()]);
        let (model, _mapping) = convert(None, &clusters).unwrap();
        let object = model.sdf_object.get("OnOff").unwrap();
        let prop = object.sdf_property.get("OnOff").unwrap();
        assert_eq!(prop.data_quality.r#type.as_deref(), Some("boolean"));
        assert!(prop.readable);
        assert!(!prop.writable);
        assert!(object.sdf_required.contains(&"OnOff".to_string()));
    }

    #[test]
    fn y_response_command_produces_uint16_output() {
        let mut cluster = MatterCluster::new("DoorLock");
        cluster.client_commands.push(Command {
            id: 0,
            name: "DoorLock".into(),
            conformance: Some(Conformance::mandatory()),
            response: "Y".into(),
            ..Default::default()
        });
        let (model, _mapping) = convert(None, &[cluster]).unwrap();
        let object = model.sdf_object.get("DoorLock").unwrap();
        let action = object.sdf_action.get("DoorLock").unwrap();
        let output = action.sdf_output_data.as_ref().unwrap();
        assert_eq!(output.r#type.as_deref(), Some("integer"));
        assert_eq!(output.minimum.as_ref().unwrap().as_u64(), Some(0));
        assert_eq!(output.maximum.as_ref().unwrap().as_u64(), Some(u64::from(u16::MAX)));
    }

    #[test]
    fn derived_cluster_pulls_in_base_attribute() {
        let mut base = MatterCluster::new("OnOff");
        base.cluster_aliases.push((6, "OnOff".into()));
        base.attributes.push(Attribute {
            name: "OnOff".into(),
            r#type: "bool".into(),
            conformance: Some(Conformance::mandatory()),
            ..Default::default()
        });

        let mut derived = MatterCluster::new("OnOffLight");
        derived.classification = Some(crate::matter::ClusterClassification {
            hierarchy: "derived".into(),
            base_cluster: "OnOff".into(),
            ..Default::default()
        });

        let (model, _mapping) = convert(None, &[base, derived]).unwrap();
        let object = model.sdf_object.get("OnOffLight").unwrap();
        assert!(object.sdf_property.contains_key("OnOff"));
    }

    #[test]
    fn device_clusters_get_client_server_suffix() {
        let mut client_cluster = MatterCluster::new("OnOff");
        client_cluster.id = 6;
        client_cluster.side = ClusterSide::Client;
        let mut server_cluster = MatterCluster::new("OnOff");
        server_cluster.id = 6;
        server_cluster.side = ClusterSide::Server;

        let device = MatterDevice {
            name: "Bulb".into(),
            clusters: vec![client_cluster, server_cluster],
            ..Default::default()
        };

        let cluster_list = vec![{
            let mut c = MatterCluster::new("OnOff");
            c.id = 6;
            c
        }];

        let (model, _mapping) = convert(Some(&device), &cluster_list).unwrap();
        let thing = model.sdf_thing.get("Bulb").unwrap();
        assert!(thing.sdf_object.contains_key("OnOff_Client"));
        assert!(thing.sdf_object.contains_key("OnOff_Server"));
    }
}
