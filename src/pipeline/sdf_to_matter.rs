// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! `SdfModel` + `SdfMapping` → `(Option<MatterDevice>, Vec<MatterCluster>)`.

use super::{join_cluster_side, last_segment, synth_conformance};
use crate::context::TranslationContext;
use crate::error::{ConvertError, Result};
use crate::matter::{
    Access, Attribute, Bitfield, ClusterClassification, ClusterSide, Command, CommandDirection, Conformance,
    Constraint, ConstraintKind, DataField, DeviceClassification, Event, Feature, Item, MatterCluster, MatterDevice,
    OtherQuality, Variable,
};
use crate::reftree::MappingLookup;
use crate::sdf::{DataQuality, SdfAction, SdfEvent, SdfMapping, SdfModel, SdfObject, SdfProperty, SdfType};
use crate::typemap;

/// Run the `sdf → matter` pipeline. Returns the device (when the model's
/// top-level is an `sdfThing`) and the flat list of clusters it references,
/// or the clusters directly when the model has no thing layer.
pub fn convert(model: &SdfModel, mapping: &SdfMapping) -> Result<(Option<MatterDevice>, Vec<MatterCluster>)> {
    let mut ctx = TranslationContext::new();

    if let Some((thing_name, thing)) = model.sdf_thing.iter().next() {
        let sdf_node = ctx.tree.add_child(ctx.tree.root(), "sdfThing");
        let thing_node = ctx.tree.add_child(sdf_node, thing_name.clone());
        let thing_pointer = ctx.tree.generate_pointer(thing_node);

        let mut clusters = Vec::new();
        for (key, object) in &thing.sdf_object {
            let (cluster_name, side) = super::split_cluster_side(key);
            let mut cluster = build_cluster(&mut ctx, mapping, &cluster_name, object)?;
            cluster.side = side;
            clusters.push(cluster);
        }

        let lookup = MappingLookup::new(&mapping.map);
        let cluster_list = clusters.clone();
        let device = MatterDevice {
            id: import_u32(&lookup, &thing_pointer, "id").unwrap_or(0),
            name: thing_name.clone(),
            summary: thing.common.description.clone(),
            revision: import_u8(&lookup, &thing_pointer, "revision").unwrap_or(1),
            revision_history: import_json(&lookup, &thing_pointer, "revisionHistory").unwrap_or_default(),
            conditions: import_json(&lookup, &thing_pointer, "conditions").unwrap_or_default(),
            classification: import_device_classification(&lookup, &thing_pointer),
            conformance: Some(synth_conformance(mapping, &thing_pointer, !thing.sdf_required.is_empty())),
            clusters,
        };
        Ok((Some(device), cluster_list))
    } else {
        let mut clusters = Vec::new();
        for (key, object) in &model.sdf_object {
            let (cluster_name, side) = super::split_cluster_side(key);
            let mut cluster = build_cluster(&mut ctx, mapping, &cluster_name, object)?;
            cluster.side = side;
            clusters.push(cluster);
        }
        Ok((None, clusters))
    }
}

fn build_cluster(
    ctx: &mut TranslationContext,
    mapping: &SdfMapping,
    name: &str,
    object: &SdfObject,
) -> Result<MatterCluster> {
    let lookup = MappingLookup::new(&mapping.map);
    let object_node = ctx.tree.add_child(ctx.tree.root(), name.to_string());
    let pointer = ctx.tree.generate_pointer(object_node);
    ctx.reset_cluster_scope(pointer.clone());
    ctx.reset_required_scope(object.sdf_required.clone());

    let mut cluster = MatterCluster::new(name);
    cluster.id = import_u32(&lookup, &pointer, "id").unwrap_or(0);
    cluster.revision = import_u8(&lookup, &pointer, "revision").unwrap_or(1);
    cluster.revision_history = import_json(&lookup, &pointer, "revisionHistory").unwrap_or_default();
    cluster.cluster_aliases = import_json(&lookup, &pointer, "clusterAliases").unwrap_or_default();
    cluster.classification = import_classification(&lookup, &pointer);

    let mandatory = MappingLookup::check_for_required(&pointer, &object.sdf_required);
    cluster.conformance = Some(synth_conformance(mapping, &pointer, mandatory));

    for (index, (feature_name, required)) in import_features(&lookup, &pointer).into_iter().enumerate() {
        cluster.feature_map.push(Feature {
            code: format!("F{index}"),
            name: feature_name.clone(),
            summary: String::new(),
            conformance: Some(if required {
                Conformance::mandatory()
            } else {
                Conformance::optional()
            }),
        });
    }

    let mut next_id = object.sdf_property.len() as u32;
    for (index, (prop_name, prop)) in object.sdf_property.iter().enumerate() {
        if prop.data_quality.sdf_choice.is_empty() {
            let attr = build_attribute(ctx, mapping, &pointer, index as u32, prop_name, prop);
            cluster.attributes.push(attr);
        } else {
            // Inverse of matter_to_sdf::build_properties' choice-group
            // reconstruction: one Attribute per choice entry, all sharing
            // `prop_name` as their conformance choice label.
            for (choice_key, choice_dq) in &prop.data_quality.sdf_choice {
                let attr = build_choice_attribute(ctx, mapping, &pointer, next_id, prop_name, choice_key, prop, choice_dq);
                next_id += 1;
                cluster.attributes.push(attr);
            }
        }
    }

    for (action_name, action) in &object.sdf_action {
        build_action(ctx, mapping, &pointer, &mut cluster, action_name, action);
    }

    for (event_name, event) in &object.sdf_event {
        let ev = build_event(ctx, mapping, &pointer, event_name, event);
        cluster.events.push(ev);
    }

    for (data_name, dq) in &object.sdf_data {
        materialize_sdf_data(&mut cluster, data_name, dq);
    }

    Ok(cluster)
}

fn materialize_sdf_data(cluster: &mut MatterCluster, name: &str, dq: &DataQuality) {
    if dq.r#type.as_deref() == Some("integer") && !dq.sdf_choice.is_empty() {
        let items = dq
            .sdf_choice
            .iter()
            .map(|(variant, entry)| Item {
                value: entry.r#const.as_ref().and_then(serde_json::Value::as_i64).unwrap_or(0),
                name: variant.clone(),
                summary: entry.description.clone(),
                conformance: Some(Conformance::mandatory()),
            })
            .collect();
        cluster.enums.insert(name.to_string(), items);
    } else if dq.r#type.as_deref() == Some("array") && dq.unique_items == Some(true) {
        if let Some(items) = &dq.items {
            if !items.0.sdf_choice.is_empty() {
                let bits = items
                    .0
                    .sdf_choice
                    .iter()
                    .map(|(bit_name, entry)| Bitfield {
                        bit: entry.r#const.as_ref().and_then(serde_json::Value::as_u64).unwrap_or(0) as u32,
                        name: bit_name.clone(),
                        summary: entry.description.clone(),
                        conformance: Some(Conformance::mandatory()),
                    })
                    .collect();
                cluster.bitmaps.insert(name.to_string(), bits);
            }
        }
    } else if dq.r#type.as_deref() == Some("object") && !dq.properties.is_empty() {
        let fields = dq
            .properties
            .iter()
            .enumerate()
            .map(|(i, (field_name, field_dq))| DataField {
                id: i as u32,
                name: field_name.clone(),
                conformance: Some(if dq.is_required(field_name) {
                    Conformance::mandatory()
                } else {
                    Conformance::optional()
                }),
                access: None,
                summary: field_dq.description.clone(),
                r#type: field_dq.r#type.clone().unwrap_or_default(),
                constraint: None,
                quality: None,
                default: None,
            })
            .collect();
        cluster.structs.insert(name.to_string(), fields);
    }
}

fn build_attribute(
    ctx: &mut TranslationContext,
    mapping: &SdfMapping,
    cluster_pointer: &str,
    index: u32,
    name: &str,
    prop: &SdfProperty,
) -> Attribute {
    let lookup = MappingLookup::new(&mapping.map);
    let pointer = format!("{cluster_pointer}/sdfProperty/{name}");
    let required = MappingLookup::check_for_required(&pointer, &ctx.sdf_required_list);
    let (matter_type, constraint) = dq_to_matter(ctx, &pointer, &prop.data_quality);

    Attribute {
        id: import_u32(&lookup, &pointer, "id").unwrap_or(index),
        name: name.to_string(),
        conformance: Some(synth_conformance(mapping, &pointer, required)),
        access: Some(Access {
            read: Some(prop.readable),
            write: Some(prop.writable),
            ..import_json(&lookup, &pointer, "access").unwrap_or_default()
        }),
        summary: prop.common.description.clone(),
        r#type: matter_type,
        constraint,
        quality: Some(OtherQuality {
            reportable: Some(prop.observable),
            nullable: prop.data_quality.nullable,
            ..import_json(&lookup, &pointer, "quality").unwrap_or_default()
        }),
        default: None,
    }
}

/// One choice member of a grouped `sdfChoice` property, rebuilt as its own
/// `Attribute` with `Conformance.choice` set to the group's property name.
fn build_choice_attribute(
    ctx: &mut TranslationContext,
    mapping: &SdfMapping,
    cluster_pointer: &str,
    id: u32,
    group_name: &str,
    choice_key: &str,
    prop: &SdfProperty,
    choice_dq: &DataQuality,
) -> Attribute {
    let lookup = MappingLookup::new(&mapping.map);
    let pointer = format!("{cluster_pointer}/sdfProperty/{group_name}");
    let required = MappingLookup::check_for_required(&pointer, &ctx.sdf_required_list);
    let (matter_type, constraint) = dq_to_matter(ctx, &pointer, choice_dq);

    let mut conformance = synth_conformance(mapping, &pointer, required);
    conformance.choice = Some(group_name.to_string());

    Attribute {
        id,
        name: group_name.to_string(),
        conformance: Some(conformance),
        access: Some(Access {
            read: Some(prop.readable),
            write: Some(prop.writable),
            ..import_json(&lookup, &pointer, "access").unwrap_or_default()
        }),
        summary: choice_key.to_string(),
        r#type: matter_type,
        constraint,
        quality: Some(OtherQuality {
            reportable: Some(prop.observable),
            nullable: choice_dq.nullable,
            ..import_json(&lookup, &pointer, "quality").unwrap_or_default()
        }),
        default: None,
    }
}

fn build_action(
    ctx: &mut TranslationContext,
    mapping: &SdfMapping,
    cluster_pointer: &str,
    cluster: &mut MatterCluster,
    name: &str,
    action: &SdfAction,
) {
    let lookup = MappingLookup::new(&mapping.map);
    let pointer = format!("{cluster_pointer}/sdfAction/{name}");
    let required = MappingLookup::check_for_required(&pointer, &ctx.sdf_required_list);

    let command_fields = match &action.sdf_input_data {
        Some(dq) => data_fields_from(ctx, &pointer, dq),
        None => Vec::new(),
    };

    let response = match &action.sdf_output_data {
        None => "N".to_string(),
        Some(dq) => {
            let (min, max) = typemap::dq_bounds(dq);
            if dq.r#type.as_deref() == Some("integer") && min == Some(0) && max == Some(u16::MAX as i128) {
                "Y".to_string()
            } else {
                let response_name = format!("{name}Response");
                let fields = data_fields_from(ctx, &pointer, dq);
                let server_cmd = Command {
                    id: import_u32(&lookup, &pointer, "responseId").unwrap_or(0),
                    name: response_name.clone(),
                    conformance: Some(Conformance::mandatory()),
                    access: None,
                    summary: String::new(),
                    direction: CommandDirection::ResponseFromServer,
                    response: "N".to_string(),
                    command_fields: fields,
                };
                cluster.server_commands.insert(response_name.clone(), server_cmd);
                response_name
            }
        }
    };

    let client_command = Command {
        id: import_u32(&lookup, &pointer, "id").unwrap_or(cluster.client_commands.len() as u32),
        name: name.to_string(),
        conformance: Some(synth_conformance(mapping, &pointer, required)),
        access: import_json(&lookup, &pointer, "access"),
        summary: action.common.description.clone(),
        direction: CommandDirection::CommandToServer,
        response,
        command_fields,
    };
    cluster.client_commands.push(client_command);
}

fn build_event(
    ctx: &mut TranslationContext,
    mapping: &SdfMapping,
    cluster_pointer: &str,
    name: &str,
    event: &SdfEvent,
) -> Event {
    let lookup = MappingLookup::new(&mapping.map);
    let pointer = format!("{cluster_pointer}/sdfEvent/{name}");
    let required = MappingLookup::check_for_required(&pointer, &ctx.sdf_required_list);

    let data = match &event.sdf_output_data {
        Some(dq) => data_fields_from(ctx, &pointer, dq),
        None => Vec::new(),
    };

    Event {
        id: import_u32(&lookup, &pointer, "id").unwrap_or(0),
        name: name.to_string(),
        conformance: Some(synth_conformance(mapping, &pointer, required)),
        access: import_json(&lookup, &pointer, "access"),
        summary: event.common.description.clone(),
        priority: lookup
            .import(&pointer, "priority")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        quality: import_json(&lookup, &pointer, "quality"),
        data,
    }
}

fn data_fields_from(ctx: &mut TranslationContext, pointer: &str, dq: &DataQuality) -> Vec<DataField> {
    if dq.r#type.as_deref() == Some("object") && !dq.properties.is_empty() {
        dq.properties
            .iter()
            .enumerate()
            .map(|(i, (field_name, field_dq))| {
                let field_pointer = format!("{pointer}/{field_name}");
                let (ty, constraint) = dq_to_matter(ctx, &field_pointer, field_dq);
                DataField {
                    id: i as u32,
                    name: field_name.clone(),
                    conformance: Some(if dq.is_required(field_name) {
                        Conformance::mandatory()
                    } else {
                        Conformance::optional()
                    }),
                    access: None,
                    summary: field_dq.description.clone(),
                    r#type: ty,
                    constraint,
                    quality: None,
                    default: None,
                }
            })
            .collect()
    } else {
        let (ty, constraint) = dq_to_matter(ctx, pointer, dq);
        vec![DataField {
            id: 0,
            name: "Payload".to_string(),
            conformance: Some(Conformance::mandatory()),
            access: None,
            summary: dq.description.clone(),
            r#type: ty,
            constraint,
            quality: None,
            default: None,
        }]
    }
}

/// The SDF → Matter data-type cascade (the inverse of
/// `typemap::matter_type_to_data_quality`). Struct/enum/bitmap
/// materialization is intentionally out of scope here - it happens one level
/// up, against `sdf_data` entries, via [`materialize_sdf_data`], since a
/// `DataQuality` embedded in a property/field has nowhere of its own to store
/// a materialized definition.
fn dq_to_matter(ctx: &mut TranslationContext, _pointer: &str, dq: &DataQuality) -> (String, Option<Constraint>) {
    match dq.r#type.as_deref() {
        Some("boolean") => ("bool".to_string(), None),
        Some("number") => ("double".to_string(), number_constraint(dq)),
        Some("string") => {
            if dq.sdf_type == Some(SdfType::ByteString) {
                ("octstr".to_string(), typemap::length_constraint(dq))
            } else if dq.sdf_type == Some(SdfType::UnixTime) {
                ("posix-ms".to_string(), None)
            } else if let Some(sdf_ref) = &dq.sdf_ref {
                (last_segment(sdf_ref).to_string(), None)
            } else {
                ("string".to_string(), typemap::length_constraint(dq))
            }
        }
        Some("integer") => {
            let (min, max) = typemap::dq_bounds(dq);
            let const_value = dq.r#const.as_ref().and_then(serde_json::Value::as_i64).map(i128::from);
            let (mut ty, constraint) = typemap::fit_integer_type(min, max, const_value);
            if let (Some(unit), Some(min), Some(max)) = (&dq.unit, min, max) {
                if let Some(derived) = typemap::derived_unit_override(unit, min, max) {
                    ty = derived.to_string();
                }
            }
            (ty, constraint)
        }
        Some("array") => ("list".to_string(), typemap::count_constraint(dq)),
        Some("object") => {
            if let Some(sdf_ref) = &dq.sdf_ref {
                (last_segment(sdf_ref).to_string(), None)
            } else {
                ("struct".to_string(), None)
            }
        }
        _ => {
            ctx.warn(ConvertError::InputShape {
                path: String::new(),
                message: "data quality missing a type".to_string(),
            });
            ("string".to_string(), None)
        }
    }
}

fn number_constraint(dq: &DataQuality) -> Option<Constraint> {
    if let Some(c) = &dq.r#const {
        return c.as_f64().map(|v| Constraint {
            kind: ConstraintKind::Allowed,
            value: Some(Variable::F64(v)),
            ..Default::default()
        });
    }
    match (&dq.minimum, &dq.maximum) {
        (Some(min), Some(max)) => Some(Constraint {
            kind: ConstraintKind::Between,
            min: Some(Variable::F64(min.as_f64().unwrap_or_default())),
            max: Some(Variable::F64(max.as_f64().unwrap_or_default())),
            ..Default::default()
        }),
        (Some(min), None) => Some(Constraint {
            kind: ConstraintKind::Min,
            min: Some(Variable::F64(min.as_f64().unwrap_or_default())),
            ..Default::default()
        }),
        (None, Some(max)) => Some(Constraint {
            kind: ConstraintKind::Max,
            max: Some(Variable::F64(max.as_f64().unwrap_or_default())),
            ..Default::default()
        }),
        (None, None) => None,
    }
}

fn import_u32(lookup: &MappingLookup<'_>, pointer: &str, field: &str) -> Option<u32> {
    lookup.import(pointer, field).and_then(serde_json::Value::as_u64).map(|v| v as u32)
}

fn import_u8(lookup: &MappingLookup<'_>, pointer: &str, field: &str) -> Option<u8> {
    lookup.import(pointer, field).and_then(serde_json::Value::as_u64).map(|v| v as u8)
}

fn import_json<T: serde::de::DeserializeOwned>(lookup: &MappingLookup<'_>, pointer: &str, field: &str) -> Option<T> {
    lookup
        .import(pointer, field)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn import_classification(lookup: &MappingLookup<'_>, pointer: &str) -> Option<ClusterClassification> {
    import_json(lookup, pointer, "classification")
}

fn import_device_classification(lookup: &MappingLookup<'_>, pointer: &str) -> Option<DeviceClassification> {
    import_json(lookup, pointer, "classification")
}

fn import_features(lookup: &MappingLookup<'_>, pointer: &str) -> Vec<(String, bool)> {
    lookup
        .import(pointer, "features")
        .and_then(serde_json::Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), v.get("mandatory").and_then(serde_json::Value::as_bool).unwrap_or(false)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::CommonQualities;
    use std::collections::BTreeMap;

    fn bool_property() -> SdfProperty {
        SdfProperty {
            common: CommonQualities::default(),
            data_quality: DataQuality {
                r#type: Some("boolean".into()),
                ..Default::default()
            },
            readable: true,
            writable: true,
            observable: false,
        }
    }

    #[test]
    fn on_off_property_maps_to_bool_attribute() {
        let mut sdf_property = BTreeMap::new();
        sdf_property.insert("OnOff".to_string(), bool_property());
        let object = SdfObject {
            sdf_property,
            ..Default::default()
        };
        let mut sdf_object = BTreeMap::new();
        sdf_object.insert("OnOff".to_string(), object);
        let model = SdfModel {
            sdf_object,
            ..Default::default()
        };
        let mapping = SdfMapping::default();

        let (device, clusters) = convert(&model, &mapping).unwrap();
        assert!(device.is_none());
        assert_eq!(clusters.len(), 1);
        let attr = &clusters[0].attributes[0];
        assert_eq!(attr.name, "OnOff");
        assert_eq!(attr.r#type, "bool");
        assert_eq!(attr.access.as_ref().unwrap().read, Some(true));
        assert_eq!(attr.access.as_ref().unwrap().write, Some(true));
    }

    #[test]
    fn level_property_fits_uint8_with_max_constraint() {
        let mut sdf_property = BTreeMap::new();
        sdf_property.insert(
            "Level".to_string(),
            SdfProperty {
                common: CommonQualities::default(),
                data_quality: DataQuality {
                    r#type: Some("integer".into()),
                    minimum: Some(serde_json::Number::from(0)),
                    maximum: Some(serde_json::Number::from(254)),
                    ..Default::default()
                },
                readable: true,
                writable: false,
                observable: false,
            },
        );
        let object = SdfObject {
            sdf_property,
            ..Default::default()
        };
        let mut sdf_object = BTreeMap::new();
        sdf_object.insert("Level".to_string(), object);
        let model = SdfModel {
            sdf_object,
            ..Default::default()
        };

        let (_, clusters) = convert(&model, &SdfMapping::default()).unwrap();
        let attr = &clusters[0].attributes[0];
        assert_eq!(attr.r#type, "uint8");
        assert_eq!(attr.constraint.as_ref().unwrap().kind, ConstraintKind::Max);
    }

    #[test]
    fn action_with_y_response_shape_needs_no_server_command() {
        let mut sdf_action = BTreeMap::new();
        sdf_action.insert(
            "DoorLock".to_string(),
            SdfAction {
                common: CommonQualities::default(),
                sdf_input_data: None,
                sdf_output_data: Some(DataQuality {
                    r#type: Some("integer".into()),
                    minimum: Some(serde_json::Number::from(0)),
                    maximum: Some(serde_json::Number::from(u16::MAX)),
                    ..Default::default()
                }),
                sdf_data: BTreeMap::new(),
            },
        );
        let object = SdfObject {
            sdf_action,
            ..Default::default()
        };
        let mut sdf_object = BTreeMap::new();
        sdf_object.insert("DoorLock".to_string(), object);
        let model = SdfModel {
            sdf_object,
            ..Default::default()
        };

        let (_, clusters) = convert(&model, &SdfMapping::default()).unwrap();
        assert_eq!(clusters[0].client_commands[0].response, "Y");
        assert!(clusters[0].server_commands.is_empty());
    }

    #[test]
    fn choice_property_expands_to_one_attribute_per_member() {
        let mut sdf_choice = BTreeMap::new();
        sdf_choice.insert(
            "AsCelsius".to_string(),
            DataQuality {
                r#type: Some("number".into()),
                ..Default::default()
            },
        );
        sdf_choice.insert(
            "AsFahrenheit".to_string(),
            DataQuality {
                r#type: Some("number".into()),
                ..Default::default()
            },
        );
        let mut sdf_property = BTreeMap::new();
        sdf_property.insert(
            "Temperature".to_string(),
            SdfProperty {
                common: CommonQualities::default(),
                data_quality: DataQuality {
                    sdf_choice,
                    ..Default::default()
                },
                readable: true,
                writable: false,
                observable: false,
            },
        );
        let object = SdfObject {
            sdf_property,
            ..Default::default()
        };
        let mut sdf_object = BTreeMap::new();
        sdf_object.insert("Temperature".to_string(), object);
        let model = SdfModel {
            sdf_object,
            ..Default::default()
        };

        let (_, clusters) = convert(&model, &SdfMapping::default()).unwrap();
        let attrs = &clusters[0].attributes;
        assert_eq!(attrs.len(), 2);
        assert!(attrs.iter().all(|a| a.name == "Temperature"));
        assert!(attrs.iter().all(|a| a.conformance.as_ref().unwrap().choice.as_deref() == Some("Temperature")));
        let summaries: std::collections::BTreeSet<_> = attrs.iter().map(|a| a.summary.as_str()).collect();
        assert!(summaries.contains("AsCelsius"));
        assert!(summaries.contains("AsFahrenheit"));
    }

    #[test]
    fn device_with_client_and_server_cluster_sides() {
        let mut sdf_thing_object = BTreeMap::new();
        sdf_thing_object.insert(join_cluster_side("OnOff", ClusterSide::Client), SdfObject::default());
        sdf_thing_object.insert(join_cluster_side("OnOff", ClusterSide::Server), SdfObject::default());
        let mut sdf_thing = BTreeMap::new();
        sdf_thing.insert(
            "Bulb".to_string(),
            crate::sdf::SdfThing {
                sdf_object: sdf_thing_object,
                ..Default::default()
            },
        );
        let model = SdfModel {
            sdf_thing,
            ..Default::default()
        };

        let (device, cluster_list) = convert(&model, &SdfMapping::default()).unwrap();
        let device = device.unwrap();
        assert_eq!(device.clusters.len(), 2);
        assert!(device.clusters.iter().any(|c| c.side == ClusterSide::Client));
        assert!(device.clusters.iter().any(|c| c.side == ClusterSide::Server));

        // The flat cluster list must mirror the device's clusters, not come
        // back empty - callers (XML writer, --round-trip) depend on it.
        assert_eq!(cluster_list.len(), device.clusters.len());
        assert_eq!(
            cluster_list.iter().map(|c| c.name.clone()).collect::<std::collections::BTreeSet<_>>(),
            device.clusters.iter().map(|c| c.name.clone()).collect::<std::collections::BTreeSet<_>>()
        );
    }
}
