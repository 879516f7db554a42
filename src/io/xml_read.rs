// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Matter XML loading: `<configurator><cluster>...</cluster></configurator>`
//! and `<configurator><deviceType>...</deviceType></configurator>`. Parsed
//! with `Document::parse`, `.descendants().find(...)`, `.attribute(...)`.

use crate::conformance::ConformanceExpr;
use crate::matter::{
    Access, Attribute, Bitfield, Command, CommandDirection, Conformance, Constraint, ConstraintKind,
    ClusterClassification, DataField, DeviceClassification, Event, Feature, Item, MatterCluster, MatterDevice,
    OtherQuality,
};
use anyhow::{anyhow, Context, Result};
use roxmltree::{Document, Node};
use std::fs;
use std::path::Path;

pub fn load_cluster_xml(path: impl AsRef<Path>) -> Result<Vec<MatterCluster>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading cluster XML {}", path.display()))?;
    let doc = Document::parse(&text).with_context(|| format!("parsing cluster XML {}", path.display()))?;
    let root = doc.root_element();
    root.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "cluster")
        .map(parse_cluster)
        .collect()
}

pub fn load_device_xml(path: impl AsRef<Path>) -> Result<MatterDevice> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading device XML {}", path.display()))?;
    let doc = Document::parse(&text).with_context(|| format!("parsing device XML {}", path.display()))?;
    let root = doc.root_element();
    let device_type = root
        .descendants()
        .find(|n| n.tag_name().name() == "deviceType")
        .ok_or_else(|| anyhow!("no deviceType found in {}", path.display()))?;
    parse_device(&device_type)
}

fn parse_cluster(node: Node) -> Result<MatterCluster> {
    let name = child_text(&node, "name").unwrap_or_default();
    let mut cluster = MatterCluster::new(name);
    cluster.id = attr_hex(&node, "code").or_else(|| child_text_hex(&node, "code")).unwrap_or(0);
    cluster.revision = child_text(&node, "revision").and_then(|s| s.parse().ok()).unwrap_or(1);
    cluster.summary = child_text(&node, "summary").unwrap_or_default();
    cluster.conformance = find_conformance(&node);

    if let Some(classification) = node.children().find(|n| n.tag_name().name() == "classification") {
        cluster.classification = Some(ClusterClassification {
            hierarchy: classification.attribute("hierarchy").unwrap_or_default().to_string(),
            role: classification.attribute("role").unwrap_or_default().to_string(),
            pics_code: classification.attribute("picsCode").unwrap_or_default().to_string(),
            scope: classification.attribute("scope").unwrap_or_default().to_string(),
            base_cluster: classification.attribute("baseCluster").unwrap_or_default().to_string(),
        });
    }

    if let Some(ids) = node.children().find(|n| n.tag_name().name() == "clusterIds") {
        for id_node in ids.children().filter(|n| n.tag_name().name() == "clusterId") {
            if let (Some(id), Some(name)) = (attr_hex(&id_node, "id"), id_node.attribute("name")) {
                cluster.cluster_aliases.push((id, name.to_string()));
            }
        }
    }

    if let Some(history) = node.children().find(|n| n.tag_name().name() == "revisionHistory") {
        for rev in history.children().filter(|n| n.tag_name().name() == "revision") {
            if let Some(r) = rev.attribute("revision").and_then(|s| s.parse().ok()) {
                cluster.revision_history.insert(r, rev.attribute("summary").unwrap_or_default().to_string());
            }
        }
    }

    if let Some(features) = node.children().find(|n| n.tag_name().name() == "features") {
        for feature_node in features.children().filter(|n| n.tag_name().name() == "feature") {
            cluster.feature_map.push(Feature {
                code: feature_node.attribute("code").unwrap_or_default().to_string(),
                name: feature_node.attribute("name").unwrap_or_default().to_string(),
                summary: feature_node.attribute("summary").unwrap_or_default().to_string(),
                conformance: find_conformance(&feature_node),
            });
        }
    }

    if let Some(attributes) = node.children().find(|n| n.tag_name().name() == "attributes") {
        for attr_node in attributes.children().filter(|n| n.tag_name().name() == "attribute") {
            cluster.attributes.push(parse_attribute(&attr_node));
        }
    }

    if let Some(commands) = node.children().find(|n| n.tag_name().name() == "commands") {
        for cmd_node in commands.children().filter(|n| n.tag_name().name() == "command") {
            let command = parse_command(&cmd_node);
            match command.direction {
                CommandDirection::CommandToServer => cluster.client_commands.push(command),
                CommandDirection::ResponseFromServer => {
                    cluster.server_commands.insert(command.name.clone(), command);
                }
            }
        }
    }

    if let Some(events) = node.children().find(|n| n.tag_name().name() == "events") {
        for event_node in events.children().filter(|n| n.tag_name().name() == "event") {
            cluster.events.push(parse_event(&event_node));
        }
    }

    if let Some(data_types) = node.children().find(|n| n.tag_name().name() == "dataTypes") {
        for enum_node in data_types.children().filter(|n| n.tag_name().name() == "enum") {
            let name = enum_node.attribute("name").unwrap_or_default().to_string();
            let items = enum_node
                .children()
                .filter(|n| n.tag_name().name() == "item")
                .map(|item_node| Item {
                    value: attr_hex(&item_node, "value").unwrap_or(0) as i64,
                    name: item_node.attribute("name").unwrap_or_default().to_string(),
                    summary: item_node.attribute("summary").unwrap_or_default().to_string(),
                    conformance: find_conformance(&item_node),
                })
                .collect();
            cluster.enums.insert(name, items);
        }
        for bitmap_node in data_types.children().filter(|n| n.tag_name().name() == "bitmap") {
            let name = bitmap_node.attribute("name").unwrap_or_default().to_string();
            let bits = bitmap_node
                .children()
                .filter(|n| n.tag_name().name() == "bitfield")
                .map(|bit_node| Bitfield {
                    bit: attr_hex(&bit_node, "bit").unwrap_or(0),
                    name: bit_node.attribute("name").unwrap_or_default().to_string(),
                    summary: bit_node.attribute("summary").unwrap_or_default().to_string(),
                    conformance: find_conformance(&bit_node),
                })
                .collect();
            cluster.bitmaps.insert(name, bits);
        }
        for struct_node in data_types.children().filter(|n| n.tag_name().name() == "struct") {
            let name = struct_node.attribute("name").unwrap_or_default().to_string();
            let fields = struct_node
                .children()
                .filter(|n| n.tag_name().name() == "field")
                .map(parse_data_field)
                .collect();
            cluster.structs.insert(name, fields);
        }
    }

    Ok(cluster)
}

fn parse_device(node: &Node) -> Result<MatterDevice> {
    let mut device = MatterDevice {
        name: child_text(node, "name").unwrap_or_default(),
        id: attr_hex(node, "id").or_else(|| child_text_hex(node, "deviceId")).unwrap_or(0),
        summary: child_text(node, "summary").unwrap_or_default(),
        revision: child_text(node, "revision").and_then(|s| s.parse().ok()).unwrap_or(1),
        conformance: find_conformance(node),
        ..Default::default()
    };

    if let Some(classification) = node.children().find(|n| n.tag_name().name() == "classification") {
        device.classification = Some(DeviceClassification {
            superset: classification.attribute("superset").unwrap_or_default().to_string(),
            class: classification.attribute("class").unwrap_or_default().to_string(),
            scope: classification.attribute("scope").unwrap_or_default().to_string(),
        });
    }

    if let Some(conditions) = node.children().find(|n| n.tag_name().name() == "conditions") {
        device.conditions = conditions
            .children()
            .filter(|n| n.tag_name().name() == "condition")
            .filter_map(|n| n.attribute("name").map(str::to_string))
            .collect();
    }

    if let Some(clusters) = node.children().find(|n| n.tag_name().name() == "clusters") {
        for cluster_node in clusters.children().filter(|n| n.tag_name().name() == "cluster") {
            let id = attr_hex(&cluster_node, "id").unwrap_or(0);
            let name = cluster_node.attribute("name").unwrap_or_default().to_string();
            let mut cluster = MatterCluster::new(name);
            cluster.id = id;
            cluster.conformance = find_conformance(&cluster_node);
            cluster.side = match cluster_node.attribute("side") {
                Some("client") => crate::matter::ClusterSide::Client,
                Some("server") => crate::matter::ClusterSide::Server,
                _ => crate::matter::ClusterSide::Unspecified,
            };
            device.clusters.push(cluster);
        }
    }

    Ok(device)
}

fn parse_attribute(node: &Node) -> Attribute {
    Attribute {
        id: attr_hex(node, "id").unwrap_or(0),
        name: node.attribute("name").unwrap_or_default().to_string(),
        conformance: find_conformance(node),
        access: parse_access(node),
        summary: node.attribute("summary").unwrap_or_default().to_string(),
        r#type: node.attribute("type").unwrap_or_default().to_string(),
        constraint: parse_constraint(node),
        quality: parse_quality(node),
        default: node.attribute("default").map(|v| crate::matter::Variable::String(v.to_string())),
    }
}

fn parse_command(node: &Node) -> Command {
    Command {
        id: attr_hex(node, "id").unwrap_or(0),
        name: node.attribute("name").unwrap_or_default().to_string(),
        conformance: find_conformance(node),
        access: parse_access(node),
        summary: node.attribute("summary").unwrap_or_default().to_string(),
        direction: match node.attribute("direction") {
            Some("responseFromServer") => CommandDirection::ResponseFromServer,
            _ => CommandDirection::CommandToServer,
        },
        response: node.attribute("response").unwrap_or("N").to_string(),
        command_fields: node.children().filter(|n| n.tag_name().name() == "field").map(parse_data_field).collect(),
    }
}

fn parse_event(node: &Node) -> Event {
    Event {
        id: attr_hex(node, "id").unwrap_or(0),
        name: node.attribute("name").unwrap_or_default().to_string(),
        conformance: find_conformance(node),
        access: parse_access(node),
        summary: node.attribute("summary").unwrap_or_default().to_string(),
        priority: node.attribute("priority").map(str::to_string),
        quality: parse_quality(node),
        data: node.children().filter(|n| n.tag_name().name() == "field").map(parse_data_field).collect(),
    }
}

fn parse_data_field(node: Node) -> DataField {
    DataField {
        id: attr_hex(&node, "id").unwrap_or(0),
        name: node.attribute("name").unwrap_or_default().to_string(),
        conformance: find_conformance(&node),
        access: parse_access(&node),
        summary: node.attribute("summary").unwrap_or_default().to_string(),
        r#type: node.attribute("type").unwrap_or_default().to_string(),
        constraint: parse_constraint(&node),
        quality: parse_quality(&node),
        default: node.attribute("default").map(|v| crate::matter::Variable::String(v.to_string())),
    }
}

fn parse_access(node: &Node) -> Option<Access> {
    let access_node = node.children().find(|n| n.tag_name().name() == "access")?;
    Some(Access {
        read: access_node.attribute("read").map(|v| v == "true"),
        write: access_node.attribute("write").map(|v| v == "true"),
        fabric_scoped: access_node.attribute("fabricScoped").map(|v| v == "true"),
        fabric_sensitive: access_node.attribute("fabricSensitive").map(|v| v == "true"),
        read_privilege: access_node.attribute("readPrivilege").map(str::to_string),
        write_privilege: access_node.attribute("writePrivilege").map(str::to_string),
        invoke_privilege: access_node.attribute("invokePrivilege").map(str::to_string),
        timed: access_node.attribute("timed").map(|v| v == "true"),
    })
}

fn parse_quality(node: &Node) -> Option<OtherQuality> {
    let quality_node = node.children().find(|n| n.tag_name().name() == "quality")?;
    Some(OtherQuality {
        nullable: quality_node.attribute("nullable").map(|v| v == "true"),
        non_volatile: quality_node.attribute("nonVolatile").map(|v| v == "true"),
        fixed: quality_node.attribute("fixed").map(|v| v == "true"),
        scene: quality_node.attribute("scene").map(|v| v == "true"),
        reportable: quality_node.attribute("reportable").map(|v| v == "true"),
        change_omitted: quality_node.attribute("changeOmitted").map(|v| v == "true"),
        singleton: quality_node.attribute("singleton").map(|v| v == "true"),
        diagnostics: quality_node.attribute("diagnostics").map(|v| v == "true"),
        large_message: quality_node.attribute("largeMessage").map(|v| v == "true"),
        quieter_reporting: quality_node.attribute("quieterReporting").map(|v| v == "true"),
    })
}

fn parse_constraint(node: &Node) -> Option<Constraint> {
    let constraint_node = node.children().find(|n| n.tag_name().name() == "constraint")?;
    let kind = match constraint_node.attribute("type")? {
        "allowed" => ConstraintKind::Allowed,
        "between" => ConstraintKind::Between,
        "min" => ConstraintKind::Min,
        "max" => ConstraintKind::Max,
        "lengthBetween" => ConstraintKind::LengthBetween,
        "minLength" => ConstraintKind::MinLength,
        "maxLength" => ConstraintKind::MaxLength,
        "countBetween" => ConstraintKind::CountBetween,
        "minCount" => ConstraintKind::MinCount,
        "maxCount" => ConstraintKind::MaxCount,
        "desc" => ConstraintKind::Desc,
        _ => ConstraintKind::None,
    };
    Some(Constraint {
        kind,
        value: constraint_node.attribute("value").map(|v| crate::matter::Variable::String(v.to_string())),
        min: constraint_node.attribute("min").map(|v| crate::matter::Variable::String(v.to_string())),
        max: constraint_node.attribute("max").map(|v| crate::matter::Variable::String(v.to_string())),
        entry_type: constraint_node.attribute("entryType").map(str::to_string),
        entry_constraint: None,
    })
}

/// Look for one of the closed conformance child tags on `node`
/// (`mandatoryConform`, `optionalConform`, ...), recursing into a nested
/// boolean tree via [`conformance_expr_from_xml`].
fn find_conformance(node: &Node) -> Option<Conformance> {
    for child in node.children().filter(|n| n.is_element()) {
        let tag = child.tag_name().name();
        let condition = child
            .first_element_child()
            .map(|inner| conformance_expr_from_xml(&inner))
            .unwrap_or(ConformanceExpr::True);
        let mut conformance = Conformance {
            condition,
            ..Default::default()
        };
        match tag {
            "mandatoryConform" => conformance.mandatory = true,
            "optionalConform" => {
                conformance.optional = true;
                conformance.choice = child.attribute("choice").map(str::to_string);
                conformance.choice_more = child.attribute("more").map(|v| v == "true");
            }
            "provisionalConform" => conformance.provisional = true,
            "deprecateConform" => conformance.deprecated = true,
            "disallowConform" => conformance.disallowed = true,
            "otherwiseConform" => {
                conformance.otherwise = child
                    .children()
                    .filter(|n| n.is_element())
                    .filter_map(|alt| find_conformance_single(&alt))
                    .collect();
            }
            _ => continue,
        }
        return Some(conformance);
    }
    None
}

fn find_conformance_single(node: &Node) -> Option<Conformance> {
    let tag = node.tag_name().name();
    let condition = node
        .first_element_child()
        .map(|inner| conformance_expr_from_xml(&inner))
        .unwrap_or(ConformanceExpr::True);
    let mut conformance = Conformance {
        condition,
        ..Default::default()
    };
    match tag {
        "mandatoryConform" => conformance.mandatory = true,
        "optionalConform" => conformance.optional = true,
        "provisionalConform" => conformance.provisional = true,
        "deprecateConform" => conformance.deprecated = true,
        "disallowConform" => conformance.disallowed = true,
        _ => return None,
    }
    Some(conformance)
}

fn conformance_expr_from_xml(node: &Node) -> ConformanceExpr {
    match node.tag_name().name() {
        "andTerm" => ConformanceExpr::And(node.children().filter(|n| n.is_element()).map(|n| conformance_expr_from_xml(&n)).collect()),
        "orTerm" => ConformanceExpr::Or(node.children().filter(|n| n.is_element()).map(|n| conformance_expr_from_xml(&n)).collect()),
        "xorTerm" => ConformanceExpr::Xor(node.children().filter(|n| n.is_element()).map(|n| conformance_expr_from_xml(&n)).collect()),
        "notTerm" => node
            .first_element_child()
            .map(|inner| ConformanceExpr::Not(Box::new(conformance_expr_from_xml(&inner))))
            .unwrap_or(ConformanceExpr::True),
        "feature" => ConformanceExpr::Feature {
            code: node.attribute("name").unwrap_or_default().to_string(),
        },
        "condition" => ConformanceExpr::Condition {
            name: node.attribute("name").unwrap_or_default().to_string(),
        },
        "attribute" => ConformanceExpr::Attribute {
            name: node.attribute("name").unwrap_or_default().to_string(),
        },
        _ => ConformanceExpr::True,
    }
}

fn child_text(node: &Node, tag: &str) -> Option<String> {
    node.children().find(|n| n.tag_name().name() == tag).and_then(|n| n.text()).map(str::trim).map(str::to_string)
}

fn child_text_hex(node: &Node, tag: &str) -> Option<u32> {
    child_text(node, tag).and_then(|s| parse_hex(&s))
}

fn attr_hex(node: &Node, attr: &str) -> Option<u32> {
    node.attribute(attr).and_then(parse_hex)
}

fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
