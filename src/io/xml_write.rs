// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Matter XML writing: a small hand-rolled writer (see DESIGN.md) that
//! emits the mirror image of what `xml_read` parses.

use crate::matter::{
    Access, Attribute, Bitfield, Command, Conformance, Constraint, ConstraintKind, DataField, Event, Feature, Item,
    MatterCluster, MatterDevice, OtherQuality,
};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub fn write_cluster_xml(path: impl AsRef<Path>, clusters: &[MatterCluster]) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<configurator>\n");
    for cluster in clusters {
        write_cluster(&mut out, cluster);
    }
    out.push_str("</configurator>\n");
    fs::write(path, out).with_context(|| format!("writing cluster XML {}", path.display()))
}

pub fn write_device_xml(path: impl AsRef<Path>, device: &MatterDevice) -> Result<()> {
    let path = path.as_ref();
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<configurator>\n  <deviceType>\n");
    let _ = writeln!(out, "    <name>{}</name>", escape(&device.name));
    let _ = writeln!(out, "    <deviceId>0x{:04X}</deviceId>", device.id);
    if !device.summary.is_empty() {
        let _ = writeln!(out, "    <summary>{}</summary>", escape(&device.summary));
    }
    let _ = writeln!(out, "    <revision>{}</revision>", device.revision);
    if let Some(classification) = &device.classification {
        let _ = writeln!(
            out,
            "    <classification superset=\"{}\" class=\"{}\" scope=\"{}\"/>",
            escape(&classification.superset),
            escape(&classification.class),
            escape(&classification.scope)
        );
    }
    write_conformance(&mut out, 2, &device.conformance);
    if !device.conditions.is_empty() {
        out.push_str("    <conditions>\n");
        for condition in &device.conditions {
            let _ = writeln!(out, "      <condition name=\"{}\"/>", escape(condition));
        }
        out.push_str("    </conditions>\n");
    }
    out.push_str("    <clusters>\n");
    for cluster in &device.clusters {
        let _ = writeln!(
            out,
            "      <cluster id=\"0x{:04X}\" name=\"{}\" side=\"{}\">",
            cluster.id,
            escape(&cluster.name),
            match cluster.side {
                crate::matter::ClusterSide::Client => "client",
                crate::matter::ClusterSide::Server => "server",
                crate::matter::ClusterSide::Unspecified => "",
            }
        );
        write_conformance(&mut out, 4, &cluster.conformance);
        out.push_str("      </cluster>\n");
    }
    out.push_str("    </clusters>\n  </deviceType>\n</configurator>\n");
    fs::write(path, out).with_context(|| format!("writing device XML {}", path.display()))
}

fn write_cluster(out: &mut String, cluster: &MatterCluster) {
    let _ = writeln!(out, "  <cluster code=\"0x{:04X}\">", cluster.id);
    let _ = writeln!(out, "    <name>{}</name>", escape(&cluster.name));
    if !cluster.summary.is_empty() {
        let _ = writeln!(out, "    <summary>{}</summary>", escape(&cluster.summary));
    }
    let _ = writeln!(out, "    <revision>{}</revision>", cluster.revision);
    if !cluster.revision_history.is_empty() {
        out.push_str("    <revisionHistory>\n");
        for (revision, summary) in &cluster.revision_history {
            let _ = writeln!(out, "      <revision revision=\"{revision}\" summary=\"{}\"/>", escape(summary));
        }
        out.push_str("    </revisionHistory>\n");
    }
    if let Some(classification) = &cluster.classification {
        let _ = writeln!(
            out,
            "    <classification hierarchy=\"{}\" role=\"{}\" picsCode=\"{}\" scope=\"{}\" baseCluster=\"{}\"/>",
            escape(&classification.hierarchy),
            escape(&classification.role),
            escape(&classification.pics_code),
            escape(&classification.scope),
            escape(&classification.base_cluster)
        );
    }
    write_conformance(out, 2, &cluster.conformance);
    if !cluster.cluster_aliases.is_empty() {
        out.push_str("    <clusterIds>\n");
        for (id, name) in &cluster.cluster_aliases {
            let _ = writeln!(out, "      <clusterId id=\"0x{id:04X}\" name=\"{}\"/>", escape(name));
        }
        out.push_str("    </clusterIds>\n");
    }
    if !cluster.feature_map.is_empty() {
        out.push_str("    <features>\n");
        for feature in &cluster.feature_map {
            write_feature(out, feature);
        }
        out.push_str("    </features>\n");
    }
    if !cluster.attributes.is_empty() {
        out.push_str("    <attributes>\n");
        for attribute in &cluster.attributes {
            write_attribute(out, attribute);
        }
        out.push_str("    </attributes>\n");
    }
    if !cluster.client_commands.is_empty() || !cluster.server_commands.is_empty() {
        out.push_str("    <commands>\n");
        for command in &cluster.client_commands {
            write_command(out, command);
        }
        for command in cluster.server_commands.values() {
            write_command(out, command);
        }
        out.push_str("    </commands>\n");
    }
    if !cluster.events.is_empty() {
        out.push_str("    <events>\n");
        for event in &cluster.events {
            write_event(out, event);
        }
        out.push_str("    </events>\n");
    }
    if !cluster.enums.is_empty() || !cluster.bitmaps.is_empty() || !cluster.structs.is_empty() {
        out.push_str("    <dataTypes>\n");
        for (name, items) in &cluster.enums {
            let _ = writeln!(out, "      <enum name=\"{}\">", escape(name));
            for item in items {
                write_item(out, item);
            }
            out.push_str("      </enum>\n");
        }
        for (name, bits) in &cluster.bitmaps {
            let _ = writeln!(out, "      <bitmap name=\"{}\">", escape(name));
            for bit in bits {
                write_bitfield(out, bit);
            }
            out.push_str("      </bitmap>\n");
        }
        for (name, fields) in &cluster.structs {
            let _ = writeln!(out, "      <struct name=\"{}\">", escape(name));
            for field in fields {
                write_data_field(out, field, 8);
            }
            out.push_str("      </struct>\n");
        }
        out.push_str("    </dataTypes>\n");
    }
    out.push_str("  </cluster>\n");
}

fn write_feature(out: &mut String, feature: &Feature) {
    let _ = writeln!(
        out,
        "      <feature code=\"{}\" name=\"{}\" summary=\"{}\">",
        escape(&feature.code),
        escape(&feature.name),
        escape(&feature.summary)
    );
    write_conformance(out, 8, &feature.conformance);
    out.push_str("      </feature>\n");
}

fn write_attribute(out: &mut String, attribute: &Attribute) {
    let default = attribute.default.as_ref().map(|v| format!(" default=\"{}\"", escape(&variable_text(v))));
    let _ = writeln!(
        out,
        "      <attribute id=\"0x{:04X}\" name=\"{}\" type=\"{}\"{}>",
        attribute.id,
        escape(&attribute.name),
        escape(&attribute.r#type),
        default.unwrap_or_default()
    );
    write_access(out, 8, &attribute.access);
    write_quality(out, 8, &attribute.quality);
    write_constraint(out, 8, &attribute.constraint);
    write_conformance(out, 8, &attribute.conformance);
    out.push_str("      </attribute>\n");
}

fn write_command(out: &mut String, command: &Command) {
    let _ = writeln!(
        out,
        "      <command id=\"0x{:02X}\" name=\"{}\" response=\"{}\">",
        command.id,
        escape(&command.name),
        escape(&command.response)
    );
    write_access(out, 8, &command.access);
    write_conformance(out, 8, &command.conformance);
    for field in &command.command_fields {
        write_data_field(out, field, 8);
    }
    out.push_str("      </command>\n");
}

fn write_event(out: &mut String, event: &Event) {
    let priority = event.priority.as_deref().unwrap_or("info");
    let _ = writeln!(
        out,
        "      <event id=\"0x{:02X}\" name=\"{}\" priority=\"{}\">",
        event.id,
        escape(&event.name),
        escape(priority)
    );
    write_access(out, 8, &event.access);
    write_quality(out, 8, &event.quality);
    write_conformance(out, 8, &event.conformance);
    for field in &event.data {
        write_data_field(out, field, 8);
    }
    out.push_str("      </event>\n");
}

fn write_item(out: &mut String, item: &Item) {
    let _ = writeln!(
        out,
        "        <item value=\"{}\" name=\"{}\" summary=\"{}\">",
        item.value,
        escape(&item.name),
        escape(&item.summary)
    );
    write_conformance(out, 10, &item.conformance);
    out.push_str("        </item>\n");
}

fn write_bitfield(out: &mut String, bit: &Bitfield) {
    let _ = writeln!(
        out,
        "        <bitfield bit=\"{}\" name=\"{}\" summary=\"{}\">",
        bit.bit,
        escape(&bit.name),
        escape(&bit.summary)
    );
    write_conformance(out, 10, &bit.conformance);
    out.push_str("        </bitfield>\n");
}

fn write_data_field(out: &mut String, field: &DataField, indent: usize) {
    let pad = " ".repeat(indent);
    let _ = writeln!(
        out,
        "{pad}<field id=\"{}\" name=\"{}\" type=\"{}\"/>",
        field.id,
        escape(&field.name),
        escape(&field.r#type)
    );
}

fn write_access(out: &mut String, indent: usize, access: &Option<Access>) {
    let Some(access) = access else { return };
    let pad = " ".repeat(indent);
    let _ = writeln!(
        out,
        "{pad}<access read=\"{}\" write=\"{}\"/>",
        access.read.unwrap_or(false),
        access.write.unwrap_or(false)
    );
}

fn write_quality(out: &mut String, indent: usize, quality: &Option<OtherQuality>) {
    let Some(quality) = quality else { return };
    let pad = " ".repeat(indent);
    let _ = writeln!(out, "{pad}<quality nullable=\"{}\"/>", quality.nullable.unwrap_or(false));
}

fn write_constraint(out: &mut String, indent: usize, constraint: &Option<Constraint>) {
    let Some(constraint) = constraint else { return };
    let pad = " ".repeat(indent);
    let kind = match constraint.kind {
        ConstraintKind::None => return,
        ConstraintKind::Allowed => "allowed",
        ConstraintKind::Between => "between",
        ConstraintKind::Min => "min",
        ConstraintKind::Max => "max",
        ConstraintKind::LengthBetween => "lengthBetween",
        ConstraintKind::MinLength => "minLength",
        ConstraintKind::MaxLength => "maxLength",
        ConstraintKind::CountBetween => "countBetween",
        ConstraintKind::MinCount => "minCount",
        ConstraintKind::MaxCount => "maxCount",
        ConstraintKind::Desc => "desc",
    };
    let _ = writeln!(out, "{pad}<constraint type=\"{kind}\"/>");
}

fn write_conformance(out: &mut String, indent: usize, conformance: &Option<Conformance>) {
    let Some(conformance) = conformance else { return };
    let pad = " ".repeat(indent);
    if conformance.mandatory {
        let _ = writeln!(out, "{pad}<mandatoryConform/>");
    } else if conformance.optional {
        let _ = writeln!(out, "{pad}<optionalConform/>");
    } else if conformance.provisional {
        let _ = writeln!(out, "{pad}<provisionalConform/>");
    } else if conformance.deprecated {
        let _ = writeln!(out, "{pad}<deprecateConform/>");
    } else if conformance.disallowed {
        let _ = writeln!(out, "{pad}<disallowConform/>");
    }
}

fn variable_text(value: &crate::matter::Variable) -> String {
    match value {
        crate::matter::Variable::U64(v) => v.to_string(),
        crate::matter::Variable::I64(v) => v.to_string(),
        crate::matter::Variable::F64(v) => v.to_string(),
        crate::matter::Variable::String(v) => v.clone(),
        crate::matter::Variable::Bool(v) => v.to_string(),
        crate::matter::Variable::List(_) | crate::matter::Variable::Null => String::new(),
    }
}

fn escape(input: &str) -> String {
    input.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
