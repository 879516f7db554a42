// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! The Matter (CSA device model) side of the domain model: clusters,
//! attributes, commands, events, bitmaps, enums, structs, device types.
//! Purely data - mapping logic lives in the pipeline and typemap modules.

mod value;

pub use value::Variable;

use crate::conformance::ConformanceExpr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conformance {
    pub mandatory: bool,
    pub optional: bool,
    pub provisional: bool,
    pub deprecated: bool,
    pub disallowed: bool,
    /// Present only when this conformance is an `otherwise` chain of alternatives.
    pub otherwise: Vec<Conformance>,
    pub condition: ConformanceExpr,
    pub choice: Option<String>,
    pub choice_more: Option<bool>,
}

impl Conformance {
    #[must_use]
    pub fn mandatory() -> Self {
        Conformance {
            mandatory: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn optional() -> Self {
        Conformance {
            optional: true,
            ..Default::default()
        }
    }

    /// True unless this conformance is `provisional`, `deprecated` or
    /// `disallowed` with an evaluable-true condition. For `otherwise`, every
    /// alternative must also be allowed.
    #[must_use]
    pub fn allowed_for_mapping(&self, ctx: &crate::conformance::EvalContext) -> bool {
        if !self.otherwise.is_empty() {
            return self.otherwise.iter().all(|alt| alt.allowed_for_mapping(ctx));
        }
        let forbidden = (self.provisional || self.deprecated || self.disallowed) && self.condition.evaluate(ctx);
        !forbidden
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConstraintKind {
    #[default]
    None,
    Allowed,
    Between,
    Min,
    Max,
    LengthBetween,
    MinLength,
    MaxLength,
    CountBetween,
    MinCount,
    MaxCount,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub value: Option<Variable>,
    pub min: Option<Variable>,
    pub max: Option<Variable>,
    /// For array/list constraints: the Matter type name of each entry.
    pub entry_type: Option<String>,
    pub entry_constraint: Option<Box<Constraint>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherQuality {
    pub nullable: Option<bool>,
    pub non_volatile: Option<bool>,
    pub fixed: Option<bool>,
    pub scene: Option<bool>,
    pub reportable: Option<bool>,
    pub change_omitted: Option<bool>,
    pub singleton: Option<bool>,
    pub diagnostics: Option<bool>,
    pub large_message: Option<bool>,
    pub quieter_reporting: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub read: Option<bool>,
    pub write: Option<bool>,
    pub fabric_scoped: Option<bool>,
    pub fabric_sensitive: Option<bool>,
    pub read_privilege: Option<String>,
    pub write_privilege: Option<String>,
    pub invoke_privilege: Option<String>,
    pub timed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    pub code: String,
    pub name: String,
    pub summary: String,
    pub conformance: Option<Conformance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bitfield {
    pub bit: u32,
    pub name: String,
    pub summary: String,
    pub conformance: Option<Conformance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    pub value: i64,
    pub name: String,
    pub summary: String,
    pub conformance: Option<Conformance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataField {
    pub id: u32,
    pub name: String,
    pub conformance: Option<Conformance>,
    pub access: Option<Access>,
    pub summary: String,
    pub r#type: String,
    pub constraint: Option<Constraint>,
    pub quality: Option<OtherQuality>,
    pub default: Option<Variable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandDirection {
    #[default]
    CommandToServer,
    ResponseFromServer,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    pub id: u32,
    pub name: String,
    pub conformance: Option<Conformance>,
    pub access: Option<Access>,
    pub summary: String,
    pub direction: CommandDirection,
    /// `"N"`, `"Y"`, or the name of a server command in the same cluster.
    pub response: String,
    pub command_fields: Vec<DataField>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub id: u32,
    pub name: String,
    pub conformance: Option<Conformance>,
    pub access: Option<Access>,
    pub summary: String,
    pub r#type: String,
    pub constraint: Option<Constraint>,
    pub quality: Option<OtherQuality>,
    pub default: Option<Variable>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub id: u32,
    pub name: String,
    pub conformance: Option<Conformance>,
    pub access: Option<Access>,
    pub summary: String,
    pub priority: Option<String>,
    pub quality: Option<OtherQuality>,
    pub data: Vec<DataField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterClassification {
    pub hierarchy: String, // "base" | "derived"
    pub role: String,
    pub pics_code: String,
    pub scope: String,
    pub base_cluster: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceClassification {
    pub superset: String,
    pub class: String,
    pub scope: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterSide {
    #[default]
    Unspecified,
    Client,
    Server,
}

impl ClusterSide {
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ClusterSide::Client => "_Client",
            ClusterSide::Server => "_Server",
            ClusterSide::Unspecified => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatterCluster {
    pub id: u32,
    pub name: String,
    pub conformance: Option<Conformance>,
    pub summary: String,
    pub revision: u8,
    pub revision_history: std::collections::BTreeMap<u8, String>,
    pub cluster_aliases: Vec<(u32, String)>,
    pub classification: Option<ClusterClassification>,
    pub feature_map: Vec<Feature>,
    pub attributes: Vec<Attribute>,
    pub client_commands: Vec<Command>,
    pub server_commands: std::collections::BTreeMap<String, Command>,
    pub events: Vec<Event>,
    pub bitmaps: std::collections::BTreeMap<String, Vec<Bitfield>>,
    pub enums: std::collections::BTreeMap<String, Vec<Item>>,
    pub structs: std::collections::BTreeMap<String, Vec<DataField>>,
    pub side: ClusterSide,
}

impl MatterCluster {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        MatterCluster {
            name: name.into(),
            revision: 1,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatterDevice {
    pub id: u32,
    pub name: String,
    pub summary: String,
    pub revision: u8,
    pub revision_history: std::collections::BTreeMap<u8, String>,
    pub conditions: Vec<String>,
    pub classification: Option<DeviceClassification>,
    pub conformance: Option<Conformance>,
    pub clusters: Vec<MatterCluster>,
}
