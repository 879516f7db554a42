// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! The reference tree: a rooted tree whose nodes carry `(name, attributes,
//! children)` and whose serialization is the SDF side-car mapping document.
//!
//! Expressed as an arena of nodes addressed by index rather than
//! parent/weak pointers.

use std::collections::BTreeMap;

pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ReferenceTree {
    nodes: Vec<Node>,
}

impl Default for ReferenceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceTree {
    #[must_use]
    pub fn new() -> Self {
        ReferenceTree {
            nodes: vec![Node {
                name: "#".to_string(),
                parent: None,
                children: Vec::new(),
                attributes: BTreeMap::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: name.into(),
            parent: Some(parent),
            children: Vec::new(),
            attributes: BTreeMap::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, key: impl Into<String>, value: serde_json::Value) {
        self.nodes[node].attributes.insert(key.into(), value);
    }

    /// For each segment of a name, replace `~` -> `~0`, `/` -> `~1`, space -> `%20`, in that order.
    #[must_use]
    pub fn escape_segment(input: &str) -> String {
        input.replace('~', "~0").replace('/', "~1").replace(' ', "%20")
    }

    /// Exact inverse of [`escape_segment`](Self::escape_segment).
    #[must_use]
    pub fn unescape_segment(input: &str) -> String {
        input.replace("~1", "/").replace("~0", "~").replace("%20", " ")
    }

    /// Generate the JSON Pointer of `node` by concatenating escaped ancestor
    /// names with `/`, root-first. The root itself is `#`.
    #[must_use]
    pub fn generate_pointer(&self, node: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            segments.push(Self::escape_segment(&self.nodes[id].name));
            current = self.nodes[id].parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Produce `map<json-pointer, attributes>` for every node that carries at
    /// least one attribute. Traversal order is irrelevant - the result is
    /// keyed by pointer.
    #[must_use]
    pub fn generate_mapping(&self) -> BTreeMap<String, BTreeMap<String, serde_json::Value>> {
        let mut map = BTreeMap::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if !node.attributes.is_empty() {
                map.insert(self.generate_pointer(id), node.attributes.clone());
            }
        }
        map
    }
}

/// Look-up helper over an imported side-car mapping (`SdfMapping.map`).
#[derive(Debug, Clone, Default)]
pub struct MappingLookup<'a> {
    pub map: &'a BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl<'a> MappingLookup<'a> {
    #[must_use]
    pub fn new(map: &'a BTreeMap<String, BTreeMap<String, serde_json::Value>>) -> Self {
        MappingLookup { map }
    }

    /// Returns `map[pointer][field]` if present.
    #[must_use]
    pub fn import(&self, pointer: &str, field: &str) -> Option<&serde_json::Value> {
        self.map.get(pointer).and_then(|fields| fields.get(field))
    }

    /// True iff `pointer` or its last segment is a member of `required`.
    #[must_use]
    pub fn check_for_required(pointer: &str, required: &[String]) -> bool {
        if required.iter().any(|r| r == pointer) {
            return true;
        }
        let last = pointer.rsplit('/').next().unwrap_or(pointer);
        required.iter().any(|r| r == last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_round_trips_through_escape() {
        let mut tree = ReferenceTree::new();
        let child = tree.add_child(tree.root(), "a/b ~c");
        let pointer = tree.generate_pointer(child);
        assert_eq!(pointer, "#/a~1b%20~0c");
        let segments: Vec<_> = pointer.split('/').skip(1).map(ReferenceTree::unescape_segment).collect();
        assert_eq!(segments, vec!["a/b ~c".to_string()]);
    }

    #[test]
    fn mapping_contains_only_attributed_nodes() {
        let mut tree = ReferenceTree::new();
        let a = tree.add_child(tree.root(), "a");
        let _b = tree.add_child(a, "b");
        tree.set_attribute(a, "id", serde_json::json!(1));
        let mapping = tree.generate_mapping();
        assert_eq!(mapping.len(), 1);
        assert!(mapping.contains_key("#/a"));
    }

    #[test]
    fn required_matches_pointer_or_last_segment() {
        let required = vec!["OnOff".to_string()];
        assert!(MappingLookup::check_for_required("#/sdfObject/OnOff", &required));
        assert!(!MappingLookup::check_for_required("#/sdfObject/Level", &required));
    }
}
