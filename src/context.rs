// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! `TranslationContext`: the single value that threads all per-run mutable
//! state through the mapper functions instead of module-level globals -
//! the reference tree, its cursors, the currently supported feature set,
//! the required-pointer list, the data-location prefix, and the
//! custom enum/struct/bitmap name counters.

use crate::conformance::EvalContext;
use crate::error::ConvertWarning;
use crate::reftree::{NodeId, ReferenceTree};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct TranslationContext {
    pub tree: ReferenceTree,
    /// Cursor onto the current "kind" layer node (sdfThing, sdfObject, ...).
    pub quality_cursor: Option<NodeId>,
    /// Cursor onto the current specific-element node.
    pub given_cursor: Option<NodeId>,
    /// Feature short-codes evaluated as mandatory-and-true for the cluster
    /// currently being processed. Reset at the start of each cluster.
    pub supported_features: HashSet<String>,
    /// JSON Pointers (or bare names) required within the object/thing
    /// currently being processed. Reset at that scope.
    pub sdf_required_list: Vec<String>,
    /// SDF pointer prefix used when a Matter type name isn't in the catalog
    /// and must become a `sdfRef` to a cluster-local struct/enum/bitmap.
    pub sdf_data_location: String,
    /// Count of materialized `CustomEnum<i>` names, reset per cluster.
    pub next_custom_enum: usize,
    /// Count of materialized `CustomStruct<i>` names, reset per cluster.
    pub next_custom_struct: usize,
    /// Count of materialized `CustomBitmap<i>` names, reset per cluster.
    pub next_custom_bitmap: usize,
    pub warnings: Vec<ConvertWarning>,
}

impl TranslationContext {
    #[must_use]
    pub fn new() -> Self {
        let tree = ReferenceTree::new();
        TranslationContext {
            quality_cursor: Some(tree.root()),
            given_cursor: Some(tree.root()),
            tree,
            ..Default::default()
        }
    }

    /// Reset the per-cluster scoped state.
    pub fn reset_cluster_scope(&mut self, data_location: impl Into<String>) {
        self.supported_features.clear();
        self.sdf_data_location = data_location.into();
        self.next_custom_enum = 0;
        self.next_custom_struct = 0;
        self.next_custom_bitmap = 0;
    }

    /// Reset the per-object/thing scoped `sdf_required_list`.
    pub fn reset_required_scope(&mut self, required: Vec<String>) {
        self.sdf_required_list = required;
    }

    #[must_use]
    pub fn eval_context(&self) -> EvalContext {
        EvalContext {
            supported_features: self.supported_features.clone(),
        }
    }

    pub fn warn(&mut self, warning: ConvertWarning) {
        self.warnings.push(warning);
    }

    pub fn next_enum_name(&mut self) -> String {
        let name = format!("CustomEnum{}", self.next_custom_enum);
        self.next_custom_enum += 1;
        name
    }

    pub fn next_struct_name(&mut self) -> String {
        let name = format!("CustomStruct{}", self.next_custom_struct);
        self.next_custom_struct += 1;
        name
    }

    pub fn next_bitmap_name(&mut self) -> String {
        let name = format!("CustomBitmap{}", self.next_custom_bitmap);
        self.next_custom_bitmap += 1;
        name
    }
}
