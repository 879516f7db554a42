// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Error taxonomy for the SDF <-> Matter mapper.
//!
//! Fatal kinds (`InputShape`, `TypeFit`, `MergeConflict`) short-circuit a run.
//! Recoverable kinds (`ReferenceResolution`, `ConformanceExpression`) are
//! collected as warnings and the run proceeds with a default substituted.

use std::fmt;

#[derive(Debug, Clone)]
pub enum ConvertError {
    /// A required field is missing from the source document.
    InputShape { path: String, message: String },
    /// The side-car mapping references a pointer absent from the target model.
    ReferenceResolution { pointer: String, field: String },
    /// Numeric bounds do not fit any Matter type.
    TypeFit {
        minimum: Option<i128>,
        maximum: Option<i128>,
    },
    /// An unknown term appeared in a conformance expression tree.
    ConformanceExpression { term: String },
    /// A derived/device-overriding field is structurally incompatible.
    MergeConflict { cluster: String, message: String },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InputShape { path, message } => {
                write!(f, "input shape error at {path}: {message}")
            }
            ConvertError::ReferenceResolution { pointer, field } => {
                write!(f, "mapping pointer {pointer} has no field '{field}' in the target model")
            }
            ConvertError::TypeFit { minimum, maximum } => {
                write!(f, "no Matter type fits bounds [{minimum:?}, {maximum:?}]")
            }
            ConvertError::ConformanceExpression { term } => {
                write!(f, "unknown conformance term: {term}")
            }
            ConvertError::MergeConflict { cluster, message } => {
                write!(f, "merge conflict in cluster '{cluster}': {message}")
            }
        }
    }
}

impl std::error::Error for ConvertError {}

impl ConvertError {
    /// True for the two kinds that are collected as warnings rather than aborting the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConvertError::ReferenceResolution { .. } | ConvertError::ConformanceExpression { .. }
        )
    }
}

/// A non-fatal diagnostic surfaced alongside a successful conversion result.
pub type ConvertWarning = ConvertError;

pub type Result<T> = std::result::Result<T, ConvertError>;
