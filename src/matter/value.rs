// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! `Variable`: the tagged value carried by Matter defaults, constraint bounds
//! and enum/bitmap constants.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variable {
    U64(u64),
    I64(i64),
    F64(f64),
    String(String),
    Bool(bool),
    List(Vec<Variable>),
    Null,
}

impl Variable {
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Variable::U64(v) => Some(i128::from(*v)),
            Variable::I64(v) => Some(i128::from(*v)),
            Variable::F64(v) => Some(*v as i128),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variable::U64(v) => Some(*v as f64),
            Variable::I64(v) => Some(*v as f64),
            Variable::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<u64> for Variable {
    fn from(v: u64) -> Self {
        Variable::U64(v)
    }
}

impl From<i64> for Variable {
    fn from(v: i64) -> Self {
        Variable::I64(v)
    }
}

impl From<f64> for Variable {
    fn from(v: f64) -> Self {
        Variable::F64(v)
    }
}

impl From<bool> for Variable {
    fn from(v: bool) -> Self {
        Variable::Bool(v)
    }
}

impl From<String> for Variable {
    fn from(v: String) -> Self {
        Variable::String(v)
    }
}
