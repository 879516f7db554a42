// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! Type and constraint mapping: Matter base/derived types <-> SDF
//! data-qualities, and Matter constraints <-> SDF numeric/length/count bounds.
//!
//! This is the largest single piece of the mapper because the two type
//! systems are not in 1:1 correspondence: Matter has a closed catalog of
//! numeric widths and derived units, SDF has open-ended JSON-schema bounds.

use crate::matter::{Constraint, ConstraintKind, Variable};
use crate::sdf::{f64_to_number, i128_to_number, number_to_i128, DataQuality, JsoItem, SdfType};

// ---------------------------------------------------------------------
// 4.3.1 Matter -> SDF data types
// ---------------------------------------------------------------------

fn int_dq(min: i128, max: i128) -> DataQuality {
    DataQuality {
        r#type: Some("integer".into()),
        minimum: Some(i128_to_number(min)),
        maximum: Some(i128_to_number(max)),
        ..Default::default()
    }
}

fn int_dq_unit(min: i128, max: i128, unit: &str) -> DataQuality {
    let mut dq = int_dq(min, max);
    dq.unit = Some(unit.to_string());
    dq
}

fn byte_string_dq() -> DataQuality {
    DataQuality {
        r#type: Some("string".into()),
        sdf_type: Some(SdfType::ByteString),
        ..Default::default()
    }
}

fn named_field(name: &str, min: i128, max: i128, nullable: bool) -> (String, DataQuality) {
    let mut dq = int_dq(min, max);
    dq.nullable = Some(nullable);
    (name.to_string(), dq)
}

/// Map a Matter base/derived type name to its canonical SDF `DataQuality`
/// skeleton, drawn from the closed Matter base/derived-type catalog.
///
/// `cluster_local_data_location` is the SDF pointer prefix (e.g.
/// `#/sdfObject/MyCluster/sdfData`) used when `matter_type` is not in the
/// catalog and must be treated as a cluster-local struct/enum/bitmap name.
#[must_use]
pub fn matter_type_to_data_quality(matter_type: &str, cluster_local_data_location: &str) -> DataQuality {
    match matter_type {
        "bool" => DataQuality {
            r#type: Some("boolean".into()),
            ..Default::default()
        },
        "map8" | "map16" | "map32" | "map64" => {
            let bits: u64 = match matter_type {
                "map8" => 8,
                "map16" => 16,
                "map32" => 32,
                _ => 64,
            };
            DataQuality {
                r#type: Some("array".into()),
                unique_items: Some(true),
                max_items: Some(bits),
                ..Default::default()
            }
        }
        "uint8" => int_dq(0, u8::MAX as i128),
        "uint16" => int_dq(0, u16::MAX as i128),
        "uint24" => int_dq(0, (1i128 << 24) - 1),
        "uint32" => int_dq(0, u32::MAX as i128),
        "uint40" => int_dq(0, (1i128 << 40) - 1),
        "uint48" => int_dq(0, (1i128 << 48) - 1),
        "uint56" => int_dq(0, (1i128 << 56) - 1),
        "uint64" => int_dq(0, u64::MAX as i128),
        "int8" => int_dq(i8::MIN as i128, i8::MAX as i128),
        "int16" => int_dq(i16::MIN as i128, i16::MAX as i128),
        "int24" => int_dq(-(1i128 << 23), (1i128 << 23) - 1),
        "int32" => int_dq(i32::MIN as i128, i32::MAX as i128),
        "int40" => int_dq(-(1i128 << 39), (1i128 << 39) - 1),
        "int48" => int_dq(-(1i128 << 47), (1i128 << 47) - 1),
        "int56" => int_dq(-(1i128 << 55), (1i128 << 55) - 1),
        "int64" => int_dq(i64::MIN as i128, i64::MAX as i128),
        "single" => DataQuality {
            r#type: Some("number".into()),
            minimum: Some(f64_to_number(f32::MIN as f64)),
            maximum: Some(f64_to_number(f32::MAX as f64)),
            ..Default::default()
        },
        "double" => DataQuality {
            r#type: Some("number".into()),
            minimum: Some(f64_to_number(f64::MIN)),
            maximum: Some(f64_to_number(f64::MAX)),
            ..Default::default()
        },
        "octstr" | "ipadr" | "ipv6pre" => byte_string_dq(),
        "ipv4adr" => {
            let mut dq = byte_string_dq();
            dq.min_length = Some(8);
            dq.max_length = Some(8);
            dq
        }
        "ipv6adr" => {
            let mut dq = byte_string_dq();
            dq.min_length = Some(32);
            dq.max_length = Some(32);
            dq
        }
        "hwadr" => DataQuality {
            r#type: Some("string".into()),
            min_length: Some(12),
            max_length: Some(16),
            ..Default::default()
        },
        "list" => DataQuality {
            r#type: Some("array".into()),
            ..Default::default()
        },
        "struct" => DataQuality {
            r#type: Some("object".into()),
            ..Default::default()
        },
        "percent" => int_dq_unit(0, 100, "/100"),
        "percent100ths" => int_dq_unit(0, 10_000, "/10000"),
        "temperature" => int_dq(-27315, 32767),
        "power-mW" => int_dq_unit(i64::MIN as i128, i64::MAX as i128, "mW"),
        "amperage-mA" => int_dq_unit(i64::MIN as i128, i64::MAX as i128, "mA"),
        "voltage-mW" => int_dq_unit(i64::MIN as i128, i64::MAX as i128, "mV"),
        "energy-mWh" => int_dq_unit(i64::MIN as i128, i64::MAX as i128, "mWh"),
        "epoch-us" => int_dq_unit(0, u64::MAX as i128, "us"),
        "epoch-s" => int_dq_unit(0, u32::MAX as i128, "s"),
        "posix-ms" => {
            let mut dq = int_dq_unit(0, i64::MAX as i128, "ms");
            dq.sdf_type = Some(SdfType::UnixTime);
            dq
        }
        "systime-us" => int_dq_unit(0, u64::MAX as i128, "us"),
        "systime-ms" => int_dq_unit(0, u64::MAX as i128, "ms"),
        "elapsed-s" => int_dq_unit(0, u32::MAX as i128, "s"),
        "utc" => int_dq_unit(0, u32::MAX as i128, "s"),
        "enum8" | "status" | "action-id" | "fabric-idx" => int_dq(0, u8::MAX as i128),
        "enum16" => int_dq(0, u16::MAX as i128),
        "group-id" | "endpoint-no" | "vendor-id" | "entry-idx" | "tag" | "namespace" => int_dq(0, u16::MAX as i128),
        "devtype-id" | "cluster-id" | "attrib-id" | "field-id" | "event-id" | "command-id" | "trans-id" | "data-ver" => {
            int_dq(0, u32::MAX as i128)
        }
        "fabric-id" | "node-id" | "event-no" | "EUI64" => int_dq(0, u64::MAX as i128),
        "priority" => {
            let mut dq = DataQuality {
                r#type: Some("integer".into()),
                ..Default::default()
            };
            let debug = DataQuality {
                r#const: Some(serde_json::json!(0)),
                description: "Information for engineering debugging/troubleshooting".into(),
                ..Default::default()
            };
            let info = DataQuality {
                r#const: Some(serde_json::json!(1)),
                description: "Information that either drives customer facing features or provides insights into device functions that are used to drive analytics use cases".into(),
                ..Default::default()
            };
            let critical = DataQuality {
                r#const: Some(serde_json::json!(2)),
                description: "Information or notification that impacts safety, a critical function, or ongoing reliable operation of the node or application supported on an endpoint".into(),
                ..Default::default()
            };
            dq.sdf_choice.insert("DEBUG".into(), debug);
            dq.sdf_choice.insert("INFO".into(), info);
            dq.sdf_choice.insert("CRITICAL".into(), critical);
            dq
        }
        "tod" => {
            let mut dq = DataQuality {
                r#type: Some("object".into()),
                ..Default::default()
            };
            for (name, min, max) in [("Hours", 0, 23), ("Minutes", 0, 59), ("Seconds", 0, 59), ("Hundredths", 0, 99)] {
                let (k, v) = named_field(name, min, max, true);
                dq.properties.insert(k, v);
            }
            dq
        }
        "date" => {
            let mut dq = DataQuality {
                r#type: Some("object".into()),
                ..Default::default()
            };
            for (name, min, max) in [("Year", 0, 255), ("Month", 1, 12), ("Day", 1, 31), ("DayOfWeek", 1, 7)] {
                let (k, v) = named_field(name, min, max, true);
                dq.properties.insert(k, v);
            }
            dq.required = vec!["Year".into(), "Month".into(), "Day".into(), "DayOfWeek".into()];
            dq
        }
        "semtag" => {
            let mut dq = DataQuality {
                r#type: Some("object".into()),
                ..Default::default()
            };
            dq.properties.insert(
                "MfgCode".into(),
                DataQuality {
                    nullable: Some(true),
                    ..Default::default()
                },
            );
            dq.properties.insert("NamespaceID".into(), DataQuality::default());
            dq.properties.insert("Tag".into(), DataQuality::default());
            dq.properties.insert(
                "Label".into(),
                DataQuality {
                    nullable: Some(true),
                    ..Default::default()
                },
            );
            dq.required = vec!["MfgCode".into(), "NamespaceID".into(), "Tag".into(), "Label".into()];
            dq
        }
        other => DataQuality {
            r#type: Some("object".into()),
            sdf_ref: Some(format!("{cluster_local_data_location}/{other}")),
            ..Default::default()
        },
    }
}

// ---------------------------------------------------------------------
// 4.3.2 SDF -> Matter: the integer type fitter
// ---------------------------------------------------------------------

const UINT_WIDTHS: [(&str, i128); 8] = [
    ("uint8", u8::MAX as i128),
    ("uint16", u16::MAX as i128),
    ("uint24", (1i128 << 24) - 1),
    ("uint32", u32::MAX as i128),
    ("uint40", (1i128 << 40) - 1),
    ("uint48", (1i128 << 48) - 1),
    ("uint56", (1i128 << 56) - 1),
    ("uint64", u64::MAX as i128),
];

const INT_WIDTHS: [(&str, i128, i128); 8] = [
    ("int8", i8::MIN as i128, i8::MAX as i128),
    ("int16", i16::MIN as i128, i16::MAX as i128),
    ("int24", -(1i128 << 23), (1i128 << 23) - 1),
    ("int32", i32::MIN as i128, i32::MAX as i128),
    ("int40", -(1i128 << 39), (1i128 << 39) - 1),
    ("int48", -(1i128 << 47), (1i128 << 47) - 1),
    ("int56", -(1i128 << 55), (1i128 << 55) - 1),
    ("int64", i64::MIN as i128, i64::MAX as i128),
];

fn smallest_uint_covering(max: i128) -> (&'static str, i128) {
    for (name, native_max) in UINT_WIDTHS {
        if max <= native_max {
            return (name, native_max);
        }
    }
    UINT_WIDTHS[UINT_WIDTHS.len() - 1]
}

fn smallest_int_covering(min: i128, max: i128) -> (&'static str, i128, i128) {
    for (name, native_min, native_max) in INT_WIDTHS {
        if min >= native_min && max <= native_max {
            return (name, native_min, native_max);
        }
    }
    INT_WIDTHS[INT_WIDTHS.len() - 1]
}

/// Choose the narrowest-fitting Matter integer type from optional
/// `(minimum, maximum, const)` bounds, and the constraint (if any) that
/// carries the remaining bound information.
#[must_use]
pub fn fit_integer_type(
    minimum: Option<i128>,
    maximum: Option<i128>,
    const_value: Option<i128>,
) -> (String, Option<Constraint>) {
    match (minimum, maximum) {
        (Some(min), Some(max)) => {
            let (type_name, native_min, native_max) = if min >= 0 {
                let (name, native_max) = smallest_uint_covering(max);
                (name, 0i128, native_max)
            } else {
                smallest_int_covering(min, max)
            };

            let constraint = if let Some(const_value) = const_value {
                Some(Constraint {
                    kind: ConstraintKind::Allowed,
                    value: Some(num_variable(const_value)),
                    ..Default::default()
                })
            } else {
                let min_matches = min == native_min;
                let max_matches = max == native_max;
                if min_matches && max_matches {
                    None
                } else if !min_matches && !max_matches {
                    Some(Constraint {
                        kind: ConstraintKind::Between,
                        min: Some(num_variable(min)),
                        max: Some(num_variable(max)),
                        ..Default::default()
                    })
                } else if max_matches {
                    Some(Constraint {
                        kind: ConstraintKind::Min,
                        min: Some(num_variable(min)),
                        ..Default::default()
                    })
                } else {
                    Some(Constraint {
                        kind: ConstraintKind::Max,
                        max: Some(num_variable(max)),
                        ..Default::default()
                    })
                }
            };

            (type_name.to_string(), constraint)
        }
        (None, Some(max)) => {
            let type_name = if max >= 0 {
                smallest_uint_covering(max).0
            } else {
                smallest_int_covering(max, max).0
            };
            (type_name.to_string(), None)
        }
        (Some(min), None) => (
            "int64".to_string(),
            Some(Constraint {
                kind: ConstraintKind::Min,
                min: Some(num_variable(min)),
                ..Default::default()
            }),
        ),
        (None, None) => ("int64".to_string(), None),
    }
}

fn num_variable(v: i128) -> Variable {
    if let Ok(v) = u64::try_from(v) {
        Variable::U64(v)
    } else if let Ok(v) = i64::try_from(v) {
        Variable::I64(v)
    } else {
        Variable::F64(v as f64)
    }
}

/// Read a `DataQuality`'s `minimum`/`maximum` as `i128`, if present.
#[must_use]
pub fn dq_bounds(dq: &DataQuality) -> (Option<i128>, Option<i128>) {
    (
        dq.minimum.as_ref().and_then(number_to_i128),
        dq.maximum.as_ref().and_then(number_to_i128),
    )
}

/// Canonical `(min, max)` range used to detect a derived unit override,
/// keyed by SDF `unit` string.
#[must_use]
pub fn derived_unit_override(unit: &str, min: i128, max: i128) -> Option<&'static str> {
    match unit {
        "/100" if (min, max) == (0, 100) => Some("percent"),
        "/10000" if (min, max) == (0, 10_000) => Some("percent100ths"),
        "mW" if (min, max) == (i64::MIN as i128, i64::MAX as i128) => Some("power-mW"),
        "mA" if (min, max) == (i64::MIN as i128, i64::MAX as i128) => Some("amperage-mA"),
        "mV" if (min, max) == (i64::MIN as i128, i64::MAX as i128) => Some("voltage-mW"),
        "mWh" if (min, max) == (i64::MIN as i128, i64::MAX as i128) => Some("energy-mWh"),
        "ms" if (min, max) == (0, u64::MAX as i128) => Some("systime-ms"),
        _ => None,
    }
}

// ---------------------------------------------------------------------
// Matter constraint <-> SDF data-quality bounds
// ---------------------------------------------------------------------

/// Apply a Matter `Constraint`'s bounds onto an SDF `DataQuality` in place.
pub fn apply_constraint_to_data_quality(constraint: &Constraint, dq: &mut DataQuality) {
    match constraint.kind {
        ConstraintKind::Allowed => {
            if let Some(v) = &constraint.value {
                dq.r#const = Some(variable_to_json(v));
            }
        }
        ConstraintKind::Between => {
            if let Some(v) = &constraint.min {
                dq.minimum = variable_to_number(v);
            }
            if let Some(v) = &constraint.max {
                dq.maximum = variable_to_number(v);
            }
        }
        ConstraintKind::Min => {
            if let Some(v) = &constraint.min {
                dq.minimum = variable_to_number(v);
            }
        }
        ConstraintKind::Max => {
            if let Some(v) = &constraint.max {
                dq.maximum = variable_to_number(v);
            }
        }
        ConstraintKind::LengthBetween => {
            if let Some(v) = &constraint.min {
                dq.min_length = variable_to_u64(v);
            }
            if let Some(v) = &constraint.max {
                dq.max_length = variable_to_u64(v);
            }
        }
        ConstraintKind::MinLength => {
            if let Some(v) = &constraint.min {
                dq.min_length = variable_to_u64(v);
            }
        }
        ConstraintKind::MaxLength => {
            if let Some(v) = &constraint.max {
                dq.max_length = variable_to_u64(v);
            }
        }
        ConstraintKind::CountBetween => {
            if let Some(v) = &constraint.min {
                dq.min_items = variable_to_u64(v);
            }
            if let Some(v) = &constraint.max {
                dq.max_items = variable_to_u64(v);
            }
        }
        ConstraintKind::MinCount => {
            if let Some(v) = &constraint.min {
                dq.min_items = variable_to_u64(v);
            }
        }
        ConstraintKind::MaxCount => {
            if let Some(v) = &constraint.max {
                dq.max_items = variable_to_u64(v);
            }
        }
        ConstraintKind::Desc | ConstraintKind::None => {}
    }
    if let Some(entry) = &constraint.entry_constraint {
        let mut entry_dq = DataQuality::default();
        apply_constraint_to_data_quality(entry, &mut entry_dq);
        dq.items = Some(JsoItem(Box::new(entry_dq)));
    }
}

/// Translate a numeric-bounded `DataQuality` back into a Matter `Constraint`
/// for round-tripping (used outside the integer fitter for lengths/counts).
#[must_use]
pub fn length_constraint(dq: &DataQuality) -> Option<Constraint> {
    match (dq.min_length, dq.max_length) {
        (Some(min), Some(max)) => Some(Constraint {
            kind: ConstraintKind::LengthBetween,
            min: Some(Variable::U64(min)),
            max: Some(Variable::U64(max)),
            ..Default::default()
        }),
        (Some(min), None) => Some(Constraint {
            kind: ConstraintKind::MinLength,
            min: Some(Variable::U64(min)),
            ..Default::default()
        }),
        (None, Some(max)) => Some(Constraint {
            kind: ConstraintKind::MaxLength,
            max: Some(Variable::U64(max)),
            ..Default::default()
        }),
        (None, None) => None,
    }
}

#[must_use]
pub fn count_constraint(dq: &DataQuality) -> Option<Constraint> {
    match (dq.min_items, dq.max_items) {
        (Some(min), Some(max)) => Some(Constraint {
            kind: ConstraintKind::CountBetween,
            min: Some(Variable::U64(min)),
            max: Some(Variable::U64(max)),
            ..Default::default()
        }),
        (Some(min), None) => Some(Constraint {
            kind: ConstraintKind::MinCount,
            min: Some(Variable::U64(min)),
            ..Default::default()
        }),
        (None, Some(max)) => Some(Constraint {
            kind: ConstraintKind::MaxCount,
            max: Some(Variable::U64(max)),
            ..Default::default()
        }),
        (None, None) => None,
    }
}

fn variable_to_json(v: &Variable) -> serde_json::Value {
    match v {
        Variable::U64(n) => serde_json::json!(n),
        Variable::I64(n) => serde_json::json!(n),
        Variable::F64(n) => serde_json::json!(n),
        Variable::String(s) => serde_json::json!(s),
        Variable::Bool(b) => serde_json::json!(b),
        Variable::List(items) => serde_json::Value::Array(items.iter().map(variable_to_json).collect()),
        Variable::Null => serde_json::Value::Null,
    }
}

fn variable_to_number(v: &Variable) -> Option<serde_json::Number> {
    match v {
        Variable::U64(n) => Some(serde_json::Number::from(*n)),
        Variable::I64(n) => Some(serde_json::Number::from(*n)),
        Variable::F64(n) => serde_json::Number::from_f64(*n),
        _ => None,
    }
}

fn variable_to_u64(v: &Variable) -> Option<u64> {
    match v {
        Variable::U64(n) => Some(*n),
        Variable::I64(n) => u64::try_from(*n).ok(),
        Variable::F64(n) => Some(*n as u64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uint8_at_native_bounds_has_no_constraint() {
        let (ty, constraint) = fit_integer_type(Some(0), Some(255), None);
        assert_eq!(ty, "uint8");
        assert!(constraint.is_none());
    }

    #[test]
    fn max_constraint_when_only_max_differs() {
        let (ty, constraint) = fit_integer_type(Some(0), Some(254), None);
        assert_eq!(ty, "uint8");
        let c = constraint.expect("constraint");
        assert_eq!(c.kind, ConstraintKind::Max);
        assert_eq!(c.max, Some(Variable::U64(254)));
    }

    #[test]
    fn negative_minimum_selects_signed_type() {
        let (ty, constraint) = fit_integer_type(Some(-10), Some(10), None);
        assert_eq!(ty, "int8");
        assert!(constraint.is_some());
    }

    #[test]
    fn const_selects_allowed_constraint() {
        let (_, constraint) = fit_integer_type(Some(5), Some(5), Some(5));
        assert_eq!(constraint.unwrap().kind, ConstraintKind::Allowed);
    }

    #[test]
    fn widening_never_narrows_type() {
        let (narrow, _) = fit_integer_type(Some(0), Some(10), None);
        let (wide, _) = fit_integer_type(Some(0), Some(100_000), None);
        let rank = |n: &str| UINT_WIDTHS.iter().position(|(name, _)| *name == n).unwrap();
        assert!(rank(&wide) >= rank(&narrow));
    }

    #[test]
    fn uint64_native_max_is_u64_max_not_zero() {
        let (ty, constraint) = fit_integer_type(Some(0), Some(u64::MAX as i128), None);
        assert_eq!(ty, "uint64");
        assert!(constraint.is_none());
    }

    #[test]
    fn matter_uint64_maximum_is_exact() {
        let dq = matter_type_to_data_quality("uint64", "#");
        assert_eq!(number_to_i128(dq.maximum.as_ref().unwrap()), Some(u64::MAX as i128));
    }

    #[test]
    fn epoch_us_maximum_matches_systime_us() {
        let epoch = matter_type_to_data_quality("epoch-us", "#");
        let systime = matter_type_to_data_quality("systime-us", "#");
        assert_eq!(epoch.maximum, systime.maximum);
        assert_eq!(number_to_i128(epoch.maximum.as_ref().unwrap()), Some(u64::MAX as i128));
    }

    #[test]
    fn utc_is_bounded_integer_like_epoch_s() {
        let dq = matter_type_to_data_quality("utc", "#");
        assert_eq!(dq.r#type.as_deref(), Some("integer"));
        assert_eq!(dq.minimum.as_ref().and_then(number_to_i128), Some(0));
        assert_eq!(dq.maximum.as_ref().and_then(number_to_i128), Some(u32::MAX as i128));
        assert_eq!(dq.unit.as_deref(), Some("s"));
    }

    #[test]
    fn power_mw_round_trip_detection() {
        let dq = matter_type_to_data_quality("power-mW", "#");
        let (min, max) = dq_bounds(&dq);
        assert_eq!(
            derived_unit_override("mW", min.unwrap(), max.unwrap()),
            Some("power-mW")
        );
    }
}
