// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 niklasbhv

//! The boolean expression language embedded in Matter conformance, and its
//! evaluator against a runtime context.
//!
//! Represented as an explicit tree rather than raw JSON, parsed from and
//! serialized to the `{"andTerm": [...]}`-shaped JSON the side-car and
//! Matter XML both carry.

use serde_json::{json, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum ConformanceExpr {
    /// Unconditional - always true. The `{}` empty-object shape.
    True,
    And(Vec<ConformanceExpr>),
    Or(Vec<ConformanceExpr>),
    Xor(Vec<ConformanceExpr>),
    Not(Box<ConformanceExpr>),
    Feature { code: String },
    Condition { name: String },
    /// Cannot be resolved without runtime attribute state - always evaluates false.
    Attribute { name: String },
}

impl Default for ConformanceExpr {
    fn default() -> Self {
        ConformanceExpr::True
    }
}

/// Runtime context the evaluator checks leaf predicates against.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub supported_features: HashSet<String>,
}

impl ConformanceExpr {
    /// Parse the JSON shape used in Matter XML / the SDF side-car
    /// (`{"andTerm": [...]}`, `{"feature": {"name": "CODE"}}`, ...).
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        if value.is_null() {
            return ConformanceExpr::True;
        }
        let Some(obj) = value.as_object() else {
            return ConformanceExpr::True;
        };
        if obj.is_empty() {
            return ConformanceExpr::True;
        }
        if let Some(terms) = obj.get("andTerm").and_then(Value::as_array) {
            return ConformanceExpr::And(terms.iter().map(ConformanceExpr::from_json).collect());
        }
        if let Some(terms) = obj.get("orTerm").and_then(Value::as_array) {
            return ConformanceExpr::Or(terms.iter().map(ConformanceExpr::from_json).collect());
        }
        if let Some(terms) = obj.get("xorTerm").and_then(Value::as_array) {
            return ConformanceExpr::Xor(terms.iter().map(ConformanceExpr::from_json).collect());
        }
        if let Some(inner) = obj.get("notTerm") {
            return ConformanceExpr::Not(Box::new(ConformanceExpr::from_json(inner)));
        }
        if let Some(feature) = obj.get("feature") {
            let code = feature
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return ConformanceExpr::Feature { code };
        }
        if let Some(condition) = obj.get("condition") {
            let name = condition
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return ConformanceExpr::Condition { name };
        }
        if let Some(attribute) = obj.get("attribute") {
            let name = attribute
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return ConformanceExpr::Attribute { name };
        }
        ConformanceExpr::True
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            ConformanceExpr::True => json!({}),
            ConformanceExpr::And(terms) => json!({"andTerm": terms.iter().map(Self::to_json).collect::<Vec<_>>()}),
            ConformanceExpr::Or(terms) => json!({"orTerm": terms.iter().map(Self::to_json).collect::<Vec<_>>()}),
            ConformanceExpr::Xor(terms) => json!({"xorTerm": terms.iter().map(Self::to_json).collect::<Vec<_>>()}),
            ConformanceExpr::Not(inner) => json!({"notTerm": inner.to_json()}),
            ConformanceExpr::Feature { code } => json!({"feature": {"name": code}}),
            ConformanceExpr::Condition { name } => json!({"condition": {"name": name}}),
            ConformanceExpr::Attribute { name } => json!({"attribute": {"name": name}}),
        }
    }

    /// Evaluate the expression against `ctx`.
    ///
    /// `xorTerm` is "exactly one of N evaluates true": every alternative is
    /// evaluated before deciding, rather than returning on the first true term.
    #[must_use]
    pub fn evaluate(&self, ctx: &EvalContext) -> bool {
        match self {
            ConformanceExpr::True => true,
            ConformanceExpr::And(terms) => terms.iter().all(|t| t.evaluate(ctx)),
            ConformanceExpr::Or(terms) => terms.iter().any(|t| t.evaluate(ctx)),
            ConformanceExpr::Xor(terms) => terms.iter().filter(|t| t.evaluate(ctx)).count() == 1,
            ConformanceExpr::Not(inner) => !inner.evaluate(ctx),
            ConformanceExpr::Feature { code } => ctx.supported_features.contains(code),
            ConformanceExpr::Condition { name } => name == "Matter",
            ConformanceExpr::Attribute { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with(features: &[&str]) -> EvalContext {
        EvalContext {
            supported_features: features.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn empty_object_is_unconditional() {
        assert!(ConformanceExpr::from_json(&json!({})).evaluate(&EvalContext::default()));
    }

    #[test]
    fn and_requires_all() {
        let expr = ConformanceExpr::And(vec![
            ConformanceExpr::Feature { code: "AB".into() },
            ConformanceExpr::Feature { code: "CD".into() },
        ]);
        assert!(!expr.evaluate(&ctx_with(&["AB"])));
        assert!(expr.evaluate(&ctx_with(&["AB", "CD"])));
    }

    #[test]
    fn xor_true_iff_exactly_one() {
        let expr = ConformanceExpr::Xor(vec![
            ConformanceExpr::Feature { code: "AB".into() },
            ConformanceExpr::Feature { code: "CD".into() },
            ConformanceExpr::Feature { code: "EF".into() },
        ]);
        assert!(!expr.evaluate(&ctx_with(&[])));
        assert!(expr.evaluate(&ctx_with(&["AB"])));
        assert!(!expr.evaluate(&ctx_with(&["AB", "CD"])));
    }

    #[test]
    fn not_inverts() {
        let expr = ConformanceExpr::Not(Box::new(ConformanceExpr::Feature { code: "AB".into() }));
        assert!(expr.evaluate(&ctx_with(&[])));
        assert!(!expr.evaluate(&ctx_with(&["AB"])));
    }

    #[test]
    fn condition_matter_is_true_others_false() {
        assert!(ConformanceExpr::Condition { name: "Matter".into() }.evaluate(&EvalContext::default()));
        assert!(!ConformanceExpr::Condition { name: "Zigbee".into() }.evaluate(&EvalContext::default()));
    }

    #[test]
    fn attribute_leaf_is_always_false() {
        assert!(!ConformanceExpr::Attribute { name: "foo".into() }.evaluate(&EvalContext::default()));
    }

    #[test]
    fn json_round_trips() {
        let expr = ConformanceExpr::And(vec![
            ConformanceExpr::Feature { code: "AB".into() },
            ConformanceExpr::Not(Box::new(ConformanceExpr::Condition { name: "Matter".into() })),
        ]);
        let json = expr.to_json();
        assert_eq!(ConformanceExpr::from_json(&json), expr);
    }

    #[test]
    fn conformance_idempotence() {
        let expr = ConformanceExpr::Or(vec![
            ConformanceExpr::Feature { code: "AB".into() },
            ConformanceExpr::Xor(vec![
                ConformanceExpr::Feature { code: "CD".into() },
                ConformanceExpr::Feature { code: "EF".into() },
            ]),
        ]);
        let ctx = ctx_with(&["CD"]);
        assert_eq!(expr.evaluate(&ctx), expr.evaluate(&ctx));
    }
}
