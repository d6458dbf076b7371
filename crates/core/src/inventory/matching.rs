#![allow(missing_docs)]

//! Payload comparison and the two match disciplines used by `find`.

use serde::Serialize;
use serde_json::Value;

/// How a query's payload is compared against an entry's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Without a query payload every id match counts. With one, the entry must
    /// carry an equal payload.
    Loose,
    /// Like [`MatchPolicy::Loose`], but a query without payload only matches
    /// entries without payload.
    Strict,
}

impl MatchPolicy {
    pub fn accepts(self, entry: Option<&Value>, query: Option<&Value>) -> bool {
        match (query, entry) {
            (Some(wanted), Some(held)) => deep_equal(held, wanted),
            (Some(_), None) => false,
            (None, held) => match self {
                MatchPolicy::Loose => true,
                MatchPolicy::Strict => held.is_none(),
            },
        }
    }
}

/// Matched quantity and the indices that contributed to it, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Matches {
    pub count: u64,
    pub indices: Vec<usize>,
}

impl Matches {
    pub(crate) fn record(&mut self, index: usize, quantity: u64) {
        self.count += quantity;
        self.indices.push(index);
    }

    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Both disciplines evaluated over a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindReport {
    pub loose: Matches,
    pub strict: Matches,
}

impl FindReport {
    pub fn into_policy(self, policy: MatchPolicy) -> Matches {
        match policy {
            MatchPolicy::Loose => self.loose,
            MatchPolicy::Strict => self.strict,
        }
    }
}

/// Structural equality for payloads. Object key order is irrelevant and
/// numbers compare by value, so `1` equals `1.0` but never `"1"`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => {
            x == y || matches!((x.as_f64(), y.as_f64()), (Some(x), Some(y)) if x == y)
        }
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| deep_equal(value, other)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_is_irrelevant() {
        assert!(deep_equal(
            &json!({"a": 1, "b": {"c": 2}}),
            &json!({"b": {"c": 2}, "a": 1})
        ));
    }

    #[test]
    fn type_mismatch_is_never_equal() {
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": "1"})));
        assert!(!deep_equal(&json!({"a": 1}), &json!(1)));
        assert!(!deep_equal(&json!(null), &json!({})));
        assert!(!deep_equal(&json!([1, 2]), &json!({"0": 1, "1": 2})));
    }

    #[test]
    fn key_sets_must_match() {
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
        assert!(!deep_equal(&json!({"a": 1, "b": 2}), &json!({"a": 1})));
        assert!(deep_equal(&json!({}), &json!({})));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(deep_equal(&json!(1), &json!(1.0)));
        assert!(!deep_equal(&json!(1), &json!(2)));
        assert!(deep_equal(&json!([1, null, "x"]), &json!([1.0, null, "x"])));
    }

    #[test]
    fn strict_requires_symmetric_presence() {
        let payload = json!({"a": 1});
        let other = json!({"a": 2});

        assert!(MatchPolicy::Loose.accepts(Some(&payload), None));
        assert!(!MatchPolicy::Strict.accepts(Some(&payload), None));
        assert!(MatchPolicy::Strict.accepts(None, None));

        for policy in [MatchPolicy::Loose, MatchPolicy::Strict] {
            assert!(policy.accepts(Some(&payload), Some(&payload)));
            assert!(!policy.accepts(Some(&payload), Some(&other)));
            assert!(!policy.accepts(None, Some(&payload)));
        }
    }
}
