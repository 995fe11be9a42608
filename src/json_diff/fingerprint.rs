// Copyright 2024 The JsonCmp Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Canonical serialization of JSON values and multiset fingerprints of arrays.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Canonical text form of a value: object keys sorted by byte order, no
/// insignificant whitespace, arrays in order.
///
/// Two values that compare equal always have the same canonical form,
/// regardless of the key order they were written in.
pub struct Canonical<'a>(pub &'a Value);

impl<'a> fmt::Display for Canonical<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            // -0.0 == 0.0 for `Value`, so both share one form
            Value::Number(n) if n.is_f64() && n.as_f64() == Some(0.0) => f.write_str("0.0"),
            Value::Null | Value::Bool(_) | Value::Number(_) => write!(f, "{}", self.0),
            Value::String(s) => write_str(f, s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", Canonical(item))?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                let mut entries = map.iter().collect::<Vec<_>>();
                entries.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

                f.write_str("{")?;
                for (i, (key, value)) in entries.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_str(f, key)?;
                    write!(f, ":{}", Canonical(value))?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_str(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    let escaped = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&escaped)
}

pub fn canonical(value: &Value) -> String {
    Canonical(value).to_string()
}

/// How two arrays relate once their elements are compared as a multiset.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arrangement {
    /// Same elements in the same order.
    Identical,
    /// Same elements with the same multiplicities in a different order.
    Reordered,
    /// The element multisets differ.
    Different,
}

/// Occurrence count of each canonical element.
#[derive(Debug, Default, PartialEq, Eq)]
struct Fingerprint(HashMap<String, usize>);

impl<'a> FromIterator<&'a String> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = &'a String>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for key in iter {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
        Fingerprint(counts)
    }
}

pub fn arrangement(lhs: &[Value], rhs: &[Value]) -> Arrangement {
    if lhs.len() != rhs.len() {
        return Arrangement::Different;
    }

    let lhs = lhs.iter().map(canonical).collect::<Vec<_>>();
    let rhs = rhs.iter().map(canonical).collect::<Vec<_>>();

    if lhs == rhs {
        Arrangement::Identical
    } else if lhs.iter().collect::<Fingerprint>() == rhs.iter().collect::<Fingerprint>() {
        Arrangement::Reordered
    } else {
        Arrangement::Different
    }
}
