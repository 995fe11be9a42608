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

use serde_json::{Map, Value};

pub trait Indent {
    fn indent(&self, level: u32) -> String;
}

impl<T> Indent for T
where
    T: ToString,
{
    fn indent(&self, level: u32) -> String {
        let indent = " ".repeat(level as usize);

        self.to_string()
            .lines()
            .map(|line| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Keys of both objects without duplicates: left keys in document order,
/// then the keys only the right side has.
pub fn union_keys<'a>(lhs: &'a Map<String, Value>, rhs: &'a Map<String, Value>) -> Vec<&'a String> {
    lhs.keys()
        .chain(rhs.keys().filter(|key| !lhs.contains_key(key.as_str())))
        .collect()
}

/// Pairs up array elements by index, padding the shorter side with `None`.
pub fn zip_longest<'a>(
    lhs: &'a [Value],
    rhs: &'a [Value],
) -> impl Iterator<Item = (usize, Option<&'a Value>, Option<&'a Value>)> {
    (0..lhs.len().max(rhs.len())).map(move |idx| (idx, lhs.get(idx), rhs.get(idx)))
}
