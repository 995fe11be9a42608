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

use regex::Regex;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Separator placed between object keys when a path is displayed.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Location of a value inside a JSON document, root-relative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Path {
    #[default]
    Root,
    Keys(Vec<Key>),
}

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    Idx(usize),
    Field(String),
}

impl Path {
    pub fn append(&self, next: Key) -> Path {
        match self {
            Path::Root => Path::Keys(vec![next]),
            Path::Keys(list) => {
                let mut copy = list.clone();
                copy.push(next);
                Path::Keys(copy)
            }
        }
    }

    pub fn keys(&self) -> &[Key] {
        match self {
            Path::Root => &[],
            Path::Keys(keys) => keys,
        }
    }

    pub fn is_root(&self) -> bool {
        self.keys().is_empty()
    }

    /// Renders the path joining object keys with `separator`.
    ///
    /// Array indexes are always rendered as `[i]` right after the preceding
    /// segment, e.g. `users[0].name` with the default separator.
    pub fn display_with<'p>(&'p self, separator: &'p str) -> PathDisplay<'p> {
        PathDisplay {
            path: self,
            separator,
        }
    }

    /// Resolves the path inside `value`.
    pub fn lookup<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        let mut current = value;
        for key in self.keys() {
            current = match key {
                Key::Field(field) => current.as_object()?.get(field)?,
                Key::Idx(index) => current.as_array()?.get(*index)?,
            };
        }
        Some(current)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.display_with(DEFAULT_SEPARATOR).fmt(f)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let keys = self.keys();
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// [`Path`] rendered with a custom separator, see [`Path::display_with`].
///
/// Fields that would read ambiguously, because they are empty or contain the
/// separator or a bracket, are written as `['field']`.
#[derive(Debug, Clone, Copy)]
pub struct PathDisplay<'p> {
    path: &'p Path,
    separator: &'p str,
}

impl<'p> PathDisplay<'p> {
    fn needs_quotes(&self, field: &str) -> bool {
        field.is_empty()
            || field.contains(['[', ']', '\''])
            || (!self.separator.is_empty() && field.contains(self.separator))
    }
}

impl<'p> fmt::Display for PathDisplay<'p> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.path {
            Path::Root => write!(f, "(root)"),
            Path::Keys(keys) => {
                for (i, key) in keys.iter().enumerate() {
                    match key {
                        Key::Idx(idx) => write!(f, "[{}]", idx)?,
                        Key::Field(field) if self.needs_quotes(field) => {
                            write!(f, "['{}']", field)?
                        }
                        Key::Field(field) if i == 0 => write!(f, "{}", field)?,
                        Key::Field(field) => write!(f, "{}{}", self.separator, field)?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum PatternError {
    #[error("invalid path pattern `{0}`")]
    Invalid(String),
    #[error("invalid index in path pattern `{0}`")]
    Index(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// JSONPath-like selector used to narrow down which changes are displayed.
///
/// Supported syntax: `$`, `.field`, `['any key']`, `.*`, `[n]`, `[*]`,
/// `[a:b]`, `[a:]` and `[:b]`. A pattern matches every path it prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPattern {
    selectors: Vec<Selector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Field(String),
    AnyField,
    Idx(usize),
    AnyIdx,
    /// Half-open index range, either bound may be open.
    Slice(Option<usize>, Option<usize>),
}

const SEGMENT: &str = r"\.([A-Za-z_][A-Za-z0-9_\-]*|\*)|\['([^']*)'\]|\[(\d+|\d*:\d*|\*)\]";

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let whole = Regex::new(&format!("^\\$(?:{})*$", SEGMENT))?;
        if !whole.is_match(pattern) {
            return Err(PatternError::Invalid(pattern.to_string()));
        }

        let segment = Regex::new(SEGMENT)?;
        let mut selectors = Vec::new();

        for caps in segment.captures_iter(&pattern[1..]) {
            let selector = if let Some(field) = caps.get(1) {
                match field.as_str() {
                    "*" => Selector::AnyField,
                    name => Selector::Field(name.to_string()),
                }
            } else if let Some(quoted) = caps.get(2) {
                Selector::Field(quoted.as_str().to_string())
            } else if let Some(index) = caps.get(3) {
                Self::parse_index(index.as_str())?
            } else {
                return Err(PatternError::Invalid(pattern.to_string()));
            };
            selectors.push(selector);
        }

        Ok(Self { selectors })
    }

    fn parse_index(token: &str) -> Result<Selector, PatternError> {
        let number = |s: &str| -> Result<Option<usize>, PatternError> {
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| PatternError::Index(token.to_string()))
        };

        if token == "*" {
            return Ok(Selector::AnyIdx);
        }

        match token.split_once(':') {
            Some((start, end)) => Ok(Selector::Slice(number(start)?, number(end)?)),
            None => number(token)?
                .map(Selector::Idx)
                .ok_or_else(|| PatternError::Index(token.to_string())),
        }
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Whether the pattern prefixes `path`.
    pub fn matches(&self, path: &Path) -> bool {
        let keys = path.keys();
        if self.selectors.len() > keys.len() {
            return false;
        }

        self.selectors
            .iter()
            .zip(keys)
            .all(|(selector, key)| match (selector, key) {
                (Selector::Field(expected), Key::Field(actual)) => expected == actual,
                (Selector::AnyField, Key::Field(_)) => true,
                (Selector::Idx(expected), Key::Idx(actual)) => expected == actual,
                (Selector::AnyIdx, Key::Idx(_)) => true,
                (Selector::Slice(start, end), Key::Idx(idx)) => {
                    start.map_or(true, |start| start <= *idx)
                        && end.map_or(true, |end| *idx < end)
                }
                _ => false,
            })
    }
}

impl FromStr for PathPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
