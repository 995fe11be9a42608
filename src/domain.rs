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

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::json_diff::path::Path;

/// Which of the two compared documents something refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The original document.
    Left,
    /// The new document.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Classification of a single reported difference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Present only in the new document.
    Added,
    /// Present only in the original document.
    Deleted,
    /// Present in both documents with different values.
    Updated,
    /// Same multiset of array elements in a different order.
    Reorder,
}

impl ChangeKind {
    /// All kinds, in reporting order.
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Added,
        ChangeKind::Deleted,
        ChangeKind::Updated,
        ChangeKind::Reorder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Updated => "updated",
            ChangeKind::Reorder => "reorder",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One difference between the original and the new document.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added {
        path: Path,
        new_value: Value,
    },
    Deleted {
        path: Path,
        old_value: Value,
    },
    Updated {
        path: Path,
        old_value: Value,
        new_value: Value,
    },
    /// Both arrays hold the same elements with the same multiplicities,
    /// only the order differs.
    Reorder {
        path: Path,
        old_array: Vec<Value>,
        new_array: Vec<Value>,
    },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Added { .. } => ChangeKind::Added,
            Change::Deleted { .. } => ChangeKind::Deleted,
            Change::Updated { .. } => ChangeKind::Updated,
            Change::Reorder { .. } => ChangeKind::Reorder,
        }
    }

    /// Structured location of the change, root-relative.
    pub fn path(&self) -> &Path {
        match self {
            Change::Added { path, .. }
            | Change::Deleted { path, .. }
            | Change::Updated { path, .. }
            | Change::Reorder { path, .. } => path,
        }
    }

    /// Display form of [`Change::path`] using the default separator.
    pub fn path_string(&self) -> String {
        self.path().to_string()
    }

    /// Value in the original document, absent for additions and reorders.
    pub fn old_value(&self) -> Option<&Value> {
        match self {
            Change::Deleted { old_value, .. } | Change::Updated { old_value, .. } => {
                Some(old_value)
            }
            Change::Added { .. } | Change::Reorder { .. } => None,
        }
    }

    /// Value in the new document, absent for deletions and reorders.
    pub fn new_value(&self) -> Option<&Value> {
        match self {
            Change::Added { new_value, .. } | Change::Updated { new_value, .. } => {
                Some(new_value)
            }
            Change::Deleted { .. } | Change::Reorder { .. } => None,
        }
    }

    /// The original array of a reorder.
    pub fn old_array(&self) -> Option<&[Value]> {
        match self {
            Change::Reorder { old_array, .. } => Some(old_array),
            _ => None,
        }
    }

    /// The new array of a reorder.
    pub fn new_array(&self) -> Option<&[Value]> {
        match self {
            Change::Reorder { new_array, .. } => Some(new_array),
            _ => None,
        }
    }

    /// The same change seen from the other side: additions become deletions
    /// and old/new values swap.
    pub fn inverse(&self) -> Change {
        match self.clone() {
            Change::Added { path, new_value } => Change::Deleted {
                path,
                old_value: new_value,
            },
            Change::Deleted { path, old_value } => Change::Added {
                path,
                new_value: old_value,
            },
            Change::Updated {
                path,
                old_value,
                new_value,
            } => Change::Updated {
                path,
                old_value: new_value,
                new_value: old_value,
            },
            Change::Reorder {
                path,
                old_array,
                new_array,
            } => Change::Reorder {
                path,
                old_array: new_array,
                new_array: old_array,
            },
        }
    }
}

impl Serialize for Change {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Change", 5)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("path", &self.path_string())?;
        state.serialize_field("segments", self.path())?;

        match self {
            Change::Added { new_value, .. } => {
                state.serialize_field("newValue", new_value)?;
            }
            Change::Deleted { old_value, .. } => {
                state.serialize_field("oldValue", old_value)?;
            }
            Change::Updated {
                old_value,
                new_value,
                ..
            } => {
                state.serialize_field("oldValue", old_value)?;
                state.serialize_field("newValue", new_value)?;
            }
            Change::Reorder {
                old_array,
                new_array,
                ..
            } => {
                state.serialize_field("oldArray", old_array)?;
                state.serialize_field("newArray", new_array)?;
            }
        }

        state.end()
    }
}

/// Ordered list of changes: every non-reorder change first, then every reorder.
///
/// Serializes as a plain JSON array of change records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DiffResult {
    changes: Vec<Change>,
}

impl DiffResult {
    pub(crate) fn new(mut changes: Vec<Change>, reorders: Vec<Change>) -> Self {
        changes.extend(reorders);
        Self { changes }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Per-kind tally of the changes.
    pub fn stats(&self) -> Stats {
        self.changes.iter().collect()
    }

    pub fn reorders(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|change| change.kind() == ChangeKind::Reorder)
    }

    /// Copy of the result with reorder records removed.
    pub fn without_reorders(&self) -> DiffResult {
        Self {
            changes: self
                .changes
                .iter()
                .filter(|change| change.kind() != ChangeKind::Reorder)
                .cloned()
                .collect(),
        }
    }

    /// The result of comparing the documents the other way round, up to the
    /// order of object keys.
    pub fn inverse(&self) -> DiffResult {
        Self {
            changes: self.changes.iter().map(Change::inverse).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DiffResult {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

impl IntoIterator for DiffResult {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Count of changes per kind. Kinds without records count as zero.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub added: usize,
    pub deleted: usize,
    pub updated: usize,
    pub reorder: usize,
}

impl Stats {
    pub fn get(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Added => self.added,
            ChangeKind::Deleted => self.deleted,
            ChangeKind::Updated => self.updated,
            ChangeKind::Reorder => self.reorder,
        }
    }

    pub fn total(&self) -> usize {
        ChangeKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChangeKind, usize)> + '_ {
        ChangeKind::ALL.iter().map(|kind| (*kind, self.get(*kind)))
    }

    fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Deleted => self.deleted += 1,
            ChangeKind::Updated => self.updated += 1,
            ChangeKind::Reorder => self.reorder += 1,
        }
    }
}

impl<'a> FromIterator<&'a Change> for Stats {
    fn from_iter<I: IntoIterator<Item = &'a Change>>(iter: I) -> Self {
        let mut stats = Stats::default();
        for change in iter {
            stats.record(change.kind());
        }
        stats
    }
}
