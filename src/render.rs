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

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::domain::{Change, ChangeKind, DiffResult, Stats};
use crate::json_diff::misc::Indent;
use crate::json_diff::path::{PathPattern, DEFAULT_SEPARATOR};

/// Display filters applied when a [`DiffResult`] is presented.
///
/// None of these influence how the differences are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Include [`ChangeKind::Reorder`] records in the output.
    pub show_reorders: bool,
    /// Separator placed between object keys of displayed paths.
    pub separator: String,
    /// Only display changes located under this pattern.
    pub only: Option<PathPattern>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_reorders: false,
            separator: DEFAULT_SEPARATOR.to_string(),
            only: None,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_reorders(mut self, show_reorders: bool) -> Self {
        self.show_reorders = show_reorders;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn only(mut self, pattern: PathPattern) -> Self {
        self.only = Some(pattern);
        self
    }

    pub fn is_visible(&self, change: &Change) -> bool {
        if change.kind() == ChangeKind::Reorder && !self.show_reorders {
            return false;
        }

        self.only
            .as_ref()
            .map_or(true, |pattern| pattern.matches(change.path()))
    }
}

/// Outcome of a comparison together with the way it should be presented.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    result: DiffResult,
    options: RenderOptions,
}

impl Report {
    pub fn new(result: DiffResult, options: RenderOptions) -> Self {
        Self { result, options }
    }

    /// The complete, unfiltered result.
    pub fn result(&self) -> &DiffResult {
        &self.result
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Statistics over the complete result.
    pub fn stats(&self) -> Stats {
        self.result.stats()
    }

    /// Changes that pass the display filters, in result order.
    pub fn visible(&self) -> impl Iterator<Item = &Change> {
        self.result
            .iter()
            .filter(|change| self.options.is_visible(change))
    }

    pub fn has_differences(&self) -> bool {
        self.visible().next().is_some()
    }

    /// Serializable view of the visible changes and the statistics.
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            changes: self.visible().collect(),
            stats: self.stats(),
        }
    }

    fn fmt_change(&self, f: &mut fmt::Formatter, change: &Change) -> fmt::Result {
        writeln!(
            f,
            "[{}] {}",
            change.kind(),
            change.path().display_with(&self.options.separator)
        )?;

        match change {
            Change::Added { new_value, .. } => fmt_value(f, "new", new_value),
            Change::Deleted { old_value, .. } => fmt_value(f, "old", old_value),
            Change::Updated {
                old_value,
                new_value,
                ..
            } => {
                fmt_value(f, "old", old_value)?;
                fmt_value(f, "new", new_value)
            }
            Change::Reorder {
                old_array,
                new_array,
                ..
            } => {
                fmt_value(f, "old", &Value::Array(old_array.clone()))?;
                fmt_value(f, "new", &Value::Array(new_array.clone()))
            }
        }
    }
}

fn fmt_value(f: &mut fmt::Formatter, label: &str, value: &Value) -> fmt::Result {
    let json = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
    writeln!(f, "    {}:", label)?;
    writeln!(f, "{}", json.indent(8))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.is_empty() {
            return write!(f, "no differences found");
        }

        let mut shown = 0;
        for change in self.visible() {
            self.fmt_change(f, change)?;
            shown += 1;
        }
        if shown > 0 {
            writeln!(f)?;
        }

        let stats = self.stats();
        write!(
            f,
            "{} {}, {} {}, {} {}",
            ChangeKind::Added,
            stats.added,
            ChangeKind::Deleted,
            stats.deleted,
            ChangeKind::Updated,
            stats.updated
        )?;
        if self.options.show_reorders {
            write!(f, ", {} {}", ChangeKind::Reorder, stats.reorder)?;
        }

        Ok(())
    }
}

/// See [`Report::summary`].
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub changes: Vec<&'a Change>,
    pub stats: Stats,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::json_diff::diff;
    use serde_json::json;

    fn report(lhs: Value, rhs: Value, options: RenderOptions) -> Report {
        Report::new(diff(&lhs, &rhs), options)
    }

    #[test]
    fn test_no_differences() {
        let report = report(json!({ "a": 1 }), json!({ "a": 1 }), RenderOptions::new());
        assert!(!report.has_differences());
        assert_eq!(report.to_string(), "no differences found");
    }

    #[test]
    fn test_render_changes() {
        let report = report(
            json!({ "user": { "name": "a", "age": 1 } }),
            json!({ "user": { "name": "b", "tags": ["x"] } }),
            RenderOptions::new(),
        );

        let expected = "\
[updated] user.name
    old:
        \"a\"
    new:
        \"b\"
[deleted] user.age
    old:
        1
[added] user.tags
    new:
        [
          \"x\"
        ]

added 1, deleted 1, updated 1";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_reorders_hidden_by_default() {
        let lhs = json!({ "list": [1, 2], "x": 1 });
        let rhs = json!({ "list": [2, 1], "x": 2 });

        let hidden = report(lhs.clone(), rhs.clone(), RenderOptions::new());
        assert_eq!(hidden.visible().count(), 1);
        assert_eq!(hidden.stats().reorder, 1);
        assert!(!hidden.to_string().contains("[reorder]"));
        assert!(hidden.to_string().ends_with("added 0, deleted 0, updated 1"));

        let shown = report(lhs, rhs, RenderOptions::new().show_reorders(true));
        assert_eq!(shown.visible().count(), 2);
        assert!(shown.to_string().contains("[reorder] list"));
        assert!(shown.to_string().ends_with("updated 1, reorder 1"));
    }

    #[test]
    fn test_only_reorders_hidden() {
        let report = report(json!([1, 2]), json!([2, 1]), RenderOptions::new());
        assert!(!report.has_differences());
        assert_eq!(report.to_string(), "added 0, deleted 0, updated 0");
    }

    #[test]
    fn test_everything_filtered_out() {
        let options = RenderOptions::new().only(PathPattern::parse("$.b").unwrap());
        let report = report(json!({ "a": 1 }), json!({ "a": 2 }), options);
        assert!(!report.has_differences());
        assert_eq!(report.to_string(), "added 0, deleted 0, updated 1");
    }

    #[test]
    fn test_separator_and_filter() {
        let options = RenderOptions::new()
            .separator(" > ")
            .only(PathPattern::parse("$.a[*]").unwrap());
        let report = report(
            json!({ "a": [{ "b": 1 }], "c": 1 }),
            json!({ "a": [{ "b": 2 }], "c": 2 }),
            options,
        );

        assert_eq!(report.visible().count(), 1);
        assert!(report.to_string().starts_with("[updated] a[0] > b\n"));
        assert_eq!(report.stats().updated, 2);
    }

    #[test]
    fn test_summary() {
        let report = report(json!({ "x": 1 }), json!({ "x": 1, "y": 2 }), RenderOptions::new());
        assert_eq!(
            serde_json::to_value(report.summary()).unwrap(),
            json!({
                "changes": [{ "kind": "added", "path": "y", "segments": ["y"], "newValue": 2 }],
                "stats": { "added": 1, "deleted": 0, "updated": 0, "reorder": 0 }
            })
        );
    }
}
