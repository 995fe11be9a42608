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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use thiserror::Error;

mod domain;
mod json_diff;
pub mod parser;
mod render;

pub use domain::{Change, ChangeKind, DiffResult, Side, Stats};
pub use json_diff::diff;
pub use json_diff::path::{
    Key, Path, PathDisplay, PathPattern, PatternError, Selector, DEFAULT_SEPARATOR,
};
pub use parser::{format_json, is_valid, ParseError, Preview, Validation};
pub use render::{RenderOptions, Report, Summary};

/// Parses both documents and computes their differences.
///
/// The left document is parsed first, so when both are malformed the error
/// names the left side.
///
/// # Examples
///
/// ```
/// use jsoncmp::{compare, ChangeKind};
///
/// let result = compare(r#"{"x": 1}"#, r#"{"x": 1, "y": 2}"#).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.changes()[0].kind(), ChangeKind::Added);
/// assert_eq!(result.changes()[0].path_string(), "y");
/// ```
pub fn compare(left: &str, right: &str) -> Result<DiffResult, ParseError> {
    let lhs = parser::parse(left, Side::Left)?;
    let rhs = parser::parse(right, Side::Right)?;

    Ok(diff(&lhs, &rhs))
}

/// Builder for a comparison request.
///
/// Unlike [`compare`], the request is rejected up front when either
/// document is blank or invalid, and the result comes back as a [`Report`]
/// carrying the display options.
///
/// # Examples
///
/// ```
/// use jsoncmp::{JsonCompare, RenderOptions};
///
/// let report = JsonCompare::new()
///     .with_left(r#"{"tags": ["a", "b"]}"#)
///     .with_right(r#"{"tags": ["b", "a"]}"#)
///     .with_options(RenderOptions::new().show_reorders(true))
///     .compare()
///     .unwrap();
/// assert_eq!(report.stats().reorder, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCompare<'a> {
    left: Option<&'a str>,
    right: Option<&'a str>,
    options: RenderOptions,
}

impl<'a> JsonCompare<'a> {
    /// Constructs a new, empty `JsonCompare` builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the original document.
    pub fn with_left(mut self, text: &'a str) -> Self {
        self.left = Some(text);
        self
    }

    /// Sets the new document.
    pub fn with_right(mut self, text: &'a str) -> Self {
        self.right = Some(text);
        self
    }

    /// Sets how the report should be displayed.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates both documents and compares them.
    pub fn compare(self) -> Result<Report, CompareError> {
        let left = self.left.unwrap_or_default();
        let right = self.right.unwrap_or_default();

        match (parser::is_blank(left), parser::is_blank(right)) {
            (true, true) => return Err(CompareError::BothEmpty),
            (true, false) => return Err(CompareError::LeftEmpty),
            (false, true) => return Err(CompareError::RightEmpty),
            (false, false) => {}
        }

        let validation = Validation::check(left, right);
        if !validation.is_ok() {
            return Err(CompareError::Invalid {
                left: validation.left_invalid,
                right: validation.right_invalid,
            });
        }

        let result = compare(left, right)?;
        Ok(Report::new(result, self.options))
    }
}

/// Reasons a comparison request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("enter the JSON documents to compare on both sides")]
    BothEmpty,
    #[error("enter the original JSON on the left side")]
    LeftEmpty,
    #[error("enter the new JSON on the right side")]
    RightEmpty,
    /// At least one of the flags is set.
    #[error("fix the following errors:\n{}", describe_invalid(.left, .right))]
    Invalid { left: bool, right: bool },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn describe_invalid(left: &bool, right: &bool) -> String {
    let mut errors = vec![];
    if *left {
        errors.push("left JSON is malformed");
    }
    if *right {
        errors.push("right JSON is malformed");
    }
    errors.join("\n")
}
