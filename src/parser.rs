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

//! Parsing and validation of the raw JSON texts.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::Side;

/// A document that is not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{side} JSON is invalid: {message}")]
pub struct ParseError {
    /// Which document failed to parse.
    pub side: Side,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn new(side: Side, err: serde_json::Error) -> Self {
        Self {
            side,
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Parses `text` as the document on `side`.
pub fn parse(text: &str, side: Side) -> Result<Value, ParseError> {
    serde_json::from_str(text).map_err(|e| ParseError::new(side, e))
}

/// Checks whether `text` is valid JSON, with the same rules as [`parse`].
pub fn is_valid(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Whether `text` holds nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Pretty prints `text` with two-space indentation, or returns it unchanged
/// when it is not valid JSON.
pub fn format_json(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.to_string())
}

/// Validity flags of both documents, updated independently of each other.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub left_invalid: bool,
    pub right_invalid: bool,
}

impl Validation {
    pub fn check(left: &str, right: &str) -> Self {
        Self {
            left_invalid: !is_valid(left),
            right_invalid: !is_valid(right),
        }
    }

    /// Re-validates a single side after its text changed.
    pub fn update(&mut self, side: Side, text: &str) {
        let invalid = !is_valid(text);
        match side {
            Side::Left => self.left_invalid = invalid,
            Side::Right => self.right_invalid = invalid,
        }
    }

    pub fn is_invalid(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_invalid,
            Side::Right => self.right_invalid,
        }
    }

    pub fn is_ok(&self) -> bool {
        !self.left_invalid && !self.right_invalid
    }
}

/// What a preview pane shows for a raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Nothing entered yet.
    Waiting,
    /// Pretty printed document.
    Valid(String),
    Invalid,
}

impl Preview {
    pub fn of(text: &str) -> Self {
        if is_blank(text) {
            return Preview::Waiting;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(value) => serde_json::to_string_pretty(&value)
                .map(Preview::Valid)
                .unwrap_or(Preview::Invalid),
            Err(_) => Preview::Invalid,
        }
    }
}
