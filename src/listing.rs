// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Shared list-query composition for the flat resources (products,
//! suppliers): keyword search, field filters with range operators, and
//! pagination, parsed once from the request query string. The category
//! tree does not use this; it exists so every flat listing endpoint
//! behaves the same way.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

/// Query parameters that are not field filters.
const RESERVED_PARAMS: [&str; 3] = ["keyword", "page", "limit"];

#[derive(Debug, Clone, PartialEq)]
pub struct ListQueryError {
    message: String,
}

impl ListQueryError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ListQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ListQueryError {}

/// A field value a document exposes to the matcher.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

/// Implemented by any record the listing helper can page through.
pub trait Document {
    /// Display name, the keyword-search target.
    fn name(&self) -> &str;
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatcher {
    pub field: String,
    pub op: MatchOp,
    pub value: String,
}

impl FieldMatcher {
    fn matches(&self, document: &dyn Document) -> bool {
        let Some(value) = document.field(&self.field) else {
            return false;
        };
        match self.op {
            MatchOp::Eq => match value {
                FieldValue::Text(text) => text == self.value,
                FieldValue::Number(number) => {
                    self.value.parse::<f64>().is_ok_and(|wanted| number == wanted)
                }
            },
            op => {
                // Range operators only apply to numeric fields.
                let (FieldValue::Number(number), Ok(wanted)) = (value, self.value.parse::<f64>())
                else {
                    return false;
                };
                match op {
                    MatchOp::Gt => number > wanted,
                    MatchOp::Gte => number >= wanted,
                    MatchOp::Lt => number < wanted,
                    MatchOp::Lte => number <= wanted,
                    MatchOp::Eq => unreachable!(),
                }
            }
        }
    }
}

/// Parsed and validated list query: `?keyword=...&page=2&limit=10` plus
/// any number of `field=value` or `field[op]=value` filters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    keyword: Option<String>,
    filters: Vec<FieldMatcher>,
    page: usize,
    page_size: usize,
}

impl ListQuery {
    pub fn from_params(
        params: &HashMap<String, String>,
        default_page_size: usize,
    ) -> Result<Self, ListQueryError> {
        let page = match params.get("page") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|page| *page >= 1)
                .ok_or_else(|| ListQueryError::new("Page must be a number"))?,
            None => 1,
        };
        let page_size = match params.get("limit") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit >= 1)
                .ok_or_else(|| ListQueryError::new("Limit must be a number"))?,
            None => default_page_size,
        };
        let keyword = params
            .get("keyword")
            .map(|raw| raw.trim().to_string())
            .filter(|keyword| !keyword.is_empty());

        let mut filters = Vec::new();
        for (key, value) in params {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            let matcher = parse_matcher(key, value)?;
            if matches!(matcher.op, MatchOp::Eq) {
                filters.push(matcher);
                continue;
            }
            if matcher.value.parse::<f64>().is_err() {
                return Err(ListQueryError::new(format!(
                    "{} {} must be a number",
                    matcher.field,
                    op_name(matcher.op)
                )));
            }
            filters.push(matcher);
        }
        // Deterministic application order regardless of map iteration.
        filters.sort_by(|a, b| a.field.cmp(&b.field).then(op_name(a.op).cmp(&op_name(b.op))));

        Ok(Self {
            keyword,
            filters,
            page,
            page_size,
        })
    }

    /// Search, filter, then paginate — the same composition every flat
    /// resource listing uses.
    pub fn apply<T: Document>(&self, documents: Vec<T>) -> Vec<T> {
        let keyword = self.keyword.as_deref().map(str::to_lowercase);
        let skip = self.page_size * (self.page - 1);
        documents
            .into_iter()
            .filter(|document| match &keyword {
                Some(keyword) => document.name().to_lowercase().contains(keyword),
                None => true,
            })
            .filter(|document| {
                self.filters
                    .iter()
                    .all(|matcher| matcher.matches(document as &dyn Document))
            })
            .skip(skip)
            .take(self.page_size)
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn parse_matcher(key: &str, value: &str) -> Result<FieldMatcher, ListQueryError> {
    let (field, op) = match key.split_once('[') {
        Some((field, rest)) => {
            let op = match rest.strip_suffix(']') {
                Some("gt") => MatchOp::Gt,
                Some("gte") => MatchOp::Gte,
                Some("lt") => MatchOp::Lt,
                Some("lte") => MatchOp::Lte,
                _ => {
                    return Err(ListQueryError::new(format!(
                        "Unknown filter operator in \"{}\"",
                        key
                    )));
                }
            };
            (field, op)
        }
        None => (key, MatchOp::Eq),
    };
    if field.is_empty() {
        return Err(ListQueryError::new(format!("Invalid filter \"{}\"", key)));
    }
    Ok(FieldMatcher {
        field: field.to_string(),
        op,
        value: value.to_string(),
    })
}

fn op_name(op: MatchOp) -> &'static str {
    match op {
        MatchOp::Eq => "eq",
        MatchOp::Gt => "gt",
        MatchOp::Gte => "gte",
        MatchOp::Lt => "lt",
        MatchOp::Lte => "lte",
    }
}
