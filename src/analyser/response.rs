//! User-facing failure messages: the `%wildcard` templating routine and the
//! table of templates per failure kind.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kinds of validation failure a user can be told about.
///
/// Template wildcards available per kind:
/// - `type`: `%username`, `%name`, `%expected`, `%received`
/// - `undefined`: `%username`, `%name`
/// - `undiscoverable`: `%data`
/// - `unviewable`: `%username`
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Criteria {
    /// Token present but matches none of the expected types
    Type,
    /// Required token absent
    Undefined,
    /// Lookup found nothing for the token
    Undiscoverable,
    /// Resolved channel is not an acceptable target
    Unviewable,
}

impl Criteria {
    pub const ALL: [Criteria; 4] = [
        Criteria::Type,
        Criteria::Undefined,
        Criteria::Undiscoverable,
        Criteria::Unviewable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Criteria::Type => "type",
            Criteria::Undefined => "undefined",
            Criteria::Undiscoverable => "undiscoverable",
            Criteria::Unviewable => "unviewable",
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-supplied template that replaces the default for `criteria`,
/// optionally only for the argument at `position`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResponseOverride {
    #[serde(default)]
    pub position: Option<usize>,
    pub text: String,
    pub criteria: Criteria,
}

impl ResponseOverride {
    pub fn new(criteria: Criteria, text: impl Into<String>) -> Self {
        Self {
            position: None,
            text: text.into(),
            criteria,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Immutable mapping from failure kind to its default template.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTable {
    templates: HashMap<Criteria, String>,
}

impl Default for ResponseTable {
    fn default() -> Self {
        let templates = [
            (
                Criteria::Type,
                "%username, your argument %name did not match the proper type. Expected type %expected but got %received",
            ),
            (
                Criteria::Undefined,
                "%username, you did not provide a %name argument and it is required.",
            ),
            (Criteria::Undiscoverable, "Unable to find %data"),
            (
                Criteria::Unviewable,
                "%username, I can't view that channel. To do anything, my permissions must be modified to view that channel",
            ),
        ]
        .into_iter()
        .map(|(criteria, text)| (criteria, text.to_string()))
        .collect();
        Self { templates }
    }
}

impl ResponseTable {
    /// Return a copy of this table with the default for `criteria` replaced.
    pub fn with_template(&self, criteria: Criteria, text: impl Into<String>) -> Self {
        let mut templates = self.templates.clone();
        templates.insert(criteria, text.into());
        Self { templates }
    }

    /// Pick the template for a failure of kind `criteria` at `position`.
    ///
    /// Overrides scoped to `position` win over unscoped overrides, which win
    /// over this table.
    pub fn resolve<'a>(
        &'a self,
        criteria: Criteria,
        position: usize,
        overrides: &'a [ResponseOverride],
    ) -> &'a str {
        let matching = || overrides.iter().filter(move |o| o.criteria == criteria);
        matching()
            .find(|o| o.position == Some(position))
            .or_else(|| matching().find(|o| o.position.is_none()))
            .map(|o| o.text.as_str())
            .or_else(|| self.templates.get(&criteria).map(String::as_str))
            .unwrap_or_default()
    }
}

/// Replace every `%key` in `template` with its value, one key at a time in
/// the order given.
///
/// Scanning resumes after each inserted value, so a value that itself
/// contains `%key` is not substituted again, and neither is a `%key` formed
/// by splicing a value into the text around it (`%na%nameme` with an empty
/// `name` leaves `%name`). There is no escape syntax.
pub fn replace(template: &str, properties: &[(&str, &str)]) -> String {
    let mut value = template.to_string();
    for (key, replacement) in properties {
        let needle = format!("%{key}");
        let mut from = 0;
        while let Some(offset) = value[from..].find(&needle) {
            let start = from + offset;
            value.replace_range(start..start + needle.len(), replacement);
            from = start + replacement.len();
        }
    }
    value
}
