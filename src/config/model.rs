use std::collections::HashSet;

use serde::Deserialize;

use crate::analyser::AnalyserOptions;
use crate::analyser::format::DEFAULT_QUOTES;
use crate::analyser::lookup::{Directory, StaticLookup};
use crate::analyser::response::ResponseOverride;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub allow_multi_errors: Option<bool>,
    pub check_viewable: Option<bool>,
    pub search: Option<bool>,
    /// Quote characters used to regroup tokens, e.g. `"\"'`"`
    pub quotes: Option<String>,
    pub responses: Option<Vec<ResponseOverride>>,
    pub directory: Option<Directory>,
}

impl Config {
    /// Validation options described by this config; unset flags are `false`.
    pub fn options(&self) -> AnalyserOptions {
        AnalyserOptions {
            allow_multi_errors: self.allow_multi_errors.unwrap_or(false),
            responses: self.responses.clone().unwrap_or_default(),
            check_viewable: self.check_viewable.unwrap_or(false),
            search: self.search.unwrap_or(false),
        }
    }

    pub fn quotes(&self) -> Vec<char> {
        match &self.quotes {
            Some(q) => q.chars().collect(),
            None => DEFAULT_QUOTES.to_vec(),
        }
    }

    pub fn lookup(&self) -> StaticLookup {
        StaticLookup::new(self.directory.clone().unwrap_or_default())
    }

    /// Validate the config, collecting every problem instead of stopping at the first.
    pub fn validate(&self) -> Result<(), crate::config::ConfigError> {
        let mut errors = Vec::new();

        for (i, response) in self.responses.iter().flatten().enumerate() {
            if response.text.is_empty() {
                errors.push(format!(
                    "responses[{i}]: text must not be empty (criteria: {})",
                    response.criteria
                ));
            }
        }

        if let Some(quotes) = &self.quotes
            && quotes.is_empty()
        {
            errors.push("quotes: must contain at least one character".to_string());
        }

        if let Some(directory) = &self.directory {
            check_unique_ids(
                "users",
                directory.users.iter().map(|u| u.id.as_str()),
                &mut errors,
            );
            check_unique_ids(
                "members",
                directory.members.iter().map(|m| m.user.id.as_str()),
                &mut errors,
            );
            check_unique_ids(
                "channels",
                directory.channels.iter().map(|c| c.id.as_str()),
                &mut errors,
            );
            check_unique_ids(
                "roles",
                directory.roles.iter().map(|r| r.id.as_str()),
                &mut errors,
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::config::ConfigError::Validation(errors))
        }
    }

    /// Merge `other` on top of `self`. Scalars in `other` win; override lists
    /// are concatenated with `other`'s first so they are consulted first.
    pub fn merge(self, other: Config) -> Config {
        Config {
            allow_multi_errors: other.allow_multi_errors.or(self.allow_multi_errors),
            check_viewable: other.check_viewable.or(self.check_viewable),
            search: other.search.or(self.search),
            quotes: other.quotes.or(self.quotes),
            responses: Self::merge_vecs(other.responses, self.responses),
            directory: match (self.directory, other.directory) {
                (None, None) => None,
                (Some(b), None) => Some(b),
                (None, Some(o)) => Some(o),
                (Some(b), Some(o)) => Some(b.merge(o)),
            },
        }
    }

    fn merge_vecs<T>(first: Option<Vec<T>>, second: Option<Vec<T>>) -> Option<Vec<T>> {
        match (first, second) {
            (None, None) => None,
            (Some(f), None) => Some(f),
            (None, Some(s)) => Some(s),
            (Some(mut f), Some(s)) => {
                f.extend(s);
                Some(f)
            }
        }
    }
}

fn check_unique_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<String>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("directory.{kind}: duplicate id '{id}'"));
        }
    }
}

pub fn parse_config(yaml: &str) -> Result<Config, crate::config::ConfigError> {
    let config: Config = serde_saphyr::from_str(yaml)?;
    Ok(config)
}
