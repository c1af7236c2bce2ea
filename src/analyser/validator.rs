//! Argument validation: walks a [`Definition`] position by position, matches
//! each token against the position's expected types, and records typed
//! values or user-facing failures.

use std::sync::Arc;

use serde::Serialize;

use super::DefinitionError;
use super::definition::{Argument, Definition, TypeTag};
use super::lookup::{Context, Lookup, MessageSink, NoLookup, NullSink, SharedLookup, SharedSink};
use super::response::{Criteria, ResponseOverride, ResponseTable, replace};
use super::value::{Value, parse_number};

/// Behaviour switches for a validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyserOptions {
    /// Report every failure instead of only the first.
    pub allow_multi_errors: bool,
    /// Templates consulted before the [`ResponseTable`].
    pub responses: Vec<ResponseOverride>,
    /// Accept only viewable text channels and DM channels for `Channel` arguments.
    pub check_viewable: bool,
    /// Enable the `Channel`, `Role` and `User` types.
    pub search: bool,
}

/// A failure that was reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub kind: Criteria,
    pub position: usize,
    pub message: String,
}

/// Where a validator is in its single run.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationState {
    Pending,
    Succeeded(Vec<Value>),
    /// `collected` holds the values matched before `position`.
    Failed {
        kind: Criteria,
        position: usize,
        collected: Vec<Value>,
    },
}

impl ValidationState {
    pub fn is_usable(&self) -> bool {
        matches!(self, ValidationState::Succeeded(_))
    }
}

/// Single-use validator for one set of tokens against one definition.
pub struct Validator {
    definition: Definition,
    tokens: Vec<String>,
    context: Context,
    options: AnalyserOptions,
    responses: ResponseTable,
    lookup: SharedLookup,
    sink: SharedSink,
    state: ValidationState,
    failures: Vec<Failure>,
}

impl Validator {
    pub fn new(definition: Definition, tokens: Vec<String>, context: Context) -> Self {
        Self {
            definition,
            tokens,
            context,
            options: AnalyserOptions::default(),
            responses: ResponseTable::default(),
            lookup: Arc::new(NoLookup),
            sink: Arc::new(NullSink),
            state: ValidationState::Pending,
            failures: Vec::new(),
        }
    }

    /// Parse `length` specifications of `definition` and build a validator for them.
    pub fn parse(
        definition: &str,
        tokens: Vec<String>,
        length: usize,
        context: Context,
    ) -> Result<Self, DefinitionError> {
        Ok(Self::new(
            Definition::parse(definition, length)?,
            tokens,
            context,
        ))
    }

    pub fn with_options(mut self, options: AnalyserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_responses(mut self, responses: ResponseTable) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_lookup(mut self, lookup: impl Lookup + 'static) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    pub fn with_shared_lookup(mut self, lookup: SharedLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_shared_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn is_usable(&self) -> bool {
        self.state.is_usable()
    }

    pub fn is_validating(&self) -> bool {
        matches!(self.state, ValidationState::Pending)
    }

    /// Values matched so far: all of them on success, the prefix before the
    /// failing position otherwise.
    pub fn collected(&self) -> &[Value] {
        match &self.state {
            ValidationState::Pending => &[],
            ValidationState::Succeeded(values) => values,
            ValidationState::Failed { collected, .. } => collected,
        }
    }

    /// Most recently reported failure.
    pub fn error(&self) -> Option<&Failure> {
        self.failures.last()
    }

    /// Every reported failure, in the order reported.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Run the validation. Only the first call does any work; later calls
    /// return the state reached by the first.
    pub async fn validate(&mut self) -> &ValidationState {
        if !self.is_validating() {
            tracing::warn!("validator reused after completion; returning previous result");
            return &self.state;
        }

        let arguments = self.definition.arguments().to_vec();
        let username = self.context.author.username.clone();
        let mut collected = Vec::new();
        let mut first_failure: Option<(Criteria, usize)> = None;

        for argument in &arguments {
            let position = argument.position;
            let token = self
                .tokens
                .get(position)
                .filter(|t| !t.is_empty())
                .cloned();

            let Some(token) = token else {
                if argument.required {
                    tracing::debug!(position, "required argument missing");
                    self.report(
                        Criteria::Undefined,
                        position,
                        &[
                            ("username", username.as_str()),
                            ("name", argument.primary_name()),
                        ],
                    )
                    .await;
                    first_failure.get_or_insert((Criteria::Undefined, position));
                    break;
                }
                continue;
            };

            let mut lookup_failure = None;
            match self.match_token(argument, &token, &mut lookup_failure).await {
                Some(value) => {
                    tracing::debug!(position, token = %token, "argument matched");
                    if first_failure.is_none() {
                        collected.push(value);
                    }
                }
                None => {
                    tracing::debug!(position, token = %token, "argument matched no expected type");
                    let expected = argument.expected_description();
                    self.report(
                        Criteria::Type,
                        position,
                        &[
                            ("username", username.as_str()),
                            ("name", argument.primary_name()),
                            ("expected", expected.as_str()),
                            ("received", token.as_str()),
                        ],
                    )
                    .await;
                    first_failure
                        .get_or_insert((lookup_failure.unwrap_or(Criteria::Type), position));
                    if !self.options.allow_multi_errors {
                        break;
                    }
                }
            }
        }

        self.state = match first_failure {
            None => ValidationState::Succeeded(collected),
            Some((kind, position)) => ValidationState::Failed {
                kind,
                position,
                collected,
            },
        };
        &self.state
    }

    /// Try the expected types of `argument` in fixed priority order and
    /// return the first conversion that succeeds.
    ///
    /// Failed lookups are reported as they happen; the kind of the first one
    /// is left in `lookup_failure`.
    async fn match_token(
        &mut self,
        argument: &Argument,
        token: &str,
        lookup_failure: &mut Option<Criteria>,
    ) -> Option<Value> {
        if argument.accepts(TypeTag::Literal) && argument.literals().any(|l| l == token) {
            return Some(Value::Str(token.to_string()));
        }
        if argument.accepts(TypeTag::String) {
            return Some(Value::Str(token.to_string()));
        }
        if argument.accepts(TypeTag::Number)
            && let Some(n) = parse_number(token)
        {
            return Some(Value::Number(n));
        }
        if argument.accepts(TypeTag::Boolean) {
            match token {
                "true" => return Some(Value::Boolean(true)),
                "false" => return Some(Value::Boolean(false)),
                _ => {}
            }
        }

        if !self.options.search || !argument.tags().any(|tag| tag.is_entity()) {
            return None;
        }

        let self_allowed = !argument.required;
        let position = argument.position;

        if argument.accepts(TypeTag::Channel) {
            let lookup = Arc::clone(&self.lookup);
            let found = lookup
                .resolve_channel(&self.context, token, self_allowed)
                .await;
            tracing::trace!(position, token, found = found.is_some(), "channel lookup");
            match found {
                Some(channel) if !self.options.check_viewable || channel.is_usable_target() => {
                    return Some(Value::Channel(channel));
                }
                Some(_) => {
                    let username = self.context.author.username.clone();
                    self.report(Criteria::Unviewable, position, &[("username", username.as_str())])
                        .await;
                    lookup_failure.get_or_insert(Criteria::Unviewable);
                    self.report_undiscoverable(position, "channel", token, lookup_failure)
                        .await;
                }
                None => {
                    self.report_undiscoverable(position, "channel", token, lookup_failure)
                        .await;
                }
            }
        }

        if argument.accepts(TypeTag::Role) {
            let lookup = Arc::clone(&self.lookup);
            let found = lookup.resolve_role(&self.context, token).await;
            tracing::trace!(position, token, found = found.is_some(), "role lookup");
            match found {
                Some(role) => return Some(Value::Role(role)),
                None => {
                    self.report_undiscoverable(position, "role", token, lookup_failure)
                        .await;
                }
            }
        }

        if argument.accepts(TypeTag::User) {
            let lookup = Arc::clone(&self.lookup);
            let found = if self.context.is_direct() {
                lookup
                    .resolve_user(&self.context, token, self_allowed)
                    .await
            } else {
                lookup
                    .resolve_member(&self.context, token, self_allowed)
                    .await
                    .map(|member| member.user)
            };
            tracing::trace!(position, token, found = found.is_some(), "user lookup");
            match found {
                Some(user) => return Some(Value::User(user)),
                None => {
                    self.report_undiscoverable(position, "user", token, lookup_failure)
                        .await;
                }
            }
        }

        None
    }

    async fn report_undiscoverable(
        &mut self,
        position: usize,
        kind: &str,
        token: &str,
        lookup_failure: &mut Option<Criteria>,
    ) {
        lookup_failure.get_or_insert(Criteria::Undiscoverable);
        let data = format!("{kind} {token}");
        self.report(Criteria::Undiscoverable, position, &[("data", data.as_str())])
            .await;
    }

    /// First failure of a run is always reported; later ones only in
    /// multi-error mode.
    fn is_reportable(&self) -> bool {
        self.failures.is_empty() || self.options.allow_multi_errors
    }

    async fn report(&mut self, kind: Criteria, position: usize, properties: &[(&str, &str)]) {
        if !self.is_reportable() {
            return;
        }
        let template = self
            .responses
            .resolve(kind, position, &self.options.responses);
        let message = replace(template, properties);
        tracing::debug!(%kind, position, message = %message, "reporting failure");
        self.sink.send(&self.context, &message).await;
        self.failures.push(Failure {
            kind,
            position,
            message,
        });
    }
}
