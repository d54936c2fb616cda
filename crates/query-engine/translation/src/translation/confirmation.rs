//! The schema confirmation negotiation.
//!
//! A [`ConfirmationSession`] is consumed by every turn: a turn either gives back the session
//! for another round, or ends it with a [`ConfirmationOutcome`]. A session ends either because
//! the requester confirmed the schema, or because the attempt budget ran out, in which case the
//! latest schema is used anyway and the outcome says so.

use query_engine_metadata::metadata::SchemaModel;

use super::corrections::{parse_schema_corrections, CONFIRMATION_TOKEN};
use super::prompt::{build_schema_confirmation_prompt, build_sql_generation_prompt, PromptMessage};

/// How many responses we accept before giving up on a clean confirmation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    AwaitingConfirmation,
    Reconfirming,
    Confirmed,
    /// The attempt budget ran out and the latest schema was used without confirmation.
    FallbackConfirmed,
}

/// Produces the requester's next response, given the prompt to show them.
pub trait UserTurnProvider {
    fn next_turn(&mut self, prompt: &str) -> String;
}

impl<F> UserTurnProvider for F
where
    F: FnMut(&str) -> String,
{
    fn next_turn(&mut self, prompt: &str) -> String {
        self(prompt)
    }
}

#[derive(Debug, Clone)]
pub struct ConfirmationSession {
    original_schema: SchemaModel,
    current_schema: SchemaModel,
    nl_query: String,
    attempts: u32,
    max_attempts: u32,
    state: ConfirmationState,
}

/// The result of a single turn.
#[derive(Debug)]
pub enum Transition {
    Pending(ConfirmationSession),
    Done(ConfirmationOutcome),
}

/// A finished negotiation, with the prompt to generate SQL from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    /// Either `Confirmed` or `FallbackConfirmed`.
    pub state: ConfirmationState,
    pub schema: SchemaModel,
    pub nl_query: String,
    pub attempts: u32,
    pub generation_prompt: Vec<PromptMessage>,
}

impl ConfirmationOutcome {
    /// Was the schema confirmed by the requester, rather than used after running out of
    /// attempts?
    pub fn is_confirmed(&self) -> bool {
        self.state == ConfirmationState::Confirmed
    }
}

impl ConfirmationSession {
    pub fn new(schema: SchemaModel, nl_query: impl Into<String>, max_attempts: u32) -> Self {
        ConfirmationSession {
            original_schema: schema.clone(),
            current_schema: schema,
            nl_query: nl_query.into(),
            attempts: 0,
            max_attempts,
            state: ConfirmationState::AwaitingConfirmation,
        }
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn original_schema(&self) -> &SchemaModel {
        &self.original_schema
    }

    pub fn current_schema(&self) -> &SchemaModel {
        &self.current_schema
    }

    pub fn nl_query(&self) -> &str {
        &self.nl_query
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// The confirmation prompt for the schema as it currently stands.
    pub fn prompt(&self) -> String {
        build_schema_confirmation_prompt(&self.current_schema, &self.nl_query)
    }

    /// Process one response from the requester.
    ///
    /// An empty response counts as an attempt and changes nothing. Anything other than the
    /// confirmation token is applied as a correction and also counts as an attempt.
    pub fn respond(mut self, response: &str) -> Transition {
        let response = response.trim();

        if response.is_empty() {
            self.attempts += 1;
            tracing::debug!(
                attempts = self.attempts,
                "Empty response to the schema confirmation"
            );
        } else {
            let correction = parse_schema_corrections(response, &self.current_schema);
            if correction.confirmed {
                tracing::debug!(attempts = self.attempts, "Schema confirmed");
                return Transition::Done(self.finish(ConfirmationState::Confirmed));
            }
            self.current_schema = correction.schema;
            self.attempts += 1;
            self.state = ConfirmationState::Reconfirming;
            tracing::debug!(attempts = self.attempts, "Schema corrected");
        }

        if self.is_exhausted() {
            Transition::Done(self.force_confirm())
        } else {
            Transition::Pending(self)
        }
    }

    /// End the negotiation without a confirmation, using the latest schema.
    pub fn force_confirm(self) -> ConfirmationOutcome {
        tracing::warn!(
            max_attempts = self.max_attempts,
            "Maximum schema confirmation attempts reached; using the latest schema"
        );
        self.finish(ConfirmationState::FallbackConfirmed)
    }

    fn finish(self, state: ConfirmationState) -> ConfirmationOutcome {
        let generation_prompt = build_sql_generation_prompt(&self.nl_query, &self.current_schema);
        ConfirmationOutcome {
            state,
            schema: self.current_schema,
            nl_query: self.nl_query,
            attempts: self.attempts,
            generation_prompt,
        }
    }
}

/// Drive a session to completion, asking `provider` for every response.
pub fn run_confirmation(
    mut session: ConfirmationSession,
    provider: &mut dyn UserTurnProvider,
) -> ConfirmationOutcome {
    loop {
        if session.is_exhausted() {
            return session.force_confirm();
        }
        let response = provider.next_turn(&session.prompt());
        match session.respond(&response) {
            Transition::Pending(next) => session = next,
            Transition::Done(outcome) => return outcome,
        }
    }
}

/// Confirm the schema as discovered, without asking anyone.
pub fn auto_confirm(schema: SchemaModel, nl_query: impl Into<String>) -> ConfirmationOutcome {
    let session = ConfirmationSession::new(schema, nl_query, DEFAULT_MAX_ATTEMPTS);
    let mut provider = |_: &str| CONFIRMATION_TOKEN.to_string();
    run_confirmation(session, &mut provider)
}
