//! Tests for the confirmation negotiation.

pub mod common;

use similar_asserts::assert_eq;

use query_engine_translation::translation::confirmation::{
    auto_confirm, run_confirmation, ConfirmationSession, ConfirmationState, Transition,
    DEFAULT_MAX_ATTEMPTS,
};
use query_engine_translation::translation::prompt::build_sql_generation_prompt;

const QUERY: &str = "How many customers do we have?";

/// A provider that replays canned responses and records every prompt it was shown.
struct Script {
    responses: Vec<&'static str>,
    prompts: Vec<String>,
}

impl Script {
    fn new(responses: &[&'static str]) -> Self {
        Script {
            responses: responses.iter().rev().copied().collect(),
            prompts: vec![],
        }
    }

    fn provider(&mut self) -> impl FnMut(&str) -> String + '_ {
        |prompt: &str| {
            self.prompts.push(prompt.to_string());
            self.responses.pop().unwrap_or("???").to_string()
        }
    }
}

#[test]
fn confirming_straight_away() {
    let schema = common::shop_schema();
    let mut script = Script::new(&["CONFIRMED"]);

    let outcome = run_confirmation(
        ConfirmationSession::new(schema.clone(), QUERY, DEFAULT_MAX_ATTEMPTS),
        &mut script.provider(),
    );

    assert_eq!(outcome.state, ConfirmationState::Confirmed);
    assert!(outcome.is_confirmed());
    assert_eq!(outcome.attempts, 0);
    assert_eq!(outcome.schema, schema);
    assert_eq!(
        outcome.generation_prompt,
        build_sql_generation_prompt(QUERY, &schema)
    );
    assert_eq!(script.prompts.len(), 1);
}

#[test]
fn unparseable_responses_fall_back_after_the_budget() {
    let schema = common::shop_schema();
    let mut calls = 0;
    let mut provider = |_: &str| {
        calls += 1;
        "I am not sure what you mean".to_string()
    };

    let outcome = run_confirmation(
        ConfirmationSession::new(schema.clone(), QUERY, 3),
        &mut provider,
    );

    assert_eq!(calls, 3);
    assert_eq!(outcome.state, ConfirmationState::FallbackConfirmed);
    assert!(!outcome.is_confirmed());
    assert_eq!(outcome.attempts, 3);
    assert!(!outcome.generation_prompt.is_empty());
    assert_eq!(
        outcome.generation_prompt,
        build_sql_generation_prompt(QUERY, &schema)
    );
}

#[test]
fn fallback_uses_the_latest_schema() {
    let mut script = Script::new(&[
        "table customers doesn't exist, use clients instead",
        "hmm",
        "",
    ]);

    let outcome = run_confirmation(
        ConfirmationSession::new(common::shop_schema(), QUERY, 3),
        &mut script.provider(),
    );

    assert_eq!(outcome.state, ConfirmationState::FallbackConfirmed);
    assert!(outcome.schema.columns("clients").is_some());
    assert!(outcome.schema.columns("customers").is_none());
    assert!(outcome.generation_prompt.last().unwrap().content.contains("Table: clients"));
}

#[test]
fn corrections_are_shown_again_before_confirming() {
    let mut script = Script::new(&[
        "column first_name doesn't exist, use given_name instead",
        "CONFIRMED",
    ]);

    let outcome = run_confirmation(
        ConfirmationSession::new(common::shop_schema(), QUERY, 3),
        &mut script.provider(),
    );

    assert_eq!(outcome.state, ConfirmationState::Confirmed);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(script.prompts.len(), 2);
    assert!(script.prompts[0].contains("  - first_name (text)"));
    assert!(script.prompts[1].contains("  - given_name (text)"));
}

#[test]
fn empty_responses_count_as_attempts_without_changing_anything() {
    let schema = common::shop_schema();
    let session = ConfirmationSession::new(schema.clone(), QUERY, 3);
    let first_prompt = session.prompt();

    let Transition::Pending(session) = session.respond("   ") else {
        panic!("the session should still be pending");
    };

    assert_eq!(session.attempts(), 1);
    assert_eq!(session.state(), ConfirmationState::AwaitingConfirmation);
    assert_eq!(session.current_schema(), &schema);
    assert_eq!(session.prompt(), first_prompt);
}

#[test]
fn corrections_move_the_session_to_reconfirming() {
    let session = ConfirmationSession::new(common::shop_schema(), QUERY, 3);

    let Transition::Pending(session) =
        session.respond("table orders doesn't exist, use purchases")
    else {
        panic!("the session should still be pending");
    };

    assert_eq!(session.state(), ConfirmationState::Reconfirming);
    assert_eq!(session.original_schema(), &common::shop_schema());
    assert!(session.current_schema().columns("purchases").is_some());
}

#[test]
fn a_zero_budget_falls_back_without_asking() {
    let mut calls = 0;
    let mut provider = |_: &str| {
        calls += 1;
        "CONFIRMED".to_string()
    };

    let outcome = run_confirmation(
        ConfirmationSession::new(common::shop_schema(), QUERY, 0),
        &mut provider,
    );

    assert_eq!(calls, 0);
    assert_eq!(outcome.state, ConfirmationState::FallbackConfirmed);
}

#[test]
fn auto_confirm_matches_the_interactive_path() {
    let schema = common::shop_schema();
    let mut script = Script::new(&["CONFIRMED"]);

    let interactive = run_confirmation(
        ConfirmationSession::new(schema.clone(), QUERY, DEFAULT_MAX_ATTEMPTS),
        &mut script.provider(),
    );
    let automatic = auto_confirm(schema, QUERY);

    assert_eq!(automatic, interactive);
}
