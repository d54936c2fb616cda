mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use nl2sql::console::ConsoleTurns;
use nl2sql::generator::is_error_candidate;
use nl2sql::pipeline::{generate_sql_with_auto_confirm, interactive_sql_generation};
use nl2sql::runner::Evaluator;
use nl2sql::state::{create_state, State};
use nl2sql::test_cases::load_test_cases;
use nl2sql_configuration::environment::ProcessEnvironment;
use nl2sql_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration, Configuration,
    ParsedConfiguration,
};
use query_engine_execution::SchemaSource;
use query_engine_translation::translation::prompt::format_schema_for_display;

use cli::{CliOpts, Command};

#[tokio::main]
pub async fn main() -> ExitCode {
    dotenv().ok();

    let opts = CliOpts::parse();
    setup_tracing(&opts);

    match run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_tracing(opts: &CliOpts) {
    let filter = match &opts.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(opts: CliOpts) -> anyhow::Result<()> {
    match opts.command {
        Command::Initialize => {
            write_parsed_configuration(ParsedConfiguration::initial(), &opts.configuration)
                .await
                .context("unable to write the configuration")?;
            println!(
                "Wrote the default configuration to {}",
                opts.configuration.display()
            );
        }
        Command::Schema => {
            let (_, state) = load_state(&opts.configuration).await?;
            let schema = state
                .database
                .fetch_schema()
                .await
                .context("unable to discover the schema")?;
            println!("{}", format_schema_for_display(&schema));
        }
        Command::Ask {
            question,
            auto_confirm,
        } => {
            let (configuration, state) = load_state(&opts.configuration).await?;
            let outcome = if auto_confirm {
                generate_sql_with_auto_confirm(&question, &state.database, &state.generator).await
            } else {
                let mut turns = ConsoleTurns::stdio();
                interactive_sql_generation(
                    &question,
                    &state.database,
                    &state.generator,
                    &mut turns,
                    &configuration.confirmation_settings,
                )
                .await
            };

            if let Some(failure) = &outcome.discovery_failure {
                eprintln!("⚠️ The schema could not be discovered: {failure}");
            }
            if outcome.is_confirmed() {
                println!("\n✅ SQL Queries Generated Successfully:");
            } else {
                println!("\n❌ Schema validation timeout; generated from the latest schema:");
            }
            if outcome.sql_queries.is_empty() {
                println!("No SQL was found in the model's response.");
            }
            for query in &outcome.sql_queries {
                println!("```sql\n{}\n```", pretty(query));
            }
        }
        Command::Evaluate { test_cases, json } => {
            let (_, state) = load_state(&opts.configuration).await?;
            let cases = load_test_cases(&test_cases).await?;
            let evaluator = Evaluator {
                source: &state.database,
                generator: &state.generator,
                executor: &state.database,
            };
            let report = evaluator.run(&cases).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (index, outcome) in report.outcomes.iter().enumerate() {
                    println!("\n--- Test Case {} ---\n{outcome}", index + 1);
                }
                println!("\n{report}");
            }
        }
    }
    Ok(())
}

async fn load_state(
    configuration_dir: &std::path::Path,
) -> anyhow::Result<(Configuration, State)> {
    let parsed = parse_configuration(configuration_dir).await?;
    let configuration = make_runtime_configuration(parsed, ProcessEnvironment)?;
    let state = create_state(&configuration)?;
    Ok((configuration, state))
}

/// Lay out a candidate statement for reading. Error candidates are shown as they are.
fn pretty(query: &str) -> String {
    if is_error_candidate(query) {
        query.to_string()
    } else {
        sqlformat::format(
            query,
            &sqlformat::QueryParams::None,
            sqlformat::FormatOptions::default(),
        )
    }
}
