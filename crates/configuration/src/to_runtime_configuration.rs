//! Convert a parsed configuration into the one used at runtime.

use url::Url;

use crate::configuration::{Configuration, ModelConfiguration};
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::Secret;
use crate::version1::ParsedConfiguration;

/// Resolve every secret against `environment` and check the values that can be checked
/// without talking to anyone.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let connection_uri = resolve(
        &parsed_config.connection_settings.connection_uri.0,
        "the connection URI",
        &environment,
    )?;

    let generation = parsed_config.generation_settings;
    let api_key = resolve(&generation.api_key.0, "the API key", &environment)?;
    let api_url =
        Url::parse(&generation.api_url).map_err(|err| MakeRuntimeConfigurationError::InvalidValue {
            setting: "the API URL",
            message: format!("{}: {err}", generation.api_url),
        })?;

    Ok(Configuration {
        connection_uri,
        schema_name: parsed_config.connection_settings.schema_name,
        pool_settings: parsed_config.connection_settings.pool_settings,
        model: ModelConfiguration {
            model: generation.model,
            api_key,
            api_url,
            max_tokens: generation.max_tokens,
            temperature: generation.temperature,
            stop: generation.stop,
        },
        confirmation_settings: parsed_config.confirmation_settings,
    })
}

fn resolve(
    secret: &Secret,
    setting: &'static str,
    environment: &impl Environment,
) -> Result<String, MakeRuntimeConfigurationError> {
    match secret {
        Secret::Plain(value) => Ok(value.clone()),
        Secret::FromEnvironment { variable } => environment.read(variable).map_err(|_| {
            MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                setting,
                variable: variable.clone(),
            }
        }),
    }
}
