//! Version 1 of the configuration file format.

use std::io::ErrorKind;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_translation::translation::confirmation::DEFAULT_MAX_ATTEMPTS;

use crate::connection_settings::DatabaseConnectionSettings;
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};
use crate::generation_settings::GenerationSettings;

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

/// The configuration as written on disk. Secrets may still refer to the environment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using.
    pub version: u32,
    /// Points to the JSON schema of this file, for editors.
    #[serde(rename = "$schema")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub connection_settings: DatabaseConnectionSettings,
    #[serde(default)]
    pub generation_settings: GenerationSettings,
    #[serde(default)]
    pub confirmation_settings: ConfirmationSettings,
}

/// How the schema confirmation is run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationSettings {
    /// Responses accepted before the latest schema is used without a confirmation.
    #[serde(default = "max_attempts_default")]
    pub max_attempts: u32,
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        ConfirmationSettings {
            max_attempts: max_attempts_default(),
        }
    }
}

fn max_attempts_default() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl ParsedConfiguration {
    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }

    pub fn empty() -> Self {
        ParsedConfiguration {
            version: CURRENT_VERSION,
            schema: Some(CONFIGURATION_JSONSCHEMA_FILENAME.to_string()),
            connection_settings: DatabaseConnectionSettings::empty(),
            generation_settings: GenerationSettings::empty(),
            confirmation_settings: ConfirmationSettings::default(),
        }
    }
}

/// Read the configuration file from a directory. A directory without one gets the defaults.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents = match fs::read_to_string(&configuration_file).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(
                path = %configuration_file.display(),
                "No configuration file found; using the defaults"
            );
            return Ok(ParsedConfiguration::initial());
        }
        Err(err) => {
            return Err(ParseConfigurationError::IoErrorButStringified(format!(
                "{}: {}",
                &configuration_file.display(),
                err
            )))
        }
    };

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    if parsed_config.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion {
            found: parsed_config.version,
            expected: CURRENT_VERSION,
        });
    }

    Ok(parsed_config)
}

/// Write the parsed configuration into a directory on disk, along with its JSON schema.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)? + "\n",
    )
    .await?;

    Ok(())
}
