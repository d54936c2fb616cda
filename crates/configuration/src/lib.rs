//! Configuration for the nl2sql tools: where the database is, which model to ask, and how
//! patient to be with the requester.

pub mod configuration;
pub mod connection_settings;
pub mod environment;
pub mod error;
pub mod generation_settings;
pub mod to_runtime_configuration;
pub mod values;
pub mod version1;

pub use configuration::{Configuration, ModelConfiguration};
pub use values::{ApiKey, ConnectionUri, PoolSettings, Secret};
pub use version1::{
    parse_configuration, write_parsed_configuration, ConfirmationSettings, ParsedConfiguration,
};

pub use to_runtime_configuration::make_runtime_configuration;
