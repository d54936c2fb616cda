mod pool_settings;
mod secret;
pub mod uri;

pub use pool_settings::PoolSettings;
pub use secret::Secret;
pub use uri::{ApiKey, ConnectionUri};
