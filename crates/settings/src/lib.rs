mod error;
mod settings;
mod sources;

pub use error::{SchemaViolation, SettingsError};
pub use settings::Settings;
pub use sources::config::{schema, validate};
