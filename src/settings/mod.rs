//! Startup configuration.
//!
//! Settings are layered from the embedded [`constants::DEFAULT_CONFIG`], an
//! optional TOML file, `RESCHECK_*` environment variables and the legacy
//! variables `RESOURCE_URLS`, `AUTH_TOKEN`, `SLACK_WEBHOOK_URL` and
//! `FORCE_SUCCESS_RESPONSE`. They are validated once and then only read.

pub mod constants;
pub mod errors;
pub mod impls;
pub mod types;

pub use errors::ValidationError;
pub use types::{ConfigManager, Settings, ValidatedSettings};
