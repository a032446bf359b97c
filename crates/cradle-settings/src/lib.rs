//! # cradle-settings
//!
//! Configuration management for the Cradle monitor client.
//!
//! Settings are resolved from three layers, lowest to highest priority:
//!
//! 1. Compiled defaults ([`CradleSettings::default`])
//! 2. `~/.cradle/settings.json`, deep-merged over the defaults
//! 3. Environment variable overrides (`CRADLE_*`)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{AlertSettings, ApiSettings, CradleSettings, SocketSettings};
