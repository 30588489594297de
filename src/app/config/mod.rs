//! Configuration-directory loaders.
//!
//! Everything here runs once at startup; failures are fatal before any
//! serving or generation begins.

mod load_registry;
mod load_settings;

pub use load_registry::load_registry;
pub use load_settings::{
    CONFIG_FILE_NAME, DEFAULT_CONFIG_DIR, DEFAULT_GENERATED_DIR, ListenSettings, Settings,
    SettingsOverrides, TlsPaths, load_settings,
};
