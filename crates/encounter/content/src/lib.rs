//! Data-driven encounter definitions and loaders.
//!
//! This crate houses authored encounter content and provides loaders for
//! RON/TOML data files:
//! - Encounter definitions (mechanics, phases, always-active phases) via RON
//! - Engine tunables ([`encounter_core::EncounterConfig`]) via TOML
//!
//! All loaders use encounter-core types directly with serde for
//! deserialization; nothing here runs at tick time.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, EncounterLoader, LoadResult};
