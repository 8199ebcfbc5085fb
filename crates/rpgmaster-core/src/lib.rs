//! Turn-order logic, input validation, configuration, and the content
//! library for RPG Master.
//!
//! Nothing in this crate talks to the database or the network. The
//! storage layer persists what these functions compute, and the HTTP
//! layer feeds them what clients send.
//!
//! # Modules
//!
//! - [`turn_order`] -- Derived initiative ordering and cursor stepping
//! - [`input`] -- Lenient client input validated into strict values
//! - [`config`] -- YAML configuration with environment overrides
//! - [`library`] -- Markdown content library with YAML front matter

pub mod config;
pub mod input;
pub mod library;
pub mod turn_order;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError, LogFormat};
pub use input::{
    AddCombatantRequest, NewCombatant, NumericInput, SetHpRequest, ValidationError,
    is_truthy, validate_slug, validate_whiteboard_state,
};
pub use library::{ContentDetail, ContentEntry, ContentKind, ContentLibrary, LibraryError};
