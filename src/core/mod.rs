//! Core library components.
//!
//! Everything here is usable without the CLI: env layering, backends,
//! reference resolution, and the sync codec.

pub mod backend;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod env;
pub mod resolve;
pub mod sync;
pub mod team;
pub mod types;
pub mod validation;
