//! keyref - secret references for layered env files.
//!
//! Env files hold `ref://<path>` tokens instead of secrets. At run time the
//! tokens are resolved against an ordered list of secret stores, scoped to
//! the project (and optionally a profile). Secret sets can be shared with a
//! team as age-encrypted sync envelopes.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Initialize a project
//! │   ├── secrets       # set / get / rm / list
//! │   ├── resolve       # Print the resolved env
//! │   ├── run           # Run with the resolved env
//! │   ├── team          # Team roster
//! │   ├── sync          # Export / import envelopes
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .keyref.toml management
//!     ├── domain/       # Env, Identity, TeamMember, Resolution
//!     ├── env           # Env file layering
//!     ├── backend/      # Backend trait, vendors, namespaces, registry
//!     ├── resolve       # Reference resolution
//!     ├── sync          # Sync envelope codec
//!     ├── cipher/       # age encryption
//!     └── team          # Team member management
//! ```

pub mod cli;
pub mod core;
pub mod error;
