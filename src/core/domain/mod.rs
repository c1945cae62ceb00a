//! Domain types.

pub mod env;
pub mod identity;
mod member;
mod resolution;
mod sync;

pub use env::{Entry, Env};
pub use identity::Identity;
pub use member::TeamMember;
pub use resolution::{KeyError, Resolution};
pub use sync::SyncReport;
