//! Data models for the team leave application.
//!
//! Field names serialize in camelCase to match the frontend and the local store.

mod department;
mod leave;
mod member;
mod notification;
mod snapshot;

pub use department::*;
pub use leave::*;
pub use member::*;
pub use notification::*;
pub use snapshot::*;
