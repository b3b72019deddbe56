//! # Kinds
//!
//! [`ResourceKind`](crate::controller::reconciler::ResourceKind) strategies for
//! the three managed resources.
//!
//! | Kind | Created under | Found by listing |
//! |---|---|---|
//! | Team | organization | organization teams |
//! | Project | team | organization projects |
//! | ProjectKey | project | organization projects, then the project's keys |
//!
//! Projects are looked up at organization level: deleting a team orphans its
//! projects, and a team-scoped listing would no longer see them.

mod project;
mod project_key;
mod team;

pub use project::ProjectKind;
pub use project_key::{KeyState, ProjectKeyKind};
pub use team::TeamKind;
