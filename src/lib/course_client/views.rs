//! Per-screen view-models. Each one keeps its form state, renders from the store
//! without side effects and runs its remote calls inside its own [`TaskScope`].
//!
//! [`TaskScope`]: super::tasks::TaskScope
use thiserror::Error;

pub mod assignment_group;
pub mod edit_course;
pub mod login;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown form field {0}")]
pub struct UnknownField(pub String);

#[cfg(test)]
#[path = "tests/views.rs"]
mod tests;
