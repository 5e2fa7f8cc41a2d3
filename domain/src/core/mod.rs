//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: identifier newtypes for projects, stages, assignments and reviewers
//! - [`error::DomainError`]: invariant violations raised by validating constructors
//! - [`validation::ConfigIssue`]: structured configuration issues

pub mod error;
pub mod ids;
pub mod validation;
