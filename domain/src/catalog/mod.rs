//! Stage catalog
//!
//! Immutable templates for the phases of a systematic review:
//!
//! - [`ReviewProject`]: a project owning an ordered list of stage definitions
//! - [`StageDefinition`]: stage type, reviewer quota and consensus policy
//! - [`ReviewerRequirement`]: reviewers needed per [`ReviewerRole`]
//! - [`ConsensusPolicy`]: how reviewer disagreement is handled

pub mod definition;
pub mod policy;
pub mod project;

pub use definition::{ReviewerRequirement, ReviewerRole, StageDefinition, StageType};
pub use policy::ConsensusPolicy;
pub use project::ReviewProject;
