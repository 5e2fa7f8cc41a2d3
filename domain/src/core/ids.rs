//! Identifier newtypes for the review aggregates.
//!
//! Every entity is keyed by a string id. Stage and assignment ids are minted
//! by the workflow with [`uuid`]; project, definition and reviewer ids come
//! from the caller.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a review project.
    ProjectId
);

string_id!(
    /// Identifier of a stage definition, unique within its project.
    StageDefinitionId
);

string_id!(
    /// Identifier of a live review stage.
    StageId
);

string_id!(
    /// Identifier of a screening assignment.
    AssignmentId
);

string_id!(
    /// Identifier of a reviewer.
    ReviewerId
);

impl StageId {
    /// Generates a new random stage id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AssignmentId {
    /// Generates a new random assignment id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(StageId::generate(), StageId::generate());
        assert_ne!(AssignmentId::generate(), AssignmentId::generate());
    }

    #[test]
    fn test_id_display_and_conversion() {
        let id: ReviewerId = "alice".into();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(id.to_string(), "alice");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProjectId::new("proj-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"proj-1\"");
    }
}
