//! Quorum consensus for review stages
//!
//! A stage gathers one decision per assignment. Once the number of
//! terminal decisions reaches the stage's reviewer requirement, the
//! decisions are tallied and the stage's [`ConflictState`] is decided.
//!
//! # Flow
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  submit decision                                           │
//! │        │                                                   │
//! │        ▼                                                   │
//! │  DecisionTally (included / excluded / undecided)           │
//! │        │                                                   │
//! │        ▼                                                   │
//! │  terminal >= required ? ──no──▶ Pending (state unchanged)  │
//! │        │ yes                                               │
//! │        ▼                                                   │
//! │  unanimous ──▶ Resolved                                    │
//! │  split + escalate_on_disagreement ──▶ Escalated            │
//! │  split ──▶ Conflict                                        │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod consensus;
pub mod evaluation;
pub mod tally;

// Re-export main types
pub use consensus::{ConflictState, ConsensusOutcome};
pub use evaluation::{QuorumEvaluation, evaluate_quorum};
pub use tally::DecisionTally;
