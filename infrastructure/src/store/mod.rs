//! Review store adapters.
//!
//! Provides [`InMemoryReviewStore`], a process-local implementation of the
//! [`ReviewStore`](screening_application::ReviewStore) port.

mod memory;

pub use memory::InMemoryReviewStore;
