//! Domain layer of the onboarding journey engine.
//!
//! Holds the step catalog, journey types and their sequences, the journey
//! controller, and the traits the engine talks to its collaborators
//! through (session store, invite lookup, token codec, analytics sink).
//! Nothing in this crate performs I/O.

pub mod analytics;
pub mod config;
pub mod error;
pub mod invite;
pub mod journey;
pub mod step;

// Re-export common error type
pub use error::{JourneyError, Result};
