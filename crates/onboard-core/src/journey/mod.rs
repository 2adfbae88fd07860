//! Journey domain module.
//!
//! # Module Structure
//!
//! - `journey_type`: Journey types and their canonical step sequences
//! - `form_data`: The shared form-data bag (`FormData`)
//! - `screen`: Active screen, bottom bar, error and notification slots
//! - `repository`: Persistence trait for the journey session (`SessionStore`)
//! - `controller`: The journey state machine (`JourneyController`)

mod controller;
mod form_data;
mod journey_type;
mod repository;
mod screen;

// Re-export public API
pub use controller::JourneyController;
pub use form_data::{FormData, keys};
pub use journey_type::{JourneyType, PHYSICAL_KYC_PREFIX, sequence_for, step_ids_for};
pub use repository::{PersistedSession, SessionPatch, SessionStore};
pub use screen::{ActiveScreen, BottomBarContent, ErrorNotice, Notification};
