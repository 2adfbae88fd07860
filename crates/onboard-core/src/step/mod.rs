//! Step catalog: the static registry of every screen a journey can show.
//!
//! Steps are defined at build time and never created or destroyed at
//! runtime. Journeys refer to them by [`StepId`]; persisted state refers to
//! them by their wire id (`"kycChoice"`, ...), which is resolved back through
//! [`StepCatalog::resolve`].

mod catalog;

pub use catalog::{Step, StepCatalog, StepId};
