//! Application layer of the onboarding engine.
//!
//! Wires the journey controller to screens, simulated backend latency,
//! inactivity handling and the resume bootstrapper.

pub mod bootstrap;
pub mod inactivity;
pub mod latency;
pub mod runtime;
pub mod screens;

pub use bootstrap::{BootOutcome, BootRequest, BootSource, Bootstrapper, file_backed};
pub use inactivity::{ActivitySignal, InactivityMonitor};
pub use latency::{ScreenScope, SharedController};
pub use runtime::{Frame, JourneyRuntime};
pub use screens::{KycMethod, Screen, ScreenAction, ScreenRegistry};
