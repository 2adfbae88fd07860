//! Infrastructure layer of the onboarding journey engine.
//!
//! Adapters for the domain traits: the key-prefixed session store and its
//! storage back ends, versioned persistence DTOs, the invite token codec,
//! the in-memory invite store, configuration loading and platform paths.

pub mod analytics;
pub mod config_service;
pub mod dto;
pub mod invite_store;
pub mod invite_token;
pub mod paths;
pub mod session_store;
pub mod storage;

pub use crate::analytics::TracingAnalyticsSink;
pub use crate::config_service::ConfigService;
pub use crate::invite_store::InMemoryInviteStore;
pub use crate::invite_token::{Base64InviteCodec, create_invite_token, parse_invite_token};
pub use crate::paths::OnboardPaths;
pub use crate::session_store::LocalStorageSessionStore;
pub use crate::storage::{JsonFileStorage, KeyValueStorage, MemoryStorage};
