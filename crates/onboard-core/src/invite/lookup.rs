//! Collaborators that resolve invites.

use async_trait::async_trait;

use super::model::{InvitePayload, InviteRecord, InviteStatus};
use crate::error::Result;

/// Literal tag every self-contained invite token starts with.
pub const TOKEN_PREFIX: &str = "inv_";

/// Lookup of stored (legacy, id-based) invites.
#[async_trait]
pub trait InviteLookup: Send + Sync {
    /// Finds an invite by id, marking a `sent` invite as `opened`.
    ///
    /// Returns `NotFound` for unknown ids.
    async fn find_invite(&self, invite_id: &str) -> Result<InviteRecord>;

    /// Moves an invite to `status`.
    async fn update_status(&self, invite_id: &str, status: InviteStatus) -> Result<()>;
}

/// Reversible codec between invite payloads and opaque tokens.
pub trait InviteTokenCodec: Send + Sync {
    fn encode(&self, payload: &InvitePayload) -> Result<String>;

    /// Decodes a token. Never fails: anything that is not a well-formed
    /// token yields `None`.
    fn decode(&self, token: &str) -> Option<InvitePayload>;
}
