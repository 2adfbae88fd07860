//! Invite domain models and collaborator traits.
//!
//! Invites carry a journey type, the invited employee and prefilled form
//! data. They reach the engine either as self-contained tokens or as
//! legacy ids resolved through an [`InviteLookup`].

mod lookup;
mod model;

pub use lookup::{InviteLookup, InviteTokenCodec, TOKEN_PREFIX};
pub use model::{Employee, InvitePayload, InviteRecord, InviteStatus, TOKEN_PAYLOAD_VERSION};
