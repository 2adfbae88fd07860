//! Self-contained invite tokens.
//!
//! A token is `inv_` followed by the unpadded base64url encoding of the JSON
//! invite payload. Tokens carry everything needed to start a journey, so
//! opening one needs no server-side state.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use onboard_core::Result;
use onboard_core::invite::{InvitePayload, InviteTokenCodec, TOKEN_PAYLOAD_VERSION, TOKEN_PREFIX};

/// Invite token codec using base64url over JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64InviteCodec;

impl InviteTokenCodec for Base64InviteCodec {
    fn encode(&self, payload: &InvitePayload) -> Result<String> {
        create_invite_token(payload)
    }

    fn decode(&self, token: &str) -> Option<InvitePayload> {
        parse_invite_token(token)
    }
}

/// Encodes `payload` as an invite token.
pub fn create_invite_token(payload: &InvitePayload) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(json)))
}

/// Decodes an invite token; `None` for anything that is not a valid token.
pub fn parse_invite_token(token: &str) -> Option<InvitePayload> {
    let encoded = token.strip_prefix(TOKEN_PREFIX)?;
    // Accept padded input from encoders that keep it
    let bytes = URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    let payload: InvitePayload = serde_json::from_str(&json).ok()?;

    if payload.version != TOKEN_PAYLOAD_VERSION
        || payload.id.is_empty()
        || payload.employee.id.is_empty()
    {
        tracing::debug!(version = payload.version, "[Invite] Rejecting token payload");
        return None;
    }
    Some(payload)
}
