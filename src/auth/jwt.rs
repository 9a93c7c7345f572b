use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The claims the console cares about. The signature is never checked here;
/// the API remains the authority on whether a token is valid.
#[derive(Debug, Deserialize, Clone)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a JWT. Returns `None` for opaque tokens.
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// True only when the token is a JWT whose `exp` lies at or before `now`.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    peek_claims(token)
        .and_then(|c| c.exp)
        .is_some_and(|exp| exp <= now.timestamp())
}
