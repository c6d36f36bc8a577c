//! Self-describing token encoding
//!
//! Decoded layout is `owner_id (32 hex chars) || ':' || entropy`, encoded
//! with the URL-safe base64 alphabet without padding. The owner id width is
//! fixed, so the separator position is unambiguous whatever the entropy
//! bytes contain.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::domain::entities::{Token, UserId, OWNER_ID_LEN};
use crate::errors::{TokenError, TokenResult};

/// Byte between the owner id and the entropy
pub const TOKEN_SEPARATOR: u8 = b':';

/// Stateless token encoder/decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCodec;

impl TokenCodec {
    /// Mint a fresh token for `owner` carrying `entropy_length` random bytes
    ///
    /// Entropy comes from the operating system CSPRNG. If it cannot be
    /// read the call fails; there is no fallback source.
    pub fn generate(owner: &UserId, entropy_length: usize) -> TokenResult<Token> {
        let mut entropy = vec![0u8; entropy_length];
        OsRng.try_fill_bytes(&mut entropy).map_err(|e| {
            tracing::error!(error = %e, "Random source unavailable");
            TokenError::infrastructure(format!("random source failure: {}", e))
        })?;

        let mut raw = Vec::with_capacity(OWNER_ID_LEN + 1 + entropy_length);
        raw.extend_from_slice(owner.to_fixed_string().as_bytes());
        raw.push(TOKEN_SEPARATOR);
        raw.extend_from_slice(&entropy);

        Ok(Token::new(URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Recover the owner id embedded in `token`
    ///
    /// Performs no lookup; a decodable token is not necessarily valid.
    pub fn decode_owner(token: &str) -> TokenResult<UserId> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::MalformedToken)?;

        if raw.len() <= OWNER_ID_LEN || raw[OWNER_ID_LEN] != TOKEN_SEPARATOR {
            return Err(TokenError::MalformedToken);
        }

        let owner = &raw[..OWNER_ID_LEN];
        if !owner.iter().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b)) {
            return Err(TokenError::MalformedToken);
        }

        std::str::from_utf8(owner)
            .ok()
            .and_then(|text| UserId::parse(text).ok())
            .ok_or(TokenError::MalformedToken)
    }

    /// Length of the decoded byte string, if `token` is valid base64
    pub fn decoded_len(token: &str) -> Option<usize> {
        URL_SAFE_NO_PAD.decode(token).ok().map(|raw| raw.len())
    }
}
