//! Shareable-token codec
//!
//! A bank account is shared with counterparties as an opaque token rather
//! than its raw rail account id. The token is reversible: base64url (no
//! padding) over a 4-byte CRC32 of the account id followed by the id bytes.
//! The checksum lets us reject tokens that were truncated or hand-edited
//! before we ever touch the bank directory.
//!
//! Tokens arrive from end users, so every decode failure is a validation
//! error, never an internal fault.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Length of the CRC32 prefix inside the decoded payload.
const CHECKSUM_LEN: usize = 4;

/// Decode failures for shareable tokens
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is not valid base64url: {0}")]
    InvalidAlphabet(String),

    #[error("Token too short: {len} bytes decoded, need more than {CHECKSUM_LEN}")]
    TooShort { len: usize },

    #[error("Token checksum mismatch")]
    ChecksumMismatch,

    #[error("Token payload is not valid UTF-8")]
    InvalidPayload,

    #[error("Token payload is empty")]
    EmptyPayload,
}

impl TokenError {
    /// Stable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidAlphabet(_) => "TOKEN_INVALID_ALPHABET",
            TokenError::TooShort { .. } => "TOKEN_TOO_SHORT",
            TokenError::ChecksumMismatch => "TOKEN_CHECKSUM_MISMATCH",
            TokenError::InvalidPayload => "TOKEN_INVALID_PAYLOAD",
            TokenError::EmptyPayload => "TOKEN_EMPTY",
        }
    }
}

/// Encode a rail account id into a shareable token.
pub fn encode_account_id(account_id: &str) -> String {
    let digest = crc32fast::hash(account_id.as_bytes());

    let mut payload = Vec::with_capacity(CHECKSUM_LEN + account_id.len());
    payload.extend_from_slice(&digest.to_le_bytes());
    payload.extend_from_slice(account_id.as_bytes());

    URL_SAFE_NO_PAD.encode(payload)
}

/// Decode a shareable token back into the rail account id it was built from.
pub fn decode_token(token: &str) -> Result<String, TokenError> {
    let payload = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| TokenError::InvalidAlphabet(e.to_string()))?;

    if payload.len() <= CHECKSUM_LEN {
        return Err(TokenError::TooShort { len: payload.len() });
    }

    let (checksum, id_bytes) = payload.split_at(CHECKSUM_LEN);
    let expected = u32::from_le_bytes([checksum[0], checksum[1], checksum[2], checksum[3]]);

    if crc32fast::hash(id_bytes) != expected {
        return Err(TokenError::ChecksumMismatch);
    }

    let account_id = std::str::from_utf8(id_bytes).map_err(|_| TokenError::InvalidPayload)?;

    if account_id.is_empty() {
        return Err(TokenError::EmptyPayload);
    }

    Ok(account_id.to_string())
}
