//! Masked display of API keys
//!
//! The masked view is the only form of a stored key that listings show.
//! It works on characters, so multi-byte keys never split mid-character.

use serde::Serialize;

use crate::crypto::{EnvelopeCipher, SecretString};
use crate::error::VaultResult;

/// Character used for the hidden part of a key
pub const MASK_CHAR: char = '*';

/// Shown in place of a key that could not be decrypted
pub const PLACEHOLDER_MASK: &str = "••••••••";

/// Characters shown at each end of a long key
const VISIBLE_CHARS: usize = 4;

/// Smallest mask run for keys longer than `2 * VISIBLE_CHARS`
const MIN_MASK_RUN: usize = 4;

/// Mask a plaintext key for display
///
/// Keys of 8 characters or fewer are fully masked. Longer keys keep their
/// first and last 4 characters around a run of `max(len - 8, 4)` mask
/// characters.
pub fn mask_secret(plaintext: &str) -> String {
    let chars: Vec<char> = plaintext.chars().collect();
    let len = chars.len();

    if len <= VISIBLE_CHARS * 2 {
        return MASK_CHAR.to_string().repeat(len);
    }

    let run = (len - VISIBLE_CHARS * 2).max(MIN_MASK_RUN);
    let mut masked = String::with_capacity(VISIBLE_CHARS * 2 + run);
    masked.extend(&chars[..VISIBLE_CHARS]);
    masked.extend(std::iter::repeat(MASK_CHAR).take(run));
    masked.extend(&chars[len - VISIBLE_CHARS..]);
    masked
}

/// Outcome of masking a stored envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskResult {
    /// The envelope opened and was masked
    Masked(String),
    /// The envelope could not be opened
    Placeholder,
}

impl MaskResult {
    /// Mask the outcome of a decrypt call
    pub fn from_decrypted(decrypted: VaultResult<SecretString>) -> Self {
        match decrypted {
            Ok(secret) => Self::Masked(mask_secret(secret.as_str())),
            Err(_) => Self::Placeholder,
        }
    }

    /// Display string for this result
    pub fn as_str(&self) -> &str {
        match self {
            Self::Masked(view) => view,
            Self::Placeholder => PLACEHOLDER_MASK,
        }
    }

    /// Whether decryption failed
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Display-safe summary of a provider's credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaskedView {
    pub has_secret: bool,
    pub masked: Option<String>,
}

impl MaskedView {
    /// View for a provider without a credential
    pub fn empty() -> Self {
        Self {
            has_secret: false,
            masked: None,
        }
    }

    /// Build the view for a stored envelope
    ///
    /// Never fails: an envelope that does not open is shown as the
    /// placeholder.
    pub fn for_envelope(cipher: &EnvelopeCipher, envelope: Option<&str>) -> Self {
        let Some(envelope) = envelope.filter(|e| !e.is_empty()) else {
            return Self::empty();
        };

        let result = MaskResult::from_decrypted(cipher.decrypt(envelope));
        if result.is_placeholder() {
            tracing::warn!("Stored API key could not be decrypted for display");
        }

        Self {
            has_secret: true,
            masked: Some(result.as_str().to_string()),
        }
    }
}
