//! AES-256-GCM envelopes
//!
//! An envelope is the persisted form of one secret:
//! `base64(salt):base64(iv):base64(tag):base64(ciphertext)`.
//! Salt and nonce are fresh random bytes on every seal, so sealing the same
//! plaintext twice never yields the same envelope.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use base64::{engine::general_purpose::STANDARD, Engine};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{VaultError, VaultResult};

use super::key_derivation::{derive_key, KdfParams};
use super::secure_memory::SecretString;

/// Size of the key-derivation salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the AES-GCM nonce in bytes (128 bits)
pub const IV_SIZE: usize = 16;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Separator between the four serialized fields
pub const DELIMITER: char = ':';

/// AES-256-GCM with a 16-byte nonce
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// A sealed secret
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    salt: [u8; SALT_SIZE],
    iv: [u8; IV_SIZE],
    tag: [u8; TAG_SIZE],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Salt used to derive this envelope's key
    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    /// Nonce used for this envelope
    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }

    /// Encrypted bytes (without the tag)
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{d}{}{d}{}{d}{}",
            STANDARD.encode(self.salt),
            STANDARD.encode(self.iv),
            STANDARD.encode(self.tag),
            STANDARD.encode(&self.ciphertext),
            d = DELIMITER,
        )
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

impl FromStr for Envelope {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(DELIMITER).collect();
        if fields.len() != 4 {
            return Err(VaultError::MalformedEnvelope(format!(
                "expected 4 fields, found {}",
                fields.len()
            )));
        }

        Ok(Self {
            salt: decode_fixed("salt", fields[0])?,
            iv: decode_fixed("iv", fields[1])?,
            tag: decode_fixed("tag", fields[2])?,
            ciphertext: decode_field("ciphertext", fields[3])?,
        })
    }
}

fn decode_field(name: &str, value: &str) -> VaultResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| VaultError::MalformedEnvelope(format!("invalid {} encoding: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> VaultResult<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        VaultError::MalformedEnvelope(format!(
            "invalid {} size: expected {}, got {}",
            name,
            N,
            bytes.len()
        ))
    })
}

fn build_cipher(secret: &[u8], salt: &[u8], params: &KdfParams) -> VaultResult<Aes256Gcm16> {
    let key = derive_key(secret, salt, params)?;
    Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Seal a plaintext under the given master secret
pub fn seal(plaintext: &str, secret: &[u8], params: &KdfParams) -> VaultResult<Envelope> {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let cipher = build_cipher(secret, &salt, params)?;

    let mut buffer = plaintext.as_bytes().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);

    Ok(Envelope {
        salt,
        iv,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Open an envelope under the given master secret
///
/// Any tag mismatch, including a wrong master secret, is reported as
/// `AuthenticationFailed`. No plaintext is returned unless the tag verifies.
pub fn open(envelope: &Envelope, secret: &[u8], params: &KdfParams) -> VaultResult<SecretString> {
    let cipher = build_cipher(secret, &envelope.salt, params)?;

    let mut buffer = Zeroizing::new(envelope.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&envelope.iv),
            b"",
            &mut buffer[..],
            Tag::<U16>::from_slice(&envelope.tag),
        )
        .map_err(|_| VaultError::AuthenticationFailed)?;

    let plaintext = String::from_utf8(std::mem::take(&mut *buffer)).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        VaultError::AuthenticationFailed
    })?;

    Ok(SecretString::new(plaintext))
}
