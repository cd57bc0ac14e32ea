//! AES primitive adapter: CMAC, CCM AEAD and single-block ECB
//!
//! Thin, stateless wrappers over the AES building blocks the mesh toolbox
//! is composed from. All functions are pure and thread-safe; this module
//! carries no key-material semantics beyond length checks.

use aes::Aes128;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use ccm::aead::{Aead, Payload};
use ccm::consts::{U4, U8, U13, U16};
use ccm::{Ccm, TagSize};
use cmac::{Cmac, Mac};

use crate::error::CryptoError;

/// AES-128 key length in bytes
pub const KEY_LEN: usize = 16;

/// AES block length in bytes
pub const BLOCK_LEN: usize = 16;

/// CCM nonce length in bytes (mesh transport and network layers)
pub const NONCE_LEN: usize = 13;

/// Maximum CCM payload under a 13-byte nonce (2-byte length field)
const CCM_MAX_PAYLOAD: usize = u16::MAX as usize;

/// AES-128 CMAC (RFC 4493) over an arbitrary-length message.
///
/// # Errors
///
/// `InvalidKeyLength` unless `key` is exactly 16 bytes.
pub fn aes_cmac(key: &[u8], message: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
    let mut mac =
        <Cmac<Aes128> as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        })?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

/// AES-128 CMAC with a fixed-size key over a multi-part message.
///
/// The KDF chain feeds concatenations like `T1 ‖ P ‖ 0x02` through CMAC;
/// taking the parts as slices avoids building the concatenation and makes
/// the call infallible (a 16-byte key is valid by construction).
pub(crate) fn aes_cmac_parts(key: &[u8; KEY_LEN], parts: &[&[u8]]) -> [u8; KEY_LEN] {
    let mut mac = <Cmac<Aes128> as Mac>::new(GenericArray::from_slice(key));
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// AES-CCM encryption: returns `ciphertext ‖ tag`.
///
/// `tag_length` must be 4, 8 or 16 bytes (the mesh network and transport
/// layers use 4 and 8; 16 is kept for the full CCM parameter space).
///
/// # Errors
///
/// - `InvalidKeyLength` unless `key` is exactly 16 bytes
/// - `UnsupportedTagLength` for a tag length outside {4, 8, 16}
/// - `PayloadTooLarge` if `plaintext` exceeds 65535 bytes
pub fn ccm_encrypt(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    associated_data: &[u8],
    tag_length: usize,
) -> Result<Vec<u8>, CryptoError> {
    let payload = Payload { msg: plaintext, aad: associated_data };
    match tag_length {
        4 => seal::<U4>(key, nonce, payload),
        8 => seal::<U8>(key, nonce, payload),
        16 => seal::<U16>(key, nonce, payload),
        other => Err(CryptoError::UnsupportedTagLength { tag_length: other }),
    }
}

/// AES-CCM decryption: inverse of [`ccm_encrypt`].
///
/// Decryption is all-or-nothing: on tag mismatch no plaintext is released.
///
/// # Errors
///
/// - `InvalidKeyLength` unless `key` is exactly 16 bytes
/// - `UnsupportedTagLength` for a tag length outside {4, 8, 16}
/// - `AuthenticationFailure` if the tag does not verify
pub fn ccm_decrypt(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    associated_data: &[u8],
    tag_length: usize,
) -> Result<Vec<u8>, CryptoError> {
    let payload = Payload { msg: ciphertext, aad: associated_data };
    match tag_length {
        4 => open::<U4>(key, nonce, payload),
        8 => open::<U8>(key, nonce, payload),
        16 => open::<U16>(key, nonce, payload),
        other => Err(CryptoError::UnsupportedTagLength { tag_length: other }),
    }
}

/// Single-block AES-128 ECB encryption.
///
/// Used as a primitive by higher protocol layers (privacy obfuscation of
/// network headers); the KDF chain itself never calls this.
///
/// # Errors
///
/// `InvalidKeyLength` unless `key` is exactly 16 bytes.
pub fn ecb_encrypt(key: &[u8], block: &[u8; BLOCK_LEN]) -> Result<[u8; BLOCK_LEN], CryptoError> {
    let cipher = Aes128::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: KEY_LEN,
        actual: key.len(),
    })?;
    let mut out = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut out);
    Ok(out.into())
}

fn seal<M: TagSize + aes::cipher::ArrayLength<u8>>(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, CryptoError> {
    if payload.msg.len() > CCM_MAX_PAYLOAD {
        return Err(CryptoError::PayloadTooLarge { max: CCM_MAX_PAYLOAD });
    }
    let cipher = new_ccm::<M>(key)?;
    cipher
        .encrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|_| CryptoError::PayloadTooLarge { max: CCM_MAX_PAYLOAD })
}

fn open<M: TagSize + aes::cipher::ArrayLength<u8>>(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, CryptoError> {
    let cipher = new_ccm::<M>(key)?;
    cipher
        .decrypt(GenericArray::from_slice(nonce), payload)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

fn new_ccm<M: TagSize + aes::cipher::ArrayLength<u8>>(
    key: &[u8],
) -> Result<Ccm<Aes128, M, U13>, CryptoError> {
    Ccm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: KEY_LEN,
        actual: key.len(),
    })
}
