//! Bluetooth Mesh Cryptographic Core
//!
//! Key hierarchy and key derivation functions used to bootstrap and operate
//! a Bluetooth Mesh network. Pure functions with deterministic outputs; no
//! I/O, no global state.
//!
//! # Key Lifecycle
//!
//! Each mesh key kind wraps a 16-byte root secret and derives its working
//! sub-keys through the standardized S1/K1/K2/K3/K4 CMAC chain. Derivation
//! is lazy: the first access to a derived attribute runs the chain once and
//! the result is cached for the lifetime of the key object.
//!
//! ```text
//! Root Secret (16 bytes)
//!        │
//!        ├── K2 ──► NID ‖ EncryptionKey ‖ PrivacyKey   (NetworkKey)
//!        ├── K3 ──► Network ID (8 bytes)                (NetworkKey)
//!        ├── K1 ──► IdentityKey / BeaconKey             (NetworkKey)
//!        ├── K4 ──► AID (6 bits)                        (ApplicationKey)
//!        └── raw ─► CCM key for device transport        (DeviceKey)
//! ```
//!
//! Key refresh is out of scope: callers construct a new key object with a
//! new root secret instead of mutating an existing one.
//!
//! # Security
//!
//! Interoperability:
//! - The KDF chain reproduces the Mesh Profile byte layout exactly,
//!   including the K2 padding-bit unpack and the K3/K4 truncation rules
//! - A wrong-but-plausible key is silent: decryption just fails on the
//!   other side, so the derivation steps are pinned by the official
//!   sample-data vectors in the test suite
//!
//! Key material hygiene:
//! - Root secrets are zeroized on drop and redacted from `Debug` output
//! - NID, EncryptionKey and PrivacyKey always originate from a single K2
//!   invocation; no code path derives one without the others
//! - CCM decryption is all-or-nothing; a tag mismatch releases no plaintext
//!
//! Caller obligations:
//! - Sequence numbers fed to the network-nonce hook must never repeat under
//!   a given key and IV index; a repeat is a security failure, not a bug

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod kdf;
pub mod keys;
pub mod primitives;

pub use error::CryptoError;
pub use kdf::{NetworkSubKeys, k1, k2, k3, k4, s1};
pub use keys::{ApplicationKey, DeviceKey, KeyMetadata, NetworkKey, RootKey, RootKeyHolder};
pub use primitives::{BLOCK_LEN, KEY_LEN, NONCE_LEN, aes_cmac, ccm_decrypt, ccm_encrypt, ecb_encrypt};
