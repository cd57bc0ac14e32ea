//! Mesh key hierarchy: network, application and device keys
//!
//! Each key kind wraps an immutable 16-byte root secret plus informational
//! metadata and lazily derives its working sub-keys through the KDF chain.
//! Derived attributes are computed at most once per instance and cached;
//! memoization is a correctness requirement here, not an optimization:
//! the chain is deterministic and the cached triple from K2 is what keeps
//! NID, EncryptionKey and PrivacyKey mutually consistent.
//!
//! Key objects are built once during provisioning and then only read, so
//! every derived field sits behind a `OnceLock`: concurrent first accesses
//! synchronize on the lock and observe a single cached value.

use std::fmt;
use std::sync::OnceLock;

use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::kdf::{NetworkSubKeys, k1, k2, k3, k4, s1};
use crate::primitives::{KEY_LEN, NONCE_LEN};

/// K1 info label shared by the identity- and beacon-key derivations
const ID128: &[u8] = b"id128\x01";

/// An opaque 16-byte root secret.
///
/// Set exactly once at construction, never mutated, zeroized on drop and
/// redacted from `Debug` output. Ownership is exclusive to the key object
/// that wraps it; `RootKey` is deliberately not `Clone`.
pub struct RootKey([u8; KEY_LEN]);

impl RootKey {
    /// Wrap raw root key bytes of any length, rejecting all but 16.
    ///
    /// # Errors
    ///
    /// `InvalidKeyLength` unless `bytes` is exactly 16 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_LEN, actual: bytes.len() })?;
        Ok(Self(raw))
    }

    /// Parse a root key from a case-insensitive hex string.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyEncoding` on odd length or non-hex characters
    /// - `InvalidKeyLength` if the decoded key is not 16 bytes
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s)
            .map_err(|err| CryptoError::InvalidKeyEncoding { reason: err.to_string() })?;
        Self::from_bytes(&bytes)
    }

    /// Raw key bytes, for collaborators that feed them to CCM directly.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for RootKey {
    fn from(raw: [u8; KEY_LEN]) -> Self {
        Self(raw)
    }
}

impl Drop for RootKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RootKey").field(&"<secret>").finish()
    }
}

/// Informational metadata carried alongside a root key.
///
/// None of these fields participate in derivation; they are passed through
/// unchanged for collaborators (the IV index feeds nonce construction in
/// the transport layer, tag and node id are operator bookkeeping).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMetadata {
    /// 32-bit IV index, assigned and advanced externally
    pub iv_index: u32,
    /// Free-text label for operator tooling
    pub tag: String,
    /// Unicast address of the owning node, when known
    pub node_id: Option<u16>,
}

impl KeyMetadata {
    /// Metadata with the given IV index and defaults elsewhere.
    #[must_use]
    pub fn with_iv_index(iv_index: u32) -> Self {
        Self { iv_index, ..Self::default() }
    }
}

/// Shared capability of the three key kinds: a root secret plus metadata.
pub trait RootKeyHolder {
    /// The wrapped root secret.
    fn root_key(&self) -> &RootKey;

    /// The informational metadata supplied at construction.
    fn metadata(&self) -> &KeyMetadata;

    /// Convenience accessor for the human-readable tag.
    fn tag(&self) -> &str {
        &self.metadata().tag
    }
}

/// A mesh network key and its derived network-layer material.
///
/// All derived attributes are memoized per instance. NID, EncryptionKey and
/// PrivacyKey come from one K2 invocation and are cached as a unit.
pub struct NetworkKey {
    root: RootKey,
    meta: KeyMetadata,
    sub_keys: OnceLock<NetworkSubKeys>,
    network_id: OnceLock<[u8; 8]>,
    identity_key: OnceLock<[u8; KEY_LEN]>,
    beacon_key: OnceLock<[u8; KEY_LEN]>,
}

impl NetworkKey {
    /// Construct from a root key with default metadata.
    #[must_use]
    pub fn new(root: RootKey) -> Self {
        Self::with_metadata(root, KeyMetadata::default())
    }

    /// Construct from a root key with explicit metadata.
    #[must_use]
    pub fn with_metadata(root: RootKey, meta: KeyMetadata) -> Self {
        Self {
            root,
            meta,
            sub_keys: OnceLock::new(),
            network_id: OnceLock::new(),
            identity_key: OnceLock::new(),
            beacon_key: OnceLock::new(),
        }
    }

    /// Construct from a hex-encoded root key with default metadata.
    ///
    /// # Errors
    ///
    /// See [`RootKey::from_hex`].
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(RootKey::from_hex(s)?))
    }

    /// Construct from a hex-encoded root key with explicit metadata.
    ///
    /// # Errors
    ///
    /// See [`RootKey::from_hex`].
    pub fn from_hex_with_metadata(s: &str, meta: KeyMetadata) -> Result<Self, CryptoError> {
        Ok(Self::with_metadata(RootKey::from_hex(s)?, meta))
    }

    /// The cached K2 triple; sole derivation path for the three sub-keys.
    fn sub_keys(&self) -> &NetworkSubKeys {
        self.sub_keys.get_or_init(|| k2(self.root.as_bytes(), &[0x00]))
    }

    /// 7-bit Network Key Identifier, matched against observed packets.
    pub fn nid(&self) -> u8 {
        self.sub_keys().nid
    }

    /// Network-layer encryption key.
    pub fn encrypt_key(&self) -> &[u8; KEY_LEN] {
        &self.sub_keys().encrypt_key
    }

    /// Network-layer privacy key, used for header obfuscation.
    pub fn privacy_key(&self) -> &[u8; KEY_LEN] {
        &self.sub_keys().privacy_key
    }

    /// 8-byte public Network ID (K3).
    pub fn network_id(&self) -> &[u8; 8] {
        self.network_id.get_or_init(|| k3(self.root.as_bytes()))
    }

    /// Node Identity key (K1 under the `nkik` salt).
    pub fn identity_key(&self) -> &[u8; KEY_LEN] {
        self.identity_key.get_or_init(|| k1(self.root.as_bytes(), &s1(b"nkik"), ID128))
    }

    /// Secure Network Beacon key (K1 under the `nkbk` salt).
    pub fn beacon_key(&self) -> &[u8; KEY_LEN] {
        self.beacon_key.get_or_init(|| k1(self.root.as_bytes(), &s1(b"nkbk"), ID128))
    }

    /// IV index this key currently operates under.
    pub fn iv_index(&self) -> u32 {
        self.meta.iv_index
    }

    /// Build the 13-byte CCM network nonce for an outgoing or observed PDU
    /// (Mesh Profile v1.0, section 3.8.5.1).
    ///
    /// Layout:
    /// - byte 0: nonce type `0x00` (network)
    /// - byte 1: CTL bit and TTL field as transmitted
    /// - bytes 2-4: 24-bit sequence number (big endian; upper bits of `seq`
    ///   are masked off)
    /// - bytes 5-6: source address (big endian)
    /// - bytes 7-8: zero padding
    /// - bytes 9-12: this key's IV index (big endian)
    ///
    /// The transport layer owns sequence-number assignment. A (`seq`,
    /// IV index) pair must never be reused under the same key: nonce reuse
    /// under CCM forfeits confidentiality and authenticity, so a repeat is
    /// a security failure on the caller's side, not a recoverable error.
    #[must_use]
    pub fn network_nonce(&self, ctl_ttl: u8, seq: u32, src: u16) -> [u8; NONCE_LEN] {
        let mut nonce = [0u8; NONCE_LEN];
        nonce[0] = 0x00;
        nonce[1] = ctl_ttl;
        nonce[2..5].copy_from_slice(&(seq & 0x00ff_ffff).to_be_bytes()[1..]);
        nonce[5..7].copy_from_slice(&src.to_be_bytes());
        // bytes 7-8 stay zero
        nonce[9..13].copy_from_slice(&self.meta.iv_index.to_be_bytes());
        nonce
    }
}

impl RootKeyHolder for NetworkKey {
    fn root_key(&self) -> &RootKey {
        &self.root
    }

    fn metadata(&self) -> &KeyMetadata {
        &self.meta
    }
}

impl fmt::Debug for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkKey")
            .field("tag", &self.meta.tag)
            .field("iv_index", &self.meta.iv_index)
            .finish_non_exhaustive()
    }
}

/// A mesh application key; derives the 6-bit AID used to shortlist
/// candidate keys for an observed access payload.
pub struct ApplicationKey {
    root: RootKey,
    meta: KeyMetadata,
    aid: OnceLock<u8>,
}

impl ApplicationKey {
    /// Construct from a root key with default metadata.
    #[must_use]
    pub fn new(root: RootKey) -> Self {
        Self::with_metadata(root, KeyMetadata::default())
    }

    /// Construct from a root key with explicit metadata.
    #[must_use]
    pub fn with_metadata(root: RootKey, meta: KeyMetadata) -> Self {
        Self { root, meta, aid: OnceLock::new() }
    }

    /// Construct from a hex-encoded root key with default metadata.
    ///
    /// # Errors
    ///
    /// See [`RootKey::from_hex`].
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(RootKey::from_hex(s)?))
    }

    /// Construct from a hex-encoded root key with explicit metadata.
    ///
    /// # Errors
    ///
    /// See [`RootKey::from_hex`].
    pub fn from_hex_with_metadata(s: &str, meta: KeyMetadata) -> Result<Self, CryptoError> {
        Ok(Self::with_metadata(RootKey::from_hex(s)?, meta))
    }

    /// 6-bit Application Key Identifier (K4), memoized per instance.
    pub fn aid(&self) -> u8 {
        *self.aid.get_or_init(|| k4(self.root.as_bytes()))
    }

    /// Raw key bytes; collaborators use them as the CCM key for access
    /// payloads.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        self.root.as_bytes()
    }
}

impl RootKeyHolder for ApplicationKey {
    fn root_key(&self) -> &RootKey {
        &self.root
    }

    fn metadata(&self) -> &KeyMetadata {
        &self.meta
    }
}

impl fmt::Debug for ApplicationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationKey")
            .field("tag", &self.meta.tag)
            .finish_non_exhaustive()
    }
}

/// A device key: raw CCM key for device-specific transport encryption,
/// no derived attributes.
pub struct DeviceKey {
    root: RootKey,
    meta: KeyMetadata,
}

impl DeviceKey {
    /// Construct from a root key.
    #[must_use]
    pub fn new(root: RootKey) -> Self {
        Self { root, meta: KeyMetadata::default() }
    }

    /// Construct from a hex-encoded root key.
    ///
    /// # Errors
    ///
    /// See [`RootKey::from_hex`].
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        Ok(Self::new(RootKey::from_hex(s)?))
    }

    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_LEN] {
        self.root.as_bytes()
    }
}

impl RootKeyHolder for DeviceKey {
    fn root_key(&self) -> &RootKey {
        &self.root
    }

    fn metadata(&self) -> &KeyMetadata {
        &self.meta
    }
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKey").finish_non_exhaustive()
    }
}

/// Mesh Profile v1.0 sample data, sections 8.2.1-8.2.6.
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_NET_KEY: &str = "7dd7364cd842ad18c17c2b820c84c3d6";
    const SAMPLE_APP_KEY: &str = "63964771734fbd76e3b40519d1d94a48";

    fn hx16(s: &str) -> [u8; 16] {
        let v = hex::decode(s).unwrap();
        v.try_into().unwrap()
    }

    #[test]
    fn network_key_sample_derivations() {
        let key = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();

        assert_eq!(key.nid(), 0x68);
        assert_eq!(key.encrypt_key(), &hx16("0953fa93e7caac9638f58820220a398e"));
        assert_eq!(key.privacy_key(), &hx16("8b84eedec100067d670971dd2aa700cf"));
        assert_eq!(key.network_id().to_vec(), hex::decode("3ecaff672f673370").unwrap());
        assert_eq!(key.identity_key(), &hx16("84396c435ac48560b5965385253e210c"));
        assert_eq!(key.beacon_key(), &hx16("5423d967da639a99cb02231a83f7d254"));
    }

    #[test]
    fn application_key_sample_aid() {
        let key = ApplicationKey::from_hex(SAMPLE_APP_KEY).unwrap();
        assert_eq!(key.aid(), 0x26);
        assert_eq!(key.key(), &hx16(SAMPLE_APP_KEY));
    }

    #[test]
    fn device_key_exposes_raw_bytes_only() {
        let key = DeviceKey::from_hex("9d6dd0e96eb25dc19a40ed9914f8f03f").unwrap();
        assert_eq!(key.key(), &hx16("9d6dd0e96eb25dc19a40ed9914f8f03f"));
    }

    #[test]
    fn hex_case_is_insensitive() {
        let lower = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();
        let upper = NetworkKey::from_hex(&SAMPLE_NET_KEY.to_uppercase()).unwrap();
        assert_eq!(lower.encrypt_key(), upper.encrypt_key());
    }

    #[test]
    fn odd_length_hex_is_rejected() {
        let err = NetworkKey::from_hex("abc").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyEncoding { .. }));
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let err = ApplicationKey::from_hex("zz964771734fbd76e3b40519d1d94a48").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyEncoding { .. }));
    }

    #[test]
    fn short_key_material_is_rejected() {
        let err = RootKey::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength { expected: 16, actual: 3 }));

        // Valid hex but wrong byte count goes through the length check
        let err = NetworkKey::from_hex("7dd7364cd842").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength { expected: 16, actual: 6 }));
    }

    #[test]
    fn repeated_reads_hit_the_cache() {
        let key = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();

        // get_or_init hands back the same allocation on every call
        assert!(std::ptr::eq(key.encrypt_key(), key.encrypt_key()));
        assert!(std::ptr::eq(key.network_id(), key.network_id()));
        assert!(std::ptr::eq(key.identity_key(), key.identity_key()));
        assert_eq!(key.nid(), key.nid());
    }

    #[test]
    fn sub_keys_come_from_one_k2_call() {
        let key = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();

        // Reading the NID first must populate the whole triple
        let _ = key.nid();
        let cached = key.sub_keys.get().unwrap();
        assert_eq!(&cached.encrypt_key, key.encrypt_key());
        assert_eq!(&cached.privacy_key, key.privacy_key());
    }

    #[test]
    fn metadata_passes_through_unchanged() {
        let meta = KeyMetadata {
            iv_index: 0x1234_5678,
            tag: "lab network".to_owned(),
            node_id: Some(0x0004),
        };
        let key = NetworkKey::from_hex_with_metadata(SAMPLE_NET_KEY, meta.clone()).unwrap();

        assert_eq!(key.iv_index(), 0x1234_5678);
        assert_eq!(key.tag(), "lab network");
        assert_eq!(key.metadata(), &meta);

        // Metadata never influences derivation
        let bare = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();
        assert_eq!(key.encrypt_key(), bare.encrypt_key());
    }

    #[test]
    fn network_nonce_layout() {
        let meta = KeyMetadata::with_iv_index(0x1234_5678);
        let key = NetworkKey::from_hex_with_metadata(SAMPLE_NET_KEY, meta).unwrap();

        let nonce = key.network_nonce(0x8b, 0x00_0007, 0x1201);
        assert_eq!(
            nonce,
            [0x00, 0x8b, 0x00, 0x00, 0x07, 0x12, 0x01, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78]
        );
    }

    #[test]
    fn network_nonce_masks_sequence_to_24_bits() {
        let key = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();
        let nonce = key.network_nonce(0x00, 0xff00_0001, 0x0001);
        assert_eq!(&nonce[2..5], &[0x00, 0x00, 0x01]);
    }

    #[test]
    fn debug_redacts_root_secret() {
        let key = NetworkKey::from_hex(SAMPLE_NET_KEY).unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("7dd7364c"));
    }
}
