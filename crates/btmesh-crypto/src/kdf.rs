//! Mesh key derivation chain: S1, K1, K2, K3, K4
//!
//! Faithful implementation of the Mesh Profile derivation functions
//! (Mesh Profile v1.0, section 3.8.2). Every byte-slicing and truncation
//! step here is load-bearing for interoperability: an off-by-one produces
//! wrong-but-plausible keys whose only symptom is that peers fail to
//! decrypt. The official sample-data vectors in the tests pin each step.
//!
//! Inputs with a length fixed by the profile are typed `[u8; 16]`, which
//! makes the only primitive failure mode (a wrong-size key) unrepresentable;
//! all functions in this module are total and deterministic.

use zeroize::Zeroize;

use crate::primitives::{KEY_LEN, aes_cmac_parts};

const ZERO_KEY: [u8; KEY_LEN] = [0; KEY_LEN];

/// The K2 output triple: NID, EncryptionKey and PrivacyKey.
///
/// The three values are unpacked from a single 33-byte K2 result and are
/// only meaningful together; holding them in one struct is what enforces
/// the "never derived independently" invariant.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkSubKeys {
    /// 7-bit Network Key Identifier (top bit always clear)
    pub nid: u8,
    /// 128-bit network-layer encryption key
    pub encrypt_key: [u8; KEY_LEN],
    /// 128-bit network-layer privacy key
    pub privacy_key: [u8; KEY_LEN],
}

impl Drop for NetworkSubKeys {
    fn drop(&mut self) {
        self.nid.zeroize();
        self.encrypt_key.zeroize();
        self.privacy_key.zeroize();
    }
}

impl core::fmt::Debug for NetworkSubKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NetworkSubKeys")
            .field("nid", &self.nid)
            .field("encrypt_key", &"<secret>")
            .field("privacy_key", &"<secret>")
            .finish()
    }
}

/// S1 salt generation: CMAC under the all-zero key.
///
/// Used to turn the fixed derivation-context labels (`"smk2"`, `"nkik"`,
/// ...) into 16-byte salts.
#[must_use]
pub fn s1(input: &[u8]) -> [u8; KEY_LEN] {
    aes_cmac_parts(&ZERO_KEY, &[input])
}

/// K1 derivation: `cmac(cmac(salt, input), info)`.
#[must_use]
pub fn k1(input: &[u8], salt: &[u8; KEY_LEN], info: &[u8]) -> [u8; KEY_LEN] {
    let t = aes_cmac_parts(salt, &[input]);
    aes_cmac_parts(&t, &[info])
}

/// K2 network-key material derivation.
///
/// Three chained CMAC rounds produce `T1 ‖ T2 ‖ T3` (48 bytes); the last 33
/// bytes unpack as 1 padding bit, the 7-bit NID, the 128-bit EncryptionKey
/// and the 128-bit PrivacyKey. The fields fall on byte boundaries: the NID
/// is the low 7 bits of `T1[15]`, the keys are `T2` and `T3` whole.
#[must_use]
pub fn k2(input: &[u8; KEY_LEN], info: &[u8]) -> NetworkSubKeys {
    let salt = s1(b"smk2");
    let t = aes_cmac_parts(&salt, &[input]);

    let t1 = aes_cmac_parts(&t, &[info, &[0x01]]);
    let t2 = aes_cmac_parts(&t, &[&t1, info, &[0x02]]);
    let t3 = aes_cmac_parts(&t, &[&t2, info, &[0x03]]);

    NetworkSubKeys { nid: t1[15] & 0x7f, encrypt_key: t2, privacy_key: t3 }
}

/// K3 derivation: the 8-byte public Network ID.
#[must_use]
pub fn k3(input: &[u8; KEY_LEN]) -> [u8; 8] {
    let salt = s1(b"smk3");
    let t = aes_cmac_parts(&salt, &[input]);
    let out = aes_cmac_parts(&t, &[b"id64", &[0x01]]);

    let mut id = [0u8; 8];
    id.copy_from_slice(&out[8..]);
    id
}

/// K4 derivation: the 6-bit Application Key Identifier.
///
/// The top 2 bits of the final CMAC byte are padding and discarded.
#[must_use]
pub fn k4(input: &[u8; KEY_LEN]) -> u8 {
    let salt = s1(b"smk4");
    let t = aes_cmac_parts(&salt, &[input]);
    aes_cmac_parts(&t, &[b"id6", &[0x01]])[15] & 0x3f
}
