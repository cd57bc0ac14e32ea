//! Fixed 6-byte device address with canonical textual forms

use std::fmt;
use std::fmt::Write as _;

/// Address length in bytes
pub const ADDR_LEN: usize = 6;

/// A 6-byte device address.
///
/// Equality, ordering and hashing are byte-wise, so addresses work as map
/// keys. The textual form is lowercase hex pairs joined by a separator
/// (`:` by default).
///
/// Construction from text or bytes never produces a partial value: anything
/// that is not one of the three accepted shapes yields `None`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDR_LEN]);

impl Address {
    /// Wrap exactly 6 raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDR_LEN]) -> Self {
        Self(bytes)
    }

    /// Construct from a byte slice; any length other than 6 yields `None`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let raw: [u8; ADDR_LEN] = bytes.try_into().ok()?;
        Some(Self(raw))
    }

    /// Parse one of the three accepted textual forms, first match wins:
    ///
    /// 1. `XX:XX:XX:XX:XX:XX`
    /// 2. `XX-XX-XX-XX-XX-XX`
    /// 3. `XXXXXXXXXXXX` (12 contiguous hex digits)
    ///
    /// Hex digits are case-insensitive. Mixed separators and every other
    /// shape yield `None`. Single pass, no backtracking: the input length
    /// selects the candidate form and the separator byte must then be
    /// uniform.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        let mut digits = [0u8; ADDR_LEN * 2];

        match bytes.len() {
            // Separated form: "XX" pairs at stride 3
            17 => {
                let sep = bytes[2];
                if sep != b':' && sep != b'-' {
                    return None;
                }
                for (i, chunk) in bytes.chunks(3).enumerate() {
                    if chunk.len() == 3 && chunk[2] != sep {
                        return None;
                    }
                    digits[i * 2] = chunk[0];
                    digits[i * 2 + 1] = chunk[1];
                }
            }
            12 => digits.copy_from_slice(bytes),
            _ => return None,
        }

        let mut raw = [0u8; ADDR_LEN];
        hex::decode_to_slice(digits, &mut raw).ok()?;
        Some(Self(raw))
    }

    /// The raw 6 bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDR_LEN] {
        &self.0
    }

    /// Format as lowercase hex pairs joined by `sep`.
    #[must_use]
    pub fn format_with(&self, sep: char) -> String {
        let mut out = String::with_capacity(ADDR_LEN * 3);
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(sep);
            }
            // Writing to a String cannot fail
            let _ = write!(out, "{byte:02x}");
        }
        out
    }
}

impl From<[u8; ADDR_LEN]> for Address {
    fn from(bytes: [u8; ADDR_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}
