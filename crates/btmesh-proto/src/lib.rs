//! Wire-facing value types for Bluetooth Mesh scanning
//!
//! Currently the 6-byte [`Address`] identifier with its tolerant textual
//! parsing. Parsing is deliberately permissive in outcome, not in format:
//! a malformed input yields an absent result instead of an error, so that
//! sniffing loops can skip garbage without aborting.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod address;

pub use address::{ADDR_LEN, Address};
