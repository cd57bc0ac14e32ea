//! Workspace root stub.
//!
//! Exists so the root package can carry the `cargo-husky` git-hook
//! dev-dependency; all functionality lives in the `crates/` members.
