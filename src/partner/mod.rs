//! Trading-partner identities.
//!
//! This module groups the identity record, the well-known identifier keys,
//! and an in-memory directory that resolves identities by subset matching.

pub mod directory;
pub mod identity;
pub mod ids;

pub use directory::PartnerDirectory;
pub use identity::{PartnerIdentity, PartyRole, DEFAULT_NAME};
