//! Well-known sender and receiver identifier keys.
//!
//! These keys get dedicated accessors on [`PartnerIdentity`](super::PartnerIdentity)
//! but are otherwise ordinary attribute entries.

/// The AS2 protocol identifier of a party.
pub const AS2_ID: &str = "as2_id";

/// The alias of a party's X.509 certificate in the key store.
pub const X509_ALIAS: &str = "x509_alias";

/// The email address of a party.
pub const EMAIL: &str = "email";
