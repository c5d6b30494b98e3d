//! In-memory partner directory.
//!
//! The directory keeps registered identities in registration order and
//! resolves a message's identity against them with
//! [`PartnerIdentity::matches`]. Where the partnerships come from (files, a
//! database) is up to the caller.

use tracing::trace;

use crate::error::DirectoryError;

use super::identity::{PartnerIdentity, PartyRole};

/// Registration-ordered collection of partner identities, unique by name.
#[derive(Debug, Clone, Default)]
pub struct PartnerDirectory {
    entries: Vec<PartnerIdentity>,
}

impl PartnerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates registered identities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PartnerIdentity> + '_ {
        self.entries.iter()
    }

    /// Registers an identity.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateName`] if an identity with the same
    /// name is already registered.
    pub fn insert(&mut self, identity: PartnerIdentity) -> Result<(), DirectoryError> {
        if self.get(identity.name()).is_some() {
            return Err(DirectoryError::DuplicateName {
                name: identity.name().to_string(),
            });
        }
        self.entries.push(identity);
        Ok(())
    }

    /// Looks up an identity by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PartnerIdentity> {
        self.entries.iter().find(|p| p.name() == name)
    }

    /// Removes and returns the identity registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<PartnerIdentity> {
        let idx = self.entries.iter().position(|p| p.name() == name)?;
        Some(self.entries.remove(idx))
    }

    /// Returns every registered identity whose sender and receiver IDs are
    /// contained in `probe`'s, in registration order.
    #[must_use]
    pub fn find_matching(&self, probe: &PartnerIdentity) -> Vec<&PartnerIdentity> {
        self.entries.iter().filter(|entry| entry.matches(probe)).collect()
    }

    /// Resolves `probe` to the first registered identity that matches it.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NoMatch`] when no registered identity
    /// matches.
    pub fn resolve(&self, probe: &PartnerIdentity) -> Result<&PartnerIdentity, DirectoryError> {
        let found = self.entries.iter().find(|entry| entry.matches(probe));
        match found {
            Some(entry) => {
                trace!(partnership = entry.name(), "resolved partnership");
                Ok(entry)
            }
            None => {
                trace!(probe = %probe, "no partnership matched");
                Err(DirectoryError::NoMatch {
                    sender: probe.ids(PartyRole::Sender).to_string(),
                    receiver: probe.ids(PartyRole::Receiver).to_string(),
                })
            }
        }
    }
}
