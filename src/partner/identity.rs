//! Partner identity records and the subset matching rule.
//!
//! A [`PartnerIdentity`] names one trading partnership and carries three
//! independent attribute stores: the sender IDs, the receiver IDs, and
//! free-form partnership configuration (endpoint URL, compression flag, ...).
//!
//! The name is fixed at construction. To give an identity a new name, use
//! [`PartnerIdentity::rebind`], which returns a new record and leaves the
//! original untouched for anyone still holding it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::{AttributeStore, Change};
use crate::error::ValidationError;

use super::ids;

/// Name given to identities created without an explicit name.
pub const DEFAULT_NAME: &str = "auto-created-dummy";

/// Which side of a partnership an identifier set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// The party sending the message.
    Sender,
    /// The party receiving the message.
    Receiver,
}

impl PartyRole {
    const fn store_label(self) -> &'static str {
        match self {
            Self::Sender => "sender IDs",
            Self::Receiver => "receiver IDs",
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sender => write!(f, "sender"),
            Self::Receiver => write!(f, "receiver"),
        }
    }
}

fn relabel(store: &'static str) -> impl Fn(ValidationError) -> ValidationError {
    move |err| match err {
        ValidationError::EmptyKey { .. } => ValidationError::EmptyKey { store },
        other => other,
    }
}

/// One trading partner's identifiers and partnership configuration.
///
/// # Examples
///
/// ```
/// use as2_partnership::PartnerIdentity;
///
/// let mut template = PartnerIdentity::new("acme-to-globex").unwrap();
/// template.set_sender_as2_id(Some("ACME"));
/// template.set_receiver_as2_id(Some("GLOBEX"));
///
/// let mut message = PartnerIdentity::default();
/// message.set_sender_as2_id(Some("ACME"));
/// message.set_sender_email(Some("edi@acme.example"));
/// message.set_receiver_as2_id(Some("GLOBEX"));
///
/// assert!(template.matches(&message));
/// assert!(!message.matches(&template));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct PartnerIdentity {
    name: String,
    sender_ids: AttributeStore,
    receiver_ids: AttributeStore,
    attributes: AttributeStore,
}

#[derive(Deserialize)]
struct RawIdentity {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    sender_ids: AttributeStore,
    #[serde(default)]
    receiver_ids: AttributeStore,
    #[serde(default)]
    attributes: AttributeStore,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl TryFrom<RawIdentity> for PartnerIdentity {
    type Error = ValidationError;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        let mut identity = Self::new(raw.name)?;
        identity.sender_ids = raw.sender_ids;
        identity.receiver_ids = raw.receiver_ids;
        identity.attributes = raw.attributes;
        Ok(identity)
    }
}

impl Default for PartnerIdentity {
    fn default() -> Self {
        Self {
            name: default_name(),
            sender_ids: AttributeStore::new(),
            receiver_ids: AttributeStore::new(),
            attributes: AttributeStore::new(),
        }
    }
}

impl PartnerIdentity {
    /// Creates an identity with the given name and no attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(Self {
            name,
            ..Self::default()
        })
    }

    /// Returns a copy of this identity under a different name.
    ///
    /// All attribute stores are copied; the returned record shares nothing
    /// with `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is empty.
    pub fn rebind(&self, name: impl Into<String>) -> Result<Self, ValidationError> {
        let mut rebound = Self::new(name)?;
        rebound.sender_ids = self.sender_ids.clone();
        rebound.receiver_ids = self.receiver_ids.clone();
        rebound.attributes = self.attributes.clone();
        Ok(rebound)
    }

    /// The partnership name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only view of the identifiers for `role`.
    #[must_use]
    pub const fn ids(&self, role: PartyRole) -> &AttributeStore {
        match role {
            PartyRole::Sender => &self.sender_ids,
            PartyRole::Receiver => &self.receiver_ids,
        }
    }

    fn ids_mut(&mut self, role: PartyRole) -> &mut AttributeStore {
        match role {
            PartyRole::Sender => &mut self.sender_ids,
            PartyRole::Receiver => &mut self.receiver_ids,
        }
    }

    /// Sets an identifier for `role`; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if `key` is empty.
    pub fn set_id<V: Into<String>>(
        &mut self,
        role: PartyRole,
        key: &str,
        value: Option<V>,
    ) -> Result<Change, ValidationError> {
        self.ids_mut(role)
            .set(key, value)
            .map_err(relabel(role.store_label()))
    }

    /// Returns the identifier `key` for `role`.
    #[must_use]
    pub fn id(&self, role: PartyRole, key: &str) -> Option<&str> {
        self.ids(role).get(key)
    }

    /// Returns true if `role` has an identifier named `key`.
    #[must_use]
    pub fn contains_id(&self, role: PartyRole, key: &str) -> bool {
        self.ids(role).contains(key)
    }

    /// Merges identifiers into `role`. Existing keys not listed are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if any key is empty.
    pub fn add_ids<I, K, V>(&mut self, role: PartyRole, entries: I) -> Result<Change, ValidationError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.ids_mut(role)
            .add_all(entries)
            .map_err(relabel(role.store_label()))
    }

    /// Returns an independent copy of the identifiers for `role`.
    #[must_use]
    pub fn all_ids(&self, role: PartyRole) -> AttributeStore {
        self.ids(role).get_all()
    }

    fn set_known<V: Into<String>>(&mut self, role: PartyRole, key: &'static str, value: Option<V>) -> Change {
        self.ids_mut(role).apply(key, value.map(Into::into))
    }

    // Sender side

    /// Read-only view of the sender IDs.
    #[must_use]
    pub const fn sender_ids(&self) -> &AttributeStore {
        &self.sender_ids
    }

    /// Sets an arbitrary sender ID; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if `key` is empty.
    pub fn set_sender_id<V: Into<String>>(&mut self, key: &str, value: Option<V>) -> Result<Change, ValidationError> {
        self.set_id(PartyRole::Sender, key, value)
    }

    /// Returns an arbitrary sender ID.
    #[must_use]
    pub fn sender_id(&self, key: &str) -> Option<&str> {
        self.id(PartyRole::Sender, key)
    }

    /// Returns true if the sender ID `key` is present.
    #[must_use]
    pub fn contains_sender_id(&self, key: &str) -> bool {
        self.contains_id(PartyRole::Sender, key)
    }

    /// Merges sender IDs. Existing IDs not listed are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if any key is empty.
    pub fn add_sender_ids<I, K, V>(&mut self, entries: I) -> Result<Change, ValidationError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_ids(PartyRole::Sender, entries)
    }

    /// Returns an independent copy of all sender IDs.
    #[must_use]
    pub fn all_sender_ids(&self) -> AttributeStore {
        self.all_ids(PartyRole::Sender)
    }

    /// Sets the sender's AS2 ID.
    pub fn set_sender_as2_id<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Sender, ids::AS2_ID, value)
    }

    /// The sender's AS2 ID.
    #[must_use]
    pub fn sender_as2_id(&self) -> Option<&str> {
        self.sender_id(ids::AS2_ID)
    }

    /// Returns true if the sender's AS2 ID is set.
    #[must_use]
    pub fn contains_sender_as2_id(&self) -> bool {
        self.contains_sender_id(ids::AS2_ID)
    }

    /// Sets the sender's certificate alias.
    pub fn set_sender_x509_alias<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Sender, ids::X509_ALIAS, value)
    }

    /// The sender's certificate alias.
    #[must_use]
    pub fn sender_x509_alias(&self) -> Option<&str> {
        self.sender_id(ids::X509_ALIAS)
    }

    /// Returns true if the sender's certificate alias is set.
    #[must_use]
    pub fn contains_sender_x509_alias(&self) -> bool {
        self.contains_sender_id(ids::X509_ALIAS)
    }

    /// Sets the sender's email address.
    pub fn set_sender_email<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Sender, ids::EMAIL, value)
    }

    /// The sender's email address.
    #[must_use]
    pub fn sender_email(&self) -> Option<&str> {
        self.sender_id(ids::EMAIL)
    }

    /// Returns true if the sender's email address is set.
    #[must_use]
    pub fn contains_sender_email(&self) -> bool {
        self.contains_sender_id(ids::EMAIL)
    }

    // Receiver side

    /// Read-only view of the receiver IDs.
    #[must_use]
    pub const fn receiver_ids(&self) -> &AttributeStore {
        &self.receiver_ids
    }

    /// Sets an arbitrary receiver ID; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if `key` is empty.
    pub fn set_receiver_id<V: Into<String>>(&mut self, key: &str, value: Option<V>) -> Result<Change, ValidationError> {
        self.set_id(PartyRole::Receiver, key, value)
    }

    /// Returns an arbitrary receiver ID.
    #[must_use]
    pub fn receiver_id(&self, key: &str) -> Option<&str> {
        self.id(PartyRole::Receiver, key)
    }

    /// Returns true if the receiver ID `key` is present.
    #[must_use]
    pub fn contains_receiver_id(&self, key: &str) -> bool {
        self.contains_id(PartyRole::Receiver, key)
    }

    /// Merges receiver IDs. Existing IDs not listed are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if any key is empty.
    pub fn add_receiver_ids<I, K, V>(&mut self, entries: I) -> Result<Change, ValidationError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_ids(PartyRole::Receiver, entries)
    }

    /// Returns an independent copy of all receiver IDs.
    #[must_use]
    pub fn all_receiver_ids(&self) -> AttributeStore {
        self.all_ids(PartyRole::Receiver)
    }

    /// Sets the receiver's AS2 ID.
    pub fn set_receiver_as2_id<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Receiver, ids::AS2_ID, value)
    }

    /// The receiver's AS2 ID.
    #[must_use]
    pub fn receiver_as2_id(&self) -> Option<&str> {
        self.receiver_id(ids::AS2_ID)
    }

    /// Returns true if the receiver's AS2 ID is set.
    #[must_use]
    pub fn contains_receiver_as2_id(&self) -> bool {
        self.contains_receiver_id(ids::AS2_ID)
    }

    /// Sets the receiver's certificate alias.
    pub fn set_receiver_x509_alias<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Receiver, ids::X509_ALIAS, value)
    }

    /// The receiver's certificate alias.
    #[must_use]
    pub fn receiver_x509_alias(&self) -> Option<&str> {
        self.receiver_id(ids::X509_ALIAS)
    }

    /// Returns true if the receiver's certificate alias is set.
    #[must_use]
    pub fn contains_receiver_x509_alias(&self) -> bool {
        self.contains_receiver_id(ids::X509_ALIAS)
    }

    /// Sets the receiver's email address.
    pub fn set_receiver_email<V: Into<String>>(&mut self, value: Option<V>) -> Change {
        self.set_known(PartyRole::Receiver, ids::EMAIL, value)
    }

    /// The receiver's email address.
    #[must_use]
    pub fn receiver_email(&self) -> Option<&str> {
        self.receiver_id(ids::EMAIL)
    }

    /// Returns true if the receiver's email address is set.
    #[must_use]
    pub fn contains_receiver_email(&self) -> bool {
        self.contains_receiver_id(ids::EMAIL)
    }

    // Partnership configuration

    /// Read-only view of the partnership attributes.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    /// Sets a partnership attribute; `None` removes it.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if `key` is empty.
    pub fn set_attribute<V: Into<String>>(&mut self, key: &str, value: Option<V>) -> Result<Change, ValidationError> {
        self.attributes
            .set(key, value)
            .map_err(relabel("partnership attributes"))
    }

    /// Returns a partnership attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    /// Returns a partnership attribute, or `default` if it is absent.
    #[must_use]
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attributes.get_or(key, default)
    }

    /// Returns true if the partnership attribute `key` is present.
    #[must_use]
    pub fn contains_attribute(&self, key: &str) -> bool {
        self.attributes.contains(key)
    }

    /// Returns an independent copy of all partnership attributes.
    #[must_use]
    pub fn all_attributes(&self) -> AttributeStore {
        self.attributes.get_all()
    }

    /// Merges partnership attributes. Existing keys not listed are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyKey`] if any key is empty.
    pub fn add_attributes<I, K, V>(&mut self, entries: I) -> Result<Change, ValidationError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes
            .add_all(entries)
            .map_err(relabel("partnership attributes"))
    }

    /// Returns true if this identity's sender and receiver IDs are both
    /// contained, with identical values, in `candidate`'s.
    ///
    /// The relation is one-directional: `candidate` may carry extra IDs. An
    /// identity with no sender IDs or no receiver IDs never matches anything,
    /// itself included. Partnership attributes and names are not compared.
    #[must_use]
    pub fn matches(&self, candidate: &Self) -> bool {
        self.sender_ids.is_subset_of(&candidate.sender_ids)
            && self.receiver_ids.is_subset_of(&candidate.receiver_ids)
    }

    /// Overwrites the name and all three stores with copies of `other`'s.
    ///
    /// This is a full replacement, not a merge.
    pub fn copy_from(&mut self, other: &Self) -> Change {
        let mut change = Change::from(self.name != other.name);
        self.name.clone_from(&other.name);
        change = change.or(self.sender_ids.replace_with(&other.sender_ids));
        change = change.or(self.receiver_ids.replace_with(&other.receiver_ids));
        change.or(self.attributes.replace_with(&other.attributes))
    }
}

impl fmt::Display for PartnerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "partnership '{}' [senderIDs={}, receiverIDs={}, attributes={}]",
            self.name, self.sender_ids, self.receiver_ids, self.attributes
        )
    }
}
