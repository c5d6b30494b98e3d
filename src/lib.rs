//! # as2-partnership - Trading-partner identities and outgoing dumps
//!
//! Two independent building blocks for an AS2 message-exchange engine:
//!
//! - **Partner identity**: a named record of sender IDs, receiver IDs, and
//!   partnership configuration, with the subset rule used to pick the
//!   partnership that applies to a message.
//! - **Outgoing dump**: an observer contract a transport drives while it
//!   writes a request, reporting headers and payload bytes without ever being
//!   able to fail the transmission.
//!
//! ## Usage
//!
//! ```rust
//! use as2_partnership::{PartnerDirectory, PartnerIdentity};
//!
//! let mut acme = PartnerIdentity::new("acme-to-globex")?;
//! acme.set_sender_as2_id(Some("ACME"));
//! acme.set_receiver_as2_id(Some("GLOBEX"));
//! acme.set_attribute("as2_url", Some("https://globex.example/as2"))?;
//!
//! let mut directory = PartnerDirectory::new();
//! directory.insert(acme)?;
//!
//! let mut incoming = PartnerIdentity::default();
//! incoming.set_sender_as2_id(Some("ACME"));
//! incoming.set_receiver_as2_id(Some("GLOBEX"));
//!
//! let partnership = directory.resolve(&incoming)?;
//! assert_eq!(partnership.attribute("as2_url"), Some("https://globex.example/as2"));
//! # Ok::<(), as2_partnership::PartnershipError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attributes;
pub mod config;
pub mod dump;
pub mod error;
pub mod partner;

// Re-export primary types at crate root for convenience
pub use attributes::{AttributeStore, Change};
pub use config::DumpConfig;
pub use dump::{
    DirectoryDumperFactory, DumpEvent, DumpPhase, DumpSession, DumperFactory, NoopDumper,
    OutgoingDumper, RecordingDumper, StreamDumper,
};
pub use error::{DirectoryError, DumpError, PartnershipError, PartnershipResult, ValidationError};
pub use partner::{ids, PartnerDirectory, PartnerIdentity, PartyRole, DEFAULT_NAME};
