//! Outgoing transmission dumps.
//!
//! A transport reports exactly what it puts on the wire to an
//! [`OutgoingDumper`]: every header in wire order, then every payload byte,
//! with explicit checkpoints in between. Dumping is diagnostic only and must
//! never affect delivery, so the header and payload calls have no error
//! channel. A dumper that cannot record something absorbs the failure itself.
//!
//! Transports should drive dumpers through a [`DumpSession`], which enforces
//! the call order, contains observer panics, and guarantees `close` runs
//! exactly once on every exit path.

/// Per-transmission file dumps.
pub mod factory;
/// Event-recording dumper.
pub mod recording;
/// Transport-side driver.
pub mod session;
/// `std::io::Write` bridge.
pub mod stream;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

pub use factory::{DirectoryDumperFactory, DumperFactory};
pub use recording::{DumpEvent, RecordingDumper};
pub use session::DumpSession;
pub use stream::StreamDumper;

/// Observer for one outgoing transmission.
///
/// Call order, driven by the transport:
/// `dump_header*`, `finished_headers`, `dump_payload*`, `finished_payload`,
/// `close`. `close` is called exactly once, also when the send fails midway.
pub trait OutgoingDumper {
    /// Called once per outgoing header, in wire order.
    fn dump_header(&mut self, name: &str, value: &str);

    /// Called once after the last header.
    fn finished_headers(&mut self) {}

    /// Called once per payload byte, in transmission order.
    ///
    /// There is deliberately no way to report an error from here.
    fn dump_payload(&mut self, byte: u8);

    /// Reports a run of payload bytes. Defaults to one
    /// [`dump_payload`](Self::dump_payload) call per byte.
    fn dump_payload_chunk(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.dump_payload(byte);
        }
    }

    /// Called once after the last payload byte.
    fn finished_payload(&mut self) {}

    /// Releases the dump sink.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Teardown`] if the sink could not be released.
    /// This is not a transmission failure.
    fn close(&mut self) -> Result<(), DumpError> {
        Ok(())
    }
}

/// A dumper that discards everything.
///
/// Used when dumping is disabled, and as the fallback once an observer has
/// failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDumper;

impl OutgoingDumper for NoopDumper {
    fn dump_header(&mut self, _name: &str, _value: &str) {}

    fn dump_payload(&mut self, _byte: u8) {}

    fn dump_payload_chunk(&mut self, _bytes: &[u8]) {}
}

/// Lifecycle of one dump. Phases only move forward.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpPhase {
    Created,
    DumpingHeaders,
    HeadersFinished,
    DumpingPayload,
    PayloadFinished,
    Closed,
}

impl DumpPhase {
    /// Returns true if a dump in this phase may move to `next`.
    ///
    /// Header and payload phases may repeat; the `HeadersFinished`
    /// checkpoint cannot be skipped on the way to the payload, and
    /// `PayloadFinished` cannot be reached without it. `Closed` is reachable
    /// from every phase except itself.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        use DumpPhase::{Closed, Created, DumpingHeaders, DumpingPayload, HeadersFinished, PayloadFinished};
        match (self, next) {
            (Closed, _) => false,
            (_, Closed) => true,
            (Created | DumpingHeaders, DumpingHeaders | HeadersFinished) => true,
            (HeadersFinished | DumpingPayload, DumpingPayload | PayloadFinished) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DumpPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::DumpingHeaders => "dumping_headers",
            Self::HeadersFinished => "headers_finished",
            Self::DumpingPayload => "dumping_payload",
            Self::PayloadFinished => "payload_finished",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}
