//! Transport-side driver for an [`OutgoingDumper`].

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::DumpError;

use super::{DumpPhase, NoopDumper, OutgoingDumper};

/// Drives one dumper through one outgoing transmission.
///
/// The session is what keeps a dumper from influencing delivery:
/// - calls that arrive out of order are dropped and logged instead of being
///   forwarded;
/// - a dumper that panics is switched off for the rest of the transmission
///   and replaced by a [`NoopDumper`];
/// - `close` runs exactly once, either through [`DumpSession::close`] or, on
///   any other exit path, when the session is dropped.
///
/// # Examples
///
/// ```
/// use as2_partnership::dump::{DumpEvent, DumpSession, RecordingDumper};
///
/// let mut recorder = RecordingDumper::new();
/// {
///     let mut session = DumpSession::new(&mut recorder);
///     session.header("Content-Type", "text/plain");
///     session.finish_headers();
///     session.payload_chunk(b"Hi");
///     session.finish_payload();
///     session.close().unwrap();
/// }
/// assert_eq!(recorder.events().last(), Some(&DumpEvent::Close));
/// ```
pub struct DumpSession<'a> {
    transmission_id: Uuid,
    phase: DumpPhase,
    dumper: &'a mut (dyn OutgoingDumper + 'a),
    fallback: NoopDumper,
    faulted: bool,
    headers: usize,
    payload_bytes: u64,
}

impl<'a> DumpSession<'a> {
    /// Starts a session for a new transmission.
    pub fn new(dumper: &'a mut (dyn OutgoingDumper + 'a)) -> Self {
        Self::with_transmission_id(Uuid::new_v4(), dumper)
    }

    /// Starts a session for a transmission with a known id.
    pub fn with_transmission_id(transmission_id: Uuid, dumper: &'a mut (dyn OutgoingDumper + 'a)) -> Self {
        debug!(transmission = %transmission_id, "outgoing dump started");
        Self {
            transmission_id,
            phase: DumpPhase::Created,
            dumper,
            fallback: NoopDumper,
            faulted: false,
            headers: 0,
            payload_bytes: 0,
        }
    }

    /// Id used to correlate log lines of this transmission.
    #[must_use]
    pub const fn transmission_id(&self) -> Uuid {
        self.transmission_id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> DumpPhase {
        self.phase
    }

    /// Returns true once the dumper has panicked and been switched off.
    #[must_use]
    pub const fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Reports one outgoing header.
    pub fn header(&mut self, name: &str, value: &str) {
        if self.advance(DumpPhase::DumpingHeaders, "dump_header") {
            self.headers += 1;
            self.observe("dump_header", |d| d.dump_header(name, value));
        }
    }

    /// Marks the end of the headers.
    pub fn finish_headers(&mut self) {
        if self.advance(DumpPhase::HeadersFinished, "finished_headers") {
            self.observe("finished_headers", |d| d.finished_headers());
        }
    }

    /// Reports one payload byte.
    pub fn payload(&mut self, byte: u8) {
        if self.advance(DumpPhase::DumpingPayload, "dump_payload") {
            self.payload_bytes += 1;
            self.observe("dump_payload", |d| d.dump_payload(byte));
        }
    }

    /// Reports a run of payload bytes.
    pub fn payload_chunk(&mut self, bytes: &[u8]) {
        if self.advance(DumpPhase::DumpingPayload, "dump_payload") {
            self.payload_bytes += bytes.len() as u64;
            self.observe("dump_payload", |d| d.dump_payload_chunk(bytes));
        }
    }

    /// Marks the end of the payload.
    pub fn finish_payload(&mut self) {
        if self.advance(DumpPhase::PayloadFinished, "finished_payload") {
            self.observe("finished_payload", |d| d.finished_payload());
        }
    }

    /// Closes the dumper and ends the session.
    ///
    /// # Errors
    ///
    /// Returns the dumper's teardown failure, or
    /// [`DumpError::ObserverPanicked`] if `close` panicked. Neither means the
    /// transmission failed.
    pub fn close(mut self) -> Result<(), DumpError> {
        self.teardown()
    }

    fn advance(&mut self, next: DumpPhase, call: &'static str) -> bool {
        if self.phase.can_advance_to(next) {
            self.phase = next;
            true
        } else {
            warn!(
                transmission = %self.transmission_id,
                phase = %self.phase,
                call,
                "dropping out-of-order dump call"
            );
            false
        }
    }

    fn observe<F>(&mut self, stage: &'static str, call: F)
    where
        F: FnOnce(&mut (dyn OutgoingDumper + 'a)),
    {
        if self.faulted {
            call(&mut self.fallback);
            return;
        }

        let dumper = &mut *self.dumper;
        if panic::catch_unwind(AssertUnwindSafe(|| call(dumper))).is_err() {
            self.faulted = true;
            warn!(
                transmission = %self.transmission_id,
                stage,
                "dump observer panicked; dumping disabled for this transmission"
            );
        }
    }

    fn teardown(&mut self) -> Result<(), DumpError> {
        if self.phase == DumpPhase::Closed {
            return Ok(());
        }
        self.phase = DumpPhase::Closed;

        let dumper = &mut *self.dumper;
        let result = match panic::catch_unwind(AssertUnwindSafe(|| dumper.close())) {
            Ok(result) => result,
            Err(_) => Err(DumpError::ObserverPanicked { stage: "close" }),
        };

        match &result {
            Ok(()) => debug!(
                transmission = %self.transmission_id,
                headers = self.headers,
                payload_bytes = self.payload_bytes,
                faulted = self.faulted,
                "outgoing dump closed"
            ),
            Err(err) => warn!(
                transmission = %self.transmission_id,
                error = %err,
                "outgoing dump teardown failed"
            ),
        }
        result
    }
}

impl Drop for DumpSession<'_> {
    fn drop(&mut self) {
        // Error paths end here without an explicit close; the failure was
        // already logged by teardown.
        let _ = self.teardown();
    }
}

impl std::fmt::Debug for DumpSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DumpSession")
            .field("transmission_id", &self.transmission_id)
            .field("phase", &self.phase)
            .field("faulted", &self.faulted)
            .field("headers", &self.headers)
            .field("payload_bytes", &self.payload_bytes)
            .finish_non_exhaustive()
    }
}
