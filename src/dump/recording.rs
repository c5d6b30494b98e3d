//! Dumper that records every call, for auditing and tests.

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

use super::OutgoingDumper;

/// One observed dump call.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum DumpEvent {
    Header { name: String, value: String },
    FinishedHeaders,
    Payload(u8),
    FinishedPayload,
    Close,
}

impl DumpEvent {
    /// Shorthand for a [`DumpEvent::Header`].
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A dumper that keeps every call as a [`DumpEvent`], in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingDumper {
    events: Vec<DumpEvent>,
}

impl RecordingDumper {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[DumpEvent] {
        &self.events
    }

    /// Payload bytes recorded so far, in order.
    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DumpEvent::Payload(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// Consumes the recorder and returns its events.
    #[must_use]
    pub fn into_events(self) -> Vec<DumpEvent> {
        self.events
    }
}

impl OutgoingDumper for RecordingDumper {
    fn dump_header(&mut self, name: &str, value: &str) {
        self.events.push(DumpEvent::header(name, value));
    }

    fn finished_headers(&mut self) {
        self.events.push(DumpEvent::FinishedHeaders);
    }

    fn dump_payload(&mut self, byte: u8) {
        self.events.push(DumpEvent::Payload(byte));
    }

    fn finished_payload(&mut self) {
        self.events.push(DumpEvent::FinishedPayload);
    }

    fn close(&mut self) -> Result<(), DumpError> {
        self.events.push(DumpEvent::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_calls_in_order() {
        let mut rec = RecordingDumper::new();
        rec.dump_header("X-Id", "1");
        rec.finished_headers();
        rec.dump_payload_chunk(b"ok");
        rec.finished_payload();
        rec.close().unwrap();

        assert_eq!(rec.payload(), b"ok".to_vec());
        assert_eq!(
            rec.into_events(),
            vec![
                DumpEvent::header("X-Id", "1"),
                DumpEvent::FinishedHeaders,
                DumpEvent::Payload(b'o'),
                DumpEvent::Payload(b'k'),
                DumpEvent::FinishedPayload,
                DumpEvent::Close,
            ]
        );
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&DumpEvent::header("A", "b")).unwrap();
        assert_eq!(json, r#"{"event":"header","data":{"name":"A","value":"b"}}"#);
        let payload = serde_json::to_string(&DumpEvent::Payload(72)).unwrap();
        assert_eq!(payload, r#"{"event":"payload","data":72}"#);
        let back: DumpEvent = serde_json::from_str(r#"{"event":"close"}"#).unwrap();
        assert_eq!(back, DumpEvent::Close);
    }
}
