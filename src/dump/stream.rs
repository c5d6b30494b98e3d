//! Dumper that writes the raw request to any `std::io::Write` sink.
//!
//! Output layout:
//!
//! ```text
//! Content-Type: text/plain\r\n
//! X-Id: 1\r\n
//! \r\n
//! <payload bytes>
//! ```

use std::io::Write;

use tracing::warn;

use crate::error::DumpError;

use super::OutgoingDumper;

/// Bridges dump calls to a byte sink.
///
/// Header lines are encoded as ISO-8859-1, the usual HTTP header charset;
/// characters outside it are written as `?`. The first write error disables
/// the dumper for the rest of the transmission and is logged once.
#[derive(Debug)]
pub struct StreamDumper<W: Write> {
    sink: W,
    failed: bool,
}

fn latin1_line(name: &str, value: &str) -> Vec<u8> {
    let mut line = Vec::with_capacity(name.len() + value.len() + 4);
    let encode = |c: char| u8::try_from(u32::from(c)).unwrap_or(b'?');
    line.extend(name.chars().map(encode));
    line.extend_from_slice(b": ");
    line.extend(value.chars().map(encode));
    line.extend_from_slice(b"\r\n");
    line
}

impl<W: Write> StreamDumper<W> {
    /// Wraps `sink`.
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
            failed: false,
        }
    }

    /// Returns true once a write to the sink has failed.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed
    }

    /// Borrows the underlying sink.
    pub const fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Unwraps the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write(&mut self, bytes: &[u8]) {
        if self.failed {
            return;
        }
        if let Err(err) = self.sink.write_all(bytes) {
            self.failed = true;
            warn!(error = %err, "outgoing dump write failed; discarding the rest of this dump");
        }
    }
}

impl<W: Write> OutgoingDumper for StreamDumper<W> {
    fn dump_header(&mut self, name: &str, value: &str) {
        let line = latin1_line(name, value);
        self.write(&line);
    }

    fn finished_headers(&mut self) {
        self.write(b"\r\n");
    }

    fn dump_payload(&mut self, byte: u8) {
        self.write(&[byte]);
    }

    fn dump_payload_chunk(&mut self, bytes: &[u8]) {
        self.write(bytes);
    }

    fn close(&mut self) -> Result<(), DumpError> {
        self.sink
            .flush()
            .map_err(|source| DumpError::Teardown { source })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct BrokenSink {
        writes: usize,
    }

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_renders_headers_and_payload() {
        let mut dumper = StreamDumper::new(Vec::new());
        dumper.dump_header("Content-Type", "text/plain");
        dumper.dump_header("X-Id", "1");
        dumper.finished_headers();
        dumper.dump_payload(72);
        dumper.dump_payload_chunk(&[105]);
        dumper.finished_payload();
        dumper.close().unwrap();

        assert_eq!(
            dumper.into_inner(),
            b"Content-Type: text/plain\r\nX-Id: 1\r\n\r\nHi".to_vec()
        );
    }

    #[test]
    fn test_header_latin1_encoding() {
        let mut dumper = StreamDumper::new(Vec::new());
        dumper.dump_header("Subject", "Gr\u{fc}\u{df}e \u{20ac}");
        assert_eq!(dumper.get_ref().as_slice(), b"Subject: Gr\xfc\xdfe ?\r\n");
    }

    #[test]
    fn test_write_failure_is_absorbed() {
        let mut dumper = StreamDumper::new(BrokenSink { writes: 0 });
        dumper.dump_header("A", "1");
        assert!(dumper.has_failed());
        dumper.finished_headers();
        dumper.dump_payload(1);
        assert_eq!(dumper.get_ref().writes, 1);
    }

    #[test]
    fn test_close_reports_flush_failure() {
        let mut dumper = StreamDumper::new(BrokenSink { writes: 0 });
        let err = dumper.close().unwrap_err();
        assert!(matches!(err, DumpError::Teardown { .. }));
    }
}
