//! Incremental line splitting over a chunked byte stream.
//!
//! Build output arrives as raw byte chunks cut at arbitrary boundaries, in
//! the tool's host code page. `LineSplitter` owns a stateful decoder (so a
//! multi-byte code point split across chunks still decodes) and a pending
//! buffer holding the trailing unterminated fragment of the previous chunk.
//! Each line is emitted exactly once, fully reassembled.
//!
//! The source process never terminates its final line with a newline flush,
//! so a trailing fragment is dropped at end of stream unless `flush_trailing`
//! is set.

use encoding_rs::{Decoder, Encoding, UTF_8};

#[derive(Debug, Clone)]
/// A single decoded line of build output.
pub struct RawLine {
    pub text: String,
    /// 0-based position within the run's output.
    pub ordinal: usize,
}

pub struct LineSplitter {
    decoder: Decoder,
    pending: String,
    emitted: usize,
    flush_trailing: bool,
}

impl LineSplitter {
    pub fn new(encoding: &'static Encoding, flush_trailing: bool) -> Self {
        LineSplitter {
            decoder: encoding.new_decoder(),
            pending: String::new(),
            emitted: 0,
            flush_trailing,
        }
    }

    /// Splitter over UTF-8 input that drops a trailing fragment.
    pub fn utf8() -> Self {
        Self::new(UTF_8, false)
    }

    /// Feed one chunk, returning every line completed by it, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<RawLine> {
        let cap = self
            .decoder
            .max_utf8_buffer_length(chunk.len())
            .unwrap_or(chunk.len() * 4 + 4);
        let mut decoded = String::with_capacity(cap);
        let _ = self.decoder.decode_to_string(chunk, &mut decoded, false);
        self.pending.push_str(&decoded);

        let buf = std::mem::take(&mut self.pending);
        let mut rest = buf.as_str();
        let mut lines = Vec::new();
        while let Some(pos) = rest.find('\n') {
            let line = rest[..pos].strip_suffix('\r').unwrap_or(&rest[..pos]);
            lines.push(RawLine {
                text: line.to_string(),
                ordinal: self.emitted,
            });
            self.emitted += 1;
            rest = &rest[pos + 1..];
        }
        self.pending = rest.to_string();
        lines
    }

    /// End of stream. Returns the pending fragment only when trailing
    /// flush was requested; otherwise the fragment is dropped.
    pub fn finish(mut self) -> Option<RawLine> {
        let mut tail = String::new();
        let _ = self.decoder.decode_to_string(&[], &mut tail, true);
        self.pending.push_str(&tail);
        if self.flush_trailing && !self.pending.is_empty() {
            Some(RawLine {
                text: std::mem::take(&mut self.pending),
                ordinal: self.emitted,
            })
        } else {
            None
        }
    }
}

/// Resolve an encoding label from configuration, e.g. `gbk` or `utf-8`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}
