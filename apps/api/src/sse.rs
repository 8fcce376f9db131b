//! Line-oriented decoder for `text/event-stream` bodies.
//!
//! Network reads do not respect line boundaries: a frame can arrive split
//! across two chunks, and so can a multi-byte UTF-8 sequence inside it.
//! `FrameDecoder` keeps the unterminated tail of the last chunk and only
//! emits frames for complete lines.
//!
//! Both ends of the enhancement protocol use it: the server to read the
//! upstream provider's stream, the client to read the enhancement endpoint.

/// Payload that terminates a stream.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_FIELD: &[u8] = b"data:";

/// One `data:` line of an event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(String),
    Done,
}

#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one network chunk and returns the frames completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buffer[consumed..].iter().position(|&b| b == b'\n') {
            let line = &self.buffer[consumed..consumed + offset];
            if let Some(frame) = parse_line(line) {
                frames.push(frame);
            }
            consumed += offset + 1;
        }
        self.buffer.drain(..consumed);
        frames
    }

    /// Flushes the final line of a stream that closed without a trailing newline.
    pub fn finish(&mut self) -> Option<Frame> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }

    /// Bytes held back waiting for the end of their line.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn parse_line(line: &[u8]) -> Option<Frame> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let payload = line.strip_prefix(DATA_FIELD)?;
    let payload = payload.strip_prefix(b" ").unwrap_or(payload);
    let payload = String::from_utf8_lossy(payload);

    if payload == DONE_SENTINEL {
        Some(Frame::Done)
    } else {
        Some(Frame::Data(payload.into_owned()))
    }
}
